use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Options for obscuring, passed as a JavaScript object.
///
/// All fields are optional and fall back to the library defaults. The
/// `emojiFont` bytes are read separately by [`parse_emoji_font`].
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ObscureOptions {
    pub mode: Option<String>,
    pub solid_color: Option<String>,
    pub emoji: Option<String>,
}

#[derive(Deserialize)]
struct BoxRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
struct NestedDetection {
    #[serde(rename = "box")]
    bounds: BoxRect,
    #[serde(default)]
    score: Option<f64>,
}

/// A face box as produced by JavaScript detectors: either a plain
/// `{x, y, width, height}` object or a face-api style
/// `{detection: {box: {...}, score}}` result.
#[derive(Deserialize)]
#[serde(untagged)]
enum FaceInput {
    Nested {
        detection: NestedDetection,
    },
    Plain {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        confidence: Option<f64>,
    },
}

impl From<FaceInput> for faceveil::FaceBounds {
    fn from(face: FaceInput) -> Self {
        let (BoxRect { x, y, width, height }, confidence) = match face {
            FaceInput::Nested { detection } => (detection.bounds, detection.score),
            FaceInput::Plain {
                x,
                y,
                width,
                height,
                confidence,
            } => (BoxRect { x, y, width, height }, confidence),
        };
        faceveil::FaceBounds {
            x,
            y,
            width,
            height,
            confidence: confidence.unwrap_or(1.0),
        }
    }
}

fn string_to_mode(mode: &str) -> Result<faceveil::ObscureMode, JsValue> {
    match mode {
        "blur" => Ok(faceveil::ObscureMode::Blur),
        "solid" => Ok(faceveil::ObscureMode::Solid),
        "emoji" => Ok(faceveil::ObscureMode::Emoji),
        _ => Err(make_error(
            "INVALID_OPTIONS",
            &format!("unknown mode: {mode}"),
        )),
    }
}

/// Create a JS `Error` with a `code` property.
fn make_error(code: &str, message: &str) -> JsValue {
    let err = js_sys::Error::new(message);
    let _ = js_sys::Reflect::set(&err, &"code".into(), &JsValue::from_str(code));
    JsValue::from(err)
}

/// Convert an `ObscureError` into a JS `Error` with a machine-readable `code` property.
fn to_js_error(e: faceveil::ObscureError) -> JsValue {
    let code = match &e {
        faceveil::ObscureError::ModelsNotLoaded => "MODELS_NOT_LOADED",
        faceveil::ObscureError::DetectionFailure(_) => "DETECTION_FAILURE",
        faceveil::ObscureError::DecodeError(_) => "DECODE_ERROR",
        faceveil::ObscureError::ZeroDimensions => "ZERO_DIMENSIONS",
        faceveil::ObscureError::EncodeError(_) => "ENCODE_ERROR",
        faceveil::ObscureError::InvalidConfidence(_) => "INVALID_CONFIDENCE",
        faceveil::ObscureError::InvalidColor(_) => "INVALID_COLOR",
        faceveil::ObscureError::EmptyEmoji => "EMPTY_EMOJI",
        faceveil::ObscureError::ModelLoad(_) => "MODEL_LOAD",
    };
    make_error(code, &e.to_string())
}

fn parse_options(options: JsValue) -> Result<ObscureOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(ObscureOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| make_error("INVALID_OPTIONS", &format!("invalid options: {e}")))
    }
}

/// Read the optional `emojiFont` (a `Uint8Array` of TTF/OTF bytes) from the
/// options object.
fn parse_emoji_font(options: &JsValue) -> Result<Option<faceveil::FontArc>, JsValue> {
    if !options.is_object() {
        return Ok(None);
    }
    let value = js_sys::Reflect::get(options, &"emojiFont".into())?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    let bytes = value
        .dyn_into::<js_sys::Uint8Array>()
        .map_err(|_| make_error("INVALID_OPTIONS", "emojiFont must be a Uint8Array"))?
        .to_vec();
    faceveil::FontArc::try_from_vec(bytes)
        .map(Some)
        .map_err(|e| make_error("INVALID_OPTIONS", &format!("invalid emojiFont: {e}")))
}

fn parse_faces(faces: JsValue) -> Result<Vec<faceveil::FaceBounds>, JsValue> {
    if faces.is_undefined() || faces.is_null() {
        return Ok(Vec::new());
    }
    let faces: Vec<FaceInput> = serde_wasm_bindgen::from_value(faces)
        .map_err(|e| make_error("INVALID_FACES", &format!("invalid faces: {e}")))?;
    Ok(faces.into_iter().map(Into::into).collect())
}

/// Apply parsed `ObscureOptions` to a `FaceObscurer`.
fn apply_options(
    mut obscurer: faceveil::FaceObscurer,
    opts: &ObscureOptions,
    font: Option<faceveil::FontArc>,
) -> Result<faceveil::FaceObscurer, JsValue> {
    if let Some(ref mode) = opts.mode {
        obscurer = obscurer.mode(string_to_mode(mode)?);
    }
    if let Some(ref color) = opts.solid_color {
        obscurer = obscurer.solid_color(color);
    }
    if let Some(ref emoji) = opts.emoji {
        obscurer = obscurer.emoji(emoji);
    }
    if let Some(font) = font {
        obscurer = obscurer.emoji_font(font);
    }
    Ok(obscurer)
}

/// Build a plain JS object from an `ObscuredImage`.
fn build_result_object(result: &faceveil::ObscuredImage) -> Result<JsValue, JsValue> {
    let obj = js_sys::Object::new();
    js_sys::Reflect::set(
        &obj,
        &"dataUrl".into(),
        &JsValue::from_str(&result.data_url()),
    )?;
    js_sys::Reflect::set(&obj, &"width".into(), &JsValue::from(result.width))?;
    js_sys::Reflect::set(&obj, &"height".into(), &JsValue::from(result.height))?;
    js_sys::Reflect::set(
        &obj,
        &"applied".into(),
        &JsValue::from(result.report.applied as u32),
    )?;
    js_sys::Reflect::set(
        &obj,
        &"skipped".into(),
        &JsValue::from(result.report.skipped_count() as u32),
    )?;
    Ok(JsValue::from(obj))
}

/// Obscure faces that were detected on the JavaScript side.
///
/// @param input - Raw image bytes (JPEG, PNG, or WebP)
/// @param faces - Array of `{x, y, width, height}` boxes or face-api
///   detections (`{detection: {box}}`); `null` for none
/// @param options - Optional object with fields: mode ("blur" | "solid" |
///   "emoji"), solidColor, emoji, emojiFont (`Uint8Array` of font bytes;
///   without it emoji mode draws a placeholder disc)
///
/// Returns `{dataUrl, width, height, applied, skipped}`.
#[wasm_bindgen]
pub fn obscure(input: Vec<u8>, faces: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let font = parse_emoji_font(&options)?;
    let opts = parse_options(options)?;
    let faces = parse_faces(faces)?;

    let obscurer = faceveil::FaceObscurer::new(input).map_err(to_js_error)?;
    let obscurer = apply_options(obscurer, &opts, font)?;

    let result = obscurer.obscure_regions(&faces).map_err(to_js_error)?;

    build_result_object(&result)
}
