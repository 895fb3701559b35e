use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::error::ObscureError;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Decode input bytes (JPEG, PNG, WebP, ...) into an RGBA buffer.
pub(crate) fn decode_image(input: &[u8]) -> Result<RgbaImage, ObscureError> {
    let format = image::guess_format(input).map_err(|e| ObscureError::DecodeError(e.to_string()))?;
    let decoded = image::load_from_memory_with_format(input, format)
        .map_err(|e| ObscureError::DecodeError(e.to_string()))?;

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(ObscureError::ZeroDimensions);
    }
    Ok(decoded.to_rgba8())
}

/// Encode an RGBA buffer as PNG.
pub(crate) fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ObscureError> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| ObscureError::EncodeError(e.to_string()))?;
    Ok(buffer)
}

/// Wrap PNG bytes in a base64 `data:` URL.
pub fn png_data_url(png: &[u8]) -> String {
    let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + png.len().div_ceil(3) * 4);
    url.push_str(PNG_DATA_URL_PREFIX);
    STANDARD.encode_string(png, &mut url);
    url
}
