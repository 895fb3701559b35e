use faceveil::{
    DetectionOptions, DetectionTier, DetectorError, FaceBounds, FaceDetector, FaceObscurer,
    FontArc, LandmarkedFace, ObscureError, ObscureMode,
};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn encode(img: &RgbaImage) -> Vec<u8> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
        .unwrap();
    buffer
}

fn white_png(width: u32, height: u32) -> Vec<u8> {
    encode(&RgbaImage::from_pixel(width, height, WHITE))
}

fn striped_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        if x % 2 == 0 {
            Rgba([0, 0, 0, 255])
        } else {
            WHITE
        }
    });
    encode(&img)
}

fn decode(png: &[u8]) -> RgbaImage {
    image::load_from_memory(png).unwrap().to_rgba8()
}

/// Detector returning fixed boxes, with optional landmark refinement.
struct FixedDetector {
    faces: Vec<FaceBounds>,
    refined: Option<Vec<FaceBounds>>,
}

impl FixedDetector {
    fn new(faces: Vec<FaceBounds>) -> Self {
        Self {
            faces,
            refined: None,
        }
    }
}

impl FaceDetector for FixedDetector {
    fn detect(
        &self,
        _image: &RgbaImage,
        options: &DetectionOptions,
    ) -> Result<Vec<FaceBounds>, DetectorError> {
        Ok(self
            .faces
            .iter()
            .filter(|f| f.confidence >= f64::from(options.min_confidence))
            .cloned()
            .collect())
    }

    fn detect_with_landmarks(
        &self,
        _image: &RgbaImage,
        _options: &DetectionOptions,
    ) -> Result<Vec<LandmarkedFace>, DetectorError> {
        match &self.refined {
            Some(refined) => Ok(refined
                .iter()
                .map(|detection| LandmarkedFace {
                    detection: detection.clone(),
                    landmarks: Vec::new(),
                })
                .collect()),
            None => Err(DetectorError::Inference("landmark model missing".into())),
        }
    }
}

struct BrokenDetector;

impl FaceDetector for BrokenDetector {
    fn detect(
        &self,
        _image: &RgbaImage,
        _options: &DetectionOptions,
    ) -> Result<Vec<FaceBounds>, DetectorError> {
        Err(DetectorError::Inference("weights corrupted".into()))
    }
}

#[test]
fn solid_fill_on_blank_image() {
    let detector = FixedDetector::new(vec![FaceBounds::new(10.0, 10.0, 50.0, 50.0)]);
    let result = FaceObscurer::new(white_png(200, 200))
        .unwrap()
        .mode(ObscureMode::Solid)
        .solid_color("#0000FF")
        .face_detector(Box::new(detector))
        .obscure()
        .unwrap();

    assert_eq!((result.width, result.height), (200, 200));
    assert_eq!(result.tier, Some(DetectionTier::Primary));
    assert_eq!(result.report.applied, 1);

    let out = decode(&result.data);
    assert_eq!(out.dimensions(), (200, 200));
    for y in 10..60 {
        for x in 10..60 {
            assert_eq!(*out.get_pixel(x, y), Rgba([0, 0, 255, 255]));
        }
    }
    assert_eq!(*out.get_pixel(100, 100), WHITE);
}

#[test]
fn blur_softens_the_face_and_nothing_else() {
    let input = striped_png(120, 80);
    let original = decode(&input);
    let detector = FixedDetector::new(vec![FaceBounds::new(30.0, 20.0, 40.0, 40.0)]);
    let result = FaceObscurer::new(input)
        .unwrap()
        .face_detector(Box::new(detector))
        .obscure()
        .unwrap();
    let out = decode(&result.data);

    // Padded region is 26..74 x 16..64.
    let centre = out.get_pixel(50, 40).0[0];
    assert!((100..=160).contains(&centre), "centre {centre}");
    assert_eq!(out.get_pixel(10, 10), original.get_pixel(10, 10));
    assert_eq!(out.get_pixel(80, 70), original.get_pixel(80, 70));
}

#[test]
fn emoji_mode_draws_inside_the_face() {
    let detector = FixedDetector::new(vec![FaceBounds::new(50.0, 50.0, 60.0, 60.0)]);
    let result = FaceObscurer::new(white_png(160, 160))
        .unwrap()
        .mode(ObscureMode::Emoji)
        .emoji("🙈")
        .face_detector(Box::new(detector))
        .obscure()
        .unwrap();
    let out = decode(&result.data);

    assert_ne!(*out.get_pixel(80, 80), WHITE);
    for (x, y) in [(5, 5), (155, 155), (80, 20), (20, 80)] {
        assert_eq!(*out.get_pixel(x, y), WHITE, "({x}, {y})");
    }
}

#[test]
fn emoji_font_renders_the_configured_glyph() {
    let font = FontArc::try_from_slice(include_bytes!("fixtures/DejaVuSans.ttf")).unwrap();
    let face = [FaceBounds::new(50.0, 50.0, 60.0, 60.0)];
    let render = |glyph: &str| {
        FaceObscurer::new(white_png(160, 160))
            .unwrap()
            .mode(ObscureMode::Emoji)
            .emoji(glyph)
            .emoji_font(font.clone())
            .obscure_regions(&face)
            .unwrap()
    };

    let smiley = render("\u{263A}");
    let letter = render("A");
    assert_eq!(smiley.report.applied, 1);
    assert_ne!(smiley.data, letter.data);

    let out = decode(&smiley.data);
    assert_eq!(*out.get_pixel(5, 5), WHITE);
    assert!(out.pixels().any(|p| *p == Rgba([0, 0, 0, 255])));
}

#[test]
fn enhanced_boxes_are_preferred() {
    let detector = FixedDetector {
        faces: vec![FaceBounds::new(0.0, 0.0, 10.0, 10.0)],
        refined: Some(vec![FaceBounds::new(60.0, 60.0, 20.0, 20.0)]),
    };
    let result = FaceObscurer::new(white_png(100, 100))
        .unwrap()
        .mode(ObscureMode::Solid)
        .face_detector(Box::new(detector))
        .obscure()
        .unwrap();

    assert_eq!(result.tier, Some(DetectionTier::Enhanced));
    assert_eq!(result.faces, vec![FaceBounds::new(60.0, 60.0, 20.0, 20.0)]);
    let out = decode(&result.data);
    assert_eq!(*out.get_pixel(5, 5), WHITE);
    assert_eq!(*out.get_pixel(70, 70), Rgba([255, 0, 0, 255]));
}

#[test]
fn failed_enhancement_keeps_primary_boxes() {
    let faces = vec![
        FaceBounds::new(5.0, 5.0, 20.0, 20.0),
        FaceBounds::new(50.0, 50.0, 20.0, 20.0),
    ];
    let result = FaceObscurer::new(white_png(100, 100))
        .unwrap()
        .face_detector(Box::new(FixedDetector::new(faces.clone())))
        .obscure()
        .unwrap();
    assert_eq!(result.tier, Some(DetectionTier::Primary));
    assert_eq!(result.faces, faces);
    assert_eq!(result.report.applied, 2);
}

#[test]
fn relaxed_pass_never_lowers_configured_threshold() {
    let mut face = FaceBounds::new(20.0, 20.0, 30.0, 30.0);
    face.confidence = 0.7;
    let result = FaceObscurer::new(white_png(100, 100))
        .unwrap()
        .min_confidence(0.8)
        .face_detector(Box::new(FixedDetector::new(vec![face])))
        .obscure()
        .unwrap();
    // Relaxed threshold is max(0.2, 0.8) so the face stays below it.
    assert_eq!(result.tier, Some(DetectionTier::None));
    assert!(result.faces.is_empty());
    assert_eq!(result.report.applied, 0);
}

#[test]
fn no_faces_returns_unmodified_pixels() {
    let input = striped_png(64, 64);
    let original = decode(&input);
    let detector = FixedDetector::new(Vec::new());
    let result = FaceObscurer::new(input)
        .unwrap()
        .face_detector(Box::new(detector))
        .obscure()
        .unwrap();
    assert_eq!(result.tier, Some(DetectionTier::None));
    assert_eq!(decode(&result.data), original);
}

#[test]
fn primary_detector_error_is_fatal() {
    let result = FaceObscurer::new(white_png(50, 50))
        .unwrap()
        .face_detector(Box::new(BrokenDetector))
        .obscure();
    match result {
        Err(ObscureError::DetectionFailure(msg)) => assert!(msg.contains("weights corrupted")),
        other => panic!("expected DetectionFailure, got {other:?}"),
    }
}

#[test]
fn bad_faces_are_skipped_not_fatal() {
    let faces = vec![
        FaceBounds::new(10.0, 10.0, 20.0, 20.0),
        FaceBounds::new(f64::NAN, 10.0, 20.0, 20.0),
        FaceBounds::new(900.0, 900.0, 20.0, 20.0),
        FaceBounds::new(-40.0, -40.0, 60.0, 60.0),
    ];
    let result = FaceObscurer::new(white_png(80, 80))
        .unwrap()
        .mode(ObscureMode::Solid)
        .obscure_regions(&faces)
        .unwrap();
    assert_eq!(result.report.applied, 2);
    assert_eq!(result.report.skipped_count(), 2);
    assert_eq!((result.width, result.height), (80, 80));
}

#[test]
fn data_url_decodes_back_to_the_image() {
    use base64::Engine;

    let result = FaceObscurer::new(white_png(30, 20))
        .unwrap()
        .obscure_regions(&[FaceBounds::new(5.0, 5.0, 10.0, 10.0)])
        .unwrap();
    let url = result.data_url();
    let payload = url.strip_prefix("data:image/png;base64,").unwrap();
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload).unwrap();
    assert_eq!(bytes, result.data);
}
