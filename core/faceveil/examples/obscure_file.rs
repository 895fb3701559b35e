//! Detect and obscure faces in an image file.
//!
//! Usage:
//!   cargo run --example obscure_file -- <model.bin> <input> <output.png> [blur|solid|emoji]
//!
//! Set `RUST_LOG=debug` to see each detection stage and region.

use faceveil::{FaceObscurer, ObscureMode, RustfaceDetector};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [model_path, input_path, output_path, rest @ ..] = args.as_slice() else {
        eprintln!("usage: obscure_file <model.bin> <input> <output.png> [blur|solid|emoji]");
        std::process::exit(2);
    };
    let mode = match rest.first().map(String::as_str) {
        None | Some("blur") => ObscureMode::Blur,
        Some("solid") => ObscureMode::Solid,
        Some("emoji") => ObscureMode::Emoji,
        Some(other) => {
            eprintln!("unknown mode: {other}");
            std::process::exit(2);
        }
    };

    let detector = RustfaceDetector::from_file(model_path).unwrap();
    let input = std::fs::read(input_path).unwrap();

    let result = FaceObscurer::new(input)
        .unwrap()
        .mode(mode)
        .face_detector(Box::new(detector))
        .obscure()
        .unwrap();

    println!(
        "=== {input_path} ({}x{}) via {:?} ===",
        result.width, result.height, result.tier
    );
    for (i, face) in result.faces.iter().enumerate() {
        println!(
            "  face {i}: confidence={:.2}, bbox=({:.0}, {:.0}, {:.0}x{:.0})",
            face.confidence, face.x, face.y, face.width, face.height
        );
    }
    for skipped in &result.report.skipped {
        println!("  skipped face {}: {}", skipped.index, skipped.reason);
    }

    std::fs::write(output_path, &result.data).unwrap();
    println!("  → wrote {output_path} ({} bytes)", result.data.len());
}
