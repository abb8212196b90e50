//! PNG export.

use std::path::Path;

use image::ImageEncoder;

use crate::foundation::core::{FrameRgba, Rgba8Premul};
use crate::foundation::error::{EngineError, EngineResult};

fn unpremultiply(frame: &FrameRgba) -> Vec<u8> {
    let mut out = Vec::with_capacity(frame.data.len());
    for px in frame.data.chunks_exact(4) {
        let straight = Rgba8Premul {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        }
        .to_straight_rgba();
        out.extend_from_slice(&straight);
    }
    out
}

/// Encode a rendered frame as PNG bytes (straight alpha).
pub fn encode_png(frame: &FrameRgba) -> EngineResult<Vec<u8>> {
    let straight = unpremultiply(frame);
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(
            &straight,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| EngineError::render(format!("png encode: {e}")))?;
    Ok(out)
}

/// Encode a rendered frame and write it to `path`.
pub fn write_png(frame: &FrameRgba, path: impl AsRef<Path>) -> EngineResult<()> {
    let path = path.as_ref();
    let bytes = encode_png(frame)?;
    std::fs::write(path, bytes)
        .map_err(|e| EngineError::render(format!("write '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
