use crate::foundation::error::{EngineError, EngineResult};

pub use kurbo::{Affine, BezPath, Circle, Point, Rect, RoundedRect};

/// Side length of the logical drawing space, in logical units.
///
/// All layer geometry is authored against a fixed `512 x 512` unit square and
/// uniformly scaled to the output resolution, which is what makes renders at
/// different target sizes geometrically identical.
pub const LOGICAL_SIZE: f64 = 512.0;

/// Output clip shape for the composed avatar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ShapeMode {
    /// Clip to the circle inscribed in the logical square.
    Circle,
    /// Keep the full square (no clipping).
    Square,
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel, premultiplied.
    pub r: u8,
    /// Green channel, premultiplied.
    pub g: u8,
    /// Blue channel, premultiplied.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Build from straight (non-premultiplied) channels.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Parse a `#rgb` or `#rrggbb` hex color into an opaque value.
    pub fn from_hex(hex: &str) -> EngineResult<Self> {
        let s = hex.trim().trim_start_matches('#');
        let (r, g, b) = match s.len() {
            3 => {
                let d = |i: usize| -> EngineResult<u8> {
                    let n = u8::from_str_radix(&s[i..i + 1], 16)
                        .map_err(|_| EngineError::validation(format!("bad hex color '{hex}'")))?;
                    Ok(n * 17)
                };
                (d(0)?, d(1)?, d(2)?)
            }
            6 => {
                let d = |i: usize| -> EngineResult<u8> {
                    u8::from_str_radix(&s[i..i + 2], 16)
                        .map_err(|_| EngineError::validation(format!("bad hex color '{hex}'")))
                };
                (d(0)?, d(2)?, d(4)?)
            }
            _ => {
                return Err(EngineError::validation(format!("bad hex color '{hex}'")));
            }
        };
        Ok(Self { r, g, b, a: 255 })
    }

    /// Recover straight (non-premultiplied) channels.
    pub fn to_straight_rgba(self) -> [u8; 4] {
        if self.a == 0 {
            return [0, 0, 0, 0];
        }
        let a = u16::from(self.a);
        let un = |c: u8| -> u8 { ((u16::from(c) * 255 + a / 2) / a).min(255) as u8 };
        [un(self.r), un(self.g), un(self.b), self.a]
    }

    /// Interpolate toward `other` in premultiplied space; `t` is clamped to 0..1.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let af = f64::from(a);
            let bf = f64::from(b);
            (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// A finished render: premultiplied RGBA8 pixels at the requested resolution.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

impl FrameRgba {
    /// Premultiplied RGBA of the pixel at `(x, y)`; errors outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> EngineResult<Rgba8Premul> {
        if x >= self.width || y >= self.height {
            return Err(EngineError::render(format!(
                "pixel ({x},{y}) outside {}x{} frame",
                self.width, self.height
            )));
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Ok(Rgba8Premul {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
