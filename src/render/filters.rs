//! Filter-expression parsing and normalization.
//!
//! Vibe items carry CSS-filter-like expression strings such as
//! `"grayscale(1) contrast(1.2)"`. They parse into [`FilterOp`]s and then
//! normalize into a [`FilterPipeline`]: every color-matrix op composed into a
//! single 5x4 matrix, with blur and pixelate kept as separate spatial passes.

use crate::foundation::error::{EngineError, EngineResult};
use crate::render::raster;

/// One parsed filter function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterOp {
    /// `grayscale(amount)`, 0..1.
    Grayscale(f32),
    /// `sepia(amount)`, 0..1.
    Sepia(f32),
    /// `saturate(factor)`.
    Saturate(f32),
    /// `hue-rotate(deg)`.
    HueRotate(f32),
    /// `contrast(factor)`.
    Contrast(f32),
    /// `brightness(factor)`.
    Brightness(f32),
    /// `invert(amount)`, 0..1.
    Invert(f32),
    /// `opacity(amount)`, 0..1.
    Opacity(f32),
    /// `blur(px)` in logical units.
    Blur(f32),
    /// `pixelate(tile)` in logical units.
    Pixelate(u32),
}

fn parse_number(name: &str, raw: &str, strip: &[&str]) -> EngineResult<f32> {
    let mut s = raw.trim();
    for suffix in strip {
        if let Some(stripped) = s.strip_suffix(suffix) {
            s = stripped.trim();
            break;
        }
    }
    let v: f32 = s.parse().map_err(|_| {
        EngineError::validation(format!("filter {name}: bad argument '{raw}'"))
    })?;
    if !v.is_finite() {
        return Err(EngineError::validation(format!(
            "filter {name}: argument must be finite"
        )));
    }
    Ok(v)
}

fn parse_one(token: &str) -> EngineResult<FilterOp> {
    let (name, rest) = token.split_once('(').ok_or_else(|| {
        EngineError::validation(format!("malformed filter token '{token}'"))
    })?;
    let arg = rest.strip_suffix(')').ok_or_else(|| {
        EngineError::validation(format!("malformed filter token '{token}'"))
    })?;
    let name = name.trim().to_ascii_lowercase();

    match name.as_str() {
        "grayscale" => Ok(FilterOp::Grayscale(parse_number(&name, arg, &["%"])?)),
        "sepia" => Ok(FilterOp::Sepia(parse_number(&name, arg, &["%"])?)),
        "saturate" => Ok(FilterOp::Saturate(parse_number(&name, arg, &["%"])?)),
        "hue-rotate" => Ok(FilterOp::HueRotate(parse_number(&name, arg, &["deg"])?)),
        "contrast" => Ok(FilterOp::Contrast(parse_number(&name, arg, &["%"])?)),
        "brightness" => Ok(FilterOp::Brightness(parse_number(&name, arg, &["%"])?)),
        "invert" => Ok(FilterOp::Invert(parse_number(&name, arg, &["%"])?)),
        "opacity" => Ok(FilterOp::Opacity(parse_number(&name, arg, &["%"])?)),
        "blur" => Ok(FilterOp::Blur(parse_number(&name, arg, &["px"])?)),
        "pixelate" => {
            let v = parse_number(&name, arg, &["px"])?;
            if v < 1.0 || v > 256.0 {
                return Err(EngineError::validation(
                    "filter pixelate: tile must be in 1..=256",
                ));
            }
            Ok(FilterOp::Pixelate(v.round() as u32))
        }
        other => Err(EngineError::validation(format!(
            "unknown filter function '{other}'"
        ))),
    }
}

/// Parse a whitespace-separated filter expression. `"none"` and the empty
/// string parse to no ops.
pub fn parse_filter_expr(expr: &str) -> EngineResult<Vec<FilterOp>> {
    let expr = expr.trim();
    if expr.is_empty() || expr.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }
    expr.split_whitespace().map(parse_one).collect()
}

// sRGB luma weights, as used by the SVG feColorMatrix shortcuts.
const LR: f32 = 0.2126;
const LG: f32 = 0.7152;
const LB: f32 = 0.0722;

fn grayscale_matrix(t: f32) -> [f32; 20] {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    [
        inv + t * LR, t * LG, t * LB, 0.0, 0.0, //
        t * LR, inv + t * LG, t * LB, 0.0, 0.0, //
        t * LR, t * LG, inv + t * LB, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn sepia_matrix(t: f32) -> [f32; 20] {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    [
        inv + t * 0.393, t * 0.769, t * 0.189, 0.0, 0.0, //
        t * 0.349, inv + t * 0.686, t * 0.168, 0.0, 0.0, //
        t * 0.272, t * 0.534, inv + t * 0.131, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn saturate_matrix(s: f32) -> [f32; 20] {
    let s = s.max(0.0);
    [
        LR + (1.0 - LR) * s, LG - LG * s, LB - LB * s, 0.0, 0.0, //
        LR - LR * s, LG + (1.0 - LG) * s, LB - LB * s, 0.0, 0.0, //
        LR - LR * s, LG - LG * s, LB + (1.0 - LB) * s, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn hue_rotate_matrix(deg: f32) -> [f32; 20] {
    let rad = deg.to_radians();
    let c = rad.cos();
    let s = rad.sin();
    [
        LR + c * (1.0 - LR) - s * LR,
        LG - c * LG - s * LG,
        LB - c * LB + s * (1.0 - LB),
        0.0,
        0.0,
        LR - c * LR + s * 0.143,
        LG + c * (1.0 - LG) + s * 0.140,
        LB - c * LB - s * 0.283,
        0.0,
        0.0,
        LR - c * LR - s * (1.0 - LR),
        LG - c * LG + s * LG,
        LB + c * (1.0 - LB) + s * LB,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
        0.0,
    ]
}

fn contrast_matrix(c: f32) -> [f32; 20] {
    let c = c.max(0.0);
    let off = 0.5 * (1.0 - c);
    [
        c, 0.0, 0.0, 0.0, off, //
        0.0, c, 0.0, 0.0, off, //
        0.0, 0.0, c, 0.0, off, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn brightness_matrix(b: f32) -> [f32; 20] {
    let b = b.max(0.0);
    [
        b, 0.0, 0.0, 0.0, 0.0, //
        0.0, b, 0.0, 0.0, 0.0, //
        0.0, 0.0, b, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn invert_matrix(t: f32) -> [f32; 20] {
    let t = t.clamp(0.0, 1.0);
    let slope = 1.0 - 2.0 * t;
    [
        slope, 0.0, 0.0, 0.0, t, //
        0.0, slope, 0.0, 0.0, t, //
        0.0, 0.0, slope, 0.0, t, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn opacity_matrix(t: f32) -> [f32; 20] {
    let t = t.clamp(0.0, 1.0);
    [
        1.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, t, 0.0,
    ]
}

/// `after ∘ before`: the matrix that applies `before` first, then `after`.
fn mat_compose(after: &[f32; 20], before: &[f32; 20]) -> [f32; 20] {
    let mut out = [0.0f32; 20];
    for row in 0..4 {
        for col in 0..5 {
            let mut acc = 0.0f32;
            for k in 0..4 {
                acc += after[row * 5 + k] * before[k * 5 + col];
            }
            // The implicit fifth input row is [0 0 0 0 1].
            if col == 4 {
                acc += after[row * 5 + 4];
            }
            out[row * 5 + col] = acc;
        }
    }
    out
}

/// A spatial pass that cannot be folded into the color matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpatialPass {
    /// Gaussian blur; radius in logical units.
    Blur {
        /// Blur radius before output scaling.
        radius: f32,
    },
    /// Tile quantization; tile edge in logical units.
    Pixelate {
        /// Tile edge before output scaling.
        tile: u32,
    },
}

/// Normalized form of a filter chain, ready to run over a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterPipeline {
    /// All matrix-expressible ops composed into one pass, if any.
    pub matrix: Option<[f32; 20]>,
    /// Spatial passes in source order.
    pub passes: Vec<SpatialPass>,
}

impl FilterPipeline {
    /// Normalize parsed ops.
    pub fn from_ops(ops: &[FilterOp]) -> Self {
        let mut matrix: Option<[f32; 20]> = None;
        let mut passes = Vec::new();
        for op in ops {
            let m = match op {
                FilterOp::Grayscale(t) => grayscale_matrix(*t),
                FilterOp::Sepia(t) => sepia_matrix(*t),
                FilterOp::Saturate(s) => saturate_matrix(*s),
                FilterOp::HueRotate(d) => hue_rotate_matrix(*d),
                FilterOp::Contrast(c) => contrast_matrix(*c),
                FilterOp::Brightness(b) => brightness_matrix(*b),
                FilterOp::Invert(t) => invert_matrix(*t),
                FilterOp::Opacity(t) => opacity_matrix(*t),
                FilterOp::Blur(radius) => {
                    passes.push(SpatialPass::Blur { radius: *radius });
                    continue;
                }
                FilterOp::Pixelate(tile) => {
                    passes.push(SpatialPass::Pixelate { tile: *tile });
                    continue;
                }
            };
            matrix = Some(match matrix {
                Some(prev) => mat_compose(&m, &prev),
                None => m,
            });
        }
        Self { matrix, passes }
    }

    /// Parse and normalize an expression string.
    pub fn from_expr(expr: &str) -> EngineResult<Self> {
        Ok(Self::from_ops(&parse_filter_expr(expr)?))
    }

    /// Nothing to do.
    pub fn is_empty(&self) -> bool {
        self.matrix.is_none() && self.passes.is_empty()
    }

    /// Run the pipeline over a premultiplied RGBA8 buffer. `scale` converts
    /// logical blur/pixelate extents to device pixels.
    pub fn apply(&self, buf: &mut [u8], width: u32, height: u32, scale: f64) -> EngineResult<()> {
        if let Some(m) = &self.matrix {
            raster::color_matrix_rgba8_premul(buf, m);
        }
        for pass in &self.passes {
            match pass {
                SpatialPass::Blur { radius } => {
                    let radius_px = ((f64::from(*radius) * scale).round() as u32).min(64);
                    if radius_px == 0 {
                        continue;
                    }
                    let sigma = radius_px as f32 / 2.0;
                    let kernel = raster::gaussian_kernel_q16(radius_px, sigma)?;
                    let mut dst = vec![0u8; buf.len()];
                    let mut tmp = vec![0u8; buf.len()];
                    raster::blur_rgba8_premul_q16(buf, &mut dst, &mut tmp, width, height, &kernel);
                    buf.copy_from_slice(&dst);
                }
                SpatialPass::Pixelate { tile } => {
                    let tile_px = ((f64::from(*tile) * scale).round() as u32).max(1);
                    raster::pixelate_rgba8_premul(buf, width, height, tile_px);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/filters.rs"]
mod tests;
