//! Procedural border outlines.
//!
//! Strokes are expanded to fill paths on the CPU with [`kurbo::stroke`] so the
//! rasterizer only ever sees plain fills. All geometry is in logical 512-space;
//! the compositor applies the output scale transform.

use kurbo::{BezPath, Cap, Circle, Join, Point, Rect, Shape, Stroke, StrokeOpts};

use crate::catalog::model::BorderStyle;
use crate::foundation::core::{LOGICAL_SIZE, ShapeMode};

const STROKE_TOL: f64 = 0.25;

// Zero-length dash segments degenerate in the expander; a hair of on-length
// with round caps still reads as a dot.
const DOT_EPSILON: f64 = 0.01;

const JAGGED_SPIKES: usize = 60;

/// A border reduced to fill geometry.
#[derive(Clone, Debug)]
pub(crate) struct BorderPaint {
    /// Paths to fill with the border color, in order.
    pub fills: Vec<BezPath>,
    /// Glow layer drawn under the fills (neon style).
    pub glow: Option<Glow>,
}

/// A blurred under-layer for the neon style.
#[derive(Clone, Debug)]
pub(crate) struct Glow {
    /// Path filled with the border color before blurring.
    pub path: BezPath,
    /// Gaussian blur radius in logical units.
    pub radius: f64,
}

/// The ring path the clip shape implies, offset inward by `inset`.
fn ring(shape: ShapeMode, inset: f64) -> BezPath {
    let half = LOGICAL_SIZE / 2.0;
    match shape {
        ShapeMode::Circle => Circle::new(Point::new(half, half), half - inset).to_path(STROKE_TOL),
        ShapeMode::Square => Rect::new(inset, inset, LOGICAL_SIZE - inset, LOGICAL_SIZE - inset)
            .to_path(STROKE_TOL),
    }
}

fn stroke_style(shape: ShapeMode, width: f64) -> Stroke {
    let (cap, join) = match shape {
        ShapeMode::Circle => (Cap::Round, Join::Round),
        ShapeMode::Square => (Cap::Square, Join::Miter),
    };
    Stroke::new(width).with_caps(cap).with_join(join)
}

fn expand(path: &BezPath, style: &Stroke) -> BezPath {
    kurbo::stroke(path.iter(), style, &StrokeOpts::default(), STROKE_TOL)
}

fn jagged_ring(width: f64) -> BezPath {
    let half = LOGICAL_SIZE / 2.0;
    let outer_r = half - width;
    let inner_r = outer_r - width;
    let step = std::f64::consts::TAU / JAGGED_SPIKES as f64;
    let mut path = BezPath::new();
    for i in 0..JAGGED_SPIKES {
        let angle = i as f64 * step;
        let outer = Point::new(half + angle.cos() * outer_r, half + angle.sin() * outer_r);
        let mid = angle + step / 2.0;
        let inner = Point::new(half + mid.cos() * inner_r, half + mid.sin() * inner_r);
        if i == 0 {
            path.move_to(outer);
        } else {
            path.line_to(outer);
        }
        path.line_to(inner);
    }
    path.close_path();
    path
}

/// Build the fill geometry for a border.
pub(crate) fn border_paths(shape: ShapeMode, style: BorderStyle, width: f64) -> BorderPaint {
    let centered = ring(shape, width / 2.0);
    let plain = stroke_style(shape, width);

    match style {
        BorderStyle::Solid | BorderStyle::Ridge | BorderStyle::Inset | BorderStyle::Groove => {
            BorderPaint {
                fills: vec![expand(&centered, &plain)],
                glow: None,
            }
        }
        BorderStyle::Dashed => BorderPaint {
            fills: vec![expand(
                &centered,
                &plain.with_dashes(0.0, [width * 3.0, width * 1.5]),
            )],
            glow: None,
        },
        BorderStyle::Dotted => {
            let dotted = stroke_style(ShapeMode::Circle, width)
                .with_dashes(0.0, [DOT_EPSILON, width * 2.0]);
            BorderPaint {
                fills: vec![expand(&centered, &dotted)],
                glow: None,
            }
        }
        BorderStyle::Double => {
            let thin = stroke_style(shape, width / 2.0);
            BorderPaint {
                fills: vec![
                    expand(&ring(shape, width / 4.0), &thin),
                    expand(&ring(shape, width * 1.5), &thin),
                ],
                glow: None,
            }
        }
        BorderStyle::Neon => {
            let fill = expand(&centered, &plain);
            BorderPaint {
                glow: Some(Glow {
                    path: fill.clone(),
                    radius: width + 10.0,
                }),
                fills: vec![fill],
            }
        }
        BorderStyle::Jagged => match shape {
            ShapeMode::Circle => BorderPaint {
                fills: vec![expand(&jagged_ring(width), &plain)],
                glow: None,
            },
            ShapeMode::Square => BorderPaint {
                fills: vec![expand(&centered, &plain.with_dashes(0.0, [width, width]))],
                glow: None,
            },
        },
        BorderStyle::Wave => BorderPaint {
            fills: vec![expand(
                &centered,
                &plain.with_dashes(0.0, [width * 2.0, width]),
            )],
            glow: None,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/border.rs"]
mod tests;
