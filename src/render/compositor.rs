//! The layer compositor.
//!
//! Rendering accumulates one layer at a time: each layer draws into a scratch
//! `vello_cpu` context, flushes to a scratch pixmap, and is source-over
//! composited onto the frame buffer. All geometry is emitted in logical
//! 512-space under a uniform scale transform, so a 512 preview and a 2048
//! export are the same picture at different densities.

use std::sync::Arc;

use kurbo::Shape;
use tracing::warn;

use crate::assets::store::{Sprite, SpriteCache, SpriteSource};
use crate::catalog::model::{
    BorderStyle, Catalog, CategoryRole, GradientGeometry, GradientSpec, Item, ItemKind,
};
use crate::foundation::core::{
    Affine, BezPath, Circle, FrameRgba, LOGICAL_SIZE, Point, Rect, Rgba8Premul, RoundedRect,
    ShapeMode,
};
use crate::foundation::error::{EngineError, EngineResult};
use crate::render::border::{self, BorderPaint};
use crate::render::filters::FilterPipeline;
use crate::render::raster;
use crate::render::text::{TextBrushRgba8, TextLayoutEngine};
use crate::state::machine::SelectionState;

/// Default preview resolution.
pub const PREVIEW_SIZE: u32 = 512;
/// Default export resolution.
pub const EXPORT_SIZE: u32 = 2048;

const BORDER_DEFAULT_WIDTH: f64 = 10.0;

const BUBBLE_SIZE: f64 = 70.0;
const BUBBLE_RADIUS: f64 = 18.0;
const BUBBLE_STROKE: f64 = 3.0;
const EMOJI_SIZE: f32 = 50.0;

/// How the custom background sentinel fills the backdrop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CustomBackgroundMode {
    /// Flat `color_a`.
    Solid,
    /// Top-to-bottom `color_a` to `color_b`.
    Linear,
    /// Centered `color_a` to `color_b`, fixed logical radius.
    Radial,
}

/// User parameters behind the catalog's custom-background sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CustomBackground {
    /// First (or only) color.
    pub color_a: Rgba8Premul,
    /// Second color for the gradient modes.
    pub color_b: Rgba8Premul,
    /// Fill mode.
    pub mode: CustomBackgroundMode,
}

impl Default for CustomBackground {
    fn default() -> Self {
        Self {
            color_a: Rgba8Premul {
                r: 0x7c,
                g: 0x3a,
                b: 0xed,
                a: 255,
            },
            color_b: Rgba8Premul {
                r: 0x1e,
                g: 0x3a,
                b: 0x8a,
                a: 255,
            },
            mode: CustomBackgroundMode::Linear,
        }
    }
}

const CUSTOM_RADIAL_RADIUS: f64 = 360.0;

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn paint_color(c: Rgba8Premul) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_straight_rgba();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> EngineResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| EngineError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| EngineError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(EngineError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn sprite_paint(sprite: &Sprite) -> EngineResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&sprite.data, sprite.width, sprite.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn sample_stops(stops: &[(f64, Rgba8Premul)], t: f64) -> Rgba8Premul {
    let Some(first) = stops.first() else {
        return Rgba8Premul::transparent();
    };
    if t <= first.0 {
        return first.1;
    }
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let span = t1 - t0;
            let local = if span > 0.0 { (t - t0) / span } else { 1.0 };
            return c0.lerp(c1, local);
        }
    }
    stops[stops.len() - 1].1
}

fn gradient_color(spec: &GradientSpec, lx: f64, ly: f64) -> Rgba8Premul {
    let t = match spec.geometry {
        GradientGeometry::Linear { x0, y0, x1, y1 } => {
            let dx = x1 - x0;
            let dy = y1 - y0;
            let len2 = dx * dx + dy * dy;
            if len2 <= 0.0 {
                0.0
            } else {
                (((lx - x0) * dx + (ly - y0) * dy) / len2).clamp(0.0, 1.0)
            }
        }
        GradientGeometry::Radial { cx, cy, r0, r1 } => {
            let d = ((lx - cx).powi(2) + (ly - cy).powi(2)).sqrt();
            let span = r1 - r0;
            if span <= 0.0 {
                1.0
            } else {
                ((d - r0) / span).clamp(0.0, 1.0)
            }
        }
    };
    sample_stops(&spec.stops, t)
}

/// Rasterize a gradient over the whole frame at device resolution.
fn rasterize_gradient(spec: &GradientSpec, size: u32, scale: f64, out: &mut [u8]) {
    let inv = 1.0 / scale;
    for y in 0..size {
        let ly = (f64::from(y) + 0.5) * inv;
        for x in 0..size {
            let lx = (f64::from(x) + 0.5) * inv;
            let c = gradient_color(spec, lx, ly);
            let idx = ((y as usize) * (size as usize) + (x as usize)) * 4;
            out[idx] = c.r;
            out[idx + 1] = c.g;
            out[idx + 2] = c.b;
            out[idx + 3] = c.a;
        }
    }
}

fn custom_gradient_spec(custom: &CustomBackground) -> GradientSpec {
    let stops = vec![(0.0, custom.color_a), (1.0, custom.color_b)];
    let half = LOGICAL_SIZE / 2.0;
    match custom.mode {
        CustomBackgroundMode::Linear => GradientSpec {
            geometry: GradientGeometry::Linear {
                x0: 0.0,
                y0: 0.0,
                x1: 0.0,
                y1: LOGICAL_SIZE,
            },
            stops,
        },
        CustomBackgroundMode::Radial => GradientSpec {
            geometry: GradientGeometry::Radial {
                cx: half,
                cy: half,
                r0: 0.0,
                r1: CUSTOM_RADIAL_RADIUS,
            },
            stops,
        },
        CustomBackgroundMode::Solid => GradientSpec {
            geometry: GradientGeometry::Linear {
                x0: 0.0,
                y0: 0.0,
                x1: 0.0,
                y1: LOGICAL_SIZE,
            },
            stops: vec![(0.0, custom.color_a), (1.0, custom.color_a)],
        },
    }
}

/// CPU compositor with reusable scratch state.
pub struct Compositor {
    sprites: SpriteCache,
    ctx: Option<vello_cpu::RenderContext>,
    text_engine: TextLayoutEngine,
    font_bytes: Option<Vec<u8>>,
}

impl Compositor {
    /// Build a compositor drawing sprites from `source`.
    pub fn new(source: Box<dyn SpriteSource>) -> Self {
        Self {
            sprites: SpriteCache::new(source),
            ctx: None,
            text_engine: TextLayoutEngine::new(),
            font_bytes: None,
        }
    }

    /// Provide font bytes for speech-bubble glyphs. Without a font the bubble
    /// still renders, just empty.
    pub fn set_font_bytes(&mut self, bytes: Vec<u8>) {
        self.font_bytes = Some(bytes);
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> EngineResult<R>,
    ) -> EngineResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    // Accumulation draw: `vello_cpu` renders into a fresh buffer, so each
    // layer renders into a scratch pixmap and premul-overs onto the frame.
    fn draw_layer(
        &mut self,
        size: u16,
        base: &mut [u8],
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> EngineResult<()>,
    ) -> EngineResult<()> {
        let mut scratch = vello_cpu::Pixmap::new(size, size);
        self.with_ctx_mut(size, size, |this, ctx| {
            f(this, ctx)?;
            ctx.flush();
            ctx.render_to_pixmap(&mut scratch);
            Ok(())
        })?;
        raster::premul_over_in_place(base, scratch.data_as_u8_slice())
    }

    fn draw_sprite_layer(
        &mut self,
        size: u16,
        scale: f64,
        base: &mut [u8],
        item_id: &str,
        source: &str,
    ) -> EngineResult<()> {
        let Some(sprite) = self.sprites.get(item_id, source) else {
            return Ok(());
        };
        if sprite.width == 0 || sprite.height == 0 {
            warn!(item_id, "sprite has zero extent, skipping layer");
            return Ok(());
        }
        let paint = sprite_paint(&sprite)?;
        let to_logical = Affine::scale_non_uniform(
            LOGICAL_SIZE / f64::from(sprite.width),
            LOGICAL_SIZE / f64::from(sprite.height),
        );
        let transform = Affine::scale(scale) * to_logical;
        let (w, h) = (f64::from(sprite.width), f64::from(sprite.height));
        self.draw_layer(size, base, |_, ctx| {
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            Ok(())
        })
    }

    fn draw_fill_layer(
        &mut self,
        size: u16,
        scale: f64,
        base: &mut [u8],
        color: Rgba8Premul,
        path: &BezPath,
    ) -> EngineResult<()> {
        let cpu_path = bezpath_to_cpu(path);
        self.draw_layer(size, base, |_, ctx| {
            ctx.set_transform(affine_to_cpu(Affine::scale(scale)));
            ctx.set_paint(paint_color(color));
            ctx.fill_path(&cpu_path);
            Ok(())
        })
    }

    fn draw_border(
        &mut self,
        size: u16,
        scale: f64,
        base: &mut [u8],
        shape: ShapeMode,
        color: Rgba8Premul,
        style: BorderStyle,
        width: f64,
    ) -> EngineResult<()> {
        let BorderPaint { fills, glow } = border::border_paths(shape, style, width);

        if let Some(glow) = glow {
            let mut layer = vec![0u8; base.len()];
            let mut scratch = vello_cpu::Pixmap::new(size, size);
            let cpu_path = bezpath_to_cpu(&glow.path);
            self.with_ctx_mut(size, size, |_, ctx| {
                ctx.set_transform(affine_to_cpu(Affine::scale(scale)));
                ctx.set_paint(paint_color(color));
                ctx.fill_path(&cpu_path);
                ctx.flush();
                ctx.render_to_pixmap(&mut scratch);
                Ok(())
            })?;
            let radius_px = ((glow.radius * scale).round() as u32).min(128);
            let kernel = raster::gaussian_kernel_q16(radius_px, radius_px as f32 / 2.0)?;
            let mut tmp = vec![0u8; base.len()];
            raster::blur_rgba8_premul_q16(
                scratch.data_as_u8_slice(),
                &mut layer,
                &mut tmp,
                u32::from(size),
                u32::from(size),
                &kernel,
            );
            raster::premul_over_in_place(base, &layer)?;
        }

        for fill in &fills {
            self.draw_fill_layer(size, scale, base, color, fill)?;
        }
        Ok(())
    }

    fn draw_speech_bubble(
        &mut self,
        size: u16,
        scale: f64,
        base: &mut [u8],
        shape: ShapeMode,
        emoji: &str,
        caption: &str,
    ) -> EngineResult<()> {
        // The circle clip eats the square-anchor corner, so the bubble sits
        // further in on circular avatars.
        let (bx, by) = match shape {
            ShapeMode::Square => (420.0, 260.0),
            ShapeMode::Circle => (390.0, 240.0),
        };

        let bubble = RoundedRect::new(bx, by, bx + BUBBLE_SIZE, by + BUBBLE_SIZE, BUBBLE_RADIUS);
        let mut pointer = BezPath::new();
        pointer.move_to(Point::new(bx + 15.0, by + BUBBLE_SIZE));
        pointer.line_to(Point::new(bx, by + BUBBLE_SIZE + 12.0));
        pointer.line_to(Point::new(bx + 30.0, by + BUBBLE_SIZE));
        pointer.close_path();

        let white = Rgba8Premul::from_hex("#ffffff")?;
        let black = Rgba8Premul::from_hex("#000000")?;

        let outline = kurbo::stroke(
            bubble.path_elements(0.1),
            &kurbo::Stroke::new(BUBBLE_STROKE),
            &kurbo::StrokeOpts::default(),
            0.1,
        );

        self.draw_fill_layer(size, scale, base, white, &bubble.to_path(0.1))?;
        self.draw_fill_layer(size, scale, base, black, &outline)?;
        self.draw_fill_layer(size, scale, base, white, &pointer)?;

        let glyph_text = if emoji.is_empty() { caption } else { emoji };
        if glyph_text.is_empty() {
            return Ok(());
        }
        let Some(font_bytes) = self.font_bytes.clone() else {
            warn!("no speech font configured, rendering empty bubble");
            return Ok(());
        };
        let prepared = match self.text_engine.layout_plain(
            glyph_text,
            &font_bytes,
            EMOJI_SIZE,
            TextBrushRgba8 {
                r: 0,
                g: 0,
                b: 0,
                a: 255,
            },
        ) {
            Ok(p) => p,
            Err(err) => {
                warn!(%err, "speech font failed to shape, rendering empty bubble");
                return Ok(());
            }
        };

        let tx = bx + (BUBBLE_SIZE - f64::from(prepared.width())) / 2.0;
        let ty = by + (BUBBLE_SIZE - f64::from(prepared.height())) / 2.0;
        let transform = Affine::scale(scale) * Affine::translate((tx, ty));
        self.draw_layer(size, base, |_, ctx| {
            ctx.set_transform(affine_to_cpu(transform));
            for line in prepared.layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&prepared.font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
            Ok(())
        })
    }

    fn render_mask(&mut self, size: u16, scale: f64) -> EngineResult<vello_cpu::Pixmap> {
        let half = LOGICAL_SIZE / 2.0;
        let circle = Circle::new(Point::new(half, half), half).to_path(0.1);
        let cpu_path = bezpath_to_cpu(&circle);
        let mut mask = vello_cpu::Pixmap::new(size, size);
        self.with_ctx_mut(size, size, |_, ctx| {
            ctx.set_transform(affine_to_cpu(Affine::scale(scale)));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            ctx.fill_path(&cpu_path);
            ctx.flush();
            ctx.render_to_pixmap(&mut mask);
            Ok(())
        })?;
        Ok(mask)
    }

    fn placeholder_path(category_id: &str, draw_order: i32) -> BezPath {
        let over = i32::max(draw_order - 20, 0) as f64;
        let shrink = (over * 2.0).min(260.0);
        let size = 300.0 - shrink;
        let offset = (LOGICAL_SIZE - size) / 2.0;
        if category_id == "glasses" {
            Rect::new(offset, offset, offset + size, offset + size / 3.0 + 20.0).to_path(0.1)
        } else {
            RoundedRect::new(offset, offset, offset + size, offset + size, 20.0).to_path(0.1)
        }
    }

    fn resolve_border_inputs(
        &self,
        catalog: &Catalog,
        state: &SelectionState,
    ) -> EngineResult<(BorderStyle, f64)> {
        let style = match catalog.category_by_role(CategoryRole::BorderStyle) {
            Ok(cat) => match &state.selected_item(catalog, &cat.id)?.kind {
                ItemKind::BorderStyle(s) => *s,
                _ => BorderStyle::Solid,
            },
            Err(_) => BorderStyle::Solid,
        };
        let width = match catalog.category_by_role(CategoryRole::BorderWidth) {
            Ok(cat) => match &state.selected_item(catalog, &cat.id)?.kind {
                ItemKind::BorderWidth(w) => *w,
                _ => BORDER_DEFAULT_WIDTH,
            },
            Err(_) => BORDER_DEFAULT_WIDTH,
        };
        Ok((style, width))
    }

    /// Compose the avatar described by `state` at `target_size` pixels.
    ///
    /// Per-layer failures (missing sprites, bad filter expressions) degrade
    /// to skipped layers; only surface allocation and geometry validation
    /// fail the whole render.
    #[tracing::instrument(skip(self, catalog, state, custom))]
    pub fn render(
        &mut self,
        catalog: &Catalog,
        state: &SelectionState,
        custom: &CustomBackground,
        shape: ShapeMode,
        target_size: u32,
    ) -> EngineResult<FrameRgba> {
        if target_size == 0 {
            return Err(EngineError::render("target size must be at least 1"));
        }
        let size: u16 = target_size
            .try_into()
            .map_err(|_| EngineError::render("target size exceeds u16 addressing"))?;
        let scale = f64::from(target_size) / LOGICAL_SIZE;
        let px = target_size as usize;
        let mut base = vec![0u8; px * px * 4];

        let mut vibe: Option<FilterPipeline> = None;

        for cat in catalog.draw_sorted() {
            let item = state.selected_item(catalog, &cat.id)?;

            match cat.role {
                CategoryRole::Background => {
                    self.draw_background(size, scale, &mut base, item, custom)?;
                }
                CategoryRole::BorderColor => {
                    let color = match &item.kind {
                        ItemKind::Color(c) => *c,
                        _ => continue,
                    };
                    let (style, width) = self.resolve_border_inputs(catalog, state)?;
                    self.draw_border(size, scale, &mut base, shape, color, style, width)?;
                }
                CategoryRole::BorderStyle | CategoryRole::BorderWidth => {}
                CategoryRole::Speech => {
                    if let ItemKind::Text { caption, emoji } = &item.kind {
                        self.draw_speech_bubble(size, scale, &mut base, shape, emoji, caption)?;
                    }
                }
                CategoryRole::Vibe => {
                    if let ItemKind::Filter { expr } = &item.kind {
                        match FilterPipeline::from_expr(expr) {
                            Ok(pipeline) if !pipeline.is_empty() => vibe = Some(pipeline),
                            Ok(_) => {}
                            Err(err) => {
                                warn!(item_id = %item.id, %err, "bad filter expression, skipping vibe");
                            }
                        }
                    }
                }
                CategoryRole::Body | CategoryRole::Accessory | CategoryRole::Costume => {
                    match &item.kind {
                        ItemKind::Image { source } => {
                            self.draw_sprite_layer(size, scale, &mut base, &item.id, source)?;
                        }
                        ItemKind::Color(c) => {
                            let path = Self::placeholder_path(&cat.id, cat.draw_order);
                            self.draw_fill_layer(size, scale, &mut base, *c, &path)?;
                        }
                        _ => {}
                    }
                }
            }
        }

        if shape == ShapeMode::Circle {
            let mask = self.render_mask(size, scale)?;
            raster::mask_apply_rgba8_premul(&mut base, mask.data_as_u8_slice())?;
        }

        if let Some(pipeline) = vibe {
            pipeline.apply(&mut base, target_size, target_size, scale)?;
            // Spatial passes bleed across the clip edge; re-mask.
            if shape == ShapeMode::Circle && !pipeline.passes.is_empty() {
                let mask = self.render_mask(size, scale)?;
                raster::mask_apply_rgba8_premul(&mut base, mask.data_as_u8_slice())?;
            }
        }

        Ok(FrameRgba {
            width: target_size,
            height: target_size,
            data: base,
        })
    }

    fn draw_background(
        &mut self,
        size: u16,
        scale: f64,
        base: &mut [u8],
        item: &Item,
        custom: &CustomBackground,
    ) -> EngineResult<()> {
        match &item.kind {
            ItemKind::Color(c) => {
                let full = Rect::new(0.0, 0.0, LOGICAL_SIZE, LOGICAL_SIZE).to_path(0.1);
                self.draw_fill_layer(size, scale, base, *c, &full)
            }
            ItemKind::Gradient(spec) => {
                let mut layer = vec![0u8; base.len()];
                rasterize_gradient(spec, u32::from(size), scale, &mut layer);
                raster::premul_over_in_place(base, &layer)
            }
            ItemKind::Custom => {
                let spec = custom_gradient_spec(custom);
                let mut layer = vec![0u8; base.len()];
                rasterize_gradient(&spec, u32::from(size), scale, &mut layer);
                raster::premul_over_in_place(base, &layer)
            }
            ItemKind::None => Ok(()),
            other => {
                warn!(kind = ?other, "background item kind has no fill, skipping");
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("sprites", &self.sprites)
            .field("has_font", &self.font_bytes.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
