//! Pixel kernels over premultiplied RGBA8 buffers.
//!
//! Everything here operates on raw `&[u8]` rows to stay allocation-free in
//! the inner loops; the compositor owns the buffers and their dimensions.

use crate::foundation::error::{EngineError, EngineResult};

#[inline]
pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    (((x * y) + 127) / 255) as u8
}

#[inline]
fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Source-over composite `src` onto `dst`, both premultiplied RGBA8.
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> EngineResult<()> {
    if dst.len() != src.len() || dst.len() % 4 != 0 {
        return Err(EngineError::render(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3] as u16;
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = add_sat_u8(sa as u8, mul_div255_u8(d[3] as u16, inv));
        for c in 0..3 {
            let dc = mul_div255_u8(d[c] as u16, inv);
            d[c] = add_sat_u8(s[c], dc);
        }
    }
    Ok(())
}

/// Multiply every channel of `buf` by the mask's alpha channel in place.
pub(crate) fn mask_apply_rgba8_premul(buf: &mut [u8], mask: &[u8]) -> EngineResult<()> {
    if buf.len() != mask.len() || buf.len() % 4 != 0 {
        return Err(EngineError::render(
            "mask_apply_rgba8_premul expects equal-length rgba8 buffers",
        ));
    }
    for (d, m) in buf.chunks_exact_mut(4).zip(mask.chunks_exact(4)) {
        let w = u16::from(m[3]);
        if w == 255 {
            continue;
        }
        d[0] = mul_div255_u8(u16::from(d[0]), w);
        d[1] = mul_div255_u8(u16::from(d[1]), w);
        d[2] = mul_div255_u8(u16::from(d[2]), w);
        d[3] = mul_div255_u8(u16::from(d[3]), w);
    }
    Ok(())
}

/// Apply a 5x4 color matrix (straight-alpha semantics) to a premultiplied
/// buffer in place.
///
/// Layout is row-major `[r', g', b', a']` rows of `[r g b a 1]` coefficients,
/// the SVG `feColorMatrix` convention. Pixels are unpremultiplied for the
/// matrix and re-premultiplied on the way out.
pub(crate) fn color_matrix_rgba8_premul(buf: &mut [u8], m: &[f32; 20]) {
    for px in buf.chunks_exact_mut(4) {
        let pa = px[3] as f32 / 255.0;
        let inv_a = if pa > 0.0 { 1.0 / pa } else { 0.0 };
        let r = px[0] as f32 / 255.0 * inv_a;
        let g = px[1] as f32 / 255.0 * inv_a;
        let b = px[2] as f32 / 255.0 * inv_a;
        let a = pa;

        let out_r = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        let out_g = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        let out_b = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        let out_a = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);

        px[0] = (out_r * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        px[1] = (out_g * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        px[2] = (out_b * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        px[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

/// Build a normalized gaussian kernel in Q16 fixed point.
///
/// The weights sum to exactly `1 << 16`; rounding drift is folded into the
/// center tap.
pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> EngineResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(EngineError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = (((wf / sum) * 65536.0).round() as i64).clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

#[inline]
fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

/// Separable gaussian blur, clamp-to-edge, premultiplied RGBA8.
///
/// `tmp` is caller-provided scratch of the same length as `src`.
pub(crate) fn blur_rgba8_premul_q16(
    src: &[u8],
    dst: &mut [u8],
    tmp: &mut [u8],
    width: u32,
    height: u32,
    kernel_q16: &[u32],
) {
    if kernel_q16.len() == 1 {
        dst.copy_from_slice(src);
        return;
    }
    horizontal_blur_q16(src, tmp, width, height, kernel_q16);
    vertical_blur_q16(tmp, dst, width, height, kernel_q16);
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dx = ki as i32 - radius;
                let sx = (x + dx).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dy = ki as i32 - radius;
                let sy = (y + dy).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

/// Quantize the buffer into `tile x tile` blocks, each painted with the color
/// sampled at its center texel, then grown to cover the whole block.
///
/// Sampling a representative texel instead of averaging keeps the hard
/// posterized look the 8-bit vibe wants.
pub(crate) fn pixelate_rgba8_premul(buf: &mut [u8], width: u32, height: u32, tile: u32) {
    if tile <= 1 {
        return;
    }
    let w = width as usize;
    let h = height as usize;
    let t = tile as usize;
    for by in (0..h).step_by(t) {
        for bx in (0..w).step_by(t) {
            let sx = (bx + t / 2).min(w - 1);
            let sy = (by + t / 2).min(h - 1);
            let src_idx = (sy * w + sx) * 4;
            let px = [
                buf[src_idx],
                buf[src_idx + 1],
                buf[src_idx + 2],
                buf[src_idx + 3],
            ];
            for y in by..(by + t).min(h) {
                for x in bx..(bx + t).min(w) {
                    let idx = (y * w + x) * 4;
                    buf[idx..idx + 4].copy_from_slice(&px);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
