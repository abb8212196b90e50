use super::*;

#[test]
fn premul_over_transparent_source_is_identity() {
    let mut dst = vec![10, 20, 30, 255, 0, 0, 0, 0];
    let src = vec![0u8; 8];
    premul_over_in_place(&mut dst, &src).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255, 0, 0, 0, 0]);
}

#[test]
fn premul_over_opaque_source_replaces() {
    let mut dst = vec![10, 20, 30, 255];
    let src = vec![100, 110, 120, 255];
    premul_over_in_place(&mut dst, &src).unwrap();
    assert_eq!(dst, vec![100, 110, 120, 255]);
}

#[test]
fn premul_over_blends_half_alpha() {
    let mut dst = vec![0, 0, 0, 255];
    // Premultiplied half-opaque white.
    let src = vec![128, 128, 128, 128];
    premul_over_in_place(&mut dst, &src).unwrap();
    assert_eq!(dst[3], 255);
    assert!((i16::from(dst[0]) - 128).abs() <= 1);
}

#[test]
fn premul_over_rejects_mismatched_lengths() {
    let mut dst = vec![0u8; 8];
    assert!(premul_over_in_place(&mut dst, &[0u8; 4]).is_err());
}

#[test]
fn mask_apply_scales_by_mask_alpha() {
    let mut buf = vec![200, 100, 50, 255, 200, 100, 50, 255];
    let mask = vec![0, 0, 0, 255, 0, 0, 0, 0];
    mask_apply_rgba8_premul(&mut buf, &mask).unwrap();
    assert_eq!(&buf[..4], &[200, 100, 50, 255]);
    assert_eq!(&buf[4..], &[0, 0, 0, 0]);
}

#[test]
fn color_matrix_identity_is_identity() {
    let identity: [f32; 20] = [
        1.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ];
    let mut buf = vec![120, 60, 30, 255, 64, 64, 64, 128];
    let expected = buf.clone();
    color_matrix_rgba8_premul(&mut buf, &identity);
    for (a, b) in buf.iter().zip(expected.iter()) {
        assert!((i16::from(*a) - i16::from(*b)).abs() <= 1);
    }
}

#[test]
fn color_matrix_zero_alpha_row_clears_pixels() {
    let mut m = [0.0f32; 20];
    m[0] = 1.0;
    m[6] = 1.0;
    m[12] = 1.0;
    // Alpha row all zero.
    let mut buf = vec![120, 60, 30, 255];
    color_matrix_rgba8_premul(&mut buf, &m);
    assert_eq!(buf, vec![0, 0, 0, 0]);
}

#[test]
fn gaussian_kernel_is_normalized() {
    let k = gaussian_kernel_q16(4, 2.0).unwrap();
    assert_eq!(k.len(), 9);
    assert_eq!(k.iter().map(|&w| u64::from(w)).sum::<u64>(), 1 << 16);
    // Symmetric around the center tap.
    assert_eq!(k[0], k[8]);
    assert!(k[4] >= k[3]);
}

#[test]
fn gaussian_kernel_zero_radius_is_passthrough() {
    let k = gaussian_kernel_q16(0, 1.0).unwrap();
    assert_eq!(k, vec![1 << 16]);
}

#[test]
fn gaussian_kernel_rejects_bad_sigma() {
    assert!(gaussian_kernel_q16(2, 0.0).is_err());
    assert!(gaussian_kernel_q16(2, f32::NAN).is_err());
}

#[test]
fn blur_preserves_solid_regions() {
    let (w, h) = (8u32, 8u32);
    let src = vec![100u8; (w * h * 4) as usize];
    let mut dst = vec![0u8; src.len()];
    let mut tmp = vec![0u8; src.len()];
    let k = gaussian_kernel_q16(2, 1.0).unwrap();
    blur_rgba8_premul_q16(&src, &mut dst, &mut tmp, w, h, &k);
    for &b in &dst {
        assert!((i16::from(b) - 100).abs() <= 1);
    }
}

#[test]
fn pixelate_fills_each_tile_with_its_center_sample() {
    let (w, h) = (4u32, 4u32);
    let mut buf = vec![0u8; (w * h * 4) as usize];
    // Center texel of the single 4x4 tile is (2, 2).
    let idx = ((2 * w + 2) * 4) as usize;
    buf[idx..idx + 4].copy_from_slice(&[9, 8, 7, 255]);
    pixelate_rgba8_premul(&mut buf, w, h, 4);
    for px in buf.chunks_exact(4) {
        assert_eq!(px, &[9, 8, 7, 255]);
    }
}

#[test]
fn pixelate_tile_one_is_a_noop() {
    let mut buf = vec![1, 2, 3, 4, 5, 6, 7, 8];
    let expected = buf.clone();
    pixelate_rgba8_premul(&mut buf, 2, 1, 1);
    assert_eq!(buf, expected);
}
