use super::*;

#[test]
fn hex_parse_six_digit() {
    let c = Rgba8Premul::from_hex("#fad205").unwrap();
    assert_eq!((c.r, c.g, c.b, c.a), (0xfa, 0xd2, 0x05, 255));
}

#[test]
fn hex_parse_three_digit_expands() {
    let c = Rgba8Premul::from_hex("#f0a").unwrap();
    assert_eq!((c.r, c.g, c.b), (0xff, 0x00, 0xaa));
}

#[test]
fn hex_parse_rejects_garbage() {
    assert!(Rgba8Premul::from_hex("#12345").is_err());
    assert!(Rgba8Premul::from_hex("fuchsia").is_err());
    assert!(Rgba8Premul::from_hex("#gg0000").is_err());
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let c = Rgba8Premul::from_straight_rgba(200, 100, 50, 128);
    let [r, g, b, a] = c.to_straight_rgba();
    assert_eq!(a, 128);
    assert!((i16::from(r) - 200).abs() <= 1);
    assert!((i16::from(g) - 100).abs() <= 1);
    assert!((i16::from(b) - 50).abs() <= 1);
}

#[test]
fn zero_alpha_unpremultiplies_to_zero() {
    let c = Rgba8Premul::transparent();
    assert_eq!(c.to_straight_rgba(), [0, 0, 0, 0]);
}

#[test]
fn lerp_endpoints_and_clamp() {
    let a = Rgba8Premul::from_hex("#000000").unwrap();
    let b = Rgba8Premul::from_hex("#ffffff").unwrap();
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 2.0), b);
    assert_eq!(a.lerp(b, -1.0), a);
    let mid = a.lerp(b, 0.5);
    assert!((i16::from(mid.r) - 128).abs() <= 1);
}

#[test]
fn frame_pixel_access_and_bounds() {
    let frame = FrameRgba {
        width: 2,
        height: 2,
        data: vec![
            1, 2, 3, 4, 5, 6, 7, 8, //
            9, 10, 11, 12, 13, 14, 15, 16,
        ],
    };
    let p = frame.pixel(1, 0).unwrap();
    assert_eq!((p.r, p.g, p.b, p.a), (5, 6, 7, 8));
    let p = frame.pixel(0, 1).unwrap();
    assert_eq!((p.r, p.g, p.b, p.a), (9, 10, 11, 12));
    assert!(frame.pixel(2, 0).is_err());
    assert!(frame.pixel(0, 2).is_err());
}
