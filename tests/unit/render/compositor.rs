use super::*;
use crate::catalog::model::Category;

struct NoSprites;

impl SpriteSource for NoSprites {
    fn fetch(&self, source: &str) -> EngineResult<Vec<u8>> {
        Err(EngineError::asset_load(format!("no sprite '{source}'")))
    }
}

fn solid(hex: &str) -> ItemKind {
    ItemKind::Color(Rgba8Premul::from_hex(hex).unwrap())
}

fn tiny_catalog(background_kind: ItemKind) -> Catalog {
    Catalog::new(vec![
        Category {
            id: "background".into(),
            label: "Background".into(),
            draw_order: 0,
            role: CategoryRole::Background,
            items: vec![Item::new("bg", "Plain", background_kind)],
        },
        Category {
            id: "body".into(),
            label: "Body".into(),
            draw_order: 20,
            role: CategoryRole::Body,
            items: vec![Item::new("body_none", "None", ItemKind::None).hidden()],
        },
        Category {
            id: "costume".into(),
            label: "Costume".into(),
            draw_order: 75,
            role: CategoryRole::Costume,
            items: vec![Item::new("costume_none", "None", ItemKind::None)],
        },
    ])
    .unwrap()
}

fn pixel(frame: &FrameRgba, x: u32, y: u32) -> [u8; 4] {
    let idx = ((y * frame.width + x) * 4) as usize;
    frame.data[idx..idx + 4].try_into().unwrap()
}

#[test]
fn custom_background_defaults_to_a_violet_navy_linear() {
    let custom = CustomBackground::default();
    assert_eq!(custom.mode, CustomBackgroundMode::Linear);
    assert_eq!(custom.color_a, Rgba8Premul::from_hex("#7c3aed").unwrap());
    assert_eq!(custom.color_b, Rgba8Premul::from_hex("#1e3a8a").unwrap());
}

#[test]
fn sample_stops_clamps_and_interpolates() {
    let black = Rgba8Premul::from_hex("#000000").unwrap();
    let white = Rgba8Premul::from_hex("#ffffff").unwrap();
    let stops = vec![(0.0, black), (1.0, white)];

    assert_eq!(sample_stops(&stops, -0.5), black);
    assert_eq!(sample_stops(&stops, 1.5), white);
    let mid = sample_stops(&stops, 0.5);
    assert!((i16::from(mid.r) - 128).abs() <= 1);

    assert_eq!(sample_stops(&[], 0.5), Rgba8Premul::transparent());
}

#[test]
fn gradient_color_projects_onto_the_axis() {
    let black = Rgba8Premul::from_hex("#000000").unwrap();
    let white = Rgba8Premul::from_hex("#ffffff").unwrap();
    let spec = GradientSpec {
        geometry: GradientGeometry::Linear {
            x0: 0.0,
            y0: 0.0,
            x1: 0.0,
            y1: LOGICAL_SIZE,
        },
        stops: vec![(0.0, black), (1.0, white)],
    };
    assert_eq!(gradient_color(&spec, 400.0, 0.0), black);
    assert_eq!(gradient_color(&spec, 10.0, LOGICAL_SIZE), white);
    let mid = gradient_color(&spec, 256.0, 256.0);
    assert!((i16::from(mid.g) - 128).abs() <= 1);
}

#[test]
fn radial_gradient_saturates_past_the_outer_radius() {
    let a = Rgba8Premul::from_hex("#ff0000").unwrap();
    let b = Rgba8Premul::from_hex("#0000ff").unwrap();
    let spec = GradientSpec {
        geometry: GradientGeometry::Radial {
            cx: 256.0,
            cy: 256.0,
            r0: 0.0,
            r1: 100.0,
        },
        stops: vec![(0.0, a), (1.0, b)],
    };
    assert_eq!(gradient_color(&spec, 256.0, 256.0), a);
    assert_eq!(gradient_color(&spec, 0.0, 0.0), b);
}

#[test]
fn custom_spec_covers_all_three_modes() {
    let custom = CustomBackground::default();

    let linear = custom_gradient_spec(&CustomBackground {
        mode: CustomBackgroundMode::Linear,
        ..custom
    });
    assert_eq!(
        linear.geometry,
        GradientGeometry::Linear {
            x0: 0.0,
            y0: 0.0,
            x1: 0.0,
            y1: LOGICAL_SIZE
        }
    );

    let radial = custom_gradient_spec(&CustomBackground {
        mode: CustomBackgroundMode::Radial,
        ..custom
    });
    assert_eq!(
        radial.geometry,
        GradientGeometry::Radial {
            cx: 256.0,
            cy: 256.0,
            r0: 0.0,
            r1: 360.0
        }
    );

    let solid = custom_gradient_spec(&CustomBackground {
        mode: CustomBackgroundMode::Solid,
        ..custom
    });
    assert_eq!(solid.stops[0].1, solid.stops[1].1);
}

#[test]
fn placeholder_shrinks_with_draw_order() {
    let eyes = Compositor::placeholder_path("eyes", 25);
    let hat = Compositor::placeholder_path("hat", 50);
    let eyes_box = eyes.bounding_box();
    let hat_box = hat.bounding_box();
    assert!(eyes_box.width() > hat_box.width());
    // Both stay centered.
    assert!((eyes_box.center().x - 256.0).abs() < 0.5);
    assert!((hat_box.center().x - 256.0).abs() < 0.5);
}

#[test]
fn glasses_placeholder_is_a_wide_band() {
    let glasses = Compositor::placeholder_path("glasses", 40);
    let bbox = glasses.bounding_box();
    assert!(bbox.width() > bbox.height() * 2.0);
}

#[test]
fn solid_background_fills_the_square_frame() {
    let catalog = tiny_catalog(solid("#ff0000"));
    let state = SelectionState::initial(&catalog);
    let mut compositor = Compositor::new(Box::new(NoSprites));
    let frame = compositor
        .render(
            &catalog,
            &state,
            &CustomBackground::default(),
            ShapeMode::Square,
            16,
        )
        .unwrap();
    for (x, y) in [(0, 0), (8, 8), (15, 15)] {
        let [r, g, b, a] = pixel(&frame, x, y);
        assert!(r > 250 && g < 5 && b < 5 && a == 255, "at ({x},{y})");
    }
}

#[test]
fn circle_shape_clips_the_corners() {
    let catalog = tiny_catalog(solid("#00ff00"));
    let state = SelectionState::initial(&catalog);
    let mut compositor = Compositor::new(Box::new(NoSprites));
    let frame = compositor
        .render(
            &catalog,
            &state,
            &CustomBackground::default(),
            ShapeMode::Circle,
            64,
        )
        .unwrap();
    assert_eq!(pixel(&frame, 0, 0)[3], 0);
    assert_eq!(pixel(&frame, 63, 0)[3], 0);
    assert_eq!(pixel(&frame, 32, 32)[3], 255);
}

#[test]
fn missing_sprites_degrade_to_skipped_layers() {
    let mut catalog_cats = tiny_catalog(solid("#0000ff")).categories().to_vec();
    catalog_cats.push(Category {
        id: "hat".into(),
        label: "Hat".into(),
        draw_order: 50,
        role: CategoryRole::Accessory,
        items: vec![Item::new(
            "hat_1",
            "Cap",
            ItemKind::Image {
                source: "hat/cap.png".into(),
            },
        )],
    });
    let catalog = Catalog::new(catalog_cats).unwrap();
    let state = SelectionState::initial(&catalog);
    let mut compositor = Compositor::new(Box::new(NoSprites));
    let frame = compositor
        .render(
            &catalog,
            &state,
            &CustomBackground::default(),
            ShapeMode::Square,
            16,
        )
        .unwrap();
    // Background still lands even though the hat sprite never loads.
    let [_, _, b, a] = pixel(&frame, 8, 8);
    assert!(b > 250 && a == 255);
}

#[test]
fn unparseable_vibe_expression_is_skipped() {
    let mut cats = tiny_catalog(solid("#ff0000")).categories().to_vec();
    cats.push(Category {
        id: "vibe".into(),
        label: "Vibe".into(),
        draw_order: 100,
        role: CategoryRole::Vibe,
        items: vec![Item::new(
            "vibe_bad",
            "Sparkle",
            ItemKind::Filter {
                expr: "sparkle(2)".into(),
            },
        )],
    });
    let catalog = Catalog::new(cats).unwrap();
    let state = SelectionState::initial(&catalog);
    let mut compositor = Compositor::new(Box::new(NoSprites));
    let frame = compositor
        .render(
            &catalog,
            &state,
            &CustomBackground::default(),
            ShapeMode::Square,
            16,
        )
        .unwrap();
    // The backdrop lands unfiltered.
    let [r, _, _, a] = pixel(&frame, 8, 8);
    assert!(r > 250 && a == 255);
}

#[test]
fn render_rejects_degenerate_sizes() {
    let catalog = tiny_catalog(solid("#ffffff"));
    let state = SelectionState::initial(&catalog);
    let mut compositor = Compositor::new(Box::new(NoSprites));
    let custom = CustomBackground::default();
    assert!(
        compositor
            .render(&catalog, &state, &custom, ShapeMode::Square, 0)
            .is_err()
    );
    assert!(
        compositor
            .render(&catalog, &state, &custom, ShapeMode::Square, 100_000)
            .is_err()
    );
}
