//! The stock cat-avatar catalog.
//!
//! Fourteen categories covering the full composition stack, from backdrop
//! fills through sprite layers to border and filter modifiers. Applications
//! with their own art can skip this module and build a [`Catalog`] directly.

use crate::catalog::model::{
    BorderStyle, Catalog, Category, CategoryRole, GradientGeometry, GradientSpec, Item, ItemKind,
};
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::EngineResult;

fn none_item(id: &str) -> Item {
    Item::new(id, "None", ItemKind::None)
}

fn color_item(id: &str, label: &str, hex: &str) -> EngineResult<Item> {
    Ok(Item::new(
        id,
        label,
        ItemKind::Color(Rgba8Premul::from_hex(hex)?),
    ))
}

fn image_item(id: &str, label: &str, source: &str) -> Item {
    Item::new(
        id,
        label,
        ItemKind::Image {
            source: source.into(),
        },
    )
}

fn filter_item(id: &str, label: &str, expr: &str) -> Item {
    Item::new(id, label, ItemKind::Filter { expr: expr.into() })
}

fn speech_item(id: &str, label: &str, caption: &str, emoji: &str) -> Item {
    Item::new(
        id,
        label,
        ItemKind::Text {
            caption: caption.into(),
            emoji: emoji.into(),
        },
    )
}

fn stops(pairs: &[(f64, &str)]) -> EngineResult<Vec<(f64, Rgba8Premul)>> {
    pairs
        .iter()
        .map(|(t, hex)| Ok((*t, Rgba8Premul::from_hex(hex)?)))
        .collect()
}

fn linear(
    id: &str,
    label: &str,
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    pairs: &[(f64, &str)],
) -> EngineResult<Item> {
    Ok(Item::new(
        id,
        label,
        ItemKind::Gradient(GradientSpec {
            geometry: GradientGeometry::Linear { x0, y0, x1, y1 },
            stops: stops(pairs)?,
        }),
    ))
}

fn radial(
    id: &str,
    label: &str,
    (cx, cy): (f64, f64),
    (r0, r1): (f64, f64),
    pairs: &[(f64, &str)],
) -> EngineResult<Item> {
    Ok(Item::new(
        id,
        label,
        ItemKind::Gradient(GradientSpec {
            geometry: GradientGeometry::Radial { cx, cy, r0, r1 },
            stops: stops(pairs)?,
        }),
    ))
}

fn background() -> EngineResult<Category> {
    Ok(Category {
        id: "background".into(),
        label: "Background".into(),
        draw_order: 10,
        role: CategoryRole::Background,
        items: vec![
            color_item("bg_1", "Midnight", "#18181c")?,
            color_item("bg_2", "Cat Yellow", "#fad205")?,
            color_item("bg_3", "Deep Blue", "#1e3a8a")?,
            color_item("bg_4", "Emerald", "#065f46")?,
            color_item("bg_5", "Purple Haze", "#581c87")?,
            color_item("bg_6", "Crimson", "#991b1b")?,
            color_item("bg_7", "Charcoal", "#374151")?,
            color_item("bg_8", "Teal", "#115e59")?,
            color_item("bg_9", "Burnt Orange", "#c2410c")?,
            color_item("bg_10", "Hot Pink", "#be185d")?,
            linear(
                "bg_grad_1",
                "Sunset Drive",
                (0.0, 0.0),
                (0.0, 512.0),
                &[(0.0, "#f97316"), (0.5, "#ec4899"), (1.0, "#8b5cf6")],
            )?,
            linear(
                "bg_grad_2",
                "Ocean Breeze",
                (0.0, 0.0),
                (512.0, 512.0),
                &[(0.0, "#06b6d4"), (0.5, "#3b82f6"), (1.0, "#1e3a8a")],
            )?,
            linear(
                "bg_grad_3",
                "Neon Cyber",
                (0.0, 0.0),
                (512.0, 512.0),
                &[(0.0, "#18181c"), (0.5, "#4c1d95"), (1.0, "#c026d3")],
            )?,
            radial(
                "bg_grad_4",
                "Golden Hour",
                (256.0, 256.0),
                (0.0, 360.0),
                &[(0.0, "#facc15"), (0.5, "#ca8a04"), (1.0, "#854d0e")],
            )?,
            linear(
                "bg_grad_5",
                "Forest Mist",
                (0.0, 512.0),
                (0.0, 0.0),
                &[(0.0, "#022c22"), (0.5, "#047857"), (1.0, "#34d399")],
            )?,
            linear(
                "bg_grad_6",
                "Cotton Candy",
                (0.0, 0.0),
                (512.0, 0.0),
                &[(0.0, "#f472b6"), (0.5, "#e879f9"), (1.0, "#a78bfa")],
            )?,
            linear(
                "bg_grad_7",
                "Midnight City",
                (0.0, 0.0),
                (0.0, 512.0),
                &[(0.0, "#000000"), (0.4, "#1e1b4b"), (1.0, "#312e81")],
            )?,
            radial(
                "bg_grad_8",
                "Lava Flow",
                (0.0, 0.0),
                (0.0, 724.0),
                &[(0.0, "#ef4444"), (0.4, "#991b1b"), (1.0, "#450a0a")],
            )?,
            Item::new("bg_custom", "Custom", ItemKind::Custom),
        ],
    })
}

fn body() -> Category {
    Category {
        id: "body".into(),
        label: "Body".into(),
        draw_order: 20,
        role: CategoryRole::Body,
        items: vec![
            none_item("body_none").hidden(),
            image_item("body_1", "Basic", "body/basic.png"),
            image_item("body_2", "Black", "body/black.png"),
            image_item("body_9", "Camo", "body/camo.png"),
            image_item("body_3", "Cheetah", "body/cheetah.png"),
            image_item("body_4", "Chrome", "body/chrome.png"),
            image_item("body_5", "Ghost", "body/ghost.png"),
            image_item("body_6", "Gold", "body/gold.png"),
            image_item("body_7", "Rainbow", "body/rainbow.png"),
            image_item("body_8", "Tiger", "body/tiger.png"),
            image_item("body_10", "Alien", "body/alien.png"),
            image_item("body_11", "Robot", "body/robot.png"),
            image_item("body_12", "Zombie", "body/zombie.png"),
        ],
    }
}

fn eyes() -> Category {
    Category {
        id: "eyes".into(),
        label: "Eyes".into(),
        draw_order: 25,
        role: CategoryRole::Accessory,
        items: vec![
            none_item("eyes_1"),
            image_item("eyes_2", "Green", "eyes/green.png"),
            image_item("eyes_3", "Red", "eyes/red.png"),
            image_item("eyes_4", "Teal", "eyes/teal.png"),
            image_item("eyes_5", "White", "eyes/white.png"),
            image_item("eyes_6", "Yellow", "eyes/yellow.png"),
        ],
    }
}

fn glasses() -> Category {
    Category {
        id: "glasses".into(),
        label: "Glasses".into(),
        draw_order: 40,
        role: CategoryRole::Accessory,
        items: vec![
            none_item("glasses_1"),
            image_item("glasses_2", "Old Skool", "glasses/old-skool.png"),
            image_item("glasses_3", "Reading", "glasses/reading.png"),
            image_item("glasses_4", "Ski", "glasses/ski.png"),
            image_item("glasses_5", "Rayban", "glasses/rayban.png"),
            image_item("glasses_6", "Neovision", "glasses/neovision.png"),
        ],
    }
}

fn hat() -> Category {
    Category {
        id: "hat".into(),
        label: "Hat".into(),
        draw_order: 50,
        role: CategoryRole::Accessory,
        items: vec![
            none_item("hat_1"),
            image_item("hat_2", "Army", "hat/army.png"),
            image_item("hat_13", "Catcoin", "hat/catcoin.png"),
            image_item("hat_14", "Claw", "hat/claw.png"),
            image_item("hat_6", "Beer", "hat/beer.png"),
            image_item("hat_3", "Cowboy", "hat/cowboy.png"),
            image_item("hat_4", "Crown", "hat/crown.png"),
            image_item("hat_7", "Police", "hat/police.png"),
            image_item("hat_11", "Red Hat", "hat/red-hat.png"),
            image_item("hat_8", "Taxi", "hat/taxi.png"),
            image_item("hat_9", "Top Hat", "hat/tophat.png"),
            image_item("hat_10", "Viking", "hat/viking.png"),
            image_item("hat_12", "White Hat", "hat/white-hat.png"),
        ],
    }
}

fn shirt() -> Category {
    Category {
        id: "shirt".into(),
        label: "Shirt".into(),
        draw_order: 60,
        role: CategoryRole::Accessory,
        items: vec![
            none_item("shirt_1"),
            image_item("shirt_2", "Trucker", "shirt/trucker.png"),
            image_item("shirt_3", "Biker", "shirt/biker.png"),
            image_item("shirt_4", "Freddy", "shirt/freddy.png"),
            image_item("shirt_5", "Snowy", "shirt/snowy.png"),
            image_item("shirt_6", "Sweater", "shirt/sweater.png"),
            image_item("shirt_7", "Balenciaga", "shirt/balenciaga.png"),
            image_item("shirt_8", "Champion", "shirt/champion.png"),
            image_item("shirt_9", "Hilfiger", "shirt/hilfiger.png"),
            image_item("shirt_10", "JNCO", "shirt/jnco.png"),
            image_item("shirt_11", "Thrasher", "shirt/thrasher.png"),
            image_item("shirt_12", "Zodiac", "shirt/zodiac.png"),
            image_item("shirt_13", "SWAT", "shirt/swat.png"),
        ],
    }
}

fn mouth() -> Category {
    Category {
        id: "mouth".into(),
        label: "Mouth".into(),
        draw_order: 65,
        role: CategoryRole::Accessory,
        items: vec![
            none_item("mouth_1"),
            image_item("mouth_2", "Fish", "mouth/fish.png"),
            image_item("mouth_3", "Tongue", "mouth/tongue.png"),
            image_item("mouth_4", "Crazy", "mouth/crazy.png"),
            image_item("mouth_5", "Vamp", "mouth/vamp.png"),
        ],
    }
}

fn chain() -> Category {
    Category {
        id: "chain".into(),
        label: "Chain".into(),
        draw_order: 70,
        role: CategoryRole::Accessory,
        items: vec![
            none_item("chain_1"),
            image_item("chain_2", "Gold", "chain/gold.png"),
            image_item("chain_3", "Cross", "chain/cross.png"),
            image_item("chain_4", "Money", "chain/money.png"),
            image_item("chain_5", "Chains", "chain/chains.png"),
        ],
    }
}

fn costume() -> Category {
    Category {
        id: "costume".into(),
        label: "Costume".into(),
        draw_order: 75,
        role: CategoryRole::Costume,
        items: vec![
            none_item("costume_1"),
            image_item("costume_2", "Batcat", "costumes/batcat.png"),
            image_item("costume_3", "Beetlecat", "costumes/beetlecat.png"),
            image_item("costume_7", "Catwoman", "costumes/catwoman.png"),
            image_item("costume_4", "Ghostface", "costumes/ghostfacemeow.png"),
            image_item("costume_8", "Gokuat", "costumes/gokuat.png"),
            image_item("costume_9", "Jason", "costumes/jason.png"),
            image_item("costume_12", "Kryptocat", "costumes/kryptocat.png"),
            image_item("costume_5", "Mad Catz", "costumes/madcatz.png"),
            image_item("costume_6", "Terminapur", "costumes/terminapur.png"),
            image_item("costume_10", "Turbocat", "costumes/turbocat.png"),
            image_item("costume_11", "Cybercat", "costumes/cybercat.png"),
        ],
    }
}

fn border_color() -> EngineResult<Category> {
    Ok(Category {
        id: "border_color".into(),
        label: "Border Color".into(),
        draw_order: 90,
        role: CategoryRole::BorderColor,
        items: vec![
            none_item("border_color_none"),
            color_item("border_c_white", "White", "#ffffff")?,
            color_item("border_c_yellow", "Cat Yellow", "#fad205")?,
            color_item("border_c_cyan", "Cyan", "#06b6d4")?,
            color_item("border_c_purple", "Purple", "#a855f7")?,
            color_item("border_c_lime", "Lime", "#84cc16")?,
            color_item("border_c_pink", "Hot Pink", "#ec4899")?,
            color_item("border_c_orange", "Orange", "#f97316")?,
            color_item("border_c_red", "Red", "#ef4444")?,
            color_item("border_c_silver", "Silver", "#9ca3af")?,
            color_item("border_c_gold", "Gold", "#fbbf24")?,
            color_item("border_c_black", "Black", "#000000")?,
        ],
    })
}

fn border_style() -> Category {
    let style = |id: &str, label: &str, s: BorderStyle| Item::new(id, label, ItemKind::BorderStyle(s));
    Category {
        id: "border_style".into(),
        label: "Border Pattern".into(),
        draw_order: 91,
        role: CategoryRole::BorderStyle,
        items: vec![
            style("border_s_solid", "Solid", BorderStyle::Solid),
            style("border_s_dashed", "Dashed", BorderStyle::Dashed),
            style("border_s_dotted", "Dotted", BorderStyle::Dotted),
            style("border_s_double", "Double", BorderStyle::Double),
            style("border_s_neon", "Neon Glow", BorderStyle::Neon),
            style("border_s_ridge", "Ridge", BorderStyle::Ridge),
            style("border_s_inset", "Inset", BorderStyle::Inset),
            style("border_s_groove", "Groove", BorderStyle::Groove),
        ],
    }
}

fn border_width() -> Category {
    let width = |id: &str, label: &str, w: f64| Item::new(id, label, ItemKind::BorderWidth(w));
    Category {
        id: "border_width".into(),
        label: "Border Size".into(),
        draw_order: 92,
        role: CategoryRole::BorderWidth,
        items: vec![
            width("border_w_sm", "Small", 5.0),
            width("border_w_md", "Medium", 10.0),
            width("border_w_lg", "Large", 18.0),
            width("border_w_xl", "Chonky", 30.0),
        ],
    }
}

fn speech() -> Category {
    Category {
        id: "speech".into(),
        label: "Speech".into(),
        draw_order: 95,
        role: CategoryRole::Speech,
        items: vec![
            none_item("speech_none"),
            speech_item("speech_gm", "GM", "GM \u{2600}\u{fe0f}", "\u{2600}\u{fe0f}"),
            speech_item("speech_wagmi", "WAGMI", "WAGMI! \u{1f680}", "\u{1f680}"),
            speech_item(
                "speech_catcoin",
                "Catcoin",
                "$catcoin to the moon!",
                "\u{1f48e}",
            ),
            speech_item("speech_meow", "Meow", "Meow! \u{1f431}", "\u{1f431}"),
            speech_item("speech_hodl", "HODL", "HODL \u{1f48e}", "\u{1f3e6}"),
            speech_item("speech_moon", "Moon", "Soon Moon \u{1f311}", "\u{1f311}"),
            speech_item("speech_yolo", "YOLO", "YOLO \u{1f3b0}", "\u{1f3b0}"),
            speech_item("speech_vibing", "Vibing", "Just Vibing \u{1f30a}", "\u{1f30a}"),
            speech_item("speech_rekt", "REKT", "Not REKT! \u{2705}", "\u{2705}"),
            speech_item("speech_alpha", "Alpha", "Pure Alpha \u{1f9e0}", "\u{1f9e0}"),
        ],
    }
}

fn vibe() -> Category {
    Category {
        id: "vibe".into(),
        label: "Vibe".into(),
        draw_order: 100,
        role: CategoryRole::Vibe,
        items: vec![
            none_item("vibe_none"),
            filter_item("vibe_noir", "Noir", "grayscale(1) contrast(1.2)"),
            filter_item("vibe_retro", "Retro", "sepia(0.8) contrast(1.1) brightness(0.9)"),
            filter_item(
                "vibe_matrix",
                "Matrix",
                "hue-rotate(90deg) saturate(2) brightness(0.8)",
            ),
            filter_item("vibe_neon", "Vibrant", "saturate(2.5) contrast(1.2)"),
            filter_item(
                "vibe_dreamy",
                "Dreamy",
                "brightness(1.1) saturate(1.2) blur(0.5px)",
            ),
            filter_item("vibe_8bit", "8-Bit", "pixelate(8)"),
            filter_item(
                "vibe_ghostly",
                "Ghostly",
                "opacity(0.8) brightness(1.5) saturate(0.5)",
            ),
            filter_item("vibe_rainbow", "Rainbow", "hue-rotate(360deg)"),
            filter_item("vibe_glitch", "Glitch", "contrast(1.5) hue-rotate(200deg)"),
            filter_item(
                "vibe_faded",
                "Faded",
                "opacity(0.7) grayscale(0.2) brightness(1.1)",
            ),
        ],
    }
}

/// Build the stock catalog.
pub fn builtin_catalog() -> EngineResult<Catalog> {
    Catalog::new(vec![
        background()?,
        body(),
        eyes(),
        glasses(),
        hat(),
        shirt(),
        mouth(),
        chain(),
        costume(),
        border_color()?,
        border_style(),
        border_width(),
        speech(),
        vibe(),
    ])
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/builtin.rs"]
mod tests;
