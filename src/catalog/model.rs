use std::collections::BTreeSet;

use crate::foundation::{
    core::Rgba8Premul,
    error::{EngineError, EngineResult},
};

/// Structural position a category occupies in the composition.
///
/// Roles let the state machine and compositor reason about exclusivity and
/// rendering without matching on literal catalog ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CategoryRole {
    /// The backdrop fill; always required, first in draw order.
    Background,
    /// The base character sprite; always required, part of the accessory group.
    Body,
    /// A stackable sprite layer (eyes, shirt, hat, ...); part of the accessory group.
    Accessory,
    /// Full-body costume, mutually exclusive with the accessory group.
    Costume,
    /// Whole-composite color filter applied as a post-process.
    Vibe,
    /// Caption/emoji speech bubble overlay.
    Speech,
    /// Border stroke color; anchors border rendering in the draw order.
    BorderColor,
    /// Pure modifier: border stroke pattern. Draws no layer of its own.
    BorderStyle,
    /// Pure modifier: border stroke width. Draws no layer of its own.
    BorderWidth,
}

impl CategoryRole {
    /// Whether this category belongs to the accessory group that a costume clears.
    pub fn in_accessory_group(self) -> bool {
        matches!(self, Self::Body | Self::Accessory)
    }

    /// Whether this category must always hold a visible selection.
    pub fn always_required(self) -> bool {
        matches!(self, Self::Background | Self::Body)
    }

    /// Whether this category carries no direct visual layer.
    pub fn is_modifier(self) -> bool {
        matches!(self, Self::BorderStyle | Self::BorderWidth)
    }
}

/// Geometry of a gradient fill, in logical 512-space coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum GradientGeometry {
    /// Linear gradient between two points.
    Linear {
        /// Start x.
        x0: f64,
        /// Start y.
        y0: f64,
        /// End x.
        x1: f64,
        /// End y.
        y1: f64,
    },
    /// Radial gradient between two radii around a center.
    Radial {
        /// Center x.
        cx: f64,
        /// Center y.
        cy: f64,
        /// Inner radius (fully the first stop).
        r0: f64,
        /// Outer radius (fully the last stop).
        r1: f64,
    },
}

/// A multi-stop gradient fill.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientSpec {
    /// Linear or radial geometry.
    pub geometry: GradientGeometry,
    /// Color stops as `(offset in 0..1, color)`, ascending by offset.
    pub stops: Vec<(f64, Rgba8Premul)>,
}

/// Border stroke pattern token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BorderStyle {
    /// Single centered stroke.
    Solid,
    /// Dash pattern proportional to stroke width.
    Dashed,
    /// Round dots spaced by stroke width.
    Dotted,
    /// Two concentric half-width strokes.
    Double,
    /// Solid stroke plus a blurred glow underneath.
    Neon,
    /// Zig-zag spike ring (circle shape only; dashed fallback on squares).
    Jagged,
    /// Renders as a stylized dash pattern (documented simplification).
    Wave,
    /// Renders as a plain solid stroke.
    Ridge,
    /// Renders as a plain solid stroke.
    Inset,
    /// Renders as a plain solid stroke.
    Groove,
}

impl BorderStyle {
    /// Parse a catalog style token.
    pub fn parse(token: &str) -> EngineResult<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            "double" => Ok(Self::Double),
            "neon" => Ok(Self::Neon),
            "jagged" => Ok(Self::Jagged),
            "wave" => Ok(Self::Wave),
            "ridge" => Ok(Self::Ridge),
            "inset" => Ok(Self::Inset),
            "groove" => Ok(Self::Groove),
            other => Err(EngineError::validation(format!(
                "unknown border style '{other}'"
            ))),
        }
    }
}

/// Kind-tagged payload of a selectable item.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ItemKind {
    /// Explicit empty selection; draws nothing.
    None,
    /// Flat color fill.
    Color(Rgba8Premul),
    /// Multi-stop gradient fill.
    Gradient(GradientSpec),
    /// Full-canvas transparent-background sprite.
    Image {
        /// Source path, resolved by the compositor's sprite source.
        source: String,
    },
    /// Whole-composite post-process filter, as a filter expression string
    /// (parsed by the render filter module).
    Filter {
        /// Expression such as `"grayscale(1) contrast(1.2)"` or `"pixelate(8)"`.
        expr: String,
    },
    /// Speech caption with an associated emoji glyph.
    Text {
        /// Full caption text.
        caption: String,
        /// Emoji drawn inside the bubble.
        emoji: String,
    },
    /// User-parameterized background sentinel; reads `CustomBackground`.
    Custom,
    /// Pure modifier: border stroke pattern.
    BorderStyle(BorderStyle),
    /// Pure modifier: border stroke width in logical units.
    BorderWidth(f64),
}

impl ItemKind {
    /// Whether this is the explicit empty selection.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// One selectable option within a category.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Item {
    /// Unique id within the owning category.
    pub id: String,
    /// Display label (also the key themed shuffles filter on).
    pub label: String,
    /// Kind-tagged payload.
    pub kind: ItemKind,
    /// Hidden from pickers but still a valid runtime selection.
    pub hidden: bool,
}

impl Item {
    /// Shorthand for a visible item.
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            hidden: false,
        }
    }

    /// Mark the item hidden from pickers.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// A named slot in the avatar with an ordered list of selectable items.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Category {
    /// Unique catalog-wide id.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Ascending = drawn first = visually behind. Not required unique.
    pub draw_order: i32,
    /// Structural role.
    pub role: CategoryRole,
    /// Ordered selectable items; never empty.
    pub items: Vec<Item>,
}

impl Category {
    /// The item with the given id, if present.
    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// The category's explicit `none` item, if it has one.
    pub fn none_item(&self) -> Option<&Item> {
        self.items.iter().find(|i| i.kind.is_none())
    }

    /// Canonical default: the first non-hidden item, or the first item.
    ///
    /// Always-required categories toggle back to this; it is also the initial
    /// selection and the `clear` target for background and body.
    pub fn canonical_default(&self) -> &Item {
        self.items.iter().find(|i| !i.hidden).unwrap_or(&self.items[0])
    }

    /// Fallback for forced clears: the `none` item, or the first item.
    pub fn none_or_first(&self) -> &Item {
        self.none_item().unwrap_or(&self.items[0])
    }
}

/// Read-only, validated catalog of categories.
///
/// Construction is the only mutation point; every accessor hands out shared
/// references in the original catalog order.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Validate and seal a catalog.
    pub fn new(categories: Vec<Category>) -> EngineResult<Self> {
        if categories.is_empty() {
            return Err(EngineError::validation("catalog must not be empty"));
        }

        let mut cat_ids = BTreeSet::new();
        let mut backgrounds = 0usize;
        let mut bodies = 0usize;
        let mut costumes = 0usize;
        for cat in &categories {
            if !cat_ids.insert(cat.id.as_str()) {
                return Err(EngineError::validation(format!(
                    "duplicate category id '{}'",
                    cat.id
                )));
            }
            if cat.items.is_empty() {
                return Err(EngineError::validation(format!(
                    "category '{}' has no items",
                    cat.id
                )));
            }
            let mut item_ids = BTreeSet::new();
            for item in &cat.items {
                if !item_ids.insert(item.id.as_str()) {
                    return Err(EngineError::validation(format!(
                        "duplicate item id '{}' in category '{}'",
                        item.id, cat.id
                    )));
                }
            }
            match cat.role {
                CategoryRole::Background => backgrounds += 1,
                CategoryRole::Body => bodies += 1,
                CategoryRole::Costume => costumes += 1,
                _ => {}
            }
        }
        if backgrounds != 1 || bodies != 1 || costumes != 1 {
            return Err(EngineError::validation(
                "catalog needs exactly one background, body, and costume category",
            ));
        }

        Ok(Self { categories })
    }

    /// All categories in original catalog order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The category with the given id, or `InvalidSelection`.
    pub fn category(&self, id: &str) -> EngineResult<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| EngineError::invalid_selection(format!("unknown category '{id}'")))
    }

    /// The single category holding the given role, or `InvalidSelection`.
    ///
    /// Roles validated as unique at construction (background, body, costume)
    /// cannot fail; optional roles like speech or vibe may be absent.
    pub fn category_by_role(&self, role: CategoryRole) -> EngineResult<&Category> {
        self.categories
            .iter()
            .find(|c| c.role == role)
            .ok_or_else(|| {
                EngineError::invalid_selection(format!("no category with role {role:?}"))
            })
    }

    /// Items of a category, optionally including hidden sentinels.
    pub fn items_of(&self, category_id: &str, include_hidden: bool) -> EngineResult<Vec<&Item>> {
        let cat = self.category(category_id)?;
        Ok(cat
            .items
            .iter()
            .filter(|i| include_hidden || !i.hidden)
            .collect())
    }

    /// Categories sorted for compositing: ascending draw order, with the
    /// original catalog position as the deterministic tie-break.
    pub fn draw_sorted(&self) -> Vec<&Category> {
        let mut out: Vec<(usize, &Category)> = self.categories.iter().enumerate().collect();
        out.sort_by_key(|(idx, c)| (c.draw_order, *idx));
        out.into_iter().map(|(_, c)| c).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/model.rs"]
mod tests;
