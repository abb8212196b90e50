//! Catomatic is a layered avatar composition engine.
//!
//! It turns an attribute catalog plus a selection state into pixels: a
//! cat-themed profile picture composed from stacked sprite layers, a
//! procedural border, a speech bubble, and a whole-composite color filter,
//! exported as PNG at any square resolution.
//!
//! # Pipeline overview
//!
//! 1. **Catalog**: categories with a draw order and kind-tagged items
//!    ([`Catalog`], [`builtin_catalog`])
//! 2. **Select**: pure transitions over an immutable [`SelectionState`]
//!    ([`select`], [`randomize`], [`shuffle_themed`], [`clear`])
//! 3. **Render**: `SelectionState -> FrameRgba` on the CPU ([`Compositor`])
//! 4. **Encode**: PNG bytes or files ([`encode_png`], [`write_png`])
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: transitions are pure; random operations
//!   take a caller-seeded RNG.
//! - **Scale invariance**: geometry is authored in a 512-unit logical space
//!   and uniformly scaled, so previews and exports compose identically.
//! - **Premultiplied RGBA8** end-to-end: the compositor outputs premultiplied
//!   pixels and unpremultiplies only at PNG export.
//!
//! For a one-handle entry point that wires all of the above together, see
//! [`AvatarSession`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod catalog;
mod encode;
mod foundation;
mod render;
mod session;
mod state;

pub use assets::store::{FsSpriteSource, Sprite, SpriteCache, SpriteSource};
pub use catalog::builtin::builtin_catalog;
pub use catalog::model::{
    BorderStyle, Catalog, Category, CategoryRole, GradientGeometry, GradientSpec, Item, ItemKind,
};
pub use encode::png::{encode_png, write_png};
pub use foundation::core::{FrameRgba, LOGICAL_SIZE, Rgba8Premul, ShapeMode};
pub use foundation::error::{EngineError, EngineResult};
pub use render::compositor::{
    Compositor, CustomBackground, CustomBackgroundMode, EXPORT_SIZE, PREVIEW_SIZE,
};
pub use render::filters::{FilterOp, FilterPipeline, SpatialPass, parse_filter_expr};
pub use session::AvatarSession;
pub use state::machine::{
    SelectionState, Transition, TransitionEffect, clear, randomize, select, shuffle_themed,
};
pub use state::theme::{Theme, builtin_themes};
