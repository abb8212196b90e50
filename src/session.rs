//! High-level session tying the catalog, selection state, and compositor
//! together behind one handle.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assets::store::SpriteSource;
use crate::catalog::model::Catalog;
use crate::foundation::core::{FrameRgba, ShapeMode};
use crate::foundation::error::{EngineError, EngineResult};
use crate::render::compositor::{Compositor, CustomBackground};
use crate::state::machine::{self, SelectionState, Transition};
use crate::state::theme::{Theme, builtin_themes};
use crate::{encode, PREVIEW_SIZE};

/// An avatar editing session.
///
/// Owns the current [`SelectionState`] and swaps it wholesale on every
/// transition; callers observe immutable snapshots. Renders borrow the
/// session mutably, which serializes them by construction.
pub struct AvatarSession {
    catalog: Catalog,
    state: SelectionState,
    custom: CustomBackground,
    shape: ShapeMode,
    themes: Vec<Theme>,
    rng: StdRng,
    compositor: Compositor,
}

impl AvatarSession {
    /// Start a session on `catalog`, drawing sprites from `source`.
    pub fn new(catalog: Catalog, source: Box<dyn SpriteSource>) -> Self {
        Self::with_seed(catalog, source, rand::random())
    }

    /// Like [`AvatarSession::new`] with a fixed RNG seed, for reproducible
    /// randomize/shuffle sequences.
    pub fn with_seed(catalog: Catalog, source: Box<dyn SpriteSource>, seed: u64) -> Self {
        let state = SelectionState::initial(&catalog);
        Self {
            catalog,
            state,
            custom: CustomBackground::default(),
            shape: ShapeMode::Circle,
            themes: builtin_themes(),
            rng: StdRng::seed_from_u64(seed),
            compositor: Compositor::new(source),
        }
    }

    /// The catalog this session edits against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The current selection snapshot.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// The available themes.
    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// The custom background parameters.
    pub fn custom_background(&self) -> &CustomBackground {
        &self.custom
    }

    /// Replace the custom background parameters.
    pub fn set_custom_background(&mut self, custom: CustomBackground) {
        self.custom = custom;
    }

    /// The current output clip shape.
    pub fn shape(&self) -> ShapeMode {
        self.shape
    }

    /// Set the output clip shape.
    pub fn set_shape(&mut self, shape: ShapeMode) {
        self.shape = shape;
    }

    /// Provide font bytes for the speech bubble glyphs.
    pub fn set_font_bytes(&mut self, bytes: Vec<u8>) {
        self.compositor.set_font_bytes(bytes);
    }

    /// Select an item; see [`machine::select`].
    pub fn select(&mut self, category_id: &str, item_id: &str) -> EngineResult<Transition> {
        let (next, tx) = machine::select(&self.catalog, &self.state, category_id, item_id)?;
        self.state = next;
        Ok(tx)
    }

    /// Randomize every category; see [`machine::randomize`].
    pub fn randomize(&mut self) -> Transition {
        let (next, tx) = machine::randomize(&self.catalog, &self.state, &mut self.rng);
        self.state = next;
        tx
    }

    /// Themed shuffle; see [`machine::shuffle_themed`].
    pub fn shuffle_themed(&mut self, theme_id: &str) -> EngineResult<Transition> {
        let theme = self
            .themes
            .iter()
            .find(|t| t.id == theme_id)
            .ok_or_else(|| EngineError::invalid_selection(format!("unknown theme '{theme_id}'")))?
            .clone();
        let (next, tx) = machine::shuffle_themed(&self.catalog, &self.state, &theme, &mut self.rng);
        self.state = next;
        Ok(tx)
    }

    /// Reset to the cleared baseline; see [`machine::clear`].
    pub fn clear(&mut self) -> Transition {
        let (next, tx) = machine::clear(&self.catalog, &self.state);
        self.state = next;
        tx
    }

    /// Render the current state at `target_size` pixels.
    pub fn render(&mut self, target_size: u32) -> EngineResult<FrameRgba> {
        self.compositor.render(
            &self.catalog,
            &self.state,
            &self.custom,
            self.shape,
            target_size,
        )
    }

    /// Render the current state at the default preview size.
    pub fn render_preview(&mut self) -> EngineResult<FrameRgba> {
        self.render(PREVIEW_SIZE)
    }

    /// Render and PNG-encode the current state.
    pub fn render_png(&mut self, target_size: u32) -> EngineResult<Vec<u8>> {
        let frame = self.render(target_size)?;
        encode::png::encode_png(&frame)
    }
}

impl std::fmt::Debug for AvatarSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarSession")
            .field("shape", &self.shape)
            .field("compositor", &self.compositor)
            .finish_non_exhaustive()
    }
}
