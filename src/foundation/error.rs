/// Convenience result type used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only `InvalidSelection` and `Render` are expected to surface to callers in
/// practice; per-layer asset failures are recovered inside the compositor and
/// reported through logging instead.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// An unknown category or item id was passed to a state transition.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// Invalid catalog or filter-expression data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A sprite or font could not be loaded or decoded.
    #[error("asset load error: {0}")]
    AssetLoad(String),

    /// Catastrophic failure while allocating or reading back a render surface.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    /// Build an [`EngineError::InvalidSelection`] value.
    pub fn invalid_selection(msg: impl Into<String>) -> Self {
        Self::InvalidSelection(msg.into())
    }

    /// Build an [`EngineError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`EngineError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build an [`EngineError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
