//! Crate-wide error type.
//!
//! Gameplay itself never fails once a run is underway; these errors surface only
//! from setup (catalog, config) and from the browser glue.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid region code {0:?}: expected two ASCII uppercase letters")]
    InvalidRegionCode(String),

    #[error("catalog has {available} countries but a run needs at least {required}")]
    CatalogTooSmall { available: usize, required: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("high score storage unavailable: {0}")]
    Storage(String),

    #[error("failed to serialize snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("browser API failure: {0}")]
    Js(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps a thrown JS value, keeping its string form when it has one.
    pub(crate) fn js(value: JsValue) -> Self {
        Error::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
