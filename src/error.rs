//! Structured error types for tileview.
//!
//! Nothing in the paint or scroll path surfaces errors to the user; these
//! cover configuration, the canvas boundary and scenario replay.

/// All errors that can occur in tileview configuration, drawing and replay.
#[derive(Debug, thiserror::Error)]
pub enum TileviewError {
    /// Invalid viewport configuration.
    #[error("Invalid viewport config: {0}")]
    Config(String),

    /// Canvas call failed (context lost, bad image source).
    #[error("Canvas error: {0}")]
    Canvas(String),

    /// Malformed replay scenario.
    #[error("Scenario error: {0}")]
    Scenario(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TileviewError>;

impl From<String> for TileviewError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for TileviewError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<TileviewError> for wasm_bindgen::JsValue {
    fn from(e: TileviewError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
