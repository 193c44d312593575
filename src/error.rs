//! Error types surfaced by the editor

use thiserror::Error;

use crate::scene::SceneError;
use crate::template::TemplateError;

/// Errors returned by editing operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditorError {
    /// The number of supplied images differs from the template's placeholder count
    #[error("template '{template}' has {expected} image placeholders but {found} images were supplied")]
    AssetCountMismatch {
        template: String,
        expected: usize,
        found: usize,
    },

    /// A parameter or reorder operation ran before any template was assigned
    #[error("no template has been assigned yet")]
    NoActiveSession,

    /// A parameter value that cannot be applied (NaN or infinite)
    #[error("invalid value {value} for parameter '{name}'")]
    InvalidParameter { name: &'static str, value: f64 },

    /// A placeholder was addressed by an index the session does not have
    #[error("placeholder index {index} is out of range for {count} placeholders")]
    PlaceholderIndex { index: usize, count: usize },

    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
}

impl EditorError {
    /// Create an asset count mismatch error
    pub fn asset_count(template: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::AssetCountMismatch {
            template: template.into(),
            expected,
            found,
        }
    }
}
