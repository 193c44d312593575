//! Template document format read by the in-memory scene
//!
//! A document describes one page and the nodes authored on it:
//!
//! ```toml
//! [page]
//! width = 100.0
//! height = 100.0
//!
//! [[nodes]]
//! kind = "graphic"
//! placeholder = true
//! x = 0.0
//! y = 0.0
//! width = 100.0
//! height = 50.0
//! ```

use serde::Deserialize;

use crate::geometry::{Rect, Size};

/// Kind of an authored node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Graphic,
    Text,
}

/// A node as authored in the template
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentNode {
    pub kind: NodeKind,
    #[serde(default)]
    pub placeholder: bool,
    /// Display name, informational only
    #[serde(default)]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DocumentNode {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A parsed template document
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SceneDocument {
    pub page: Size,
    #[serde(default)]
    pub nodes: Vec<DocumentNode>,
}

impl SceneDocument {
    /// Parse a document from TOML source
    pub fn from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Number of placeholders that accept an image
    pub fn image_placeholder_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.placeholder && n.kind == NodeKind::Graphic)
            .count()
    }
}
