//! Boundary to the scene graph service
//!
//! The design engine that owns pages, placeholders, fills and groups is an
//! external collaborator. Everything the editor core needs from it is captured
//! by the [`SceneGraph`] trait. [`MemoryScene`] is a complete in-memory
//! implementation used by the CLI and the tests.
//!
//! # Example
//!
//! ```rust
//! use collage_editor::scene::{MemoryScene, SceneGraph};
//! use collage_editor::geometry::Size;
//!
//! let mut scene = MemoryScene::with_bundled_templates(Size::new(360.0, 640.0));
//! scene.load_document("bundled://full_half_half.toml").unwrap();
//! assert_eq!(scene.find_placeholders().len(), 3);
//! ```

pub mod document;
pub mod memory;

use std::fmt;

use thiserror::Error;

use crate::color::Rgba;
use crate::geometry::{Anchor, Point, Rect, Size};

pub use document::{NodeKind, SceneDocument};
pub use memory::{MemoryScene, MemorySnapshot};

/// Opaque handle to a node owned by the scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle to a fill object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FillId(pub u32);

/// Node types the editor distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Page,
    Graphic,
    Text,
    Group,
}

/// One of the four independently settable corner radii of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomLeft => 2,
            Corner::BottomRight => 3,
        }
    }
}

/// What a fill paints
#[derive(Debug, Clone, PartialEq)]
pub enum FillKind {
    /// Image fill bound to one image source
    Image { uri: String },
    /// Solid color fill
    Color(Rgba),
}

/// How image content is fitted into its frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentFillMode {
    /// Crop to fill the frame, preserving aspect ratio, centered
    Cover,
    /// Fit inside the frame, preserving aspect ratio
    Contain,
    /// Use the explicit crop stored on the node
    #[default]
    Crop,
}

/// Interaction scopes that can be toggled per node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// Direct selection in the engine's own UI
    EditorSelect,
    /// Independent repositioning through native handles
    LayerMove,
}

impl Scope {
    pub fn name(&self) -> &'static str {
        match self {
            Scope::EditorSelect => "editor/select",
            Scope::LayerMove => "layer/move",
        }
    }
}

/// Errors reported by a scene graph implementation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("invalid node handle {0}")]
    InvalidHandle(NodeId),

    #[error("invalid fill handle {0:?}")]
    UnknownFill(FillId),

    #[error("document not found: {uri}")]
    DocumentNotFound { uri: String },

    #[error("invalid document {uri}: {message}")]
    InvalidDocument { uri: String, message: String },

    #[error("node {0} is not a group")]
    NotAGroup(NodeId),

    #[error("cannot group an empty node list")]
    EmptyGroup,

    #[error("no page is loaded")]
    NoPage,
}

/// Primitive operations of the scene graph service consumed by the editor.
///
/// Geometry is in world (page) units except for [`SceneGraph::screen_rect`],
/// which reports where a node currently appears on screen.
pub trait SceneGraph {
    /// Saved copy of the whole scene, undo history included
    type Snapshot;

    /// Replace the current document with the one at `uri`
    fn load_document(&mut self, uri: &str) -> Result<(), SceneError>;

    /// All placeholder nodes of the current document, in document order
    fn find_placeholders(&self) -> Vec<NodeId>;

    fn node_type(&self, node: NodeId) -> Result<NodeType, SceneError>;

    fn position(&self, node: NodeId) -> Result<Point, SceneError>;
    fn set_position(&mut self, node: NodeId, position: Point) -> Result<(), SceneError>;

    fn size(&self, node: NodeId) -> Result<Size, SceneError>;
    fn set_size(&mut self, node: NodeId, size: Size) -> Result<(), SceneError>;

    fn corner_radius(&self, node: NodeId, corner: Corner) -> Result<f64, SceneError>;
    fn set_corner_radius(
        &mut self,
        node: NodeId,
        corner: Corner,
        radius: f64,
    ) -> Result<(), SceneError>;

    fn create_fill(&mut self, kind: FillKind) -> FillId;
    fn fill_kind(&self, fill: FillId) -> Result<&FillKind, SceneError>;
    fn fill(&self, node: NodeId) -> Result<Option<FillId>, SceneError>;
    fn set_fill(&mut self, node: NodeId, fill: FillId) -> Result<(), SceneError>;

    fn content_fill_mode(&self, node: NodeId) -> Result<ContentFillMode, SceneError>;
    fn set_content_fill_mode(
        &mut self,
        node: NodeId,
        mode: ContentFillMode,
    ) -> Result<(), SceneError>;

    /// Group nodes into a new group node
    fn group(&mut self, nodes: &[NodeId]) -> Result<NodeId, SceneError>;

    fn is_scope_enabled(&self, node: NodeId, scope: Scope) -> Result<bool, SceneError>;
    fn set_scope_enabled(
        &mut self,
        node: NodeId,
        scope: Scope,
        enabled: bool,
    ) -> Result<(), SceneError>;

    /// Where the node is drawn on screen right now
    fn screen_rect(&self, node: NodeId) -> Result<Rect, SceneError>;

    /// Scale every member of a group about a normalized anchor of the group
    fn scale_group(&mut self, group: NodeId, factor: f64, anchor: Anchor)
        -> Result<(), SceneError>;

    fn current_page(&self) -> Result<NodeId, SceneError>;

    /// Move the camera so that `node` fills the viewport
    fn zoom_to_fit(&mut self, node: NodeId) -> Result<(), SceneError>;

    /// Mark the current state as one user-visible undo step
    fn add_undo_checkpoint(&mut self);

    /// Return to the previous checkpoint, `false` when there is none
    fn undo(&mut self) -> Result<bool, SceneError>;

    fn snapshot(&self) -> Self::Snapshot;

    /// Put the scene back exactly as it was when `snapshot` was taken
    fn restore(&mut self, snapshot: Self::Snapshot);

    /// World rectangle of a node
    fn rect(&self, node: NodeId) -> Result<Rect, SceneError> {
        Ok(Rect::from_origin_size(self.position(node)?, self.size(node)?))
    }

    /// Set position and size in one call
    fn set_rect(&mut self, node: NodeId, rect: Rect) -> Result<(), SceneError> {
        self.set_position(node, rect.origin())?;
        self.set_size(node, rect.size())
    }

    /// Set all four corner radii to the same value
    fn set_uniform_corner_radius(&mut self, node: NodeId, radius: f64) -> Result<(), SceneError> {
        for corner in Corner::ALL {
            self.set_corner_radius(node, corner, radius)?;
        }
        Ok(())
    }
}

/// Placeholders that hold images, skipping text and decoration placeholders
pub fn image_placeholders<S: SceneGraph + ?Sized>(scene: &S) -> Result<Vec<NodeId>, SceneError> {
    let mut images = Vec::new();
    for node in scene.find_placeholders() {
        if scene.node_type(node)? == NodeType::Graphic {
            images.push(node);
        }
    }
    Ok(images)
}

/// Screen rectangles of every image placeholder, freshly queried
pub fn placeholder_screen_rects<S: SceneGraph + ?Sized>(
    scene: &S,
) -> Result<Vec<(NodeId, Rect)>, SceneError> {
    image_placeholders(scene)?
        .into_iter()
        .map(|node| Ok((node, scene.screen_rect(node)?)))
        .collect()
}
