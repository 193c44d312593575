//! In-memory scene graph
//!
//! Keeps the whole document in plain maps. Node handles restart at 1 on every
//! document load, so a handle captured before a load can name a different
//! node afterwards; callers must not keep handles across documents.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, trace};

use super::document::{NodeKind, SceneDocument};
use super::{
    ContentFillMode, Corner, FillId, FillKind, NodeId, NodeType, SceneError, SceneGraph, Scope,
};
use crate::color::Rgba;
use crate::geometry::{Anchor, Point, Rect, Size};
use crate::template::TemplateRegistry;

#[derive(Debug, Clone)]
struct Node {
    kind: NodeType,
    placeholder: bool,
    rect: Rect,
    corner_radii: [f64; 4],
    fill: Option<FillId>,
    fill_mode: ContentFillMode,
    disabled_scopes: BTreeSet<Scope>,
    /// Members, for group nodes
    members: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeType, placeholder: bool, rect: Rect) -> Self {
        Self {
            kind,
            placeholder,
            rect,
            corner_radii: [0.0; 4],
            fill: None,
            fill_mode: ContentFillMode::default(),
            disabled_scopes: BTreeSet::new(),
            members: Vec::new(),
        }
    }
}

/// World-to-screen mapping
#[derive(Debug, Clone, Copy, PartialEq)]
struct Camera {
    zoom: f64,
    offset: Point,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: Point::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct SceneState {
    nodes: BTreeMap<NodeId, Node>,
    /// Document order of the nodes
    order: Vec<NodeId>,
    fills: HashMap<FillId, FillKind>,
    page: Option<NodeId>,
    next_node: u32,
    next_fill: u32,
    camera: Camera,
}

/// Saved [`MemoryScene`] state, see [`SceneGraph::snapshot`]
#[derive(Debug, Clone)]
pub struct MemorySnapshot {
    state: SceneState,
    checkpoints: Vec<SceneState>,
}

/// A [`SceneGraph`] that lives entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryScene {
    viewport: Size,
    documents: HashMap<String, String>,
    state: SceneState,
    checkpoints: Vec<SceneState>,
}

impl MemoryScene {
    /// Create an empty scene drawing into a viewport of the given size
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            documents: HashMap::new(),
            state: SceneState::default(),
            checkpoints: Vec::new(),
        }
    }

    /// Create a scene that can load every bundled template document
    pub fn with_bundled_templates(viewport: Size) -> Self {
        let mut scene = Self::new(viewport);
        for template in TemplateRegistry::all() {
            scene.register_document(template.document, template.source);
        }
        scene
    }

    /// Make a document loadable under `uri`
    pub fn register_document(&mut self, uri: impl Into<String>, source: impl Into<String>) {
        self.documents.insert(uri.into(), source.into());
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Background color of the current page, if a color fill is set
    pub fn background(&self) -> Option<Rgba> {
        let page = self.state.page?;
        let fill = self.state.nodes.get(&page)?.fill?;
        match self.state.fills.get(&fill)? {
            FillKind::Color(color) => Some(*color),
            FillKind::Image { .. } => None,
        }
    }

    /// Image reference bound to a node, if it has an image fill
    pub fn image_uri(&self, node: NodeId) -> Option<&str> {
        let fill = self.state.nodes.get(&node)?.fill?;
        match self.state.fills.get(&fill)? {
            FillKind::Image { uri } => Some(uri.as_str()),
            FillKind::Color(_) => None,
        }
    }

    /// Members of a group node
    pub fn group_members(&self, group: NodeId) -> Result<&[NodeId], SceneError> {
        let node = self.node(group)?;
        if node.kind != NodeType::Group {
            return Err(SceneError::NotAGroup(group));
        }
        Ok(&node.members)
    }

    /// Number of fills still held by the scene
    pub fn fill_count(&self) -> usize {
        self.state.fills.len()
    }

    /// Number of recorded undo checkpoints
    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }

    fn node(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.state.nodes.get(&id).ok_or(SceneError::InvalidHandle(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.state
            .nodes
            .get_mut(&id)
            .ok_or(SceneError::InvalidHandle(id))
    }

    fn insert_node(&mut self, node: Node) -> NodeId {
        self.state.next_node += 1;
        let id = NodeId(self.state.next_node);
        self.state.nodes.insert(id, node);
        self.state.order.push(id);
        id
    }

    /// World rectangle; groups report the bounds of their members
    fn world_rect(&self, id: NodeId) -> Result<Rect, SceneError> {
        let node = self.node(id)?;
        if node.kind != NodeType::Group {
            return Ok(node.rect);
        }
        let rects = node
            .members
            .iter()
            .map(|m| self.world_rect(*m))
            .collect::<Result<Vec<_>, _>>()?;
        Rect::union_all(rects.iter()).ok_or(SceneError::EmptyGroup)
    }

    fn set_world_rect(&mut self, id: NodeId, rect: Rect) -> Result<(), SceneError> {
        let current = self.world_rect(id)?;
        let members = self.node(id)?.members.clone();
        if self.node(id)?.kind != NodeType::Group {
            self.node_mut(id)?.rect = rect;
            return Ok(());
        }
        // Groups map their members from the old bounds onto the new ones
        let sx = if current.width > 0.0 {
            rect.width / current.width
        } else {
            1.0
        };
        let sy = if current.height > 0.0 {
            rect.height / current.height
        } else {
            1.0
        };
        for member in members {
            let m = self.world_rect(member)?;
            let mapped = Rect::new(
                rect.x + (m.x - current.x) * sx,
                rect.y + (m.y - current.y) * sy,
                m.width * sx,
                m.height * sy,
            );
            self.set_world_rect(member, mapped)?;
        }
        Ok(())
    }
}

impl SceneGraph for MemoryScene {
    type Snapshot = MemorySnapshot;

    fn load_document(&mut self, uri: &str) -> Result<(), SceneError> {
        let source = self
            .documents
            .get(uri)
            .ok_or_else(|| SceneError::DocumentNotFound {
                uri: uri.to_string(),
            })?;
        let document =
            SceneDocument::from_str(source).map_err(|e| SceneError::InvalidDocument {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;

        self.state = SceneState::default();
        self.checkpoints.clear();

        let page_rect = Rect::new(0.0, 0.0, document.page.width, document.page.height);
        let page = self.insert_node(Node::new(NodeType::Page, false, page_rect));
        self.state.page = Some(page);

        for authored in &document.nodes {
            let kind = match authored.kind {
                NodeKind::Graphic => NodeType::Graphic,
                NodeKind::Text => NodeType::Text,
            };
            self.insert_node(Node::new(kind, authored.placeholder, authored.rect()));
        }

        debug!(uri, nodes = document.nodes.len(); "Loaded document");
        Ok(())
    }

    fn find_placeholders(&self) -> Vec<NodeId> {
        self.state
            .order
            .iter()
            .copied()
            .filter(|id| self.state.nodes.get(id).is_some_and(|n| n.placeholder))
            .collect()
    }

    fn node_type(&self, node: NodeId) -> Result<NodeType, SceneError> {
        Ok(self.node(node)?.kind)
    }

    fn position(&self, node: NodeId) -> Result<Point, SceneError> {
        Ok(self.world_rect(node)?.origin())
    }

    fn set_position(&mut self, node: NodeId, position: Point) -> Result<(), SceneError> {
        let rect = self.world_rect(node)?;
        self.set_world_rect(node, Rect::from_origin_size(position, rect.size()))
    }

    fn size(&self, node: NodeId) -> Result<Size, SceneError> {
        Ok(self.world_rect(node)?.size())
    }

    fn set_size(&mut self, node: NodeId, size: Size) -> Result<(), SceneError> {
        let rect = self.world_rect(node)?;
        self.set_world_rect(node, Rect::from_origin_size(rect.origin(), size))
    }

    fn corner_radius(&self, node: NodeId, corner: Corner) -> Result<f64, SceneError> {
        Ok(self.node(node)?.corner_radii[corner.index()])
    }

    fn set_corner_radius(
        &mut self,
        node: NodeId,
        corner: Corner,
        radius: f64,
    ) -> Result<(), SceneError> {
        self.node_mut(node)?.corner_radii[corner.index()] = radius;
        Ok(())
    }

    fn create_fill(&mut self, kind: FillKind) -> FillId {
        self.state.next_fill += 1;
        let id = FillId(self.state.next_fill);
        self.state.fills.insert(id, kind);
        id
    }

    fn fill_kind(&self, fill: FillId) -> Result<&FillKind, SceneError> {
        self.state.fills.get(&fill).ok_or(SceneError::UnknownFill(fill))
    }

    fn fill(&self, node: NodeId) -> Result<Option<FillId>, SceneError> {
        Ok(self.node(node)?.fill)
    }

    fn set_fill(&mut self, node: NodeId, fill: FillId) -> Result<(), SceneError> {
        if !self.state.fills.contains_key(&fill) {
            return Err(SceneError::UnknownFill(fill));
        }
        let replaced = self.node_mut(node)?.fill.replace(fill);
        if let Some(old) = replaced.filter(|old| *old != fill) {
            let shared = self.state.nodes.values().any(|n| n.fill == Some(old));
            if !shared {
                self.state.fills.remove(&old);
            }
        }
        Ok(())
    }

    fn content_fill_mode(&self, node: NodeId) -> Result<ContentFillMode, SceneError> {
        Ok(self.node(node)?.fill_mode)
    }

    fn set_content_fill_mode(
        &mut self,
        node: NodeId,
        mode: ContentFillMode,
    ) -> Result<(), SceneError> {
        self.node_mut(node)?.fill_mode = mode;
        Ok(())
    }

    fn group(&mut self, nodes: &[NodeId]) -> Result<NodeId, SceneError> {
        if nodes.is_empty() {
            return Err(SceneError::EmptyGroup);
        }
        for id in nodes {
            self.node(*id)?;
        }
        let mut group = Node::new(NodeType::Group, false, Rect::zero());
        group.members = nodes.to_vec();
        Ok(self.insert_node(group))
    }

    fn is_scope_enabled(&self, node: NodeId, scope: Scope) -> Result<bool, SceneError> {
        Ok(!self.node(node)?.disabled_scopes.contains(&scope))
    }

    fn set_scope_enabled(
        &mut self,
        node: NodeId,
        scope: Scope,
        enabled: bool,
    ) -> Result<(), SceneError> {
        let scopes = &mut self.node_mut(node)?.disabled_scopes;
        if enabled {
            scopes.remove(&scope);
        } else {
            scopes.insert(scope);
        }
        Ok(())
    }

    fn screen_rect(&self, node: NodeId) -> Result<Rect, SceneError> {
        let world = self.world_rect(node)?;
        let Camera { zoom, offset } = self.state.camera;
        Ok(Rect::new(
            world.x * zoom + offset.x,
            world.y * zoom + offset.y,
            world.width * zoom,
            world.height * zoom,
        ))
    }

    fn scale_group(
        &mut self,
        group: NodeId,
        factor: f64,
        anchor: Anchor,
    ) -> Result<(), SceneError> {
        let members = self.group_members(group)?.to_vec();
        let pivot = self.world_rect(group)?.anchor_point(anchor);
        for member in members {
            let scaled = self.world_rect(member)?.scale_about(factor, pivot);
            self.set_world_rect(member, scaled)?;
        }
        trace!(group:%, factor; "Scaled group");
        Ok(())
    }

    fn current_page(&self) -> Result<NodeId, SceneError> {
        self.state.page.ok_or(SceneError::NoPage)
    }

    fn zoom_to_fit(&mut self, node: NodeId) -> Result<(), SceneError> {
        let rect = self.world_rect(node)?;
        let camera = if rect.is_empty() {
            Camera::default()
        } else {
            let zoom = (self.viewport.width / rect.width).min(self.viewport.height / rect.height);
            Camera {
                zoom,
                offset: Point::new(
                    (self.viewport.width - rect.width * zoom) / 2.0 - rect.x * zoom,
                    (self.viewport.height - rect.height * zoom) / 2.0 - rect.y * zoom,
                ),
            }
        };
        self.state.camera = camera;
        Ok(())
    }

    fn add_undo_checkpoint(&mut self) {
        self.checkpoints.push(self.state.clone());
    }

    /// Drops the newest checkpoint and restores the one before it.
    fn undo(&mut self) -> Result<bool, SceneError> {
        if self.checkpoints.len() < 2 {
            return Ok(false);
        }
        self.checkpoints.pop();
        if let Some(previous) = self.checkpoints.last() {
            self.state = previous.clone();
        }
        Ok(true)
    }

    fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            state: self.state.clone(),
            checkpoints: self.checkpoints.clone(),
        }
    }

    fn restore(&mut self, snapshot: MemorySnapshot) {
        self.state = snapshot.state;
        self.checkpoints = snapshot.checkpoints;
    }
}
