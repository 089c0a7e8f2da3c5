//! Scene data model for a picto board.
//!
//! The scene is an undirected graph: nodes are placed pictograms or text
//! boxes, edges are the connections drawn between them. It is backed by a
//! `StableUnGraph`, so removing a node drops its connections with it and the
//! connections touching a node are found in O(degree). Separate order lists
//! keep paint order (and save-file order) equal to insertion order.

use crate::config::BoardConfig;
use crate::geometry::snap_to_grid;
use crate::id::{ConnectionId, NodeId};
use kurbo::{Point, Rect, Vec2};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Canvas offset ───────────────────────────────────────────────────────

/// Pan translation applied to the whole scene.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasOffset {
    pub x: f64,
    pub y: f64,
}

impl CanvasOffset {
    pub const ZERO: CanvasOffset = CanvasOffset { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Transient view state: never saved with the nodes (the offset is copied
/// into snapshots explicitly).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewState {
    /// At most one selected node.
    pub selected: Option<NodeId>,
    pub offset: CanvasOffset,
}

impl ViewState {
    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected == Some(id)
    }

    /// Canvas-local position of a workspace point (undoes the pan).
    pub fn to_canvas(&self, p: Point) -> Point {
        p - self.offset.to_vec2()
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// What a node displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A catalog pictogram (filename) or an uploaded image (`data:` URI).
    #[default]
    Image,
    /// A free text box.
    Text,
}

fn default_size() -> f64 {
    100.0
}

fn default_pinned() -> bool {
    true
}

/// A single item placed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Top-left corner in canvas coordinates (before pan).
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_size")]
    pub width: f64,
    #[serde(default = "default_size")]
    pub height: f64,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    /// Catalog filename, `data:` URI, or raw text. Early saves called this `src`.
    #[serde(default, alias = "src")]
    pub content: String,
    /// Text nodes only: pinned nodes edit text, unpinned nodes drag.
    #[serde(default = "default_pinned")]
    pub pinned: bool,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, content: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            width: default_size(),
            height: default_size(),
            kind,
            content: content.into(),
            pinned: true,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Whether pointer input on the body edits text rather than dragging.
    pub fn is_text_editable(&self) -> bool {
        self.is_text() && self.pinned
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

/// A link between two nodes. `from`/`to` record creation order only;
/// existence checks treat the pair as unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: NodeId,
    pub to: NodeId,
}

impl Connection {
    /// Whether this connection touches `node`.
    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }

    /// Whether this connection links the unordered pair `{a, b}`.
    pub fn links(&self, a: NodeId, b: NodeId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

// ─── Snapshot (save-file format) ─────────────────────────────────────────

/// `{ nodes, connections, canvasOffset }` as written to the host store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub canvas_offset: CanvasOffset,
}

// ─── Scene ───────────────────────────────────────────────────────────────

/// Node list plus connection list with referential integrity.
#[derive(Debug, Clone)]
pub struct Scene {
    graph: StableUnGraph<Node, Connection>,
    node_index: HashMap<NodeId, NodeIndex>,
    connection_index: HashMap<ConnectionId, EdgeIndex>,
    node_order: Vec<NodeId>,
    connection_order: Vec<ConnectionId>,
    grid_size: f64,
    default_node_size: f64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}

impl PartialEq for Scene {
    fn eq(&self, other: &Self) -> bool {
        self.nodes().eq(other.nodes()) && self.connections().eq(other.connections())
    }
}

impl Scene {
    /// Create an empty scene using the grid and node size from `config`.
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            graph: StableUnGraph::default(),
            node_index: HashMap::new(),
            connection_index: HashMap::new(),
            node_order: Vec::new(),
            connection_order: Vec::new(),
            grid_size: config.grid_size,
            default_node_size: config.default_node_size,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connection_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_order.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).and_then(|&idx| self.graph.node_weight(idx))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let idx = *self.node_index.get(&id)?;
        self.graph.node_weight_mut(idx)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connection_index
            .get(&id)
            .and_then(|&idx| self.graph.edge_weight(idx))
    }

    /// Nodes in paint order (first added is bottom-most).
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.node_order.iter().filter_map(|id| self.node(*id))
    }

    /// Connections in creation order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.connection_order
            .iter()
            .filter_map(|id| self.connection(*id))
    }

    /// Connections touching `id`, without scanning the whole connection list.
    pub fn connections_of(&self, id: NodeId) -> impl Iterator<Item = &Connection> + '_ {
        self.node_index
            .get(&id)
            .into_iter()
            .flat_map(move |&idx| self.graph.edges(idx).map(|edge| edge.weight()))
    }

    /// The connection linking the unordered pair `{a, b}`, if any.
    pub fn connection_between(&self, a: NodeId, b: NodeId) -> Option<&Connection> {
        let ia = *self.node_index.get(&a)?;
        let ib = *self.node_index.get(&b)?;
        self.graph
            .find_edge(ia, ib)
            .and_then(|idx| self.graph.edge_weight(idx))
    }

    pub fn has_connection(&self, a: NodeId, b: NodeId) -> bool {
        self.connection_between(a, b).is_some()
    }

    /// Bounding box of all nodes using their actual sizes. `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        self.nodes().map(Node::rect).reduce(|acc, r| acc.union(r))
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Place a new node. Position is snapped to the grid, size is the
    /// default, and text nodes start pinned.
    pub fn add_node(&mut self, kind: NodeKind, content: impl Into<String>, x: f64, y: f64) -> NodeId {
        let id = NodeId::generate();
        let mut node = Node::new(
            id,
            kind,
            content,
            snap_to_grid(x, self.grid_size),
            snap_to_grid(y, self.grid_size),
        );
        node.width = self.default_node_size;
        node.height = self.default_node_size;
        log::debug!("add {kind:?} node {id} at ({}, {})", node.x, node.y);
        self.push_node(node);
        id
    }

    /// Insert a fully-formed node (e.g. from a save file). Rejects duplicate ids.
    pub fn insert_node(&mut self, node: Node) -> bool {
        if self.contains(node.id) {
            log::warn!("duplicate node id {} ignored", node.id);
            return false;
        }
        self.push_node(node);
        true
    }

    fn push_node(&mut self, node: Node) {
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        self.node_order.push(id);
    }

    /// Remove a node and every connection touching it. No-op for unknown ids.
    /// Returns the ids of the cascaded connections.
    pub fn delete_node(&mut self, id: NodeId) -> SmallVec<[ConnectionId; 4]> {
        let Some(idx) = self.node_index.remove(&id) else {
            return SmallVec::new();
        };
        let dropped: SmallVec<[ConnectionId; 4]> =
            self.graph.edges(idx).map(|edge| edge.weight().id).collect();
        for conn in &dropped {
            self.connection_index.remove(conn);
        }
        if !dropped.is_empty() {
            self.connection_order.retain(|c| !dropped.contains(c));
        }
        self.graph.remove_node(idx);
        self.node_order.retain(|n| *n != id);
        log::debug!("delete node {id} (+{} connections)", dropped.len());
        dropped
    }

    /// Connect `a` and `b`. Returns `None` without changing anything when
    /// `a == b`, either node is missing, or the pair is already connected.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> Option<ConnectionId> {
        if a == b || self.has_connection(a, b) {
            return None;
        }
        let ia = *self.node_index.get(&a)?;
        let ib = *self.node_index.get(&b)?;
        let id = ConnectionId::generate();
        let idx = self.graph.add_edge(ia, ib, Connection { id, from: a, to: b });
        self.connection_index.insert(id, idx);
        self.connection_order.push(id);
        log::debug!("connect {a} -> {b} as {id}");
        Some(id)
    }

    /// Insert a connection read from a save file. Dangling endpoints,
    /// self-links, duplicate pairs, and duplicate ids are rejected.
    pub fn insert_connection(&mut self, conn: Connection) -> bool {
        let (Some(&ia), Some(&ib)) = (self.node_index.get(&conn.from), self.node_index.get(&conn.to))
        else {
            return false;
        };
        if conn.from == conn.to
            || self.connection_index.contains_key(&conn.id)
            || self.graph.find_edge(ia, ib).is_some()
        {
            return false;
        }
        let idx = self.graph.add_edge(ia, ib, conn);
        self.connection_index.insert(conn.id, idx);
        self.connection_order.push(conn.id);
        true
    }

    /// Remove a connection. No-op for unknown ids.
    pub fn delete_connection(&mut self, id: ConnectionId) -> bool {
        let Some(idx) = self.connection_index.remove(&id) else {
            return false;
        };
        self.graph.remove_edge(idx);
        self.connection_order.retain(|c| *c != id);
        log::debug!("delete connection {id}");
        true
    }

    pub fn move_node(&mut self, id: NodeId, x: f64, y: f64) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.x = x;
                node.y = y;
                true
            }
            None => false,
        }
    }

    pub fn resize_node(&mut self, id: NodeId, width: f64, height: f64) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.width = width;
                node.height = height;
                true
            }
            None => false,
        }
    }

    pub fn set_content(&mut self, id: NodeId, content: impl Into<String>) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Flip a text node between pinned (typing) and unpinned (dragging).
    /// Image nodes are left alone.
    pub fn toggle_pin(&mut self, id: NodeId) -> bool {
        match self.node_mut(id) {
            Some(node) if node.is_text() => {
                node.pinned = !node.pinned;
                true
            }
            _ => false,
        }
    }

    /// Remove every node and connection.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_index.clear();
        self.connection_index.clear();
        self.node_order.clear();
        self.connection_order.clear();
    }

    // ─── Snapshots ───────────────────────────────────────────────────────

    pub fn to_snapshot(&self, canvas_offset: CanvasOffset) -> SceneSnapshot {
        SceneSnapshot {
            nodes: self.nodes().cloned().collect(),
            connections: self.connections().copied().collect(),
            canvas_offset,
        }
    }

    /// Build a scene from a snapshot. Connections that do not resolve to two
    /// distinct present nodes, or repeat an existing pair, are dropped.
    pub fn from_snapshot(snapshot: SceneSnapshot, config: &BoardConfig) -> (Self, CanvasOffset) {
        let mut scene = Self::new(config);
        for node in snapshot.nodes {
            scene.insert_node(node);
        }
        for conn in snapshot.connections {
            if !scene.insert_connection(conn) {
                log::warn!(
                    "dropping connection {} ({} -> {}): dangling or duplicate",
                    conn.id,
                    conn.from,
                    conn.to
                );
            }
        }
        (scene, snapshot.canvas_offset)
    }
}
