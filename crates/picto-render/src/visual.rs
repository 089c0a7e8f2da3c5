//! Visual tree: the projection of `Scene` + `ViewState` that the host draws.
//!
//! One render entry point with a scope. `Full` regenerates every element;
//! `Node` re-derives a single node and the connections touching it (the
//! per-frame drag path); `Layers` only re-applies the pan transform. All
//! scopes go through the same element builders, so a patched tree is
//! identical to a freshly rebuilt one for the same state.

use picto_core::{
    BoardConfig, Connection, ConnectionCurve, ConnectionId, LayerTransform, Node, NodeId, NodeKind,
    Point, PrintLayout, Scene, ViewState,
};
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::HashMap;

/// How much of the tree a render call must refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderScope {
    /// Discard and regenerate everything.
    Full,
    /// One node plus every connection touching it.
    Node(NodeId),
    /// Only the layer transforms (pan).
    Layers,
}

/// What a render call changed, so the host can push just that.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Damage {
    Full,
    Layers,
    Elements {
        nodes: SmallVec<[NodeId; 1]>,
        connections: SmallVec<[ConnectionId; 4]>,
    },
}

// ─── Elements ────────────────────────────────────────────────────────────

/// Glyph shown on text nodes to switch between typing and dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PinGlyph {
    /// Typing mode; clicking unpins.
    Pinned,
    /// Dragging mode; clicking pins.
    Unpinned,
}

impl PinGlyph {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Pinned => "📌",
            Self::Unpinned => "✥",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeBody {
    Image { src: String },
    Text { content: String, pinned: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeVisual {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// `translate(xpx, ypx)` within the node layer.
    pub transform: String,
    pub body: NodeBody,
    pub selected: bool,
    pub has_delete_affordance: bool,
    pub pin_glyph: Option<PinGlyph>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionVisual {
    pub id: ConnectionId,
    pub from: NodeId,
    pub to: NodeId,
    /// SVG path data of the bezier.
    pub path: String,
    /// Center of the delete glyph (curve midpoint).
    pub delete_anchor: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub transform: LayerTransform,
    pub css: String,
}

impl Layer {
    fn new(transform: LayerTransform) -> Self {
        Self {
            css: transform.css_transform(),
            transform,
        }
    }
}

/// Hit geometry of the affordances, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitMetrics {
    pub delete_glyph_radius: f64,
    pub pin_glyph_radius: f64,
    pub resize_handle_size: f64,
    pub connection_glyph_radius: f64,
}

impl HitMetrics {
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            delete_glyph_radius: config.delete_glyph_radius,
            pin_glyph_radius: config.pin_glyph_radius,
            resize_handle_size: config.resize_handle_size,
            connection_glyph_radius: config.connection_glyph_radius,
        }
    }
}

// ─── Tree ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualTree {
    pub node_layer: Layer,
    pub connection_layer: Layer,
    pub nodes: Vec<NodeVisual>,
    pub connections: Vec<ConnectionVisual>,
    #[serde(skip)]
    node_slots: HashMap<NodeId, usize>,
    #[serde(skip)]
    connection_slots: HashMap<ConnectionId, usize>,
    #[serde(skip)]
    asset_base: String,
    #[serde(skip)]
    anchor_offset: f64,
    #[serde(skip)]
    max_control_offset: f64,
    #[serde(skip)]
    metrics: HitMetrics,
    /// Replaces the pan on both layers while a print is composed.
    #[serde(skip)]
    print_layout: Option<PrintLayout>,
}

impl VisualTree {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            node_layer: Layer::new(LayerTransform::default()),
            connection_layer: Layer::new(LayerTransform::default()),
            nodes: Vec::new(),
            connections: Vec::new(),
            node_slots: HashMap::new(),
            connection_slots: HashMap::new(),
            asset_base: config.asset_base.clone(),
            anchor_offset: config.anchor_offset,
            max_control_offset: config.max_control_offset,
            metrics: HitMetrics::from_config(config),
            print_layout: None,
        }
    }

    pub fn metrics(&self) -> &HitMetrics {
        &self.metrics
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeVisual> {
        self.node_slots.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&ConnectionVisual> {
        self.connection_slots
            .get(&id)
            .map(|&slot| &self.connections[slot])
    }

    pub fn print_layout(&self) -> Option<&PrintLayout> {
        self.print_layout.as_ref()
    }

    /// Install or lift the print transform. While installed, every render
    /// scope puts it on both layers in place of the pan; the next render
    /// applies the change.
    pub fn set_print_layout(&mut self, layout: Option<PrintLayout>) {
        self.print_layout = layout;
    }

    /// Bring the tree in line with `scene` and `view` for the given scope.
    pub fn render(&mut self, scene: &Scene, view: &ViewState, scope: RenderScope) -> Damage {
        match scope {
            RenderScope::Full => {
                self.rebuild(scene, view);
                Damage::Full
            }
            RenderScope::Layers => {
                self.apply_layers(view);
                Damage::Layers
            }
            RenderScope::Node(id) => match self.patch_node(scene, view, id) {
                Some(damage) => damage,
                None => {
                    // Element missing from the tree: a structural change
                    // slipped past a full rebuild.
                    log::debug!("patch of {id} fell back to full rebuild");
                    self.rebuild(scene, view);
                    Damage::Full
                }
            },
        }
    }

    fn apply_layers(&mut self, view: &ViewState) {
        let transform = match self.print_layout {
            Some(layout) => LayerTransform::Print { layout },
            None => LayerTransform::pan(view.offset),
        };
        self.node_layer = Layer::new(transform);
        self.connection_layer = Layer::new(transform);
    }

    fn rebuild(&mut self, scene: &Scene, view: &ViewState) {
        self.nodes.clear();
        self.connections.clear();
        self.node_slots.clear();
        self.connection_slots.clear();

        for conn in scene.connections() {
            if let Some(visual) = self.build_connection(scene, conn) {
                self.connection_slots.insert(conn.id, self.connections.len());
                self.connections.push(visual);
            }
        }
        for node in scene.nodes() {
            let visual = self.build_node(node, view);
            self.node_slots.insert(node.id, self.nodes.len());
            self.nodes.push(visual);
        }
        self.apply_layers(view);
    }

    fn patch_node(&mut self, scene: &Scene, view: &ViewState, id: NodeId) -> Option<Damage> {
        let node = scene.node(id)?;
        let slot = *self.node_slots.get(&id)?;
        let visual = self.build_node(node, view);
        self.nodes[slot] = visual;

        let mut connections = SmallVec::new();
        for conn in scene.connections_of(id) {
            let slot = *self.connection_slots.get(&conn.id)?;
            let visual = self.build_connection(scene, conn)?;
            self.connections[slot] = visual;
            connections.push(conn.id);
        }
        log::trace!("patched {id} and {} connections", connections.len());

        let mut nodes = SmallVec::new();
        nodes.push(id);
        Some(Damage::Elements { nodes, connections })
    }

    fn build_node(&self, node: &Node, view: &ViewState) -> NodeVisual {
        let selected = view.is_selected(node.id);
        let (body, pin_glyph) = match node.kind {
            NodeKind::Image => (
                NodeBody::Image {
                    src: self.image_src(&node.content),
                },
                None,
            ),
            NodeKind::Text => (
                NodeBody::Text {
                    content: node.content.clone(),
                    pinned: node.pinned,
                },
                Some(if node.pinned {
                    PinGlyph::Pinned
                } else {
                    PinGlyph::Unpinned
                }),
            ),
        };
        NodeVisual {
            id: node.id,
            x: node.x,
            y: node.y,
            width: node.width,
            height: node.height,
            transform: format!("translate({}px, {}px)", node.x, node.y),
            body,
            selected,
            has_delete_affordance: selected,
            pin_glyph,
        }
    }

    fn build_connection(&self, scene: &Scene, conn: &Connection) -> Option<ConnectionVisual> {
        let from = scene.node(conn.from)?;
        let to = scene.node(conn.to)?;
        let curve = ConnectionCurve::between(
            from.origin(),
            to.origin(),
            self.anchor_offset,
            self.max_control_offset,
        );
        Some(ConnectionVisual {
            id: conn.id,
            from: conn.from,
            to: conn.to,
            path: curve.path_data(),
            delete_anchor: curve.midpoint(),
        })
    }

    fn image_src(&self, content: &str) -> String {
        if content.starts_with("data:") {
            content.to_string()
        } else {
            format!("{}{}", self.asset_base, content)
        }
    }
}
