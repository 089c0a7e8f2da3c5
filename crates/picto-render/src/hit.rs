//! Hit testing: workspace point → interaction target.
//!
//! Tests against the visual tree (what the user sees), not the scene.
//! Targets are checked class by class in priority order; within a class
//! the topmost (last painted) element wins.

use crate::visual::{HitMetrics, NodeBody, NodeVisual, VisualTree};
use kurbo::{Point, Rect};
use picto_core::{ConnectionId, NodeId};

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Delete glyph of the selected node.
    NodeDelete(NodeId),
    /// Pin glyph of a text node.
    PinToggle(NodeId),
    ResizeHandle(NodeId),
    /// Delete glyph at a connection's midpoint.
    ConnectionDelete(ConnectionId),
    /// Body of a pinned text node (typing area).
    TextEditor(NodeId),
    NodeBody(NodeId),
    Background,
}

impl HitTarget {
    /// The node this target belongs to, if any.
    pub fn node(&self) -> Option<NodeId> {
        match *self {
            Self::NodeDelete(id)
            | Self::PinToggle(id)
            | Self::ResizeHandle(id)
            | Self::TextEditor(id)
            | Self::NodeBody(id) => Some(id),
            Self::ConnectionDelete(_) | Self::Background => None,
        }
    }
}

fn within(center: Point, radius: f64, p: Point) -> bool {
    (p - center).hypot2() <= radius * radius
}

fn body_rect(node: &NodeVisual) -> Rect {
    Rect::new(node.x, node.y, node.x + node.width, node.y + node.height)
}

fn delete_glyph_hit(node: &NodeVisual, m: &HitMetrics, p: Point) -> bool {
    node.has_delete_affordance
        && within(Point::new(node.x + node.width, node.y), m.delete_glyph_radius, p)
}

fn pin_glyph_hit(node: &NodeVisual, m: &HitMetrics, p: Point) -> bool {
    node.pin_glyph.is_some() && within(Point::new(node.x, node.y), m.pin_glyph_radius, p)
}

fn resize_handle_hit(node: &NodeVisual, m: &HitMetrics, p: Point) -> bool {
    let s = m.resize_handle_size;
    let x1 = node.x + node.width;
    let y1 = node.y + node.height;
    Rect::new(x1 - s, y1 - s, x1, y1).contains(p)
}

fn body_hit(node: &NodeVisual, p: Point) -> bool {
    let r = body_rect(node);
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

/// Find the target under `point`, given in workspace coordinates
/// (pointer position relative to the workspace, before undoing the pan).
pub fn hit_test(tree: &VisualTree, point: Point) -> HitTarget {
    let p = tree.node_layer.transform.to_affine().inverse() * point;
    let m = tree.metrics();

    let topmost = |test: &dyn Fn(&NodeVisual) -> bool| -> Option<NodeId> {
        tree.nodes.iter().rev().find(|n| test(n)).map(|n| n.id)
    };

    if let Some(id) = topmost(&|n| delete_glyph_hit(n, m, p)) {
        return HitTarget::NodeDelete(id);
    }
    if let Some(id) = topmost(&|n| pin_glyph_hit(n, m, p)) {
        return HitTarget::PinToggle(id);
    }
    if let Some(id) = topmost(&|n| resize_handle_hit(n, m, p)) {
        return HitTarget::ResizeHandle(id);
    }

    let connection_p = tree.connection_layer.transform.to_affine().inverse() * point;
    if let Some(conn) = tree
        .connections
        .iter()
        .rev()
        .find(|c| within(c.delete_anchor, m.connection_glyph_radius, connection_p))
    {
        return HitTarget::ConnectionDelete(conn.id);
    }

    if let Some(node) = tree.nodes.iter().rev().find(|n| body_hit(n, p)) {
        return match node.body {
            NodeBody::Text { pinned: true, .. } => HitTarget::TextEditor(node.id),
            _ => HitTarget::NodeBody(node.id),
        };
    }

    HitTarget::Background
}
