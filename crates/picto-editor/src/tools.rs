//! Tool system for canvas gestures.
//!
//! A tool is created on pointer-down with whatever it captured at that
//! moment, then translates the following moves and the release into
//! `Mutation`s that the `BoardEngine` applies.
//!
//! | Pointer-down on | Tool | Move | Release |
//! |-----------------|------|------|---------|
//! | node body | `DragTool` | snapped reposition once dragging | click → select/connect |
//! | resize handle | `ResizeTool` | clamped resize | — |
//! | background | `PanTool` | canvas offset | — |

use crate::gesture::{ClickClassifier, GestureClass};
use crate::input::InputEvent;
use crate::sync::Mutation;
use picto_core::{CanvasOffset, NodeId, Point, Vec2, ViewState, snap_to_grid};
use smallvec::{SmallVec, smallvec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Drag,
    Resize,
    Pan,
}

/// Trait for tools that handle input and produce mutations.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Handle a move or release of the gesture's pointer.
    fn handle(&mut self, event: &InputEvent, view: &ViewState) -> Vec<Mutation>;
}

fn pointer(event: &InputEvent) -> Option<Point> {
    event.position().map(|(x, y)| Point::new(x, y))
}

/// Click on a node body when nothing was dragged.
///
/// Nothing selected → select. Clicking the selection → deselect. Clicking
/// another node → connect it to the selection and move the selection there.
pub fn select_connect(selected: Option<NodeId>, clicked: NodeId) -> SmallVec<[Mutation; 2]> {
    match selected {
        None => smallvec![Mutation::Select(Some(clicked))],
        Some(current) if current == clicked => smallvec![Mutation::Select(None)],
        Some(current) => smallvec![
            Mutation::Connect {
                a: current,
                b: clicked
            },
            Mutation::Select(Some(clicked)),
        ],
    }
}

// ─── Drag Tool ───────────────────────────────────────────────────────────

pub struct DragTool {
    pub id: NodeId,
    origin: Point,
    classifier: ClickClassifier,
    grid: f64,
}

impl DragTool {
    /// `origin` is the node's position at pointer-down.
    pub fn new(id: NodeId, pointer: Point, origin: Point, grid: f64, threshold_sq: f64) -> Self {
        Self {
            id,
            origin,
            classifier: ClickClassifier::new(pointer, threshold_sq),
            grid,
        }
    }

    pub fn class(&self) -> GestureClass {
        self.classifier.class()
    }
}

impl Tool for DragTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Drag
    }

    fn handle(&mut self, event: &InputEvent, view: &ViewState) -> Vec<Mutation> {
        match event {
            InputEvent::PointerMove { .. } => {
                let Some(p) = pointer(event) else {
                    return vec![];
                };
                if self.classifier.update(p) == GestureClass::Click {
                    return vec![];
                }
                let delta = p - self.classifier.start();
                vec![Mutation::MoveNode {
                    id: self.id,
                    x: snap_to_grid(self.origin.x + delta.x, self.grid),
                    y: snap_to_grid(self.origin.y + delta.y, self.grid),
                }]
            }
            InputEvent::PointerUp { .. } => match self.classifier.class() {
                GestureClass::Click => select_connect(view.selected, self.id).into_vec(),
                GestureClass::Drag => vec![],
            },
            _ => vec![],
        }
    }
}

// ─── Resize Tool ─────────────────────────────────────────────────────────

pub struct ResizeTool {
    pub id: NodeId,
    start: Point,
    width: f64,
    height: f64,
    min_size: f64,
}

impl ResizeTool {
    pub fn new(id: NodeId, pointer: Point, width: f64, height: f64, min_size: f64) -> Self {
        Self {
            id,
            start: pointer,
            width,
            height,
            min_size,
        }
    }
}

impl Tool for ResizeTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Resize
    }

    fn handle(&mut self, event: &InputEvent, _view: &ViewState) -> Vec<Mutation> {
        let (InputEvent::PointerMove { .. }, Some(p)) = (event, pointer(event)) else {
            return vec![];
        };
        let delta = p - self.start;
        vec![Mutation::ResizeNode {
            id: self.id,
            width: (self.width + delta.x).max(self.min_size),
            height: (self.height + delta.y).max(self.min_size),
        }]
    }
}

// ─── Pan Tool ────────────────────────────────────────────────────────────

pub struct PanTool {
    /// Pointer position minus the offset at pointer-down.
    anchor: Vec2,
}

impl PanTool {
    pub fn new(pointer: Point, offset: CanvasOffset) -> Self {
        Self {
            anchor: pointer.to_vec2() - offset.to_vec2(),
        }
    }
}

impl Tool for PanTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Pan
    }

    fn handle(&mut self, event: &InputEvent, _view: &ViewState) -> Vec<Mutation> {
        let (InputEvent::PointerMove { .. }, Some(p)) = (event, pointer(event)) else {
            return vec![];
        };
        let offset = p.to_vec2() - self.anchor;
        vec![Mutation::SetOffset(CanvasOffset::new(offset.x, offset.y))]
    }
}
