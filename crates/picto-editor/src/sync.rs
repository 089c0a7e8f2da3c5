//! Board engine: the scene, the view, and the visual tree kept in step.
//!
//! Every change goes through `BoardEngine::apply`, which mutates the
//! `Scene`/`ViewState` and then refreshes the `VisualTree` with the
//! narrowest scope that covers the batch:
//!
//! - position, size, and text edits patch one node and its connections
//! - pan updates only re-transform the layers
//! - anything structural (add/remove/connect/select/clear) rebuilds
//!
//! Gestures end with a full rebuild, so whatever the host holds after a
//! release never depends on the patch path.

use crate::input::InputEvent;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{DragTool, PanTool, ResizeTool, Tool};
use picto_core::{
    BoardConfig, CanvasOffset, ConnectionId, KeyValueStore, NodeId, NodeKind, Point, Scene,
    SceneLibrary, SceneSnapshot, StoreError, ViewState,
};
use picto_render::{Damage, HitTarget, RenderScope, VisualTree, hit_test};

/// Drop payload that creates a text node instead of an image.
pub const TEXT_PAYLOAD: &str = "::TEXT::";

/// A single change to the scene or the view.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Place a node (snapped); it becomes the selection.
    AddNode {
        kind: NodeKind,
        content: String,
        x: f64,
        y: f64,
    },
    MoveNode {
        id: NodeId,
        x: f64,
        y: f64,
    },
    ResizeNode {
        id: NodeId,
        width: f64,
        height: f64,
    },
    /// Remove a node, its connections, and the selection if it was selected.
    RemoveNode {
        id: NodeId,
    },
    /// No-op when the pair is already connected.
    Connect {
        a: NodeId,
        b: NodeId,
    },
    RemoveConnection {
        id: ConnectionId,
    },
    SetContent {
        id: NodeId,
        content: String,
    },
    TogglePin {
        id: NodeId,
    },
    /// Remove everything and clear the selection. The offset stays.
    Clear,
    Select(Option<NodeId>),
    SetOffset(CanvasOffset),
}

impl Mutation {
    fn scope(&self) -> RenderScope {
        match self {
            Self::MoveNode { id, .. } | Self::ResizeNode { id, .. } | Self::SetContent { id, .. } => {
                RenderScope::Node(*id)
            }
            Self::SetOffset(_) => RenderScope::Layers,
            _ => RenderScope::Full,
        }
    }
}

/// Smallest scope that covers both.
fn widen(current: Option<RenderScope>, next: RenderScope) -> RenderScope {
    match current {
        None => next,
        Some(scope) if scope == next => scope,
        Some(_) => RenderScope::Full,
    }
}

// ─── Gestures ────────────────────────────────────────────────────────────

enum Gesture {
    Idle,
    Dragging(DragTool),
    Resizing(ResizeTool),
    Panning(PanTool),
}

impl Gesture {
    fn tool_mut(&mut self) -> Option<&mut dyn Tool> {
        match self {
            Self::Idle => None,
            Self::Dragging(tool) => Some(tool as &mut dyn Tool),
            Self::Resizing(tool) => Some(tool as &mut dyn Tool),
            Self::Panning(tool) => Some(tool as &mut dyn Tool),
        }
    }

    /// Node the gesture moves or resizes.
    fn target(&self) -> Option<NodeId> {
        match self {
            Self::Dragging(tool) => Some(tool.id),
            Self::Resizing(tool) => Some(tool.id),
            Self::Idle | Self::Panning(_) => None,
        }
    }
}

// ─── Engine ──────────────────────────────────────────────────────────────

pub struct BoardEngine {
    scene: Scene,
    view: ViewState,
    tree: VisualTree,
    config: BoardConfig,
    gesture: Gesture,
    /// Pointer driving the current gesture.
    active_pointer: Option<i32>,
    /// Text node the host should focus after the next render.
    focus_request: Option<NodeId>,
    /// Set between `begin_print` and `finish_print`; input is ignored.
    pub(crate) printing: bool,
}

impl Default for BoardEngine {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl BoardEngine {
    pub fn new(config: BoardConfig) -> Self {
        let scene = Scene::new(&config);
        let view = ViewState::default();
        let mut tree = VisualTree::new(&config);
        tree.render(&scene, &view, RenderScope::Full);
        Self {
            scene,
            view,
            tree,
            config,
            gesture: Gesture::Idle,
            active_pointer: None,
            focus_request: None,
            printing: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn tree(&self) -> &VisualTree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut VisualTree {
        &mut self.tree
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.view.selected
    }

    pub fn is_gesture_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// Text node that was just placed and wants keyboard focus.
    pub fn take_focus_request(&mut self) -> Option<NodeId> {
        self.focus_request.take()
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Feed one input event. Returns what changed, or `None` when the event
    /// was ignored or changed nothing visible.
    pub fn handle(&mut self, event: &InputEvent) -> Option<Damage> {
        if self.printing {
            return None;
        }
        match event {
            InputEvent::PointerDown { x, y, pointer_id, .. } => {
                if !event.starts_gesture() || self.is_gesture_active() {
                    return None;
                }
                self.pointer_down(Point::new(*x, *y), *pointer_id)
            }
            InputEvent::PointerMove { pointer_id, .. } => {
                if self.active_pointer != Some(*pointer_id) {
                    return None;
                }
                let view = self.view;
                let mutations = self.gesture.tool_mut()?.handle(event, &view);
                self.apply(mutations)
            }
            InputEvent::PointerUp { pointer_id, .. } => {
                if self.active_pointer != Some(*pointer_id) {
                    return None;
                }
                let view = self.view;
                let mutations = match self.gesture.tool_mut() {
                    Some(tool) => tool.handle(event, &view),
                    None => vec![],
                };
                self.end_gesture();
                for mutation in mutations {
                    self.apply_one(mutation);
                }
                Some(self.render(RenderScope::Full))
            }
            InputEvent::Key { key, focus_in_text } => match ShortcutMap::resolve(key, *focus_in_text)? {
                ShortcutAction::Delete => self.delete_selected(),
                ShortcutAction::Deselect => self.deselect(),
            },
        }
    }

    fn pointer_down(&mut self, p: Point, pointer_id: i32) -> Option<Damage> {
        let hit = hit_test(&self.tree, p);
        log::debug!("pointer {pointer_id} down at ({}, {}) on {hit:?}", p.x, p.y);
        match hit {
            HitTarget::NodeDelete(id) => self.apply([Mutation::RemoveNode { id }]),
            HitTarget::PinToggle(id) => self.apply([Mutation::TogglePin { id }]),
            HitTarget::ConnectionDelete(id) => self.apply([Mutation::RemoveConnection { id }]),
            HitTarget::TextEditor(id) => self.apply([Mutation::Select(Some(id))]),
            HitTarget::ResizeHandle(id) => {
                let node = self.scene.node(id)?;
                let tool = ResizeTool::new(id, p, node.width, node.height, self.config.min_node_size);
                self.begin_gesture(Gesture::Resizing(tool), pointer_id);
                None
            }
            HitTarget::NodeBody(id) => {
                let node = self.scene.node(id)?;
                let tool = DragTool::new(
                    id,
                    p,
                    node.origin(),
                    self.config.grid_size,
                    self.config.click_threshold_sq,
                );
                self.begin_gesture(Gesture::Dragging(tool), pointer_id);
                None
            }
            HitTarget::Background => {
                let tool = PanTool::new(p, self.view.offset);
                self.begin_gesture(Gesture::Panning(tool), pointer_id);
                None
            }
        }
    }

    fn begin_gesture(&mut self, gesture: Gesture, pointer_id: i32) {
        self.gesture = gesture;
        self.active_pointer = Some(pointer_id);
    }

    fn end_gesture(&mut self) {
        if let Some(tool) = self.gesture.tool_mut() {
            log::debug!("{:?} gesture ended", tool.kind());
        }
        self.gesture = Gesture::Idle;
        self.active_pointer = None;
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Apply a batch of mutations and refresh the tree once.
    pub fn apply(&mut self, mutations: impl IntoIterator<Item = Mutation>) -> Option<Damage> {
        let mut scope = None;
        for mutation in mutations {
            scope = Some(widen(scope, mutation.scope()));
            self.apply_one(mutation);
        }
        scope.map(|scope| self.render(scope))
    }

    fn apply_one(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::AddNode { kind, content, x, y } => {
                let id = self.scene.add_node(kind, content, x, y);
                self.view.selected = Some(id);
                if kind == NodeKind::Text {
                    self.focus_request = Some(id);
                }
            }
            Mutation::MoveNode { id, x, y } => {
                self.scene.move_node(id, x, y);
            }
            Mutation::ResizeNode { id, width, height } => {
                let min = self.config.min_node_size;
                self.scene.resize_node(id, width.max(min), height.max(min));
            }
            Mutation::RemoveNode { id } => {
                if self.gesture.target() == Some(id) {
                    self.end_gesture();
                }
                self.scene.delete_node(id);
                if self.view.selected == Some(id) {
                    self.view.selected = None;
                }
            }
            Mutation::Connect { a, b } => {
                self.scene.connect(a, b);
            }
            Mutation::RemoveConnection { id } => {
                self.scene.delete_connection(id);
            }
            Mutation::SetContent { id, content } => {
                self.scene.set_content(id, content);
            }
            Mutation::TogglePin { id } => {
                self.scene.toggle_pin(id);
            }
            Mutation::Clear => {
                if self.gesture.target().is_some() {
                    self.end_gesture();
                }
                self.scene.clear();
                self.view.selected = None;
            }
            Mutation::Select(id) => {
                self.view.selected = id.filter(|id| self.scene.contains(*id));
            }
            Mutation::SetOffset(offset) => {
                self.view.offset = offset;
            }
        }
    }

    pub(crate) fn render(&mut self, scope: RenderScope) -> Damage {
        self.tree.render(&self.scene, &self.view, scope)
    }

    // ─── Placement ───────────────────────────────────────────────────────

    /// Drop a catalog payload at a workspace point. `"::TEXT::"` creates a
    /// text node; blank payloads are ignored.
    pub fn drop_payload(&mut self, payload: &str, x: f64, y: f64) -> Option<Damage> {
        if payload.trim().is_empty() {
            log::warn!("ignoring drop with empty payload");
            return None;
        }
        let (kind, content) = if payload == TEXT_PAYLOAD {
            (NodeKind::Text, String::new())
        } else {
            (NodeKind::Image, payload.to_string())
        };
        let half = self.config.default_node_size / 2.0;
        let p = self.view.to_canvas(Point::new(x, y));
        self.apply([Mutation::AddNode {
            kind,
            content,
            x: p.x - half,
            y: p.y - half,
        }])
    }

    /// Place a node in the middle of the visible workspace.
    pub fn place_at_center(
        &mut self,
        kind: NodeKind,
        content: impl Into<String>,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Option<Damage> {
        let half = self.config.default_node_size / 2.0;
        let center = self
            .view
            .to_canvas(Point::new(viewport_width / 2.0, viewport_height / 2.0));
        self.apply([Mutation::AddNode {
            kind,
            content: content.into(),
            x: center.x - half,
            y: center.y - half,
        }])
    }

    /// Text typed into a node's editor.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Option<Damage> {
        if !self.scene.contains(id) {
            return None;
        }
        self.apply([Mutation::SetContent {
            id,
            content: text.into(),
        }])
    }

    pub fn delete_selected(&mut self) -> Option<Damage> {
        let id = self.view.selected?;
        self.apply([Mutation::RemoveNode { id }])
    }

    pub fn deselect(&mut self) -> Option<Damage> {
        self.view.selected?;
        self.apply([Mutation::Select(None)])
    }

    pub fn clear_all(&mut self) -> Damage {
        self.end_gesture();
        self.apply_one(Mutation::Clear);
        self.render(RenderScope::Full)
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SceneSnapshot {
        self.scene.to_snapshot(self.view.offset)
    }

    pub fn save<S: KeyValueStore>(
        &self,
        library: &mut SceneLibrary<S>,
        name: &str,
    ) -> Result<(), StoreError> {
        library.save(name, &self.snapshot())
    }

    /// Replace the scene with a saved one. On failure the current scene is
    /// left untouched.
    pub fn load<S: KeyValueStore>(
        &mut self,
        library: &SceneLibrary<S>,
        name: &str,
    ) -> Result<Damage, StoreError> {
        match library.load(name) {
            Ok(snapshot) => {
                log::info!("loaded scene '{name}'");
                Ok(self.load_snapshot(snapshot))
            }
            Err(err) => {
                log::error!("load of '{name}' failed: {err}");
                Err(err)
            }
        }
    }

    pub fn load_snapshot(&mut self, snapshot: SceneSnapshot) -> Damage {
        let (scene, offset) = Scene::from_snapshot(snapshot, &self.config);
        self.end_gesture();
        self.scene = scene;
        self.view.offset = offset;
        if let Some(id) = self.view.selected
            && !self.scene.contains(id)
        {
            self.view.selected = None;
        }
        self.render(RenderScope::Full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn engine_with(nodes: &[(f64, f64)]) -> (BoardEngine, Vec<NodeId>) {
        let mut engine = BoardEngine::default();
        let ids = nodes
            .iter()
            .map(|&(x, y)| {
                engine.place_at_center(NodeKind::Image, "p.png", 2.0 * (x + 50.0), 2.0 * (y + 50.0));
                engine.selected().unwrap()
            })
            .collect();
        engine.apply([Mutation::Select(None)]);
        (engine, ids)
    }

    fn click(engine: &mut BoardEngine, x: f64, y: f64) -> Option<Damage> {
        engine.handle(&InputEvent::down(x, y, 1));
        engine.handle(&InputEvent::up(x, y, 1))
    }

    #[test]
    fn scope_of_batches() {
        let a = NodeId::intern("a");
        let b = NodeId::intern("b");
        let moves = [
            Mutation::MoveNode { id: a, x: 0.0, y: 0.0 },
            Mutation::ResizeNode {
                id: a,
                width: 60.0,
                height: 60.0,
            },
        ];
        let scope = moves.iter().fold(None, |s, m| Some(widen(s, m.scope())));
        assert_eq!(scope, Some(RenderScope::Node(a)));

        let mixed = widen(Some(RenderScope::Node(a)), RenderScope::Node(b));
        assert_eq!(mixed, RenderScope::Full);
        assert_eq!(widen(None, RenderScope::Layers), RenderScope::Layers);
        assert_eq!(widen(Some(RenderScope::Layers), RenderScope::Node(a)), RenderScope::Full);
    }

    #[test]
    fn place_at_center_uses_offset() {
        let mut engine = BoardEngine::default();
        engine.apply([Mutation::SetOffset(CanvasOffset::new(100.0, 40.0))]);
        engine.place_at_center(NodeKind::Image, "p.png", 1000.0, 600.0);
        let node = engine.scene().node(engine.selected().unwrap()).unwrap();
        // 500 - 100 - 50 = 350 → 360; 300 - 40 - 50 = 210 → 220
        assert_eq!((node.x, node.y), (360.0, 220.0));
    }

    #[test]
    fn drop_text_payload_requests_focus() {
        let mut engine = BoardEngine::default();
        assert!(engine.drop_payload(TEXT_PAYLOAD, 200.0, 200.0).is_some());
        let id = engine.selected().unwrap();
        let node = engine.scene().node(id).unwrap();
        assert_eq!(node.kind, NodeKind::Text);
        assert_eq!(node.content, "");
        assert_eq!((node.x, node.y), (160.0, 160.0));
        assert_eq!(engine.take_focus_request(), Some(id));
        assert_eq!(engine.take_focus_request(), None);
    }

    #[test]
    fn blank_drop_is_ignored() {
        let mut engine = BoardEngine::default();
        assert_eq!(engine.drop_payload("  ", 10.0, 10.0), None);
        assert!(engine.scene().is_empty());
    }

    #[test]
    fn click_select_connect_cycle() {
        let (mut engine, ids) = engine_with(&[(0.0, 0.0), (300.0, 0.0)]);
        let (a, b) = (ids[0], ids[1]);

        click(&mut engine, 40.0, 40.0);
        assert_eq!(engine.selected(), Some(a));

        click(&mut engine, 340.0, 40.0);
        assert!(engine.scene().has_connection(a, b));
        assert_eq!(engine.selected(), Some(b));

        click(&mut engine, 340.0, 40.0);
        assert_eq!(engine.selected(), None);
    }

    #[test]
    fn drag_moves_without_selecting() {
        let (mut engine, ids) = engine_with(&[(0.0, 0.0)]);
        let a = ids[0];
        engine.handle(&InputEvent::down(40.0, 40.0, 1));
        let damage = engine.handle(&InputEvent::moved(107.0, 71.0, 1));
        assert!(matches!(damage, Some(Damage::Elements { .. })));
        assert_eq!(engine.handle(&InputEvent::up(107.0, 71.0, 1)), Some(Damage::Full));

        let node = engine.scene().node(a).unwrap();
        assert_eq!((node.x, node.y), (60.0, 40.0));
        assert_eq!(engine.selected(), None);
    }

    #[test]
    fn foreign_pointers_are_ignored() {
        let (mut engine, ids) = engine_with(&[(0.0, 0.0)]);
        engine.handle(&InputEvent::down(40.0, 40.0, 1));
        assert_eq!(engine.handle(&InputEvent::down(500.0, 500.0, 2)), None);
        assert_eq!(engine.handle(&InputEvent::moved(300.0, 300.0, 2)), None);
        assert_eq!(engine.handle(&InputEvent::up(300.0, 300.0, 2)), None);
        assert!(engine.is_gesture_active());
        engine.handle(&InputEvent::up(40.0, 40.0, 1));
        assert_eq!(engine.selected(), Some(ids[0]));
    }

    #[test]
    fn pan_moves_layers_only() {
        let (mut engine, _) = engine_with(&[(0.0, 0.0)]);
        engine.handle(&InputEvent::down(500.0, 500.0, 1));
        let damage = engine.handle(&InputEvent::moved(530.0, 480.0, 1));
        assert_eq!(damage, Some(Damage::Layers));
        engine.handle(&InputEvent::up(530.0, 480.0, 1));
        assert_eq!(engine.view().offset, CanvasOffset::new(30.0, -20.0));
        assert_eq!(engine.tree().node_layer.css, "translate(30px, -20px)");
    }

    #[test]
    fn resize_keeps_selection_and_minimum() {
        let (mut engine, ids) = engine_with(&[(0.0, 0.0)]);
        engine.apply([Mutation::Select(Some(ids[0]))]);
        engine.handle(&InputEvent::down(95.0, 95.0, 1));
        engine.handle(&InputEvent::moved(10.0, 150.0, 1));
        engine.handle(&InputEvent::up(10.0, 150.0, 1));
        let node = engine.scene().node(ids[0]).unwrap();
        assert_eq!((node.width, node.height), (50.0, 155.0));
        assert_eq!(engine.selected(), Some(ids[0]));
    }

    #[test]
    fn delete_glyph_removes_selected_node() {
        let (mut engine, ids) = engine_with(&[(0.0, 0.0), (300.0, 0.0)]);
        engine.apply([Mutation::Connect { a: ids[0], b: ids[1] }]);
        engine.apply([Mutation::Select(Some(ids[0]))]);
        engine.handle(&InputEvent::down(100.0, 0.0, 1));
        assert!(!engine.scene().contains(ids[0]));
        assert_eq!(engine.scene().connection_count(), 0);
        assert_eq!(engine.selected(), None);
        assert!(!engine.is_gesture_active());
    }

    #[test]
    fn connection_glyph_deletes_without_panning() {
        let (mut engine, ids) = engine_with(&[(0.0, 0.0), (400.0, 0.0)]);
        engine.apply([Mutation::Connect { a: ids[0], b: ids[1] }]);
        // Anchors (50,50) and (450,50): midpoint (250,50).
        assert_eq!(engine.handle(&InputEvent::down(250.0, 50.0, 1)), Some(Damage::Full));
        assert_eq!(engine.scene().connection_count(), 0);
        assert!(!engine.is_gesture_active());
    }

    #[test]
    fn pinned_text_body_selects_only() {
        let mut engine = BoardEngine::default();
        engine.drop_payload(TEXT_PAYLOAD, 50.0, 50.0);
        let t = engine.selected().unwrap();
        engine.apply([Mutation::Select(None)]);

        engine.handle(&InputEvent::down(50.0, 50.0, 1));
        assert_eq!(engine.selected(), Some(t));
        assert!(!engine.is_gesture_active());

        // Second press keeps the selection; no toggle.
        engine.handle(&InputEvent::down(50.0, 50.0, 1));
        assert_eq!(engine.selected(), Some(t));
    }

    #[test]
    fn pin_glyph_toggles() {
        let mut engine = BoardEngine::default();
        engine.drop_payload(TEXT_PAYLOAD, 50.0, 50.0);
        let t = engine.selected().unwrap();
        engine.handle(&InputEvent::down(2.0, 2.0, 1));
        assert!(!engine.scene().node(t).unwrap().pinned);
        assert!(!engine.is_gesture_active());
    }

    #[test]
    fn keyboard_delete_respects_text_focus() {
        let (mut engine, ids) = engine_with(&[(0.0, 0.0)]);
        engine.apply([Mutation::Select(Some(ids[0]))]);
        assert_eq!(engine.handle(&InputEvent::key("Backspace", true)), None);
        assert!(engine.scene().contains(ids[0]));

        engine.handle(&InputEvent::key("Delete", false));
        assert!(!engine.scene().contains(ids[0]));
        assert_eq!(engine.handle(&InputEvent::key("Delete", false)), None);
    }

    #[test]
    fn escape_deselects() {
        let (mut engine, ids) = engine_with(&[(0.0, 0.0)]);
        engine.apply([Mutation::Select(Some(ids[0]))]);
        assert_eq!(engine.handle(&InputEvent::key("Escape", false)), Some(Damage::Full));
        assert_eq!(engine.selected(), None);
    }

    #[test]
    fn set_text_patches_node() {
        let mut engine = BoardEngine::default();
        engine.drop_payload(TEXT_PAYLOAD, 50.0, 50.0);
        let t = engine.selected().unwrap();
        let damage = engine.set_text(t, "hello");
        assert!(matches!(damage, Some(Damage::Elements { .. })));
        assert_eq!(engine.scene().node(t).unwrap().content, "hello");
        assert_eq!(engine.set_text(NodeId::intern("ghost"), "x"), None);
    }

    #[test]
    fn clear_all_keeps_offset() {
        let (mut engine, _) = engine_with(&[(0.0, 0.0), (300.0, 0.0)]);
        engine.apply([Mutation::SetOffset(CanvasOffset::new(12.0, 34.0))]);
        assert_eq!(engine.clear_all(), Damage::Full);
        assert!(engine.scene().is_empty());
        assert_eq!(engine.selected(), None);
        assert_eq!(engine.view().offset, CanvasOffset::new(12.0, 34.0));
    }

    #[test]
    fn deleting_dragged_node_ends_the_drag() {
        let (mut engine, ids) = engine_with(&[(0.0, 0.0)]);
        click(&mut engine, 40.0, 40.0);
        assert_eq!(engine.selected(), Some(ids[0]));

        engine.handle(&InputEvent::down(40.0, 40.0, 1));
        assert!(matches!(
            engine.handle(&InputEvent::moved(80.0, 80.0, 1)),
            Some(Damage::Elements { .. })
        ));
        assert_eq!(engine.handle(&InputEvent::key("Delete", false)), Some(Damage::Full));
        assert!(!engine.is_gesture_active());

        for step in 1..=3 {
            let p = 80.0 + f64::from(step) * 20.0;
            assert_eq!(engine.handle(&InputEvent::moved(p, p, 1)), None);
        }
        assert_eq!(engine.handle(&InputEvent::up(140.0, 140.0, 1)), None);
    }

    #[test]
    fn deleting_another_node_keeps_the_drag() {
        let (mut engine, ids) = engine_with(&[(0.0, 0.0), (300.0, 0.0)]);
        let (a, b) = (ids[0], ids[1]);
        engine.handle(&InputEvent::down(40.0, 40.0, 1));
        engine.handle(&InputEvent::moved(80.0, 80.0, 1));
        engine.apply([Mutation::Select(Some(b))]);
        engine.handle(&InputEvent::key("Delete", false));

        assert!(engine.is_gesture_active());
        let damage = engine.handle(&InputEvent::moved(120.0, 120.0, 1));
        assert_eq!(
            damage,
            Some(Damage::Elements {
                nodes: smallvec::smallvec![a],
                connections: smallvec::SmallVec::new(),
            })
        );
    }

    #[test]
    fn clear_all_ends_a_resize() {
        let (mut engine, _) = engine_with(&[(0.0, 0.0)]);
        engine.handle(&InputEvent::down(95.0, 95.0, 1));
        assert!(engine.is_gesture_active());
        engine.clear_all();
        assert!(!engine.is_gesture_active());
        assert_eq!(engine.handle(&InputEvent::moved(150.0, 150.0, 1)), None);
    }
}
