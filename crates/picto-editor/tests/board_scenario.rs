//! Integration tests: full board sessions (picto-editor ↔ picto-core ↔ picto-render).
//!
//! Drives the engine through pointer and keyboard events only, then checks
//! the scene, the selection, persistence, and the visual tree.

use picto_core::{
    BoardConfig, CanvasOffset, KeyValueStore, MemoryStore, NodeKind, SceneLibrary, StoreError,
};
use picto_editor::{BoardEngine, InputEvent, Mutation, TEXT_PAYLOAD};
use picto_render::{Damage, RenderScope, VisualTree};
use pretty_assertions::assert_eq;

fn library() -> SceneLibrary<MemoryStore> {
    SceneLibrary::new(MemoryStore::new(), BoardConfig::default().storage_namespace)
}

fn click(engine: &mut BoardEngine, x: f64, y: f64) {
    engine.handle(&InputEvent::down(x, y, 1));
    engine.handle(&InputEvent::up(x, y, 1));
}

fn drag(engine: &mut BoardEngine, from: (f64, f64), to: (f64, f64)) {
    engine.handle(&InputEvent::down(from.0, from.1, 1));
    let steps = 5;
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        engine.handle(&InputEvent::moved(
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
            1,
        ));
    }
    engine.handle(&InputEvent::up(to.0, to.1, 1));
}

fn add_image(engine: &mut BoardEngine, content: &str, x: f64, y: f64) -> picto_core::NodeId {
    engine.apply([Mutation::AddNode {
        kind: NodeKind::Image,
        content: content.into(),
        x,
        y,
    }]);
    engine.selected().unwrap()
}

fn rebuilt(engine: &BoardEngine) -> VisualTree {
    let mut tree = VisualTree::new(engine.config());
    tree.render(engine.scene(), engine.view(), RenderScope::Full);
    tree
}

// ─── Scenario ────────────────────────────────────────────────────────────

#[test]
fn select_connect_delete_save_load() {
    let mut engine = BoardEngine::default();

    let a = add_image(&mut engine, "sun.png", 105.0, 112.0);
    let node = engine.scene().node(a).unwrap();
    assert_eq!((node.x, node.y), (100.0, 120.0));

    let b = add_image(&mut engine, "moon.png", 400.0, 120.0);
    engine.handle(&InputEvent::key("Escape", false));
    assert_eq!(engine.selected(), None);

    click(&mut engine, 140.0, 170.0);
    assert_eq!(engine.selected(), Some(a));
    click(&mut engine, 440.0, 170.0);
    assert!(engine.scene().has_connection(a, b));
    assert_eq!(engine.selected(), Some(b));

    // Connecting the same pair again is a no-op.
    click(&mut engine, 440.0, 170.0);
    assert_eq!(engine.selected(), None);
    click(&mut engine, 140.0, 170.0);
    click(&mut engine, 440.0, 170.0);
    assert_eq!(engine.scene().connection_count(), 1);

    click(&mut engine, 440.0, 170.0);
    assert_eq!(engine.selected(), None);

    let c = add_image(&mut engine, "tree.png", 100.0, 400.0);
    engine.apply([Mutation::Connect { a, b: c }]);
    engine.apply([Mutation::Select(Some(b))]);
    engine.handle(&InputEvent::key("Delete", false));
    assert!(!engine.scene().contains(b));
    assert!(engine.scene().contains(a));
    assert_eq!(engine.scene().connection_count(), 1);
    assert_eq!(engine.selected(), None);

    engine.apply([Mutation::SetOffset(CanvasOffset::new(-40.0, 60.0))]);
    let mut lib = library();
    engine.save(&mut lib, "x").unwrap();
    let before = engine.scene().clone();

    engine.clear_all();
    assert!(engine.scene().is_empty());
    engine.apply([Mutation::SetOffset(CanvasOffset::ZERO)]);

    assert_eq!(engine.load(&lib, "x").unwrap(), Damage::Full);
    assert_eq!(engine.scene(), &before);
    assert_eq!(engine.view().offset, CanvasOffset::new(-40.0, 60.0));
    assert_eq!(engine.tree(), &rebuilt(&engine));
}

#[test]
fn failed_load_keeps_scene() {
    let mut engine = BoardEngine::default();
    add_image(&mut engine, "sun.png", 0.0, 0.0);
    let before = engine.scene().clone();

    let mut lib = library();
    lib.store_mut().set("picto_chain_bad", "{nope").unwrap();

    assert!(matches!(engine.load(&lib, "bad"), Err(StoreError::Corrupt { .. })));
    assert!(matches!(engine.load(&lib, "missing"), Err(StoreError::Missing(_))));
    assert_eq!(engine.scene(), &before);
}

#[test]
fn empty_save_name_is_rejected() {
    let engine = BoardEngine::default();
    let mut lib = library();
    assert!(matches!(engine.save(&mut lib, "  "), Err(StoreError::EmptyName)));
}

#[test]
fn legacy_save_loads_with_defaults() {
    let mut engine = BoardEngine::default();
    let mut lib = library();
    lib.store_mut()
        .set(
            "picto_chain_old",
            r#"{"nodes":[{"id":"n1","x":0,"y":0,"src":"a.png"},{"id":"n2","x":200,"y":0,"src":"b.png"}],
                "connections":[{"id":"c1","from":"n1","to":"n2"},{"id":"c2","from":"n1","to":"gone"}]}"#,
        )
        .unwrap();
    engine.load(&lib, "old").unwrap();
    assert_eq!(engine.scene().node_count(), 2);
    assert_eq!(engine.scene().connection_count(), 1);
    assert_eq!(engine.view().offset, CanvasOffset::ZERO);
    assert_eq!(engine.tree().connections.len(), 1);
}

// ─── Gestures ────────────────────────────────────────────────────────────

#[test]
fn dragged_positions_stay_on_grid() {
    let mut engine = BoardEngine::default();
    let a = add_image(&mut engine, "sun.png", 0.0, 0.0);
    drag(&mut engine, (30.0, 30.0), (157.0, 243.0));
    let node = engine.scene().node(a).unwrap();
    assert_eq!(node.x % 20.0, 0.0);
    assert_eq!(node.y % 20.0, 0.0);
    assert_eq!((node.x, node.y), (120.0, 220.0));
    // A drag is never a click: the selection from placement is untouched.
    assert_eq!(engine.selected(), Some(a));
    assert_eq!(engine.tree(), &rebuilt(&engine));
}

#[test]
fn resize_never_goes_below_minimum() {
    let mut engine = BoardEngine::default();
    let a = add_image(&mut engine, "sun.png", 0.0, 0.0);
    drag(&mut engine, (95.0, 95.0), (-300.0, -300.0));
    let node = engine.scene().node(a).unwrap();
    assert_eq!((node.width, node.height), (50.0, 50.0));
    assert_eq!(engine.tree(), &rebuilt(&engine));
}

#[test]
fn pan_then_drop_lands_under_pointer() {
    let mut engine = BoardEngine::default();
    drag(&mut engine, (500.0, 500.0), (700.0, 600.0));
    assert_eq!(engine.view().offset, CanvasOffset::new(200.0, 100.0));

    engine.drop_payload("cat.png", 450.0, 350.0);
    let id = engine.selected().unwrap();
    let node = engine.scene().node(id).unwrap();
    assert_eq!((node.x, node.y), (200.0, 200.0));

    // The dropped node is under the pointer on screen.
    click(&mut engine, 450.0, 350.0);
    assert_eq!(engine.selected(), None);
}

#[test]
fn text_node_typing_and_pinning() {
    let mut engine = BoardEngine::default();
    engine.drop_payload(TEXT_PAYLOAD, 100.0, 100.0);
    let t = engine.selected().unwrap();
    assert_eq!(engine.take_focus_request(), Some(t));

    engine.set_text(t, "buy milk");
    assert_eq!(engine.scene().node(t).unwrap().content, "buy milk");

    // Pinned: dragging the body does not move the node.
    drag(&mut engine, (110.0, 110.0), (300.0, 300.0));
    assert_eq!(engine.scene().node(t).unwrap().x, 60.0);

    // Unpin via the glyph at the top-left corner, then drag moves it.
    click(&mut engine, 61.0, 61.0);
    assert!(!engine.scene().node(t).unwrap().pinned);
    drag(&mut engine, (110.0, 110.0), (210.0, 110.0));
    assert_eq!(engine.scene().node(t).unwrap().x, 160.0);
}
