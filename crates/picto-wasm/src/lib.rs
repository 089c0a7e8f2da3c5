//! WASM bridge for Picto Board: exposes the board engine to the web page.
//!
//! Compiled via `wasm-pack build --target web`. The page forwards pointer,
//! keyboard, drop, and text events; every call returns the resulting
//! `Damage` as JSON (`null` when nothing changed) and the page re-reads
//! the visual tree for what it needs to repaint.

mod storage;

use gloo_timers::callback::Timeout;
use picto_core::{BoardConfig, NodeId, NodeKind, SceneLibrary};
use picto_editor::{BoardEngine, Button, InputEvent, PrintJob};
use picto_render::Damage;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

pub use storage::LocalStorage;

/// The main WASM-facing board controller.
#[wasm_bindgen]
pub struct BoardCanvas {
    /// Shared with the print timer.
    engine: Rc<RefCell<BoardEngine>>,
    library: SceneLibrary<LocalStorage>,
    width: f64,
    height: f64,
}

#[wasm_bindgen]
impl BoardCanvas {
    /// Create a board for a workspace of the given size. `config_json` may
    /// override any `BoardConfig` field; an invalid config falls back to
    /// the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, config_json: Option<String>) -> Self {
        console_setup();

        let config = match config_json.as_deref().map(BoardConfig::from_json) {
            Some(Ok(config)) => config,
            Some(Err(err)) => {
                log::warn!("invalid board config, using defaults: {err}");
                BoardConfig::default()
            }
            None => BoardConfig::default(),
        };
        let library = SceneLibrary::new(LocalStorage::open(), config.storage_namespace.clone());
        Self {
            engine: Rc::new(RefCell::new(BoardEngine::new(config))),
            library,
            width,
            height,
        }
    }

    /// Workspace element resized.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    // ─── Pointer & keyboard ──────────────────────────────────────────────

    /// Coordinates are relative to the workspace element.
    pub fn pointer_down(
        &mut self,
        x: f64,
        y: f64,
        pointer_id: i32,
        button: i16,
        is_primary: bool,
    ) -> String {
        self.input(InputEvent::PointerDown {
            x,
            y,
            pointer_id,
            button: Button::from_dom(button),
            is_primary,
        })
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, pointer_id: i32) -> String {
        self.input(InputEvent::PointerMove { x, y, pointer_id })
    }

    /// Also used for `pointercancel`.
    pub fn pointer_up(&mut self, x: f64, y: f64, pointer_id: i32) -> String {
        self.input(InputEvent::PointerUp { x, y, pointer_id })
    }

    /// `focus_in_text` is true when `document.activeElement` is an input
    /// or textarea.
    pub fn key_down(&mut self, key: &str, focus_in_text: bool) -> String {
        self.input(InputEvent::key(key, focus_in_text))
    }

    /// True while a drag, resize, or pan is in progress.
    pub fn is_gesture_active(&self) -> bool {
        self.engine.borrow().is_gesture_active()
    }

    // ─── Placement & editing ─────────────────────────────────────────────

    /// Payload from `dataTransfer.getData("text/plain")`.
    pub fn drop_payload(&mut self, payload: &str, x: f64, y: f64) -> String {
        let damage = self.engine.borrow_mut().drop_payload(payload, x, y);
        to_json(&damage)
    }

    /// Place a node in the middle of the workspace. `kind` is `"image"` or
    /// `"text"`; `content` is a catalog filename or a `data:` URI.
    pub fn place_at_center(&mut self, kind: &str, content: &str) -> String {
        let damage =
            self.engine
                .borrow_mut()
                .place_at_center(node_kind(kind), content, self.width, self.height);
        to_json(&damage)
    }

    /// Text typed into a text node.
    pub fn set_text(&mut self, id: &str, text: &str) -> String {
        let damage = self.engine.borrow_mut().set_text(NodeId::intern(id), text);
        to_json(&damage)
    }

    pub fn clear_all(&mut self) -> String {
        let damage = self.engine.borrow_mut().clear_all();
        to_json(&damage)
    }

    /// Text node the page should focus, if one was just placed.
    pub fn take_focus_request(&mut self) -> Option<String> {
        self.engine
            .borrow_mut()
            .take_focus_request()
            .map(|id| id.as_str().to_string())
    }

    pub fn selected_id(&self) -> Option<String> {
        self.engine
            .borrow()
            .selected()
            .map(|id| id.as_str().to_string())
    }

    // ─── Output ──────────────────────────────────────────────────────────

    /// The whole visual tree as JSON.
    pub fn tree_json(&self) -> String {
        to_json(self.engine.borrow().tree())
    }

    /// One node's visual as JSON (`null` if absent).
    pub fn node_json(&self, id: &str) -> String {
        to_json(&self.engine.borrow().tree().node(NodeId::intern(id)))
    }

    pub fn export_svg(&self) -> String {
        picto_render::render_svg(self.engine.borrow().tree(), self.width, self.height)
    }

    // ─── Saved scenes ────────────────────────────────────────────────────

    pub fn save(&mut self, name: &str) -> Result<(), JsValue> {
        self.engine
            .borrow()
            .save(&mut self.library, name)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Load a saved scene. On error the current board is kept.
    pub fn load(&mut self, name: &str) -> Result<String, JsValue> {
        let damage = self
            .engine
            .borrow_mut()
            .load(&self.library, name)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(to_json(&damage))
    }

    /// Names of saved scenes, sorted, as a JSON array.
    pub fn saved_names(&self) -> String {
        to_json(&self.library.list())
    }

    pub fn delete_saved(&mut self, name: &str) -> Result<(), JsValue> {
        self.library
            .delete(name)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    // ─── Print ───────────────────────────────────────────────────────────

    /// Fit the board to the page and open the browser print dialog.
    ///
    /// `set_preview(true)` is called before the print delay and
    /// `set_preview(false)` after printing; the page toggles its print
    /// styles there and re-reads the tree once preview ends. Printing runs
    /// from a timer (zero delay for an immediate print), so the callbacks
    /// never run while the engine is borrowed and may call back into the
    /// board.
    pub fn print(&self, set_preview: js_sys::Function) {
        let job = self.engine.borrow_mut().begin_print();
        if let PrintJob::Composed { .. } = job {
            call_preview(&set_preview, true);
        }
        let engine = Rc::clone(&self.engine);
        Timeout::new(job.delay_ms(), move || {
            window_print();
            engine.borrow_mut().finish_print(job);
            call_preview(&set_preview, false);
        })
        .forget();
    }
}

impl BoardCanvas {
    fn input(&mut self, event: InputEvent) -> String {
        let damage: Option<Damage> = self.engine.borrow_mut().handle(&event);
        to_json(&damage)
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn node_kind(name: &str) -> NodeKind {
    match name {
        "text" => NodeKind::Text,
        _ => NodeKind::Image,
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        log::error!("failed to serialize bridge output: {err}");
        "null".to_string()
    })
}

fn window_print() {
    match web_sys::window() {
        Some(window) => {
            if let Err(err) = window.print() {
                log::error!("window.print failed: {err:?}");
            }
        }
        None => log::error!("no window to print"),
    }
}

fn call_preview(set_preview: &js_sys::Function, on: bool) {
    if let Err(err) = set_preview.call1(&JsValue::NULL, &JsValue::from_bool(on)) {
        log::error!("print preview callback failed: {err:?}");
    }
}

/// Route `log` to the browser console and panics to `console.error`, once.
fn console_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SETUP: Once = Once::new();
        SETUP.call_once(|| {
            console_error_panic_hook::set_once();
            if console_log::init_with_level(log::Level::Debug).is_err() {
                web_sys::console::warn_1(&"picto: logger already installed".into());
            }
        });
    }
}
