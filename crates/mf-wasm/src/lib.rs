//! WASM bridge for the machine editor. Exposes the Rust canvas engine to
//! JavaScript.
//!
//! Compiled via `wasm-pack build --target web` and driven by the dashboard's
//! editor page. The page forwards DOM and graph-view events here and renders
//! from the JSON snapshots this module returns.

mod platform;

use kurbo::{Point, Rect};
use mf_core::catalog::mock_machines;
use mf_core::geometry::ViewportTransform;
use mf_core::id::{EdgeId, NodeId};
use mf_core::model::Position;
use mf_editor::intake::DRAG_MIME;
use mf_editor::{ClickTarget, EditorConfig, EditorSession, InputEvent, Modifiers, Outcome};
use platform::{JsClock, LocalStorage};
use wasm_bindgen::prelude::*;

/// The main WASM-facing canvas controller.
///
/// Holds the editor session over `window.localStorage`. All interaction
/// from the page goes through this struct.
#[wasm_bindgen]
pub struct FlowCanvas {
    session: EditorSession<LocalStorage, JsClock>,
}

#[wasm_bindgen]
impl FlowCanvas {
    /// Create a controller with default settings, rehydrating the canvas
    /// from local storage.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_editor_config(EditorConfig::default())
    }

    /// Create a controller from a (partial) JSON config. Invalid JSON falls
    /// back to the defaults.
    pub fn with_config(json: &str) -> Self {
        let config = EditorConfig::from_json(json).unwrap_or_else(|e| {
            log::warn!("{e}; using defaults");
            EditorConfig::default()
        });
        Self::with_editor_config(config)
    }

    /// Transfer type to use with `DataTransfer.setData`/`getData`.
    pub fn drag_mime() -> String {
        DRAG_MIME.to_string()
    }

    /// The machine catalog as a JSON array.
    pub fn catalog_json() -> String {
        serde_json::to_string(&mock_machines()).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Host geometry ───────────────────────────────────────────────────

    /// Canvas container bounds in client coordinates
    /// (`getBoundingClientRect()`).
    pub fn set_container(&mut self, left: f64, top: f64, width: f64, height: f64) {
        self.session
            .set_container(Rect::new(left, top, left + width, top + height));
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.session.set_viewport_width(width);
    }

    /// Current pan/zoom of the graph view.
    pub fn set_viewport_transform(&mut self, x: f64, y: f64, zoom: f64) {
        self.session.set_transform(ViewportTransform::new(x, y, zoom));
    }

    // ─── Intake ──────────────────────────────────────────────────────────

    /// Handle a drop on the canvas. Returns true if a node was placed.
    pub fn handle_drop(&mut self, data: &str, client_x: f64, client_y: f64) -> bool {
        self.dispatch(InputEvent::Drop {
            data: data.to_string(),
            client: Point::new(client_x, client_y),
        })
        .canvas
    }

    /// Handle a tap on a catalog entry (touch devices).
    pub fn handle_catalog_tap(&mut self, data: &str) -> bool {
        self.dispatch(InputEvent::CatalogTap {
            data: data.to_string(),
        })
        .canvas
    }

    // ─── Graph view events ───────────────────────────────────────────────
    //
    // Ids from the page are looked up, not interned: an id nothing ever
    // created cannot name a node or edge.

    pub fn handle_node_moved(&mut self, node_id: &str, x: f64, y: f64) -> bool {
        let Some(node) = NodeId::lookup(node_id) else {
            return false;
        };
        self.dispatch(InputEvent::NodeMoved {
            node,
            position: Position::new(x, y),
        })
        .canvas
    }

    pub fn handle_connect(&mut self, source_id: &str, target_id: &str) -> bool {
        let (Some(source), Some(target)) = (NodeId::lookup(source_id), NodeId::lookup(target_id))
        else {
            return false;
        };
        self.dispatch(InputEvent::Connect { source, target })
        .canvas
    }

    pub fn handle_node_context_menu(&mut self, node_id: &str, client_x: f64, client_y: f64) -> bool {
        let Some(node) = NodeId::lookup(node_id) else {
            return false;
        };
        self.dispatch(InputEvent::NodeContextMenu {
            node,
            client: Point::new(client_x, client_y),
        })
        .any()
    }

    pub fn handle_node_double_click(&mut self, node_id: &str, client_x: f64, client_y: f64) -> bool {
        let Some(node) = NodeId::lookup(node_id) else {
            return false;
        };
        self.dispatch(InputEvent::NodeDoubleClick {
            node,
            client: Point::new(client_x, client_y),
        })
        .any()
    }

    pub fn handle_node_tap(
        &mut self,
        node_id: &str,
        client_x: f64,
        client_y: f64,
        time_ms: f64,
    ) -> bool {
        let Some(node) = NodeId::lookup(node_id) else {
            return false;
        };
        self.dispatch(InputEvent::NodeTap {
            node,
            client: Point::new(client_x, client_y),
            time_ms,
        })
        .any()
    }

    pub fn handle_pane_double_click(&mut self) -> bool {
        self.dispatch(InputEvent::PaneDoubleClick).any()
    }

    pub fn handle_edge_click(&mut self, edge_id: &str) -> bool {
        let Some(edge) = EdgeId::lookup(edge_id) else {
            return false;
        };
        self.dispatch(InputEvent::EdgeClick { edge }).any()
    }

    /// Selection from the graph view, as two JSON arrays of ids.
    /// Malformed input is treated as an empty list.
    pub fn handle_selection_change(&mut self, nodes_json: &str, edges_json: &str) -> bool {
        let nodes: Vec<NodeId> = parse_id_list(nodes_json);
        let edges: Vec<EdgeId> = parse_id_list(edges_json);
        self.dispatch(InputEvent::SelectionChange { nodes, edges })
            .any()
    }

    // ─── Menus, dialogs, popup ───────────────────────────────────────────

    pub fn choose_delete(&mut self) -> bool {
        self.dispatch(InputEvent::MenuDelete).any()
    }

    pub fn request_clear_all(&mut self) -> bool {
        self.dispatch(InputEvent::ClearAllRequested).any()
    }

    pub fn confirm(&mut self) -> bool {
        self.dispatch(InputEvent::Confirm).any()
    }

    pub fn cancel(&mut self) -> bool {
        self.dispatch(InputEvent::Cancel).any()
    }

    pub fn close_popup(&mut self) -> bool {
        self.dispatch(InputEvent::ClosePopup).any()
    }

    /// Document click; `inside_canvas` is whether the target lies in the
    /// canvas container, `on_popup`/`on_menu` whether it lies in either
    /// overlay.
    pub fn handle_document_click(&mut self, inside_canvas: bool, on_popup: bool, on_menu: bool) -> bool {
        let target = match (inside_canvas, on_popup, on_menu) {
            (_, true, _) => ClickTarget::Popup,
            (_, _, true) => ClickTarget::ContextMenu,
            (true, false, false) => ClickTarget::Canvas,
            (false, false, false) => ClickTarget::Outside,
        };
        self.dispatch(InputEvent::DocumentClick { target }).any()
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"canvas":bool,"ui":bool}`
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        let outcome = self.dispatch(InputEvent::key(key, modifiers));
        outcome_json(outcome)
    }

    // ─── Snapshots ───────────────────────────────────────────────────────

    /// `{"nodes":[..],"edges":[..]}` in render order.
    pub fn state_json(&self) -> String {
        serde_json::to_string(self.session.state())
            .unwrap_or_else(|_| r#"{"nodes":[],"edges":[]}"#.to_string())
    }

    /// The open overlay, e.g. `{"kind":"confirmDeleteEdge","edge":"…"}`.
    pub fn overlay_json(&self) -> String {
        serde_json::to_string(&self.session.overlay())
            .unwrap_or_else(|_| r#"{"kind":"idle"}"#.to_string())
    }

    /// The detail popup, or `null`.
    pub fn popup_json(&self) -> String {
        serde_json::to_string(&self.session.popup()).unwrap_or_else(|_| "null".to_string())
    }

    pub fn selection_json(&self) -> String {
        serde_json::to_string(self.session.selection())
            .unwrap_or_else(|_| r#"{"nodes":[],"edges":[]}"#.to_string())
    }
}

impl Default for FlowCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowCanvas {
    fn with_editor_config(config: EditorConfig) -> Self {
        platform::install_hooks();
        Self {
            session: EditorSession::new(LocalStorage, JsClock, config),
        }
    }

    fn dispatch(&mut self, event: InputEvent) -> Outcome {
        self.session.handle(event)
    }
}

fn parse_id_list<T: serde::de::DeserializeOwned>(json: &str) -> Vec<T> {
    serde_json::from_str(json).unwrap_or_else(|e| {
        log::debug!("ignoring malformed id list: {e}");
        Vec::new()
    })
}

fn outcome_json(outcome: Outcome) -> String {
    format!(
        r#"{{"canvas":{},"ui":{}}}"#,
        outcome.canvas, outcome.ui
    )
}
