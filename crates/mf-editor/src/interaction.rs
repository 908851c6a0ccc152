//! Selection and mutation interaction layer.
//!
//! A small state machine over the canvas overlays:
//!
//! ```text
//! node:  Idle ─context menu─▶ ContextMenu ─"delete"─▶ ConfirmDeleteNode ─confirm/cancel─▶ Idle
//! edge:  Idle ─click─▶ ConfirmDeleteEdge ─confirm/cancel─▶ Idle
//! clear: Idle ─toolbar─▶ ConfirmClearAll ─confirm/cancel─▶ Idle
//! ```
//!
//! Confirmation dialogs are modal: while one is open, only confirm and
//! cancel are honored. Keyboard delete acts on the tracked selection and
//! never opens a dialog. The machine does not touch the canvas itself; it
//! yields [`Command`]s for the session to apply.

use crate::input::ClickTarget;
use crate::popup::DetailPopup;
use mf_core::id::{EdgeId, NodeId};
use mf_core::model::Position;
use mf_core::state::CanvasState;
use serde::Serialize;
use smallvec::SmallVec;

/// The overlay currently shown over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Overlay {
    Idle,
    ContextMenu { node: NodeId, origin: Position },
    ConfirmDeleteNode { node: NodeId },
    ConfirmDeleteEdge { edge: EdgeId },
    ConfirmClearAll,
}

impl Overlay {
    /// Whether a modal confirmation dialog is open.
    pub fn is_dialog(&self) -> bool {
        matches!(
            self,
            Self::ConfirmDeleteNode { .. } | Self::ConfirmDeleteEdge { .. } | Self::ConfirmClearAll
        )
    }
}

/// A canvas mutation requested by the interaction layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    DeleteNode(NodeId),
    DeleteEdge(EdgeId),
    DeleteSelection {
        nodes: Vec<NodeId>,
        edges: Vec<EdgeId>,
    },
    ClearAll,
}

/// Nodes and edges currently selected in the host's graph view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selection {
    pub nodes: SmallVec<[NodeId; 4]>,
    pub edges: SmallVec<[EdgeId; 4]>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Remembers the previous node tap to detect double-taps. Both taps must hit
/// the same node; a tap on another node starts a new sequence.
#[derive(Debug, Clone, Default)]
struct TapTracker {
    last: Option<(NodeId, f64)>,
}

impl TapTracker {
    /// Record a tap; returns `true` when it completes a double-tap.
    fn register(&mut self, node: NodeId, time_ms: f64, window_ms: f64) -> bool {
        let double = match self.last {
            Some((prev, at)) if prev == node => {
                let gap = time_ms - at;
                gap > 0.0 && gap < window_ms
            }
            _ => false,
        };
        // A completed double-tap doesn't seed a third
        self.last = if double { None } else { Some((node, time_ms)) };
        double
    }
}

#[derive(Debug, Clone)]
pub struct Interaction {
    overlay: Overlay,
    popup: Option<DetailPopup>,
    selection: Selection,
    taps: TapTracker,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Interaction {
    pub fn new() -> Self {
        Self {
            overlay: Overlay::Idle,
            popup: None,
            selection: Selection::default(),
            taps: TapTracker::default(),
        }
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn popup(&self) -> Option<&DetailPopup> {
        self.popup.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // ─── Node context menu ───────────────────────────────────────────────

    pub fn open_context_menu(&mut self, node: NodeId, origin: Position) -> bool {
        if self.overlay.is_dialog() {
            return false;
        }
        self.overlay = Overlay::ContextMenu { node, origin };
        true
    }

    /// "Delete machine" in the context menu: hand over to the dialog.
    pub fn choose_delete(&mut self) -> bool {
        match self.overlay {
            Overlay::ContextMenu { node, .. } => {
                self.overlay = Overlay::ConfirmDeleteNode { node };
                true
            }
            _ => false,
        }
    }

    // ─── Edge / clear-all dialogs ────────────────────────────────────────

    pub fn edge_clicked(&mut self, edge: EdgeId) -> bool {
        if self.overlay.is_dialog() {
            return false;
        }
        self.overlay = Overlay::ConfirmDeleteEdge { edge };
        true
    }

    pub fn request_clear_all(&mut self) -> bool {
        if self.overlay.is_dialog() {
            return false;
        }
        self.overlay = Overlay::ConfirmClearAll;
        true
    }

    /// Accept the open dialog. Closes the popup when its node is about to
    /// disappear.
    pub fn confirm(&mut self) -> Option<Command> {
        let command = match self.overlay {
            Overlay::ConfirmDeleteNode { node } => {
                if self.popup.as_ref().is_some_and(|p| p.node == node) {
                    self.popup = None;
                }
                Command::DeleteNode(node)
            }
            Overlay::ConfirmDeleteEdge { edge } => Command::DeleteEdge(edge),
            Overlay::ConfirmClearAll => {
                self.popup = None;
                Command::ClearAll
            }
            Overlay::Idle | Overlay::ContextMenu { .. } => return None,
        };
        self.overlay = Overlay::Idle;
        Some(command)
    }

    /// Dismiss the open dialog without mutating anything.
    pub fn cancel(&mut self) -> bool {
        if self.overlay.is_dialog() {
            self.overlay = Overlay::Idle;
            true
        } else {
            false
        }
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selection_changed(&mut self, nodes: &[NodeId], edges: &[EdgeId]) {
        self.selection.nodes = nodes.iter().copied().collect();
        self.selection.edges = edges.iter().copied().collect();
    }

    /// Keyboard delete: everything selected goes at once, no dialog.
    pub fn keyboard_delete(&mut self) -> Option<Command> {
        if self.overlay.is_dialog() || self.selection.is_empty() {
            return None;
        }
        Some(Command::DeleteSelection {
            nodes: self.selection.nodes.to_vec(),
            edges: self.selection.edges.to_vec(),
        })
    }

    // ─── Popup ───────────────────────────────────────────────────────────

    pub fn show_popup(&mut self, popup: DetailPopup) {
        self.popup = Some(popup);
    }

    pub fn close_popup(&mut self) -> bool {
        self.popup.take().is_some()
    }

    /// Returns `true` when this tap completes a double-tap on `node`.
    pub fn register_tap(&mut self, node: NodeId, time_ms: f64, window_ms: f64) -> bool {
        self.taps.register(node, time_ms, window_ms)
    }

    // ─── Dismissal ───────────────────────────────────────────────────────

    /// Document click. Dialogs always stay open; the popup and context menu
    /// swallow clicks on themselves.
    pub fn document_click(&mut self, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Outside | ClickTarget::Canvas => {
                let menu = self.close_context_menu();
                let popup = self.close_popup();
                menu || popup
            }
            ClickTarget::Popup | ClickTarget::ContextMenu => false,
        }
    }

    /// Escape: cancel a dialog, otherwise close menu and popup.
    pub fn escape(&mut self) -> bool {
        if self.cancel() {
            return true;
        }
        let menu = self.close_context_menu();
        let popup = self.close_popup();
        menu || popup
    }

    fn close_context_menu(&mut self) -> bool {
        if matches!(self.overlay, Overlay::ContextMenu { .. }) {
            self.overlay = Overlay::Idle;
            true
        } else {
            false
        }
    }

    /// Drop references to nodes and edges that no longer exist.
    pub fn retain_existing(&mut self, state: &CanvasState) {
        self.selection.nodes.retain(|id| state.contains_node(*id));
        self.selection.edges.retain(|id| state.edge(*id).is_some());
        if self
            .popup
            .as_ref()
            .is_some_and(|p| !state.contains_node(p.node))
        {
            self.popup = None;
        }
        let stale = match self.overlay {
            Overlay::ContextMenu { node, .. } | Overlay::ConfirmDeleteNode { node } => {
                !state.contains_node(node)
            }
            Overlay::ConfirmDeleteEdge { edge } => state.edge(edge).is_none(),
            Overlay::Idle | Overlay::ConfirmClearAll => false,
        };
        if stale {
            self.overlay = Overlay::Idle;
        }
    }
}
