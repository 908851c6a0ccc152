//! Input abstraction layer.
//!
//! Normalizes the events the host's graph view and document deliver into a
//! single `InputEvent` enum consumed by the editor session. Client
//! coordinates are browser-viewport pixels; the session converts them.

use kurbo::Point;
use mf_core::id::{EdgeId, NodeId};
use mf_core::model::Position;

/// Keyboard modifier state at the time of the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Where a document-level click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Anywhere outside the canvas container.
    Outside,
    /// Inside the container, but not on the popup or the context menu.
    Canvas,
    Popup,
    ContextMenu,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A catalog entry dropped on the canvas; `data` is the transferred text.
    Drop { data: String, client: Point },
    /// A catalog entry tapped on a touch device.
    CatalogTap { data: String },
    /// A node drag finished at a canvas-space position.
    NodeMoved { node: NodeId, position: Position },
    /// The user drew a connection between two node handles.
    Connect { source: NodeId, target: NodeId },
    /// Right-click or long-press on a node.
    NodeContextMenu { node: NodeId, client: Point },
    NodeDoubleClick { node: NodeId, client: Point },
    /// Single tap on a node (touch devices); two quick taps open details.
    NodeTap {
        node: NodeId,
        client: Point,
        time_ms: f64,
    },
    PaneDoubleClick,
    EdgeClick { edge: EdgeId },
    SelectionChange {
        nodes: Vec<NodeId>,
        edges: Vec<EdgeId>,
    },
    /// "Delete machine" chosen in the node context menu.
    MenuDelete,
    /// Toolbar "clear all" button.
    ClearAllRequested,
    Confirm,
    Cancel,
    /// The popup's close button.
    ClosePopup,
    DocumentClick { target: ClickTarget },
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Client position, if this is a pointer event.
    pub fn client_position(&self) -> Option<Point> {
        match self {
            Self::Drop { client, .. }
            | Self::NodeContextMenu { client, .. }
            | Self::NodeDoubleClick { client, .. }
            | Self::NodeTap { client, .. } => Some(*client),
            _ => None,
        }
    }
}
