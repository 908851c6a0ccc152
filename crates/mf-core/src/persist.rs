//! Persistence port and canvas document format.
//!
//! The canvas is stored as one JSON document `{"nodes":[..],"edges":[..]}`
//! under [`CANVAS_KEY`], so nodes and edges are always written together.
//!
//! Older dashboards stored the two halves under separate keys
//! ([`LEGACY_NODES_KEY`], [`LEGACY_EDGES_KEY`]) in the graph library's own
//! node shape (`data.machineData` instead of `payload`). Those keys are read
//! only when no document exists; each half that is missing or unreadable
//! starts empty. Rehydrated edges are not pruned against rehydrated nodes.

use crate::id::NodeId;
use crate::model::{CanvasEdge, CanvasNode, Machine, Position};
use crate::state::CanvasState;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

pub const CANVAS_KEY: &str = "flow-canvas";
pub const LEGACY_NODES_KEY: &str = "flow-nodes";
pub const LEGACY_EDGES_KEY: &str = "flow-edges";

// ─── Storage port ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The medium cannot be reached at all (e.g. storage disabled).
    Unavailable(String),
    /// The medium rejected a read or write.
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
            Self::Backend(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// A string key/value medium the canvas is saved to.
pub trait Storage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, used natively and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry without counting it as a write.
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of `save` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes += 1;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ─── Document codec ──────────────────────────────────────────────────────

pub fn encode_state(state: &CanvasState) -> Result<String, String> {
    serde_json::to_string(state).map_err(|e| format!("cannot encode canvas: {e}"))
}

pub fn decode_state(json: &str) -> Result<CanvasState, String> {
    serde_json::from_str(json).map_err(|e| format!("invalid canvas document: {e}"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowNodeData {
    machine_data: Machine,
}

/// A node as the graph library serialized it.
#[derive(Deserialize)]
struct FlowNode {
    id: NodeId,
    #[serde(default)]
    position: Position,
    data: FlowNodeData,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredNode {
    Canvas(CanvasNode),
    Flow(FlowNode),
}

impl From<StoredNode> for CanvasNode {
    fn from(stored: StoredNode) -> Self {
        match stored {
            StoredNode::Canvas(node) => node,
            StoredNode::Flow(node) => CanvasNode {
                id: node.id,
                position: node.position,
                payload: node.data.machine_data,
            },
        }
    }
}

/// Decode a legacy node array in either the canvas or the graph-library shape.
pub fn decode_legacy_nodes(json: &str) -> Result<Vec<CanvasNode>, String> {
    let stored: Vec<StoredNode> =
        serde_json::from_str(json).map_err(|e| format!("invalid legacy node list: {e}"))?;
    Ok(stored.into_iter().map(CanvasNode::from).collect())
}

pub fn decode_legacy_edges(json: &str) -> Result<Vec<CanvasEdge>, String> {
    serde_json::from_str(json).map_err(|e| format!("invalid legacy edge list: {e}"))
}

// ─── Load / save ─────────────────────────────────────────────────────────

/// Where a rehydrated canvas came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Document,
    Legacy,
    Empty,
}

/// Rehydrate the canvas. Never fails: unreadable data degrades to empty.
pub fn load_state<S: Storage>(storage: &S) -> (CanvasState, LoadSource) {
    match storage.load(CANVAS_KEY) {
        Ok(Some(json)) => match decode_state(&json) {
            Ok(state) => return (state, LoadSource::Document),
            Err(e) => log::warn!("discarding stored canvas: {e}"),
        },
        Ok(None) => {}
        Err(e) => log::warn!("cannot read {CANVAS_KEY}: {e}"),
    }

    let nodes = read_half(storage, LEGACY_NODES_KEY, decode_legacy_nodes);
    let edges = read_half(storage, LEGACY_EDGES_KEY, decode_legacy_edges);
    if nodes.is_none() && edges.is_none() {
        return (CanvasState::new(), LoadSource::Empty);
    }
    let state = CanvasState {
        nodes: nodes.unwrap_or_default(),
        edges: edges.unwrap_or_default(),
    };
    log::info!(
        "migrated legacy canvas: {} nodes, {} edges",
        state.nodes.len(),
        state.edges.len()
    );
    (state, LoadSource::Legacy)
}

/// Read one legacy half. `None` means the key was absent; a present but
/// unreadable value yields an empty list.
fn read_half<S, T>(
    storage: &S,
    key: &str,
    decode: fn(&str) -> Result<Vec<T>, String>,
) -> Option<Vec<T>>
where
    S: Storage,
{
    let json = match storage.load(key) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("cannot read {key}: {e}");
            return None;
        }
    };
    match decode(&json) {
        Ok(items) => Some(items),
        Err(e) => {
            log::warn!("{key}: {e}; starting empty");
            Some(Vec::new())
        }
    }
}

pub fn save_state<S: Storage>(storage: &mut S, state: &CanvasState) -> Result<(), StorageError> {
    let json = encode_state(state).map_err(StorageError::Backend)?;
    storage.save(CANVAS_KEY, &json)
}

/// Drop the split keys once their content lives in the document.
pub fn remove_legacy<S: Storage>(storage: &mut S) -> Result<(), StorageError> {
    storage.remove(LEGACY_NODES_KEY)?;
    storage.remove(LEGACY_EDGES_KEY)
}
