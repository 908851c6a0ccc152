//! In-memory canvas state and its pure mutation rules.
//!
//! Every mutation returns whether anything changed so the caller can decide
//! whether a persistence write is needed. Nothing here touches storage.

use crate::id::{EdgeId, NodeId};
use crate::model::{CanvasEdge, CanvasNode, Machine, Position};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Edges pruned as a side effect of removing a node.
pub type PrunedEdges = SmallVec<[EdgeId; 4]>;

/// The node set (z-ordered) and the connections between nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasState {
    #[serde(default)]
    pub nodes: Vec<CanvasNode>,
    #[serde(default)]
    pub edges: Vec<CanvasEdge>,
}

impl CanvasState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&CanvasNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&CanvasEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn has_connection(&self, source: NodeId, target: NodeId) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }

    /// Append a node for `machine`, deriving its id from the machine id and
    /// `timestamp_ms`. A colliding id advances the timestamp until unique.
    /// A non-finite position is replaced by the origin.
    pub fn add_node(&mut self, machine: Machine, position: Position, timestamp_ms: u64) -> NodeId {
        let position = if position.is_finite() {
            position
        } else {
            log::warn!(
                "placing {} at origin instead of ({}, {})",
                machine.id,
                position.x,
                position.y
            );
            Position::default()
        };
        let mut ts = timestamp_ms;
        let mut id = NodeId::for_placement(&machine.id, ts);
        while self.contains_node(id) {
            ts += 1;
            id = NodeId::for_placement(&machine.id, ts);
        }
        self.nodes.push(CanvasNode {
            id,
            position,
            payload: machine,
        });
        id
    }

    /// Returns `false` when no node has `id` or `position` is not finite.
    pub fn move_node(&mut self, id: NodeId, position: Position) -> bool {
        if !position.is_finite() {
            return false;
        }
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Connect `source → target` if both nodes exist and that exact
    /// connection is not already present.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        if !self.contains_node(source) || !self.contains_node(target) {
            return None;
        }
        if self.has_connection(source, target) {
            return None;
        }
        let base = EdgeId::for_connection(source, target);
        let mut id = base;
        let mut n = 1;
        while self.edge(id).is_some() {
            id = EdgeId::intern(&format!("{base}-{n}"));
            n += 1;
        }
        self.edges.push(CanvasEdge { id, source, target });
        Some(id)
    }

    /// Remove a node together with every edge touching it. Returns the
    /// pruned edges, or `None` if the node did not exist.
    pub fn delete_node(&mut self, id: NodeId) -> Option<PrunedEdges> {
        let idx = self.nodes.iter().position(|n| n.id == id)?;
        self.nodes.remove(idx);
        let mut pruned = PrunedEdges::new();
        self.edges.retain(|e| {
            if e.touches(id) {
                pruned.push(e.id);
                false
            } else {
                true
            }
        });
        Some(pruned)
    }

    pub fn delete_edge(&mut self, id: EdgeId) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != id);
        self.edges.len() != before
    }

    /// Remove several nodes and edges in one step. Edges touching a removed
    /// node are pruned as well. Unknown ids are skipped.
    pub fn delete_many(&mut self, nodes: &[NodeId], edges: &[EdgeId]) -> bool {
        let before = (self.nodes.len(), self.edges.len());
        self.nodes.retain(|n| !nodes.contains(&n.id));
        self.edges.retain(|e| {
            !edges.contains(&e.id) && !nodes.iter().any(|&removed| e.touches(removed))
        });
        before != (self.nodes.len(), self.edges.len())
    }

    /// Returns `false` if the canvas was already empty.
    pub fn clear(&mut self) -> bool {
        let changed = !self.is_empty();
        self.nodes.clear();
        self.edges.clear();
        changed
    }
}
