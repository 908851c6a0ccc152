//! Canvas state store: the single owner of the canvas.
//!
//! Wraps [`CanvasState`] with an injected [`Storage`] and [`Clock`]. Every
//! mutation that changes the canvas is followed by exactly one full write of
//! the canvas document; no-op calls (unknown ids, rejected connections)
//! write nothing. A failed write is logged and the in-memory state is kept.

use crate::clock::Clock;
use crate::id::{EdgeId, NodeId};
use crate::model::{Machine, Position};
use crate::persist::{self, LoadSource, Storage, StorageError};
use crate::state::{CanvasState, PrunedEdges};

/// A request to place a catalog machine at a resolved canvas position,
/// independent of whether it came from a pointer drop or a touch tap.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRequest {
    pub machine: Machine,
    pub position: Position,
}

pub struct CanvasStore<S: Storage, C: Clock> {
    state: CanvasState,
    storage: S,
    clock: C,
    source: LoadSource,
}

impl<S: Storage, C: Clock> CanvasStore<S, C> {
    /// Rehydrate from `storage`. A canvas migrated from the legacy split
    /// keys is immediately rewritten as one document; the legacy keys are
    /// removed only once that write succeeded.
    pub fn open(storage: S, clock: C) -> Self {
        let (state, source) = persist::load_state(&storage);
        let mut store = Self {
            state,
            storage,
            clock,
            source,
        };
        log::info!(
            "canvas opened from {:?}: {} nodes, {} edges",
            source,
            store.state.nodes.len(),
            store.state.edges.len()
        );
        if source == LoadSource::Legacy {
            match store.persist() {
                Ok(()) => {
                    if let Err(e) = persist::remove_legacy(&mut store.storage) {
                        log::warn!("cannot remove legacy canvas keys: {e}");
                    }
                }
                Err(e) => log::warn!("legacy canvas not migrated, keeping old keys: {e}"),
            }
        }
        store
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn load_source(&self) -> LoadSource {
        self.source
    }

    pub fn add_node(&mut self, request: PlacementRequest) -> NodeId {
        let now = self.clock.now_millis();
        let PlacementRequest { machine, position } = request;
        let id = self.state.add_node(machine, position, now);
        log::debug!("placed {id} at ({}, {})", position.x, position.y);
        self.flush();
        id
    }

    pub fn move_node(&mut self, id: NodeId, position: Position) -> bool {
        let changed = self.state.move_node(id, position);
        if changed {
            log::trace!("moved {id} to ({}, {})", position.x, position.y);
            self.flush();
        }
        changed
    }

    pub fn connect(&mut self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        let id = self.state.connect(source, target);
        match id {
            Some(id) => {
                log::debug!("connected {source} -> {target} as {id}");
                self.flush();
            }
            None => log::debug!("connection {source} -> {target} rejected"),
        }
        id
    }

    pub fn delete_node(&mut self, id: NodeId) -> Option<PrunedEdges> {
        let pruned = self.state.delete_node(id)?;
        log::debug!("deleted {id} and {} edges", pruned.len());
        self.flush();
        Some(pruned)
    }

    pub fn delete_edge(&mut self, id: EdgeId) -> bool {
        let changed = self.state.delete_edge(id);
        if changed {
            log::debug!("deleted edge {id}");
            self.flush();
        }
        changed
    }

    /// Remove several nodes and edges with a single write.
    pub fn delete_selection(&mut self, nodes: &[NodeId], edges: &[EdgeId]) -> bool {
        let changed = self.state.delete_many(nodes, edges);
        if changed {
            log::debug!(
                "deleted selection of {} nodes, {} edges",
                nodes.len(),
                edges.len()
            );
            self.flush();
        }
        changed
    }

    pub fn clear_all(&mut self) -> bool {
        let changed = self.state.clear();
        if changed {
            log::info!("canvas cleared");
            self.flush();
        }
        changed
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        persist::save_state(&mut self.storage, &self.state)
    }

    /// Persist after a mutation. Failures leave the in-memory state as is.
    fn flush(&mut self) {
        if let Err(e) = self.persist() {
            log::warn!("canvas not saved: {e}");
        }
    }
}
