pub mod catalog;
pub mod clock;
pub mod geometry;
pub mod id;
pub mod model;
pub mod persist;
pub mod state;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use geometry::ViewportTransform;
pub use id::{EdgeId, NodeId};
pub use model::*;
pub use persist::{LoadSource, MemoryStorage, Storage, StorageError};
pub use state::CanvasState;
pub use store::{CanvasStore, PlacementRequest};

// Re-export kurbo geometry types so downstream crates share one version
pub use kurbo::{Point, Rect, Size};
