pub mod config;
pub mod geometry;
pub mod id;
pub mod model;
pub mod store;

pub use config::{BoardConfig, PageSpec};
pub use geometry::{ConnectionCurve, LayerTransform, PrintLayout, snap_to_grid};
pub use id::{ConnectionId, NodeId};
pub use model::*;
pub use store::{KeyValueStore, MemoryStore, SceneLibrary, StoreError};

// Re-export kurbo geometry types so downstream crates share one version
pub use kurbo::{Affine, Point, Rect, Vec2};
