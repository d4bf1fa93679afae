pub mod camera;
pub mod collision;
pub mod color;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod lantern;
pub mod params;
pub mod pattern;
pub mod physics;
pub mod pool;
pub mod registry;
pub mod sim;

pub use camera::{Camera, VisibleVolume};
pub use error::{SimError, SimResult};
pub use geometry::{LanternGeometry, MeshVertex, ShapeSpec};
pub use lantern::{LanternInstance, Wobble};
pub use params::{CollisionCadence, SimParams};
pub use pattern::{Pattern, PatternKind};
pub use registry::{SimRegistry, DEFAULT_SIMULATION};
pub use sim::{FrameStats, Simulation};
