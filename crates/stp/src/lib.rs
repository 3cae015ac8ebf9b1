//! Street-tree site placement along sidewalks.
//!
//! Places candidate points at fixed spacing along a set of lines and removes
//! conflicts between points of different lines by trimming the shorter line
//! around the longer line's points, round after round, until no two points
//! from different lines lie within the separation radius.
//!
//! Layout
//! - `geom`: planar polylines, disk buffers, erase, R-tree proximity.
//! - `place`: generation, detection, resolution, trimming, and the round loop.
//! - `network`: reproducible synthetic block grids.
//! - `error`: fatal errors and per-line warnings.

pub mod api;
pub mod error;
pub mod geom;
pub mod network;
pub mod place;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::{ConfigurationError, PlacementError, Warning};
    pub use crate::geom::{GeometryEngine, PlanarEngine, Polyline};
    pub use crate::place::{
        CancelToken, CandidatePoint, Line, LineId, Outcome, PlacementParams, PointId, PointSet,
        Resolver, Termination,
    };
    pub use nalgebra::Vector2 as Vec2;
}
