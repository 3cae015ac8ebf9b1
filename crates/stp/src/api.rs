//! Curated surface for the CLI and benches.
//!
//! Flat re-exports so callers do not need to know which submodule owns what.

// Geometry
pub use crate::geom::{
    Disk, DiskUnion, GeometryEngine, MultiPolyline, PlanarEngine, PointIndex, Polyline,
    LEN_EPS,
};
// Placement loop
pub use crate::place::{
    drop_conflicting, find_conflicts, generate, generate_all, resolve, suppressions, trim,
    CancelToken, CandidatePoint, ConflictPair, Line, LineId, Outcome, PlacementParams, PointId,
    PointSet, Resolution, Resolver, RoundReport, SuppressionMap, Termination, TrimOutput,
};
// Synthetic networks
pub use crate::network::{draw_grid_network, GridCfg as GridNetworkCfg, ReplayToken};
// Errors
pub use crate::error::{
    ConfigurationError, ConvergenceWarning, GeometryFault, InvalidGeometryError, PlacementError,
    Stage, Warning,
};
