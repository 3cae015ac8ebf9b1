//! Candidate placement along lines under a minimum-separation constraint.
//!
//! Purpose
//! - Place points at fixed spacing along every line, then repeatedly find
//!   close pairs from different lines, let the longer line win, erase a disk
//!   around each winner from the losing line, and place again.
//! - Greedy and deterministic: the same input always yields the same points,
//!   ids, and line fragments.
//!
//! Pieces (leaves first)
//! - `generate`: fixed-interval points (`Stations`), `generate_all`.
//! - `detect`: `find_conflicts`, plus the one-shot `drop_conflicting` filter.
//! - `resolve`: winner/loser ranking and the `SuppressionMap`.
//! - `trim`: buffer, erase, explode, sliver filter.
//! - `controller`: the round state machine (`Resolver`).
//!
//! Code cross-refs: `geom::{GeometryEngine, PlanarEngine}`, `error`.

mod cancel;
mod controller;
mod detect;
mod generate;
mod params;
mod resolve;
mod trim;
mod types;

pub use cancel::CancelToken;
pub use controller::{Outcome, Resolver, RoundReport, Termination};
pub use detect::{drop_conflicting, find_conflicts};
pub use generate::{generate, generate_all, stations, Stations};
pub use params::PlacementParams;
pub use resolve::{resolve, suppressions, Resolution};
pub use trim::{trim, TrimOutput};
pub use types::{
    CandidatePoint, ConflictPair, Line, LineId, PointId, PointSet, SuppressionMap,
};
