//! Planar geometry primitives for linear features.
//!
//! Purpose
//! - Provide the few geometric operations placement needs: polyline length and
//!   interpolation, disk buffers around points, erasing a buffer from a line,
//!   splitting the result into single parts, and radius-bounded pair queries.
//! - Hide them behind `GeometryEngine` so the placement loop does not depend on
//!   one particular representation of regions.
//!
//! Representation
//! - Coordinates are `nalgebra::Vector2<f64>` in a projected (planar) CRS.
//! - Buffers of points are unions of exact disks (`DiskUnion`); erasing works
//!   on the chainage axis of the line, so no circle is ever polygonised.
//! - Proximity queries use an R-tree (`rstar`).
//!
//! Code cross-refs: `place::trim`, `place::detect`.

mod cfg;
mod engine;
mod erase;
mod index;
mod types;

pub use cfg::{LEN_EPS, REL_LEN_EPS};
pub use engine::{GeometryEngine, PlanarEngine};
pub use index::PointIndex;
pub use types::{Disk, DiskUnion, MultiPolyline, Polyline, Walker};

#[cfg(test)]
mod tests;
