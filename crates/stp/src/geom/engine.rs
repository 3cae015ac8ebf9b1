//! Geometry capability set consumed by the placement loop.

use nalgebra::Vector2;

use super::cfg::LEN_EPS;
use super::erase::erase;
use super::index::PointIndex;
use super::types::{DiskUnion, MultiPolyline, Polyline};
use crate::error::GeometryFault;

/// Operations the placement loop needs from a 2D geometry backend.
///
/// Measurement and splitting have default implementations on `Polyline`;
/// a backend supplies the region type plus buffer, erase, and pair queries.
pub trait GeometryEngine {
    type Region;

    /// Union of disks of `radius` around `centers`.
    fn buffer(&self, centers: &[Vector2<f64>], radius: f64) -> Result<Self::Region, GeometryFault>;

    /// Parts of `line` outside `region`.
    fn difference(
        &self,
        line: &Polyline,
        region: &Self::Region,
    ) -> Result<MultiPolyline, GeometryFault>;

    /// Single-part lines of `multi`, dropping empty parts.
    fn explode(&self, multi: MultiPolyline) -> Vec<Polyline> {
        multi
            .parts
            .into_iter()
            .filter(|p| p.vertex_count() >= 2 && p.length() > LEN_EPS)
            .collect()
    }

    fn length(&self, line: &Polyline) -> f64 {
        line.length()
    }

    fn interpolate(&self, line: &Polyline, chainage: f64) -> Option<Vector2<f64>> {
        line.point_at(chainage)
    }

    fn distance(&self, a: Vector2<f64>, b: Vector2<f64>) -> f64 {
        (b - a).norm()
    }

    /// Index pairs `(i, j)`, `i < j`, at distance `<= radius`, sorted.
    fn proximity_query(&self, points: &[Vector2<f64>], radius: f64) -> Vec<(usize, usize)>;
}

/// Exact planar backend: disk unions, chainage-interval erase, R-tree queries.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanarEngine;

impl GeometryEngine for PlanarEngine {
    type Region = DiskUnion;

    fn buffer(&self, centers: &[Vector2<f64>], radius: f64) -> Result<DiskUnion, GeometryFault> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeometryFault::BadRadius { radius });
        }
        if let Some(index) = centers
            .iter()
            .position(|c| !(c.x.is_finite() && c.y.is_finite()))
        {
            return Err(GeometryFault::NonFinite { index });
        }
        Ok(DiskUnion::from_centers(centers, radius))
    }

    fn difference(&self, line: &Polyline, region: &DiskUnion) -> Result<MultiPolyline, GeometryFault> {
        if line.vertex_count() < 2 {
            return Err(GeometryFault::TooFewVertices {
                count: line.vertex_count(),
            });
        }
        if let Some(index) = line.first_non_finite() {
            return Err(GeometryFault::NonFinite { index });
        }
        Ok(erase(line, region))
    }

    fn proximity_query(&self, points: &[Vector2<f64>], radius: f64) -> Vec<(usize, usize)> {
        if points.len() < 2 {
            return Vec::new();
        }
        PointIndex::new(points).pairs_within(points, radius)
    }
}
