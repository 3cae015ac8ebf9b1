//! Polylines, disks, and the chainage walker.
//!
//! - `Polyline`: ordered vertex list; length and sub-line extraction by chainage.
//! - `Walker`: forward-only cursor used to place many points along one line.
//! - `Disk`, `DiskUnion`: point buffers; a union is kept as its member disks.
//! - `MultiPolyline`: result of erasing a region from a line, before explode.

use nalgebra::Vector2;

use super::cfg::{LEN_EPS, REL_LEN_EPS};
use crate::error::GeometryFault;

/// Ordered polyline in the plane.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    pub vertices: Vec<Vector2<f64>>,
}

impl Polyline {
    #[inline]
    pub fn new(vertices: Vec<Vector2<f64>>) -> Self {
        Self { vertices }
    }

    /// Convenience constructor from `(x, y)` tuples.
    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Vector2::new(x, y)).collect())
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Consecutive vertex pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Vector2<f64>, Vector2<f64>)> + '_ {
        self.vertices.windows(2).map(|w| (w[0], w[1]))
    }

    /// Sum of segment lengths (NaN if any coordinate is non-finite).
    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| (b - a).norm()).sum()
    }

    pub fn first_non_finite(&self) -> Option<usize> {
        self.vertices
            .iter()
            .position(|v| !(v.x.is_finite() && v.y.is_finite()))
    }

    /// Check the line can carry placements and return its length.
    pub fn validate(&self) -> Result<f64, GeometryFault> {
        if self.vertices.len() < 2 {
            return Err(GeometryFault::TooFewVertices {
                count: self.vertices.len(),
            });
        }
        if let Some(index) = self.first_non_finite() {
            return Err(GeometryFault::NonFinite { index });
        }
        let len = self.length();
        if len <= LEN_EPS {
            return Err(GeometryFault::ZeroLength);
        }
        Ok(len)
    }

    /// Position at `chainage` from the first vertex; `None` off the line.
    pub fn point_at(&self, chainage: f64) -> Option<Vector2<f64>> {
        Walker::new(self).advance(chainage)
    }

    /// Sub-line between two chainages (`0 <= from < to <= length`).
    pub fn slice(&self, from: f64, to: f64) -> Polyline {
        let mut out: Vec<Vector2<f64>> = Vec::new();
        let mut cum = 0.0;
        for (a, b) in self.segments() {
            let len = (b - a).norm();
            let end = cum + len;
            if end < from {
                cum = end;
                continue;
            }
            let at = |s: f64| {
                if len > 0.0 {
                    a + (b - a) * ((s - cum) / len).clamp(0.0, 1.0)
                } else {
                    a
                }
            };
            if out.is_empty() {
                out.push(at(from));
            }
            if end < to {
                out.push(b);
            } else {
                out.push(at(to));
                break;
            }
            cum = end;
        }
        out.dedup_by(|p, q| (*p - *q).norm() <= LEN_EPS);
        Polyline::new(out)
    }
}

/// Forward-only chainage cursor over a polyline.
///
/// Calls to `advance` must use non-decreasing chainages; each call resumes from
/// the segment reached by the previous one.
#[derive(Clone, Debug)]
pub struct Walker<'a> {
    vertices: &'a [Vector2<f64>],
    seg: usize,
    seg_start: f64,
}

impl<'a> Walker<'a> {
    #[inline]
    pub fn new(line: &'a Polyline) -> Self {
        Self {
            vertices: &line.vertices,
            seg: 0,
            seg_start: 0.0,
        }
    }

    pub fn advance(&mut self, chainage: f64) -> Option<Vector2<f64>> {
        let n = self.vertices.len();
        if n < 2 || !(chainage >= 0.0) {
            return None;
        }
        while self.seg + 1 < n {
            let a = self.vertices[self.seg];
            let b = self.vertices[self.seg + 1];
            let len = (b - a).norm();
            let end = self.seg_start + len;
            let last = self.seg + 2 == n;
            if chainage <= end || last {
                if last && chainage > end + LEN_EPS.max(REL_LEN_EPS * end) {
                    return None;
                }
                let t = if len > 0.0 {
                    ((chainage - self.seg_start) / len).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                return Some(a + (b - a) * t);
            }
            self.seg_start = end;
            self.seg += 1;
        }
        None
    }
}

/// Result of a boolean erase on a line: zero or more parts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiPolyline {
    pub parts: Vec<Polyline>,
}

impl MultiPolyline {
    pub fn length(&self) -> f64 {
        self.parts.iter().map(Polyline::length).sum()
    }
}

/// Closed disk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disk {
    pub center: Vector2<f64>,
    pub radius: f64,
}

impl Disk {
    #[inline]
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        (p - self.center).norm_squared() <= self.radius * self.radius
    }
}

/// Union of disks, stored as its members.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiskUnion {
    disks: Vec<Disk>,
}

impl DiskUnion {
    pub fn from_centers(centers: &[Vector2<f64>], radius: f64) -> Self {
        Self {
            disks: centers
                .iter()
                .map(|&center| Disk { center, radius })
                .collect(),
        }
    }

    #[inline]
    pub fn disks(&self) -> &[Disk] {
        &self.disks
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.disks.is_empty()
    }

    pub fn contains(&self, p: Vector2<f64>) -> bool {
        self.disks.iter().any(|d| d.contains(p))
    }
}
