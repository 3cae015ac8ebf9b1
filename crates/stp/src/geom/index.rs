//! Radius queries over a static point set (R-tree).

use nalgebra::Vector2;
use rstar::{primitives::GeomWithData, RTree};

type Entry = GeomWithData<[f64; 2], usize>;

/// Read-only R-tree over point positions; items are indices into the input slice.
#[derive(Debug)]
pub struct PointIndex {
    tree: RTree<Entry>,
    len: usize,
}

impl PointIndex {
    pub fn new(points: &[Vector2<f64>]) -> Self {
        let entries: Vec<Entry> = points
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new([p.x, p.y], i))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
            len: points.len(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Indices of points with `|p - query| <= radius`, ascending.
    pub fn within(&self, query: Vector2<f64>, radius: f64) -> Vec<usize> {
        if !(radius >= 0.0) {
            return Vec::new();
        }
        let mut out: Vec<usize> = self
            .tree
            .locate_within_distance([query.x, query.y], radius * radius)
            .map(|e| e.data)
            .collect();
        out.sort_unstable();
        out
    }

    /// All index pairs `(i, j)`, `i < j`, with `|p_i - p_j| <= radius`, sorted.
    pub fn pairs_within(&self, points: &[Vector2<f64>], radius: f64) -> Vec<(usize, usize)> {
        debug_assert_eq!(points.len(), self.len);
        let r2 = radius * radius;
        let mut pairs = Vec::new();
        for (i, p) in points.iter().enumerate() {
            for j in self.within(*p, radius) {
                if j > i && (points[j] - p).norm_squared() <= r2 {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}
