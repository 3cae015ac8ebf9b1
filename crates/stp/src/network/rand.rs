//! Random block-grid sidewalks (replay tokens).
//!
//! Model
//! - Streets run along `x = k·block_size` and `y = k·block_size`. Every block
//!   edge gets a sidewalk on both sides of its street, inset by
//!   `sidewalk_offset` from the corners, with one jittered interior vertex.
//! - With probability `overlap_prob` a sidewalk gets a shorter companion line
//!   (e.g. a planting strip digitised twice) shifted sideways by at most
//!   `overlap_shift`. These duplicates and the block corners are where
//!   conflicts come from.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.
//!   Line ids are `0..n` in emission order.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::Polyline;
use crate::place::{Line, LineId};

/// Grid sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct GridCfg {
    pub blocks_x: usize,
    pub blocks_y: usize,
    pub block_size: f64,
    /// Inset of sidewalks from the street centreline and from corners.
    pub sidewalk_offset: f64,
    /// Max sideways displacement of the interior vertex. Clamped to `[0, offset]`.
    pub bend_jitter: f64,
    /// Chance of a companion line per sidewalk. Clamped to `[0, 1]`.
    pub overlap_prob: f64,
    pub overlap_shift: f64,
}

impl Default for GridCfg {
    fn default() -> Self {
        Self {
            blocks_x: 4,
            blocks_y: 3,
            block_size: 300.0,
            sidewalk_offset: 20.0,
            bend_jitter: 4.0,
            overlap_prob: 0.25,
            overlap_shift: 3.0,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finaliser on seed and index.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        StdRng::seed_from_u64(mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15))))
    }
}

struct Emitter {
    rng: StdRng,
    cfg: GridCfg,
    lines: Vec<Line>,
}

impl Emitter {
    fn push(&mut self, vertices: Vec<Vector2<f64>>) {
        let id = LineId::new(self.lines.len() as u64);
        self.lines.push(Line::new(id, Polyline::new(vertices)));
    }

    /// Sidewalk from `a` to `b` with a bent midpoint, plus an optional companion.
    fn sidewalk(&mut self, a: Vector2<f64>, b: Vector2<f64>) {
        let dir = (b - a).normalize();
        let normal = Vector2::new(-dir.y, dir.x);
        let jitter = self.cfg.bend_jitter.clamp(0.0, self.cfg.sidewalk_offset.max(0.0));
        let bend = self.rng.gen_range(-jitter..=jitter);
        let mid = (a + b) * 0.5 + normal * bend;
        self.push(vec![a, mid, b]);

        if self.rng.gen_bool(self.cfg.overlap_prob.clamp(0.0, 1.0)) {
            let u: f64 = self.rng.gen_range(0.0..0.5);
            let v: f64 = self.rng.gen_range(0.5..=1.0);
            let shift = self.cfg.overlap_shift.abs();
            let off = normal * self.rng.gen_range(-shift..=shift);
            self.push(vec![a + (b - a) * u + off, a + (b - a) * v + off]);
        }
    }
}

/// Draw a block-grid sidewalk network.
///
/// Degenerate configurations (no blocks, offsets eating whole blocks) give an
/// empty network.
pub fn draw_grid_network(cfg: GridCfg, tok: ReplayToken) -> Vec<Line> {
    let b = cfg.block_size;
    let off = cfg.sidewalk_offset;
    if cfg.blocks_x == 0 || cfg.blocks_y == 0 || !(b > 2.0 * off) || off < 0.0 {
        return Vec::new();
    }
    let mut em = Emitter {
        rng: tok.to_std_rng(),
        cfg,
        lines: Vec::new(),
    };
    // east-west streets
    for row in 0..=cfg.blocks_y {
        let y = row as f64 * b;
        for col in 0..cfg.blocks_x {
            let (x0, x1) = (col as f64 * b + off, (col + 1) as f64 * b - off);
            for side in [-1.0, 1.0] {
                em.sidewalk(Vector2::new(x0, y + side * off), Vector2::new(x1, y + side * off));
            }
        }
    }
    // north-south streets
    for col in 0..=cfg.blocks_x {
        let x = col as f64 * b;
        for row in 0..cfg.blocks_y {
            let (y0, y1) = (row as f64 * b + off, (row + 1) as f64 * b - off);
            for side in [-1.0, 1.0] {
                em.sidewalk(Vector2::new(x + side * off, y0), Vector2::new(x + side * off, y1));
            }
        }
    }
    em.lines
}
