//! Synthetic sidewalk networks.
//!
//! Purpose
//! - Reproducible line sets shaped like a city block grid, for benchmarks,
//!   property tests, and the CLI `synth` command.

pub mod rand;

pub use self::rand::{draw_grid_network, GridCfg, ReplayToken};
