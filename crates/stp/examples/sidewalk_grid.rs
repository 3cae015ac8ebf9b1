//! Resolve a synthetic block grid and print the per-round history.
//!
//! Usage:
//!   cargo run -p stp --example sidewalk_grid -- [seed] [blocks]

use stp::api::{draw_grid_network, GridNetworkCfg, PlacementParams, ReplayToken, Resolver};

fn main() {
    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(2025);
    let blocks: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(4);
    let cfg = GridNetworkCfg {
        blocks_x: blocks,
        blocks_y: blocks,
        overlap_prob: 0.4,
        ..GridNetworkCfg::default()
    };
    let lines = draw_grid_network(cfg, ReplayToken { seed, index: 0 });
    let resolver = Resolver::new(PlacementParams::new(25.0, 20.0).with_max_iterations(6)).unwrap();
    let out = resolver.run(lines).unwrap();
    for r in &out.history {
        println!(
            "round {}: lines={} length={:.1} points={} conflicts={} suppressed={}",
            r.round, r.lines, r.total_length, r.points, r.conflicts, r.suppressed_lines
        );
    }
    println!(
        "{:?} after {} rounds, {} points on {} lines",
        out.termination,
        out.rounds_run,
        out.final_points.len(),
        out.final_lines.len()
    );
}
