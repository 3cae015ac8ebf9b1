use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use stp::api::{
    draw_grid_network, drop_conflicting, generate_all, GridNetworkCfg, Line, Outcome,
    PlacementParams, ReplayToken, Resolver,
};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod config;
mod io;
mod provenance;

use config::ParamArgs;
use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "stp")]
#[command(about = "Place street-tree sites along sidewalk lines without crowding")]
struct Cmd {
    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Resolve conflicts and write point and line tables
    Place {
        #[arg(long)]
        lines: PathBuf,
        #[arg(long)]
        points_out: PathBuf,
        #[arg(long)]
        lines_out: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
        /// If the round budget runs out, also drop every point still in conflict
        #[arg(long)]
        drop_unresolved: bool,
    },
    /// List round-0 conflicts without trimming
    Conflicts {
        #[arg(long)]
        lines: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Write a random block-grid sidewalk network
    Synth {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        /// Blocks per side
        #[arg(long, default_value_t = 4)]
        blocks: usize,
        #[arg(long, default_value_t = 300.0)]
        block_size: f64,
        #[arg(long, default_value_t = 0.25)]
        overlap_prob: f64,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Place {
            lines,
            points_out,
            lines_out,
            params,
            drop_unresolved,
        } => {
            let summary = place(&lines, &points_out, &lines_out, &params, drop_unresolved)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Action::Conflicts { lines, params } => {
            let report = conflicts(&lines, &params)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Action::Synth {
            out,
            seed,
            index,
            blocks,
            block_size,
            overlap_prob,
        } => synth(&out, seed, index, blocks, block_size, overlap_prob),
        Action::Report => report(),
    }
}

fn params_json(p: &PlacementParams) -> serde_json::Value {
    json!({
        "spacing": p.spacing,
        "separation_radius": p.separation_radius,
        "buffer_radius": p.buffer_radius,
        "min_fragment_length": p.min_fragment_length,
        "max_iterations": p.max_iterations,
    })
}

#[derive(Debug, Serialize)]
struct RoundSummary {
    round: u32,
    lines: usize,
    total_length: f64,
    points: usize,
    conflicts: usize,
    suppressed_lines: usize,
}

#[derive(Debug, Serialize)]
struct PlaceSummary {
    termination: String,
    converged: bool,
    rounds_run: u32,
    lines_in: usize,
    lines_out: usize,
    points: usize,
    /// Points removed by `--drop-unresolved`.
    dropped_points: usize,
    warnings: Vec<String>,
    history: Vec<RoundSummary>,
}

impl PlaceSummary {
    fn new(lines_in: usize, out: &Outcome, dropped_points: usize, points: usize) -> Self {
        Self {
            termination: format!("{:?}", out.termination),
            converged: out.converged,
            rounds_run: out.rounds_run,
            lines_in,
            lines_out: out.final_lines.len(),
            points,
            dropped_points,
            warnings: out.warnings.iter().map(|w| w.to_string()).collect(),
            history: out
                .history
                .iter()
                .map(|r| RoundSummary {
                    round: r.round,
                    lines: r.lines,
                    total_length: r.total_length,
                    points: r.points,
                    conflicts: r.conflicts,
                    suppressed_lines: r.suppressed_lines,
                })
                .collect(),
        }
    }
}

fn place(
    input: &Path,
    points_out: &Path,
    lines_out: &Path,
    params: &ParamArgs,
    drop_unresolved: bool,
) -> Result<PlaceSummary> {
    let params = params.resolve()?;
    let lines = io::read_lines(input)?;
    tracing::info!(input = %input.display(), lines = lines.len(), "place");
    let lines_in = lines.len();
    let resolver = Resolver::new(params).context("invalid placement parameters")?;
    let out = resolver.run(lines)?;

    let mut points = out.final_points.clone();
    if drop_unresolved && !out.converged {
        points = drop_conflicting(resolver.engine(), &points, params.separation_radius);
        tracing::info!(
            kept = points.len(),
            dropped = out.final_points.len() - points.len(),
            "dropped unresolved points"
        );
    }
    let summary = PlaceSummary::new(
        lines_in,
        &out,
        out.final_points.len() - points.len(),
        points.len(),
    );
    let summary_json = serde_json::to_value(&summary)?;

    io::write_frame(points_out, &mut io::points_frame(&points)?)?;
    io::write_frame(lines_out, &mut io::lines_frame(&out.final_lines)?)?;
    for artifact in [points_out, lines_out] {
        let payload = Payload::new("place", params_json(&params))
            .with_input(input)
            .with_summary(summary_json.clone());
        write_sidecar(artifact, payload)?;
    }
    Ok(summary)
}

#[derive(Debug, Serialize)]
struct ConflictRow {
    a: u32,
    a_line: String,
    b: u32,
    b_line: String,
    distance: f64,
}

#[derive(Debug, Serialize)]
struct ConflictReport {
    lines: usize,
    points: usize,
    conflicts: Vec<ConflictRow>,
}

fn conflicts(input: &Path, params: &ParamArgs) -> Result<ConflictReport> {
    let params = params.resolve()?;
    let lines: Vec<Line> = io::read_lines(input)?;
    let resolver = Resolver::new(params).context("invalid placement parameters")?;
    let (points, invalid) = generate_all(&lines, params.spacing, 0);
    for e in &invalid {
        tracing::warn!(%e, "line skipped");
    }
    let rows = resolver
        .conflicts(&points)
        .into_iter()
        .filter_map(|pair| {
            let a = points.get(pair.lo())?;
            let b = points.get(pair.hi())?;
            Some(ConflictRow {
                a: a.id.0,
                a_line: a.parent.to_string(),
                b: b.id.0,
                b_line: b.parent.to_string(),
                distance: (a.position - b.position).norm(),
            })
        })
        .collect();
    Ok(ConflictReport {
        lines: lines.len(),
        points: points.len(),
        conflicts: rows,
    })
}

fn synth(
    out: &Path,
    seed: u64,
    index: u64,
    blocks: usize,
    block_size: f64,
    overlap_prob: f64,
) -> Result<()> {
    let cfg = GridNetworkCfg {
        blocks_x: blocks,
        blocks_y: blocks,
        block_size,
        overlap_prob,
        ..GridNetworkCfg::default()
    };
    let lines = draw_grid_network(cfg, ReplayToken { seed, index });
    tracing::info!(out = %out.display(), lines = lines.len(), seed, index, "synth");
    io::write_frame(out, &mut io::lines_frame(&lines)?)?;
    let params = json!({
        "seed": seed,
        "index": index,
        "blocks": blocks,
        "block_size": block_size,
        "sidewalk_offset": cfg.sidewalk_offset,
        "bend_jitter": cfg.bend_jitter,
        "overlap_prob": overlap_prob,
        "overlap_shift": cfg.overlap_shift,
    });
    let payload = Payload::new("synth", params).with_summary(json!({"lines": lines.len()}));
    write_sidecar(out, payload)?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "tool": "stp",
        "version": stp::VERSION,
        "code_rev": provenance::current_git_rev(),
        "defaults": {
            "max_iterations": PlacementParams::DEFAULT_MAX_ITERATIONS,
            "min_fragment_length": PlacementParams::DEFAULT_MIN_FRAGMENT_LENGTH,
            "buffer_margin": PlacementParams::BUFFER_MARGIN,
        },
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(spacing: f64, separation: f64) -> ParamArgs {
        ParamArgs {
            spacing: Some(spacing),
            separation: Some(separation),
            ..ParamArgs::default()
        }
    }

    fn write_overlap(path: &Path) {
        std::fs::write(
            path,
            "line_id,x,y\n1,0,0\n1,100,0\n2,20,3\n2,70,3\n",
        )
        .unwrap();
    }

    #[test]
    fn place_writes_tables_and_sidecars() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("lines.csv");
        write_overlap(&input);
        let points_out = dir.path().join("out/points.csv");
        let lines_out = dir.path().join("out/lines.parquet");

        let summary = place(&input, &points_out, &lines_out, &args(10.0, 8.0), false).unwrap();
        assert!(summary.converged);
        assert_eq!(summary.rounds_run, 1);
        assert_eq!(summary.lines_in, 2);
        assert_eq!(summary.lines_out, 1);
        assert_eq!(summary.points, 10);

        assert!(points_out.exists());
        assert!(dir.path().join("out/points.provenance.json").exists());
        assert!(dir.path().join("out/lines.provenance.json").exists());
        let back = io::read_lines(&lines_out).unwrap();
        assert_eq!(back, vec![Line::from_xy(1, &[(0.0, 0.0), (100.0, 0.0)])]);
    }

    #[test]
    fn placed_lines_can_be_placed_again() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("crossing.csv");
        std::fs::write(&input, "line_id,x,y\n1,0,0\n1,100,0\n2,50,-40\n2,50,40\n").unwrap();
        let mut params = args(10.0, 8.0);
        params.min_fragment = Some(0.0);
        let first_lines = dir.path().join("first/lines.csv");
        let first = place(&input, &dir.path().join("first/points.csv"), &first_lines, &params, false)
            .unwrap();
        assert!(first.converged);
        assert_eq!(first.lines_out, 3);

        let second = place(
            &first_lines,
            &dir.path().join("second/points.csv"),
            &dir.path().join("second/lines.csv"),
            &params,
            false,
        )
        .unwrap();
        assert!(second.converged);
        assert_eq!(second.rounds_run, 0);
        assert_eq!(second.lines_in, 3);
        assert_eq!(second.points, first.points);
        let before = first.history.last().unwrap().total_length;
        let after = second.history[0].total_length;
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn drop_unresolved_clears_remaining_conflicts() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("lines.csv");
        write_overlap(&input);
        let mut params = args(10.0, 8.0);
        // buffer 1 cannot reach the line 3 units away
        params.buffer = Some(1.0);
        params.max_iterations = Some(1);
        let summary = place(
            &input,
            &dir.path().join("p.csv"),
            &dir.path().join("l.csv"),
            &params,
            true,
        )
        .unwrap();
        assert!(!summary.converged);
        assert!(summary.dropped_points > 0);
        assert!(summary.warnings.iter().any(|w| w.contains("no convergence")));
    }

    #[test]
    fn conflicts_lists_round_zero_pairs() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("lines.csv");
        write_overlap(&input);
        let report = conflicts(&input, &args(10.0, 8.0)).unwrap();
        assert_eq!(report.lines, 2);
        assert_eq!(report.points, 15);
        assert!(!report.conflicts.is_empty());
        assert!(report.conflicts.iter().all(|c| c.distance <= 8.0));
        assert!(report.conflicts.iter().all(|c| c.a_line != c.b_line));
    }

    #[test]
    fn synth_is_reproducible() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        synth(&a, 5, 1, 2, 120.0, 0.5).unwrap();
        synth(&b, 5, 1, 2, 120.0, 0.5).unwrap();
        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
        assert!(!io::read_lines(&a).unwrap().is_empty());
        assert!(dir.path().join("a.provenance.json").exists());
    }
}
