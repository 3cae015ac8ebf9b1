//! Line and point tables on disk (CSV or Parquet, chosen by extension).
//!
//! Input lines are vertex rows `line_id, x, y[, seq]`. Without `seq` the row
//! order is the vertex order. Lines keep the order of their first row.
//! Tables written by `place` also carry `generation, part`; those columns are
//! part of the line identity, so fragments read back as separate lines.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use stp::api::{Line, LineId, PointSet, Polyline};
use stp::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Csv,
    Parquet,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(e) if e.eq_ignore_ascii_case("csv") => Ok(Format::Csv),
        Some(e) if e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq") => {
            Ok(Format::Parquet)
        }
        _ => bail!(
            "{}: unknown table format (expected .csv or .parquet)",
            path.display()
        ),
    }
}

fn read_frame(path: &Path) -> Result<DataFrame> {
    let lf = match format_of(path)? {
        Format::Csv => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(100))
            .finish()?,
        Format::Parquet => LazyFrame::scan_parquet(path, ScanArgsParquet::default())?,
    };
    lf.collect()
        .with_context(|| format!("reading {}", path.display()))
}

fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let s = df
        .column(name)
        .with_context(|| format!("missing column `{name}`"))?
        .cast(&DataType::Float64)?;
    s.f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.with_context(|| format!("null `{name}` in row {row}")))
        .collect()
}

fn id_column(df: &DataFrame, name: &str) -> Result<Vec<u64>> {
    let s = df
        .column(name)
        .with_context(|| format!("missing column `{name}`"))?
        .cast(&DataType::Int64)?;
    s.i64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| match v {
            Some(id) if id >= 0 => Ok(id as u64),
            Some(id) => bail!("negative `{name}` {id} in row {row}"),
            None => bail!("null `{name}` in row {row}"),
        })
        .collect()
}

fn u32_column(df: &DataFrame, name: &str) -> Result<Vec<u32>> {
    id_column(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            u32::try_from(v).with_context(|| format!("`{name}` {v} out of range in row {row}"))
        })
        .collect()
}

/// Rows to lines; vertices ordered by `seq`, ties by row order.
///
/// `generation`/`part` are optional but must come together.
pub fn lines_from_frame(df: &DataFrame) -> Result<Vec<Line>> {
    let sources = id_column(df, "line_id")?;
    let ids: Vec<LineId> = match (df.column("generation").is_ok(), df.column("part").is_ok()) {
        (true, true) => {
            let generation = u32_column(df, "generation")?;
            let part = u32_column(df, "part")?;
            sources
                .iter()
                .zip(generation)
                .zip(part)
                .map(|((&s, g), p)| LineId::new(s).fragment(g, p))
                .collect()
        }
        (false, false) => sources.iter().map(|&s| LineId::new(s)).collect(),
        _ => bail!("columns `generation` and `part` must both be present or both absent"),
    };
    let xs = f64_column(df, "x")?;
    let ys = f64_column(df, "y")?;
    let seq = if df.column("seq").is_ok() {
        f64_column(df, "seq")?
    } else {
        (0..ids.len()).map(|i| i as f64).collect()
    };

    let mut slot: HashMap<LineId, usize> = HashMap::new();
    let mut groups: Vec<(LineId, Vec<(f64, Vec2<f64>)>)> = Vec::new();
    for (i, &id) in ids.iter().enumerate() {
        let k = *slot.entry(id).or_insert_with(|| {
            groups.push((id, Vec::new()));
            groups.len() - 1
        });
        groups[k].1.push((seq[i], Vec2::new(xs[i], ys[i])));
    }
    Ok(groups
        .into_iter()
        .map(|(id, mut rows)| {
            rows.sort_by(|a, b| a.0.total_cmp(&b.0));
            let vertices = rows.into_iter().map(|(_, v)| v).collect();
            Line::new(id, Polyline::new(vertices))
        })
        .collect())
}

pub fn read_lines(path: &Path) -> Result<Vec<Line>> {
    let df = read_frame(path)?;
    lines_from_frame(&df).with_context(|| format!("parsing lines from {}", path.display()))
}

/// Vertex rows `line_id, generation, part, seq, x, y`.
pub fn lines_frame(lines: &[Line]) -> Result<DataFrame> {
    let n: usize = lines.iter().map(|l| l.geometry().vertex_count()).sum();
    let mut line_id = Vec::with_capacity(n);
    let mut generation = Vec::with_capacity(n);
    let mut part = Vec::with_capacity(n);
    let mut seq = Vec::with_capacity(n);
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for line in lines {
        let id = line.id();
        for (k, v) in line.geometry().vertices.iter().enumerate() {
            line_id.push(id.source);
            generation.push(id.generation);
            part.push(id.part);
            seq.push(k as u32);
            x.push(v.x);
            y.push(v.y);
        }
    }
    let df = df!(
        "line_id" => line_id,
        "generation" => generation,
        "part" => part,
        "seq" => seq,
        "x" => x,
        "y" => y,
    )?;
    Ok(df)
}

/// One row per point: `point_id, line_id, generation, part, x, y, priority, chainage, round`.
pub fn points_frame(points: &PointSet) -> Result<DataFrame> {
    let pts = points.as_slice();
    let df = df!(
        "point_id" => pts.iter().map(|p| p.id.0).collect::<Vec<u32>>(),
        "line_id" => pts.iter().map(|p| p.parent.source).collect::<Vec<u64>>(),
        "generation" => pts.iter().map(|p| p.parent.generation).collect::<Vec<u32>>(),
        "part" => pts.iter().map(|p| p.parent.part).collect::<Vec<u32>>(),
        "x" => pts.iter().map(|p| p.position.x).collect::<Vec<f64>>(),
        "y" => pts.iter().map(|p| p.position.y).collect::<Vec<f64>>(),
        "priority" => pts.iter().map(|p| p.priority).collect::<Vec<f64>>(),
        "chainage" => pts.iter().map(|p| p.chainage).collect::<Vec<f64>>(),
        "round" => pts.iter().map(|p| p.round).collect::<Vec<u32>>(),
    )?;
    Ok(df)
}

pub fn write_frame(path: &Path, df: &mut DataFrame) -> Result<()> {
    let format = format_of(path)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    match format {
        Format::Csv => CsvWriter::new(&mut file).include_header(true).finish(df)?,
        Format::Parquet => {
            ParquetWriter::new(&mut file).finish(df)?;
        }
    }
    tracing::debug!(path = %path.display(), rows = df.height(), "table written");
    Ok(())
}
