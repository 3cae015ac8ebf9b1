use nalgebra::Vector2;

use super::cfg::LEN_EPS;
use super::types::{Disk, DiskUnion, MultiPolyline, Polyline};

/// Parameter interval `[t0, t1] ⊂ [0, 1]` of segment `a + t·d` inside `disk`.
///
/// Tangency and misses return `None`; the erase only removes positive length.
fn segment_disk_interval(a: Vector2<f64>, d: Vector2<f64>, disk: &Disk) -> Option<(f64, f64)> {
    let qa = d.dot(&d);
    if qa <= 0.0 {
        return None;
    }
    let f = a - disk.center;
    let qb = 2.0 * f.dot(&d);
    let qc = f.dot(&f) - disk.radius * disk.radius;
    let disc = qb * qb - 4.0 * qa * qc;
    if disc <= 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t0 = ((-qb - sq) / (2.0 * qa)).max(0.0);
    let t1 = ((-qb + sq) / (2.0 * qa)).min(1.0);
    if t0 < t1 {
        Some((t0, t1))
    } else {
        None
    }
}

/// Chainage intervals of `line` covered by `region`, sorted and merged.
pub(crate) fn covered_intervals(line: &Polyline, region: &DiskUnion) -> Vec<(f64, f64)> {
    let mut out: Vec<(f64, f64)> = Vec::new();
    let mut cum = 0.0;
    for (a, b) in line.segments() {
        let d = b - a;
        let len = d.norm();
        if len > 0.0 {
            let (lo, hi) = (a.inf(&b), a.sup(&b));
            for disk in region.disks() {
                let r = disk.radius;
                let c = disk.center;
                // bbox reject
                if c.x + r < lo.x || c.x - r > hi.x || c.y + r < lo.y || c.y - r > hi.y {
                    continue;
                }
                if let Some((t0, t1)) = segment_disk_interval(a, d, disk) {
                    out.push((cum + t0 * len, cum + t1 * len));
                }
            }
        }
        cum += len;
    }
    merge_intervals(out)
}

pub(crate) fn merge_intervals(mut iv: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    iv.sort_by(|x, y| x.0.total_cmp(&y.0));
    let mut merged: Vec<(f64, f64)> = Vec::with_capacity(iv.len());
    for (s, e) in iv {
        if let Some(last) = merged.last_mut() {
            if s <= last.1 {
                last.1 = last.1.max(e);
                continue;
            }
        }
        merged.push((s, e));
    }
    merged
}

/// `line \ region`, one part per uncovered chainage interval.
pub(crate) fn erase(line: &Polyline, region: &DiskUnion) -> MultiPolyline {
    let total = line.length();
    let covered = covered_intervals(line, region);
    if covered.is_empty() {
        return MultiPolyline {
            parts: vec![line.clone()],
        };
    }
    let mut parts = Vec::new();
    let mut start = 0.0;
    for (s, e) in covered {
        if s - start > LEN_EPS {
            parts.push(line.slice(start, s));
        }
        start = start.max(e);
    }
    if total - start > LEN_EPS {
        parts.push(line.slice(start, total));
    }
    MultiPolyline { parts }
}
