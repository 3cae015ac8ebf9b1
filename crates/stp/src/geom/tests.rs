use super::erase::{covered_intervals, merge_intervals};
use super::*;
use crate::error::GeometryFault;
use nalgebra::{vector, Vector2};

fn l_shape() -> Polyline {
    // length 10 + 5
    Polyline::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 5.0)])
}

#[test]
fn length_and_interpolation_follow_chainage() {
    let line = l_shape();
    assert!((line.length() - 15.0).abs() < 1e-12);
    assert_eq!(line.point_at(0.0), Some(vector![0.0, 0.0]));
    assert_eq!(line.point_at(12.0), Some(vector![10.0, 2.0]));
    assert_eq!(line.point_at(15.0), Some(vector![10.0, 5.0]));
    assert_eq!(line.point_at(15.5), None);
    assert_eq!(line.point_at(-1.0), None);
    let engine = PlanarEngine;
    assert_eq!(engine.interpolate(&line, 5.0), Some(vector![5.0, 0.0]));
    assert!((engine.distance(vector![0.0, 0.0], vector![3.0, 4.0]) - 5.0).abs() < 1e-12);
}

#[test]
fn walker_resumes_across_segments() {
    let line = l_shape();
    let mut w = Walker::new(&line);
    let got: Vec<Vector2<f64>> = [1.0, 9.0, 11.0, 14.0]
        .iter()
        .map(|&s| w.advance(s).unwrap())
        .collect();
    assert_eq!(
        got,
        vec![
            vector![1.0, 0.0],
            vector![9.0, 0.0],
            vector![10.0, 1.0],
            vector![10.0, 4.0]
        ]
    );
}

#[test]
fn slice_keeps_interior_vertices() {
    let line = l_shape();
    let part = line.slice(8.0, 13.0);
    assert_eq!(
        part.vertices,
        vec![vector![8.0, 0.0], vector![10.0, 0.0], vector![10.0, 3.0]]
    );
    assert!((part.length() - 5.0).abs() < 1e-12);
}

#[test]
fn validate_reports_faults() {
    assert_eq!(l_shape().validate(), Ok(15.0));
    assert_eq!(
        Polyline::default().validate(),
        Err(GeometryFault::TooFewVertices { count: 0 })
    );
    assert_eq!(
        Polyline::from_xy(&[(2.0, 2.0), (2.0, 2.0)]).validate(),
        Err(GeometryFault::ZeroLength)
    );
}

#[test]
fn disk_erase_splits_a_straight_line() {
    let line = Polyline::from_xy(&[(0.0, 0.0), (20.0, 0.0)]);
    let engine = PlanarEngine;
    let region = engine.buffer(&[vector![10.0, 0.0]], 3.0).unwrap();
    let parts = engine.explode(engine.difference(&line, &region).unwrap());
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].vertices, vec![vector![0.0, 0.0], vector![7.0, 0.0]]);
    assert_eq!(parts[1].vertices, vec![vector![13.0, 0.0], vector![20.0, 0.0]]);
    assert!(!region.contains(vector![6.99, 0.0]));
    assert!(region.contains(vector![7.0, 0.0]));
}

#[test]
fn overlapping_disks_merge_and_cover_corners() {
    let line = l_shape();
    let region = DiskUnion::from_centers(&[vector![9.0, 0.0], vector![10.0, 2.0]], 2.0);
    let iv = covered_intervals(&line, &region);
    assert_eq!(iv.len(), 1);
    // first disk starts at chainage 7, second ends at 10 + 2 + 2
    assert!((iv[0].0 - 7.0).abs() < 1e-12);
    assert!((iv[0].1 - 14.0).abs() < 1e-12);
    let parts = PlanarEngine.explode(PlanarEngine.difference(&line, &region).unwrap());
    assert_eq!(parts.len(), 2);
    assert!((parts[0].length() - 7.0).abs() < 1e-12);
    assert!((parts[1].length() - 1.0).abs() < 1e-12);
}

#[test]
fn erase_everything_or_nothing() {
    let line = Polyline::from_xy(&[(0.0, 0.0), (4.0, 0.0)]);
    let all = PlanarEngine.buffer(&[vector![2.0, 0.0]], 5.0).unwrap();
    assert!(PlanarEngine
        .explode(PlanarEngine.difference(&line, &all).unwrap())
        .is_empty());
    // tangent disk removes no length
    let tangent = PlanarEngine.buffer(&[vector![2.0, 1.0]], 1.0).unwrap();
    let multi = PlanarEngine.difference(&line, &tangent).unwrap();
    assert_eq!(multi.parts, vec![line.clone()]);
}

#[test]
fn engine_rejects_bad_inputs() {
    assert_eq!(
        PlanarEngine.buffer(&[vector![0.0, 0.0]], 0.0),
        Err(GeometryFault::BadRadius { radius: 0.0 })
    );
    assert_eq!(
        PlanarEngine.buffer(&[vector![0.0, 0.0], vector![f64::NAN, 0.0]], 1.0),
        Err(GeometryFault::NonFinite { index: 1 })
    );
    let bad = Polyline::from_xy(&[(0.0, 0.0), (1.0, f64::NAN)]);
    assert_eq!(
        PlanarEngine.difference(&bad, &DiskUnion::default()),
        Err(GeometryFault::NonFinite { index: 1 })
    );
}

#[test]
fn merge_intervals_handles_touching_and_nested() {
    let merged = merge_intervals(vec![(5.0, 6.0), (0.0, 2.0), (2.0, 3.0), (0.5, 1.0)]);
    assert_eq!(merged, vec![(0.0, 3.0), (5.0, 6.0)]);
}

#[test]
fn proximity_query_is_inclusive_and_sorted() {
    let pts = vec![
        vector![0.0, 0.0],
        vector![3.0, 4.0],
        vector![100.0, 0.0],
        vector![0.0, 1.0],
    ];
    let pairs = PlanarEngine.proximity_query(&pts, 5.0);
    assert_eq!(pairs, vec![(0, 1), (0, 3), (1, 3)]);
    let index = PointIndex::new(&pts);
    assert_eq!(index.len(), 4);
    assert_eq!(index.within(vector![0.0, 0.0], 1.0), vec![0, 3]);
    assert!(PointIndex::new(&[]).is_empty());
}
