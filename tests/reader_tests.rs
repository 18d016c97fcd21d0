// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tests for the public reader entry points.
//!
//! Run with: cargo test --test reader_tests

mod common;

use common::*;

use mpsio::io::formats::point_cloud::GlobalPointCloud;
use mpsio::io::formats::trajectory::ClosedLoopTrajectory;
use mpsio::{
    read_closed_loop_trajectory, read_eye_gaze, read_global_point_cloud, read_online_calibration,
    read_open_loop_trajectory, read_point_observations, read_records,
    read_static_camera_calibrations, try_read_records, CompressionMode, ReadError, ReadOptions,
    RowPolicy, TimeQuery, Timeline, TrajectoryKind,
};

// ============================================================================
// Missing and empty inputs
// ============================================================================

#[test]
fn test_missing_path_is_empty_for_every_artifact() {
    let fixtures = Fixtures::new();
    let missing = fixtures.path("does_not_exist.csv");

    for mode in [CompressionMode::Auto, CompressionMode::None, CompressionMode::Gzip] {
        assert!(read_open_loop_trajectory(&missing, mode).is_empty());
        assert!(read_closed_loop_trajectory(&missing, mode).is_empty());
        assert!(read_global_point_cloud(&missing, mode).is_empty());
        assert!(read_point_observations(&missing, mode).is_empty());
        assert!(read_online_calibration(&missing, mode).is_empty());
        assert!(read_eye_gaze(&missing, mode).is_empty());
        assert!(read_static_camera_calibrations(&missing, mode).is_empty());
    }
}

#[test]
fn test_empty_file_is_empty() {
    let fixtures = Fixtures::new();
    let empty = fixtures.write("empty.csv", "");

    assert!(read_closed_loop_trajectory(&empty, CompressionMode::Auto).is_empty());
    assert!(read_global_point_cloud(&empty, CompressionMode::Auto).is_empty());
    assert!(read_online_calibration(&empty, CompressionMode::Auto).is_empty());
    assert!(read_eye_gaze(&empty, CompressionMode::Auto).is_empty());
}

#[test]
fn test_header_only_file_is_empty() {
    let fixtures = Fixtures::new();
    let header = GLOBAL_POINTS.lines().next().unwrap();
    let path = fixtures.write("points.csv", &format!("{header}\n"));

    assert!(read_global_point_cloud(&path, CompressionMode::None).is_empty());
    let points = try_read_records::<GlobalPointCloud, _>(&path, &ReadOptions::new()).unwrap();
    assert!(points.is_empty());
}

#[test]
fn test_unrecognized_header_is_empty() {
    let fixtures = Fixtures::new();
    // Point cloud file handed to the trajectory reader
    let path = fixtures.write("points.csv", GLOBAL_POINTS);

    assert!(read_closed_loop_trajectory(&path, CompressionMode::Auto).is_empty());
    let err = try_read_records::<ClosedLoopTrajectory, _>(&path, &ReadOptions::new()).unwrap_err();
    assert!(matches!(err, ReadError::Header { .. }));
}

// ============================================================================
// Valid samples
// ============================================================================

#[test]
fn test_valid_samples_are_not_empty() {
    let fixtures = Fixtures::new();
    let auto = CompressionMode::Auto;

    let closed = fixtures.write("closed_loop_trajectory.csv", CLOSED_LOOP_TRAJECTORY);
    let open = fixtures.write("open_loop_trajectory.csv", OPEN_LOOP_TRAJECTORY);
    let points = fixtures.write_gz("global_points.csv.gz", GLOBAL_POINTS);
    let observations = fixtures.write_gz("semidense_observations.csv.gz", POINT_OBSERVATIONS);
    let calibs = fixtures.write("online_calibration.jsonl", &online_calibrations());
    let gaze = fixtures.write("general_eye_gaze.csv", EYE_GAZE_WITH_SESSION);
    let cams = fixtures.write("static_cam_calibs.csv", STATIC_CAMERAS);

    assert_eq!(read_closed_loop_trajectory(&closed, auto).len(), 3);
    assert_eq!(read_open_loop_trajectory(&open, auto).len(), 2);
    assert_eq!(read_global_point_cloud(&points, auto).len(), 3);
    assert_eq!(read_point_observations(&observations, auto).len(), 3);
    assert_eq!(read_online_calibration(&calibs, auto).len(), 3);
    assert_eq!(read_eye_gaze(&gaze, auto).len(), 2);
    assert_eq!(read_static_camera_calibrations(&cams, auto).len(), 2);
}

#[test]
fn test_trajectory_kinds() {
    let fixtures = Fixtures::new();
    let closed = fixtures.write("closed.csv", CLOSED_LOOP_TRAJECTORY);
    let open = fixtures.write("open.csv", OPEN_LOOP_TRAJECTORY);

    let closed = read_closed_loop_trajectory(&closed, CompressionMode::None);
    assert!(closed.iter().all(|p| p.kind == TrajectoryKind::ClosedLoop));
    assert!(closed.iter().all(|p| p.frame_uid == "g0"));

    let open = read_open_loop_trajectory(&open, CompressionMode::None);
    assert!(open.iter().all(|p| p.kind == TrajectoryKind::OpenLoop));
    assert_eq!(open[1].translation().y, 0.1);
    assert_eq!(open[1].frame_uid, "s0");
}

#[test]
fn test_static_camera_frame_range() {
    let fixtures = Fixtures::new();
    let path = fixtures.write("static_cam_calibs.csv", STATIC_CAMERAS);
    let cams = read_static_camera_calibrations(&path, CompressionMode::Auto);

    assert_eq!(cams[0].start_frame_idx, None);
    assert_eq!(cams[0].end_frame_idx, None);
    assert_eq!(cams[1].start_frame_idx, Some(30));
    assert_eq!(cams[1].end_frame_idx, Some(900));
    assert_eq!(cams[1].intrinsics[0], 710.0);
}

// ============================================================================
// Read semantics
// ============================================================================

#[test]
fn test_reads_are_idempotent() {
    let fixtures = Fixtures::new();
    let path = fixtures.write("closed.csv", CLOSED_LOOP_TRAJECTORY);

    let first = read_closed_loop_trajectory(&path, CompressionMode::Auto);
    let second = read_closed_loop_trajectory(&path, CompressionMode::Auto);
    assert_eq!(first, second);
}

#[test]
fn test_row_order_preserved() {
    let fixtures = Fixtures::new();
    let data = "\
uid,px_world,py_world,pz_world
30,0,0,0
10,0,0,0
20,0,0,0
";
    let path = fixtures.write("points.csv", data);
    let uids: Vec<u64> = read_global_point_cloud(&path, CompressionMode::Auto)
        .iter()
        .map(|p| p.uid)
        .collect();
    assert_eq!(uids, vec![30, 10, 20]);
}

#[test]
fn test_skip_policy_keeps_valid_rows_in_order() {
    let fixtures = Fixtures::new();
    let data = "\
uid,px_world,py_world,pz_world
1,0,0,0
2,not_a_number,0,0
3,0,0
4,0,0,0
";
    let path = fixtures.write("points.csv", data);

    let uids: Vec<u64> = read_global_point_cloud(&path, CompressionMode::Auto)
        .iter()
        .map(|p| p.uid)
        .collect();
    assert_eq!(uids, vec![1, 4]);
}

#[test]
fn test_strict_policy_rejects_whole_file() {
    let fixtures = Fixtures::new();
    let data = "\
uid,px_world,py_world,pz_world
1,0,0,0
2,not_a_number,0,0
3,0,0,0
";
    let path = fixtures.write("points.csv", data);
    let strict = ReadOptions::new().row_policy(RowPolicy::Strict);

    assert!(read_records::<GlobalPointCloud, _>(&path, &strict).is_empty());
    let err = try_read_records::<GlobalPointCloud, _>(&path, &strict).unwrap_err();
    match err {
        ReadError::Aborted { line, cause } => {
            assert_eq!(line, 3);
            assert!(cause.contains("px_world"));
        }
        other => panic!("expected abort, got {other:?}"),
    }

    assert_eq!(read_records::<GlobalPointCloud, _>(&path, &ReadOptions::new()).len(), 2);
}

#[test]
fn test_extra_columns_are_ignored() {
    let fixtures = Fixtures::new();
    let data = "\
note,uid,px_world,py_world,pz_world,color
a,1,0.5,0.5,0.5,red
";
    let path = fixtures.write("points.csv", data);
    let points = read_global_point_cloud(&path, CompressionMode::Auto);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].position_world.x, 0.5);
}

// ============================================================================
// Timeline over read records
// ============================================================================

#[test]
fn test_timeline_over_trajectory() {
    let fixtures = Fixtures::new();
    let path = fixtures.write("closed.csv", CLOSED_LOOP_TRAJECTORY);
    let timeline = Timeline::new(read_closed_loop_trajectory(&path, CompressionMode::Auto));

    assert_eq!(timeline.start_ns(), Some(1_000_000));
    assert_eq!(timeline.end_ns(), Some(3_000_000));

    let pose = timeline.get(2_400_000, TimeQuery::Closest).unwrap();
    assert_eq!(pose.tracking_timestamp_us, 2000);
    let pose = timeline.get(2_400_000, TimeQuery::After).unwrap();
    assert_eq!(pose.tracking_timestamp_us, 3000);
    assert!(timeline.get(999_999, TimeQuery::Before).is_none());
}
