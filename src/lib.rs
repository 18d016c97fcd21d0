// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # mpsio
//!
//! Readers for the artifacts produced by machine-perception services on
//! egocentric recordings: device trajectories, semi-dense point clouds and
//! their observations, online sensor calibration, eye gaze and static
//! camera calibration.
//!
//! Every reader has the same contract: it takes a path and a
//! [`CompressionMode`] and returns a `Vec` of typed records. A missing,
//! unreadable or unrecognized file yields an empty `Vec` and a `tracing`
//! warning, never an error or a panic.
//!
//! ## Architecture
//!
//! - `core/` - Error type, compression and row policies, the [`Timestamped`] trait
//! - `io/compression` - gzip detection and decoding byte sources
//! - `io/delimited`, `io/jsonl` - CSV rows bound by header name, JSON lines
//! - `io/formats/` - One adapter per artifact, mapping rows to records
//! - `io/reader` - Facade applying [`ReadOptions`] and the error policy
//! - `calibration/` - Camera and IMU calibration records and their JSON layout
//! - `timeline` - Timestamp queries over any record sequence
//!
//! ## Example: Reading a trajectory
//!
//! ```rust,no_run
//! use mpsio::{read_closed_loop_trajectory, CompressionMode};
//!
//! let poses = read_closed_loop_trajectory("closed_loop_trajectory.csv", CompressionMode::Auto);
//! for pose in &poses {
//!     println!("{} {:?}", pose.tracking_timestamp_us, pose.translation());
//! }
//! ```
//!
//! ## Example: Strict reads with diagnostics
//!
//! ```rust,no_run
//! use mpsio::io::formats::eye_gaze::EyeGazes;
//! use mpsio::{try_read_records, ReadOptions, RowPolicy};
//!
//! let options = ReadOptions::new().row_policy(RowPolicy::Strict);
//! match try_read_records::<EyeGazes, _>("general_eye_gaze.csv", &options) {
//!     Ok(gazes) => println!("{} gaze samples", gazes.len()),
//!     Err(e) => eprintln!("rejected: {e}"),
//! }
//! ```

// Core types
pub mod core;

pub use core::{CompressionMode, ReadError, Result, RowPolicy, Timestamped};

// Sensor calibration records
pub mod calibration;

pub use calibration::{CameraCalibration, ImuCalibration, ProjectionModel, RectificationModel};

// I/O: compression, parsers, artifact formats, reader facade
pub mod io;

pub use io::reader::{read_records, try_read_records, ReadOptions};

// Timestamp lookups
pub mod timeline;

pub use timeline::{TimeQuery, Timeline};

// Per-artifact entry points and records
pub use io::formats::eye_gaze::{eye_gaze_point_at_depth, read_eye_gaze, EyeGaze, EyeGazeSchema};
pub use io::formats::observations::{read_point_observations, PointObservation};
pub use io::formats::online_calibration::{read_online_calibration, OnlineCalibration};
pub use io::formats::point_cloud::{read_global_point_cloud, GlobalPoint};
pub use io::formats::static_camera::{read_static_camera_calibrations, StaticCameraCalibration};
pub use io::formats::trajectory::{
    read_closed_loop_trajectory, read_open_loop_trajectory, TrajectoryKind, TrajectoryPose,
};
