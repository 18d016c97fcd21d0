// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Open loop and closed loop device trajectories.
//!
//! Both variants are CSV files with one pose per row. They share the same
//! pose and dynamics columns, named after the frame the pose is expressed
//! in:
//!
//! | Variant | Pose frame | Frame id column | Example pose column |
//! |---|---|---|---|
//! | Open loop | odometry | `session_uid` | `tx_odometry_device` |
//! | Closed loop | world | `graph_uid` | `tx_world_device` |
//!
//! Open loop poses come from visual-inertial odometry: locally accurate,
//! drifting over time. Closed loop poses are bundle adjusted with loop
//! closures in a gravity aligned world frame.
//!
//! The variant is chosen by the entry point, never by the file content.

use std::path::Path;

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::calibration::json::unit_quaternion;
use crate::core::{us_to_ns, CompressionMode, ReadError, Result, Timestamped};
use crate::io::compression::ByteSource;
use crate::io::delimited::{ColumnSchema, HeaderIndex, Row};
use crate::io::reader::{read_records, ReadOptions};

use super::{delimited_records, ArtifactFormat, DelimitedAdapter, RecordStream};

/// Gravity assumed for files that predate the gravity columns.
pub const DEFAULT_GRAVITY: [f64; 3] = [0.0, 0.0, -9.81];

/// Quality assumed for files that predate the quality score column.
pub const DEFAULT_QUALITY_SCORE: f32 = 1.0;

/// Trajectory variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrajectoryKind {
    /// Odometry output, locally consistent, may drift
    OpenLoop,
    /// Loop closed, globally consistent
    ClosedLoop,
}

impl TrajectoryKind {
    /// Name of the frame poses are expressed in.
    pub fn frame_name(&self) -> &'static str {
        match self {
            TrajectoryKind::OpenLoop => "odometry",
            TrajectoryKind::ClosedLoop => "world",
        }
    }
}

/// A timestamped device pose with its dynamics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPose {
    /// Trajectory variant this pose belongs to
    pub kind: TrajectoryKind,
    /// Device time in microseconds
    pub tracking_timestamp_us: i64,
    /// UTC time in nanoseconds, 0 when unavailable
    pub utc_timestamp_ns: i64,
    /// Device pose in the trajectory frame (world or odometry)
    pub transform_frame_device: Isometry3<f64>,
    /// Linear velocity of the device (device frame for closed loop,
    /// odometry frame for open loop)
    pub device_linear_velocity: Vector3<f64>,
    /// Angular velocity of the device in the device frame
    pub angular_velocity_device: Vector3<f64>,
    /// Gravity vector in the trajectory frame, pointing toward the ground
    pub gravity: Vector3<f64>,
    /// Pose quality in [0, 1], higher is better
    pub quality_score: f32,
    /// Identifier of the trajectory frame: `graph_uid` for closed loop,
    /// `session_uid` for open loop. Poses sharing it share a frame.
    pub frame_uid: String,
}

impl TrajectoryPose {
    /// Device position in the trajectory frame.
    pub fn translation(&self) -> Vector3<f64> {
        self.transform_frame_device.translation.vector
    }

    /// Device orientation in the trajectory frame.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.transform_frame_device.rotation
    }
}

impl Timestamped for TrajectoryPose {
    fn timestamp_ns(&self) -> i64 {
        us_to_ns(self.tracking_timestamp_us)
    }
}

/// Column names of one trajectory variant.
struct PoseColumns {
    frame_uid: &'static str,
    translation: [&'static str; 3],
    /// `qx, qy, qz, qw`
    rotation: [&'static str; 4],
    linear_velocity: [&'static str; 3],
    angular_velocity: [&'static str; 3],
    gravity: [&'static str; 3],
}

const TRACKING_TIMESTAMP: &str = "tracking_timestamp_us";
const UTC_TIMESTAMP: &str = "utc_timestamp_ns";
const QUALITY_SCORE: &str = "quality_score";

const ANGULAR_VELOCITY_DEVICE: [&str; 3] = [
    "angular_velocity_x_device",
    "angular_velocity_y_device",
    "angular_velocity_z_device",
];

const OPEN_LOOP_COLUMNS: PoseColumns = PoseColumns {
    frame_uid: "session_uid",
    translation: [
        "tx_odometry_device",
        "ty_odometry_device",
        "tz_odometry_device",
    ],
    rotation: [
        "qx_odometry_device",
        "qy_odometry_device",
        "qz_odometry_device",
        "qw_odometry_device",
    ],
    linear_velocity: [
        "device_linear_velocity_x_odometry",
        "device_linear_velocity_y_odometry",
        "device_linear_velocity_z_odometry",
    ],
    angular_velocity: ANGULAR_VELOCITY_DEVICE,
    gravity: [
        "gravity_x_odometry",
        "gravity_y_odometry",
        "gravity_z_odometry",
    ],
};

const CLOSED_LOOP_COLUMNS: PoseColumns = PoseColumns {
    frame_uid: "graph_uid",
    translation: ["tx_world_device", "ty_world_device", "tz_world_device"],
    rotation: [
        "qx_world_device",
        "qy_world_device",
        "qz_world_device",
        "qw_world_device",
    ],
    linear_velocity: [
        "device_linear_velocity_x_device",
        "device_linear_velocity_y_device",
        "device_linear_velocity_z_device",
    ],
    angular_velocity: ANGULAR_VELOCITY_DEVICE,
    gravity: ["gravity_x_world", "gravity_y_world", "gravity_z_world"],
};

/// Read an optional 3-vector. All three columns absent or empty gives
/// `None`; a partially filled vector is a row error.
fn optional_vector3(row: &Row, columns: &[&'static str; 3]) -> Result<Option<Vector3<f64>>> {
    let x = row.optional::<f64>(columns[0])?;
    let y = row.optional::<f64>(columns[1])?;
    let z = row.optional::<f64>(columns[2])?;
    match (x, y, z) {
        (Some(x), Some(y), Some(z)) => Ok(Some(Vector3::new(x, y, z))),
        (None, None, None) => Ok(None),
        _ => Err(ReadError::field(
            row.line(),
            columns.join("/"),
            "incomplete vector",
        )),
    }
}

fn parse_pose(kind: TrajectoryKind, columns: &PoseColumns, row: &Row) -> Result<TrajectoryPose> {
    let [tx, ty, tz] = columns.translation;
    let translation = Translation3::new(
        row.required::<f64>(tx)?,
        row.required::<f64>(ty)?,
        row.required::<f64>(tz)?,
    );

    let [qx, qy, qz, qw] = columns.rotation;
    let rotation = unit_quaternion(
        row.required::<f64>(qw)?,
        row.required::<f64>(qx)?,
        row.required::<f64>(qy)?,
        row.required::<f64>(qz)?,
    )
    .ok_or_else(|| ReadError::row(row.line(), "degenerate rotation quaternion"))?;

    Ok(TrajectoryPose {
        kind,
        tracking_timestamp_us: row.required::<i64>(TRACKING_TIMESTAMP)?,
        utc_timestamp_ns: row.optional::<i64>(UTC_TIMESTAMP)?.unwrap_or(0),
        transform_frame_device: Isometry3::from_parts(translation, rotation),
        device_linear_velocity: optional_vector3(row, &columns.linear_velocity)?
            .unwrap_or_else(Vector3::zeros),
        angular_velocity_device: optional_vector3(row, &columns.angular_velocity)?
            .unwrap_or_else(Vector3::zeros),
        gravity: optional_vector3(row, &columns.gravity)?
            .unwrap_or_else(|| Vector3::from(DEFAULT_GRAVITY)),
        quality_score: row
            .optional::<f32>(QUALITY_SCORE)?
            .unwrap_or(DEFAULT_QUALITY_SCORE),
        frame_uid: row.string(columns.frame_uid),
    })
}

/// Open loop trajectory artifact (`open_loop_trajectory.csv`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenLoopTrajectory;

impl DelimitedAdapter for OpenLoopTrajectory {
    type Record = TrajectoryPose;
    type Layout = ();

    const SCHEMA: ColumnSchema = ColumnSchema {
        artifact: "open_loop_trajectory",
        required: &[
            TRACKING_TIMESTAMP,
            "tx_odometry_device",
            "ty_odometry_device",
            "tz_odometry_device",
            "qx_odometry_device",
            "qy_odometry_device",
            "qz_odometry_device",
            "qw_odometry_device",
        ],
        optional: &[
            UTC_TIMESTAMP,
            "session_uid",
            "device_linear_velocity_x_odometry",
            "device_linear_velocity_y_odometry",
            "device_linear_velocity_z_odometry",
            "angular_velocity_x_device",
            "angular_velocity_y_device",
            "angular_velocity_z_device",
            "gravity_x_odometry",
            "gravity_y_odometry",
            "gravity_z_odometry",
            QUALITY_SCORE,
        ],
    };

    fn layout(_header: &HeaderIndex) {}

    fn convert(_layout: &(), row: &Row) -> Result<TrajectoryPose> {
        parse_pose(TrajectoryKind::OpenLoop, &OPEN_LOOP_COLUMNS, row)
    }
}

impl ArtifactFormat for OpenLoopTrajectory {
    type Record = TrajectoryPose;
    const NAME: &'static str = "open_loop_trajectory";

    fn records(source: ByteSource) -> Result<RecordStream<TrajectoryPose>> {
        delimited_records::<Self, _>(source)
    }
}

/// Closed loop trajectory artifact (`closed_loop_trajectory.csv`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedLoopTrajectory;

impl DelimitedAdapter for ClosedLoopTrajectory {
    type Record = TrajectoryPose;
    type Layout = ();

    const SCHEMA: ColumnSchema = ColumnSchema {
        artifact: "closed_loop_trajectory",
        required: &[
            TRACKING_TIMESTAMP,
            "tx_world_device",
            "ty_world_device",
            "tz_world_device",
            "qx_world_device",
            "qy_world_device",
            "qz_world_device",
            "qw_world_device",
        ],
        optional: &[
            UTC_TIMESTAMP,
            "graph_uid",
            "device_linear_velocity_x_device",
            "device_linear_velocity_y_device",
            "device_linear_velocity_z_device",
            "angular_velocity_x_device",
            "angular_velocity_y_device",
            "angular_velocity_z_device",
            "gravity_x_world",
            "gravity_y_world",
            "gravity_z_world",
            QUALITY_SCORE,
        ],
    };

    fn layout(_header: &HeaderIndex) {}

    fn convert(_layout: &(), row: &Row) -> Result<TrajectoryPose> {
        parse_pose(TrajectoryKind::ClosedLoop, &CLOSED_LOOP_COLUMNS, row)
    }
}

impl ArtifactFormat for ClosedLoopTrajectory {
    type Record = TrajectoryPose;
    const NAME: &'static str = "closed_loop_trajectory";

    fn records(source: ByteSource) -> Result<RecordStream<TrajectoryPose>> {
        delimited_records::<Self, _>(source)
    }
}

/// Read an open loop trajectory.
///
/// Returns an empty vector if the file is missing or unreadable.
pub fn read_open_loop_trajectory<P: AsRef<Path>>(
    path: P,
    compression: CompressionMode,
) -> Vec<TrajectoryPose> {
    read_records::<OpenLoopTrajectory, _>(path, &ReadOptions::new().compression(compression))
}

/// Read a closed loop trajectory.
///
/// Returns an empty vector if the file is missing or unreadable.
pub fn read_closed_loop_trajectory<P: AsRef<Path>>(
    path: P,
    compression: CompressionMode,
) -> Vec<TrajectoryPose> {
    read_records::<ClosedLoopTrajectory, _>(path, &ReadOptions::new().compression(compression))
}
