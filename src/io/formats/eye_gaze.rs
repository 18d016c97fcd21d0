// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Eye gaze estimates (`general_eye_gaze.csv`, `personalized_eye_gaze.csv`).
//!
//! Two header variants exist. Older files carry only the gaze columns;
//! newer ones add a `session_uid` column. The variant is resolved once from
//! the header into an [`EyeGazeSchema`], and legacy records get an empty
//! `session_uid`.
//!
//! Angles are in radians in the central pupil frame (CPF): yaw rotates about
//! the vertical axis, pitch about the horizontal one.

use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::core::{us_to_ns, CompressionMode, Result, Timestamped};
use crate::io::compression::ByteSource;
use crate::io::delimited::{ColumnSchema, HeaderIndex, Row};
use crate::io::reader::{read_records, ReadOptions};

use super::{delimited_records, ArtifactFormat, DelimitedAdapter, RecordStream};

const SESSION_UID: &str = "session_uid";

/// Header variant of an eye gaze file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EyeGazeSchema {
    /// Gaze columns only
    Legacy,
    /// Gaze columns plus `session_uid`
    WithSessionUid,
}

impl EyeGazeSchema {
    /// Resolve the variant of a bound header.
    pub fn from_header(header: &HeaderIndex) -> Self {
        if header.contains(SESSION_UID) {
            EyeGazeSchema::WithSessionUid
        } else {
            EyeGazeSchema::Legacy
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, EyeGazeSchema::Legacy)
    }
}

/// One eye gaze estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EyeGaze {
    /// Device time in microseconds
    pub tracking_timestamp_us: i64,
    pub yaw: f32,
    pub pitch: f32,
    /// Distance to the fixation point in meters, 0 when unavailable
    pub depth: f32,
    /// Lower bound of the yaw confidence interval
    pub yaw_low: f32,
    /// Upper bound of the yaw confidence interval
    pub yaw_high: f32,
    /// Lower bound of the pitch confidence interval
    pub pitch_low: f32,
    /// Upper bound of the pitch confidence interval
    pub pitch_high: f32,
    /// Capture session identifier, empty for legacy files
    pub session_uid: String,
}

impl EyeGaze {
    /// Whether a depth estimate is available.
    pub fn has_depth(&self) -> bool {
        self.depth > 0.0
    }

    /// Gaze point in CPF at the estimated depth.
    ///
    /// `None` when no depth is available.
    pub fn point_at_depth(&self) -> Option<Vector3<f64>> {
        self.has_depth()
            .then(|| eye_gaze_point_at_depth(self.yaw, self.pitch, self.depth))
    }
}

impl Timestamped for EyeGaze {
    fn timestamp_ns(&self) -> i64 {
        us_to_ns(self.tracking_timestamp_us)
    }
}

/// Point in CPF along a gaze direction at `depth` meters.
///
/// The point is `(tan(yaw) * depth, tan(pitch) * depth, depth)`.
pub fn eye_gaze_point_at_depth(yaw: f32, pitch: f32, depth: f32) -> Vector3<f64> {
    let depth = f64::from(depth);
    Vector3::new(
        f64::from(yaw).tan() * depth,
        f64::from(pitch).tan() * depth,
        depth,
    )
}

/// Eye gaze artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct EyeGazes;

impl DelimitedAdapter for EyeGazes {
    type Record = EyeGaze;
    type Layout = EyeGazeSchema;

    const SCHEMA: ColumnSchema = ColumnSchema {
        artifact: "eye_gaze",
        required: &[
            "tracking_timestamp_us",
            "yaw_rads_cpf",
            "pitch_rads_cpf",
            "depth_m",
            "yaw_low_rads_cpf",
            "pitch_low_rads_cpf",
            "yaw_high_rads_cpf",
            "pitch_high_rads_cpf",
        ],
        optional: &[SESSION_UID],
    };

    fn layout(header: &HeaderIndex) -> EyeGazeSchema {
        EyeGazeSchema::from_header(header)
    }

    fn convert(schema: &EyeGazeSchema, row: &Row) -> Result<EyeGaze> {
        let session_uid = match schema {
            EyeGazeSchema::Legacy => String::new(),
            EyeGazeSchema::WithSessionUid => row.string(SESSION_UID),
        };
        Ok(EyeGaze {
            tracking_timestamp_us: row.required("tracking_timestamp_us")?,
            yaw: row.required("yaw_rads_cpf")?,
            pitch: row.required("pitch_rads_cpf")?,
            depth: row.required("depth_m")?,
            yaw_low: row.required("yaw_low_rads_cpf")?,
            yaw_high: row.required("yaw_high_rads_cpf")?,
            pitch_low: row.required("pitch_low_rads_cpf")?,
            pitch_high: row.required("pitch_high_rads_cpf")?,
            session_uid,
        })
    }
}

impl ArtifactFormat for EyeGazes {
    type Record = EyeGaze;
    const NAME: &'static str = "eye_gaze";

    fn records(source: ByteSource) -> Result<RecordStream<EyeGaze>> {
        delimited_records::<Self, _>(source)
    }
}

/// Read eye gaze estimates from either header variant.
///
/// Returns an empty vector if the file is missing or unreadable.
pub fn read_eye_gaze<P: AsRef<Path>>(path: P, compression: CompressionMode) -> Vec<EyeGaze> {
    read_records::<EyeGazes, _>(path, &ReadOptions::new().compression(compression))
}
