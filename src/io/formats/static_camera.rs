// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Static camera calibrations (`static_cam_calibs.csv`).
//!
//! Each row places an external, stationary camera in a world frame. The
//! optional frame range bounds the part of the video the pose applies to;
//! without it the pose holds for the whole video.

use std::path::Path;

use nalgebra::{Isometry3, Translation3};
use serde::{Deserialize, Serialize};

use crate::calibration::json::unit_quaternion;
use crate::core::{CompressionMode, ReadError, Result};
use crate::io::compression::ByteSource;
use crate::io::delimited::{ColumnSchema, HeaderIndex, Row};
use crate::io::reader::{read_records, ReadOptions};

use super::{delimited_records, ArtifactFormat, DelimitedAdapter, RecordStream};

/// Number of intrinsic parameters of the supported model (`fx, fy, cx, cy, k0..k3`).
pub const INTRINSICS_COUNT: usize = 8;

const INTRINSICS: [&str; INTRINSICS_COUNT] = [
    "intrinsics_0",
    "intrinsics_1",
    "intrinsics_2",
    "intrinsics_3",
    "intrinsics_4",
    "intrinsics_5",
    "intrinsics_6",
    "intrinsics_7",
];

/// Pose and intrinsics of one static camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticCameraCalibration {
    /// Camera identifier, typically the path of its video file
    pub camera_uid: String,
    /// World frame the pose is expressed in
    pub graph_uid: String,
    /// Camera pose in the world frame
    pub transform_world_camera: Isometry3<f64>,
    pub width: u32,
    pub height: u32,
    /// Intrinsics model name, e.g. `KANNALABRANDTK3`
    pub intrinsics_type: String,
    pub intrinsics: Vec<f32>,
    /// First video frame the pose applies to
    pub start_frame_idx: Option<i64>,
    /// Last video frame the pose applies to
    pub end_frame_idx: Option<i64>,
}

impl StaticCameraCalibration {
    /// Whether the pose applies to a video frame.
    pub fn covers_frame(&self, frame_idx: i64) -> bool {
        self.start_frame_idx.map_or(true, |start| frame_idx >= start)
            && self.end_frame_idx.map_or(true, |end| frame_idx <= end)
    }
}

/// Static camera calibration artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCameraCalibrations;

impl DelimitedAdapter for StaticCameraCalibrations {
    type Record = StaticCameraCalibration;
    type Layout = ();

    const SCHEMA: ColumnSchema = ColumnSchema {
        artifact: "static_camera_calibration",
        required: &[
            "cam_uid",
            "graph_uid",
            "tx_world_cam",
            "ty_world_cam",
            "tz_world_cam",
            "qx_world_cam",
            "qy_world_cam",
            "qz_world_cam",
            "qw_world_cam",
            "image_width",
            "image_height",
            "intrinsics_type",
            "intrinsics_0",
            "intrinsics_1",
            "intrinsics_2",
            "intrinsics_3",
            "intrinsics_4",
            "intrinsics_5",
            "intrinsics_6",
            "intrinsics_7",
        ],
        optional: &["start_frame_idx", "end_frame_idx"],
    };

    fn layout(_header: &HeaderIndex) {}

    fn convert(_layout: &(), row: &Row) -> Result<StaticCameraCalibration> {
        let translation = Translation3::new(
            row.required("tx_world_cam")?,
            row.required("ty_world_cam")?,
            row.required("tz_world_cam")?,
        );
        let rotation = unit_quaternion(
            row.required("qw_world_cam")?,
            row.required("qx_world_cam")?,
            row.required("qy_world_cam")?,
            row.required("qz_world_cam")?,
        )
        .ok_or_else(|| ReadError::row(row.line(), "degenerate rotation quaternion"))?;

        let intrinsics = INTRINSICS
            .iter()
            .map(|column| row.required::<f32>(column))
            .collect::<Result<Vec<_>>>()?;

        Ok(StaticCameraCalibration {
            camera_uid: row.required("cam_uid")?,
            graph_uid: row.string("graph_uid"),
            transform_world_camera: Isometry3::from_parts(translation, rotation),
            width: row.required("image_width")?,
            height: row.required("image_height")?,
            intrinsics_type: row.required("intrinsics_type")?,
            intrinsics,
            start_frame_idx: row.optional("start_frame_idx")?,
            end_frame_idx: row.optional("end_frame_idx")?,
        })
    }
}

impl ArtifactFormat for StaticCameraCalibrations {
    type Record = StaticCameraCalibration;
    const NAME: &'static str = "static_camera_calibration";

    fn records(source: ByteSource) -> Result<RecordStream<StaticCameraCalibration>> {
        delimited_records::<Self, _>(source)
    }
}

/// Read static camera calibrations.
///
/// Returns an empty vector if the file is missing or unreadable.
pub fn read_static_camera_calibrations<P: AsRef<Path>>(
    path: P,
    compression: CompressionMode,
) -> Vec<StaticCameraCalibration> {
    read_records::<StaticCameraCalibrations, _>(path, &ReadOptions::new().compression(compression))
}
