// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! 2D observations of global points (`semidense_observations.csv.gz`).
//!
//! Observations reference points by `uid` only. Joining them with the point
//! cloud is left to the caller.

use std::path::Path;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::core::{us_to_ns, CompressionMode, Result, Timestamped};
use crate::io::compression::ByteSource;
use crate::io::delimited::{ColumnSchema, HeaderIndex, Row};
use crate::io::reader::{read_records, ReadOptions};

use super::{delimited_records, ArtifactFormat, DelimitedAdapter, RecordStream};

/// Measurement of a global point in one camera frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointObservation {
    /// `uid` of the observed [`GlobalPoint`](super::point_cloud::GlobalPoint)
    pub point_uid: u64,
    /// Capture time of the observing frame, device time in microseconds
    pub frame_capture_timestamp_us: i64,
    /// Serial number of the observing camera
    pub camera_serial: String,
    /// Pixel coordinates of the observation
    pub uv: Vector2<f32>,
}

impl Timestamped for PointObservation {
    fn timestamp_ns(&self) -> i64 {
        us_to_ns(self.frame_capture_timestamp_us)
    }
}

/// Point observations artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointObservations;

impl DelimitedAdapter for PointObservations {
    type Record = PointObservation;
    type Layout = ();

    const SCHEMA: ColumnSchema = ColumnSchema {
        artifact: "point_observations",
        required: &["uid", "frame_tracking_timestamp_us", "camera_serial", "u", "v"],
        optional: &[],
    };

    fn layout(_header: &HeaderIndex) {}

    fn convert(_layout: &(), row: &Row) -> Result<PointObservation> {
        Ok(PointObservation {
            point_uid: row.required("uid")?,
            frame_capture_timestamp_us: row.required("frame_tracking_timestamp_us")?,
            camera_serial: row.required("camera_serial")?,
            uv: Vector2::new(row.required("u")?, row.required("v")?),
        })
    }
}

impl ArtifactFormat for PointObservations {
    type Record = PointObservation;
    const NAME: &'static str = "point_observations";

    fn records(source: ByteSource) -> Result<RecordStream<PointObservation>> {
        delimited_records::<Self, _>(source)
    }
}

/// Read point observations, plain or gzip compressed.
///
/// Returns an empty vector if the file is missing or unreadable.
pub fn read_point_observations<P: AsRef<Path>>(
    path: P,
    compression: CompressionMode,
) -> Vec<PointObservation> {
    read_records::<PointObservations, _>(path, &ReadOptions::new().compression(compression))
}
