// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Semi-dense global point cloud (`global_points.csv.gz`).

use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::core::{CompressionMode, Result};
use crate::io::compression::ByteSource;
use crate::io::delimited::{ColumnSchema, HeaderIndex, Row};
use crate::io::reader::{read_records, ReadOptions};

use super::{delimited_records, ArtifactFormat, DelimitedAdapter, RecordStream};

/// A 3D landmark in the world frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalPoint {
    /// Point identifier, referenced by [`PointObservation`](super::observations::PointObservation)
    pub uid: u64,
    /// World frame this point belongs to
    pub graph_uid: String,
    /// Position in the world frame, meters
    pub position_world: Vector3<f64>,
    /// Standard deviation of the inverse distance estimate
    pub inverse_distance_std: f32,
    /// Standard deviation of the distance estimate, meters
    pub distance_std: f32,
}

/// Global point cloud artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalPointCloud;

impl DelimitedAdapter for GlobalPointCloud {
    type Record = GlobalPoint;
    type Layout = ();

    const SCHEMA: ColumnSchema = ColumnSchema {
        artifact: "global_point_cloud",
        required: &["uid", "px_world", "py_world", "pz_world"],
        optional: &["graph_uid", "inv_dist_std", "dist_std"],
    };

    fn layout(_header: &HeaderIndex) {}

    fn convert(_layout: &(), row: &Row) -> Result<GlobalPoint> {
        Ok(GlobalPoint {
            uid: row.required("uid")?,
            graph_uid: row.string("graph_uid"),
            position_world: Vector3::new(
                row.required("px_world")?,
                row.required("py_world")?,
                row.required("pz_world")?,
            ),
            inverse_distance_std: row.optional("inv_dist_std")?.unwrap_or(0.0),
            distance_std: row.optional("dist_std")?.unwrap_or(0.0),
        })
    }
}

impl ArtifactFormat for GlobalPointCloud {
    type Record = GlobalPoint;
    const NAME: &'static str = "global_point_cloud";

    fn records(source: ByteSource) -> Result<RecordStream<GlobalPoint>> {
        delimited_records::<Self, _>(source)
    }
}

/// Read a global point cloud, plain or gzip compressed.
///
/// Returns an empty vector if the file is missing or unreadable.
pub fn read_global_point_cloud<P: AsRef<Path>>(
    path: P,
    compression: CompressionMode,
) -> Vec<GlobalPoint> {
    read_records::<GlobalPointCloud, _>(path, &ReadOptions::new().compression(compression))
}
