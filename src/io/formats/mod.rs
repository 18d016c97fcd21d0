// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Artifact formats produced by machine-perception services.
//!
//! Each module owns one artifact: its record type, the columns or JSON
//! fields it recognizes, defaults for fields missing from older schema
//! versions, and its reader entry point:
//! - [`trajectory`]: open loop and closed loop device trajectories
//! - [`point_cloud`]: semi-dense global point cloud
//! - [`observations`]: 2D observations of global points
//! - [`online_calibration`]: per-frame online sensor calibration
//! - [`eye_gaze`]: eye gaze estimates
//! - [`static_camera`]: static camera calibrations

use std::io::Read;

use crate::core::Result;
use crate::io::compression::ByteSource;
use crate::io::delimited::{ColumnSchema, DelimitedRows, HeaderIndex, Row};
use crate::io::jsonl::{JsonLine, JsonLines};

pub mod eye_gaze;
pub mod observations;
pub mod online_calibration;
pub mod point_cloud;
pub mod static_camera;
pub mod trajectory;

/// Stream of records decoded from one artifact file.
pub type RecordStream<T> = Box<dyn Iterator<Item = Result<T>>>;

/// An artifact type the reader facade can load.
pub trait ArtifactFormat {
    /// Record produced for each row or line.
    type Record;

    /// Artifact name used in logs.
    const NAME: &'static str;

    /// Decode records from an opened source.
    ///
    /// File-level failures (unreadable stream, unrecognized header) are
    /// returned here or yielded by the stream; row-level failures are
    /// yielded per item.
    fn records(source: ByteSource) -> Result<RecordStream<Self::Record>>;
}

/// Adapter for artifacts stored as delimited text.
pub trait DelimitedAdapter {
    /// Record produced for each row.
    type Record;

    /// Schema variant resolved once from the header.
    type Layout;

    /// Columns recognized by this artifact.
    const SCHEMA: ColumnSchema;

    /// Resolve the schema variant of a file from its header.
    fn layout(header: &HeaderIndex) -> Self::Layout;

    /// Convert one row into a record.
    fn convert(layout: &Self::Layout, row: &Row) -> Result<Self::Record>;
}

/// Adapter for artifacts stored as line-delimited JSON.
pub trait JsonLinesAdapter {
    /// Record produced for each line.
    type Record;

    /// Convert one decoded line into a record.
    fn convert(line: &JsonLine) -> Result<Self::Record>;
}

/// Decode a delimited source through an adapter.
pub fn delimited_records<A, R>(source: R) -> Result<RecordStream<A::Record>>
where
    A: DelimitedAdapter,
    A::Record: 'static,
    A::Layout: 'static,
    R: Read + 'static,
{
    let rows = DelimitedRows::new(source, &A::SCHEMA)?;
    let layout = match rows.header() {
        Some(header) => A::layout(header),
        None => return Ok(Box::new(std::iter::empty())),
    };

    Ok(Box::new(rows.map(move |row| {
        row.and_then(|row| A::convert(&layout, &row))
    })))
}

/// Decode a line-delimited JSON source through an adapter.
pub fn json_lines_records<A, R>(source: R) -> Result<RecordStream<A::Record>>
where
    A: JsonLinesAdapter,
    A::Record: 'static,
    R: std::io::BufRead + 'static,
{
    Ok(Box::new(
        JsonLines::new(source).map(|line| line.and_then(|line| A::convert(&line))),
    ))
}
