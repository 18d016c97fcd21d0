// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Reader facade shared by every artifact.
//!
//! [`read_records`] is the single place where internal errors are turned into
//! the public contract: it always returns a `Vec`, empty when the file is
//! missing, unreadable, has an unrecognized header, or (under
//! [`RowPolicy::Strict`](crate::RowPolicy::Strict)) holds an invalid row.
//! [`try_read_records`] exposes the underlying [`ReadError`] for diagnostics.
//!
//! # Example
//!
//! ```rust,no_run
//! use mpsio::io::formats::point_cloud::GlobalPointCloud;
//! use mpsio::io::reader::{read_records, ReadOptions};
//! use mpsio::CompressionMode;
//!
//! let points = read_records::<GlobalPointCloud, _>(
//!     "global_points.csv.gz",
//!     &ReadOptions::new().compression(CompressionMode::Gzip),
//! );
//! println!("{} points", points.len());
//! ```

pub mod options;

pub use options::ReadOptions;

use std::path::Path;

use tracing::{debug, info, warn};

use crate::core::{ReadError, Result};
use crate::io::compression::ByteSource;
use crate::io::formats::ArtifactFormat;

/// Read every record of an artifact, surfacing file-level errors.
///
/// Row-level errors are skipped or escalated according to
/// `options.row_policy`. A missing file reads as empty.
pub fn try_read_records<A, P>(path: P, options: &ReadOptions) -> Result<Vec<A::Record>>
where
    A: ArtifactFormat,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let source = ByteSource::open(path, options.compression);
    if source.is_missing() {
        warn!(
            context = A::NAME,
            path = %path.display(),
            "File not found or not readable"
        );
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for item in A::records(source)? {
        match item {
            Ok(record) => records.push(record),
            Err(e) if e.is_row_level() => {
                if options.row_policy.is_strict() {
                    return Err(e.into_abort());
                }
                skipped += 1;
                debug!(context = A::NAME, error = %e, "Skipping invalid row");
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        context = A::NAME,
        path = %path.display(),
        records = records.len(),
        skipped,
        "Loaded records"
    );
    Ok(records)
}

/// Read every record of an artifact.
///
/// Never fails: any file-level error is logged and yields an empty vector.
pub fn read_records<A, P>(path: P, options: &ReadOptions) -> Vec<A::Record>
where
    A: ArtifactFormat,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    match try_read_records::<A, _>(path, options) {
        Ok(records) => records,
        Err(e) => {
            log_failure(A::NAME, path, &e);
            Vec::new()
        }
    }
}

fn log_failure(artifact: &'static str, path: &Path, error: &ReadError) {
    warn!(
        context = artifact,
        path = %path.display(),
        kind = error.kind(),
        error = %error,
        "Read failed, returning no records"
    );
}
