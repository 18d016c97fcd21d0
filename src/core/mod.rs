// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout mpsio.
//!
//! This module provides the foundational types for the library:
//! - [`ReadError`] - Internal error handling
//! - [`CompressionMode`] - Stream compression selector
//! - [`RowPolicy`] - Handling of invalid rows
//! - [`Timestamped`] - Primary ordering key of a record

use serde::{Deserialize, Serialize};

pub mod error;

pub use error::{ReadError, Result};

/// Stream compression mode.
///
/// `Auto` inspects the file to pick between the concrete modes; explicit
/// modes are honored even when they do not match the file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMode {
    /// Detect from the gzip magic bytes, falling back to the file extension
    #[default]
    Auto,
    /// No compression
    None,
    /// GZIP compression
    Gzip,
}

/// Error returned when parsing a `CompressionMode` from string fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseCompressionModeError {
    _private: (),
}

impl std::fmt::Display for ParseCompressionModeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid compression mode, expected 'auto', 'none', or 'gzip'"
        )
    }
}

impl std::error::Error for ParseCompressionModeError {}

impl std::str::FromStr for CompressionMode {
    type Err = ParseCompressionModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(CompressionMode::Auto),
            "none" => Ok(CompressionMode::None),
            "gzip" | "gz" => Ok(CompressionMode::Gzip),
            _ => Err(ParseCompressionModeError { _private: () }),
        }
    }
}

impl CompressionMode {
    /// Check if this is the auto-detect sentinel.
    pub fn is_auto(&self) -> bool {
        matches!(self, CompressionMode::Auto)
    }

    /// Check if this mode reads the stream uncompressed.
    pub fn is_none(&self) -> bool {
        matches!(self, CompressionMode::None)
    }

    /// Check if this mode decompresses GZIP.
    pub fn is_gzip(&self) -> bool {
        matches!(self, CompressionMode::Gzip)
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionMode::Auto => "auto",
            CompressionMode::None => "none",
            CompressionMode::Gzip => "gzip",
        }
    }
}

/// What to do with a row that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    /// Skip the row and keep reading
    #[default]
    SkipInvalid,
    /// Abort the read on the first invalid row (the read yields nothing)
    Strict,
}

impl RowPolicy {
    /// Check if this policy aborts on invalid rows.
    pub fn is_strict(&self) -> bool {
        matches!(self, RowPolicy::Strict)
    }
}

/// A record carrying a device timestamp usable as its ordering key.
pub trait Timestamped {
    /// Device time of the record in nanoseconds.
    fn timestamp_ns(&self) -> i64;
}

/// Microseconds to nanoseconds.
pub(crate) const US_TO_NS: i64 = 1_000;

/// Convert a device time in microseconds to nanoseconds.
///
/// Saturates at the `i64` bounds, so out-of-range timestamps keep their order.
pub(crate) fn us_to_ns(timestamp_us: i64) -> i64 {
    timestamp_us.saturating_mul(US_TO_NS)
}
