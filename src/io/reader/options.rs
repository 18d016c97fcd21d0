// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Options controlling a single read.
//!
//! `ReadOptions` is a small value type with a fluent API:
//!
//! ```rust
//! use mpsio::{CompressionMode, ReadOptions, RowPolicy};
//!
//! let options = ReadOptions::new()
//!     .compression(CompressionMode::Gzip)
//!     .row_policy(RowPolicy::Strict);
//! assert!(options.row_policy.is_strict());
//! ```
//!
//! It also derives serde traits so a host application can embed it in its
//! own configuration files.

use serde::{Deserialize, Serialize};

use crate::core::{CompressionMode, RowPolicy};

/// Configuration for one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// How the file is decompressed
    pub compression: CompressionMode,
    /// What happens to rows that fail validation
    pub row_policy: RowPolicy,
}

impl ReadOptions {
    /// Create options with the defaults: `Auto` compression, invalid rows skipped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression mode.
    pub fn compression(mut self, compression: CompressionMode) -> Self {
        self.compression = compression;
        self
    }

    /// Set the row policy.
    pub fn row_policy(mut self, row_policy: RowPolicy) -> Self {
        self.row_policy = row_policy;
        self
    }

    /// Shorthand for `row_policy(RowPolicy::Strict)`.
    pub fn strict(self) -> Self {
        self.row_policy(RowPolicy::Strict)
    }
}
