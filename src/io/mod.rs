// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer for machine-perception artifacts.
//!
//! Reading an artifact goes through three stages:
//! - [`compression`] opens the file as a decoded byte stream
//! - [`delimited`] or [`jsonl`] splits it into rows or JSON values
//! - [`formats`] maps each row to a typed record
//!
//! [`reader`] ties the stages together and applies the error policy.

pub mod compression;
pub mod delimited;
pub mod formats;
pub mod jsonl;

// Re-exports
pub use compression::{detect_compression, is_gzip_file, ByteSource};
pub use delimited::{ColumnSchema, DelimitedRows, HeaderIndex, Row};
pub use jsonl::{JsonLine, JsonLines};

// Reader facade
pub mod reader;
pub use reader::{read_records, try_read_records, ReadOptions};
