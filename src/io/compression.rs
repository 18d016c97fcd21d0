// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Compression detection and decompressing byte sources.
//!
//! Point clouds and observations are usually shipped as `.csv.gz`, the
//! other artifacts as plain text. This module resolves the
//! [`CompressionMode`] for a file and opens a uniform buffered reader over
//! its decoded bytes.
//!
//! # Missing files
//!
//! Opening a path that does not exist or cannot be opened is not an error
//! here: the returned [`ByteSource`] is simply empty. The parsers above see
//! end of input immediately, and the read yields zero records.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::io::BufRead;
//! use mpsio::io::compression::ByteSource;
//! use mpsio::CompressionMode;
//!
//! let source = ByteSource::open("semidense_points.csv.gz", CompressionMode::Auto);
//! for line in source.lines() {
//!     println!("{}", line?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::core::CompressionMode;

/// GZIP member header magic.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

impl CompressionMode {
    /// Resolve `Auto` to a concrete mode for the given file.
    ///
    /// Explicit modes are returned unchanged. `Auto` checks the gzip magic
    /// bytes first, then falls back to the `.gz` extension when the file
    /// cannot be read.
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> CompressionMode {
        match self {
            CompressionMode::Auto => detect_compression(path.as_ref()),
            other => *other,
        }
    }
}

/// Detect the compression of a file from its content, then its extension.
pub fn detect_compression<P: AsRef<Path>>(path: P) -> CompressionMode {
    let path_ref = path.as_ref();

    match detect_from_magic(path_ref) {
        Ok(mode) => mode,
        // Unreadable file, the extension is all we have
        Err(_) => detect_from_extension(path_ref),
    }
}

/// Detect compression by reading the first bytes of the file.
fn detect_from_magic(path: &Path) -> io::Result<CompressionMode> {
    let mut file = File::open(path)?;

    let mut header = [0u8; 2];
    let mut filled = 0;
    while filled < header.len() {
        let n = file.read(&mut header[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    if filled == header.len() && header == GZIP_MAGIC {
        Ok(CompressionMode::Gzip)
    } else {
        Ok(CompressionMode::None)
    }
}

/// Detect compression from the file extension (fallback).
fn detect_from_extension(path: &Path) -> CompressionMode {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| match ext.to_lowercase().as_str() {
            "gz" | "gzip" => CompressionMode::Gzip,
            _ => CompressionMode::None,
        })
        .unwrap_or(CompressionMode::None)
}

/// Check if a file is likely gzip compressed.
pub fn is_gzip_file<P: AsRef<Path>>(path: P) -> bool {
    detect_compression(path).is_gzip()
}

/// A buffered reader over the decoded bytes of an artifact file.
///
/// The file handle and decoder are owned by the source and released when
/// it is dropped.
pub struct ByteSource {
    inner: Box<dyn BufRead + Send>,
    mode: CompressionMode,
    missing: bool,
}

impl ByteSource {
    /// Open a file with the given compression mode.
    ///
    /// Never fails: a file that cannot be opened produces an empty source
    /// (see [`ByteSource::is_missing`]).
    pub fn open<P: AsRef<Path>>(path: P, mode: CompressionMode) -> Self {
        let path_ref = path.as_ref();
        let mode = mode.resolve(path_ref);

        match File::open(path_ref) {
            Ok(file) => Self::from_reader(file, mode),
            Err(e) => {
                debug!(
                    context = "compression",
                    path = %path_ref.display(),
                    error = %e,
                    "Cannot open file, reading as empty"
                );
                Self {
                    inner: Box::new(io::empty()),
                    mode,
                    missing: true,
                }
            }
        }
    }

    /// Wrap an already opened reader.
    ///
    /// `Auto` cannot inspect an arbitrary reader and is treated as `None`.
    pub fn from_reader<R: Read + Send + 'static>(reader: R, mode: CompressionMode) -> Self {
        let (inner, mode): (Box<dyn BufRead + Send>, CompressionMode) = match mode {
            CompressionMode::Gzip => (
                Box::new(BufReader::new(MultiGzDecoder::new(reader))),
                CompressionMode::Gzip,
            ),
            CompressionMode::None | CompressionMode::Auto => {
                (Box::new(BufReader::new(reader)), CompressionMode::None)
            }
        };

        Self {
            inner,
            mode,
            missing: false,
        }
    }

    /// The concrete compression mode in use.
    pub fn mode(&self) -> CompressionMode {
        self.mode
    }

    /// Whether the file could not be opened.
    pub fn is_missing(&self) -> bool {
        self.missing
    }
}

impl Read for ByteSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for ByteSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

impl std::fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteSource")
            .field("mode", &self.mode)
            .field("missing", &self.missing)
            .finish()
    }
}
