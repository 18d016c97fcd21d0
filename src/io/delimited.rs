// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Delimited-text (CSV) row parsing.
//!
//! The first non-empty line of the stream is the header. Columns are bound
//! by name through a [`HeaderIndex`] built once per read, so files carrying
//! extra columns, or a subset of the optional ones, parse the same way.
//!
//! Rows are produced lazily by [`DelimitedRows`]. A malformed row is
//! reported as a row-level [`ReadError::Row`]; the caller decides whether to
//! skip it or abort. Stream failures are file-level errors and end the
//! iteration.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::str::FromStr;
use std::sync::Arc;

use crate::core::{ReadError, Result};

/// The columns an artifact recognizes.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSchema {
    /// Artifact name used in errors and logs
    pub artifact: &'static str,
    /// Columns that must be present in the header
    pub required: &'static [&'static str],
    /// Columns that may be absent (older schema versions)
    pub optional: &'static [&'static str],
}

impl ColumnSchema {
    /// Iterate over every recognized column.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.required.iter().chain(self.optional.iter()).copied()
    }
}

/// Name to offset table for one file's header.
///
/// Only columns known to the [`ColumnSchema`] are indexed; anything else in
/// the header is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderIndex {
    offsets: HashMap<&'static str, usize>,
    width: usize,
}

impl HeaderIndex {
    /// Bind a header row against a schema.
    ///
    /// Fails with [`ReadError::Header`] when a required column is missing.
    pub fn bind<'a, I>(schema: &ColumnSchema, header: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<&str> = header.into_iter().map(str::trim).collect();

        let mut offsets = HashMap::new();
        for column in schema.columns() {
            if let Some(pos) = names.iter().position(|name| *name == column) {
                offsets.insert(column, pos);
            }
        }

        let missing: Vec<&str> = schema
            .required
            .iter()
            .filter(|c| !offsets.contains_key(**c))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(ReadError::header(schema.artifact, &missing));
        }

        Ok(Self {
            offsets,
            width: names.len(),
        })
    }

    /// Offset of a column, if present in the header.
    pub fn offset(&self, column: &str) -> Option<usize> {
        self.offsets.get(column).copied()
    }

    /// Whether the header carries the column.
    pub fn contains(&self, column: &str) -> bool {
        self.offsets.contains_key(column)
    }

    /// Number of fields in the header.
    pub fn width(&self) -> usize {
        self.width
    }
}

/// One data row, accessed by column name.
#[derive(Clone)]
pub struct Row {
    header: Arc<HeaderIndex>,
    record: csv::StringRecord,
    line: u64,
}

impl Row {
    /// 1-based line number of this row in the decoded stream.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The header this row was bound against.
    pub fn header(&self) -> &HeaderIndex {
        &self.header
    }

    /// Raw text of a field, `None` if the column is not in the header.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.header
            .offset(column)
            .and_then(|offset| self.record.get(offset))
    }

    /// Parse a field that must be present and non-empty.
    pub fn required<T>(&self, column: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.text(column) {
            None => Err(ReadError::field(self.line, column, "column not present")),
            Some("") => Err(ReadError::field(self.line, column, "empty field")),
            Some(text) => self.parse(column, text),
        }
    }

    /// Parse a field that may be absent from the header or left empty.
    pub fn optional<T>(&self, column: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.text(column) {
            None | Some("") => Ok(None),
            Some(text) => self.parse(column, text).map(Some),
        }
    }

    /// Text of a string column, empty when the column is absent.
    pub fn string(&self, column: &str) -> String {
        self.text(column).unwrap_or_default().to_string()
    }

    fn parse<T>(&self, column: &str, text: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        text.parse::<T>()
            .map_err(|e| ReadError::field(self.line, column, format!("'{text}': {e}")))
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("line", &self.line)
            .field("fields", &self.record)
            .finish()
    }
}

/// Lazy iterator over the data rows of a delimited stream.
pub struct DelimitedRows<R: Read> {
    reader: csv::Reader<R>,
    header: Option<Arc<HeaderIndex>>,
    record: csv::StringRecord,
    done: bool,
}

impl<R: Read> DelimitedRows<R> {
    /// Read the header from `source` and bind it against `schema`.
    ///
    /// An empty stream yields an iterator with no rows. A header that lacks
    /// required columns, or a stream that cannot be read, is an error.
    pub fn new(source: R, schema: &ColumnSchema) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        // Nothing can be bound without the header, so any failure is file level
        let headers = reader
            .headers()
            .map_err(|e| ReadError::io(format!("{} header", schema.artifact), e.to_string()))?
            .clone();
        let header = if headers.is_empty() {
            None
        } else {
            Some(Arc::new(HeaderIndex::bind(schema, headers.iter())?))
        };

        Ok(Self {
            reader,
            done: header.is_none(),
            header,
            record: csv::StringRecord::new(),
        })
    }

    /// The bound header, `None` for an empty stream.
    pub fn header(&self) -> Option<&HeaderIndex> {
        self.header.as_deref()
    }
}

impl<R: Read> Iterator for DelimitedRows<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let header = self.header.as_ref()?;

        match self.reader.read_record(&mut self.record) {
            Ok(false) => {
                self.done = true;
                None
            }
            Ok(true) => {
                let line = self.record.position().map(|p| p.line()).unwrap_or(0);
                if self.record.len() != header.width() {
                    return Some(Err(ReadError::row(
                        line,
                        format!(
                            "expected {} fields, found {}",
                            header.width(),
                            self.record.len()
                        ),
                    )));
                }
                Some(Ok(Row {
                    header: Arc::clone(header),
                    record: self.record.clone(),
                    line,
                }))
            }
            Err(e) => {
                let err = ReadError::from(e);
                if !err.is_row_level() {
                    self.done = true;
                }
                Some(Err(err))
            }
        }
    }
}
