// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Line-delimited JSON parsing.
//!
//! Each non-empty line holds exactly one JSON value. Blank lines are ignored
//! wherever they appear; objects spanning several lines are not supported.

use std::io::BufRead;

use crate::core::{ReadError, Result};

/// One decoded line.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonLine {
    /// 1-based line number
    pub line: u64,
    /// Decoded value
    pub value: serde_json::Value,
}

/// Lazy iterator over the JSON values of a line-delimited stream.
///
/// A line that is not valid UTF-8 or not well-formed JSON yields a row-level
/// error and the iteration continues. A read failure yields a file-level
/// error and ends it.
pub struct JsonLines<R: BufRead> {
    reader: R,
    buf: Vec<u8>,
    line: u64,
    done: bool,
}

impl<R: BufRead> JsonLines<R> {
    /// Create a parser over a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(4096),
            line: 0,
            done: false,
        }
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> u64 {
        self.line
    }
}

impl<R: BufRead> Iterator for JsonLines<R> {
    type Item = Result<JsonLine>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line += 1;
                    let text = match std::str::from_utf8(&self.buf) {
                        Ok(text) => text.trim(),
                        Err(e) => {
                            return Some(Err(ReadError::row(
                                self.line,
                                format!("invalid UTF-8: {e}"),
                            )))
                        }
                    };
                    if text.is_empty() {
                        continue;
                    }
                    let parsed = serde_json::from_str(text)
                        .map(|value| JsonLine {
                            line: self.line,
                            value,
                        })
                        .map_err(|e| ReadError::row(self.line, format!("malformed JSON: {e}")));
                    return Some(parsed);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(ReadError::io("jsonl stream", e.to_string())));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(data: &str) -> Vec<Result<JsonLine>> {
        JsonLines::new(data.as_bytes()).collect()
    }

    #[test]
    fn test_one_value_per_line() {
        let lines = parse("{\"a\": 1}\n{\"a\": 2}\n");
        assert_eq!(lines.len(), 2);
        let second = lines[1].as_ref().unwrap();
        assert_eq!(second.line, 2);
        assert_eq!(second.value["a"], 2);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let lines = parse("\n{\"a\": 1}\n   \n{\"a\": 2}\n\n\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].as_ref().unwrap().line, 2);
        assert_eq!(lines[1].as_ref().unwrap().line, 4);
    }

    #[test]
    fn test_missing_trailing_newline() {
        let lines = parse("{\"a\": 1}");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_ok());
    }

    #[test]
    fn test_malformed_line_is_row_error() {
        let lines = parse("{\"a\": 1}\n{\"a\": \n{\"a\": 3}\n");
        assert_eq!(lines.len(), 3);
        let err = lines[1].as_ref().unwrap_err();
        assert!(err.is_row_level());
        assert!(matches!(err, ReadError::Row { line: 2, .. }));
        assert_eq!(lines[2].as_ref().unwrap().value["a"], 3);
    }

    #[test]
    fn test_crlf_line_endings() {
        let lines = parse("{\"a\": 1}\r\n{\"a\": 2}\r\n");
        assert!(lines.iter().all(|l| l.is_ok()));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_empty_stream() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_invalid_utf8_line_is_row_error() {
        let data: &[u8] = b"{\"a\": 1}\n\xff\xfe\n{\"a\": 3}\n";
        let lines: Vec<_> = JsonLines::new(data).collect();
        assert_eq!(lines.len(), 3);
        let err = lines[1].as_ref().unwrap_err();
        assert!(err.is_row_level());
        assert!(matches!(err, ReadError::Row { line: 2, .. }));
        assert_eq!(lines[2].as_ref().unwrap().value["a"], 3);
    }
}
