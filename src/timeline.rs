// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Lookup of records by device timestamp.
//!
//! A [`Timeline`] sorts a record sequence once by
//! [`Timestamped::timestamp_ns`] and answers queries with a binary search.
//!
//! ```rust
//! use mpsio::timeline::{TimeQuery, Timeline};
//! use mpsio::Timestamped;
//!
//! struct Sample(i64);
//! impl Timestamped for Sample {
//!     fn timestamp_ns(&self) -> i64 {
//!         self.0
//!     }
//! }
//!
//! let timeline = Timeline::new(vec![Sample(10), Sample(20), Sample(30)]);
//! assert_eq!(timeline.get(19, TimeQuery::Closest).map(|s| s.0), Some(20));
//! assert_eq!(timeline.get(19, TimeQuery::Before).map(|s| s.0), Some(10));
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::Timestamped;

/// How a timestamp query picks a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeQuery {
    /// Last record at or before the query time
    #[default]
    Before,
    /// First record at or after the query time
    After,
    /// Record nearest to the query time; ties go to the earlier one
    Closest,
}

/// Error returned when parsing a `TimeQuery` from string fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseTimeQueryError {
    _private: (),
}

impl std::fmt::Display for ParseTimeQueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("invalid time query (expected before, after or closest)")
    }
}

impl std::error::Error for ParseTimeQueryError {}

impl FromStr for TimeQuery {
    type Err = ParseTimeQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "before" => Ok(TimeQuery::Before),
            "after" => Ok(TimeQuery::After),
            "closest" => Ok(TimeQuery::Closest),
            _ => Err(ParseTimeQueryError { _private: () }),
        }
    }
}

/// Records sorted by timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<T> {
    records: Vec<T>,
}

impl<T: Timestamped> Timeline<T> {
    /// Build a timeline. The sort is stable, so records sharing a timestamp
    /// keep their input order.
    pub fn new(mut records: Vec<T>) -> Self {
        records.sort_by_key(Timestamped::timestamp_ns);
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    /// Timestamp of the first record.
    pub fn start_ns(&self) -> Option<i64> {
        self.records.first().map(Timestamped::timestamp_ns)
    }

    /// Timestamp of the last record.
    pub fn end_ns(&self) -> Option<i64> {
        self.records.last().map(Timestamped::timestamp_ns)
    }

    /// Index of the record matching a query, if any.
    pub fn index_of(&self, timestamp_ns: i64, query: TimeQuery) -> Option<usize> {
        let lower = self
            .records
            .partition_point(|r| r.timestamp_ns() < timestamp_ns);
        let upper = self
            .records
            .partition_point(|r| r.timestamp_ns() <= timestamp_ns);
        let before = upper.checked_sub(1);
        let after = (lower < self.records.len()).then_some(lower);

        match query {
            TimeQuery::Before => before,
            TimeQuery::After => after,
            TimeQuery::Closest => match (before, after) {
                (Some(b), Some(a)) => {
                    let to_before = timestamp_ns.abs_diff(self.records[b].timestamp_ns());
                    let to_after = self.records[a].timestamp_ns().abs_diff(timestamp_ns);
                    Some(if to_after < to_before { a } else { b })
                }
                (b, a) => b.or(a),
            },
        }
    }

    /// Record matching a query, if any.
    pub fn get(&self, timestamp_ns: i64, query: TimeQuery) -> Option<&T> {
        self.index_of(timestamp_ns, query)
            .map(|index| &self.records[index])
    }

    /// Records with `start_ns <= timestamp < end_ns`.
    pub fn range(&self, start_ns: i64, end_ns: i64) -> &[T] {
        let lo = self.records.partition_point(|r| r.timestamp_ns() < start_ns);
        let hi = self.records.partition_point(|r| r.timestamp_ns() < end_ns);
        if lo >= hi {
            &[]
        } else {
            &self.records[lo..hi]
        }
    }
}

impl<T: Timestamped> From<Vec<T>> for Timeline<T> {
    fn from(records: Vec<T>) -> Self {
        Self::new(records)
    }
}

impl<T: Timestamped> FromIterator<T> for Timeline<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
