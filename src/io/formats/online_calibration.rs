// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Online calibration snapshots (`online_calibration.jsonl`).
//!
//! One JSON object per line:
//!
//! ```text
//! {"tracking_timestamp_us": 1000, "utc_timestamp_ns": 1650000000000000000,
//!  "CameraCalibrations": [{...}, ...], "ImuCalibrations": [{...}, ...]}
//! ```
//!
//! Files written before June 2023 store the timestamps as strings and the two
//! calibration arrays as Python-repr strings (single quotes, `True`/`False`).
//! Such lines are detected by the type of `tracking_timestamp_us` and fixed
//! up before decoding, so both layouts yield the same record.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::calibration::{parse_camera_calibration, parse_imu_calibration};
use crate::calibration::{CameraCalibration, ImuCalibration};
use crate::core::{us_to_ns, CompressionMode, ReadError, Result, Timestamped};
use crate::io::compression::ByteSource;
use crate::io::jsonl::JsonLine;
use crate::io::reader::{read_records, ReadOptions};

use super::{json_lines_records, ArtifactFormat, JsonLinesAdapter, RecordStream};

const TRACKING_TIMESTAMP: &str = "tracking_timestamp_us";
const UTC_TIMESTAMP: &str = "utc_timestamp_ns";
const CAMERA_CALIBRATIONS: &str = "CameraCalibrations";
const IMU_CALIBRATIONS: &str = "ImuCalibrations";

/// Sensor calibration estimated at one capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnlineCalibration {
    /// Device time in microseconds
    pub tracking_timestamp_us: i64,
    /// UTC time in nanoseconds
    pub utc_timestamp_ns: i64,
    pub camera_calibs: Vec<CameraCalibration>,
    pub imu_calibs: Vec<ImuCalibration>,
}

impl OnlineCalibration {
    /// Find a camera calibration by label.
    pub fn camera(&self, label: &str) -> Option<&CameraCalibration> {
        self.camera_calibs.iter().find(|c| c.label == label)
    }

    /// Find an IMU calibration by label.
    pub fn imu(&self, label: &str) -> Option<&ImuCalibration> {
        self.imu_calibs.iter().find(|c| c.label == label)
    }
}

impl Timestamped for OnlineCalibration {
    fn timestamp_ns(&self) -> i64 {
        us_to_ns(self.tracking_timestamp_us)
    }
}

/// Layout of one online calibration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnlineCalibrationLayout {
    /// Pre June 2023: string timestamps, calibrations as Python-repr strings
    Legacy,
    /// Native JSON numbers and arrays
    Current,
}

impl OnlineCalibrationLayout {
    /// Detect the layout of a decoded line.
    pub fn detect(value: &Value) -> Self {
        if value.get(TRACKING_TIMESTAMP).is_some_and(Value::is_string) {
            OnlineCalibrationLayout::Legacy
        } else {
            OnlineCalibrationLayout::Current
        }
    }
}

/// Turn a Python-repr literal into JSON.
///
/// `True`/`False` become `true`/`false` and single quotes become double
/// quotes. Applied blindly, so a quote inside a string value is not
/// preserved.
pub fn fix_legacy_json(text: &str) -> String {
    text.replace("True", "true")
        .replace("False", "false")
        .replace('\'', "\"")
}

fn timestamp(line: u64, value: &Value, key: &str) -> Result<i64> {
    let parsed = match value.get(key) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ReadError::field(line, key, "missing or non-integer timestamp"))
}

/// The calibration array under `key`, decoding the legacy string form.
///
/// An absent key is an empty array.
fn calibration_array(line: u64, value: &Value, key: &str) -> Result<Vec<Value>> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(&fix_legacy_json(text)) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(_) => Err(ReadError::field(line, key, "expected an array")),
            Err(e) => Err(ReadError::field(line, key, format!("legacy encoding: {e}"))),
        },
        Some(_) => Err(ReadError::field(line, key, "expected an array")),
    }
}

/// Decode one online calibration from a JSON value of either layout.
pub fn parse_online_calibration(line: u64, value: &Value) -> Result<OnlineCalibration> {
    if !value.is_object() {
        return Err(ReadError::row(line, "expected a JSON object"));
    }

    let camera_calibs = calibration_array(line, value, CAMERA_CALIBRATIONS)?
        .iter()
        .map(|camera| {
            parse_camera_calibration(camera)
                .map_err(|e| ReadError::field(line, CAMERA_CALIBRATIONS, e))
        })
        .collect::<Result<Vec<_>>>()?;
    let imu_calibs = calibration_array(line, value, IMU_CALIBRATIONS)?
        .iter()
        .map(|imu| {
            parse_imu_calibration(imu).map_err(|e| ReadError::field(line, IMU_CALIBRATIONS, e))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(OnlineCalibration {
        tracking_timestamp_us: timestamp(line, value, TRACKING_TIMESTAMP)?,
        utc_timestamp_ns: timestamp(line, value, UTC_TIMESTAMP)?,
        camera_calibs,
        imu_calibs,
    })
}

/// Online calibration artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnlineCalibrations;

impl JsonLinesAdapter for OnlineCalibrations {
    type Record = OnlineCalibration;

    fn convert(line: &JsonLine) -> Result<OnlineCalibration> {
        if OnlineCalibrationLayout::detect(&line.value) == OnlineCalibrationLayout::Legacy {
            trace!(line = line.line, "Decoding legacy online calibration line");
        }
        parse_online_calibration(line.line, &line.value)
    }
}

impl ArtifactFormat for OnlineCalibrations {
    type Record = OnlineCalibration;
    const NAME: &'static str = "online_calibration";

    fn records(source: ByteSource) -> Result<RecordStream<OnlineCalibration>> {
        json_lines_records::<Self, _>(source)
    }
}

/// Read online calibrations in either layout.
///
/// Returns an empty vector if the file is missing or unreadable.
pub fn read_online_calibration<P: AsRef<Path>>(
    path: P,
    compression: CompressionMode,
) -> Vec<OnlineCalibration> {
    read_records::<OnlineCalibrations, _>(path, &ReadOptions::new().compression(compression))
}
