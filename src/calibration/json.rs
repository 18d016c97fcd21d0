// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decoding of camera and IMU calibrations from JSON.
//!
//! Layouts follow the device calibration files:
//!
//! ```text
//! {"Label": "camera-slam-left", "SerialNumber": "...",
//!  "Projection": {"Name": "FisheyeRadTanThinPrism", "Params": [...]},
//!  "T_Device_Camera": {"Translation": [x, y, z], "UnitQuaternion": [w, [x, y, z]]}}
//!
//! {"Label": "imu-left",
//!  "Accelerometer": {"Model": {"RectificationMatrix": [[...], [...], [...]]},
//!                    "Bias": {"Offset": [x, y, z]}},
//!  "Gyroscope": {...}, "T_Device_Imu": {...}}
//! ```
//!
//! Keys not listed above are ignored.

use nalgebra::{Isometry3, Matrix3, Quaternion, Translation3, UnitQuaternion, Vector3};
use serde::Deserialize;

use super::{CameraCalibration, ImuCalibration, ProjectionModel, RectificationModel};

/// Resolution and projection limits tied to a camera label.
struct CameraSensorSpec {
    width: u32,
    height: u32,
    valid_radius: Option<f64>,
    max_solid_angle_rad: f64,
}

const SLAM_VALID_RADIUS: f64 = 330.0;
const RGB_VALID_RADIUS: f64 = 1415.0;

const SLAM_MAX_SOLID_ANGLE_RAD: f64 = 1.4;
const RGB_MAX_SOLID_ANGLE_RAD: f64 = 1.0;
const ET_MAX_SOLID_ANGLE_RAD: f64 = 0.75;

fn camera_sensor_spec(label: &str) -> Option<CameraSensorSpec> {
    match label {
        "camera-rgb" => Some(CameraSensorSpec {
            width: 2880,
            height: 2880,
            valid_radius: Some(RGB_VALID_RADIUS),
            max_solid_angle_rad: RGB_MAX_SOLID_ANGLE_RAD,
        }),
        "camera-slam-left" | "camera-slam-right" => Some(CameraSensorSpec {
            width: 640,
            height: 480,
            valid_radius: Some(SLAM_VALID_RADIUS),
            max_solid_angle_rad: SLAM_MAX_SOLID_ANGLE_RAD,
        }),
        "camera-et-left" | "camera-et-right" => Some(CameraSensorSpec {
            width: 640,
            height: 480,
            valid_radius: None,
            max_solid_angle_rad: ET_MAX_SOLID_ANGLE_RAD,
        }),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct Se3Json {
    #[serde(rename = "Translation")]
    translation: [f64; 3],
    #[serde(rename = "UnitQuaternion")]
    unit_quaternion: (f64, [f64; 3]),
}

impl Se3Json {
    fn to_isometry(&self) -> Result<Isometry3<f64>, String> {
        let (w, [x, y, z]) = self.unit_quaternion;
        let rotation = unit_quaternion(w, x, y, z)
            .ok_or_else(|| "degenerate UnitQuaternion".to_string())?;
        let [tx, ty, tz] = self.translation;
        Ok(Isometry3::from_parts(Translation3::new(tx, ty, tz), rotation))
    }
}

#[derive(Debug, Deserialize)]
struct ProjectionJson {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Params")]
    params: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct CameraJson {
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "SerialNumber", default)]
    serial_number: String,
    #[serde(rename = "Projection")]
    projection: ProjectionJson,
    #[serde(rename = "T_Device_Camera")]
    transform_device_camera: Se3Json,
}

#[derive(Debug, Deserialize)]
struct RectModelJson {
    #[serde(rename = "Model")]
    model: RectMatrixJson,
    #[serde(rename = "Bias")]
    bias: BiasJson,
}

#[derive(Debug, Deserialize)]
struct RectMatrixJson {
    #[serde(rename = "RectificationMatrix")]
    rectification_matrix: [[f64; 3]; 3],
}

#[derive(Debug, Deserialize)]
struct BiasJson {
    #[serde(rename = "Offset")]
    offset: [f64; 3],
}

impl From<RectModelJson> for RectificationModel {
    fn from(json: RectModelJson) -> Self {
        let m = json.model.rectification_matrix;
        RectificationModel {
            rectification: Matrix3::new(
                m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
            ),
            bias: Vector3::from(json.bias.offset),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImuJson {
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "Accelerometer")]
    accelerometer: RectModelJson,
    #[serde(rename = "Gyroscope")]
    gyroscope: RectModelJson,
    #[serde(rename = "T_Device_Imu")]
    transform_device_imu: Se3Json,
}

/// Build a unit quaternion from `w, x, y, z`, normalizing it.
///
/// Returns `None` for a zero or non-finite quaternion.
pub(crate) fn unit_quaternion(w: f64, x: f64, y: f64, z: f64) -> Option<UnitQuaternion<f64>> {
    let q = Quaternion::new(w, x, y, z);
    let norm = q.norm();
    if !norm.is_finite() || norm < f64::EPSILON {
        return None;
    }
    Some(UnitQuaternion::from_quaternion(q))
}

/// Decode a camera calibration.
///
/// Fails on a missing key, an unknown projection model or an unknown
/// camera label.
pub fn parse_camera_calibration(value: &serde_json::Value) -> Result<CameraCalibration, String> {
    let json = CameraJson::deserialize(value).map_err(|e| format!("camera calibration: {e}"))?;

    let projection = ProjectionModel::from_json_name(&json.projection.name)
        .ok_or_else(|| format!("unknown projection model '{}'", json.projection.name))?;
    let spec = camera_sensor_spec(&json.label)
        .ok_or_else(|| format!("unrecognized camera label '{}'", json.label))?;
    let transform_device_camera = json
        .transform_device_camera
        .to_isometry()
        .map_err(|e| format!("T_Device_Camera of '{}': {e}", json.label))?;

    Ok(CameraCalibration {
        label: json.label,
        serial_number: json.serial_number,
        projection,
        projection_params: json.projection.params,
        transform_device_camera,
        image_width: spec.width,
        image_height: spec.height,
        valid_radius: spec.valid_radius,
        max_solid_angle_rad: spec.max_solid_angle_rad,
    })
}

/// Decode an IMU calibration.
pub fn parse_imu_calibration(value: &serde_json::Value) -> Result<ImuCalibration, String> {
    let json = ImuJson::deserialize(value).map_err(|e| format!("IMU calibration: {e}"))?;

    let transform_device_imu = json
        .transform_device_imu
        .to_isometry()
        .map_err(|e| format!("T_Device_Imu of '{}': {e}", json.label))?;

    Ok(ImuCalibration {
        label: json.label,
        accelerometer: json.accelerometer.into(),
        gyroscope: json.gyroscope.into(),
        transform_device_imu,
    })
}
