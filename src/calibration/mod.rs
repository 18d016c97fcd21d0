// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Sensor calibration records.
//!
//! Camera and IMU calibrations appear inside online calibration snapshots.
//! The JSON layouts they are decoded from live in [`json`].

use nalgebra::{Isometry3, Matrix3, Vector3};
use serde::{Deserialize, Serialize};

pub mod json;

pub use json::{parse_camera_calibration, parse_imu_calibration};

/// Camera projection model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionModel {
    /// Fisheye with radial, tangential and thin-prism distortion (6-2-4 params)
    Fisheye624,
    /// Kannala-Brandt with 3 radial terms (OpenCV fisheye)
    KannalaBrandtK3,
}

impl ProjectionModel {
    /// Map the name used in calibration JSON to a model.
    pub fn from_json_name(name: &str) -> Option<Self> {
        match name {
            "FisheyeRadTanThinPrism" => Some(ProjectionModel::Fisheye624),
            "KannalaBrandtK3" => Some(ProjectionModel::KannalaBrandtK3),
            _ => None,
        }
    }

    /// Name of the model in calibration JSON.
    pub fn json_name(&self) -> &'static str {
        match self {
            ProjectionModel::Fisheye624 => "FisheyeRadTanThinPrism",
            ProjectionModel::KannalaBrandtK3 => "KannalaBrandtK3",
        }
    }
}

/// Intrinsic and extrinsic calibration of one camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraCalibration {
    /// Sensor label, e.g. `camera-slam-left`
    pub label: String,
    /// Camera serial number
    pub serial_number: String,
    /// Projection model
    pub projection: ProjectionModel,
    /// Projection parameters, layout defined by the model
    pub projection_params: Vec<f64>,
    /// Camera pose in the device frame
    pub transform_device_camera: Isometry3<f64>,
    /// Full resolution image width in pixels
    pub image_width: u32,
    /// Full resolution image height in pixels
    pub image_height: u32,
    /// Radius of the valid circular image region, if the sensor has one
    pub valid_radius: Option<f64>,
    /// Solid angle within which the projection stays monotonic
    pub max_solid_angle_rad: f64,
}

/// Affine rectification of a 3-axis sensor: `rectified = M^-1 * (raw - bias)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectificationModel {
    /// Rectification matrix `M`
    pub rectification: Matrix3<f64>,
    /// Bias offset
    pub bias: Vector3<f64>,
}

impl RectificationModel {
    /// Apply the model to a raw measurement.
    ///
    /// Returns `None` when the rectification matrix is singular.
    pub fn rectify(&self, raw: &Vector3<f64>) -> Option<Vector3<f64>> {
        self.rectification
            .try_inverse()
            .map(|inverse| inverse * (raw - self.bias))
    }
}

/// Calibration of one IMU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImuCalibration {
    /// Sensor label, e.g. `imu-left`
    pub label: String,
    /// Accelerometer model
    pub accelerometer: RectificationModel,
    /// Gyroscope model
    pub gyroscope: RectificationModel,
    /// IMU pose in the device frame
    pub transform_device_imu: Isometry3<f64>,
}
