// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common fixtures for integration tests.
//!
//! Every fixture is written into a fresh temporary directory owned by a
//! [`Fixtures`] value and removed when it is dropped.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

// ============================================================================
// Sample artifacts
// ============================================================================

pub const CLOSED_LOOP_TRAJECTORY: &str = "\
graph_uid,tracking_timestamp_us,utc_timestamp_ns,tx_world_device,ty_world_device,tz_world_device,qx_world_device,qy_world_device,qz_world_device,qw_world_device,device_linear_velocity_x_device,device_linear_velocity_y_device,device_linear_velocity_z_device,angular_velocity_x_device,angular_velocity_y_device,angular_velocity_z_device,gravity_x_world,gravity_y_world,gravity_z_world,quality_score
g0,1000,1650000000000000000,0.0,0.0,0.0,0,0,0,1,0,0,0,0,0,0,0,0,-9.81,1.0
g0,2000,1650000000001000000,0.1,0.0,0.0,0,0,0,1,0.1,0,0,0,0,0,0,0,-9.81,1.0
g0,3000,1650000000002000000,0.2,0.0,0.0,0,0,0,1,0.1,0,0,0,0,0,0,0,-9.81,0.95
";

pub const OPEN_LOOP_TRAJECTORY: &str = "\
tracking_timestamp_us,utc_timestamp_ns,session_uid,tx_odometry_device,ty_odometry_device,tz_odometry_device,qx_odometry_device,qy_odometry_device,qz_odometry_device,qw_odometry_device,device_linear_velocity_x_odometry,device_linear_velocity_y_odometry,device_linear_velocity_z_odometry,angular_velocity_x_device,angular_velocity_y_device,angular_velocity_z_device,gravity_x_odometry,gravity_y_odometry,gravity_z_odometry,quality_score
1000,1650000000000000000,s0,0.0,0.0,0.0,0,0,0,1,0,0,0,0,0,0,0,0,-9.81,1.0
2000,1650000000001000000,s0,0.0,0.1,0.0,0,0,0,1,0,0.1,0,0,0,0,0,0,-9.81,1.0
";

pub const GLOBAL_POINTS: &str = "\
uid,graph_uid,px_world,py_world,pz_world,inv_dist_std,dist_std
10,g0,1.0,2.0,3.0,0.001,0.01
11,g0,-1.0,0.5,2.5,0.002,0.02
12,g0,0.0,0.0,4.0,0.003,0.03
";

pub const POINT_OBSERVATIONS: &str = "\
uid,frame_tracking_timestamp_us,camera_serial,u,v
10,1000,0072510f1b0c0901,320.0,240.0
11,1000,0072510f1b0c0901,100.5,80.25
10,2000,0072510f1b0c0902,310.0,238.0
";

pub const EYE_GAZE_LEGACY: &str = "\
tracking_timestamp_us,yaw_rads_cpf,pitch_rads_cpf,depth_m,yaw_low_rads_cpf,pitch_low_rads_cpf,yaw_high_rads_cpf,pitch_high_rads_cpf
1000,0.10,-0.05,0.0,0.08,-0.07,0.12,-0.03
2000,0.11,-0.04,0.0,0.09,-0.06,0.13,-0.02
";

pub const EYE_GAZE_WITH_SESSION: &str = "\
tracking_timestamp_us,yaw_rads_cpf,pitch_rads_cpf,depth_m,yaw_low_rads_cpf,pitch_low_rads_cpf,yaw_high_rads_cpf,pitch_high_rads_cpf,session_uid
1000,0.10,-0.05,0.8,0.08,-0.07,0.12,-0.03,3b9f0c2e
2000,0.11,-0.04,0.9,0.09,-0.06,0.13,-0.02,3b9f0c2e
";

pub const STATIC_CAMERAS: &str = "\
cam_uid,graph_uid,tx_world_cam,ty_world_cam,tz_world_cam,qx_world_cam,qy_world_cam,qz_world_cam,qw_world_cam,image_width,image_height,intrinsics_type,intrinsics_0,intrinsics_1,intrinsics_2,intrinsics_3,intrinsics_4,intrinsics_5,intrinsics_6,intrinsics_7,start_frame_idx,end_frame_idx
video0.mp4,g0,1,0,2,0,0,0,1,1920,1080,KANNALABRANDTK3,700,700,960,540,0.1,0.01,0.001,0.0001,,
video1.mp4,g0,0,1,2,0,0,0,1,1920,1080,KANNALABRANDTK3,710,710,955,545,0.1,0.01,0.001,0.0001,30,900
";

fn se3_identity() -> serde_json::Value {
    serde_json::json!({"Translation": [0.0, 0.0, 0.0], "UnitQuaternion": [1.0, [0.0, 0.0, 0.0]]})
}

fn camera_json(label: &str) -> serde_json::Value {
    serde_json::json!({
        "Label": label,
        "SerialNumber": "0072510f1b0c0901",
        "Projection": {
            "Name": "FisheyeRadTanThinPrism",
            "Params": [241.2, 320.0, 240.0, 0.1, -0.02, 0.003, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        },
        "T_Device_Camera": se3_identity(),
        "Calibrated": true
    })
}

fn imu_json(label: &str) -> serde_json::Value {
    serde_json::json!({
        "Label": label,
        "Accelerometer": {
            "Model": {"RectificationMatrix": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]},
            "Bias": {"Offset": [0.01, -0.02, 0.03]}
        },
        "Gyroscope": {
            "Model": {"RectificationMatrix": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]},
            "Bias": {"Offset": [0.0, 0.0, 0.0]}
        },
        "T_Device_Imu": se3_identity()
    })
}

/// One online calibration line in the current layout.
pub fn online_calibration_line(tracking_timestamp_us: i64) -> String {
    serde_json::json!({
        "tracking_timestamp_us": tracking_timestamp_us,
        "utc_timestamp_ns": 1_650_000_000_000_000_000i64 + tracking_timestamp_us * 1000,
        "CameraCalibrations": [camera_json("camera-slam-left"), camera_json("camera-slam-right")],
        "ImuCalibrations": [imu_json("imu-left"), imu_json("imu-right")]
    })
    .to_string()
}

/// The same calibration in the pre June 2023 layout.
pub fn legacy_online_calibration_line(tracking_timestamp_us: i64) -> String {
    let python_repr = |value: serde_json::Value| {
        value
            .to_string()
            .replace('"', "'")
            .replace("true", "True")
            .replace("false", "False")
    };
    serde_json::json!({
        "tracking_timestamp_us": tracking_timestamp_us.to_string(),
        "utc_timestamp_ns": (1_650_000_000_000_000_000i64 + tracking_timestamp_us * 1000).to_string(),
        "CameraCalibrations": python_repr(serde_json::json!([
            camera_json("camera-slam-left"),
            camera_json("camera-slam-right")
        ])),
        "ImuCalibrations": python_repr(serde_json::json!([imu_json("imu-left"), imu_json("imu-right")]))
    })
    .to_string()
}

/// A few current-layout calibration lines separated by blank lines.
pub fn online_calibrations() -> String {
    [1000, 2000, 3000]
        .iter()
        .map(|ts| online_calibration_line(*ts))
        .collect::<Vec<_>>()
        .join("\n\n")
        + "\n"
}

// ============================================================================
// Fixture directory
// ============================================================================

/// Temporary directory holding generated artifacts.
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create fixture dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a plain text file.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        let mut file = File::create(&path).expect("create fixture");
        file.write_all(content.as_bytes()).expect("write fixture");
        path
    }

    /// Write a gzip compressed file.
    pub fn write_gz(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        write_gzip(&path, content.as_bytes());
        path
    }
}

impl Default for Fixtures {
    fn default() -> Self {
        Self::new()
    }
}

/// Gzip `data` into a file at `path`.
pub fn write_gzip(path: &Path, data: &[u8]) {
    let file = File::create(path).expect("create gzip fixture");
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(data).expect("write gzip fixture");
    encoder.finish().expect("finish gzip fixture");
}
