// Pose module - boundary types for the pose-estimation collaborator
//
// The pose estimator (MediaPipe or equivalent) runs outside this crate and
// hands over one PoseFrame per video frame: named landmarks in normalized
// image coordinates plus a per-joint visibility score. Everything downstream
// (sampling, tracking, scoring) consumes these types and nothing else.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub mod geometry;

/// Named body joints tracked by the pipeline.
///
/// The set covers the joints needed for knee/hip/elbow/back angle
/// computation. Keys serialize as snake_case strings (`left_knee`) to match
/// the recorded-session JSON format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

/// One detected landmark position in normalized image coordinates
///
/// `x` and `y` are in [0, 1] relative to frame width/height; `z` is the
/// estimator's relative depth (unused by the 2-D angle math but carried
/// through for consumers that want it). `visibility` is the estimator's
/// per-joint confidence in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default = "default_visibility")]
    pub visibility: f32,
}

fn default_visibility() -> f32 {
    1.0
}

impl Keypoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: 1.0,
        }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = visibility;
        self
    }
}

/// One frame of pose-estimation output
///
/// `landmarks` may be empty (nothing detected) or partial (occluded joints
/// missing). Downstream code treats missing required joints as a detection
/// failure for that frame, never as a fatal error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Index of the frame in the source video/stream
    pub frame_index: usize,
    /// Milliseconds since the start of the session
    pub timestamp_ms: u64,
    /// Detected landmarks; absent entries mean the joint was not found
    #[serde(default)]
    pub landmarks: HashMap<Landmark, Keypoint>,
}

impl PoseFrame {
    /// Create an empty frame (no detection)
    pub fn empty(frame_index: usize, timestamp_ms: u64) -> Self {
        Self {
            frame_index,
            timestamp_ms,
            landmarks: HashMap::new(),
        }
    }

    pub fn get(&self, landmark: Landmark) -> Option<&Keypoint> {
        self.landmarks.get(&landmark)
    }

    /// Fetch a landmark only if it was detected with sufficient confidence
    pub fn visible(&self, landmark: Landmark, threshold: f32) -> Option<&Keypoint> {
        self.landmarks
            .get(&landmark)
            .filter(|kp| kp.visibility >= threshold)
    }

    /// True when every listed joint is present above the visibility threshold
    pub fn all_visible(&self, landmarks: &[Landmark], threshold: f32) -> bool {
        landmarks
            .iter()
            .all(|lm| self.visible(*lm, threshold).is_some())
    }
}
