//! Synthetic pose fixtures
//!
//! Deterministic pose-frame builders used by unit tests, the integration
//! suite, and the CLI fixture generator. Frames are constructed geometrically
//! so that the requested joint angles fall out of the usual landmark math,
//! exercising the real angle computation instead of bypassing it.
//!
//! Coordinate convention matches the pose collaborator: normalized image
//! coordinates, +y downward.

use std::collections::HashMap;

use crate::pose::{Keypoint, Landmark, PoseFrame};

const HIP_Y: f32 = 0.5;
const LEFT_X: f32 = 0.45;
const RIGHT_X: f32 = 0.55;
const THIGH_LEN: f32 = 0.2;
const SHIN_LEN: f32 = 0.2;
const TORSO_LEN: f32 = 0.25;
const UPPER_ARM_LEN: f32 = 0.15;
const FOREARM_LEN: f32 = 0.15;

/// Builds a PoseFrame whose landmarks realize prescribed joint angles
///
/// Knee angle is the hip-knee-ankle angle, hip angle the shoulder-hip-knee
/// angle, elbow angle the shoulder-elbow-wrist angle. Unset angles default to
/// a near-straight standing pose.
#[derive(Debug, Clone)]
pub struct PoseFrameBuilder {
    frame_index: usize,
    timestamp_ms: u64,
    left_knee: f32,
    right_knee: f32,
    left_hip: f32,
    right_hip: f32,
    left_elbow: f32,
    right_elbow: f32,
    visibility: f32,
}

impl PoseFrameBuilder {
    pub fn new(frame_index: usize) -> Self {
        Self {
            frame_index,
            // 30 fps spacing unless overridden
            timestamp_ms: frame_index as u64 * 33,
            left_knee: 175.0,
            right_knee: 175.0,
            left_hip: 175.0,
            right_hip: 175.0,
            left_elbow: 170.0,
            right_elbow: 170.0,
            visibility: 1.0,
        }
    }

    pub fn timestamp_ms(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    pub fn knee_angles(mut self, left: f32, right: f32) -> Self {
        self.left_knee = left;
        self.right_knee = right;
        self
    }

    pub fn hip_angles(mut self, left: f32, right: f32) -> Self {
        self.left_hip = left;
        self.right_hip = right;
        self
    }

    pub fn elbow_angles(mut self, left: f32, right: f32) -> Self {
        self.left_elbow = left;
        self.right_elbow = right;
        self
    }

    pub fn visibility(mut self, visibility: f32) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn build(self) -> PoseFrame {
        let mut landmarks = HashMap::new();
        self.build_side(
            &mut landmarks,
            LEFT_X,
            self.left_knee,
            self.left_hip,
            self.left_elbow,
            Landmark::LeftShoulder,
            Landmark::LeftElbow,
            Landmark::LeftWrist,
            Landmark::LeftHip,
            Landmark::LeftKnee,
            Landmark::LeftAnkle,
        );
        self.build_side(
            &mut landmarks,
            RIGHT_X,
            self.right_knee,
            self.right_hip,
            self.right_elbow,
            Landmark::RightShoulder,
            Landmark::RightElbow,
            Landmark::RightWrist,
            Landmark::RightHip,
            Landmark::RightKnee,
            Landmark::RightAnkle,
        );

        PoseFrame {
            frame_index: self.frame_index,
            timestamp_ms: self.timestamp_ms,
            landmarks,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build_side(
        &self,
        landmarks: &mut HashMap<Landmark, Keypoint>,
        hip_x: f32,
        knee_angle: f32,
        hip_angle: f32,
        elbow_angle: f32,
        shoulder_lm: Landmark,
        elbow_lm: Landmark,
        wrist_lm: Landmark,
        hip_lm: Landmark,
        knee_lm: Landmark,
        ankle_lm: Landmark,
    ) {
        let hip = (hip_x, HIP_Y);
        let knee = (hip.0, hip.1 + THIGH_LEN);

        // ankle placed so that the hip-knee-ankle angle equals knee_angle
        let (ksin, kcos) = knee_angle.to_radians().sin_cos();
        let ankle = (knee.0 + SHIN_LEN * ksin, knee.1 - SHIN_LEN * kcos);

        // shoulder placed so that the shoulder-hip-knee angle equals hip_angle
        let (hsin, hcos) = hip_angle.to_radians().sin_cos();
        let shoulder = (hip.0 + TORSO_LEN * hsin, hip.1 + TORSO_LEN * hcos);

        let elbow = (shoulder.0, shoulder.1 + UPPER_ARM_LEN);
        let (esin, ecos) = elbow_angle.to_radians().sin_cos();
        let wrist = (elbow.0 + FOREARM_LEN * esin, elbow.1 - FOREARM_LEN * ecos);

        for (lm, (x, y)) in [
            (shoulder_lm, shoulder),
            (elbow_lm, elbow),
            (wrist_lm, wrist),
            (hip_lm, hip),
            (knee_lm, knee),
            (ankle_lm, ankle),
        ] {
            landmarks.insert(lm, Keypoint::new(x, y).with_visibility(self.visibility));
        }
    }
}

/// Generate a squat session: `reps` full down-then-up cycles
///
/// Each phase (standing, descending, bottom, ascending) lasts
/// `frames_per_phase` frames; knee angles sweep between a 175° stand and an
/// 80° bottom so both hysteresis thresholds are crossed every cycle.
pub fn squat_rep_frames(reps: usize, frames_per_phase: usize) -> Vec<PoseFrame> {
    let mut frames = Vec::new();
    let mut index = 0;
    let mut push = |frames: &mut Vec<PoseFrame>, knee: f32| {
        frames.push(
            PoseFrameBuilder::new(index)
                .knee_angles(knee, knee)
                .build(),
        );
        index += 1;
    };

    for _ in 0..reps {
        for _ in 0..frames_per_phase {
            push(&mut frames, 175.0);
        }
        for _ in 0..frames_per_phase {
            push(&mut frames, 120.0);
        }
        for _ in 0..frames_per_phase {
            push(&mut frames, 80.0);
        }
        for _ in 0..frames_per_phase {
            push(&mut frames, 120.0);
        }
    }
    for _ in 0..frames_per_phase {
        push(&mut frames, 175.0);
    }
    frames
}

/// Generate a shallow squat session that never reaches proper depth
///
/// Knee angles bottom out at `bottom_knee` (e.g. 120°), producing
/// insufficient-depth issues when scored.
pub fn shallow_squat_frames(cycles: usize, bottom_knee: f32) -> Vec<PoseFrame> {
    let mut frames = Vec::new();
    let mut index = 0;
    for _ in 0..cycles {
        for knee in [175.0, 150.0, bottom_knee, 150.0] {
            frames.push(
                PoseFrameBuilder::new(index)
                    .knee_angles(knee, knee)
                    .build(),
            );
            index += 1;
        }
    }
    frames
}
