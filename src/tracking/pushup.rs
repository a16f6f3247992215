// Push-up tracker - three-state rep counter with a readiness gate
//
// Unlike the squat and lunge the counter only runs once the athlete has
// assumed a valid plank: straight back and extended elbows. From there a
// single elbow-angle threshold drives the state machine in both directions.
// Losing track of the body drops back to the readiness gate rather than
// crediting a half-finished rep.

use crate::config::PushupConfig;
use crate::pose::geometry::joint_angle;
use crate::pose::{Landmark, PoseFrame};
use crate::tracking::{
    ExerciseTracker, FeedbackEvent, FeedbackGate, FeedbackKind, TrackerProgress, MSG_GOOD_FORM,
    MSG_NO_BODY_DETECTED, MSG_REP_COUNTED,
};

const MSG_GET_READY: &str = "GET INTO PLANK POSITION";
const MSG_TUCK_ELBOWS: &str = "TUCK ELBOWS";

const VISIBILITY_JOINTS: [Landmark; 6] = [
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftElbow,
    Landmark::RightElbow,
    Landmark::LeftHip,
    Landmark::RightHip,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PushupPhase {
    GetReady,
    Ready,
    Down,
}

#[derive(Debug)]
pub struct PushupTracker {
    config: PushupConfig,
    phase: PushupPhase,
    reps: u32,
    gate: FeedbackGate,
}

struct PushupAngles {
    elbow: f32,
    back: f32,
    left_tuck: f32,
    right_tuck: f32,
}

impl PushupTracker {
    pub fn new(config: PushupConfig) -> Self {
        Self {
            config,
            phase: PushupPhase::GetReady,
            reps: 0,
            gate: FeedbackGate::new(),
        }
    }

    pub fn rep_count(&self) -> u32 {
        self.reps
    }

    fn measure(&self, frame: &PoseFrame) -> Option<PushupAngles> {
        if !frame.all_visible(&VISIBILITY_JOINTS, self.config.visibility_threshold) {
            return None;
        }
        let left_shoulder = frame.get(Landmark::LeftShoulder)?;
        let right_shoulder = frame.get(Landmark::RightShoulder)?;
        let left_elbow = frame.get(Landmark::LeftElbow)?;
        let right_elbow = frame.get(Landmark::RightElbow)?;
        let left_wrist = frame.get(Landmark::LeftWrist)?;
        let right_wrist = frame.get(Landmark::RightWrist)?;
        let left_hip = frame.get(Landmark::LeftHip)?;
        let right_hip = frame.get(Landmark::RightHip)?;
        let left_ankle = frame.get(Landmark::LeftAnkle)?;
        let right_ankle = frame.get(Landmark::RightAnkle)?;

        let elbow = (joint_angle(left_shoulder, left_elbow, left_wrist)
            + joint_angle(right_shoulder, right_elbow, right_wrist))
            / 2.0;
        let back = (joint_angle(left_shoulder, left_hip, left_ankle)
            + joint_angle(right_shoulder, right_hip, right_ankle))
            / 2.0;
        let left_tuck = joint_angle(left_hip, left_shoulder, left_elbow);
        let right_tuck = joint_angle(right_hip, right_shoulder, right_elbow);

        Some(PushupAngles {
            elbow,
            back,
            left_tuck,
            right_tuck,
        })
    }
}

impl ExerciseTracker for PushupTracker {
    fn advance(&mut self, frame: &PoseFrame) -> Option<FeedbackEvent> {
        let Some(angles) = self.measure(frame) else {
            // mid-rep tracking loss invalidates the rep in progress
            self.phase = PushupPhase::GetReady;
            return self.gate.emit(MSG_NO_BODY_DETECTED, FeedbackKind::Detection);
        };

        let form = if angles.left_tuck > self.config.elbow_tuck_angle
            || angles.right_tuck > self.config.elbow_tuck_angle
        {
            MSG_TUCK_ELBOWS
        } else {
            MSG_GOOD_FORM
        };

        let (message, kind) = match self.phase {
            PushupPhase::GetReady => {
                if angles.back > self.config.back_straight_angle
                    && angles.elbow > self.config.elbow_extended_angle
                {
                    self.phase = PushupPhase::Ready;
                    (form, FeedbackKind::Form)
                } else {
                    (MSG_GET_READY, FeedbackKind::Transition)
                }
            }
            PushupPhase::Ready => {
                if angles.elbow < self.config.elbow_extended_angle {
                    self.phase = PushupPhase::Down;
                }
                (form, FeedbackKind::Form)
            }
            PushupPhase::Down => {
                if angles.elbow > self.config.elbow_extended_angle {
                    self.phase = PushupPhase::Ready;
                    self.reps += 1;
                    (MSG_REP_COUNTED, FeedbackKind::RepCounted)
                } else {
                    (form, FeedbackKind::Form)
                }
            }
        };

        self.gate.emit(message, kind)
    }

    fn progress(&self) -> TrackerProgress {
        TrackerProgress::Reps(self.reps)
    }

    fn reset(&mut self) {
        self.phase = PushupPhase::GetReady;
        self.reps = 0;
        self.gate.reset();
    }
}
