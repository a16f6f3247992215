// Plank tracker - hold-duration accrual instead of rep counting
//
// Time is taken from frame timestamps, never the wall clock, so replaying a
// recorded session yields the same hold duration every run. A hold segment
// opens when the back straightens past the threshold and closes when form
// breaks or the body is lost; progress reports accumulated time plus the
// open segment measured against the latest frame seen.

use crate::config::PlankConfig;
use crate::pose::geometry::joint_angle;
use crate::pose::{Landmark, PoseFrame};
use crate::tracking::{
    ExerciseTracker, FeedbackEvent, FeedbackGate, FeedbackKind, TrackerProgress,
    MSG_NO_BODY_DETECTED,
};

const MSG_HOLDING: &str = "HOLD - GOOD FORM";
const MSG_CORRECT_FORM: &str = "CORRECT YOUR FORM";

#[derive(Debug)]
pub struct PlankTracker {
    config: PlankConfig,
    holding: bool,
    hold_start_ms: u64,
    accumulated_ms: u64,
    last_timestamp_ms: u64,
    gate: FeedbackGate,
}

impl PlankTracker {
    pub fn new(config: PlankConfig) -> Self {
        Self {
            config,
            holding: false,
            hold_start_ms: 0,
            accumulated_ms: 0,
            last_timestamp_ms: 0,
            gate: FeedbackGate::new(),
        }
    }

    /// Total hold time in milliseconds as of `now_ms`, including the
    /// segment still open.
    pub fn total_hold_ms(&self, now_ms: u64) -> u64 {
        let open = if self.holding {
            now_ms.saturating_sub(self.hold_start_ms)
        } else {
            0
        };
        self.accumulated_ms + open
    }

    fn close_segment(&mut self, at_ms: u64) {
        if self.holding {
            self.accumulated_ms += at_ms.saturating_sub(self.hold_start_ms);
            self.holding = false;
        }
    }
}

impl ExerciseTracker for PlankTracker {
    fn advance(&mut self, frame: &PoseFrame) -> Option<FeedbackEvent> {
        self.last_timestamp_ms = frame.timestamp_ms;

        let (Some(shoulder), Some(hip), Some(ankle)) = (
            frame.get(Landmark::LeftShoulder),
            frame.get(Landmark::LeftHip),
            frame.get(Landmark::LeftAnkle),
        ) else {
            self.close_segment(frame.timestamp_ms);
            return self.gate.emit(MSG_NO_BODY_DETECTED, FeedbackKind::Detection);
        };

        let back_angle = joint_angle(shoulder, hip, ankle);

        if back_angle > self.config.back_straight_min_angle {
            if !self.holding {
                self.holding = true;
                self.hold_start_ms = frame.timestamp_ms;
            }
            self.gate.emit(MSG_HOLDING, FeedbackKind::Form)
        } else {
            self.close_segment(frame.timestamp_ms);
            self.gate.emit(MSG_CORRECT_FORM, FeedbackKind::Form)
        }
    }

    fn progress(&self) -> TrackerProgress {
        TrackerProgress::HoldMs(self.total_hold_ms(self.last_timestamp_ms))
    }

    fn reset(&mut self) {
        self.holding = false;
        self.hold_start_ms = 0;
        self.accumulated_ms = 0;
        self.last_timestamp_ms = 0;
        self.gate.reset();
    }
}
