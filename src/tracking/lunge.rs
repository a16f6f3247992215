// Lunge tracker - hysteresis rep counter on the leading leg
//
// Both legs are measured every frame; the leg with the smaller knee angle is
// the leading (front) leg and drives the rep state machine. Knee alignment is
// judged on the leading leg only, as the horizontal offset between knee and
// ankle in normalized image coordinates.

use crate::config::LungeConfig;
use crate::pose::geometry::joint_angle;
use crate::pose::{Landmark, PoseFrame};
use crate::tracking::{
    ExerciseTracker, FeedbackEvent, FeedbackGate, FeedbackKind, TrackerProgress, MSG_GOOD_FORM,
    MSG_NO_BODY_DETECTED, MSG_REP_COUNTED,
};

const MSG_GOING_DOWN: &str = "GOING DOWN";
const MSG_KNEE_ALIGNMENT: &str = "KNEE IN LINE WITH ANKLE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LungePhase {
    Up,
    Down,
}

#[derive(Debug)]
pub struct LungeTracker {
    config: LungeConfig,
    phase: LungePhase,
    reps: u32,
    gate: FeedbackGate,
}

impl LungeTracker {
    pub fn new(config: LungeConfig) -> Self {
        Self {
            config,
            phase: LungePhase::Up,
            reps: 0,
            gate: FeedbackGate::new(),
        }
    }

    pub fn rep_count(&self) -> u32 {
        self.reps
    }
}

impl ExerciseTracker for LungeTracker {
    fn advance(&mut self, frame: &PoseFrame) -> Option<FeedbackEvent> {
        let (
            Some(left_hip),
            Some(left_knee),
            Some(left_ankle),
            Some(right_hip),
            Some(right_knee),
            Some(right_ankle),
        ) = (
            frame.get(Landmark::LeftHip),
            frame.get(Landmark::LeftKnee),
            frame.get(Landmark::LeftAnkle),
            frame.get(Landmark::RightHip),
            frame.get(Landmark::RightKnee),
            frame.get(Landmark::RightAnkle),
        )
        else {
            return self.gate.emit(MSG_NO_BODY_DETECTED, FeedbackKind::Detection);
        };

        let left_angle = joint_angle(left_hip, left_knee, left_ankle);
        let right_angle = joint_angle(right_hip, right_knee, right_ankle);

        // leading leg: deeper bend
        let (front_angle, front_knee, front_ankle) = if left_angle <= right_angle {
            (left_angle, left_knee, left_ankle)
        } else {
            (right_angle, right_knee, right_ankle)
        };

        let knee_shift = (front_knee.x - front_ankle.x).abs();
        let (mut message, mut kind) = if knee_shift > self.config.knee_alignment_limit {
            (MSG_KNEE_ALIGNMENT, FeedbackKind::Form)
        } else {
            (MSG_GOOD_FORM, FeedbackKind::Form)
        };

        if front_angle < self.config.down_angle && self.phase == LungePhase::Up {
            self.phase = LungePhase::Down;
            message = MSG_GOING_DOWN;
            kind = FeedbackKind::Transition;
        }

        if front_angle > self.config.up_angle && self.phase == LungePhase::Down {
            self.phase = LungePhase::Up;
            self.reps += 1;
            message = MSG_REP_COUNTED;
            kind = FeedbackKind::RepCounted;
        }

        self.gate.emit(message, kind)
    }

    fn progress(&self) -> TrackerProgress {
        TrackerProgress::Reps(self.reps)
    }

    fn reset(&mut self) {
        self.phase = LungePhase::Up;
        self.reps = 0;
        self.gate.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::PoseFrameBuilder;

    fn frame(index: usize, left_knee: f32, right_knee: f32) -> PoseFrame {
        PoseFrameBuilder::new(index)
            .knee_angles(left_knee, right_knee)
            .build()
    }

    #[test]
    fn test_full_cycle_counts_one_rep() {
        let mut tracker = LungeTracker::new(LungeConfig::default());
        // front (left) leg bends past 95 then re-extends past 150
        let sequence = [(170.0, 170.0), (120.0, 160.0), (85.0, 160.0), (170.0, 170.0)];
        for (i, (l, r)) in sequence.iter().enumerate() {
            tracker.advance(&frame(i, *l, *r));
        }
        assert_eq!(tracker.rep_count(), 1);
    }

    #[test]
    fn test_shallow_lunge_counts_nothing() {
        let mut tracker = LungeTracker::new(LungeConfig::default());
        for (i, knee) in [170.0, 110.0, 170.0, 110.0, 170.0].iter().enumerate() {
            tracker.advance(&frame(i, *knee, 165.0));
        }
        assert_eq!(tracker.rep_count(), 0);
    }

    #[test]
    fn test_leading_leg_is_the_deeper_bend() {
        // right leg drives the rep while the left stays extended
        let mut tracker = LungeTracker::new(LungeConfig::default());
        let sequence = [(170.0, 170.0), (160.0, 85.0), (170.0, 170.0)];
        for (i, (l, r)) in sequence.iter().enumerate() {
            tracker.advance(&frame(i, *l, *r));
        }
        assert_eq!(tracker.rep_count(), 1);
    }

    #[test]
    fn test_going_down_message_on_descent() {
        let mut tracker = LungeTracker::new(LungeConfig::default());
        tracker.advance(&frame(0, 170.0, 170.0));
        let event = tracker.advance(&frame(1, 85.0, 160.0));
        assert_eq!(event.unwrap().message, MSG_GOING_DOWN);
    }

    #[test]
    fn test_knee_drift_prompts_alignment_cue() {
        let mut tracker = LungeTracker::new(LungeConfig::default());
        // a 120 degree bend pushes the leading knee well past the 0.04
        // horizontal limit without crossing the down threshold
        let drifted = frame(0, 120.0, 120.0);

        let event = tracker.advance(&drifted).unwrap();
        assert_eq!(event.message, MSG_KNEE_ALIGNMENT);
        assert_eq!(event.kind, FeedbackKind::Form);
        assert!(tracker.advance(&drifted).is_none());

        // an extended leg brings knee and ankle back in line
        let aligned = frame(2, 175.0, 175.0);
        let event = tracker.advance(&aligned).unwrap();
        assert_eq!(event.message, MSG_GOOD_FORM);
        assert_eq!(tracker.rep_count(), 0);
    }

    #[test]
    fn test_missing_landmarks_emit_detection_once() {
        let mut tracker = LungeTracker::new(LungeConfig::default());
        let first = tracker.advance(&PoseFrame::empty(0, 0));
        assert_eq!(first.unwrap().message, MSG_NO_BODY_DETECTED);
        assert!(tracker.advance(&PoseFrame::empty(1, 33)).is_none());
    }

    #[test]
    fn test_reset_clears_state() {
        let mut tracker = LungeTracker::new(LungeConfig::default());
        for (i, knee) in [170.0, 85.0, 170.0].iter().enumerate() {
            tracker.advance(&frame(i, *knee, 165.0));
        }
        assert_eq!(tracker.rep_count(), 1);
        tracker.reset();
        assert_eq!(tracker.progress(), TrackerProgress::Reps(0));
    }
}
