// Squat tracker - two-state hysteresis rep counter
//
// Drives on the left knee angle (hip-knee-ankle): falling below the down
// threshold enters the down phase, rising above the up threshold completes
// the rep. The gap between thresholds is the hysteresis band; an angle that
// never crosses both boundaries in order credits nothing. Back straightness
// (shoulder-hip-ankle) is assessed independently every frame and never
// affects the counter.

use crate::config::SquatConfig;
use crate::pose::geometry::joint_angle;
use crate::pose::{Landmark, PoseFrame};
use crate::tracking::{
    ExerciseTracker, FeedbackEvent, FeedbackGate, FeedbackKind, TrackerProgress, MSG_GOOD_FORM,
    MSG_NO_BODY_DETECTED, MSG_REP_COUNTED,
};

const MSG_DEPTH_REACHED: &str = "LOW ENOUGH - NOW STAND UP";
const MSG_KEEP_BACK_STRAIGHT: &str = "KEEP BACK STRAIGHT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SquatPhase {
    Up,
    Down,
}

#[derive(Debug)]
pub struct SquatTracker {
    config: SquatConfig,
    phase: SquatPhase,
    reps: u32,
    gate: FeedbackGate,
}

impl SquatTracker {
    pub fn new(config: SquatConfig) -> Self {
        Self {
            config,
            phase: SquatPhase::Up,
            reps: 0,
            gate: FeedbackGate::new(),
        }
    }

    pub fn rep_count(&self) -> u32 {
        self.reps
    }
}

impl ExerciseTracker for SquatTracker {
    fn advance(&mut self, frame: &PoseFrame) -> Option<FeedbackEvent> {
        let (Some(shoulder), Some(hip), Some(knee), Some(ankle)) = (
            frame.get(Landmark::LeftShoulder),
            frame.get(Landmark::LeftHip),
            frame.get(Landmark::LeftKnee),
            frame.get(Landmark::LeftAnkle),
        ) else {
            // keep counting state; detection may return next frame
            return self.gate.emit(MSG_NO_BODY_DETECTED, FeedbackKind::Detection);
        };

        let knee_angle = joint_angle(hip, knee, ankle);
        let back_angle = joint_angle(shoulder, hip, ankle);

        let (mut message, mut kind) = if back_angle < self.config.back_straight_angle {
            (MSG_KEEP_BACK_STRAIGHT, FeedbackKind::Form)
        } else {
            (MSG_GOOD_FORM, FeedbackKind::Form)
        };

        if knee_angle < self.config.down_angle && self.phase == SquatPhase::Up {
            self.phase = SquatPhase::Down;
            message = MSG_DEPTH_REACHED;
            kind = FeedbackKind::Transition;
        }

        if knee_angle > self.config.up_angle && self.phase == SquatPhase::Down {
            self.phase = SquatPhase::Up;
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
        self.phase = SquatPhase::Up;
        self.reps = 0;
        self.gate.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::PoseFrameBuilder;

    fn frame(index: usize, knee: f32) -> PoseFrame {
        PoseFrameBuilder::new(index).knee_angles(knee, knee).build()
    }

    fn drive(tracker: &mut SquatTracker, angles: &[f32]) -> Vec<FeedbackEvent> {
        angles
            .iter()
            .enumerate()
            .filter_map(|(i, &knee)| tracker.advance(&frame(i, knee)))
            .collect()
    }

    #[test]
    fn test_full_cycle_counts_one_rep() {
        let mut tracker = SquatTracker::new(SquatConfig::default());
        let events = drive(&mut tracker, &[175.0, 120.0, 80.0, 120.0, 175.0]);
        assert_eq!(tracker.rep_count(), 1);
        assert!(events.iter().any(|e| e.message == MSG_REP_COUNTED));
    }

    #[test]
    fn test_partial_descent_counts_nothing() {
        // drops to 100 (below neither threshold crossing order) and returns
        let mut tracker = SquatTracker::new(SquatConfig::default());
        drive(&mut tracker, &[175.0, 100.0, 175.0, 100.0, 175.0]);
        assert_eq!(tracker.rep_count(), 0);
    }

    #[test]
    fn test_hysteresis_band_oscillation_counts_nothing() {
        // oscillates around the band midpoint (90..160 -> 125) without
        // crossing either boundary
        let mut tracker = SquatTracker::new(SquatConfig::default());
        drive(&mut tracker, &[125.0, 130.0, 120.0, 130.0, 120.0, 125.0]);
        assert_eq!(tracker.rep_count(), 0);
    }

    #[test]
    fn test_down_without_return_counts_nothing() {
        let mut tracker = SquatTracker::new(SquatConfig::default());
        drive(&mut tracker, &[175.0, 80.0, 85.0, 80.0]);
        assert_eq!(tracker.rep_count(), 0);
    }

    #[test]
    fn test_three_reps() {
        let mut tracker = SquatTracker::new(SquatConfig::default());
        let mut angles = Vec::new();
        for _ in 0..3 {
            angles.extend_from_slice(&[175.0, 80.0, 175.0]);
        }
        drive(&mut tracker, &angles);
        assert_eq!(tracker.rep_count(), 3);
    }

    #[test]
    fn test_transition_messages_in_order() {
        let mut tracker = SquatTracker::new(SquatConfig::default());
        let events = drive(&mut tracker, &[175.0, 80.0, 175.0]);
        let messages: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();
        let depth_pos = messages.iter().position(|m| *m == MSG_DEPTH_REACHED);
        let rep_pos = messages.iter().position(|m| *m == MSG_REP_COUNTED);
        assert!(depth_pos.is_some());
        assert!(rep_pos.is_some());
        assert!(depth_pos < rep_pos);
    }

    #[test]
    fn test_bent_back_prompts_straightening_cue() {
        let mut tracker = SquatTracker::new(SquatConfig::default());
        // knees stay straight so no transition overrides the form message
        let bent = PoseFrameBuilder::new(0).hip_angles(120.0, 120.0).build();

        let event = tracker.advance(&bent).unwrap();
        assert_eq!(event.message, MSG_KEEP_BACK_STRAIGHT);
        assert_eq!(event.kind, FeedbackKind::Form);
        // the cue holds across frames without re-emitting
        assert!(tracker.advance(&bent).is_none());

        // straightening up switches back to the good-form message
        let upright = frame(2, 175.0);
        let event = tracker.advance(&upright).unwrap();
        assert_eq!(event.message, MSG_GOOD_FORM);
        assert_eq!(tracker.rep_count(), 0);
    }

    #[test]
    fn test_missing_landmarks_feedback_is_gated() {
        let mut tracker = SquatTracker::new(SquatConfig::default());
        let lost = PoseFrame::empty(0, 0);

        let first = tracker.advance(&lost);
        assert_eq!(first.unwrap().message, MSG_NO_BODY_DETECTED);
        // repeated loss stays silent
        assert!(tracker.advance(&PoseFrame::empty(1, 33)).is_none());
        assert!(tracker.advance(&PoseFrame::empty(2, 66)).is_none());
    }

    #[test]
    fn test_detection_loss_does_not_reset_rep_state() {
        let mut tracker = SquatTracker::new(SquatConfig::default());
        drive(&mut tracker, &[175.0, 80.0]);
        // lose the body mid-rep, then stand up
        tracker.advance(&PoseFrame::empty(2, 66));
        tracker.advance(&frame(3, 175.0));
        assert_eq!(tracker.rep_count(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut tracker = SquatTracker::new(SquatConfig::default());
        drive(&mut tracker, &[175.0, 80.0, 175.0]);
        assert_eq!(tracker.rep_count(), 1);
        tracker.reset();
        assert_eq!(tracker.rep_count(), 0);
        assert_eq!(tracker.progress(), TrackerProgress::Reps(0));
    }
}
