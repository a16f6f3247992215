// Tracking module - live exercise state machines
//
// One tracker per exercise family, each a finite-state automaton driven by
// per-frame joint angles with hysteresis thresholds where the motion calls
// for them. Trackers are strictly single-owner: one frame is processed to
// completion (new state + at most one feedback event) before the next is
// accepted, and nothing is shared between sessions.
//
// Feedback de-duplication is session-scoped: a tracker never re-emits the
// message it emitted last, no matter how many frames repeat it.

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::pose::PoseFrame;

pub mod lunge;
pub mod plank;
pub mod pushup;
pub mod squat;

pub use lunge::LungeTracker;
pub use plank::PlankTracker;
pub use pushup::PushupTracker;
pub use squat::SquatTracker;

/// Feedback messages shared across exercise families
pub const MSG_GOOD_FORM: &str = "GOOD FORM";
pub const MSG_REP_COUNTED: &str = "REP COUNTED!";
pub const MSG_NO_BODY_DETECTED: &str = "NO BODY DETECTED";

/// Coarse class of a feedback event, for render/voice consumers
///
/// Lets a display pick a color or a voice pick an urgency without matching on
/// message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    /// Continuous form assessment (good or corrective)
    Form,
    /// Phase change within a rep (e.g. reached depth)
    Transition,
    /// A rep was credited
    RepCounted,
    /// Detection lost or not yet acquired
    Detection,
}

/// One instantaneous coaching cue emitted by a tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub message: String,
    pub kind: FeedbackKind,
}

/// Session-scoped feedback de-duplication
///
/// Emits an event only when the message differs from the previously emitted
/// one, so a cue that holds true across many frames is spoken/shown once.
/// State survives across frames for the life of the session.
#[derive(Debug, Default)]
pub struct FeedbackGate {
    last: Option<&'static str>,
}

impl FeedbackGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass a candidate message through the gate
    pub fn emit(&mut self, message: &'static str, kind: FeedbackKind) -> Option<FeedbackEvent> {
        if self.last == Some(message) {
            return None;
        }
        self.last = Some(message);
        Some(FeedbackEvent {
            message: message.to_string(),
            kind,
        })
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Progress reported by a tracker: reps for counters, time for holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerProgress {
    Reps(u32),
    HoldMs(u64),
}

/// Common contract for the live exercise automatons
///
/// `advance` is synchronous and never fails: an unusable frame degrades to a
/// (gated) detection-loss event and tracking resumes on the next frame.
pub trait ExerciseTracker: Send {
    /// Process one frame, returning at most one feedback event
    fn advance(&mut self, frame: &PoseFrame) -> Option<FeedbackEvent>;

    /// Current rep count or accumulated hold time
    fn progress(&self) -> TrackerProgress;

    /// Return to the initial state, clearing counters and feedback history
    fn reset(&mut self);
}

/// Exercise families with a live tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exercise {
    Squat,
    Lunge,
    Pushup,
    Plank,
}

impl Exercise {
    pub fn display_name(&self) -> &'static str {
        match self {
            Exercise::Squat => "Squat",
            Exercise::Lunge => "Lunge",
            Exercise::Pushup => "Push-up",
            Exercise::Plank => "Plank",
        }
    }
}

impl std::str::FromStr for Exercise {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "squat" | "squats" => Ok(Exercise::Squat),
            "lunge" | "lunges" => Ok(Exercise::Lunge),
            "pushup" | "push-up" | "pushups" => Ok(Exercise::Pushup),
            "plank" => Ok(Exercise::Plank),
            other => Err(format!("unknown exercise '{}'", other)),
        }
    }
}

impl std::fmt::Display for Exercise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Construct the tracker for an exercise with the session's thresholds
pub fn tracker_for(exercise: Exercise, config: &AppConfig) -> Box<dyn ExerciseTracker> {
    match exercise {
        Exercise::Squat => Box::new(SquatTracker::new(config.squat.clone())),
        Exercise::Lunge => Box::new(LungeTracker::new(config.lunge.clone())),
        Exercise::Pushup => Box::new(PushupTracker::new(config.pushup.clone())),
        Exercise::Plank => Box::new(PlankTracker::new(config.plank.clone())),
    }
}
