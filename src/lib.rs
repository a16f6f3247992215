// form_coach - exercise technique evaluation engine
//
// Two entry points: `TrackingSession` for live rep/hold tracking with
// feedback events, and `sample_and_score` for offline session scoring.
// Everything observable is deterministic given the input pose stream.

pub mod api;
pub mod config;
pub mod error;
pub mod pose;
pub mod sampling;
pub mod scoring;
pub mod session;
pub mod testing;
pub mod tracking;

pub use api::*;
