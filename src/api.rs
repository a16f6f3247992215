// Public pipeline surface
//
// One call takes a recorded pose stream through sampling, aggregation and
// scoring. Live tracking goes through `TrackingSession` instead.

pub use crate::config::AppConfig;
pub use crate::error::{AnalysisError, PipelineError, SamplingError};
pub use crate::pose::{Keypoint, Landmark, PoseFrame};
pub use crate::sampling::{sample, AngleSeries, AngleStatistics};
pub use crate::scoring::{AnalysisReport, Issue, Metric, Recommendation, Severity};
pub use crate::session::TrackingSession;
pub use crate::tracking::{Exercise, FeedbackEvent, TrackerProgress};

/// Run the full offline pipeline: sample a recorded stream, fold statistics,
/// score the session.
///
/// # Arguments
/// * `frames` - Complete pose stream for one session
/// * `native_fps` - Recording rate of the stream
/// * `exercise` - Exercise the session recorded
/// * `config` - Sampling parameters; scoring rules are fixed
///
/// # Returns
/// A complete report, or the first pipeline stage error.
pub fn sample_and_score(
    frames: &[PoseFrame],
    native_fps: u32,
    exercise: Exercise,
    config: &AppConfig,
) -> Result<AnalysisReport, PipelineError> {
    tracing::info!(
        "[Pipeline] Scoring {} frames of {} at {} fps",
        frames.len(),
        exercise.display_name(),
        native_fps
    );
    let (series, statistics) = crate::sampling::sample(frames, native_fps, &config.sampling)
        .map_err(|err| {
            crate::error::log_sampling_error(&err, "sample_and_score");
            err
        })?;
    let report = crate::scoring::score(exercise, &statistics, &series).map_err(|err| {
        crate::error::log_analysis_error(&err, "sample_and_score");
        err
    })?;
    Ok(report)
}
