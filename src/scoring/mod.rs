// Session scoring engine
//
// Validates the exercise and the frozen sampling output, then dispatches to
// the per-exercise rule set. All-or-nothing: a call either returns a complete
// report or an error, never a partial one.

pub mod report;
pub mod squat;

pub use report::{AnalysisReport, Issue, Metric, MetricStatus, Recommendation, Severity};

use crate::error::AnalysisError;
use crate::sampling::{AngleSeries, AngleStatistics};
use crate::tracking::Exercise;

fn validate_statistics(stats: &AngleStatistics) -> Result<(), AnalysisError> {
    let all = [
        ("left_knee", stats.left_knee),
        ("right_knee", stats.right_knee),
        ("left_hip", stats.left_hip),
        ("right_hip", stats.right_hip),
    ];
    for (name, angle) in all {
        if !angle.is_finite() {
            return Err(AnalysisError::MalformedStatistics {
                reason: format!("{name} statistics are not finite"),
            });
        }
        if angle.min > angle.max {
            return Err(AnalysisError::MalformedStatistics {
                reason: format!("{name} min exceeds max"),
            });
        }
    }
    Ok(())
}

/// Score one session.
///
/// # Arguments
/// * `exercise` - Exercise the session recorded; only `Squat` has a rule set
/// * `stats` - Aggregated statistics from the sampler
/// * `series` - Frozen per-frame records the statistics were folded from
///
/// # Returns
/// A complete `AnalysisReport`, or a validation error with nothing emitted.
pub fn score(
    exercise: Exercise,
    stats: &AngleStatistics,
    series: &AngleSeries,
) -> Result<AnalysisReport, AnalysisError> {
    tracing::info!("[Scoring] Starting analysis for {}", exercise.display_name());

    if exercise != Exercise::Squat {
        tracing::warn!(
            "[Scoring] Unsupported exercise requested: {}",
            exercise.display_name()
        );
        return Err(AnalysisError::UnsupportedExercise {
            exercise: exercise.display_name().to_string(),
        });
    }
    if series.is_empty() {
        return Err(AnalysisError::EmptyFrameSet);
    }
    validate_statistics(stats)?;

    let report = squat::analyze(stats, series);
    tracing::info!(
        "[Scoring] Analysis complete: score {}/10, {} issues, {} strengths",
        report.overall_score,
        report.issues.len(),
        report.strengths.len()
    );
    Ok(report)
}
