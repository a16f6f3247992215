// Squat scoring rules
//
// Start from a perfect 10.0 and subtract independent additive penalties on
// three axes (depth, left/right symmetry, torso angle), then clamp to [0, 10]
// and round to one decimal. Issues, metrics, strengths and recommendations
// read the same statistics but on their own boundaries; issue thresholds and
// metric boundaries are deliberately separate rule sets.
//
// All thresholds live here as constants rather than in AppConfig: the score
// for a given statistics set must be reproducible across deployments, so the
// rules are not tunable at runtime.

use crate::sampling::{AngleSeries, AngleStatistics, FrameRecord};
use crate::scoring::report::{
    AnalysisReport, Issue, Metric, MetricStatus, Recommendation, Severity,
};

// penalty thresholds
const DEPTH_SHALLOW_DEG: f32 = 110.0;
const DEPTH_EXCESSIVE_DEG: f32 = 70.0;
const ASYMMETRY_PENALTY_DEG: f32 = 15.0;
const LEAN_PENALTY_DEG: f32 = 150.0;

// issue thresholds
const DEPTH_ISSUE_DEG: f32 = 100.0;
const DEPTH_SEVERE_DEG: f32 = 120.0;
const ASYMMETRY_ISSUE_DEG: f32 = 15.0;
const ASYMMETRY_SEVERE_DEG: f32 = 25.0;
const LEAN_ISSUE_DEG: f32 = 145.0;
const LEAN_SEVERE_DEG: f32 = 135.0;

fn min_knee(stats: &AngleStatistics) -> f32 {
    stats.left_knee.min.min(stats.right_knee.min)
}

fn knee_asymmetry(stats: &AngleStatistics) -> f32 {
    (stats.left_knee.avg - stats.right_knee.avg).abs()
}

fn avg_hip(stats: &AngleStatistics) -> f32 {
    (stats.left_hip.avg + stats.right_hip.avg) / 2.0
}

/// Overall squat score in [0, 10], one decimal.
pub fn score(stats: &AngleStatistics) -> f32 {
    let mut penalty = 0.0f32;

    let m = min_knee(stats);
    if m > DEPTH_SHALLOW_DEG {
        penalty += ((m - 90.0) / 20.0).min(3.0);
    } else if m < DEPTH_EXCESSIVE_DEG {
        penalty += ((DEPTH_EXCESSIVE_DEG - m) / 10.0).min(1.5);
    }

    let d = knee_asymmetry(stats);
    if d > ASYMMETRY_PENALTY_DEG {
        penalty += (d / 15.0 * 1.5).min(2.0);
    }

    let h = avg_hip(stats);
    if h < LEAN_PENALTY_DEG {
        penalty += ((LEAN_PENALTY_DEG - h) / 20.0).min(2.0);
    }

    let raw = (10.0 - penalty).clamp(0.0, 10.0);
    // rounds half away from zero, not half to even; f32 penalty sums never
    // land exactly on a .x5 tie, so the two strategies agree on real input
    (raw * 10.0).round() / 10.0
}

/// Widest range where `predicate` holds, falling back to the full series
/// range when no record matches.
///
/// Ranges are positions within the frozen series, not source-video frame
/// indices, so they always land in `[0, total_frames - 1]` regardless of the
/// sampling interval. The source index of a position is recoverable through
/// the series records.
fn frame_range(
    series: &AngleSeries,
    predicate: impl Fn(&FrameRecord) -> bool,
) -> (usize, usize) {
    let matching: Vec<usize> = series
        .iter()
        .enumerate()
        .filter(|(_, r)| predicate(r))
        .map(|(position, _)| position)
        .collect();
    match (matching.first(), matching.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => full_range(series),
    }
}

fn full_range(series: &AngleSeries) -> (usize, usize) {
    (0, series.len().saturating_sub(1))
}

pub fn issues(stats: &AngleStatistics, series: &AngleSeries) -> Vec<Issue> {
    let mut out = Vec::new();

    let m = min_knee(stats);
    if m > DEPTH_ISSUE_DEG {
        let severity = if m > DEPTH_SEVERE_DEG {
            Severity::Severe
        } else {
            Severity::Moderate
        };
        let (frame_start, frame_end) =
            frame_range(series, |r| r.angles.knee_avg() > DEPTH_ISSUE_DEG);
        out.push(Issue {
            issue_type: "Insufficient Squat Depth".to_string(),
            severity,
            frame_start,
            frame_end,
            coaching_cue: format!(
                "Lower your hips until your thighs are parallel to the floor \
                 (target knee angle < 90\u{b0}). Currently reaching {m:.0}\u{b0}. \
                 Focus on pushing your hips back and down, not just your knees forward."
            ),
            confidence_score: 0.85,
        });
    }

    let d = knee_asymmetry(stats);
    if d > ASYMMETRY_ISSUE_DEG {
        let severity = if d > ASYMMETRY_SEVERE_DEG {
            Severity::Severe
        } else {
            Severity::Moderate
        };
        let (frame_start, frame_end) =
            frame_range(series, |r| r.angles.knee_asymmetry() > ASYMMETRY_ISSUE_DEG);
        out.push(Issue {
            issue_type: "Knee Asymmetry/Valgus".to_string(),
            severity,
            frame_start,
            frame_end,
            coaching_cue: format!(
                "Keep both knees aligned. You have {d:.0}\u{b0} difference between legs. \
                 Push your knees outward to track over your toes. Focus on engaging your glutes."
            ),
            confidence_score: 0.75,
        });
    }

    let h = avg_hip(stats);
    if h < LEAN_ISSUE_DEG {
        let severity = if h < LEAN_SEVERE_DEG {
            Severity::Severe
        } else {
            Severity::Moderate
        };
        // lean is a whole-session postural trait, always the full range
        let (frame_start, frame_end) = full_range(series);
        out.push(Issue {
            issue_type: "Excessive Forward Lean".to_string(),
            severity,
            frame_start,
            frame_end,
            coaching_cue: format!(
                "Maintain a more upright torso. Your hip angle is {h:.0}\u{b0} \
                 (target > 150\u{b0}). Keep your chest up, core braced, and focus on \
                 sitting back into the squat."
            ),
            confidence_score: 0.70,
        });
    }

    out
}

/// The three fixed metric rows, always emitted regardless of issues.
pub fn metrics(stats: &AngleStatistics) -> Vec<Metric> {
    let m = min_knee(stats);
    let d = knee_asymmetry(stats);
    let h = avg_hip(stats);

    vec![
        Metric {
            metric_name: "Knee Flexion (Depth)".to_string(),
            actual_value: format!("{m:.0}\u{b0}"),
            target_value: "< 90\u{b0}".to_string(),
            status: if m < 95.0 {
                MetricStatus::Good
            } else if m < 110.0 {
                MetricStatus::Warning
            } else {
                MetricStatus::Error
            },
        },
        Metric {
            metric_name: "Knee Symmetry".to_string(),
            actual_value: format!("{d:.0}\u{b0} difference"),
            target_value: "< 10\u{b0}".to_string(),
            status: if d < 10.0 {
                MetricStatus::Good
            } else if d < 20.0 {
                MetricStatus::Warning
            } else {
                MetricStatus::Error
            },
        },
        Metric {
            metric_name: "Hip Angle (Torso Position)".to_string(),
            actual_value: format!("{h:.0}\u{b0}"),
            target_value: "> 150\u{b0}".to_string(),
            status: if h > 155.0 {
                MetricStatus::Good
            } else if h > 145.0 {
                MetricStatus::Warning
            } else {
                MetricStatus::Error
            },
        },
    ]
}

pub fn strengths(stats: &AngleStatistics, issues: &[Issue]) -> Vec<String> {
    let mut out = Vec::new();

    if min_knee(stats) < 95.0 {
        out.push("Excellent squat depth! You're achieving proper range of motion.".to_string());
    }
    if knee_asymmetry(stats) < 10.0 {
        out.push("Great knee alignment and symmetry throughout the movement.".to_string());
    }
    if issues.is_empty() {
        out.push("Outstanding form! Keep up the excellent technique.".to_string());
    }
    if out.is_empty() {
        out.push("Good effort! Focus on the cues below to improve your form.".to_string());
    }

    out
}

pub fn recommendations(issues: &[Issue], overall_score: f32) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if overall_score < 6.0 {
        out.push(Recommendation {
            recommendation_text: "Practice bodyweight squats with a focus on proper form \
                                  before adding weight. Use a mirror or video feedback to \
                                  monitor your technique."
                .to_string(),
            priority: 1,
        });
    }

    if issues.iter().any(|i| i.issue_type.contains("Depth")) {
        out.push(Recommendation {
            recommendation_text: "Work on hip mobility and ankle flexibility to improve \
                                  squat depth. Consider exercises like goblet squats to \
                                  practice the movement pattern."
                .to_string(),
            priority: 2,
        });
    }

    if issues
        .iter()
        .any(|i| i.issue_type.contains("Valgus") || i.issue_type.contains("Asymmetry"))
    {
        out.push(Recommendation {
            recommendation_text: "Strengthen your glutes and hip abductors with exercises \
                                  like clamshells, lateral band walks, and hip thrusts to \
                                  prevent knee caving."
                .to_string(),
            priority: 2,
        });
    }

    if overall_score >= 8.0 {
        out.push(Recommendation {
            recommendation_text: "Your form is solid! Consider gradually increasing load or \
                                  adding variations like pause squats."
                .to_string(),
            priority: 3,
        });
    }

    out
}

/// Assemble the full squat report from a frozen series and its statistics.
pub fn analyze(stats: &AngleStatistics, series: &AngleSeries) -> AnalysisReport {
    let overall_score = score(stats);
    let issues = issues(stats, series);
    let metrics = metrics(stats);
    let strengths = strengths(stats, &issues);
    let recommendations = recommendations(&issues, overall_score);

    AnalysisReport {
        overall_score,
        total_frames: series.len(),
        issues,
        metrics,
        strengths,
        recommendations,
    }
}
