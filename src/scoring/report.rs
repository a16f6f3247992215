// Report data model for session scoring.
//
// Everything here serializes with serde so a report can be written to disk
// or shipped over a wire verbatim. Field values are fully determined by the
// input statistics; two identical sessions always serialize byte-identical.

use serde::{Deserialize, Serialize};

/// How strongly an issue deviates from the target range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Moderate,
    Severe,
}

/// Traffic-light status of a single measured metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Good,
    Warning,
    Error,
}

/// A detected form problem, localized to the range where it held.
///
/// `frame_start`/`frame_end` are positions within the sampled series the
/// report was scored from, bounded by `[0, total_frames - 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub issue_type: String,
    pub severity: Severity,
    pub frame_start: usize,
    pub frame_end: usize,
    pub coaching_cue: String,
    pub confidence_score: f32,
}

/// A measured value compared against its target description. Both sides are
/// pre-formatted strings so the report renders without further math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub metric_name: String,
    pub actual_value: String,
    pub target_value: String,
    pub status: MetricStatus,
}

/// An actionable next step, ordered by priority (1 is most urgent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommendation_text: String,
    pub priority: u32,
}

/// Full outcome of scoring one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub overall_score: f32,
    pub total_frames: usize,
    pub issues: Vec<Issue>,
    pub metrics: Vec<Metric>,
    pub strengths: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}

impl AnalysisReport {
    /// True when no issue was detected at any severity.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Severity::Moderate).unwrap(),
            "\"moderate\""
        );
        assert_eq!(
            serde_json::to_string(&MetricStatus::Warning).unwrap(),
            "\"warning\""
        );
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let report = AnalysisReport {
            overall_score: 8.5,
            total_frames: 42,
            issues: vec![Issue {
                issue_type: "Knee Asymmetry/Valgus".to_string(),
                severity: Severity::Moderate,
                frame_start: 3,
                frame_end: 17,
                coaching_cue: "Push knees out".to_string(),
                confidence_score: 0.75,
            }],
            metrics: vec![Metric {
                metric_name: "Knee Flexion (Depth)".to_string(),
                actual_value: "88\u{b0}".to_string(),
                target_value: "< 90\u{b0}".to_string(),
                status: MetricStatus::Good,
            }],
            strengths: vec!["Excellent squat depth".to_string()],
            recommendations: vec![Recommendation {
                recommendation_text: "Keep training".to_string(),
                priority: 1,
            }],
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
