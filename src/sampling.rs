// Frame sampler/aggregator - offline pass over a recorded pose stream
//
// Walks the pose-collaborator output at a reduced sampling rate, computes the
// fixed joint-angle set per surviving frame, and folds per-angle min/avg/max
// statistics for the scoring engine. Frames without a usable detection are
// dropped outright so the statistics never contain sentinel values.
//
// Stateless across calls: one call processes one complete session.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::SamplingConfig;
use crate::error::SamplingError;
use crate::pose::geometry::joint_angle;
use crate::pose::{Keypoint, Landmark, PoseFrame};

/// Landmarks a frame must carry (above the visibility threshold) to yield the
/// recorded angle set.
const REQUIRED_LANDMARKS: [Landmark; 8] = [
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftHip,
    Landmark::RightHip,
    Landmark::LeftKnee,
    Landmark::RightKnee,
    Landmark::LeftAnkle,
    Landmark::RightAnkle,
];

/// The fixed joint-angle set recorded per sampled frame
///
/// Knee = hip-knee-ankle, hip = shoulder-hip-knee, all in degrees [0, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    pub left_knee: f32,
    pub right_knee: f32,
    pub left_hip: f32,
    pub right_hip: f32,
}

impl JointAngles {
    /// Compute the angle set from a frame's landmarks
    ///
    /// Returns `None` when any required landmark is missing or below the
    /// visibility threshold — the caller drops the frame rather than
    /// recording nulls.
    pub fn from_frame(frame: &PoseFrame, visibility_threshold: f32) -> Option<Self> {
        if !frame.all_visible(&REQUIRED_LANDMARKS, visibility_threshold) {
            return None;
        }
        let kp = |lm: Landmark| -> Option<&Keypoint> { frame.visible(lm, visibility_threshold) };

        Some(Self {
            left_knee: joint_angle(
                kp(Landmark::LeftHip)?,
                kp(Landmark::LeftKnee)?,
                kp(Landmark::LeftAnkle)?,
            ),
            right_knee: joint_angle(
                kp(Landmark::RightHip)?,
                kp(Landmark::RightKnee)?,
                kp(Landmark::RightAnkle)?,
            ),
            left_hip: joint_angle(
                kp(Landmark::LeftShoulder)?,
                kp(Landmark::LeftHip)?,
                kp(Landmark::LeftKnee)?,
            ),
            right_hip: joint_angle(
                kp(Landmark::RightShoulder)?,
                kp(Landmark::RightHip)?,
                kp(Landmark::RightKnee)?,
            ),
        })
    }

    /// Per-frame knee average, used by the issue range scans
    pub fn knee_avg(&self) -> f32 {
        (self.left_knee + self.right_knee) / 2.0
    }

    /// Per-frame left/right knee difference
    pub fn knee_asymmetry(&self) -> f32 {
        (self.left_knee - self.right_knee).abs()
    }
}

/// One sampled frame: source index, surviving landmarks, computed angles
///
/// Immutable after creation; owned by the session's AngleSeries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame_index: usize,
    pub landmarks: HashMap<Landmark, Keypoint>,
    pub angles: JointAngles,
}

/// Ordered per-frame records for one session
///
/// Append-only during sampling, frozen before scoring. Frame indices are
/// strictly increasing by construction (the sampler never reorders or
/// duplicates frames).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AngleSeries {
    records: Vec<FrameRecord>,
}

impl AngleSeries {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record, preserving the strictly-increasing index invariant.
    /// Out-of-order frames are a caller bug; they are skipped with a warning
    /// rather than corrupting the series.
    pub fn push(&mut self, record: FrameRecord) {
        if let Some(last) = self.records.last() {
            if record.frame_index <= last.frame_index {
                log::warn!(
                    "[AngleSeries] Dropping out-of-order frame {} (last {})",
                    record.frame_index,
                    last.frame_index
                );
                return;
            }
        }
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FrameRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrameRecord> {
        self.records.iter()
    }
}

/// min/avg/max summary for one angle across a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleStats {
    pub avg: f32,
    pub min: f32,
    pub max: f32,
}

impl AngleStats {
    fn fold(values: impl Iterator<Item = f32> + Clone, count: usize) -> Self {
        let sum: f32 = values.clone().sum();
        let min = values.clone().fold(f32::INFINITY, f32::min);
        let max = values.fold(f32::NEG_INFINITY, f32::max);
        Self {
            avg: sum / count as f32,
            min,
            max,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.avg.is_finite() && self.min.is_finite() && self.max.is_finite()
    }
}

/// Aggregated statistics over an AngleSeries, one AngleStats per tracked angle
///
/// Derived and recomputable; never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleStatistics {
    pub left_knee: AngleStats,
    pub right_knee: AngleStats,
    pub left_hip: AngleStats,
    pub right_hip: AngleStats,
}

impl AngleStatistics {
    /// Fold statistics over a non-empty series
    pub fn from_series(series: &AngleSeries) -> Option<Self> {
        if series.is_empty() {
            return None;
        }
        let n = series.len();
        Some(Self {
            left_knee: AngleStats::fold(series.iter().map(|r| r.angles.left_knee), n),
            right_knee: AngleStats::fold(series.iter().map(|r| r.angles.right_knee), n),
            left_hip: AngleStats::fold(series.iter().map(|r| r.angles.left_hip), n),
            right_hip: AngleStats::fold(series.iter().map(|r| r.angles.right_hip), n),
        })
    }
}

/// Sample a recorded pose stream and aggregate angle statistics
///
/// Keeps frames whose index is a multiple of `round(native_fps /
/// target_fps)` (minimum interval 1), drops kept frames without a usable
/// detection, and fails with `NoBodyDetected` when nothing survives.
///
/// # Arguments
/// * `frames` - Complete pose-collaborator output for one session
/// * `native_fps` - Source recording rate
/// * `config` - Target rate and visibility gate
pub fn sample(
    frames: &[PoseFrame],
    native_fps: u32,
    config: &SamplingConfig,
) -> Result<(AngleSeries, AngleStatistics), SamplingError> {
    if config.target_fps == 0 {
        return Err(SamplingError::InvalidRate { target_fps: 0 });
    }

    let interval = ((native_fps as f32 / config.target_fps as f32).round() as usize).max(1);
    tracing::debug!(
        "[FrameSampler] native {} fps, target {} fps, interval {}",
        native_fps,
        config.target_fps,
        interval
    );

    let mut series = AngleSeries::new();
    for frame in frames {
        if frame.frame_index % interval != 0 {
            continue;
        }
        match JointAngles::from_frame(frame, config.visibility_threshold) {
            Some(angles) => series.push(FrameRecord {
                frame_index: frame.frame_index,
                landmarks: frame.landmarks.clone(),
                angles,
            }),
            None => {
                tracing::debug!(
                    "[FrameSampler] Frame {} dropped: no usable detection",
                    frame.frame_index
                );
            }
        }
    }

    let statistics =
        AngleStatistics::from_series(&series).ok_or(SamplingError::NoBodyDetected {
            frames_seen: frames.len(),
        })?;

    tracing::info!(
        "[FrameSampler] Sampled {} of {} frames",
        series.len(),
        frames.len()
    );
    Ok((series, statistics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::PoseFrameBuilder;

    fn standing_frame(index: usize) -> PoseFrame {
        PoseFrameBuilder::new(index)
            .knee_angles(175.0, 175.0)
            .hip_angles(175.0, 175.0)
            .build()
    }

    #[test]
    fn test_interval_keeps_every_third_frame() {
        // 30 fps native, 10 fps target -> every 3rd frame
        let frames: Vec<PoseFrame> = (0..30).map(standing_frame).collect();
        let (series, _) = sample(&frames, 30, &SamplingConfig::default()).unwrap();
        assert_eq!(series.len(), 10);
        assert_eq!(series.records()[0].frame_index, 0);
        assert_eq!(series.records()[1].frame_index, 3);
    }

    #[test]
    fn test_interval_never_below_one() {
        // target faster than native still keeps every frame
        let frames: Vec<PoseFrame> = (0..5).map(standing_frame).collect();
        let config = SamplingConfig {
            target_fps: 60,
            ..SamplingConfig::default()
        };
        let (series, _) = sample(&frames, 30, &config).unwrap();
        assert_eq!(series.len(), 5);
    }

    #[test]
    fn test_undetected_frames_are_dropped_not_recorded() {
        let mut frames: Vec<PoseFrame> = (0..10).map(standing_frame).collect();
        frames[3] = PoseFrame::empty(3, 100);
        frames[6] = PoseFrame::empty(6, 200);

        let config = SamplingConfig {
            target_fps: 30,
            ..SamplingConfig::default()
        };
        let (series, stats) = sample(&frames, 30, &config).unwrap();
        assert_eq!(series.len(), 8);
        // No sentinel values in the statistics
        assert!(stats.left_knee.is_finite());
        assert!(stats.left_knee.min > 0.0);
    }

    #[test]
    fn test_no_survivors_is_no_body_detected() {
        let frames: Vec<PoseFrame> = (0..10).map(|i| PoseFrame::empty(i, i as u64 * 33)).collect();
        let err = sample(&frames, 30, &SamplingConfig::default()).unwrap_err();
        assert_eq!(err, SamplingError::NoBodyDetected { frames_seen: 10 });
    }

    #[test]
    fn test_zero_target_fps_rejected() {
        let frames = vec![standing_frame(0)];
        let config = SamplingConfig {
            target_fps: 0,
            ..SamplingConfig::default()
        };
        let err = sample(&frames, 30, &config).unwrap_err();
        assert_eq!(err, SamplingError::InvalidRate { target_fps: 0 });
    }

    #[test]
    fn test_low_visibility_counts_as_undetected() {
        let dim = PoseFrameBuilder::new(0)
            .knee_angles(175.0, 175.0)
            .hip_angles(175.0, 175.0)
            .visibility(0.2)
            .build();
        let err = sample(&[dim], 30, &SamplingConfig::default()).unwrap_err();
        assert!(matches!(err, SamplingError::NoBodyDetected { .. }));
    }

    #[test]
    fn test_statistics_min_avg_max() {
        let frames = vec![
            PoseFrameBuilder::new(0)
                .knee_angles(170.0, 170.0)
                .hip_angles(170.0, 170.0)
                .build(),
            PoseFrameBuilder::new(1)
                .knee_angles(90.0, 90.0)
                .hip_angles(150.0, 150.0)
                .build(),
            PoseFrameBuilder::new(2)
                .knee_angles(170.0, 170.0)
                .hip_angles(170.0, 170.0)
                .build(),
        ];
        let config = SamplingConfig {
            target_fps: 30,
            ..SamplingConfig::default()
        };
        let (_, stats) = sample(&frames, 30, &config).unwrap();
        assert!((stats.left_knee.min - 90.0).abs() < 1.5);
        assert!((stats.left_knee.max - 170.0).abs() < 1.5);
        let expected_avg = (170.0 + 90.0 + 170.0) / 3.0;
        assert!((stats.left_knee.avg - expected_avg).abs() < 1.5);
    }

    #[test]
    fn test_series_rejects_out_of_order_push() {
        let mut series = AngleSeries::new();
        let angles = JointAngles {
            left_knee: 90.0,
            right_knee: 90.0,
            left_hip: 160.0,
            right_hip: 160.0,
        };
        series.push(FrameRecord {
            frame_index: 5,
            landmarks: HashMap::new(),
            angles,
        });
        series.push(FrameRecord {
            frame_index: 5,
            landmarks: HashMap::new(),
            angles,
        });
        series.push(FrameRecord {
            frame_index: 2,
            landmarks: HashMap::new(),
            angles,
        });
        assert_eq!(series.len(), 1);
    }
}
