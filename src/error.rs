// Error types for the form coach pipeline
//
// This module defines custom error types for sampling and analysis
// operations, providing structured error handling with numeric codes suitable
// for API-boundary communication.

use log::error;
use std::fmt;

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages from
/// custom error types, enabling consistent error handling at the service
/// boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Log a sampling error with structured context
pub fn log_sampling_error(err: &SamplingError, context: &str) {
    error!(
        "Sampling error in {}: code={}, component=FrameSampler, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Log an analysis error with structured context
pub fn log_analysis_error(err: &AnalysisError, context: &str) {
    error!(
        "Analysis error in {}: code={}, component=ScoringEngine, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Frame sampling errors
///
/// These cover the offline sampling/aggregation pass over a recorded session.
/// Live tracking never returns these: a lost detection there degrades to a
/// feedback event instead.
///
/// Error code range: 1001-1002
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplingError {
    /// No frame in the session produced a usable pose detection
    NoBodyDetected { frames_seen: usize },

    /// Target sampling rate is zero or otherwise unusable
    InvalidRate { target_fps: u32 },
}

impl ErrorCode for SamplingError {
    fn code(&self) -> i32 {
        match self {
            SamplingError::NoBodyDetected { .. } => 1001,
            SamplingError::InvalidRate { .. } => 1002,
        }
    }

    fn message(&self) -> String {
        match self {
            SamplingError::NoBodyDetected { frames_seen } => {
                format!(
                    "No person detected in video ({} frames examined)",
                    frames_seen
                )
            }
            SamplingError::InvalidRate { target_fps } => {
                format!("Target FPS must be greater than 0 (got {})", target_fps)
            }
        }
    }
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SamplingError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SamplingError {}

/// Scoring-engine validation errors
///
/// Caller-visible, session-level failures: either a complete report is
/// produced or one of these is returned, never a partial report.
///
/// Error code range: 2001-2003
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The requested exercise has no scoring rules yet
    UnsupportedExercise { exercise: String },

    /// The frame series was empty
    EmptyFrameSet,

    /// Aggregated statistics are inconsistent (non-finite, min > max)
    MalformedStatistics { reason: String },
}

impl ErrorCode for AnalysisError {
    fn code(&self) -> i32 {
        match self {
            AnalysisError::UnsupportedExercise { .. } => 2001,
            AnalysisError::EmptyFrameSet => 2002,
            AnalysisError::MalformedStatistics { .. } => 2003,
        }
    }

    fn message(&self) -> String {
        match self {
            AnalysisError::UnsupportedExercise { exercise } => {
                format!(
                    "Exercise '{}' not yet supported. Currently only 'Squat' is available.",
                    exercise
                )
            }
            AnalysisError::EmptyFrameSet => "No frame data available for analysis".to_string(),
            AnalysisError::MalformedStatistics { reason } => {
                format!("Malformed statistics: {}", reason)
            }
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AnalysisError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AnalysisError {}

/// Combined error for the batch sample-and-score entry point
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Sampling(SamplingError),
    Analysis(AnalysisError),
}

impl From<SamplingError> for PipelineError {
    fn from(err: SamplingError) -> Self {
        PipelineError::Sampling(err)
    }
}

impl From<AnalysisError> for PipelineError {
    fn from(err: AnalysisError) -> Self {
        PipelineError::Analysis(err)
    }
}

impl ErrorCode for PipelineError {
    fn code(&self) -> i32 {
        match self {
            PipelineError::Sampling(err) => err.code(),
            PipelineError::Analysis(err) => err.code(),
        }
    }

    fn message(&self) -> String {
        match self {
            PipelineError::Sampling(err) => err.message(),
            PipelineError::Analysis(err) => err.message(),
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Sampling(err) => write!(f, "{}", err),
            PipelineError::Analysis(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PipelineError {}
