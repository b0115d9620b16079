//! Weighted progress aggregation over the generation pipeline.
//!
//! Pure functions only: every value is computed from the
//! [`GenerationProgress`] snapshot passed in, never from remembered state, so
//! the caller may evaluate them at any moment - including halfway through a
//! burst of out-of-order reporting calls.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ProjectError;
use crate::project::model::{GenerationProgress, PipelineStage};

/// The four queryable pipeline steps, in execution order.
pub const PIPELINE_STEPS: [PipelineStep; 4] = [
    PipelineStep::Uploading,
    PipelineStep::GeneratingShots,
    PipelineStep::GeneratingVoice,
    PipelineStep::Assembling,
];

/// One phase of the generation pipeline, as shown on the pipeline indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    Uploading,
    GeneratingShots,
    GeneratingVoice,
    Assembling,
}

impl PipelineStep {
    /// Position in [`PIPELINE_STEPS`].
    pub fn index(&self) -> usize {
        match self {
            Self::Uploading => 0,
            Self::GeneratingShots => 1,
            Self::GeneratingVoice => 2,
            Self::Assembling => 3,
        }
    }

    /// Share of the overall percentage carried by this step.
    /// Shot generation dominates: it is the slowest, highest-variance phase.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Uploading => 5.0,
            Self::GeneratingShots => 70.0,
            Self::GeneratingVoice => 15.0,
            Self::Assembling => 10.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::GeneratingShots => "generating_shots",
            Self::GeneratingVoice => "generating_voice",
            Self::Assembling => "assembling",
        }
    }
}

impl FromStr for PipelineStep {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploading" => Ok(Self::Uploading),
            "generating_shots" => Ok(Self::GeneratingShots),
            "generating_voice" => Ok(Self::GeneratingVoice),
            "assembling" => Ok(Self::Assembling),
            other => Err(ProjectError::serialization(format!(
                "unknown pipeline step '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one step relative to the reported stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Active,
    Completed,
    Failed,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The step a running stage is executing, if the stage names one.
fn running_step(stage: PipelineStage) -> Option<PipelineStep> {
    match stage {
        PipelineStage::Uploading => Some(PipelineStep::Uploading),
        PipelineStage::GeneratingShots => Some(PipelineStep::GeneratingShots),
        PipelineStage::GeneratingVoice => Some(PipelineStep::GeneratingVoice),
        PipelineStage::Assembling => Some(PipelineStep::Assembling),
        PipelineStage::Idle | PipelineStage::Completed | PipelineStage::Failed => None,
    }
}

/// Classifies one pipeline step against the reported stage.
///
/// A failed pipeline marks every queryable step failed: the report does not
/// say where the run died, so all attempted steps wear the failure.
pub fn step_status(stage: PipelineStage, step: PipelineStep) -> StepStatus {
    match stage {
        PipelineStage::Idle => StepStatus::Pending,
        PipelineStage::Completed => StepStatus::Completed,
        PipelineStage::Failed => StepStatus::Failed,
        _ => {
            let current = match running_step(stage) {
                Some(current) => current.index(),
                None => return StepStatus::Pending,
            };
            match step.index().cmp(&current) {
                Ordering::Less => StepStatus::Completed,
                Ordering::Equal => StepStatus::Active,
                Ordering::Greater => StepStatus::Pending,
            }
        }
    }
}

/// Fraction of the active step already done, in [0, 1].
///
/// Shot generation with known counts gets smooth sub-stage credit: shots
/// already finished plus the fraction of the current one. The
/// `current_shot - 1` term keeps the result from regressing when the next
/// shot starts and its per-shot progress resets to 0. Every other active
/// step reports no finer signal and counts as half done.
fn partial_credit(step: PipelineStep, progress: &GenerationProgress) -> f64 {
    if step == PipelineStep::GeneratingShots {
        if let (Some(current), Some(total)) = (progress.current_shot, progress.total_shots) {
            if total > 0 {
                let done = current.saturating_sub(1) as f64;
                let fraction = progress.shot_progress.unwrap_or(0).clamp(0, 100) as f64 / 100.0;
                return ((done + fraction) / total as f64).clamp(0.0, 1.0);
            }
        }
    }
    0.5
}

/// Collapses the pipeline snapshot into one display percentage.
///
/// Walks the steps in order: completed steps contribute their full weight,
/// the first active step contributes partial credit, and everything after it
/// contributes nothing - progress is strictly sequential, never
/// parallel-credited. A failed pipeline reads 0; the failure signal lives in
/// [`step_status`], not here.
pub fn overall_percent(progress: &GenerationProgress) -> u8 {
    match progress.stage {
        PipelineStage::Idle => return 0,
        PipelineStage::Completed => return 100,
        _ => {}
    }

    let mut acc = 0.0;
    for step in PIPELINE_STEPS {
        match step_status(progress.stage, step) {
            StepStatus::Completed => acc += step.weight(),
            StepStatus::Active => {
                acc += step.weight() * partial_credit(step, progress);
                break;
            }
            StepStatus::Pending | StepStatus::Failed => break,
        }
    }
    acc.round() as u8
}

// =============================================================================
// TESTS
// =============================================================================
