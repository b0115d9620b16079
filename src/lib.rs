//! Adcraft - project document manager for AI-generated video advertisements.
//!
//! The crate owns one advertisement project - an ordered shot timeline, a
//! voiceover track and a brand kit - inside an Automerge document, and keeps
//! it consistent across every edit:
//!
//! - **Single-owner aggregate**: all mutations run through [`ProjectStore`];
//!   shot ordering stays dense, the last shot can never be removed, and
//!   cross-field invariants are checked before anything commits
//! - **Pull-model progress**: the weighted overall percentage and per-step
//!   classification are pure functions over the last reported snapshot, safe
//!   to evaluate mid-burst while an orchestrator streams updates in
//! - **Live estimates**: total duration and generation cost computed on
//!   demand from the current snapshot
//!
//! # Example
//!
//! ```rust
//! use adcraft::{CostRates, ProjectStore};
//!
//! let mut store = ProjectStore::new();
//!
//! // A fresh project starts with one draft shot; add a second one.
//! let shot_id = store.add_shot().unwrap();
//! store
//!     .update_shot(&shot_id, |shot| {
//!         shot.prompt = "Slow orbit around a crystal perfume bottle".to_string();
//!     })
//!     .unwrap();
//!
//! store
//!     .update_voiceover(|vo| {
//!         vo.script = "Timeless elegance, reimagined.".to_string();
//!     })
//!     .unwrap();
//!
//! // Two 8-second shots.
//! assert_eq!(store.total_duration().unwrap(), 16);
//!
//! let cost = store.estimated_cost(&CostRates::default()).unwrap();
//! assert!(cost > 0.0);
//! ```

pub mod error;
pub mod estimate;
pub mod pipeline;
pub mod progress;
pub mod project;

// Re-exports for convenience
pub use error::{ProjectError, ProjectResult};
pub use estimate::CostRates;
pub use pipeline::{GenerationBackend, JobRequest, JobTicket, PipelineEvent, VoiceProfile};
pub use progress::{overall_percent, step_status, PipelineStep, StepStatus, PIPELINE_STEPS};
pub use project::model::{
    AdProject, AspectRatio, BrandKit, GenerationProgress, GenerationStatus, PipelineStage,
    ProjectStatus, Resolution, Shot, ShotDuration, Voiceover,
};
pub use project::ProjectStore;

#[cfg(feature = "wasm")]
pub use project::wasm::JsProjectStore;
