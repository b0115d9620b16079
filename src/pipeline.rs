//! Boundary toward the external generation backend.
//!
//! The store never schedules generation work itself. An orchestrator out of
//! this crate submits a [`JobRequest`] through a [`GenerationBackend`],
//! polls it, and feeds the resulting deltas back in as [`PipelineEvent`]s
//! via [`ProjectStore::apply_event`](crate::ProjectStore::apply_event).

use serde::{Deserialize, Serialize};

use crate::error::{ProjectError, ProjectResult};
use crate::project::model::{
    AdProject, BrandKit, GenerationProgress, GenerationStatus, ProjectStatus, Shot, Voiceover,
};

/// Video generation model the backend runs for shots.
/// Fast tier: $0.15/sec vs $0.40/sec for the quality tier.
pub const VIDEO_MODEL_ID: &str = "veo-3.1-fast-generate-preview";

/// Voice synthesis model the backend runs for the narration.
pub const VOICE_MODEL_ID: &str = "eleven_multilingual_v2";

// =============================================================================
// VOICE CATALOG
// =============================================================================

/// One selectable narration voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Premium voices suitable for luxury advertising. Externally sourced and
/// fixed; the store records the chosen id/name without validating against
/// the live catalog.
pub const LUXURY_VOICES: [VoiceProfile; 4] = [
    VoiceProfile {
        id: "21m00Tcm4TlvDq8ikWAM",
        name: "rachel",
        description: "Warm, professional female",
    },
    VoiceProfile {
        id: "29vD33N1CtxCmqQRPOHJ",
        name: "drew",
        description: "Confident male",
    },
    VoiceProfile {
        id: "XB0fDUnXU5powFXDhCwa",
        name: "charlotte",
        description: "Sophisticated British female",
    },
    VoiceProfile {
        id: "EXAVITQu4vr4xnSDxMaL",
        name: "sarah",
        description: "Clear, elegant female",
    },
];

/// All catalog voices.
pub fn luxury_voices() -> &'static [VoiceProfile] {
    &LUXURY_VOICES
}

/// Looks a voice up by id or by name.
pub fn find_voice(key: &str) -> Option<&'static VoiceProfile> {
    LUXURY_VOICES.iter().find(|v| v.id == key || v.name == key)
}

// =============================================================================
// JOB SUBMISSION CONTRACT
// =============================================================================

/// Everything the backend needs to run one generation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    pub shots: Vec<Shot>,
    pub voiceover: Voiceover,
    pub brand: BrandKit,
}

impl JobRequest {
    /// Snapshots a project into a submittable job.
    /// Fails if the shot list is empty.
    pub fn from_project(project: &AdProject) -> ProjectResult<Self> {
        if project.shots.is_empty() {
            return Err(ProjectError::EmptyShotList);
        }
        Ok(Self {
            shots: project.shots.clone(),
            voiceover: project.voiceover.clone(),
            brand: project.brand.clone(),
        })
    }
}

/// Receipt returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTicket {
    pub job_id: String,
    /// Backend's estimate of the full run, in seconds.
    pub eta_seconds: u32,
}

/// The generation service as the core sees it: opaque, asynchronous on its
/// own side, reached through two synchronous calls. Implemented outside this
/// crate by the real orchestrator and inside tests by scripted doubles.
pub trait GenerationBackend {
    /// Submits a job; returns a ticket for polling.
    fn submit(&mut self, request: JobRequest) -> ProjectResult<JobTicket>;

    /// Queries the current pipeline status of a submitted job.
    fn poll(&mut self, job_id: &str) -> ProjectResult<GenerationProgress>;
}

// =============================================================================
// REPORTING CHANNEL
// =============================================================================

/// One delta reported by the orchestrator.
///
/// Deltas map 1:1 onto store reporting operations, so delivery order and
/// duplication never threaten aggregate consistency - each variant lands
/// idempotently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// Fresh pipeline status snapshot.
    Progress(GenerationProgress),
    /// Project lifecycle change.
    ProjectStatus { status: ProjectStatus },
    /// Per-shot status report.
    ShotStatus {
        shot_id: String,
        status: GenerationStatus,
        progress: i32,
        error: Option<String>,
    },
    /// A shot's video finished rendering.
    ShotVideoReady {
        shot_id: String,
        video_url: String,
        thumbnail_url: Option<String>,
    },
    /// Voice synthesis status report.
    VoiceoverStatus {
        status: GenerationStatus,
        progress: i32,
        error: Option<String>,
    },
    /// The narration track finished rendering.
    VoiceoverAudioReady { audio_url: String },
    /// The assembled advertisement is ready.
    FinalVideoReady { final_video_url: String },
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::model::PipelineStage;
    use crate::ProjectStore;

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(find_voice("charlotte").unwrap().id, "XB0fDUnXU5powFXDhCwa");
        assert_eq!(find_voice("21m00Tcm4TlvDq8ikWAM").unwrap().name, "rachel");
        assert!(find_voice("bogus").is_none());
        assert_eq!(luxury_voices().len(), 4);
    }

    #[test]
    fn test_default_voice_exists_in_catalog() {
        let vo = Voiceover::default();
        let profile = find_voice(&vo.voice_id).unwrap();
        assert_eq!(profile.name, vo.voice_name);
    }

    #[test]
    fn test_job_request_snapshots_project() {
        let mut store = ProjectStore::new();
        store
            .update_voiceover(|vo| vo.script = "Where tradition meets tomorrow.".to_string())
            .unwrap();
        let project = store.get_state().unwrap();

        let request = JobRequest::from_project(&project).unwrap();
        assert_eq!(request.shots.len(), 1);
        assert_eq!(request.voiceover.script, "Where tradition meets tomorrow.");
    }

    #[test]
    fn test_job_request_rejects_empty_shot_list() {
        let project = AdProject::new("proj-1");
        assert!(matches!(
            JobRequest::from_project(&project),
            Err(ProjectError::EmptyShotList)
        ));
    }

    #[test]
    fn test_events_apply_idempotently_and_out_of_order() {
        let mut store = ProjectStore::new();
        let shot_id = store.add_shot().unwrap();

        // Completion lands before the status report it logically follows,
        // and then both get replayed.
        let ready = PipelineEvent::ShotVideoReady {
            shot_id: shot_id.clone(),
            video_url: "https://cdn.example.com/shot.mp4".to_string(),
            thumbnail_url: None,
        };
        let late_status = PipelineEvent::ShotStatus {
            shot_id: shot_id.clone(),
            status: GenerationStatus::Generating,
            progress: 70,
            error: None,
        };

        store.apply_event(ready.clone()).unwrap();
        store.apply_event(late_status).unwrap();
        store.apply_event(ready.clone()).unwrap();
        store.apply_event(ready).unwrap();

        let shot = store.get_shot(&shot_id).unwrap().unwrap();
        assert_eq!(shot.status, GenerationStatus::Completed);
        assert_eq!(shot.progress, 100);
        assert_eq!(
            shot.generated_video_url.as_deref(),
            Some("https://cdn.example.com/shot.mp4")
        );
    }

    #[test]
    fn test_events_for_unknown_shot_are_noops() {
        let mut store = ProjectStore::new();
        let before = store.get_state().unwrap();

        store
            .apply_event(PipelineEvent::ShotStatus {
                shot_id: "ghost".to_string(),
                status: GenerationStatus::Generating,
                progress: 10,
                error: None,
            })
            .unwrap();

        assert_eq!(store.get_state().unwrap(), before);
    }

    #[test]
    fn test_progress_event_replaces_snapshot() {
        let mut store = ProjectStore::new();
        store.apply_event(PipelineEvent::Progress(GenerationProgress {
            stage: PipelineStage::GeneratingShots,
            current_shot: Some(1),
            total_shots: Some(4),
            shot_progress: Some(25),
            message: "Generating shot 1 of 4".to_string(),
            eta_seconds: Some(240),
        }))
        .unwrap();

        let progress = store.generation_progress();
        assert_eq!(progress.stage, PipelineStage::GeneratingShots);
        assert_eq!(progress.message, "Generating shot 1 of 4");
    }

    #[test]
    fn test_event_serde_round_trip() {
        let event = PipelineEvent::VoiceoverStatus {
            status: GenerationStatus::Generating,
            progress: 55,
            error: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"voiceover_status\""));
        let parsed: PipelineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
