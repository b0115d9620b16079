//! Data models for the ad project document manager.
//!
//! Struct fields map onto the Automerge document via autosurgeon derives.
//! Enumerated fields carry manual `Reconcile`/`Hydrate` impls so their wire
//! representation stays a canonical scalar instead of a derive-shaped map.

use autosurgeon::reconcile::NoKey;
use autosurgeon::{Hydrate, HydrateError, Reconcile, Reconciler};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProjectError;

/// Maximum number of reference images a shot may carry.
pub const MAX_REFERENCE_IMAGES: usize = 3;

/// Negative prompt applied to newly created shots.
pub const DEFAULT_NEGATIVE_PROMPT: &str = "low quality, blurry, amateur, text, watermark";

// =============================================================================
// SCALAR ENUMS
// =============================================================================

/// Generates manual autosurgeon impls for a string-backed enum.
/// The document stores the canonical `as_str()` form, so targeted `put`
/// operations and hydration agree on the representation.
macro_rules! scalar_enum {
    ($ty:ident, $expected:literal) => {
        impl Reconcile for $ty {
            type Key<'a> = NoKey;

            fn reconcile<R: Reconciler>(&self, mut reconciler: R) -> Result<(), R::Error> {
                reconciler.str(self.as_str())
            }
        }

        impl Hydrate for $ty {
            fn hydrate_string(value: &'_ str) -> Result<Self, HydrateError> {
                value
                    .parse()
                    .map_err(|_| HydrateError::unexpected($expected, value.to_string()))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Generation lifecycle of a shot or the voiceover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    #[default]
    Draft,
    Queued,
    Generating,
    Completed,
    Failed,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Queued => "queued",
            Self::Generating => "generating",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// True once generation can no longer progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl FromStr for GenerationStatus {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "queued" => Ok(Self::Queued),
            "generating" => Ok(Self::Generating),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(ProjectError::serialization(format!(
                "unknown generation status '{other}'"
            ))),
        }
    }
}

scalar_enum!(GenerationStatus, "a generation status");

/// Lifecycle of the project as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Generating,
    Completed,
    Failed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Generating => "generating",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "generating" => Ok(Self::Generating),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(ProjectError::serialization(format!(
                "unknown project status '{other}'"
            ))),
        }
    }
}

scalar_enum!(ProjectStatus, "a project status");

/// Video resolution tier. 1080p generation only supports 8-second shots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "720p")]
    P720,
    #[default]
    #[serde(rename = "1080p")]
    P1080,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P720 => "720p",
            Self::P1080 => "1080p",
        }
    }

    /// The only duration this tier supports, if constrained.
    pub fn locked_duration(&self) -> Option<ShotDuration> {
        match self {
            Self::P720 => None,
            Self::P1080 => Some(ShotDuration::Eight),
        }
    }
}

impl FromStr for Resolution {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "720p" => Ok(Self::P720),
            "1080p" => Ok(Self::P1080),
            other => Err(ProjectError::serialization(format!(
                "unknown resolution '{other}'"
            ))),
        }
    }
}

scalar_enum!(Resolution, "a resolution tier");

/// Frame aspect ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "16:9" => Ok(Self::Landscape),
            "9:16" => Ok(Self::Portrait),
            other => Err(ProjectError::serialization(format!(
                "unknown aspect ratio '{other}'"
            ))),
        }
    }
}

scalar_enum!(AspectRatio, "an aspect ratio");

/// Shot length in seconds. The generation backend accepts 4, 6 or 8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum ShotDuration {
    Four,
    Six,
    #[default]
    Eight,
}

impl ShotDuration {
    pub fn seconds(&self) -> u32 {
        match self {
            Self::Four => 4,
            Self::Six => 6,
            Self::Eight => 8,
        }
    }
}

impl From<ShotDuration> for i64 {
    fn from(value: ShotDuration) -> Self {
        value.seconds() as i64
    }
}

impl TryFrom<i64> for ShotDuration {
    type Error = ProjectError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Self::Four),
            6 => Ok(Self::Six),
            8 => Ok(Self::Eight),
            other => Err(ProjectError::UnsupportedDuration(other)),
        }
    }
}

impl fmt::Display for ShotDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds())
    }
}

impl Reconcile for ShotDuration {
    type Key<'a> = NoKey;

    fn reconcile<R: Reconciler>(&self, mut reconciler: R) -> Result<(), R::Error> {
        reconciler.i64(i64::from(*self))
    }
}

impl Hydrate for ShotDuration {
    fn hydrate_int(value: i64) -> Result<Self, HydrateError> {
        Self::try_from(value)
            .map_err(|_| HydrateError::unexpected("a shot duration of 4, 6 or 8", value.to_string()))
    }

    fn hydrate_uint(value: u64) -> Result<Self, HydrateError> {
        Self::hydrate_int(value as i64)
    }
}

/// Pipeline stage reported by the generation orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    #[default]
    Idle,
    Uploading,
    GeneratingShots,
    GeneratingVoice,
    Assembling,
    Completed,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Uploading => "uploading",
            Self::GeneratingShots => "generating_shots",
            Self::GeneratingVoice => "generating_voice",
            Self::Assembling => "assembling",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// True for stages the pipeline can never leave.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl FromStr for PipelineStage {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "uploading" => Ok(Self::Uploading),
            "generating_shots" => Ok(Self::GeneratingShots),
            "generating_voice" => Ok(Self::GeneratingVoice),
            "assembling" => Ok(Self::Assembling),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(ProjectError::serialization(format!(
                "unknown pipeline stage '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SHOT
// =============================================================================

/// A single independently configured video segment.
#[derive(Debug, Clone, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Shot {
    /// Unique identifier.
    pub id: String,
    /// Dense timeline position, 0..N-1, mirrors the position in the shot list.
    pub order: i32,

    pub prompt: String,
    pub negative_prompt: String,
    pub duration: ShotDuration,
    pub resolution: Resolution,
    pub aspect_ratio: AspectRatio,

    /// Reference images guiding generation, at most [`MAX_REFERENCE_IMAGES`].
    pub reference_images: Vec<String>,
    /// Pinned first frame image.
    pub first_frame: Option<String>,
    /// Pinned last frame image.
    pub last_frame: Option<String>,

    /// Result of a completed generation.
    pub generated_video_url: Option<String>,
    pub thumbnail_url: Option<String>,

    pub status: GenerationStatus,
    /// Generation progress, 0..=100.
    pub progress: i32,
    pub error: Option<String>,
}

impl Shot {
    /// Creates a draft shot with default generation settings.
    pub fn new(id: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            order,
            prompt: String::new(),
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
            duration: ShotDuration::Eight,
            resolution: Resolution::P1080,
            aspect_ratio: AspectRatio::Landscape,
            reference_images: Vec::new(),
            first_frame: None,
            last_frame: None,
            generated_video_url: None,
            thumbnail_url: None,
            status: GenerationStatus::Draft,
            progress: 0,
            error: None,
        }
    }

    /// Builder: Set prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Builder: Set negative prompt.
    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = negative_prompt.into();
        self
    }

    /// Builder: Set duration.
    pub fn with_duration(mut self, duration: ShotDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Builder: Set resolution.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Builder: Set aspect ratio.
    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Checks the cross-field invariants of this shot.
    pub fn validate(&self) -> Result<(), ProjectError> {
        if let Some(required) = self.resolution.locked_duration() {
            if self.duration != required {
                return Err(ProjectError::ResolutionDurationMismatch {
                    resolution: self.resolution,
                    required: required.seconds(),
                    requested: self.duration.seconds(),
                });
            }
        }
        if self.reference_images.len() > MAX_REFERENCE_IMAGES {
            return Err(ProjectError::ReferenceImageLimit {
                max: MAX_REFERENCE_IMAGES,
            });
        }
        Ok(())
    }

    /// Drops all generation results, returning the shot to draft.
    pub(crate) fn clear_generation_state(&mut self) {
        self.status = GenerationStatus::Draft;
        self.progress = 0;
        self.generated_video_url = None;
        self.thumbnail_url = None;
        self.error = None;
    }
}

impl Default for Shot {
    fn default() -> Self {
        Self::new("", 0)
    }
}

// =============================================================================
// VOICEOVER
// =============================================================================

/// The single narration track of a project.
#[derive(Debug, Clone, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Voiceover {
    pub script: String,
    pub voice_id: String,
    pub voice_name: String,

    /// Synthesis settings, each a fraction in [0, 1].
    pub stability: f64,
    pub similarity_boost: f64,
    pub style: f64,
    pub use_speaker_boost: bool,

    pub status: GenerationStatus,
    /// Synthesis progress, 0..=100.
    pub progress: i32,
    pub generated_audio_url: Option<String>,
    pub error: Option<String>,
}

impl Voiceover {
    /// Builder: Set script.
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }

    /// Builder: Set voice.
    pub fn with_voice(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.voice_id = id.into();
        self.voice_name = name.into();
        self
    }

    /// Drops synthesis results, returning the voiceover to draft.
    pub(crate) fn clear_generation_state(&mut self) {
        self.status = GenerationStatus::Draft;
        self.progress = 0;
        self.generated_audio_url = None;
        self.error = None;
    }
}

impl Default for Voiceover {
    fn default() -> Self {
        Self {
            script: String::new(),
            // The catalog's "charlotte" voice.
            voice_id: "XB0fDUnXU5powFXDhCwa".to_string(),
            voice_name: "charlotte".to_string(),
            stability: 0.7,
            similarity_boost: 0.8,
            style: 0.5,
            use_speaker_boost: true,
            status: GenerationStatus::Draft,
            progress: 0,
            generated_audio_url: None,
            error: None,
        }
    }
}

// =============================================================================
// BRAND KIT
// =============================================================================

/// Presentation metadata attached to a project. Pass-through, no computation.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrandKit {
    pub name: String,
    pub tagline: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub logo_url: Option<String>,
}

impl BrandKit {
    /// Builder: Set name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: Set tagline.
    pub fn with_tagline(mut self, tagline: impl Into<String>) -> Self {
        self.tagline = tagline.into();
        self
    }
}

// =============================================================================
// PROJECT ROOT
// =============================================================================

/// Root document: one advertisement project.
///
/// The project exclusively owns its shots and voiceover; outside code reaches
/// them only by id through the store.
#[derive(Debug, Clone, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdProject {
    pub id: String,
    pub name: String,
    pub brand: BrandKit,
    /// Ordered shot timeline. Never empty.
    pub shots: Vec<Shot>,
    pub voiceover: Voiceover,
    pub final_video_url: Option<String>,
    pub status: ProjectStatus,
    /// Timestamps in milliseconds since epoch.
    pub created_at: i64,
    pub updated_at: i64,
}

impl AdProject {
    /// Creates an empty project shell with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: "Untitled Ad".to_string(),
            brand: BrandKit::default(),
            shots: Vec::new(),
            voiceover: Voiceover::default(),
            final_video_url: None,
            status: ProjectStatus::Draft,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Builder: Set name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Looks up a shot by id.
    pub fn shot(&self, id: &str) -> Option<&Shot> {
        self.shots.iter().find(|s| s.id == id)
    }
}

impl Default for AdProject {
    fn default() -> Self {
        Self::new("")
    }
}

// =============================================================================
// GENERATION PROGRESS
// =============================================================================

/// Pipeline status reported by the orchestrator.
///
/// Ephemeral: held by the store next to the document, never persisted with
/// the project, and reset to idle whenever the project resets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationProgress {
    pub stage: PipelineStage,
    /// 1-based index of the shot currently generating.
    pub current_shot: Option<u32>,
    pub total_shots: Option<u32>,
    /// Progress of the current shot, 0..=100.
    pub shot_progress: Option<i32>,
    pub message: String,
    pub eta_seconds: Option<u32>,
}

impl GenerationProgress {
    /// The idle state reported before any pipeline run.
    pub fn idle() -> Self {
        Self::default()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shot_defaults() {
        let shot = Shot::new("shot-1", 0);
        assert_eq!(shot.duration, ShotDuration::Eight);
        assert_eq!(shot.resolution, Resolution::P1080);
        assert_eq!(shot.aspect_ratio, AspectRatio::Landscape);
        assert_eq!(shot.status, GenerationStatus::Draft);
        assert_eq!(shot.progress, 0);
        assert_eq!(shot.negative_prompt, DEFAULT_NEGATIVE_PROMPT);
        assert!(shot.validate().is_ok());
    }

    #[test]
    fn test_shot_builder() {
        let shot = Shot::new("shot-1", 2)
            .with_prompt("Crystal perfume bottle in morning mist")
            .with_resolution(Resolution::P720)
            .with_duration(ShotDuration::Four);

        assert_eq!(shot.order, 2);
        assert_eq!(shot.prompt, "Crystal perfume bottle in morning mist");
        assert!(shot.validate().is_ok());
    }

    #[test]
    fn test_shot_validate_resolution_coupling() {
        let shot = Shot::new("shot-1", 0).with_duration(ShotDuration::Four);
        let err = shot.validate().unwrap_err();
        assert!(matches!(
            err,
            ProjectError::ResolutionDurationMismatch {
                resolution: Resolution::P1080,
                required: 8,
                requested: 4,
            }
        ));
    }

    #[test]
    fn test_shot_validate_reference_image_cap() {
        let mut shot = Shot::new("shot-1", 0);
        shot.reference_images = vec!["a".into(), "b".into(), "c".into()];
        assert!(shot.validate().is_ok());

        shot.reference_images.push("d".into());
        assert!(matches!(
            shot.validate(),
            Err(ProjectError::ReferenceImageLimit { max: 3 })
        ));
    }

    #[test]
    fn test_duration_conversions() {
        assert_eq!(ShotDuration::try_from(6).unwrap(), ShotDuration::Six);
        assert_eq!(i64::from(ShotDuration::Eight), 8);
        assert!(matches!(
            ShotDuration::try_from(5),
            Err(ProjectError::UnsupportedDuration(5))
        ));
    }

    #[test]
    fn test_enum_string_round_trips() {
        for status in [
            GenerationStatus::Draft,
            GenerationStatus::Queued,
            GenerationStatus::Generating,
            GenerationStatus::Completed,
            GenerationStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<GenerationStatus>().unwrap(), status);
        }

        assert_eq!("720p".parse::<Resolution>().unwrap(), Resolution::P720);
        assert_eq!("9:16".parse::<AspectRatio>().unwrap(), AspectRatio::Portrait);
        assert_eq!(
            "generating_shots".parse::<PipelineStage>().unwrap(),
            PipelineStage::GeneratingShots
        );
        assert!("4k".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_serde_wire_names() {
        let shot = Shot::new("shot-1", 0);
        let json = serde_json::to_value(&shot).unwrap();
        assert_eq!(json["resolution"], "1080p");
        assert_eq!(json["aspect_ratio"], "16:9");
        assert_eq!(json["duration"], 8);
        assert_eq!(json["status"], "draft");
    }

    #[test]
    fn test_voiceover_defaults() {
        let vo = Voiceover::default();
        assert_eq!(vo.voice_name, "charlotte");
        assert_eq!(vo.stability, 0.7);
        assert_eq!(vo.similarity_boost, 0.8);
        assert_eq!(vo.style, 0.5);
        assert!(vo.use_speaker_boost);
        assert_eq!(vo.status, GenerationStatus::Draft);
    }

    #[test]
    fn test_project_shot_lookup() {
        let mut project = AdProject::new("proj-1").with_name("Launch Teaser");
        project.shots.push(Shot::new("shot-1", 0));
        project.shots.push(Shot::new("shot-2", 1));

        assert_eq!(project.shot("shot-2").map(|s| s.order), Some(1));
        assert!(project.shot("missing").is_none());
    }

    #[test]
    fn test_pipeline_stage_terminal() {
        assert!(PipelineStage::Completed.is_terminal());
        assert!(PipelineStage::Failed.is_terminal());
        assert!(!PipelineStage::GeneratingShots.is_terminal());
        assert!(!PipelineStage::Idle.is_terminal());
    }
}
