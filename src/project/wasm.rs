//! WASM bindings for the ad project module.
//!
//! This module provides JavaScript-friendly wrappers around the
//! ProjectStore for use in browser environments. Closure-based editing
//! operations surface here as per-field setters, which is what a UI binds
//! to anyway.

use js_sys::{Array, Uint8Array};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use std::str::FromStr;
use wasm_bindgen::prelude::*;

use crate::error::ProjectError;
use crate::estimate::CostRates;
use crate::pipeline::PipelineEvent;
use crate::progress;
use crate::project::model::{
    AdProject, GenerationProgress, GenerationStatus, ProjectStatus, ShotDuration,
};
use crate::project::store::ProjectStore;

/// Serialize a value to JsValue with HashMaps as plain JS objects (not Map).
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

/// Parses an enum carried across the boundary as its canonical string.
fn parse<T: FromStr<Err = ProjectError>>(value: &str) -> Result<T, JsValue> {
    value
        .parse()
        .map_err(|e: ProjectError| JsValue::from_str(&e.to_string()))
}

// =============================================================================
// ERROR CONVERSION
// =============================================================================

/// Helper macro for Result conversion
macro_rules! js_result {
    ($expr:expr) => {
        $expr.map_err(|e: ProjectError| JsValue::from_str(&e.to_string()))
    };
}

// =============================================================================
// MAIN WRAPPER TYPE
// =============================================================================

/// JavaScript-friendly wrapper around ProjectStore.
///
/// This provides the advertisement project document manager for use from
/// JavaScript/TypeScript in the browser.
#[wasm_bindgen]
pub struct JsProjectStore {
    inner: ProjectStore,
}

#[wasm_bindgen]
impl JsProjectStore {
    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Creates a store holding a fresh default project.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const store = new JsProjectStore();
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsProjectStore {
        JsProjectStore {
            inner: ProjectStore::new(),
        }
    }

    /// Loads from binary bytes (Uint8Array).
    #[wasm_bindgen(js_name = fromBytes)]
    pub fn from_bytes(bytes: &[u8]) -> Result<JsProjectStore, JsValue> {
        let inner = js_result!(ProjectStore::from_bytes(bytes))?;
        Ok(JsProjectStore { inner })
    }

    /// Builds a store from a plain project object.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const store = JsProjectStore.fromProject(JSON.parse(saved));
    /// ```
    #[wasm_bindgen(js_name = fromProject)]
    pub fn from_project(project: JsValue) -> Result<JsProjectStore, JsValue> {
        let project: AdProject = from_value(project)?;
        let inner = js_result!(ProjectStore::from_project(project))?;
        Ok(JsProjectStore { inner })
    }

    /// Saves to binary bytes (returns Uint8Array).
    #[wasm_bindgen(js_name = toBytes)]
    pub fn to_bytes(&mut self) -> Uint8Array {
        let bytes = self.inner.save();
        Uint8Array::from(&bytes[..])
    }

    /// Gets the actor ID for this document instance.
    #[wasm_bindgen(js_name = actorId)]
    pub fn actor_id(&self) -> String {
        self.inner.actor_id()
    }

    /// Gets the current document heads.
    #[wasm_bindgen(js_name = getHeads)]
    pub fn get_heads(&mut self) -> Array {
        let heads = self.inner.get_heads();
        heads
            .into_iter()
            .map(|h| JsValue::from_str(&h.to_string()))
            .collect()
    }

    // =========================================================================
    // STATE ACCESS
    // =========================================================================

    /// Gets the full project aggregate as a JavaScript object.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const project = store.getState();
    /// console.log(project.shots.map(s => s.prompt));
    /// ```
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&mut self) -> Result<JsValue, JsValue> {
        let state = js_result!(self.inner.get_state())?;
        Ok(to_js_value(&state)?)
    }

    /// Gets a shot by id, or undefined.
    #[wasm_bindgen(js_name = getShot)]
    pub fn get_shot(&mut self, id: &str) -> Result<JsValue, JsValue> {
        let shot = js_result!(self.inner.get_shot(id))?;
        Ok(to_js_value(&shot)?)
    }

    /// Gets the currently selected shot, or undefined.
    #[wasm_bindgen(js_name = getSelectedShot)]
    pub fn get_selected_shot(&mut self) -> Result<JsValue, JsValue> {
        let shot = js_result!(self.inner.get_selected_shot())?;
        Ok(to_js_value(&shot)?)
    }

    /// Id of the currently selected shot, or undefined.
    #[wasm_bindgen(js_name = selectedShotId)]
    pub fn selected_shot_id(&self) -> Option<String> {
        self.inner.selected_shot_id().map(str::to_string)
    }

    /// Number of shots on the timeline.
    #[wasm_bindgen(js_name = shotCount)]
    pub fn shot_count(&mut self) -> Result<u32, JsValue> {
        Ok(js_result!(self.inner.shot_count())? as u32)
    }

    // =========================================================================
    // PROJECT & BRAND OPERATIONS
    // =========================================================================

    /// Sets the project name (O(1)).
    #[wasm_bindgen(js_name = setProjectName)]
    pub fn set_project_name(&mut self, name: &str) -> Result<(), JsValue> {
        js_result!(self.inner.set_project_name(name))
    }

    /// Sets the brand name.
    #[wasm_bindgen(js_name = setBrandName)]
    pub fn set_brand_name(&mut self, name: String) -> Result<(), JsValue> {
        js_result!(self.inner.update_brand(|brand| brand.name = name))
    }

    /// Sets the brand tagline.
    #[wasm_bindgen(js_name = setBrandTagline)]
    pub fn set_brand_tagline(&mut self, tagline: String) -> Result<(), JsValue> {
        js_result!(self.inner.update_brand(|brand| brand.tagline = tagline))
    }

    /// Sets the brand colors.
    #[wasm_bindgen(js_name = setBrandColors)]
    pub fn set_brand_colors(&mut self, primary: String, secondary: String) -> Result<(), JsValue> {
        js_result!(self.inner.update_brand(|brand| {
            brand.primary_color = primary;
            brand.secondary_color = secondary;
        }))
    }

    /// Sets or clears the brand logo URL.
    #[wasm_bindgen(js_name = setBrandLogoUrl)]
    pub fn set_brand_logo_url(&mut self, logo_url: Option<String>) -> Result<(), JsValue> {
        js_result!(self.inner.update_brand(|brand| brand.logo_url = logo_url))
    }

    // =========================================================================
    // SHOT OPERATIONS
    // =========================================================================

    /// Appends a draft shot and selects it. Returns the new id.
    #[wasm_bindgen(js_name = addShot)]
    pub fn add_shot(&mut self) -> Result<String, JsValue> {
        js_result!(self.inner.add_shot())
    }

    /// Removes a shot (no-op for the last remaining one).
    #[wasm_bindgen(js_name = removeShot)]
    pub fn remove_shot(&mut self, id: &str) -> Result<(), JsValue> {
        js_result!(self.inner.remove_shot(id))
    }

    /// Clones a shot's configuration. Returns the new id, or undefined.
    #[wasm_bindgen(js_name = duplicateShot)]
    pub fn duplicate_shot(&mut self, id: &str) -> Result<Option<String>, JsValue> {
        js_result!(self.inner.duplicate_shot(id))
    }

    /// Moves a shot between timeline positions (splice semantics).
    #[wasm_bindgen(js_name = reorderShots)]
    pub fn reorder_shots(&mut self, from: u32, to: u32) -> Result<(), JsValue> {
        js_result!(self.inner.reorder_shots(from as usize, to as usize))
    }

    /// Changes the selection (pass undefined to clear).
    #[wasm_bindgen(js_name = selectShot)]
    pub fn select_shot(&mut self, id: Option<String>) {
        self.inner.select_shot(id.as_deref());
    }

    /// Sets the shot prompt.
    #[wasm_bindgen(js_name = setShotPrompt)]
    pub fn set_shot_prompt(&mut self, id: &str, prompt: String) -> Result<(), JsValue> {
        js_result!(self.inner.update_shot(id, |shot| shot.prompt = prompt))
    }

    /// Sets the shot negative prompt.
    #[wasm_bindgen(js_name = setShotNegativePrompt)]
    pub fn set_shot_negative_prompt(&mut self, id: &str, prompt: String) -> Result<(), JsValue> {
        js_result!(self
            .inner
            .update_shot(id, |shot| shot.negative_prompt = prompt))
    }

    /// Sets the shot duration in seconds (4, 6 or 8). Rejected when the
    /// shot's resolution tier locks the duration.
    #[wasm_bindgen(js_name = setShotDuration)]
    pub fn set_shot_duration(&mut self, id: &str, seconds: u32) -> Result<(), JsValue> {
        let duration = js_result!(ShotDuration::try_from(seconds as i64))?;
        js_result!(self.inner.update_shot(id, |shot| shot.duration = duration))
    }

    /// Sets the shot resolution tier ("720p" or "1080p"). When moving to
    /// 1080p the duration must already be 8 seconds; change both in the UI
    /// by calling setShotDuration first.
    #[wasm_bindgen(js_name = setShotResolution)]
    pub fn set_shot_resolution(&mut self, id: &str, resolution: &str) -> Result<(), JsValue> {
        let resolution = parse(resolution)?;
        js_result!(self
            .inner
            .update_shot(id, |shot| shot.resolution = resolution))
    }

    /// Sets the shot aspect ratio ("16:9" or "9:16").
    #[wasm_bindgen(js_name = setShotAspectRatio)]
    pub fn set_shot_aspect_ratio(&mut self, id: &str, aspect_ratio: &str) -> Result<(), JsValue> {
        let aspect_ratio = parse(aspect_ratio)?;
        js_result!(self
            .inner
            .update_shot(id, |shot| shot.aspect_ratio = aspect_ratio))
    }

    /// Appends a reference image (at most 3 per shot).
    #[wasm_bindgen(js_name = addImageToShot)]
    pub fn add_image_to_shot(&mut self, id: &str, image: &str) -> Result<(), JsValue> {
        js_result!(self.inner.add_image_to_shot(id, image))
    }

    /// Removes a reference image.
    #[wasm_bindgen(js_name = removeImageFromShot)]
    pub fn remove_image_from_shot(&mut self, id: &str, image: &str) -> Result<(), JsValue> {
        js_result!(self.inner.remove_image_from_shot(id, image))
    }

    /// Sets or clears the pinned first frame.
    #[wasm_bindgen(js_name = setFirstFrame)]
    pub fn set_first_frame(&mut self, id: &str, image: Option<String>) -> Result<(), JsValue> {
        js_result!(self.inner.set_first_frame(id, image.as_deref()))
    }

    /// Sets or clears the pinned last frame.
    #[wasm_bindgen(js_name = setLastFrame)]
    pub fn set_last_frame(&mut self, id: &str, image: Option<String>) -> Result<(), JsValue> {
        js_result!(self.inner.set_last_frame(id, image.as_deref()))
    }

    // =========================================================================
    // VOICEOVER OPERATIONS
    // =========================================================================

    /// Sets the narration script.
    #[wasm_bindgen(js_name = setVoiceoverScript)]
    pub fn set_voiceover_script(&mut self, script: String) -> Result<(), JsValue> {
        js_result!(self.inner.update_voiceover(|vo| vo.script = script))
    }

    /// Selects a narration voice.
    #[wasm_bindgen(js_name = setVoiceoverVoice)]
    pub fn set_voiceover_voice(&mut self, voice_id: String, voice_name: String) -> Result<(), JsValue> {
        js_result!(self.inner.update_voiceover(|vo| {
            vo.voice_id = voice_id;
            vo.voice_name = voice_name;
        }))
    }

    /// Sets the synthesis settings (fractions clamped to [0, 1]).
    #[wasm_bindgen(js_name = setVoiceoverSettings)]
    pub fn set_voiceover_settings(
        &mut self,
        stability: f64,
        similarity_boost: f64,
        style: f64,
        use_speaker_boost: bool,
    ) -> Result<(), JsValue> {
        js_result!(self.inner.update_voiceover(|vo| {
            vo.stability = stability;
            vo.similarity_boost = similarity_boost;
            vo.style = style;
            vo.use_speaker_boost = use_speaker_boost;
        }))
    }

    // =========================================================================
    // GENERATION REPORTING
    // =========================================================================

    /// Replaces the pipeline status snapshot.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// store.setGenerationProgress({
    ///   stage: 'generating_shots',
    ///   current_shot: 2,
    ///   total_shots: 4,
    ///   shot_progress: 50,
    ///   message: 'Generating shot 2 of 4',
    /// });
    /// ```
    #[wasm_bindgen(js_name = setGenerationProgress)]
    pub fn set_generation_progress(&mut self, progress: JsValue) -> Result<(), JsValue> {
        let progress: GenerationProgress = from_value(progress)?;
        self.inner.set_generation_progress(progress);
        Ok(())
    }

    /// Sets a shot's status, progress and error (O(1)).
    #[wasm_bindgen(js_name = setShotStatus)]
    pub fn set_shot_status(
        &mut self,
        id: &str,
        status: &str,
        progress: i32,
        error: Option<String>,
    ) -> Result<(), JsValue> {
        let status: GenerationStatus = parse(status)?;
        js_result!(self
            .inner
            .set_shot_status(id, status, progress, error.as_deref()))
    }

    /// Records a shot's generated video and forces it completed.
    #[wasm_bindgen(js_name = setShotVideoUrl)]
    pub fn set_shot_video_url(
        &mut self,
        id: &str,
        url: &str,
        thumbnail_url: Option<String>,
    ) -> Result<(), JsValue> {
        js_result!(self
            .inner
            .set_shot_video_url(id, url, thumbnail_url.as_deref()))
    }

    /// Sets the voiceover's status, progress and error (O(1)).
    #[wasm_bindgen(js_name = setVoiceoverStatus)]
    pub fn set_voiceover_status(
        &mut self,
        status: &str,
        progress: i32,
        error: Option<String>,
    ) -> Result<(), JsValue> {
        let status: GenerationStatus = parse(status)?;
        js_result!(self
            .inner
            .set_voiceover_status(status, progress, error.as_deref()))
    }

    /// Records the synthesized narration and forces it completed.
    #[wasm_bindgen(js_name = setVoiceoverAudioUrl)]
    pub fn set_voiceover_audio_url(&mut self, url: &str) -> Result<(), JsValue> {
        js_result!(self.inner.set_voiceover_audio_url(url))
    }

    /// Sets the project status (O(1)).
    #[wasm_bindgen(js_name = setProjectStatus)]
    pub fn set_project_status(&mut self, status: &str) -> Result<(), JsValue> {
        let status: ProjectStatus = parse(status)?;
        js_result!(self.inner.set_project_status(status))
    }

    /// Records the assembled advertisement and completes the project.
    #[wasm_bindgen(js_name = setFinalVideoUrl)]
    pub fn set_final_video_url(&mut self, url: &str) -> Result<(), JsValue> {
        js_result!(self.inner.set_final_video_url(url))
    }

    /// Replaces the aggregate with a fresh default project.
    #[wasm_bindgen(js_name = resetProject)]
    pub fn reset_project(&mut self) -> Result<(), JsValue> {
        js_result!(self.inner.reset_project())
    }

    /// Applies one reporting delta (see PipelineEvent).
    ///
    /// # Example (JavaScript)
    /// ```js
    /// store.applyEvent({ type: 'shot_video_ready', shot_id: id, video_url: url });
    /// ```
    #[wasm_bindgen(js_name = applyEvent)]
    pub fn apply_event(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event: PipelineEvent = from_value(event)?;
        js_result!(self.inner.apply_event(event))
    }

    // =========================================================================
    // DERIVED READS
    // =========================================================================

    /// Total advertisement length in seconds.
    #[wasm_bindgen(js_name = totalDuration)]
    pub fn total_duration(&mut self) -> Result<u32, JsValue> {
        js_result!(self.inner.total_duration())
    }

    /// Estimated generation cost under the default rates.
    #[wasm_bindgen(js_name = estimatedCost)]
    pub fn estimated_cost(&mut self) -> Result<f64, JsValue> {
        js_result!(self.inner.estimated_cost(&CostRates::default()))
    }

    /// Estimated generation cost under caller-supplied rates.
    #[wasm_bindgen(js_name = estimatedCostWith)]
    pub fn estimated_cost_with(&mut self, rates: JsValue) -> Result<f64, JsValue> {
        let rates: CostRates = from_value(rates)?;
        js_result!(self.inner.estimated_cost(&rates))
    }

    /// Last reported pipeline status as a JavaScript object.
    #[wasm_bindgen(js_name = getGenerationProgress)]
    pub fn get_generation_progress(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(self.inner.generation_progress())?)
    }

    /// Weighted overall percentage for the last reported status.
    #[wasm_bindgen(js_name = overallPercent)]
    pub fn overall_percent(&self) -> u8 {
        progress::overall_percent(self.inner.generation_progress())
    }

    /// Classification of one pipeline step ("pending" | "active" |
    /// "completed" | "failed") for the last reported status.
    #[wasm_bindgen(js_name = stepStatus)]
    pub fn step_status(&self, step: &str) -> Result<String, JsValue> {
        let step: progress::PipelineStep = parse(step)?;
        Ok(progress::step_status(self.inner.generation_progress().stage, step)
            .as_str()
            .to_string())
    }
}

impl Default for JsProjectStore {
    fn default() -> Self {
        Self::new()
    }
}
