//! ProjectStore implementation with hybrid operations pattern.
//!
//! This module provides the main `ProjectStore` struct that wraps an Automerge
//! document holding one [`AdProject`] and provides:
//! - Editing operations via autosurgeon (hydrate/reconcile) closures, with
//!   cross-field invariants checked before anything is committed
//! - Targeted O(1) updates via direct put operations for the high-frequency
//!   generation-reporting fields (status, progress)
//! - Ephemeral state that rides next to the document: the current shot
//!   selection and the pipeline status reported by the orchestrator

use automerge::{
    transaction::Transactable, AutoCommit, ChangeHash, ObjId, ReadDoc, ScalarValue, Value, ROOT,
};
use autosurgeon::{hydrate, reconcile};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ProjectError, ProjectResult};
use crate::estimate::{self, CostRates};
use crate::pipeline::PipelineEvent;
use crate::project::model::{
    AdProject, BrandKit, GenerationProgress, GenerationStatus, ProjectStatus, Shot, Voiceover,
    MAX_REFERENCE_IMAGES,
};

#[cfg(feature = "wasm")]
fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

#[cfg(not(feature = "wasm"))]
fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Assigns each shot's `order` from its list position.
fn reindex(shots: &mut [Shot]) {
    for (idx, shot) in shots.iter_mut().enumerate() {
        shot.order = idx as i32;
    }
}

/// A fresh default project: one draft shot, timestamps set to now.
fn fresh_project() -> AdProject {
    let now = now_ms();
    let mut project = AdProject::new(Uuid::new_v4().to_string());
    project.created_at = now;
    project.updated_at = now;
    project.shots.push(Shot::new(Uuid::new_v4().to_string(), 0));
    project
}

/// Shot fields owned by the generation-reporting operations. Editing closures
/// cannot change them; whatever they write is reverted before commit.
struct ReservedShotFields {
    id: String,
    order: i32,
    status: GenerationStatus,
    progress: i32,
    generated_video_url: Option<String>,
    thumbnail_url: Option<String>,
    error: Option<String>,
}

impl ReservedShotFields {
    fn capture(shot: &Shot) -> Self {
        Self {
            id: shot.id.clone(),
            order: shot.order,
            status: shot.status,
            progress: shot.progress,
            generated_video_url: shot.generated_video_url.clone(),
            thumbnail_url: shot.thumbnail_url.clone(),
            error: shot.error.clone(),
        }
    }

    fn restore(self, shot: &mut Shot) {
        shot.id = self.id;
        shot.order = self.order;
        shot.status = self.status;
        shot.progress = self.progress;
        shot.generated_video_url = self.generated_video_url;
        shot.thumbnail_url = self.thumbnail_url;
        shot.error = self.error;
    }
}

/// Voiceover counterpart of [`ReservedShotFields`].
struct ReservedVoiceFields {
    status: GenerationStatus,
    progress: i32,
    generated_audio_url: Option<String>,
    error: Option<String>,
}

impl ReservedVoiceFields {
    fn capture(voiceover: &Voiceover) -> Self {
        Self {
            status: voiceover.status,
            progress: voiceover.progress,
            generated_audio_url: voiceover.generated_audio_url.clone(),
            error: voiceover.error.clone(),
        }
    }

    fn restore(self, voiceover: &mut Voiceover) {
        voiceover.status = self.status;
        voiceover.progress = self.progress;
        voiceover.generated_audio_url = self.generated_audio_url;
        voiceover.error = self.error;
    }
}

// =============================================================================
// PROJECT STORE
// =============================================================================

/// Sole owner of the [`AdProject`] aggregate plus the current selection and
/// pipeline status.
///
/// Every operation is a synchronous, atomic call: either the whole mutation
/// lands (and `updated_at` is bumped) or the state is left untouched.
/// Operations given an unknown id are silent no-ops; domain-invariant
/// violations come back as the specific [`ProjectError`] variant.
pub struct ProjectStore {
    doc: AutoCommit,
    /// Cached hydrated state - invalidated after direct document mutations.
    cached_state: Option<AdProject>,
    /// Ephemeral: which shot the presentation layer has focused.
    selected_shot_id: Option<String>,
    /// Ephemeral: last pipeline status reported by the orchestrator.
    progress: GenerationProgress,
}

impl ProjectStore {
    // =========================================================================
    // INITIALIZATION & PERSISTENCE BOUNDARY
    // =========================================================================

    /// Creates a store holding a fresh default project (one draft shot).
    pub fn new() -> Self {
        let mut doc = AutoCommit::new();
        let project = fresh_project();
        reconcile(&mut doc, &project).expect("Failed to initialize document");
        Self {
            doc,
            cached_state: Some(project),
            selected_shot_id: None,
            progress: GenerationProgress::idle(),
        }
    }

    /// Creates a ProjectStore from saved binary data.
    pub fn from_bytes(bytes: &[u8]) -> ProjectResult<Self> {
        let doc = AutoCommit::load(bytes)?;
        Ok(Self {
            doc,
            cached_state: None,
            selected_shot_id: None,
            progress: GenerationProgress::idle(),
        })
    }

    /// Creates a ProjectStore from a deserialized project aggregate.
    pub fn from_project(project: AdProject) -> ProjectResult<Self> {
        let mut doc = AutoCommit::new();
        reconcile(&mut doc, &project)?;
        Ok(Self {
            doc,
            cached_state: Some(project),
            selected_shot_id: None,
            progress: GenerationProgress::idle(),
        })
    }

    /// Saves the document to binary format.
    pub fn save(&mut self) -> Vec<u8> {
        self.doc.save()
    }

    /// Returns the current heads of the document.
    pub fn get_heads(&mut self) -> Vec<ChangeHash> {
        self.doc.get_heads()
    }

    /// Gets the actor ID for this document instance.
    pub fn actor_id(&self) -> String {
        self.doc.get_actor().to_hex_string()
    }

    // =========================================================================
    // STATE ACCESS
    // =========================================================================

    /// Hydrates the project aggregate to Rust structs.
    pub fn get_state(&mut self) -> ProjectResult<AdProject> {
        if let Some(ref cached) = self.cached_state {
            return Ok(cached.clone());
        }
        let state: AdProject = hydrate(&self.doc)?;
        self.cached_state = Some(state.clone());
        Ok(state)
    }

    /// Applies a mutation to the state, bumps `updated_at`, and reconciles
    /// back to the document. The closure returns whether anything changed;
    /// a `false` leaves the document (and `updated_at`) untouched.
    fn update_state<F>(&mut self, f: F) -> ProjectResult<bool>
    where
        F: FnOnce(&mut AdProject) -> bool,
    {
        self.try_update_state(|state| Ok(f(state)))
    }

    /// Fallible variant of [`Self::update_state`]. An `Err` from the closure
    /// aborts the mutation with the document untouched.
    fn try_update_state<F>(&mut self, f: F) -> ProjectResult<bool>
    where
        F: FnOnce(&mut AdProject) -> ProjectResult<bool>,
    {
        let mut state = self.get_state()?;
        if !f(&mut state)? {
            return Ok(false);
        }
        state.updated_at = now_ms();
        reconcile(&mut self.doc, &state)?;
        self.cached_state = Some(state);
        Ok(true)
    }

    /// Bumps `updated_at` after a direct document mutation.
    fn touch(&mut self) -> ProjectResult<()> {
        self.doc
            .put(&ROOT, "updated_at", ScalarValue::Int(now_ms()))?;
        Ok(())
    }

    // =========================================================================
    // PROJECT & BRAND OPERATIONS
    // =========================================================================

    /// Sets the project name (O(1)).
    pub fn set_project_name(&mut self, name: &str) -> ProjectResult<()> {
        self.cached_state = None;
        self.doc.put(&ROOT, "name", ScalarValue::Str(name.into()))?;
        self.touch()
    }

    /// Merges fields into the brand kit.
    pub fn update_brand<F>(&mut self, f: F) -> ProjectResult<()>
    where
        F: FnOnce(&mut BrandKit),
    {
        self.update_state(|state| {
            f(&mut state.brand);
            true
        })?;
        Ok(())
    }

    // =========================================================================
    // SHOT OPERATIONS
    // =========================================================================

    /// Appends a draft shot with default settings and selects it.
    /// Returns the new shot's id.
    pub fn add_shot(&mut self) -> ProjectResult<String> {
        let id = Uuid::new_v4().to_string();
        let shot_id = id.clone();
        self.update_state(|state| {
            let order = state.shots.len() as i32;
            state.shots.push(Shot::new(shot_id, order));
            true
        })?;
        self.selected_shot_id = Some(id.clone());
        debug!(shot = %id, "added shot");
        Ok(id)
    }

    /// Removes a shot and reindexes the survivors.
    ///
    /// The last remaining shot can never be removed; that call (and any call
    /// with an unknown id) is a no-op. If the removed shot was selected, the
    /// selection moves to the new first shot.
    pub fn remove_shot(&mut self, id: &str) -> ProjectResult<()> {
        let mut removed = false;
        self.update_state(|state| {
            if state.shots.len() <= 1 {
                warn!(shot = %id, "refusing to remove the last shot");
                return false;
            }
            let pos = match state.shots.iter().position(|s| s.id == id) {
                Some(pos) => pos,
                None => return false,
            };
            state.shots.remove(pos);
            reindex(&mut state.shots);
            removed = true;
            true
        })?;
        if removed {
            if self.selected_shot_id.as_deref() == Some(id) {
                self.selected_shot_id = self.get_state()?.shots.first().map(|s| s.id.clone());
            }
            debug!(shot = %id, "removed shot");
        }
        Ok(())
    }

    /// Merges fields into a shot.
    ///
    /// Generation state (`status`, `progress`, result URLs, `error`) plus
    /// `id` and `order` are reserved for the reporting operations; whatever
    /// the closure writes to them is reverted. The merged shot is validated
    /// and an invariant violation aborts the whole edit.
    pub fn update_shot<F>(&mut self, id: &str, f: F) -> ProjectResult<()>
    where
        F: FnOnce(&mut Shot),
    {
        self.try_update_state(|state| {
            let shot = match state.shots.iter_mut().find(|s| s.id == id) {
                Some(shot) => shot,
                None => return Ok(false),
            };
            let reserved = ReservedShotFields::capture(shot);
            f(shot);
            reserved.restore(shot);
            shot.validate()?;
            Ok(true)
        })?;
        Ok(())
    }

    /// Moves the shot at `from` so it ends up at index `to`, list-splice
    /// style: the element is removed first and `to` addresses the shortened
    /// list. Orders are reassigned from the final positions.
    pub fn reorder_shots(&mut self, from: usize, to: usize) -> ProjectResult<()> {
        self.update_state(|state| {
            if from >= state.shots.len() || from == to {
                return false;
            }
            let shot = state.shots.remove(from);
            let target = to.min(state.shots.len());
            state.shots.insert(target, shot);
            reindex(&mut state.shots);
            true
        })?;
        Ok(())
    }

    /// Clones a shot's configuration into a new draft appended at the end.
    /// Generation results do not travel with the copy. Returns the new id,
    /// or `None` if the source was not found.
    pub fn duplicate_shot(&mut self, id: &str) -> ProjectResult<Option<String>> {
        let mut new_id = None;
        self.update_state(|state| {
            let source = match state.shots.iter().find(|s| s.id == id) {
                Some(shot) => shot.clone(),
                None => return false,
            };
            let mut copy = source;
            copy.id = Uuid::new_v4().to_string();
            copy.order = state.shots.len() as i32;
            copy.clear_generation_state();
            new_id = Some(copy.id.clone());
            state.shots.push(copy);
            true
        })?;
        Ok(new_id)
    }

    /// Changes the selection. Pure; nothing else moves.
    pub fn select_shot(&mut self, id: Option<&str>) {
        self.selected_shot_id = id.map(str::to_string);
    }

    /// Appends a reference image to a shot. At most
    /// [`MAX_REFERENCE_IMAGES`] images fit; the overflow call is rejected.
    pub fn add_image_to_shot(&mut self, id: &str, image: &str) -> ProjectResult<()> {
        self.try_update_state(|state| {
            let shot = match state.shots.iter_mut().find(|s| s.id == id) {
                Some(shot) => shot,
                None => return Ok(false),
            };
            if shot.reference_images.len() >= MAX_REFERENCE_IMAGES {
                return Err(ProjectError::ReferenceImageLimit {
                    max: MAX_REFERENCE_IMAGES,
                });
            }
            shot.reference_images.push(image.to_string());
            Ok(true)
        })?;
        Ok(())
    }

    /// Removes every occurrence of `image` from a shot's reference images.
    pub fn remove_image_from_shot(&mut self, id: &str, image: &str) -> ProjectResult<()> {
        self.update_state(|state| {
            let shot = match state.shots.iter_mut().find(|s| s.id == id) {
                Some(shot) => shot,
                None => return false,
            };
            let before = shot.reference_images.len();
            shot.reference_images.retain(|img| img != image);
            shot.reference_images.len() != before
        })?;
        Ok(())
    }

    /// Sets or clears a shot's pinned first frame.
    pub fn set_first_frame(&mut self, id: &str, image: Option<&str>) -> ProjectResult<()> {
        self.update_state(|state| match state.shots.iter_mut().find(|s| s.id == id) {
            Some(shot) => {
                shot.first_frame = image.map(str::to_string);
                true
            }
            None => false,
        })?;
        Ok(())
    }

    /// Sets or clears a shot's pinned last frame.
    pub fn set_last_frame(&mut self, id: &str, image: Option<&str>) -> ProjectResult<()> {
        self.update_state(|state| match state.shots.iter_mut().find(|s| s.id == id) {
            Some(shot) => {
                shot.last_frame = image.map(str::to_string);
                true
            }
            None => false,
        })?;
        Ok(())
    }

    // =========================================================================
    // VOICEOVER OPERATIONS
    // =========================================================================

    /// Merges fields into the voiceover. Synthesis state is reserved the same
    /// way shot generation state is; the fraction settings are clamped to
    /// [0, 1].
    pub fn update_voiceover<F>(&mut self, f: F) -> ProjectResult<()>
    where
        F: FnOnce(&mut Voiceover),
    {
        self.update_state(|state| {
            let reserved = ReservedVoiceFields::capture(&state.voiceover);
            f(&mut state.voiceover);
            reserved.restore(&mut state.voiceover);
            let voiceover = &mut state.voiceover;
            voiceover.stability = voiceover.stability.clamp(0.0, 1.0);
            voiceover.similarity_boost = voiceover.similarity_boost.clamp(0.0, 1.0);
            voiceover.style = voiceover.style.clamp(0.0, 1.0);
            true
        })?;
        Ok(())
    }

    // =========================================================================
    // GENERATION REPORTING (called by the orchestrator, any order, any rate)
    // =========================================================================

    /// Replaces the pipeline status snapshot. Does not touch the project.
    pub fn set_generation_progress(&mut self, progress: GenerationProgress) {
        self.progress = progress;
    }

    /// Merges fields into the pipeline status snapshot.
    pub fn update_progress<F>(&mut self, f: F)
    where
        F: FnOnce(&mut GenerationProgress),
    {
        f(&mut self.progress);
    }

    /// Sets a shot's status, progress and error - exactly those three fields.
    /// Progress is clamped to 0..=100. This is the high-frequency reporting
    /// path, so it uses targeted O(1) puts instead of a full reconcile.
    pub fn set_shot_status(
        &mut self,
        id: &str,
        status: GenerationStatus,
        progress: i32,
        error: Option<&str>,
    ) -> ProjectResult<()> {
        let shot_obj = match self.find_shot_obj(id)? {
            Some(obj) => obj,
            None => return Ok(()),
        };
        self.cached_state = None;
        self.doc
            .put(&shot_obj, "status", ScalarValue::Str(status.as_str().into()))?;
        self.doc.put(
            &shot_obj,
            "progress",
            ScalarValue::Int(progress.clamp(0, 100) as i64),
        )?;
        match error {
            Some(e) => self.doc.put(&shot_obj, "error", ScalarValue::Str(e.into()))?,
            None => self.doc.put(&shot_obj, "error", ScalarValue::Null)?,
        }
        self.touch()
    }

    /// Records a shot's generated video. This is the sole path by which a
    /// shot becomes completed: status and progress are forced to
    /// `Completed`/100 whatever they were before, and any stale error clears.
    pub fn set_shot_video_url(
        &mut self,
        id: &str,
        url: &str,
        thumbnail_url: Option<&str>,
    ) -> ProjectResult<()> {
        self.update_state(|state| match state.shots.iter_mut().find(|s| s.id == id) {
            Some(shot) => {
                shot.generated_video_url = Some(url.to_string());
                shot.thumbnail_url = thumbnail_url.map(str::to_string);
                shot.status = GenerationStatus::Completed;
                shot.progress = 100;
                shot.error = None;
                true
            }
            None => false,
        })?;
        Ok(())
    }

    /// Voiceover counterpart of [`Self::set_shot_status`] (O(1) puts).
    pub fn set_voiceover_status(
        &mut self,
        status: GenerationStatus,
        progress: i32,
        error: Option<&str>,
    ) -> ProjectResult<()> {
        let vo_obj = self.get_obj_at_key(&ROOT, "voiceover")?;
        self.cached_state = None;
        self.doc
            .put(&vo_obj, "status", ScalarValue::Str(status.as_str().into()))?;
        self.doc.put(
            &vo_obj,
            "progress",
            ScalarValue::Int(progress.clamp(0, 100) as i64),
        )?;
        match error {
            Some(e) => self.doc.put(&vo_obj, "error", ScalarValue::Str(e.into()))?,
            None => self.doc.put(&vo_obj, "error", ScalarValue::Null)?,
        }
        self.touch()
    }

    /// Records the synthesized narration and forces the voiceover completed.
    pub fn set_voiceover_audio_url(&mut self, url: &str) -> ProjectResult<()> {
        self.update_state(|state| {
            state.voiceover.generated_audio_url = Some(url.to_string());
            state.voiceover.status = GenerationStatus::Completed;
            state.voiceover.progress = 100;
            state.voiceover.error = None;
            true
        })?;
        Ok(())
    }

    /// Sets the project status (O(1)).
    pub fn set_project_status(&mut self, status: ProjectStatus) -> ProjectResult<()> {
        self.cached_state = None;
        self.doc
            .put(&ROOT, "status", ScalarValue::Str(status.as_str().into()))?;
        self.touch()
    }

    /// Records the assembled advertisement and forces the project completed.
    pub fn set_final_video_url(&mut self, url: &str) -> ProjectResult<()> {
        self.update_state(|state| {
            state.final_video_url = Some(url.to_string());
            state.status = ProjectStatus::Completed;
            true
        })?;
        Ok(())
    }

    /// Replaces the aggregate with a fresh default project, clears the
    /// selection and resets the pipeline status to idle.
    pub fn reset_project(&mut self) -> ProjectResult<()> {
        let mut doc = AutoCommit::new();
        let project = fresh_project();
        reconcile(&mut doc, &project)?;
        self.doc = doc;
        self.cached_state = Some(project);
        self.selected_shot_id = None;
        self.progress = GenerationProgress::idle();
        debug!("project reset");
        Ok(())
    }

    /// Applies one reporting delta from the orchestrator.
    ///
    /// Deliveries may arrive duplicated or out of order; every arm maps onto
    /// an idempotent setter, so replays settle on the same state.
    pub fn apply_event(&mut self, event: PipelineEvent) -> ProjectResult<()> {
        match event {
            PipelineEvent::Progress(progress) => {
                self.set_generation_progress(progress);
                Ok(())
            }
            PipelineEvent::ProjectStatus { status } => self.set_project_status(status),
            PipelineEvent::ShotStatus {
                shot_id,
                status,
                progress,
                error,
            } => self.set_shot_status(&shot_id, status, progress, error.as_deref()),
            PipelineEvent::ShotVideoReady {
                shot_id,
                video_url,
                thumbnail_url,
            } => self.set_shot_video_url(&shot_id, &video_url, thumbnail_url.as_deref()),
            PipelineEvent::VoiceoverStatus {
                status,
                progress,
                error,
            } => self.set_voiceover_status(status, progress, error.as_deref()),
            PipelineEvent::VoiceoverAudioReady { audio_url } => {
                self.set_voiceover_audio_url(&audio_url)
            }
            PipelineEvent::FinalVideoReady { final_video_url } => {
                self.set_final_video_url(&final_video_url)
            }
        }
    }

    // =========================================================================
    // DERIVED READS (computed on demand, never cached as state)
    // =========================================================================

    /// Gets a shot by id.
    pub fn get_shot(&mut self, id: &str) -> ProjectResult<Option<Shot>> {
        let state = self.get_state()?;
        Ok(state.shot(id).cloned())
    }

    /// Id of the currently selected shot.
    pub fn selected_shot_id(&self) -> Option<&str> {
        self.selected_shot_id.as_deref()
    }

    /// The currently selected shot, if any.
    pub fn get_selected_shot(&mut self) -> ProjectResult<Option<Shot>> {
        match self.selected_shot_id.clone() {
            Some(id) => self.get_shot(&id),
            None => Ok(None),
        }
    }

    /// Number of shots on the timeline.
    pub fn shot_count(&mut self) -> ProjectResult<usize> {
        Ok(self.get_state()?.shots.len())
    }

    /// Total advertisement length in seconds.
    pub fn total_duration(&mut self) -> ProjectResult<u32> {
        Ok(estimate::total_duration(&self.get_state()?))
    }

    /// Estimated generation cost under the given rates.
    pub fn estimated_cost(&mut self, rates: &CostRates) -> ProjectResult<f64> {
        Ok(estimate::estimated_cost(&self.get_state()?, rates))
    }

    /// Last reported pipeline status.
    pub fn generation_progress(&self) -> &GenerationProgress {
        &self.progress
    }

    // =========================================================================
    // INTERNAL HELPERS - DOCUMENT NAVIGATION
    // =========================================================================

    /// Finds the document object of the shot with the given id.
    fn find_shot_obj(&self, id: &str) -> ProjectResult<Option<ObjId>> {
        let shots_obj = self.get_obj_at_key(&ROOT, "shots")?;
        for idx in 0..self.doc.length(&shots_obj) {
            let shot_obj = match self.doc.get(&shots_obj, idx)? {
                Some((Value::Object(_), obj)) => obj,
                _ => continue,
            };
            if let Some((Value::Scalar(s), _)) = self.doc.get(&shot_obj, "id")? {
                if let ScalarValue::Str(shot_id) = s.as_ref() {
                    if shot_id.as_str() == id {
                        return Ok(Some(shot_obj));
                    }
                }
            }
        }
        Ok(None)
    }

    /// Gets an object ID at a map key.
    fn get_obj_at_key(&self, parent: &ObjId, key: &str) -> ProjectResult<ObjId> {
        match self.doc.get(parent, key) {
            Ok(Some((Value::Object(_), obj_id))) => Ok(obj_id),
            Ok(Some(_)) => Err(ProjectError::schema_violation(format!(
                "'{}' is not an object",
                key
            ))),
            Ok(None) => Err(ProjectError::field_not_found(key)),
            Err(e) => Err(ProjectError::Automerge(e)),
        }
    }
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::model::{AspectRatio, Resolution, ShotDuration};

    fn assert_dense_orders(store: &mut ProjectStore) {
        let state = store.get_state().unwrap();
        for (idx, shot) in state.shots.iter().enumerate() {
            assert_eq!(shot.order, idx as i32, "order must mirror list position");
        }
    }

    #[test]
    fn test_new_store_has_one_draft_shot() {
        let mut store = ProjectStore::new();
        let state = store.get_state().unwrap();
        assert_eq!(state.shots.len(), 1);
        assert_eq!(state.shots[0].status, GenerationStatus::Draft);
        assert_eq!(state.shots[0].order, 0);
        assert_eq!(state.status, ProjectStatus::Draft);
        assert!(store.selected_shot_id().is_none());
        assert_eq!(store.generation_progress(), &GenerationProgress::idle());
    }

    #[test]
    fn test_add_shot_appends_and_selects() {
        let mut store = ProjectStore::new();
        let id = store.add_shot().unwrap();

        let state = store.get_state().unwrap();
        assert_eq!(state.shots.len(), 2);
        assert_eq!(state.shots[1].id, id);
        assert_eq!(state.shots[1].order, 1);
        assert_eq!(store.selected_shot_id(), Some(id.as_str()));
        assert_eq!(store.get_selected_shot().unwrap().unwrap().id, id);
    }

    #[test]
    fn test_remove_shot_reindexes_and_preserves_ids() {
        let mut store = ProjectStore::new();
        let first = store.get_state().unwrap().shots[0].id.clone();
        let second = store.add_shot().unwrap();
        let third = store.add_shot().unwrap();

        store.remove_shot(&second).unwrap();

        let state = store.get_state().unwrap();
        let ids: Vec<_> = state.shots.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![first, third]);
        assert_dense_orders(&mut store);
    }

    #[test]
    fn test_remove_last_shot_is_noop() {
        let mut store = ProjectStore::new();
        let state_before = store.get_state().unwrap();
        let id = state_before.shots[0].id.clone();

        store.remove_shot(&id).unwrap();

        let state_after = store.get_state().unwrap();
        assert_eq!(state_after, state_before, "state must be untouched");
    }

    #[test]
    fn test_remove_unknown_shot_is_noop() {
        let mut store = ProjectStore::new();
        store.add_shot().unwrap();
        let before = store.get_state().unwrap();

        store.remove_shot("no-such-shot").unwrap();

        assert_eq!(store.get_state().unwrap(), before);
    }

    #[test]
    fn test_remove_selected_shot_moves_selection_to_first() {
        let mut store = ProjectStore::new();
        let first = store.get_state().unwrap().shots[0].id.clone();
        let second = store.add_shot().unwrap();
        assert_eq!(store.selected_shot_id(), Some(second.as_str()));

        store.remove_shot(&second).unwrap();

        assert_eq!(store.selected_shot_id(), Some(first.as_str()));
    }

    #[test]
    fn test_reorder_uses_splice_semantics() {
        let mut store = ProjectStore::new();
        let a = store.get_state().unwrap().shots[0].id.clone();
        let b = store.add_shot().unwrap();
        let c = store.add_shot().unwrap();
        let d = store.add_shot().unwrap();

        // [a, b, c, d] -> remove a -> [b, c, d] -> insert at 2 -> [b, c, a, d]
        store.reorder_shots(0, 2).unwrap();

        let ids: Vec<_> = store
            .get_state()
            .unwrap()
            .shots
            .iter()
            .map(|s| s.id.clone())
            .collect();
        assert_eq!(ids, vec![b, c, a, d]);
        assert_dense_orders(&mut store);
    }

    #[test]
    fn test_reorder_out_of_bounds_is_noop() {
        let mut store = ProjectStore::new();
        store.add_shot().unwrap();
        let before = store.get_state().unwrap();

        store.reorder_shots(5, 0).unwrap();

        assert_eq!(store.get_state().unwrap(), before);
    }

    #[test]
    fn test_update_shot_merges_fields() {
        let mut store = ProjectStore::new();
        let id = store.add_shot().unwrap();

        store
            .update_shot(&id, |shot| {
                shot.prompt = "Slow orbit around a perfume bottle".to_string();
                shot.aspect_ratio = AspectRatio::Portrait;
            })
            .unwrap();

        let shot = store.get_shot(&id).unwrap().unwrap();
        assert_eq!(shot.prompt, "Slow orbit around a perfume bottle");
        assert_eq!(shot.aspect_ratio, AspectRatio::Portrait);
    }

    #[test]
    fn test_update_shot_empty_patch_changes_nothing_but_timestamp() {
        let mut store = ProjectStore::new();
        let id = store.add_shot().unwrap();
        let before = store.get_state().unwrap();

        store.update_shot(&id, |_| {}).unwrap();

        let after = store.get_state().unwrap();
        assert_eq!(after.shots, before.shots);
        assert_eq!(after.name, before.name);
        assert!(after.updated_at >= before.updated_at);
    }

    #[test]
    fn test_update_shot_cannot_touch_generation_state() {
        let mut store = ProjectStore::new();
        let id = store.add_shot().unwrap();

        store
            .update_shot(&id, |shot| {
                shot.status = GenerationStatus::Completed;
                shot.progress = 100;
                shot.generated_video_url = Some("https://example.com/fake.mp4".into());
                shot.order = 99;
            })
            .unwrap();

        let shot = store.get_shot(&id).unwrap().unwrap();
        assert_eq!(shot.status, GenerationStatus::Draft);
        assert_eq!(shot.progress, 0);
        assert!(shot.generated_video_url.is_none());
        assert_eq!(shot.order, 1);
    }

    #[test]
    fn test_update_shot_rejects_1080p_short_duration() {
        let mut store = ProjectStore::new();
        let id = store.add_shot().unwrap();

        let err = store
            .update_shot(&id, |shot| shot.duration = ShotDuration::Four)
            .unwrap_err();
        assert!(matches!(
            err,
            ProjectError::ResolutionDurationMismatch { .. }
        ));

        // State untouched after the rejection.
        let shot = store.get_shot(&id).unwrap().unwrap();
        assert_eq!(shot.duration, ShotDuration::Eight);

        // Switching tier and duration together is fine.
        store
            .update_shot(&id, |shot| {
                shot.resolution = Resolution::P720;
                shot.duration = ShotDuration::Four;
            })
            .unwrap();
        let shot = store.get_shot(&id).unwrap().unwrap();
        assert_eq!(shot.duration, ShotDuration::Four);
    }

    #[test]
    fn test_duplicate_shot_resets_generation_state() {
        let mut store = ProjectStore::new();
        let id = store.add_shot().unwrap();
        store
            .update_shot(&id, |shot| {
                shot.prompt = "Runway at dusk".to_string();
            })
            .unwrap();
        store.add_image_to_shot(&id, "ref-1.png").unwrap();
        store
            .set_shot_video_url(&id, "https://cdn.example.com/shot.mp4", None)
            .unwrap();

        let copy_id = store.duplicate_shot(&id).unwrap().unwrap();

        let state = store.get_state().unwrap();
        let copy = state.shot(&copy_id).unwrap();
        assert_eq!(copy.prompt, "Runway at dusk");
        assert_eq!(copy.reference_images, vec!["ref-1.png".to_string()]);
        assert_eq!(copy.status, GenerationStatus::Draft);
        assert_eq!(copy.progress, 0);
        assert!(copy.generated_video_url.is_none());
        assert_eq!(copy.order, (state.shots.len() - 1) as i32);
    }

    #[test]
    fn test_duplicate_unknown_shot_is_noop() {
        let mut store = ProjectStore::new();
        assert!(store.duplicate_shot("missing").unwrap().is_none());
        assert_eq!(store.shot_count().unwrap(), 1);
    }

    #[test]
    fn test_reference_image_cap_enforced() {
        let mut store = ProjectStore::new();
        let id = store.add_shot().unwrap();

        for n in 0..MAX_REFERENCE_IMAGES {
            store
                .add_image_to_shot(&id, &format!("img-{n}.png"))
                .unwrap();
        }
        let err = store.add_image_to_shot(&id, "one-too-many.png").unwrap_err();
        assert!(matches!(err, ProjectError::ReferenceImageLimit { max: 3 }));

        store.remove_image_from_shot(&id, "img-1.png").unwrap();
        let shot = store.get_shot(&id).unwrap().unwrap();
        assert_eq!(
            shot.reference_images,
            vec!["img-0.png".to_string(), "img-2.png".to_string()]
        );
    }

    #[test]
    fn test_frame_pins_set_and_clear() {
        let mut store = ProjectStore::new();
        let id = store.add_shot().unwrap();

        store.set_first_frame(&id, Some("first.png")).unwrap();
        store.set_last_frame(&id, Some("last.png")).unwrap();
        let shot = store.get_shot(&id).unwrap().unwrap();
        assert_eq!(shot.first_frame.as_deref(), Some("first.png"));
        assert_eq!(shot.last_frame.as_deref(), Some("last.png"));

        store.set_first_frame(&id, None).unwrap();
        let shot = store.get_shot(&id).unwrap().unwrap();
        assert!(shot.first_frame.is_none());
        assert_eq!(shot.last_frame.as_deref(), Some("last.png"));
    }

    #[test]
    fn test_update_voiceover_clamps_and_reserves() {
        let mut store = ProjectStore::new();

        store
            .update_voiceover(|vo| {
                vo.script = "Since 1910, timeless elegance.".to_string();
                vo.stability = 1.7;
                vo.style = -0.3;
                vo.status = GenerationStatus::Completed;
            })
            .unwrap();

        let vo = store.get_state().unwrap().voiceover;
        assert_eq!(vo.script, "Since 1910, timeless elegance.");
        assert_eq!(vo.stability, 1.0);
        assert_eq!(vo.style, 0.0);
        assert_eq!(vo.status, GenerationStatus::Draft);
    }

    #[test]
    fn test_set_shot_status_sets_exactly_three_fields() {
        let mut store = ProjectStore::new();
        let id = store.add_shot().unwrap();

        store
            .set_shot_status(&id, GenerationStatus::Generating, 40, None)
            .unwrap();

        let shot = store.get_shot(&id).unwrap().unwrap();
        assert_eq!(shot.status, GenerationStatus::Generating);
        assert_eq!(shot.progress, 40);
        assert!(shot.error.is_none());
        assert!(shot.generated_video_url.is_none());

        store
            .set_shot_status(&id, GenerationStatus::Failed, 140, Some("quota exceeded"))
            .unwrap();
        let shot = store.get_shot(&id).unwrap().unwrap();
        assert_eq!(shot.status, GenerationStatus::Failed);
        assert_eq!(shot.progress, 100, "progress is clamped");
        assert_eq!(shot.error.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn test_set_shot_video_url_forces_completion_from_draft() {
        let mut store = ProjectStore::new();
        let id = store.add_shot().unwrap();

        // No generating transition ever happened.
        store
            .set_shot_video_url(&id, "https://cdn.example.com/shot.mp4", Some("thumb.jpg"))
            .unwrap();

        let shot = store.get_shot(&id).unwrap().unwrap();
        assert_eq!(shot.status, GenerationStatus::Completed);
        assert_eq!(shot.progress, 100);
        assert_eq!(
            shot.generated_video_url.as_deref(),
            Some("https://cdn.example.com/shot.mp4")
        );
        assert_eq!(shot.thumbnail_url.as_deref(), Some("thumb.jpg"));
    }

    #[test]
    fn test_voiceover_reporting() {
        let mut store = ProjectStore::new();

        store
            .set_voiceover_status(GenerationStatus::Generating, 60, None)
            .unwrap();
        let vo = store.get_state().unwrap().voiceover;
        assert_eq!(vo.status, GenerationStatus::Generating);
        assert_eq!(vo.progress, 60);

        store
            .set_voiceover_audio_url("https://cdn.example.com/voice.mp3")
            .unwrap();
        let vo = store.get_state().unwrap().voiceover;
        assert_eq!(vo.status, GenerationStatus::Completed);
        assert_eq!(vo.progress, 100);
        assert_eq!(
            vo.generated_audio_url.as_deref(),
            Some("https://cdn.example.com/voice.mp3")
        );
    }

    #[test]
    fn test_set_final_video_url_completes_project() {
        let mut store = ProjectStore::new();
        store.set_project_status(ProjectStatus::Generating).unwrap();

        store
            .set_final_video_url("https://cdn.example.com/ad.mp4")
            .unwrap();

        let state = store.get_state().unwrap();
        assert_eq!(state.status, ProjectStatus::Completed);
        assert_eq!(
            state.final_video_url.as_deref(),
            Some("https://cdn.example.com/ad.mp4")
        );
    }

    #[test]
    fn test_reset_project() {
        let mut store = ProjectStore::new();
        store.set_project_name("Spring Campaign").unwrap();
        store.add_shot().unwrap();
        store.update_progress(|p| {
            p.stage = crate::project::model::PipelineStage::GeneratingShots;
        });

        store.reset_project().unwrap();

        let state = store.get_state().unwrap();
        assert_eq!(state.name, "Untitled Ad");
        assert_eq!(state.shots.len(), 1);
        assert!(store.selected_shot_id().is_none());
        assert_eq!(store.generation_progress(), &GenerationProgress::idle());
    }

    #[test]
    fn test_updated_at_bumped_on_mutation() {
        let mut store = ProjectStore::new();
        let before = store.get_state().unwrap().updated_at;

        store.set_project_name("Fall Campaign").unwrap();

        let after = store.get_state().unwrap().updated_at;
        assert!(after >= before);
        assert_eq!(store.get_state().unwrap().name, "Fall Campaign");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut store = ProjectStore::new();
        let id = store.add_shot().unwrap();
        store
            .update_shot(&id, |shot| shot.prompt = "Atelier hands stitching leather".to_string())
            .unwrap();

        let bytes = store.save();
        let mut loaded = ProjectStore::from_bytes(&bytes).unwrap();

        let state = loaded.get_state().unwrap();
        assert_eq!(state.shots.len(), 2);
        assert_eq!(state.shots[1].prompt, "Atelier hands stitching leather");
        // Selection and pipeline status are ephemeral; a load starts clean.
        assert!(loaded.selected_shot_id().is_none());
        assert_eq!(loaded.generation_progress(), &GenerationProgress::idle());
    }

    #[test]
    fn test_from_project_round_trip() {
        let mut store = ProjectStore::new();
        store.set_project_name("Serialized Campaign").unwrap();
        let original = store.get_state().unwrap();

        let json = serde_json::to_string(&original).unwrap();
        let parsed: AdProject = serde_json::from_str(&json).unwrap();
        let mut restored = ProjectStore::from_project(parsed).unwrap();

        assert_eq!(restored.get_state().unwrap(), original);
    }

    #[test]
    fn test_long_edit_sequence_keeps_orders_dense() {
        let mut store = ProjectStore::new();
        for _ in 0..5 {
            store.add_shot().unwrap();
        }
        let ids: Vec<_> = store
            .get_state()
            .unwrap()
            .shots
            .iter()
            .map(|s| s.id.clone())
            .collect();

        store.remove_shot(&ids[2]).unwrap();
        store.reorder_shots(3, 0).unwrap();
        store.duplicate_shot(&ids[0]).unwrap();
        store.remove_shot(&ids[5]).unwrap();
        store.reorder_shots(0, 4).unwrap();

        assert_dense_orders(&mut store);
        assert_eq!(store.shot_count().unwrap(), 5);
    }
}
