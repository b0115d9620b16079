//! Scripted Pipeline Walkthrough for Adcraft
//!
//! Builds a four-shot advertisement project, then plays a full generation
//! run against the store through the event channel: upload, per-shot video
//! generation, voice synthesis and assembly.
//!
//! Run with: cargo run --release --example pipeline_sim

use adcraft::pipeline::{GenerationBackend, JobRequest, JobTicket};
use adcraft::{
    estimate, overall_percent, step_status, CostRates, GenerationProgress, GenerationStatus,
    PipelineEvent, PipelineStage, ProjectResult, ProjectStore, PIPELINE_STEPS,
};

/// A backend double that acknowledges a job and replays a fixed script of
/// status snapshots on each poll.
struct ScriptedBackend {
    script: Vec<GenerationProgress>,
    cursor: usize,
}

impl ScriptedBackend {
    fn new(total_shots: u32) -> Self {
        let mut script = vec![GenerationProgress {
            stage: PipelineStage::Uploading,
            message: "Uploading reference assets".to_string(),
            ..GenerationProgress::idle()
        }];
        for shot in 1..=total_shots {
            for shot_progress in [0, 50, 100] {
                script.push(GenerationProgress {
                    stage: PipelineStage::GeneratingShots,
                    current_shot: Some(shot),
                    total_shots: Some(total_shots),
                    shot_progress: Some(shot_progress),
                    message: format!("Generating shot {shot} of {total_shots}"),
                    ..GenerationProgress::idle()
                });
            }
        }
        script.push(GenerationProgress {
            stage: PipelineStage::GeneratingVoice,
            message: "Synthesizing narration".to_string(),
            ..GenerationProgress::idle()
        });
        script.push(GenerationProgress {
            stage: PipelineStage::Assembling,
            message: "Assembling final cut".to_string(),
            ..GenerationProgress::idle()
        });
        script.push(GenerationProgress {
            stage: PipelineStage::Completed,
            message: "Advertisement ready".to_string(),
            ..GenerationProgress::idle()
        });
        Self { script, cursor: 0 }
    }
}

impl GenerationBackend for ScriptedBackend {
    fn submit(&mut self, request: JobRequest) -> ProjectResult<JobTicket> {
        Ok(JobTicket {
            job_id: "job-demo-001".to_string(),
            eta_seconds: request.shots.len() as u32 * 60,
        })
    }

    fn poll(&mut self, _job_id: &str) -> ProjectResult<GenerationProgress> {
        let snapshot = self.script[self.cursor.min(self.script.len() - 1)].clone();
        self.cursor += 1;
        Ok(snapshot)
    }
}

fn main() {
    println!("========================================");
    println!(" Adcraft Pipeline Walkthrough");
    println!("========================================\n");

    // 1. Author a four-shot project.
    let mut store = ProjectStore::new();
    store.set_project_name("Maison Lumiere - 30s spot").unwrap();
    store
        .update_brand(|brand| {
            brand.name = "Maison Lumiere".to_string();
            brand.tagline = "Light, bottled.".to_string();
        })
        .unwrap();

    let prompts = [
        "Crystal perfume bottle emerging from morning mist, prismatic light",
        "Model in a black tweed jacket walking a dusk runway",
        "Aerial descent over Place Vendome at golden hour",
        "Artisan hands stitching quilted leather, macro detail",
    ];
    let first = store.get_state().unwrap().shots[0].id.clone();
    store
        .update_shot(&first, |shot| shot.prompt = prompts[0].to_string())
        .unwrap();
    for prompt in &prompts[1..] {
        let id = store.add_shot().unwrap();
        store
            .update_shot(&id, |shot| shot.prompt = prompt.to_string())
            .unwrap();
    }
    store
        .update_voiceover(|vo| {
            vo.script =
                "Each creation, a testament to uncompromising artistry. Light, bottled.".to_string();
        })
        .unwrap();

    let project = store.get_state().unwrap();
    println!("Project:        {}", project.name);
    println!("Shots:          {}", project.shots.len());
    println!(
        "Total duration: {}s",
        estimate::total_duration(&project)
    );
    println!(
        "Estimated cost: ${:.4}\n",
        estimate::estimated_cost(&project, &CostRates::default())
    );

    // 2. Submit the job to the (scripted) backend.
    let shot_ids: Vec<String> = project.shots.iter().map(|s| s.id.clone()).collect();
    let total_shots = shot_ids.len() as u32;
    let mut backend = ScriptedBackend::new(total_shots);
    let ticket = backend
        .submit(JobRequest::from_project(&project).unwrap())
        .unwrap();
    println!("Submitted job {} (eta {}s)\n", ticket.job_id, ticket.eta_seconds);

    // 3. Drive the pipeline: poll, forward deltas, render progress.
    println!("  %    stage              message");
    loop {
        let snapshot = backend.poll(&ticket.job_id).unwrap();
        let stage = snapshot.stage;

        // Shot-level reporting rides alongside the stage snapshot.
        if stage == PipelineStage::GeneratingShots {
            if let (Some(current), Some(shot_progress)) =
                (snapshot.current_shot, snapshot.shot_progress)
            {
                let shot_id = shot_ids[(current - 1) as usize].clone();
                if shot_progress >= 100 {
                    store
                        .apply_event(PipelineEvent::ShotVideoReady {
                            shot_id,
                            video_url: format!("https://cdn.example.com/shot-{current}.mp4"),
                            thumbnail_url: Some(format!(
                                "https://cdn.example.com/shot-{current}.jpg"
                            )),
                        })
                        .unwrap();
                } else {
                    store
                        .apply_event(PipelineEvent::ShotStatus {
                            shot_id,
                            status: GenerationStatus::Generating,
                            progress: shot_progress,
                            error: None,
                        })
                        .unwrap();
                }
            }
        }
        let message = snapshot.message.clone();
        store.apply_event(PipelineEvent::Progress(snapshot)).unwrap();

        println!(
            "  {:>3}  {:<18} {}",
            overall_percent(store.generation_progress()),
            stage,
            message
        );

        if stage.is_terminal() {
            break;
        }
    }

    store
        .apply_event(PipelineEvent::VoiceoverAudioReady {
            audio_url: "https://cdn.example.com/voiceover.mp3".to_string(),
        })
        .unwrap();
    store
        .apply_event(PipelineEvent::FinalVideoReady {
            final_video_url: "https://cdn.example.com/final.mp4".to_string(),
        })
        .unwrap();

    // 4. Final state.
    let final_state = store.get_state().unwrap();
    println!("\nPipeline steps:");
    for step in PIPELINE_STEPS {
        println!(
            "  {:<18} {}",
            step.as_str(),
            step_status(store.generation_progress().stage, step)
        );
    }
    println!("\nProject status: {}", final_state.status);
    println!(
        "Final video:    {}",
        final_state.final_video_url.as_deref().unwrap_or("-")
    );
    println!(
        "Completed shots: {}/{}",
        final_state
            .shots
            .iter()
            .filter(|s| s.status == GenerationStatus::Completed)
            .count(),
        final_state.shots.len()
    );
}
