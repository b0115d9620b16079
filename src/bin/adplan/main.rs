//! CLI tool to inspect ad project files: estimates, shot timeline and
//! pipeline progress.
//!
//! Usage:
//!   adplan init [--output project.json]
//!   adplan estimate --project project.json [--rates rates.json]
//!   adplan progress --status status.json

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use adcraft::{
    estimate, overall_percent, step_status, AdProject, CostRates, GenerationProgress,
    ProjectStore, PIPELINE_STEPS,
};

#[derive(Parser, Debug)]
#[command(
    name = "adplan",
    about = "Inspect ad project files: estimates, timeline and pipeline progress",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a fresh default project to a JSON file
    Init {
        /// Output file path
        #[arg(short, long, default_value = "project.json")]
        output: PathBuf,
    },
    /// Print the shot timeline with duration and cost estimates
    Estimate {
        /// Project JSON file
        #[arg(short, long)]
        project: PathBuf,

        /// Optional rates JSON file (defaults to built-in pricing)
        #[arg(short, long)]
        rates: Option<PathBuf>,
    },
    /// Print the pipeline step table and overall percentage
    Progress {
        /// Pipeline status JSON file
        #[arg(short, long)]
        status: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Init { output } => init(&output),
        Command::Estimate { project, rates } => estimate_cmd(&project, rates.as_deref()),
        Command::Progress { status } => progress_cmd(&status),
    }
}

fn init(output: &Path) -> Result<()> {
    let mut store = ProjectStore::new();
    let project = store
        .get_state()
        .context("Failed to build default project")?;
    let json = serde_json::to_string_pretty(&project)?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote default project to {}", output.display());
    Ok(())
}

fn load_project(path: &Path) -> Result<AdProject> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse project JSON")
}

fn estimate_cmd(project_path: &Path, rates_path: Option<&Path>) -> Result<()> {
    let project = load_project(project_path)?;

    let rates = match rates_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content).context("Failed to parse rates JSON")?
        }
        None => CostRates::default(),
    };

    println!("Project: {} ({})", project.name, project.status);
    println!();
    println!("  #  dur    res    aspect  status      prompt");
    for shot in &project.shots {
        let mut prompt: String = shot.prompt.replace('\n', " ");
        if prompt.chars().count() > 48 {
            prompt = prompt.chars().take(48).collect();
            prompt.push_str("...");
        }
        println!(
            "  {}  {:<5} {:<6} {:<7} {:<11} {}",
            shot.order, shot.duration, shot.resolution, shot.aspect_ratio, shot.status, prompt
        );
    }
    println!();
    println!("  Shots:          {}", project.shots.len());
    println!("  Total duration: {}s", estimate::total_duration(&project));
    println!(
        "  Script length:  {} chars",
        project.voiceover.script.chars().count()
    );
    println!(
        "  Estimated cost: ${:.4}",
        estimate::estimated_cost(&project, &rates)
    );
    Ok(())
}

fn progress_cmd(status_path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(status_path)
        .with_context(|| format!("Failed to read {}", status_path.display()))?;
    let snapshot: GenerationProgress =
        serde_json::from_str(&content).context("Failed to parse status JSON")?;

    println!("Stage:   {}", snapshot.stage);
    if !snapshot.message.is_empty() {
        println!("Message: {}", snapshot.message);
    }
    if let Some(eta) = snapshot.eta_seconds {
        println!("ETA:     {}s", eta);
    }
    println!();
    for step in PIPELINE_STEPS {
        println!(
            "  {:<18} {}",
            step.as_str(),
            step_status(snapshot.stage, step)
        );
    }
    println!();
    println!("Overall: {}%", overall_percent(&snapshot));
    Ok(())
}
