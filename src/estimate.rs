//! Cost and duration estimation over a project snapshot.
//!
//! Stateless pure functions: they take the aggregate as an explicit
//! parameter and keep no derived state anywhere. Rates live in an explicit
//! [`CostRates`] value so each resolution tier stays independently
//! configurable, even while the current constants happen to match.

use serde::{Deserialize, Serialize};

use crate::project::model::{AdProject, Resolution};

/// Pricing used for live cost estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostRates {
    /// Price per second of 720p video.
    pub video_per_second_720p: f64,
    /// Price per second of 1080p video.
    pub video_per_second_1080p: f64,
    /// Price per character of narration script.
    pub voice_per_character: f64,
}

impl CostRates {
    /// Video rate for a resolution tier.
    pub fn video_rate(&self, resolution: Resolution) -> f64 {
        match resolution {
            Resolution::P720 => self.video_per_second_720p,
            Resolution::P1080 => self.video_per_second_1080p,
        }
    }
}

impl Default for CostRates {
    /// Fast-tier video pricing ($0.15/s for both tiers today) and standard
    /// per-character voice synthesis pricing.
    fn default() -> Self {
        Self {
            video_per_second_720p: 0.15,
            video_per_second_1080p: 0.15,
            voice_per_character: 0.00003,
        }
    }
}

/// Total advertisement length in seconds: the sum of every shot's duration.
pub fn total_duration(project: &AdProject) -> u32 {
    project.shots.iter().map(|s| s.duration.seconds()).sum()
}

/// Estimated generation cost: per-second video pricing by resolution tier
/// plus per-character voice synthesis pricing over the script.
pub fn estimated_cost(project: &AdProject, rates: &CostRates) -> f64 {
    let video: f64 = project
        .shots
        .iter()
        .map(|s| s.duration.seconds() as f64 * rates.video_rate(s.resolution))
        .sum();
    let voice = project.voiceover.script.chars().count() as f64 * rates.voice_per_character;
    video + voice
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::model::{Shot, ShotDuration};

    fn project_with_durations(durations: &[ShotDuration]) -> AdProject {
        let mut project = AdProject::new("proj-1");
        for (idx, duration) in durations.iter().enumerate() {
            let resolution = match duration {
                ShotDuration::Eight => Resolution::P1080,
                _ => Resolution::P720,
            };
            project.shots.push(
                Shot::new(format!("shot-{idx}"), idx as i32)
                    .with_duration(*duration)
                    .with_resolution(resolution),
            );
        }
        project
    }

    #[test]
    fn test_total_duration_sums_shots() {
        let project = project_with_durations(&[
            ShotDuration::Eight,
            ShotDuration::Six,
            ShotDuration::Four,
        ]);
        assert_eq!(total_duration(&project), 18);
    }

    #[test]
    fn test_total_duration_empty_shell() {
        assert_eq!(total_duration(&AdProject::new("proj-1")), 0);
    }

    #[test]
    fn test_estimated_cost_single_shot_with_script() {
        let mut project = project_with_durations(&[ShotDuration::Eight]);
        project.voiceover.script = "x".repeat(100);

        // 0.15 * 8 + 100 * 0.00003 = 1.203
        let cost = estimated_cost(&project, &CostRates::default());
        assert!((cost - 1.203).abs() < 1e-9, "got {cost}");
    }

    #[test]
    fn test_cost_is_resolution_aware() {
        let mut project = AdProject::new("proj-1");
        project.shots.push(
            Shot::new("shot-0", 0)
                .with_resolution(Resolution::P720)
                .with_duration(ShotDuration::Four),
        );

        let rates = CostRates {
            video_per_second_720p: 0.05,
            video_per_second_1080p: 0.40,
            voice_per_character: 0.0,
        };
        let cost = estimated_cost(&project, &rates);
        assert!((cost - 0.20).abs() < 1e-9, "got {cost}");
    }

    #[test]
    fn test_cost_counts_script_characters() {
        let mut project = AdProject::new("proj-1");
        project.voiceover.script = "Timeless.".to_string();

        let rates = CostRates {
            video_per_second_720p: 0.0,
            video_per_second_1080p: 0.0,
            voice_per_character: 0.01,
        };
        let cost = estimated_cost(&project, &rates);
        assert!((cost - 0.09).abs() < 1e-9, "got {cost}");
    }
}
