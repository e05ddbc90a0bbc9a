//! Recipe and step structures

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// One instruction of a recipe with its own countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: u32,
    pub description: String,
    /// Image URI shown alongside the description
    #[serde(default)]
    pub image: String,
    /// Countdown length; negative input is clamped to zero
    #[serde(deserialize_with = "clamped_seconds")]
    pub duration_seconds: u64,
}

impl Step {
    /// Create a step with the given duration
    pub fn new(id: u32, description: impl Into<String>, image: impl Into<String>, duration_seconds: u64) -> Self {
        Self {
            id,
            description: description.into(),
            image: image.into(),
            duration_seconds,
        }
    }
}

/// A recipe as consumed by a step runner. Immutable for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub steps: Vec<Step>,
    /// Display color used by the host as background
    #[serde(default = "default_color")]
    pub color: String,
}

impl Recipe {
    /// Create a new recipe
    pub fn new(title: impl Into<String>, steps: Vec<Step>, color: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            steps,
            color: color.into(),
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Per-step durations in order
    pub fn durations(&self) -> Vec<u64> {
        self.steps.iter().map(|step| step.duration_seconds).collect()
    }

    /// Sum of all step durations in seconds
    pub fn total_seconds(&self) -> u64 {
        self.steps.iter().map(|step| step.duration_seconds).sum()
    }
}

fn default_color() -> String {
    "#f96163".to_string()
}

fn clamped_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    if raw < 0 {
        warn!("Negative step duration {} clamped to 0", raw);
        return Ok(0);
    }
    Ok(raw as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_duration_is_clamped() {
        let step: Step = serde_json::from_str(
            r#"{"id": 3, "description": "Rest", "image": "", "duration_seconds": -20}"#,
        )
        .unwrap();
        assert_eq!(step.duration_seconds, 0);
    }

    #[test]
    fn missing_color_and_image_use_defaults() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"title": "Toast", "steps": [{"id": 1, "description": "Toast bread", "duration_seconds": 90}]}"#,
        )
        .unwrap();
        assert_eq!(recipe.color, "#f96163");
        assert_eq!(recipe.steps[0].image, "");
        assert_eq!(recipe.durations(), vec![90]);
    }

    #[test]
    fn total_seconds_sums_steps() {
        let recipe = Recipe::new(
            "Tea",
            vec![Step::new(1, "Boil", "", 120), Step::new(2, "Steep", "", 180)],
            "green",
        );
        assert_eq!(recipe.step_count(), 2);
        assert_eq!(recipe.total_seconds(), 300);
        assert!(recipe.step(2).is_none());
    }
}
