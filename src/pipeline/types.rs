use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stage 1 output. Fields are passed through exactly as the model returned
/// them; range checks belong to whoever presents the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetection {
    pub product: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub confidence: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub why_it_works: String,
    #[serde(default)]
    pub shot_keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdeaList {
    #[serde(default)]
    pub ideas: Vec<Idea>,
}

/// Blank or repeated ids are replaced with `I<position>` so every id in the
/// list is unique.
pub(crate) fn normalize_idea_ids(ideas: &mut [Idea]) {
    let mut seen = HashSet::new();
    for (position, idea) in ideas.iter_mut().enumerate() {
        let trimmed = idea.id.trim().to_string();
        if trimmed.is_empty() || seen.contains(&trimmed) {
            let mut candidate = format!("I{}", position + 1);
            let mut suffix = 1;
            while seen.contains(&candidate) {
                suffix += 1;
                candidate = format!("I{}_{}", position + 1, suffix);
            }
            idea.id = candidate;
        } else {
            idea.id = trimmed;
        }
        seen.insert(idea.id.clone());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(default)]
    pub angle: String,
    #[serde(default)]
    pub lens: String,
    #[serde(default)]
    pub aperture: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotPrompt {
    /// Assigned by [`reindex_shots`]; whatever the model wrote is ignored.
    #[serde(default, skip_deserializing)]
    pub index: usize,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub lighting: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub props: String,
    #[serde(default)]
    pub composition: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(alias = "gen_prompt")]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShotList {
    #[serde(default)]
    pub shots: Vec<ShotPrompt>,
}

/// Numbers shots from 1 in list order and drops any model-written index
/// that would otherwise pass through in `extra`.
pub(crate) fn reindex_shots(shots: &mut [ShotPrompt]) {
    for (position, shot) in shots.iter_mut().enumerate() {
        shot.index = position + 1;
        shot.extra.remove("index");
    }
}

/// Everything stage 3 needs from stages 1 and 2, written once as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningSession {
    pub product: String,
    pub category: String,
    pub attributes: Vec<String>,
    pub ideas: Vec<Idea>,
    pub style: Option<String>,
    pub platform: Option<String>,
    pub include_model: Option<bool>,
}

impl PlanningSession {
    pub fn find_idea(&self, idea_id: &str) -> Option<&Idea> {
        let idea_id = idea_id.trim();
        self.ideas.iter().find(|idea| idea.id == idea_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectionOutcome {
    pub session_id: String,
    #[serde(flatten)]
    pub detection: ProductDetection,
    pub ideas: Vec<Idea>,
}
