use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Homework definition as authored for the page.
///
/// Only `id`, `classId`, `questions.len()` and `answerKey` matter for
/// submission; the rendering fields are carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDefinition {
    pub id: String,
    #[serde(default)]
    pub class_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub answer_key: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stem: Option<String>,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_caption: Option<String>,
}

impl QuizDefinition {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read quiz definition {}", path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse quiz definition {}", path.display()))
    }
}
