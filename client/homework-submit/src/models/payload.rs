use serde::{Deserialize, Serialize};

use super::{AssignmentContext, StudentIdentity};
use crate::error::PayloadError;

/// Everything the scorer needs for one attempt.
///
/// `answers` and `answer_key` always have one entry per question; an
/// unanswered question is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub class_id: String,
    #[serde(rename = "homeworkId")]
    pub assignment_id: String,
    pub first_name: String,
    pub last_name: String,
    pub answers: Vec<String>,
    pub answer_key: Vec<String>,
}

impl SubmissionPayload {
    pub fn build(
        context: &AssignmentContext,
        student: &StudentIdentity,
        answers: &[Option<String>],
    ) -> Result<Self, PayloadError> {
        if answers.len() != context.question_count() {
            return Err(PayloadError::AnswerCountMismatch {
                expected: context.question_count(),
                actual: answers.len(),
            });
        }

        Ok(Self {
            class_id: context.class_id().to_string(),
            assignment_id: context.assignment_id().to_string(),
            first_name: student.first_name().to_string(),
            last_name: student.last_name().to_string(),
            answers: answers
                .iter()
                .map(|answer| answer.clone().unwrap_or_default())
                .collect(),
            answer_key: context.answer_key().to_vec(),
        })
    }

    /// Form body in wire order. Both sequences travel as JSON arrays.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("classId", self.class_id.clone()),
            ("homeworkId", self.assignment_id.clone()),
            ("firstName", self.first_name.clone()),
            ("lastName", self.last_name.clone()),
            ("answers", encode_list(&self.answers)),
            ("answerKey", encode_list(&self.answer_key)),
        ]
    }
}

fn encode_list(values: &[String]) -> String {
    // A Vec<String> always serializes; the fallback is unreachable in practice.
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Parses `"A, b,,D"` into per-question answers; blanks are unanswered.
pub fn parse_answer_list(raw: &str) -> Vec<Option<String>> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    raw.split(',')
        .map(|item| {
            let letter = item.trim().to_uppercase();
            (!letter.is_empty()).then_some(letter)
        })
        .collect()
}
