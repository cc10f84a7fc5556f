use crate::error::ValidationError;

use super::quiz::QuizDefinition;

/// Per-quiz submission context. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentContext {
    class_id: String,
    assignment_id: String,
    answer_key: Vec<String>,
}

impl AssignmentContext {
    pub fn new(
        class_id: impl Into<String>,
        assignment_id: impl Into<String>,
        question_count: usize,
        answer_key: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let assignment_id = assignment_id.into();
        if assignment_id.trim().is_empty() {
            return Err(ValidationError::MissingAssignmentId);
        }
        if question_count == 0 {
            return Err(ValidationError::NoQuestions);
        }
        if answer_key.len() != question_count {
            return Err(ValidationError::AnswerKeyLength {
                expected: question_count,
                actual: answer_key.len(),
            });
        }

        Ok(Self {
            class_id: class_id.into(),
            assignment_id,
            answer_key,
        })
    }

    pub fn from_quiz(quiz: &QuizDefinition) -> Result<Self, ValidationError> {
        Self::new(
            quiz.class_id.clone(),
            quiz.id.clone(),
            quiz.questions.len(),
            quiz.answer_key.clone(),
        )
    }

    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    pub fn assignment_id(&self) -> &str {
        &self.assignment_id
    }

    pub fn question_count(&self) -> usize {
        self.answer_key.len()
    }

    pub fn answer_key(&self) -> &[String] {
        &self.answer_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::Question;

    fn key(letters: &[&str]) -> Vec<String> {
        letters.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn builds_from_quiz_definition() {
        let quiz = QuizDefinition {
            id: "hw7".to_string(),
            class_id: "alg-1".to_string(),
            title: "Linear equations".to_string(),
            questions: vec![
                Question {
                    latex: Some("x + 1 = 2".to_string()),
                    stem: None,
                    choices: key(&["1", "2"]),
                    media: None,
                    media_caption: None,
                };
                3
            ],
            answer_key: key(&["A", "B", "A"]),
        };

        let ctx = AssignmentContext::from_quiz(&quiz).unwrap();
        assert_eq!(ctx.class_id(), "alg-1");
        assert_eq!(ctx.assignment_id(), "hw7");
        assert_eq!(ctx.question_count(), 3);
        assert_eq!(ctx.answer_key(), key(&["A", "B", "A"]).as_slice());
    }

    #[test]
    fn rejects_mismatched_answer_key() {
        let err = AssignmentContext::new("c", "hw1", 3, key(&["A", "B"])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::AnswerKeyLength {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_empty_quiz_and_missing_id() {
        assert_eq!(
            AssignmentContext::new("c", "hw1", 0, Vec::new()).unwrap_err(),
            ValidationError::NoQuestions
        );
        assert_eq!(
            AssignmentContext::new("c", "  ", 1, key(&["A"])).unwrap_err(),
            ValidationError::MissingAssignmentId
        );
    }
}
