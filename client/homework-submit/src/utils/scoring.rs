use crate::models::{AssignmentContext, StudentIdentity};

/// Score computed on the student's machine, without the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalScore {
    pub correct: usize,
    pub total: usize,
}

impl LocalScore {
    pub fn message(&self, student: &StudentIdentity) -> String {
        format!(
            "Hi {}!  Your score: {} / {}",
            student.first_name(),
            self.correct,
            self.total
        )
    }
}

/// Counts answers equal to the key. Unanswered and surplus entries never count.
pub fn score_locally(context: &AssignmentContext, answers: &[Option<String>]) -> LocalScore {
    let correct = context
        .answer_key()
        .iter()
        .zip(answers)
        .filter(|(expected, given)| {
            given
                .as_deref()
                .map(|given| given.trim() == expected.trim())
                .unwrap_or(false)
        })
        .count();

    LocalScore {
        correct,
        total: context.question_count(),
    }
}
