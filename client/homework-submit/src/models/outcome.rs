use serde::Serialize;

/// Percentage of the score kept for late submissions.
pub const LATE_CAP_PERCENT: i64 = 85;

/// Interpreted scorer reply. `total` is the question count of the assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    FirstSubmission {
        raw_score: i64,
        total: usize,
        late: bool,
    },
    RetryAccepted {
        raw_score: i64,
        display_score: i64,
        total: usize,
        capped: bool,
    },
    RetryRejected {
        display_score: i64,
        previous_score: i64,
        total: usize,
    },
    InvalidName,
    LimitExceeded,
    ServerError {
        detail: String,
    },
    Unrecognized {
        raw: String,
    },
}

impl Outcome {
    /// Score that stands after this reply, after any cap.
    ///
    /// For a rejected retry this is `previous_score`, not the variant's own
    /// `display_score`, which holds the retry that was discarded.
    pub fn effective_score(&self) -> Option<i64> {
        match self {
            Outcome::FirstSubmission {
                raw_score, late, ..
            } => Some(if *late {
                apply_late_cap(*raw_score)
            } else {
                *raw_score
            }),
            Outcome::RetryAccepted { display_score, .. } => Some(*display_score),
            Outcome::RetryRejected { previous_score, .. } => Some(*previous_score),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::FirstSubmission { late: false, .. } => "first_submission",
            Outcome::FirstSubmission { late: true, .. } => "late_submission",
            Outcome::RetryAccepted { .. } => "retry_accepted",
            Outcome::RetryRejected { .. } => "retry_rejected",
            Outcome::InvalidName => "invalid_name",
            Outcome::LimitExceeded => "limit_exceeded",
            Outcome::ServerError { .. } => "server_error",
            Outcome::Unrecognized { .. } => "unrecognized",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Outcome::InvalidName
                | Outcome::LimitExceeded
                | Outcome::ServerError { .. }
                | Outcome::Unrecognized { .. }
        )
    }

    pub fn message(&self) -> String {
        match self {
            Outcome::FirstSubmission {
                raw_score,
                total,
                late: false,
            } => format!(
                "First submission ✔\nScore {}/{}\nOne retry allowed (85 % cap).",
                raw_score, total
            ),
            Outcome::FirstSubmission {
                raw_score,
                total,
                late: true,
            } => format!(
                "Late submission → 85 % cap.\nScore {}/{} (raw {}/{})\nOne retry left.",
                apply_late_cap(*raw_score),
                total,
                raw_score,
                total
            ),
            Outcome::RetryAccepted {
                raw_score,
                display_score,
                total,
                capped: true,
            } => format!(
                "Retry recorded ✔\nRaw score: {}/{}\nScore (85 % cap): {}/{}\nNo more attempts.",
                raw_score, total, display_score, total
            ),
            Outcome::RetryAccepted {
                display_score,
                total,
                capped: false,
                ..
            } => format!(
                "Retry recorded ✔\nScore: {}/{}\nNo more attempts.",
                display_score, total
            ),
            Outcome::RetryRejected {
                display_score,
                previous_score,
                total,
            } => format!(
                "Retry recorded.\nRetry score {}/{} is not higher than your previous {}/{}.\nYour higher score {}/{} is kept.\nNo more attempts.",
                display_score, total, previous_score, total, previous_score, total
            ),
            Outcome::InvalidName => "Name not in roster.".to_string(),
            Outcome::LimitExceeded => "You already submitted twice.".to_string(),
            Outcome::ServerError { detail } => format!("Server error: {}", detail),
            Outcome::Unrecognized { raw } => format!("Unexpected: {}", raw),
        }
    }
}

/// `ceil(raw * 0.85)`, computed in integers.
pub fn apply_late_cap(raw_score: i64) -> i64 {
    let scaled = raw_score.saturating_mul(LATE_CAP_PERCENT);
    scaled.div_euclid(100) + i64::from(scaled.rem_euclid(100) != 0)
}
