//! Interpretation of the scorer's pipe-delimited reply.
//!
//! ```text
//! SUBMITTED|<raw>|<LATE|ONTIME>
//! RETRY_HIGH|<raw>|<displayed>|<CAP|NOCAP>
//! RETRY_LOW|<displayed>|<previous>
//! ERR|INVALID_NAME
//! ERR|LIMIT_EXCEEDED
//! ERR|<detail>
//! ```
//!
//! Anything else is `Outcome::Unrecognized`. Parsing is total: missing or
//! malformed numeric fields read as 0.

use crate::models::Outcome;

const TAG_SUBMITTED: &str = "SUBMITTED";
const TAG_RETRY_HIGH: &str = "RETRY_HIGH";
const TAG_RETRY_LOW: &str = "RETRY_LOW";
const TAG_ERROR: &str = "ERR";

const FLAG_LATE: &str = "LATE";
const FLAG_CAP: &str = "CAP";

const ERR_INVALID_NAME: &str = "INVALID_NAME";
const ERR_LIMIT_EXCEEDED: &str = "LIMIT_EXCEEDED";

pub fn parse_reply(reply: &str, total: usize) -> Outcome {
    let trimmed = reply.trim();
    let (tag, rest) = match trimmed.split_once('|') {
        Some((tag, rest)) => (tag, Some(rest)),
        None => (trimmed, None),
    };
    let fields: Vec<&str> = rest.map(|r| r.split('|').collect()).unwrap_or_default();

    let outcome = match tag {
        TAG_SUBMITTED => Outcome::FirstSubmission {
            raw_score: int_field(&fields, 0),
            total,
            late: flag_field(&fields, 1, FLAG_LATE),
        },
        TAG_RETRY_HIGH => Outcome::RetryAccepted {
            raw_score: int_field(&fields, 0),
            display_score: int_field(&fields, 1),
            total,
            capped: flag_field(&fields, 2, FLAG_CAP),
        },
        TAG_RETRY_LOW => Outcome::RetryRejected {
            display_score: int_field(&fields, 0),
            previous_score: int_field(&fields, 1),
            total,
        },
        TAG_ERROR => match rest.unwrap_or_default() {
            ERR_INVALID_NAME => Outcome::InvalidName,
            ERR_LIMIT_EXCEEDED => Outcome::LimitExceeded,
            detail => Outcome::ServerError {
                detail: detail.to_string(),
            },
        },
        _ => Outcome::Unrecognized {
            raw: reply.to_string(),
        },
    };

    tracing::debug!("Interpreted scorer reply as {}", outcome.label());
    outcome
}

fn int_field(fields: &[&str], index: usize) -> i64 {
    fields
        .get(index)
        .and_then(|field| field.trim().parse().ok())
        .unwrap_or(0)
}

fn flag_field(fields: &[&str], index: usize, flag: &str) -> bool {
    fields.get(index).map(|field| field.trim()) == Some(flag)
}
