use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::{AssignmentContext, StudentIdentity};
use crate::utils::time::ceil_seconds;

pub const DEFAULT_COOLDOWN_WINDOW_MS: u64 = 120_000;

// ':' joins the components, so it (and '%') must always be escaped inside one.
const KEY_COMPONENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Storage key for the last-attempt timestamp of one student on one assignment.
///
/// Components are trimmed and lower-cased, so `("Jane", " Doe")` and
/// `("jane", "doe ")` share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CooldownKey(String);

impl CooldownKey {
    pub fn derive(context: &AssignmentContext, student: &StudentIdentity) -> Self {
        let key = [
            context.class_id(),
            context.assignment_id(),
            student.first_name(),
            student.last_name(),
        ]
        .iter()
        .map(|component| encode_component(component))
        .collect::<Vec<_>>()
        .join(":");

        // Escapes are upper-case hex; fold them too so the whole key is lower-case.
        Self(key.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CooldownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn encode_component(component: &str) -> String {
    let normalized = component.trim().to_lowercase();
    utf8_percent_encode(&normalized, KEY_COMPONENT_ENCODE_SET).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    Blocked { remaining_ms: i64 },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allowed)
    }

    /// Wait time rounded up to whole seconds, as shown to the student.
    pub fn remaining_secs(&self) -> Option<i64> {
        match self {
            GateDecision::Allowed => None,
            GateDecision::Blocked { remaining_ms } => Some(ceil_seconds(*remaining_ms)),
        }
    }

    pub fn message(&self) -> Option<String> {
        self.remaining_secs()
            .map(|secs| format!("Please wait {}s before retrying.", secs))
    }
}
