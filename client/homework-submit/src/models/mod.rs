pub mod assignment;
pub mod cooldown;
pub mod outcome;
pub mod payload;
pub mod quiz;
pub mod student;

pub use assignment::AssignmentContext;
pub use cooldown::{CooldownKey, GateDecision, DEFAULT_COOLDOWN_WINDOW_MS};
pub use outcome::Outcome;
pub use payload::SubmissionPayload;
pub use quiz::{Question, QuizDefinition};
pub use student::StudentIdentity;
