pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{PayloadError, SubmitError, TransportError, ValidationError};
pub use models::{AssignmentContext, GateDecision, Outcome, StudentIdentity, SubmissionPayload};
pub use services::{parse_reply, SubmissionGate, SubmissionResult, SubmissionService};
