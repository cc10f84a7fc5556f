use thiserror::Error;

/// Input rejected before anything reaches the cooldown gate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter both first and last names.")]
    BlankName,

    #[error("Homework id is missing from the quiz definition.")]
    MissingAssignmentId,

    #[error("Homework has no questions.")]
    NoQuestions,

    #[error("Answer key has {actual} entries but the homework has {expected} questions.")]
    AnswerKeyLength { expected: usize, actual: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Expected {expected} answers but got {actual}.")]
    AnswerCountMismatch { expected: usize, actual: usize },
}

/// Failure to obtain any reply body from the scorer.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("scorer responded with status {status} and an empty body")]
    Status { status: u16 },
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("Network / script error: {0}")]
    Transport(#[from] TransportError),
}
