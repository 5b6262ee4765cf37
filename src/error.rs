use thiserror::Error;

/// Errors raised while turning segment weights into a probability distribution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbabilityError {
    #[error("Cannot compute probabilities for a wheel with no segments")]
    EmptyWheel,

    #[error("Segment '{segment_id}' has an invalid weight: {weight}")]
    InvalidWeight { segment_id: String, weight: f64 },

    #[error("The segments of this wheel have a total weight of zero")]
    ZeroTotalWeight,

    #[error("Segment index {index} is out of range for a wheel of {len} segments")]
    SegmentOutOfRange { index: usize, len: usize },
}

/// Errors raised while walking the step graph of a theme.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Step '{step_id}' is revisited after {hops} hops; the step graph contains a cycle")]
    CycleDetected { step_id: String, hops: usize },

    #[error("Sequence path exceeded the ceiling of {limit} steps")]
    StepCeilingExceeded { limit: usize },
}

/// Errors raised while loading or validating theme content.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThemeError {
    #[error("Failed to parse theme JSON: {0}")]
    Json(String),

    #[error("Could not read theme file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Step id '{0}' is declared more than once")]
    DuplicateStep(String),

    #[error("Segment id '{segment_id}' is declared more than once on step '{step_id}'")]
    DuplicateSegment { step_id: String, segment_id: String },

    #[error("Start step '{0}' does not exist in the theme")]
    UnknownStartStep(String),

    #[error("Step '{source_step_id}' points at step '{missing_step_id}', which does not exist")]
    DanglingStepReference {
        source_step_id: String,
        missing_step_id: String,
    },

    #[error("Segment '{segment_id}' on step '{step_id}' has an invalid weight: {weight}")]
    InvalidWeight {
        step_id: String,
        segment_id: String,
        weight: f64,
    },

    #[error("Step '{step_id}' overrides '{segment_id}', missing from step '{target_step_id}'")]
    UnknownOverrideSegment {
        step_id: String,
        target_step_id: String,
        segment_id: String,
    },

    #[error("Step '{0}' has a wheel with no segments")]
    EmptyWheel(String),

    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    #[error("Step '{step_id}' uses the unsupported condition operator '{operator}'")]
    UnsupportedOperator { step_id: String, operator: String },
}

/// Errors raised by the multi-spin coordinator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MultiSpinError {
    #[error("No multi-spin sequence is active")]
    NotActive,

    #[error("All {total} spins of the multi-spin sequence have already been recorded")]
    AlreadyExhausted { total: u32 },
}

/// Errors raised by a live sequence session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Cannot {operation} while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("Step '{0}' was not found in the theme")]
    StepNotFound(String),

    #[error("The theme has no steps to start from")]
    EmptyTheme,

    #[error("Step '{0}' already has a recorded result")]
    StepAlreadyCompleted(String),

    #[error("Step '{0}' has no recorded result yet")]
    StepNotCompleted(String),

    #[error("A multi-spin sequence on step '{0}' must be finished first")]
    MultiSpinPending(String),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Probability(#[from] ProbabilityError),

    #[error(transparent)]
    MultiSpin(#[from] MultiSpinError),
}

/// Errors that can occur when converting a custom content format into a `SequenceTheme`.
#[derive(Error, Debug, Clone)]
pub enum ThemeConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}
