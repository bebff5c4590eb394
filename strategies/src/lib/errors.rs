use credentials::CredentialError;
use thiserror::Error;

/// Registration-time misconfiguration.
///
/// Raised while strategies are registered at startup, never while a request
/// is being handled.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Malformed parameter specifier: {0:?}")]
    MalformedSpecifier(String),

    #[error("Unknown identity lookup target: {0}")]
    UnknownLookupTarget(String),

    #[error("Strategy {0} has no identity lookup target and no default is set")]
    NoLookupTarget(String),

    #[error("Lookup target {target} has no verification routine named {routine}")]
    UnknownRoutine { target: String, routine: String },

    #[error("Routine {routine} takes {expected} arguments but {actual} parameters are required")]
    ArityMismatch {
        routine: String,
        expected: usize,
        actual: usize,
    },

    #[error("Strategy already registered: {0}")]
    DuplicateStrategy(String),

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),
}

/// Infrastructure failure while a verification routine runs.
///
/// Rejected credentials are not errors; they surface as a failed outcome.
#[derive(Debug, Clone, Error)]
pub enum StrategyError {
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Routine {routine} expected {expected} arguments, got {actual}")]
    RoutineArguments {
        routine: String,
        expected: usize,
        actual: usize,
    },

    #[error("Verification routine failed: {0}")]
    Routine(String),
}

/// Error building a parameter tree from request input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParamTreeError {
    #[error("Parameters must be an object")]
    NotAnObject,

    #[error("Unsupported parameter value for {0}")]
    UnsupportedValue(String),

    #[error("Conflicting nested parameter: {0}")]
    Conflict(String),
}
