use thiserror::Error;

/// Error for hashing operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}

/// Error raised by an identity store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Identity not found: {0}")]
    NotFound(String),

    #[error("Identity store unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error for credential operations
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Password confirmation does not match")]
    ConfirmationMismatch,

    #[error("Credentials missing: no password hash has been set")]
    MissingCredentials,
}
