/// Result of running a strategy against one request.
///
/// Starts `Undetermined` and moves to `Success` or `Failure` exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationOutcome<I> {
    Undetermined,
    Success(I),
    Failure(String),
}

impl<I> AuthenticationOutcome<I> {
    pub fn is_undetermined(&self) -> bool {
        matches!(self, AuthenticationOutcome::Undetermined)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AuthenticationOutcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, AuthenticationOutcome::Failure(_))
    }

    pub fn identity(&self) -> Option<&I> {
        match self {
            AuthenticationOutcome::Success(identity) => Some(identity),
            _ => None,
        }
    }

    /// Failure message, if the strategy failed.
    pub fn message(&self) -> Option<&str> {
        match self {
            AuthenticationOutcome::Failure(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

impl<I> Default for AuthenticationOutcome<I> {
    fn default() -> Self {
        AuthenticationOutcome::Undetermined
    }
}
