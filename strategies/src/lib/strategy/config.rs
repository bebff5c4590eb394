use std::fmt;
use std::sync::Arc;

use crate::errors::ConfigurationError;
use crate::lookup::IdentityLookup;
use crate::params::ParamSpec;

pub const DEFAULT_VERIFICATION_ROUTINE: &str = "authenticate";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Could not login";

/// Configuration of one strategy type.
///
/// Built during registration and read-only afterwards.
pub struct StrategyConfig<I> {
    /// Identity lookup target; falls back to the registry default when None.
    pub lookup_target: Option<Arc<IdentityLookup<I>>>,
    /// Parameters that must all be present, in the order they are passed to
    /// the verification routine.
    pub required_params: Vec<ParamSpec>,
    pub verification_routine: String,
    pub failure_message: String,
}

impl<I> StrategyConfig<I> {
    pub fn new() -> Self {
        Self {
            lookup_target: None,
            required_params: Vec::new(),
            verification_routine: DEFAULT_VERIFICATION_ROUTINE.to_owned(),
            failure_message: DEFAULT_FAILURE_MESSAGE.to_owned(),
        }
    }

    /// Apply a mutation and return the updated configuration.
    pub fn configure(mut self, mutator: impl FnOnce(&mut Self)) -> Self {
        mutator(&mut self);
        self
    }

    pub fn with_lookup_target(mut self, target: Arc<IdentityLookup<I>>) -> Self {
        self.lookup_target = Some(target);
        self
    }

    /// Append a required parameter parsed from a raw specifier.
    ///
    /// # Errors
    /// * `MalformedSpecifier` - Specifier has an empty segment
    pub fn require(mut self, raw: &str) -> Result<Self, ConfigurationError> {
        self.required_params.push(ParamSpec::parse(raw)?);
        Ok(self)
    }

    /// Replace the required parameters with parsed raw specifiers.
    ///
    /// # Errors
    /// * `MalformedSpecifier` - Any specifier has an empty segment
    pub fn with_required_params<S>(
        mut self,
        raw: impl IntoIterator<Item = S>,
    ) -> Result<Self, ConfigurationError>
    where
        S: AsRef<str>,
    {
        self.required_params = raw
            .into_iter()
            .map(|spec| ParamSpec::parse(spec.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Append an already-built specifier, typically a computed one.
    pub fn with_param(mut self, spec: ParamSpec) -> Self {
        self.required_params.push(spec);
        self
    }

    pub fn with_verification_routine(mut self, routine: impl Into<String>) -> Self {
        self.verification_routine = routine.into();
        self
    }

    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }
}

impl<I> Default for StrategyConfig<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Clone for StrategyConfig<I> {
    fn clone(&self) -> Self {
        Self {
            lookup_target: self.lookup_target.clone(),
            required_params: self.required_params.clone(),
            verification_routine: self.verification_routine.clone(),
            failure_message: self.failure_message.clone(),
        }
    }
}

impl<I> fmt::Debug for StrategyConfig<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyConfig")
            .field(
                "lookup_target",
                &self.lookup_target.as_ref().map(|target| target.name()),
            )
            .field("required_params", &self.required_params)
            .field("verification_routine", &self.verification_routine)
            .field("failure_message", &self.failure_message)
            .finish()
    }
}
