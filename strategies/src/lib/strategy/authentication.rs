use std::sync::Arc;

use crate::errors::StrategyError;
use crate::lookup::IdentityLookup;
use crate::params::extract;
use crate::params::ParamSpec;
use crate::params::ParamTree;
use crate::params::ParamValue;
use crate::params::RequestContext;
use crate::registry::StrategyDefinition;
use crate::strategy::config::StrategyConfig;
use crate::strategy::outcome::AuthenticationOutcome;

/// A registered strategy bound to one request's parameters.
///
/// The host checks `is_valid` to decide whether to try the strategy, then
/// calls `authenticate` and inspects the outcome.
pub struct AuthenticationStrategy<'a, I> {
    definition: &'a StrategyDefinition<I>,
    params: &'a ParamTree,
    scope: Option<&'a str>,
    outcome: AuthenticationOutcome<I>,
}

impl<'a, I> AuthenticationStrategy<'a, I>
where
    I: Send + 'static,
{
    pub fn new(
        definition: &'a StrategyDefinition<I>,
        params: &'a ParamTree,
        scope: Option<&'a str>,
    ) -> Self {
        Self {
            definition,
            params,
            scope,
            outcome: AuthenticationOutcome::Undetermined,
        }
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope
    }

    pub fn config(&self) -> &StrategyConfig<I> {
        self.definition.config()
    }

    pub fn required_params(&self) -> &[ParamSpec] {
        &self.definition.config().required_params
    }

    /// Lookup target the strategy verifies against: the configured one, or
    /// the registry default it was resolved to at registration.
    pub fn identity_lookup_target(&self) -> &Arc<IdentityLookup<I>> {
        self.definition.lookup_target()
    }

    pub fn outcome(&self) -> &AuthenticationOutcome<I> {
        &self.outcome
    }

    pub fn into_outcome(self) -> AuthenticationOutcome<I> {
        self.outcome
    }

    /// Resolve every required parameter in declaration order.
    ///
    /// # Returns
    /// All values, or None as soon as one parameter is missing
    pub fn required_param_values(&self) -> Option<Vec<ParamValue>> {
        let context = RequestContext::new(self.params, self.scope);
        let required = self.required_params();
        let mut values = Vec::with_capacity(required.len());

        for spec in required {
            match extract(spec, &context) {
                Some(value) => values.push(value),
                None => {
                    tracing::debug!(
                        strategy = self.name(),
                        param = %spec,
                        "Required parameter missing"
                    );
                    return None;
                }
            }
        }

        Some(values)
    }

    /// Whether every required parameter is present. A strategy without
    /// required parameters is always valid.
    pub fn is_valid(&self) -> bool {
        self.required_param_values().is_some()
    }

    /// Run the verification routine with the resolved parameters.
    ///
    /// Sets the outcome once; later calls return it without running the
    /// routine again. Missing parameters fail the strategy without calling
    /// the routine.
    ///
    /// # Errors
    /// * `StrategyError` - The routine hit an infrastructure failure; the
    ///   outcome stays undetermined
    pub async fn authenticate(&mut self) -> Result<&AuthenticationOutcome<I>, StrategyError> {
        if !self.outcome.is_undetermined() {
            return Ok(&self.outcome);
        }

        let definition = self.definition;
        let failure_message = &definition.config().failure_message;

        let Some(values) = self.required_param_values() else {
            tracing::warn!(
                strategy = self.name(),
                scope = self.scope,
                "Authentication attempted without required parameters"
            );
            self.outcome = AuthenticationOutcome::Failure(failure_message.clone());
            return Ok(&self.outcome);
        };

        let identity = definition.routine().verify(&values).await?;

        self.outcome = match identity {
            Some(identity) => {
                tracing::info!(strategy = self.name(), scope = self.scope, "Authenticated");
                AuthenticationOutcome::Success(identity)
            }
            None => {
                tracing::warn!(
                    strategy = self.name(),
                    scope = self.scope,
                    "Credentials rejected"
                );
                AuthenticationOutcome::Failure(failure_message.clone())
            }
        };

        Ok(&self.outcome)
    }
}
