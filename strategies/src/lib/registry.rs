use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::Settings;
use crate::errors::ConfigurationError;
use crate::lookup::IdentityLookup;
use crate::lookup::VerificationRoutine;
use crate::params::ParamTree;
use crate::strategy::AuthenticationStrategy;
use crate::strategy::StrategyConfig;

/// A strategy type whose configuration has been validated and whose lookup
/// target and verification routine have been resolved.
pub struct StrategyDefinition<I> {
    name: String,
    config: StrategyConfig<I>,
    lookup_target: Arc<IdentityLookup<I>>,
    routine: Arc<dyn VerificationRoutine<I>>,
}

impl<I> StrategyDefinition<I> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &StrategyConfig<I> {
        &self.config
    }

    pub fn lookup_target(&self) -> &Arc<IdentityLookup<I>> {
        &self.lookup_target
    }

    pub fn routine(&self) -> &Arc<dyn VerificationRoutine<I>> {
        &self.routine
    }
}

/// Strategy types keyed by symbolic name.
///
/// Populated at startup, then shared read-only across requests. Each
/// registered name owns its own configuration; registering a second name
/// never shares or inherits another name's settings.
pub struct StrategyRegistry<I> {
    default_lookup_target: Option<Arc<IdentityLookup<I>>>,
    strategies: Vec<StrategyDefinition<I>>,
}

impl<I> StrategyRegistry<I>
where
    I: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            default_lookup_target: None,
            strategies: Vec::new(),
        }
    }

    /// Set the lookup target used by strategies that do not configure one.
    ///
    /// Applies to strategies registered afterwards.
    pub fn with_default_lookup_target(mut self, target: Arc<IdentityLookup<I>>) -> Self {
        self.default_lookup_target = Some(target);
        self
    }

    pub fn default_lookup_target(&self) -> Option<&Arc<IdentityLookup<I>>> {
        self.default_lookup_target.as_ref()
    }

    /// Register a new strategy type.
    ///
    /// # Arguments
    /// * `name` - Symbolic strategy name
    /// * `config` - Strategy configuration
    ///
    /// # Returns
    /// The resolved strategy definition
    ///
    /// # Errors
    /// * `DuplicateStrategy` - Name is already registered
    /// * `NoLookupTarget` - No lookup target configured and no default set
    /// * `UnknownRoutine` - Lookup target lacks the configured routine
    /// * `ArityMismatch` - Routine arity differs from the required parameter count
    pub fn register(
        &mut self,
        name: &str,
        config: StrategyConfig<I>,
    ) -> Result<&StrategyDefinition<I>, ConfigurationError> {
        if self.position(name).is_some() {
            return Err(ConfigurationError::DuplicateStrategy(name.to_owned()));
        }

        let definition = self.resolve(name, config)?;
        self.strategies.push(definition);
        Ok(&self.strategies[self.strategies.len() - 1])
    }

    /// Mutate the configuration of a strategy type, starting from defaults
    /// if the name is not registered yet, and re-validate it.
    ///
    /// On error the previous registration is left untouched.
    ///
    /// # Errors
    /// * `NoLookupTarget` - No lookup target configured and no default set
    /// * `UnknownRoutine` - Lookup target lacks the configured routine
    /// * `ArityMismatch` - Routine arity differs from the required parameter count
    pub fn configure(
        &mut self,
        name: &str,
        mutator: impl FnOnce(&mut StrategyConfig<I>),
    ) -> Result<&StrategyDefinition<I>, ConfigurationError> {
        let config = self
            .config(name)
            .cloned()
            .unwrap_or_default()
            .configure(mutator);
        let definition = self.resolve(name, config)?;

        let index = match self.position(name) {
            Some(index) => {
                self.strategies[index] = definition;
                index
            }
            None => {
                self.strategies.push(definition);
                self.strategies.len() - 1
            }
        };

        Ok(&self.strategies[index])
    }

    pub fn get(&self, name: &str) -> Option<&StrategyDefinition<I>> {
        self.position(name).map(|index| &self.strategies[index])
    }

    pub fn config(&self, name: &str) -> Option<&StrategyConfig<I>> {
        self.get(name).map(StrategyDefinition::config)
    }

    /// Strategy names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.strategies.iter().map(StrategyDefinition::name)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Construct a request-scoped strategy instance.
    ///
    /// # Errors
    /// * `UnknownStrategy` - Name is not registered
    pub fn strategy<'a>(
        &'a self,
        name: &str,
        params: &'a ParamTree,
        scope: Option<&'a str>,
    ) -> Result<AuthenticationStrategy<'a, I>, ConfigurationError> {
        let definition = self
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownStrategy(name.to_owned()))?;

        Ok(AuthenticationStrategy::new(definition, params, scope))
    }

    /// Build a registry from loaded settings.
    ///
    /// # Arguments
    /// * `settings` - Symbolic strategy configuration
    /// * `targets` - Available lookup targets by name
    ///
    /// # Errors
    /// * `UnknownLookupTarget` - Settings name a target not in `targets`
    /// * `MalformedSpecifier` - A required parameter specifier is malformed
    /// * Any error `register` can return
    pub fn from_settings(
        settings: &Settings,
        targets: &BTreeMap<String, Arc<IdentityLookup<I>>>,
    ) -> Result<Self, ConfigurationError> {
        let find_target = |name: &str| {
            targets
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigurationError::UnknownLookupTarget(name.to_owned()))
        };

        let mut registry = Self::new();
        if let Some(name) = &settings.default_lookup_target {
            registry.default_lookup_target = Some(find_target(name)?);
        }

        for strategy in &settings.strategies {
            let mut config =
                StrategyConfig::new().with_required_params(&strategy.required_params)?;

            if let Some(name) = &strategy.lookup_target {
                config.lookup_target = Some(find_target(name)?);
            }
            if let Some(routine) = &strategy.verification_routine {
                config.verification_routine = routine.clone();
            }
            if let Some(message) = &strategy.failure_message {
                config.failure_message = message.clone();
            }

            registry.register(&strategy.name, config)?;
        }

        Ok(registry)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.strategies.iter().position(|s| s.name == name)
    }

    fn resolve(
        &self,
        name: &str,
        config: StrategyConfig<I>,
    ) -> Result<StrategyDefinition<I>, ConfigurationError> {
        let lookup_target = config
            .lookup_target
            .clone()
            .or_else(|| self.default_lookup_target.clone())
            .ok_or_else(|| ConfigurationError::NoLookupTarget(name.to_owned()))?;

        let routine = lookup_target
            .routine(&config.verification_routine)
            .ok_or_else(|| ConfigurationError::UnknownRoutine {
                target: lookup_target.name().to_owned(),
                routine: config.verification_routine.clone(),
            })?;

        if let Some(expected) = routine.arity() {
            if expected != config.required_params.len() {
                return Err(ConfigurationError::ArityMismatch {
                    routine: config.verification_routine.clone(),
                    expected,
                    actual: config.required_params.len(),
                });
            }
        }

        tracing::info!(
            strategy = name,
            lookup_target = lookup_target.name(),
            routine = %config.verification_routine,
            required_params = config.required_params.len(),
            "Strategy registered"
        );

        Ok(StrategyDefinition {
            name: name.to_owned(),
            config,
            lookup_target,
            routine,
        })
    }
}

impl<I> Default for StrategyRegistry<I>
where
    I: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategySettings;
    use crate::lookup::FnRoutine;
    use crate::params::ParamValue;

    fn users() -> Arc<IdentityLookup<String>> {
        Arc::new(
            IdentityLookup::new("User")
                .with_fn("authenticate", |args| {
                    args.first().and_then(ParamValue::as_str).map(str::to_owned)
                })
                .with_routine(
                    "authenticate_pair",
                    FnRoutine::new(|_: &[ParamValue]| None).with_arity(2),
                ),
        )
    }

    #[test]
    fn test_register_without_target_or_default() {
        let mut registry: StrategyRegistry<String> = StrategyRegistry::new();

        let result = registry.register("simple", StrategyConfig::new());
        assert_eq!(
            result.err(),
            Some(ConfigurationError::NoLookupTarget("simple".to_string()))
        );
    }

    #[test]
    fn test_register_falls_back_to_default_target() {
        let mut registry = StrategyRegistry::new().with_default_lookup_target(users());

        let definition = registry
            .register("simple", StrategyConfig::new())
            .expect("Registration failed");
        assert_eq!(definition.lookup_target().name(), "User");
    }

    #[test]
    fn test_register_unknown_routine() {
        let mut registry = StrategyRegistry::new().with_default_lookup_target(users());

        let result = registry.register(
            "simple",
            StrategyConfig::new().with_verification_routine("authenticate_for_fred"),
        );
        assert_eq!(
            result.err(),
            Some(ConfigurationError::UnknownRoutine {
                target: "User".to_string(),
                routine: "authenticate_for_fred".to_string(),
            })
        );
    }

    #[test]
    fn test_register_arity_mismatch() {
        let mut registry = StrategyRegistry::new().with_default_lookup_target(users());

        let config = StrategyConfig::new()
            .with_verification_routine("authenticate_pair")
            .require("login")
            .unwrap();
        let result = registry.register("pair", config);

        assert_eq!(
            result.err(),
            Some(ConfigurationError::ArityMismatch {
                routine: "authenticate_pair".to_string(),
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = StrategyRegistry::new().with_default_lookup_target(users());
        registry
            .register("simple", StrategyConfig::new())
            .expect("Registration failed");

        let result = registry.register("simple", StrategyConfig::new());
        assert_eq!(
            result.err(),
            Some(ConfigurationError::DuplicateStrategy("simple".to_string()))
        );
    }

    #[test]
    fn test_configure_creates_default_on_first_access() {
        let mut registry = StrategyRegistry::new().with_default_lookup_target(users());

        let definition = registry
            .configure("simple", |_| {})
            .expect("Configure failed");

        assert_eq!(definition.config().verification_routine, "authenticate");
        assert_eq!(definition.config().failure_message, "Could not login");
        assert!(definition.config().required_params.is_empty());
    }

    #[test]
    fn test_configured_types_do_not_share_config() {
        let mut registry = StrategyRegistry::new().with_default_lookup_target(users());
        registry
            .configure("simple", |c| {
                c.failure_message = "Simple failed".to_string();
                c.required_params = vec!["login".parse().unwrap()];
            })
            .expect("Configure failed");

        let specialized = registry
            .configure("specialized", |_| {})
            .expect("Configure failed");

        assert_eq!(specialized.config().failure_message, "Could not login");
        assert!(specialized.config().required_params.is_empty());
        assert_eq!(
            registry.config("simple").map(|c| c.failure_message.as_str()),
            Some("Simple failed")
        );
    }

    #[test]
    fn test_failed_configure_keeps_previous_registration() {
        let mut registry = StrategyRegistry::new().with_default_lookup_target(users());
        registry
            .configure("simple", |_| {})
            .expect("Configure failed");

        let result = registry.configure("simple", |c| {
            c.verification_routine = "missing".to_string();
        });

        assert!(result.is_err());
        assert_eq!(
            registry.config("simple").map(|c| c.verification_routine.as_str()),
            Some("authenticate")
        );
    }

    #[test]
    fn test_unknown_strategy() {
        let registry: StrategyRegistry<String> = StrategyRegistry::new();
        let params = ParamTree::new();

        assert!(matches!(
            registry.strategy("simple", &params, None),
            Err(ConfigurationError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            default_lookup_target: Some("User".to_string()),
            strategies: vec![StrategySettings {
                name: "simple".to_string(),
                lookup_target: None,
                required_params: vec!["user:login".to_string()],
                verification_routine: None,
                failure_message: Some("Unknown user".to_string()),
            }],
            seed_identities: Vec::new(),
        };
        let targets = BTreeMap::from([("User".to_string(), users())]);

        let registry = StrategyRegistry::from_settings(&settings, &targets)
            .expect("Registry construction failed");

        let config = registry.config("simple").expect("Strategy missing");
        assert_eq!(config.failure_message, "Unknown user");
        assert_eq!(config.required_params[0].to_string(), "user:login");
    }

    #[test]
    fn test_from_settings_unknown_target() {
        let settings = Settings {
            default_lookup_target: Some("Account".to_string()),
            ..Settings::default()
        };
        let targets = BTreeMap::from([("User".to_string(), users())]);

        assert_eq!(
            StrategyRegistry::from_settings(&settings, &targets).err(),
            Some(ConfigurationError::UnknownLookupTarget("Account".to_string()))
        );
    }
}
