use std::sync::Arc;

use async_trait::async_trait;
use credentials::CredentialHasher;
use credentials::IdentityStore;

use crate::errors::ConfigurationError;
use crate::errors::StrategyError;
use crate::lookup::IdentityLookup;
use crate::lookup::VerificationRoutine;
use crate::params::ParamValue;
use crate::strategy::StrategyConfig;

pub const SALTED_PASSWORD_STRATEGY: &str = "salted_password";
pub const SALTED_PASSWORD_ROUTINE: &str = "authenticate_with_salted_password";
pub const SALTED_PASSWORD_FAILURE: &str = "Username or Password incorrect";

/// Verifies `(login, password)` against the salted hashes of an identity store.
pub struct SaltedPasswordRoutine<S>
where
    S: IdentityStore,
{
    hasher: Arc<CredentialHasher<S>>,
}

impl<S> SaltedPasswordRoutine<S>
where
    S: IdentityStore,
{
    pub fn new(hasher: Arc<CredentialHasher<S>>) -> Self {
        Self { hasher }
    }
}

#[async_trait]
impl<S> VerificationRoutine<S::Identity> for SaltedPasswordRoutine<S>
where
    S: IdentityStore,
{
    async fn verify(&self, args: &[ParamValue]) -> Result<Option<S::Identity>, StrategyError> {
        let [login, password] = args else {
            return Err(StrategyError::RoutineArguments {
                routine: SALTED_PASSWORD_ROUTINE.to_owned(),
                expected: 2,
                actual: args.len(),
            });
        };

        // Nested values cannot be credentials.
        let (Some(login), Some(password)) = (login.as_str(), password.as_str()) else {
            return Ok(None);
        };

        Ok(self.hasher.authenticate(login, password).await?)
    }

    fn arity(&self) -> Option<usize> {
        Some(2)
    }
}

/// Lookup target exposing the salted password routine.
pub fn salted_password_lookup<S>(
    name: &str,
    hasher: Arc<CredentialHasher<S>>,
) -> IdentityLookup<S::Identity>
where
    S: IdentityStore,
{
    IdentityLookup::new(name).with_routine(SALTED_PASSWORD_ROUTINE, SaltedPasswordRoutine::new(hasher))
}

/// Strategy configuration reading `login` and `password`.
pub fn salted_password_config<I>(
    target: Arc<IdentityLookup<I>>,
) -> Result<StrategyConfig<I>, ConfigurationError> {
    Ok(StrategyConfig::new()
        .with_lookup_target(target)
        .with_required_params(["login", "password"])?
        .with_verification_routine(SALTED_PASSWORD_ROUTINE)
        .with_failure_message(SALTED_PASSWORD_FAILURE))
}

#[cfg(test)]
mod tests {
    use credentials::Account;
    use credentials::CredentialRecord;
    use credentials::InMemoryIdentityStore;

    use super::*;
    use crate::params::ParamTree;
    use crate::registry::StrategyRegistry;

    async fn registry_with_fred() -> StrategyRegistry<Account> {
        let store = Arc::new(InMemoryIdentityStore::new());
        store.insert(Account::new("fred")).unwrap();
        let hasher = Arc::new(CredentialHasher::new(Arc::clone(&store)));

        let mut fred = store.find_by_login("fred").await.unwrap().unwrap();
        hasher.set_password(&mut fred, "sekrit").await.unwrap();

        let target = Arc::new(salted_password_lookup("accounts", hasher));
        let mut registry = StrategyRegistry::new();
        registry
            .register(SALTED_PASSWORD_STRATEGY, salted_password_config(target).unwrap())
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn test_salted_password_success() {
        let registry = registry_with_fred().await;
        let params = ParamTree::new().with("login", "fred").with("password", "sekrit");

        let mut strategy = registry
            .strategy(SALTED_PASSWORD_STRATEGY, &params, None)
            .unwrap();
        assert!(strategy.is_valid());

        let outcome = strategy.authenticate().await.unwrap();
        assert_eq!(outcome.identity().map(|a| a.login.as_str()), Some("fred"));
    }

    #[tokio::test]
    async fn test_salted_password_wrong_password() {
        let registry = registry_with_fred().await;
        let params = ParamTree::new().with("login", "fred").with("password", "wrong");

        let mut strategy = registry
            .strategy(SALTED_PASSWORD_STRATEGY, &params, None)
            .unwrap();

        let outcome = strategy.authenticate().await.unwrap();
        assert_eq!(outcome.message(), Some(SALTED_PASSWORD_FAILURE));
    }

    #[tokio::test]
    async fn test_nested_password_value_is_rejected() {
        let registry = registry_with_fred().await;
        let params = ParamTree::new()
            .with("login", "fred")
            .with("password", ParamTree::new().with("value", "sekrit"));

        let mut strategy = registry
            .strategy(SALTED_PASSWORD_STRATEGY, &params, None)
            .unwrap();

        assert!(strategy.authenticate().await.unwrap().is_failure());
    }

    #[tokio::test]
    async fn test_blank_stored_hash_fails_with_preset_message() {
        let store = Arc::new(InMemoryIdentityStore::new());
        let mut account = Account::new("fred");
        account.credentials =
            CredentialRecord::from_persisted(Some(String::new()), Some("s".to_string()));
        store.insert(account).unwrap();

        let hasher = Arc::new(CredentialHasher::new(store));
        let target = Arc::new(salted_password_lookup("accounts", hasher));
        let mut registry = StrategyRegistry::new();
        registry
            .register(SALTED_PASSWORD_STRATEGY, salted_password_config(target).unwrap())
            .unwrap();

        let params = ParamTree::new().with("login", "fred").with("password", "x");
        let mut strategy = registry
            .strategy(SALTED_PASSWORD_STRATEGY, &params, None)
            .unwrap();

        let outcome = strategy.authenticate().await.expect("Rejection is not an error");
        assert_eq!(outcome.message(), Some(SALTED_PASSWORD_FAILURE));
    }

    #[tokio::test]
    async fn test_wrong_argument_count() {
        let store: Arc<InMemoryIdentityStore<Account>> = Arc::new(InMemoryIdentityStore::new());
        let routine = SaltedPasswordRoutine::new(Arc::new(CredentialHasher::new(store)));

        let result = routine.verify(&[ParamValue::from("fred")]).await;
        assert!(matches!(
            result,
            Err(StrategyError::RoutineArguments { expected: 2, actual: 1, .. })
        ));
    }
}
