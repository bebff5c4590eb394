#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use credentials::Account;
use credentials::CredentialHasher;
use credentials::IdentityStore;
use credentials::InMemoryIdentityStore;
use mockall::mock;
use strategies::lookup::IdentityLookup;
use strategies::lookup::VerificationRoutine;
use strategies::params::ParamTree;
use strategies::params::ParamValue;
use strategies::presets::salted_password_config;
use strategies::presets::salted_password_lookup;
use strategies::presets::SALTED_PASSWORD_STRATEGY;
use strategies::StrategyConfig;
use strategies::StrategyError;
use strategies::StrategyRegistry;

mock! {
    pub Routine {}

    #[async_trait]
    impl VerificationRoutine<String> for Routine {
        async fn verify(&self, args: &[ParamValue]) -> Result<Option<String>, StrategyError>;
        fn arity(&self) -> Option<usize>;
    }
}

/// Mock routine without a fixed arity; callers add `verify` expectations.
pub fn routine() -> MockRoutine {
    let mut routine = MockRoutine::new();
    routine.expect_arity().returning(|| None);
    routine
}

/// Registry whose default `User` target exposes `routine` as `routine_name`,
/// with a single strategy `simple` requiring `required`.
pub fn simple_registry(
    routine_name: &str,
    routine: MockRoutine,
    required: &[&str],
) -> StrategyRegistry<String> {
    let users = Arc::new(IdentityLookup::new("User").with_routine(routine_name, routine));
    let mut registry = StrategyRegistry::new().with_default_lookup_target(users);

    let config = StrategyConfig::new()
        .with_required_params(required)
        .expect("Invalid specifiers")
        .with_verification_routine(routine_name);
    registry
        .register("simple", config)
        .expect("Registration failed");

    registry
}

pub fn params(query: &str) -> ParamTree {
    ParamTree::from_query(query).expect("Invalid query")
}

pub fn scalars(args: &[ParamValue]) -> Vec<&str> {
    args.iter().filter_map(ParamValue::as_str).collect()
}

/// Salted password strategy over an in-memory store seeded with accounts.
pub struct SaltedFixture {
    pub store: Arc<InMemoryIdentityStore<Account>>,
    pub hasher: Arc<CredentialHasher<InMemoryIdentityStore<Account>>>,
    pub registry: StrategyRegistry<Account>,
}

impl SaltedFixture {
    pub async fn with_accounts(accounts: &[(&str, &str)]) -> Self {
        let store = Arc::new(InMemoryIdentityStore::new());
        let hasher = Arc::new(CredentialHasher::new(Arc::clone(&store)));

        for (login, password) in accounts {
            store
                .insert(Account::new(*login))
                .expect("Failed to insert account");
            let mut account = store
                .find_by_login(login)
                .await
                .expect("Lookup failed")
                .expect("Account missing");
            hasher
                .set_password(&mut account, password)
                .await
                .expect("Failed to set password");
        }

        let target = Arc::new(salted_password_lookup("accounts", Arc::clone(&hasher)));
        let mut registry = StrategyRegistry::new();
        registry
            .register(
                SALTED_PASSWORD_STRATEGY,
                salted_password_config(target).expect("Invalid preset"),
            )
            .expect("Registration failed");

        Self {
            store,
            hasher,
            registry,
        }
    }
}
