use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use credentials::Account;
use credentials::CredentialHasher;
use credentials::IdentityStore;
use credentials::InMemoryIdentityStore;
use strategies::config::Settings;
use strategies::params::ParamTree;
use strategies::presets::salted_password_config;
use strategies::presets::salted_password_lookup;
use strategies::presets::SALTED_PASSWORD_STRATEGY;
use strategies::AuthenticationOutcome;
use strategies::StrategyRegistry;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Lookup target name the seeded account store is registered under.
const ACCOUNTS_TARGET: &str = "accounts";

/// Run configured authentication strategies against one set of request
/// parameters, trying them in order until one succeeds.
#[derive(Parser, Debug)]
#[command(
    name = "strategy-check",
    version,
    about = "Run authentication strategies against request parameters",
    after_help = "EXAMPLES:\n    \
                  strategy-check 'login=fred&password=sekrit'\n    \
                  strategy-check --json '{\"user\":{\"login\":\"fred\"}}' --strategy nested\n    \
                  strategy-check --config strategies.toml 'login=fred&password=sekrit'"
)]
struct Cli {
    /// Form encoded parameters, e.g. `login=fred&user[password]=sekrit`
    query: Option<String>,

    /// Parameters as a JSON object instead of a form encoded string
    #[arg(long, conflicts_with = "query")]
    json: Option<String>,

    /// Configuration file (defaults to config/default.toml and config/$RUN_MODE.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Strategy to try; repeat to try several in order. Defaults to all registered.
    #[arg(short, long)]
    strategy: Vec<String>,

    /// Scope identifier passed to the strategies
    #[arg(long)]
    scope: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "strategies=debug,credentials=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    tracing::info!(
        strategies = settings.strategies.len(),
        seed_identities = settings.seed_identities.len(),
        "Configuration loaded"
    );

    let store = Arc::new(InMemoryIdentityStore::<Account>::new());
    let hasher = Arc::new(CredentialHasher::new(Arc::clone(&store)));

    for seed in &settings.seed_identities {
        store.insert(Account::new(seed.login.as_str()))?;
        let mut account = store
            .find_by_login(&seed.login)
            .await?
            .with_context(|| format!("seeded account {} not found", seed.login))?;
        hasher.set_password(&mut account, &seed.password).await?;
    }

    let accounts = Arc::new(salted_password_lookup(ACCOUNTS_TARGET, hasher));
    let targets = BTreeMap::from([(ACCOUNTS_TARGET.to_string(), Arc::clone(&accounts))]);

    let mut registry = StrategyRegistry::from_settings(&settings, &targets)?;
    if registry.is_empty() {
        registry.register(SALTED_PASSWORD_STRATEGY, salted_password_config(accounts)?)?;
    }

    let params = match (&cli.json, &cli.query) {
        (Some(json), _) => serde_json::from_str::<ParamTree>(json).context("invalid JSON parameters")?,
        (None, Some(query)) => ParamTree::from_query(query)?,
        (None, None) => ParamTree::new(),
    };

    let names: Vec<String> = if cli.strategy.is_empty() {
        registry.names().map(str::to_owned).collect()
    } else {
        cli.strategy.clone()
    };

    for name in &names {
        let mut strategy = registry.strategy(name, &params, cli.scope.as_deref())?;

        if !strategy.is_valid() {
            println!("{}: skipped (missing parameters)", name);
            continue;
        }

        match strategy.authenticate().await? {
            AuthenticationOutcome::Success(account) => {
                println!("{}: authenticated {} ({})", name, account.login, account.id);
                return Ok(());
            }
            AuthenticationOutcome::Failure(message) => println!("{}: {}", name, message),
            AuthenticationOutcome::Undetermined => println!("{}: undetermined", name),
        }
    }

    anyhow::bail!("no strategy authenticated the request")
}
