pub mod authentication;
pub mod config;
pub mod outcome;

pub use authentication::AuthenticationStrategy;
pub use config::StrategyConfig;
pub use outcome::AuthenticationOutcome;
