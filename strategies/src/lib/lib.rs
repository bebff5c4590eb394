//! Pluggable authentication strategies.
//!
//! A strategy declares which request parameters it needs, where to find them
//! (top-level keys, nested paths or computed values) and which verification
//! routine of an identity lookup target to call with them. The host decides
//! per request whether a strategy is eligible (`is_valid`) and then runs it
//! (`authenticate`) to obtain a success or failure outcome.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use strategies::lookup::IdentityLookup;
//! use strategies::params::{ParamTree, ParamValue};
//! use strategies::registry::StrategyRegistry;
//! use strategies::strategy::{AuthenticationOutcome, StrategyConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let users = Arc::new(IdentityLookup::new("User").with_fn("authenticate", |args| {
//!     args.first()
//!         .and_then(ParamValue::as_str)
//!         .filter(|login| *login == "fred")
//!         .map(str::to_owned)
//! }));
//!
//! let mut registry = StrategyRegistry::new().with_default_lookup_target(users);
//! registry
//!     .register("simple", StrategyConfig::new().require("login").unwrap())
//!     .unwrap();
//!
//! let params = ParamTree::from_query("login=fred").unwrap();
//! let mut strategy = registry.strategy("simple", &params, None).unwrap();
//!
//! assert!(strategy.is_valid());
//! assert_eq!(
//!     strategy.authenticate().await.unwrap(),
//!     &AuthenticationOutcome::Success("fred".to_string())
//! );
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod lookup;
pub mod params;
pub mod presets;
pub mod registry;
pub mod strategy;

pub use errors::ConfigurationError;
pub use errors::ParamTreeError;
pub use errors::StrategyError;
pub use registry::StrategyRegistry;
pub use strategy::AuthenticationOutcome;
pub use strategy::AuthenticationStrategy;
pub use strategy::StrategyConfig;
