//! Salted password credentials for identity records.
//!
//! Provides the credential half of the authentication engine:
//! - Salted password hashing (Argon2id over password and record salt)
//! - Credential records embedded in identity types
//! - An identity store port with compare-and-set salt persistence
//! - An in-memory store for tests and local tooling
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use credentials::{Account, CredentialHasher, IdentityStore, InMemoryIdentityStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(InMemoryIdentityStore::new());
//! store.insert(Account::new("fred")).unwrap();
//!
//! let hasher = CredentialHasher::new(Arc::clone(&store));
//! let mut fred = store.find_by_login("fred").await.unwrap().unwrap();
//! hasher.set_password(&mut fred, "sekrit").await.unwrap();
//!
//! assert!(hasher.verify("fred", "sekrit").await.unwrap());
//! # }
//! ```

pub mod account;
pub mod errors;
pub mod hasher;
pub mod memory;
pub mod password;
pub mod ports;
pub mod record;

pub use account::Account;
pub use errors::CredentialError;
pub use errors::PasswordError;
pub use errors::StoreError;
pub use hasher::CredentialHasher;
pub use memory::InMemoryIdentityStore;
pub use ports::IdentityStore;
pub use record::CredentialRecord;
pub use record::Credentialed;
