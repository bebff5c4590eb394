use async_trait::async_trait;

use crate::errors::StoreError;
use crate::record::Credentialed;

/// Persistence port for identity records carrying credentials.
#[async_trait]
pub trait IdentityStore: Send + Sync + 'static {
    type Identity: Credentialed + Clone + Send + Sync + 'static;

    /// Retrieve an identity by login.
    ///
    /// # Arguments
    /// * `login` - Login to search for
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    async fn find_by_login(&self, login: &str) -> Result<Option<Self::Identity>, StoreError>;

    /// Persist a salt for an identity unless one is already stored.
    ///
    /// Must be atomic per identity: of two concurrent claims, exactly one
    /// candidate is stored and both callers receive it.
    ///
    /// # Arguments
    /// * `login` - Login of the identity
    /// * `candidate` - Freshly generated salt
    ///
    /// # Returns
    /// The salt persisted for the identity after the call
    ///
    /// # Errors
    /// * `NotFound` - Identity has not been persisted
    /// * `Unavailable` - Storage operation failed
    async fn claim_salt(&self, login: &str, candidate: &str) -> Result<String, StoreError>;

    /// Persist a password hash for an identity.
    ///
    /// # Arguments
    /// * `login` - Login of the identity
    /// * `hash` - PHC hash string
    ///
    /// # Errors
    /// * `NotFound` - Identity has not been persisted
    /// * `Unavailable` - Storage operation failed
    async fn save_hash(&self, login: &str, hash: &str) -> Result<(), StoreError>;
}
