use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::StoreError;
use crate::ports::IdentityStore;
use crate::record::Credentialed;

/// In-memory identity store keyed by login.
///
/// Salt claims run under the write guard, which makes them atomic per
/// identity.
pub struct InMemoryIdentityStore<I> {
    identities: RwLock<HashMap<String, I>>,
}

impl<I> InMemoryIdentityStore<I>
where
    I: Credentialed + Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            identities: RwLock::new(HashMap::new()),
        }
    }

    /// Persist a new identity.
    ///
    /// # Errors
    /// * `Unavailable` - An identity with the same login already exists
    pub fn insert(&self, identity: I) -> Result<(), StoreError> {
        let mut identities = self.identities.write();
        let login = identity.login().to_owned();

        if identities.contains_key(&login) {
            return Err(StoreError::Unavailable(format!(
                "login already taken: {}",
                login
            )));
        }

        identities.insert(login, identity);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.identities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.read().is_empty()
    }
}

impl<I> Default for InMemoryIdentityStore<I>
where
    I: Credentialed + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<I> IdentityStore for InMemoryIdentityStore<I>
where
    I: Credentialed + Clone + Send + Sync + 'static,
{
    type Identity = I;

    async fn find_by_login(&self, login: &str) -> Result<Option<I>, StoreError> {
        Ok(self.identities.read().get(login).cloned())
    }

    async fn claim_salt(&self, login: &str, candidate: &str) -> Result<String, StoreError> {
        let mut identities = self.identities.write();
        let identity = identities
            .get_mut(login)
            .ok_or_else(|| StoreError::NotFound(login.to_owned()))?;

        Ok(identity
            .credentials_mut()
            .adopt_salt(candidate.to_owned())
            .to_owned())
    }

    async fn save_hash(&self, login: &str, hash: &str) -> Result<(), StoreError> {
        let mut identities = self.identities.write();
        let identity = identities
            .get_mut(login)
            .ok_or_else(|| StoreError::NotFound(login.to_owned()))?;

        identity.credentials_mut().set_hash(hash.to_owned());
        Ok(())
    }
}
