use std::sync::Arc;

use crate::errors::CredentialError;
use crate::errors::StoreError;
use crate::password::generate_salt;
use crate::password::SaltedHasher;
use crate::ports::IdentityStore;
use crate::record::Credentialed;

/// Computes and verifies salted password hashes for identities of a store.
pub struct CredentialHasher<S>
where
    S: IdentityStore,
{
    store: Arc<S>,
    hasher: SaltedHasher,
}

impl<S> CredentialHasher<S>
where
    S: IdentityStore,
{
    /// Create a credential hasher backed by an identity store.
    ///
    /// # Arguments
    /// * `store` - Identity persistence implementation
    ///
    /// # Returns
    /// Configured CredentialHasher instance
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            hasher: SaltedHasher::new(),
        }
    }

    /// Store this hasher verifies against.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Return the identity's salt, generating and persisting one on first access.
    ///
    /// Generation goes through the store's compare-and-set, so concurrent
    /// first accesses for one identity converge on a single salt. An identity
    /// the store does not know yet keeps the generated salt on its record
    /// until it is inserted.
    ///
    /// # Errors
    /// * `Store` - Storage operation failed
    pub async fn salt(&self, identity: &mut S::Identity) -> Result<String, CredentialError> {
        if let Some(salt) = identity.credentials().salt() {
            return Ok(salt.to_owned());
        }

        let candidate = generate_salt();
        let salt = match self.store.claim_salt(identity.login(), &candidate).await {
            Ok(persisted) => persisted,
            Err(StoreError::NotFound(_)) => {
                tracing::debug!(login = identity.login(), "Salt kept on unpersisted identity");
                candidate
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(login = identity.login(), "Salt initialized");
        Ok(identity.credentials_mut().adopt_salt(salt).to_owned())
    }

    /// Hash and persist a new password.
    ///
    /// A blank password is ignored so that an existing hash is never replaced
    /// by the hash of an empty string.
    ///
    /// # Arguments
    /// * `identity` - Identity whose credentials are updated
    /// * `password` - Plaintext password
    ///
    /// # Errors
    /// * `Password` - Hashing failed
    /// * `Store` - Storage operation failed
    pub async fn set_password(
        &self,
        identity: &mut S::Identity,
        password: &str,
    ) -> Result<(), CredentialError> {
        if password.is_empty() {
            return Ok(());
        }

        let salt = self.salt(identity).await?;
        let hash = self.hasher.hash(password, &salt)?;

        match self.store.save_hash(identity.login(), &hash).await {
            Ok(()) | Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(login = identity.login(), "Password hash updated");
        identity.credentials_mut().set_hash(hash);
        Ok(())
    }

    /// Set a password after checking it against its confirmation.
    ///
    /// # Errors
    /// * `ConfirmationMismatch` - Password and confirmation differ
    /// * `Password` - Hashing failed
    /// * `Store` - Storage operation failed
    pub async fn change_password(
        &self,
        identity: &mut S::Identity,
        password: &str,
        confirmation: &str,
    ) -> Result<(), CredentialError> {
        if password != confirmation {
            return Err(CredentialError::ConfirmationMismatch);
        }

        self.set_password(identity, password).await
    }

    /// Check a login and plaintext password against the stored hash.
    ///
    /// # Returns
    /// True if the identity exists and the password matches
    ///
    /// # Errors
    /// * `Password` - Stored hash is malformed
    /// * `Store` - Storage operation failed
    pub async fn verify(&self, login: &str, password: &str) -> Result<bool, CredentialError> {
        Ok(self.authenticate(login, password).await?.is_some())
    }

    /// Look up an identity and return it only if the password matches.
    ///
    /// # Returns
    /// The authenticated identity, or None on unknown login or wrong password
    ///
    /// # Errors
    /// * `Password` - Stored hash is malformed
    /// * `Store` - Storage operation failed
    pub async fn authenticate(
        &self,
        login: &str,
        password: &str,
    ) -> Result<Option<S::Identity>, CredentialError> {
        let Some(identity) = self.store.find_by_login(login).await? else {
            return Ok(None);
        };

        let credentials = identity.credentials();
        let (Some(hash), Some(salt)) = (credentials.raw_hash(), credentials.salt()) else {
            return Ok(None);
        };

        if self.hasher.verify(password, salt, hash)? {
            Ok(Some(identity))
        } else {
            Ok(None)
        }
    }
}
