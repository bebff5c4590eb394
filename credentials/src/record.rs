use argon2::password_hash::PasswordHash;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::CredentialError;
use crate::errors::PasswordError;
use crate::password::salted::parse_hash;

/// Persisted credential fields embedded in an identity record.
///
/// Both fields are opaque strings. The salt is written once and never
/// replaced for the lifetime of the record, since the stored hash is only
/// valid together with the salt it was computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    hash: Option<String>,
    salt: Option<String>,
}

impl CredentialRecord {
    /// Create an empty record with neither hash nor salt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a record from persisted fields.
    ///
    /// # Arguments
    /// * `hash` - Stored PHC hash, if any
    /// * `salt` - Stored salt, if any
    pub fn from_persisted(hash: Option<String>, salt: Option<String>) -> Self {
        Self { hash, salt }
    }

    /// Wrap the persisted hash into a comparable handle.
    ///
    /// # Returns
    /// Parsed hash, or None if no hash (or a blank one) has been persisted
    ///
    /// # Errors
    /// * `VerificationFailed` - Persisted value is not a valid PHC string
    pub fn hash(&self) -> Result<Option<PasswordHash<'_>>, PasswordError> {
        self.raw_hash().map(parse_hash).transpose()
    }

    /// Persisted hash as stored. A blank value reads as absent.
    pub fn raw_hash(&self) -> Option<&str> {
        self.hash.as_deref().filter(|hash| !hash.is_empty())
    }

    /// Persisted salt, if one has been generated.
    pub fn salt(&self) -> Option<&str> {
        self.salt.as_deref()
    }

    /// True while no password hash has been persisted for this record.
    pub fn has_no_credentials(&self) -> bool {
        self.raw_hash().is_none()
    }

    /// Check that a hash is present before the record is stored.
    ///
    /// # Errors
    /// * `MissingCredentials` - No password has been set
    pub fn ensure_credentials(&self) -> Result<(), CredentialError> {
        if self.has_no_credentials() {
            Err(CredentialError::MissingCredentials)
        } else {
            Ok(())
        }
    }

    pub(crate) fn set_hash(&mut self, hash: String) {
        self.hash = Some(hash);
    }

    /// Adopt a salt unless one is already present.
    ///
    /// # Returns
    /// The salt held by the record afterwards
    pub(crate) fn adopt_salt(&mut self, salt: String) -> &str {
        self.salt.get_or_insert(salt)
    }
}

/// Capability of an identity type that carries a credential record.
pub trait Credentialed {
    /// Login the identity is looked up by.
    fn login(&self) -> &str;

    fn credentials(&self) -> &CredentialRecord;

    fn credentials_mut(&mut self) -> &mut CredentialRecord;
}
