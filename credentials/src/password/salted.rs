use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use crate::errors::PasswordError;

/// Salted password hashing.
///
/// The record salt is appended to the plaintext before it is fed to Argon2id,
/// so a stored hash only verifies against the salt it was created with.
/// Argon2 additionally embeds its own random salt in the PHC string.
pub struct SaltedHasher {
    argon2: Argon2<'static>,
}

impl SaltedHasher {
    /// Create a hasher with the fixed work factor.
    ///
    /// # Returns
    /// SaltedHasher configured with Argon2id v0x13 and the default cost
    /// parameters (19 MiB, 2 passes, 1 lane)
    pub fn new() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::DEFAULT),
        }
    }

    /// Hash a plaintext password mixed with a record salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    /// * `salt` - Record salt
    ///
    /// # Returns
    /// PHC string format hash
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str, salt: &str) -> Result<String, PasswordError> {
        let phc_salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(salted(password, salt).as_bytes(), &phc_salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a plaintext password and record salt against a stored hash.
    ///
    /// Comparison goes through Argon2's verifier, never through byte equality
    /// on the encoded strings.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `salt` - Record salt the hash was created with
    /// * `hash` - Stored hash in PHC string format
    ///
    /// # Returns
    /// True if the password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is not a valid PHC string
    pub fn verify(&self, password: &str, salt: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = parse_hash(hash)?;

        Ok(self
            .argon2
            .verify_password(salted(password, salt).as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl Default for SaltedHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a fresh record salt from the operating system's CSPRNG.
///
/// # Returns
/// Base64 encoded random salt
pub fn generate_salt() -> String {
    SaltString::generate(&mut OsRng).as_str().to_owned()
}

/// Parse a stored PHC string into a comparable hash handle.
///
/// # Errors
/// * `VerificationFailed` - String is not a valid PHC hash
pub fn parse_hash(hash: &str) -> Result<PasswordHash<'_>, PasswordError> {
    PasswordHash::new(hash)
        .map_err(|e| PasswordError::VerificationFailed(format!("Invalid password hash: {}", e)))
}

fn salted(password: &str, salt: &str) -> String {
    format!("{}{}", password, salt)
}
