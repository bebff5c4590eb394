use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::record::CredentialRecord;
use crate::record::Credentialed;

/// Minimal identity record composed with a credential record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub login: String,
    pub credentials: CredentialRecord,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account without credentials.
    ///
    /// # Arguments
    /// * `login` - Unique login
    ///
    /// # Returns
    /// Account with a random v4 id and an empty credential record
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            login: login.into(),
            credentials: CredentialRecord::new(),
            created_at: Utc::now(),
        }
    }
}

impl Credentialed for Account {
    fn login(&self) -> &str {
        &self.login
    }

    fn credentials(&self) -> &CredentialRecord {
        &self.credentials
    }

    fn credentials_mut(&mut self) -> &mut CredentialRecord {
        &mut self.credentials
    }
}
