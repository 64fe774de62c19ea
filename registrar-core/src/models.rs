use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{RegistrationError, RegistrationResult};

/// A user as submitted by a caller, before it has been stamped and stored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    // Missing ids decode as empty so they fail validation, not decoding.
    #[serde(default)]
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl NewUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Decode a candidate from a raw JSON request body.
    pub fn from_json(body: &[u8]) -> RegistrationResult<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    pub fn validate(&self) -> RegistrationResult<()> {
        if self.user_id.is_empty() {
            return Err(RegistrationError::MissingUserId);
        }
        Ok(())
    }

    pub fn into_record(self, created_at: DateTime<Utc>) -> UserRecord {
        UserRecord {
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Creation time in RFC3339 with second precision, e.g. `2024-05-01T12:00:00Z`.
    pub fn created_at_rfc3339(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
