use chrono::{SubsecRound, Utc};
use std::sync::Arc;

use crate::errors::{RegistrationError, RegistrationResult, StoreError};
use crate::models::{NewUser, UserRecord};
use crate::store::{UserStore, WriteMode};

/// Creates users that do not exist yet.
///
/// Each call performs one point lookup and, when the user is new, one point
/// write. In [`WriteMode::Overwrite`] the lookup and the write are not
/// atomic: two concurrent registrations of the same id can both succeed and
/// the later write wins. [`WriteMode::IfAbsent`] closes that gap for stores
/// that support conditional writes.
#[derive(Clone)]
pub struct UserRegistrar {
    store: Arc<dyn UserStore>,
    write_mode: WriteMode,
}

impl UserRegistrar {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            write_mode: WriteMode::default(),
        }
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    pub async fn register_user(&self, candidate: NewUser) -> RegistrationResult<UserRecord> {
        candidate.validate()?;

        // Any item under the key counts as taken, even one that fails to decode.
        let exists = match self.store.get_user(&candidate.user_id).await {
            Ok(existing) => existing.is_some(),
            Err(StoreError::Malformed(detail)) => {
                tracing::warn!(user_id = %candidate.user_id, %detail, "Existing item is malformed");
                true
            }
            Err(e) => return Err(RegistrationError::LookupFailed(e)),
        };
        if exists {
            tracing::debug!(user_id = %candidate.user_id, "User already registered");
            return Err(RegistrationError::Conflict(candidate.user_id));
        }

        let record = candidate.into_record(Utc::now().trunc_subsecs(0));
        match self.store.put_user(&record, self.write_mode).await {
            Ok(()) => {}
            Err(StoreError::AlreadyExists(user_id)) => {
                tracing::warn!(%user_id, "Conditional write lost a registration race");
                return Err(RegistrationError::Conflict(user_id));
            }
            Err(e) => return Err(RegistrationError::SaveFailed(e)),
        }

        tracing::info!(
            user_id = %record.user_id,
            created_at = %record.created_at_rfc3339(),
            "User created"
        );
        Ok(record)
    }
}
