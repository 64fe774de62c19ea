use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, EnumString};

use crate::errors::StoreError;
use crate::models::UserRecord;

/// How a store should treat a write whose key is already present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WriteMode {
    /// Plain put; a concurrent duplicate silently replaces the earlier record.
    #[default]
    Overwrite,
    /// Conditional put; fails with [`StoreError::AlreadyExists`] if the key exists.
    IfAbsent,
}

/// Point read/write access to persisted users, keyed by `user_id`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn put_user(&self, user: &UserRecord, mode: WriteMode) -> Result<(), StoreError>;
}

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<DashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.get(user_id).map(|entry| entry.value().clone()))
    }

    async fn put_user(&self, user: &UserRecord, mode: WriteMode) -> Result<(), StoreError> {
        match mode {
            WriteMode::Overwrite => {
                self.users.insert(user.user_id.clone(), user.clone());
            }
            WriteMode::IfAbsent => match self.users.entry(user.user_id.clone()) {
                Entry::Occupied(_) => return Err(StoreError::AlreadyExists(user.user_id.clone())),
                Entry::Vacant(slot) => {
                    slot.insert(user.clone());
                }
            },
        }
        Ok(())
    }
}
