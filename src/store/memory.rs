use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use super::{CredentialStore, StoreError};
use crate::auth::repo_types::User;
use crate::preferences::dto::Preferences;
use crate::usage::repo_types::UsageRecord;

/// In-process store for tests. Each operation holds one lock for its whole
/// read-modify-write, matching the atomicity of the SQL statements.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_increments: AtomicBool,
    offline: AtomicBool,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: Vec<User>,
    usage: HashMap<i64, UsageRecord>,
    preferences: HashMap<i64, Preferences>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `increment_usage` fail from now on.
    pub fn fail_increments(&self) {
        self.fail_increments.store(true, Ordering::SeqCst);
    }

    /// Make every call fail as if the database were unreachable.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn usage_of(&self, user_id: i64) -> Option<UsageRecord> {
        self.inner.lock().unwrap().usage.get(&user_id).copied()
    }

    pub fn set_usage(&self, user_id: i64, meal_count: i32, max_meals: i32) {
        self.inner.lock().unwrap().usage.insert(
            user_id,
            UsageRecord {
                user_id,
                meal_count,
                max_meals,
            },
        );
    }

    fn check_online(&self, op: &'static str) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Timeout(op));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.check_online("find_user_by_email")?;
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        self.check_online("exists_by_email")?;
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().any(|u| u.email == email))
    }

    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        self.check_online("insert_user")?;
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }
        inner.next_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: inner.next_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn get_usage(&self, user_id: i64) -> Result<Option<UsageRecord>, StoreError> {
        self.check_online("get_usage")?;
        Ok(self.usage_of(user_id))
    }

    async fn create_usage(&self, user_id: i64, max_meals: i32) -> Result<(), StoreError> {
        self.check_online("create_usage")?;
        let mut inner = self.inner.lock().unwrap();
        inner.usage.entry(user_id).or_insert(UsageRecord {
            user_id,
            meal_count: 0,
            max_meals,
        });
        Ok(())
    }

    async fn increment_usage(&self, user_id: i64) -> Result<i32, StoreError> {
        self.check_online("increment_usage")?;
        if self.fail_increments.load(Ordering::SeqCst) {
            return Err(StoreError::Timeout("increment_usage"));
        }
        let mut inner = self.inner.lock().unwrap();
        let record = inner
            .usage
            .get_mut(&user_id)
            .ok_or(StoreError::MissingUsage(user_id))?;
        record.meal_count += 1;
        Ok(record.meal_count)
    }

    async fn get_preferences(&self, user_id: i64) -> Result<Option<Preferences>, StoreError> {
        self.check_online("get_preferences")?;
        Ok(self.inner.lock().unwrap().preferences.get(&user_id).cloned())
    }

    async fn upsert_preferences(&self, user_id: i64, prefs: &Preferences) -> Result<(), StoreError> {
        self.check_online("upsert_preferences")?;
        self.inner
            .lock()
            .unwrap()
            .preferences
            .insert(user_id, prefs.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_online("ping")
    }
}
