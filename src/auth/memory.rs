use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::{
    repo::{CredentialStore, StoreError},
    repo_types::{User, UserRecord},
};

/// Vec-backed store for tests. Uniqueness is checked under the lock, same as a DB constraint.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    rows: Mutex<Vec<UserRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    fn with_rows<T>(&self, f: impl FnOnce(&mut Vec<UserRecord>) -> T) -> T {
        // A poisoned lock only means another test thread panicked mid-write.
        let mut rows = match self.rows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut rows)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn exists(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.with_rows(|rows| rows.iter().any(|r| r.email == email)))
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        self.with_rows(|rows| {
            if rows.iter().any(|r| r.email == email) {
                return Err(StoreError::DuplicateEmail);
            }
            let now = OffsetDateTime::now_utc();
            let record = UserRecord {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                created_at: now,
                updated_at: now,
            };
            rows.push(record.clone());
            Ok(User::from(record))
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.with_rows(|rows| rows.iter().find(|r| r.email == email).cloned()))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.with_rows(|rows| {
            rows.iter()
                .find(|r| r.id == id)
                .cloned()
                .map(User::from)
        }))
    }

    async fn touch_login(&self, id: Uuid) -> Result<(), StoreError> {
        self.with_rows(|rows| {
            let row = rows
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or(StoreError::NotFound)?;
            row.updated_at = row.updated_at.max(OffsetDateTime::now_utc());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_lookup() {
        let store = InMemoryCredentialStore::new();
        let user = store
            .create("Ann", "ann@x.com", "hash")
            .await
            .expect("create");

        assert!(store.exists("ann@x.com").await.unwrap());
        assert!(!store.exists("ANN@x.com").await.unwrap());

        let record = store.find_by_email("ann@x.com").await.unwrap().unwrap();
        assert_eq!(record.id, user.id);
        assert_eq!(record.password_hash, "hash");

        let by_id = store.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id, user);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryCredentialStore::new();
        store.create("Ann", "ann@x.com", "h1").await.unwrap();
        let err = store.create("Bob", "ann@x.com", "h2").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn touch_login_bumps_updated_at_only() {
        let store = InMemoryCredentialStore::new();
        let user = store.create("Ann", "ann@x.com", "hash").await.unwrap();

        store.touch_login(user.id).await.unwrap();

        let after = store.get_by_id(user.id).await.unwrap().unwrap();
        assert!(after.updated_at >= user.updated_at);
        assert_eq!(after.created_at, user.created_at);
        assert_eq!(after.name, user.name);
        assert_eq!(after.email, user.email);
    }

    #[tokio::test]
    async fn touch_login_on_unknown_id_is_not_found() {
        let store = InMemoryCredentialStore::new();
        let err = store.touch_login(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }
}
