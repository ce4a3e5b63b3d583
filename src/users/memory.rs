use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{StoreError, User, UserStore};

/// In-process store for handler tests. Counts every lookup it serves.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
    lookups: AtomicUsize,
}

impl MemoryUserStore {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn get_by_email(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.get_by_email(email))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let found = self.users.lock().unwrap().iter().find(|u| u.id == id).cloned();
        Ok(found)
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::Duplicate);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let store = MemoryUserStore::default();
        store.create("a@b.io", "h1").await.expect("first insert");
        let err = store.create("a@b.io", "h2").await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn find_by_id_returns_created_user() {
        let store = MemoryUserStore::default();
        let created = store.create("x@y.io", "hash").await.unwrap();
        let found = store.find_by_id(created.id).await.unwrap().expect("user");
        assert_eq!(found.email, "x@y.io");
        assert_eq!(store.lookups(), 1);
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }
}
