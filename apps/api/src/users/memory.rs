//! In-memory `UserStore` for tests. Enforces the same uniqueness rules as the
//! database indexes.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{NewUser, ProfileUpdate, UserRole, UserRow, DEFAULT_AUTH_PROVIDER};
use crate::users::store::UserStore;

#[derive(Default)]
pub struct InMemoryUserStore {
    rows: Mutex<Vec<UserRow>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a row directly, bypassing uniqueness checks.
    pub fn seed(&self, row: UserRow) {
        self.rows.lock().unwrap().push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn conflict() -> AppError {
        AppError::Conflict("A user with this Google account or email already exists".to_string())
    }
}

pub fn user_row(google_id: Option<&str>, email: &str) -> UserRow {
    UserRow {
        id: Uuid::new_v4(),
        google_id: google_id.map(String::from),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        profile_image: None,
        role: UserRole::User.as_str().to_string(),
        auth_provider: DEFAULT_AUTH_PROVIDER.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRow>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<UserRow>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|r| r.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.email == email).cloned())
    }

    async fn find_by_google_id_or_email(
        &self,
        google_id: &str,
        email: &str,
    ) -> Result<Option<UserRow>, AppError> {
        if let Some(row) = self.find_by_google_id(google_id).await? {
            return Ok(Some(row));
        }
        self.find_by_email(email).await
    }

    async fn insert(&self, user: NewUser) -> Result<UserRow, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let taken = rows.iter().any(|r| {
            r.email == user.email || r.google_id.as_deref() == Some(user.google_id.as_str())
        });
        if taken {
            return Err(Self::conflict());
        }
        let now = Utc::now();
        let row = UserRow {
            id: Uuid::new_v4(),
            google_id: Some(user.google_id),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            profile_image: user.profile_image,
            role: UserRole::User.as_str().to_string(),
            auth_provider: DEFAULT_AUTH_PROVIDER.to_string(),
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn link_google(
        &self,
        id: Uuid,
        google_id: &str,
        profile_image: Option<&str>,
    ) -> Result<UserRow, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|r| r.id != id && r.google_id.as_deref() == Some(google_id))
        {
            return Err(Self::conflict());
        }
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;
        row.google_id = Some(google_id.to_string());
        row.profile_image = profile_image.map(String::from);
        row.auth_provider = DEFAULT_AUTH_PROVIDER.to_string();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<UserRow>, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(email) = &update.email {
            if rows.iter().any(|r| r.id != id && &r.email == email) {
                return Err(Self::conflict());
            }
        }
        let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(first_name) = &update.first_name {
            row.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            row.last_name = last_name.clone();
        }
        if let Some(email) = &update.email {
            row.email = email.clone();
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(google_id: &str, email: &str) -> NewUser {
        NewUser {
            google_id: google_id.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            profile_image: None,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_email_and_google_id() {
        let store = InMemoryUserStore::new();
        store.insert(new_user("g-1", "a@example.com")).await.unwrap();

        let dup_email = store.insert(new_user("g-2", "a@example.com")).await;
        assert!(matches!(dup_email, Err(AppError::Conflict(_))));

        let dup_google = store.insert(new_user("g-1", "b@example.com")).await;
        assert!(matches!(dup_google, Err(AppError::Conflict(_))));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_update_profile_keeps_absent_fields() {
        let store = InMemoryUserStore::new();
        let user = store.insert(new_user("g-1", "a@example.com")).await.unwrap();

        let update = ProfileUpdate {
            first_name: Some("Grace".to_string()),
            ..Default::default()
        };
        let updated = store.update_profile(user.id, &update).await.unwrap().unwrap();
        assert_eq!(updated.first_name, "Grace");
        assert_eq!(updated.last_name, "Lovelace");
        assert_eq!(updated.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_delete_reports_whether_row_existed() {
        let store = InMemoryUserStore::new();
        let user = store.insert(new_user("g-1", "a@example.com")).await.unwrap();
        assert!(store.delete(user.id).await.unwrap());
        assert!(!store.delete(user.id).await.unwrap());
    }
}
