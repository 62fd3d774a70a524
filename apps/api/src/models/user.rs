use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Two-valued role carried on every profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    /// Unknown values degrade to the least-privileged role.
    pub fn from_db(raw: &str) -> Self {
        match raw {
            "admin" => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

pub const DEFAULT_AUTH_PROVIDER: &str = "google";

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub google_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub role: String,
    pub auth_provider: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn role(&self) -> UserRole {
        UserRole::from_db(&self.role)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Fields required to create a profile on first login.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub google_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_image: Option<String>,
}

/// Partial profile update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Profile as returned to the SPA.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub google_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub role: UserRole,
    pub auth_provider: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        let role = row.role();
        UserProfile {
            id: row.id,
            google_id: row.google_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            profile_image: row.profile_image,
            role,
            auth_provider: row.auth_provider,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            google_id: Some("g-1".to_string()),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            profile_image: None,
            role: "admin".to_string(),
            auth_provider: DEFAULT_AUTH_PROVIDER.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_from_db() {
        assert_eq!(UserRole::from_db("admin"), UserRole::Admin);
        assert_eq!(UserRole::from_db("user"), UserRole::User);
        assert_eq!(UserRole::from_db("root"), UserRole::User);
        assert_eq!(UserRole::default().as_str(), "user");
    }

    #[test]
    fn test_profile_serializes_camel_case() {
        let profile = UserProfile::from(row());
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["firstName"], "Ada");
        assert_eq!(value["lastName"], "Lovelace");
        assert_eq!(value["googleId"], "g-1");
        assert_eq!(value["role"], "admin");
        assert_eq!(value["authProvider"], "google");
        assert!(value.get("profileImage").is_some());
        assert!(value.get("first_name").is_none());
    }

    #[test]
    fn test_full_name_trims_missing_last_name() {
        let mut user = row();
        user.last_name = String::new();
        assert_eq!(user.full_name(), "Ada");
    }

    #[test]
    fn test_profile_update_accepts_partial_camel_case() {
        let update: ProfileUpdate = serde_json::from_str(r#"{"firstName": "Grace"}"#).unwrap();
        assert_eq!(update.first_name.as_deref(), Some("Grace"));
        assert!(update.last_name.is_none());
        assert!(update.email.is_none());
    }
}
