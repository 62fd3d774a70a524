use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::user::{ProfileUpdate, UserProfile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// GET /user-api/profile
pub async fn handle_get_profile(AuthUser(user): AuthUser) -> Json<ProfileResponse> {
    info!("Fetching user profile for {}", user.id);
    Json(ProfileResponse {
        success: true,
        user: user.into(),
    })
}

/// PUT /user-api/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, AppError> {
    let update = validate_update(update)?;

    let updated = state
        .users
        .update_profile(user.id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    info!("Updated profile for {}", updated.id);
    Ok(Json(ProfileResponse {
        success: true,
        user: updated.into(),
    }))
}

/// DELETE /user-api
pub async fn handle_delete_account(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<DeleteResponse>, AppError> {
    if !state.users.delete(user.id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    info!("Deleted user {}", user.id);
    Ok(Json(DeleteResponse {
        success: true,
        message: "User deleted successfully".to_string(),
    }))
}

/// Trims every present field; names must stay non-empty and email must look like one.
fn validate_update(update: ProfileUpdate) -> Result<ProfileUpdate, AppError> {
    let first_name = update.first_name.map(|s| s.trim().to_string());
    let last_name = update.last_name.map(|s| s.trim().to_string());
    let email = update.email.map(|s| s.trim().to_string());

    if first_name.as_deref() == Some("") {
        return Err(AppError::Validation("firstName cannot be empty".to_string()));
    }
    if last_name.as_deref() == Some("") {
        return Err(AppError::Validation("lastName cannot be empty".to_string()));
    }
    if let Some(email) = &email {
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid {
            return Err(AppError::Validation(format!("'{email}' is not a valid email")));
        }
    }

    Ok(ProfileUpdate {
        first_name,
        last_name,
        email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(first: Option<&str>, last: Option<&str>, email: Option<&str>) -> ProfileUpdate {
        ProfileUpdate {
            first_name: first.map(String::from),
            last_name: last.map(String::from),
            email: email.map(String::from),
        }
    }

    #[test]
    fn test_validate_update_trims_fields() {
        let cleaned = validate_update(update(Some(" Ada "), None, Some(" ada@example.com ")))
            .unwrap();
        assert_eq!(cleaned.first_name.as_deref(), Some("Ada"));
        assert_eq!(cleaned.email.as_deref(), Some("ada@example.com"));
        assert!(cleaned.last_name.is_none());
    }

    #[test]
    fn test_validate_update_rejects_blank_names() {
        assert!(validate_update(update(Some("  "), None, None)).is_err());
        assert!(validate_update(update(None, Some(""), None)).is_err());
    }

    #[test]
    fn test_validate_update_rejects_bad_email() {
        for bad in ["not-an-email", "@example.com", "ada@localhost"] {
            assert!(
                validate_update(update(None, None, Some(bad))).is_err(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_update_allows_empty_body() {
        let cleaned = validate_update(ProfileUpdate::default()).unwrap();
        assert!(cleaned.first_name.is_none());
    }
}
