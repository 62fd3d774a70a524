//! Account linking. Maps a Google identity onto exactly one stored profile.
//!
//! Lookup order: provider id, then email (linking a legacy row), then create.
//! Racing first logins are settled by the store's unique indexes.

use tracing::{info, warn};

use crate::auth::google::{GoogleIdentity, OAuthError};
use crate::errors::AppError;
use crate::models::user::{NewUser, UserRow};
use crate::users::store::UserStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Existing,
    Linked,
    Created,
}

pub async fn resolve_account(
    store: &dyn UserStore,
    identity: &GoogleIdentity,
) -> Result<(UserRow, LinkOutcome), AppError> {
    let email = identity.email()?;

    if let Some(user) = store.find_by_google_id(&identity.subject).await? {
        info!("Existing user found: {}", user.id);
        return Ok((user, LinkOutcome::Existing));
    }

    let attempt = match store.find_by_email(email).await? {
        Some(user) => {
            if user.google_id.is_some() {
                return Err(OAuthError::AccountMismatch(email.to_string()).into());
            }
            store
                .link_google(user.id, &identity.subject, identity.picture.as_deref())
                .await
                .map(|user| (user, LinkOutcome::Linked))
        }
        None => store
            .insert(new_user_from_identity(identity, email))
            .await
            .map(|user| (user, LinkOutcome::Created)),
    };

    match attempt {
        Ok((user, outcome)) => {
            match outcome {
                LinkOutcome::Linked => info!("Linked Google account to existing user {}", user.id),
                _ => info!("New user created: {}", user.id),
            }
            Ok((user, outcome))
        }
        Err(AppError::Conflict(msg)) => {
            warn!("Unique violation during login, re-reading user: {msg}");
            store
                .find_by_google_id_or_email(&identity.subject, email)
                .await?
                .map(|user| (user, LinkOutcome::Existing))
                .ok_or(AppError::Conflict(msg))
        }
        Err(e) => Err(e),
    }
}

fn new_user_from_identity(identity: &GoogleIdentity, email: &str) -> NewUser {
    let first_name = non_empty(identity.given_name.as_deref())
        .or_else(|| non_empty(identity.name.as_deref()))
        .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string());
    let last_name = non_empty(identity.family_name.as_deref()).unwrap_or_default();

    NewUser {
        google_id: identity.subject.clone(),
        first_name,
        last_name,
        email: email.to_string(),
        profile_image: identity.picture.clone(),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
