//! CSRF protection for the OAuth redirect flow.
//!
//! A random nonce goes to Google as `state` and, HMAC-signed with the session
//! secret, into a short-lived cookie. The callback only proceeds when the
//! cookie verifies and carries the same nonce Google echoed back.

use axum::http::{header::SET_COOKIE, HeaderMap, HeaderValue};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::auth::google::OAuthError;

type HmacSha256 = Hmac<Sha256>;

pub const STATE_COOKIE_NAME: &str = "oauth_state";
const STATE_COOKIE_MAX_AGE: i64 = 600; // 10 minutes
const STATE_COOKIE_PATH: &str = "/api/auth";

#[derive(Clone)]
pub struct StateSigner {
    secret: Vec<u8>,
    secure: bool,
}

impl StateSigner {
    /// `secure` adds the `Secure` attribute; production serves over HTTPS.
    pub fn new(secret: &str, secure: bool) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            secure,
        }
    }

    fn mac(&self) -> Result<HmacSha256, OAuthError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|_| OAuthError::StateMismatch)
    }

    /// Returns `(nonce, cookie_value)`.
    pub fn issue(&self) -> Result<(String, String), OAuthError> {
        let nonce = Uuid::new_v4().simple().to_string();
        let mut mac = self.mac()?;
        mac.update(nonce.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        let cookie_value = format!("{nonce}.{signature}");
        Ok((nonce, cookie_value))
    }

    /// Checks the cookie signature and that it carries `state`.
    pub fn verify(&self, cookie_value: &str, state: &str) -> Result<(), OAuthError> {
        let (nonce, signature) = cookie_value
            .split_once('.')
            .ok_or(OAuthError::StateMismatch)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| OAuthError::StateMismatch)?;

        let mut mac = self.mac()?;
        mac.update(nonce.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| OAuthError::StateMismatch)?;

        if nonce != state {
            return Err(OAuthError::StateMismatch);
        }
        Ok(())
    }

    pub fn set_cookie(&self, headers: &mut HeaderMap, cookie_value: &str) {
        self.append(headers, cookie_value, STATE_COOKIE_MAX_AGE);
    }

    pub fn clear_cookie(&self, headers: &mut HeaderMap) {
        self.append(headers, "", 0);
    }

    fn append(&self, headers: &mut HeaderMap, value: &str, max_age: i64) {
        let mut cookie = format!(
            "{STATE_COOKIE_NAME}={value}; Path={STATE_COOKIE_PATH}; HttpOnly; SameSite=Lax; Max-Age={max_age}"
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        // Cookie values are base64url/hex, always valid header bytes.
        if let Ok(header) = HeaderValue::from_str(&cookie) {
            headers.append(SET_COOKIE, header);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_session_secret_that_is_long_enough";

    #[test]
    fn test_issue_then_verify() {
        let signer = StateSigner::new(SECRET, false);
        let (nonce, cookie) = signer.issue().unwrap();
        assert!(cookie.starts_with(&nonce));
        assert!(signer.verify(&cookie, &nonce).is_ok());
    }

    #[test]
    fn test_verify_rejects_different_state() {
        let signer = StateSigner::new(SECRET, false);
        let (_, cookie) = signer.issue().unwrap();
        assert!(matches!(
            signer.verify(&cookie, "attacker-state"),
            Err(OAuthError::StateMismatch)
        ));
    }

    #[test]
    fn test_verify_rejects_tampered_nonce() {
        let signer = StateSigner::new(SECRET, false);
        let (_, cookie) = signer.issue().unwrap();
        let (_, sig) = cookie.split_once('.').unwrap();
        let forged = format!("forged.{sig}");
        assert!(signer.verify(&forged, "forged").is_err());
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let (nonce, cookie) = StateSigner::new(SECRET, false).issue().unwrap();
        let other = StateSigner::new("a_completely_different_secret_value!!", false);
        assert!(other.verify(&cookie, &nonce).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let signer = StateSigner::new(SECRET, false);
        assert!(signer.verify("no-dot-here", "no-dot-here").is_err());
        assert!(signer.verify("abc.!!!", "abc").is_err());
    }

    #[test]
    fn test_cookie_attributes() {
        let mut headers = HeaderMap::new();
        StateSigner::new(SECRET, true).set_cookie(&mut headers, "v");
        let cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("oauth_state=v;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=600"));
        assert!(cookie.ends_with("; Secure"));

        let mut headers = HeaderMap::new();
        StateSigner::new(SECRET, false).clear_cookie(&mut headers);
        let cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));
        assert!(!cookie.contains("Secure"));
    }
}
