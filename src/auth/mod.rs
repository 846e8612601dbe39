//! Identity and credentials: password hashing, session tokens, and salted
//! one-time tokens for email confirmation and password reset.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::entities::brother;
use crate::errors::ServiceError;
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub email: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// What a one-time token authorizes. Bound into the MAC so a confirmation
/// token cannot be replayed as a reset token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    ConfirmEmail,
    PasswordReset,
}

impl TokenPurpose {
    fn as_str(self) -> &'static str {
        match self {
            TokenPurpose::ConfirmEmail => "confirm-email",
            TokenPurpose::PasswordReset => "password-reset",
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
    token_salt: String,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        jwt_secret: impl Into<String>,
        token_salt: impl Into<String>,
        session_ttl_secs: u64,
    ) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_salt: token_salt.into(),
            session_ttl: Duration::seconds(session_ttl_secs as i64),
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, ServiceError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| ServiceError::Internal(format!("stored password hash is malformed: {e}")))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    pub fn issue_session(&self, brother: &brother::Model) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = Claims {
            sub: brother.id,
            email: brother.email.clone(),
            is_admin: brother.is_admin,
            iat: now.timestamp(),
            exp: (now + self.session_ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::Internal(format!("failed to sign session token: {e}")))
    }

    pub fn verify_session(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| ServiceError::Auth("invalid or expired session token".to_string()))
    }

    /// Issues a salted one-time token binding `purpose` to `email` until an
    /// expiry instant. Wire format: `{expiry}.{mac}.{email}` — the email sits
    /// last so its own dots survive the split.
    pub fn issue_signed_token(&self, purpose: TokenPurpose, email: &str, ttl: Duration) -> String {
        let expiry = (Utc::now() + ttl).timestamp();
        let mac = self.token_mac(purpose, email, expiry);
        format!("{expiry}.{mac}.{email}")
    }

    /// Verifies a one-time token and returns the email it was issued for.
    pub fn verify_signed_token(
        &self,
        purpose: TokenPurpose,
        token: &str,
    ) -> Result<String, ServiceError> {
        let mut parts = token.splitn(3, '.');
        let (expiry, mac, email) = match (parts.next(), parts.next(), parts.next()) {
            (Some(expiry), Some(mac), Some(email)) => (expiry, mac, email),
            _ => return Err(Self::bad_link()),
        };
        let expiry: i64 = expiry.parse().map_err(|_| Self::bad_link())?;
        if self.token_mac(purpose, email, expiry) != mac {
            return Err(Self::bad_link());
        }
        if Utc::now().timestamp() > expiry {
            return Err(ServiceError::Auth("the link has expired".to_string()));
        }
        Ok(email.to_string())
    }

    fn token_mac(&self, purpose: TokenPurpose, email: &str, expiry: i64) -> String {
        // HMAC accepts keys of any length, so this cannot fail.
        let mut mac = HmacSha256::new_from_slice(self.token_salt.as_bytes())
            .expect("hmac accepts any key length");
        mac.update(purpose.as_str().as_bytes());
        mac.update(b"|");
        mac.update(email.as_bytes());
        mac.update(b"|");
        mac.update(&expiry.to_be_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn bad_link() -> ServiceError {
        ServiceError::Auth("the confirmation link is invalid or has expired".to_string())
    }
}

/// The authenticated caller. Loaded fresh from the store on every request so
/// admin grants and revocations take effect immediately.
pub struct CurrentUser(pub brother::Model);

impl CurrentUser {
    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.0.is_admin {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(
                "administrator capability required".to_string(),
            ))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ServiceError::Auth("missing bearer token".to_string()))?;

        let claims = state.auth.verify_session(bearer)?;
        let brother = brother::Entity::find_by_id(claims.sub)
            .one(state.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::Auth("session subject no longer exists".to_string()))?;
        Ok(CurrentUser(brother))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(
            "test_secret_key_that_is_long_enough_for_hs256",
            "test_token_salt_value",
            3600,
        )
    }

    #[test]
    fn signed_token_round_trips() {
        let auth = service();
        let token =
            auth.issue_signed_token(TokenPurpose::ConfirmEmail, "pledge@example.com", Duration::hours(1));
        let email = auth
            .verify_signed_token(TokenPurpose::ConfirmEmail, &token)
            .expect("token verifies");
        assert_eq!(email, "pledge@example.com");
    }

    #[test]
    fn signed_token_rejects_wrong_purpose() {
        let auth = service();
        let token =
            auth.issue_signed_token(TokenPurpose::ConfirmEmail, "pledge@example.com", Duration::hours(1));
        assert!(auth
            .verify_signed_token(TokenPurpose::PasswordReset, &token)
            .is_err());
    }

    #[test]
    fn signed_token_rejects_tampering_and_expiry() {
        let auth = service();
        let token =
            auth.issue_signed_token(TokenPurpose::PasswordReset, "pledge@example.com", Duration::hours(1));
        let tampered = token.replacen("pledge", "rival", 1);
        assert!(auth
            .verify_signed_token(TokenPurpose::PasswordReset, &tampered)
            .is_err());

        let expired = auth.issue_signed_token(
            TokenPurpose::PasswordReset,
            "pledge@example.com",
            Duration::seconds(-1),
        );
        assert!(auth
            .verify_signed_token(TokenPurpose::PasswordReset, &expired)
            .is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let auth = service();
        let hash = auth.hash_password("Abc123$x").expect("hashes");
        assert!(auth.verify_password("Abc123$x", &hash).expect("verifies"));
        assert!(!auth.verify_password("wrong", &hash).expect("verifies"));
    }
}
