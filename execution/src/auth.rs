//! Session authority: credential verification and token issuance.
//!
//! Session tokens are stateless. A token is `v1.<user id>.<expiry>.<tag>`
//! where the tag is an HMAC-SHA256 over the id and expiry keyed by the
//! process session secret; validation recomputes the tag and checks the
//! expiry, so issuing and revoking touch no storage. Admin access is a
//! single shared secret compared in constant time.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use snackquest_types::{EngineError, User, SESSION_TTL_SECS};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::store::Store;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_VERSION: &str = "v1";
const ADMIN_TOKEN_CONTEXT: &str = "admin-access";

/// Issues and validates the portal's session and admin tokens.
///
/// Both secrets are process-wide read-only configuration injected at
/// startup; nothing here is mutated after construction.
#[derive(Clone)]
pub struct SessionAuthority {
    secret: Vec<u8>,
    admin_password: String,
    admin_token: String,
}

impl SessionAuthority {
    pub fn new(session_secret: &str, admin_password: &str) -> Self {
        let secret = session_secret.as_bytes().to_vec();
        let admin_token = sign(&secret, ADMIN_TOKEN_CONTEXT);
        Self {
            secret,
            admin_password: admin_password.to_string(),
            admin_token,
        }
    }

    /// Verify `identifier`/`password` against the credential store.
    ///
    /// Unknown identifier and wrong password both resolve to
    /// `InvalidCredentials`; a dummy verification runs on the missing-user
    /// path so the two failures are not distinguishable by timing.
    pub async fn authenticate(
        &self,
        store: &Store,
        identifier: &str,
        password: &str,
    ) -> Result<User, EngineError> {
        let user = store.user_by_identifier(identifier).await?;
        match user {
            Some(user) if verify_password(&user.password_hash, password) => Ok(user),
            Some(_) => Err(EngineError::InvalidCredentials),
            None => {
                verify_password(dummy_hash(), password);
                Err(EngineError::InvalidCredentials)
            }
        }
    }

    /// Mint a session token for `user_id`, valid for 7 days.
    pub fn issue_session(&self, user_id: i64) -> String {
        self.issue_session_at(user_id, Utc::now().timestamp())
    }

    pub fn issue_session_at(&self, user_id: i64, now: i64) -> String {
        let expires = now + SESSION_TTL_SECS;
        let message = format!("{user_id}.{expires}");
        let tag = sign(&self.secret, &message);
        format!("{TOKEN_VERSION}.{message}.{tag}")
    }

    /// Resolve a presented token to a user id. Absent, expired, malformed,
    /// and forged tokens all resolve to `None`.
    pub fn validate_session(&self, token: &str) -> Option<i64> {
        self.validate_session_at(token, Utc::now().timestamp())
    }

    pub fn validate_session_at(&self, token: &str, now: i64) -> Option<i64> {
        let mut parts = token.split('.');
        let (version, id, expires, tag) =
            (parts.next()?, parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() || version != TOKEN_VERSION {
            return None;
        }

        let user_id: i64 = id.parse().ok()?;
        let expires_at: i64 = expires.parse().ok()?;
        if user_id <= 0 {
            return None;
        }

        let mut mac = mac(&self.secret);
        mac.update(format!("{user_id}.{expires_at}").as_bytes());
        let tag = hex::decode(tag).ok()?;
        if mac.verify_slice(&tag).is_err() {
            debug!(user_id, "session token failed verification");
            return None;
        }
        if expires_at <= now {
            return None;
        }
        Some(user_id)
    }

    /// Exchange the shared admin password for the elevated-access token.
    /// The token carries no user identity.
    pub fn issue_admin_access(&self, supplied: &str) -> Result<String, EngineError> {
        let matches: bool = supplied
            .as_bytes()
            .ct_eq(self.admin_password.as_bytes())
            .into();
        if !matches {
            return Err(EngineError::InvalidAdminPassword);
        }
        Ok(self.admin_token.clone())
    }

    /// Exact-match check of a presented admin token, in constant time.
    pub fn validate_admin_access(&self, token: &str) -> bool {
        token.as_bytes().ct_eq(self.admin_token.as_bytes()).into()
    }
}

fn mac(secret: &[u8]) -> HmacSha256 {
    // HMAC accepts keys of any length, so this cannot fail.
    HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length")
}

fn sign(secret: &[u8], message: &str) -> String {
    let mut mac = mac(secret);
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Hash a plaintext password into a PHC string for storage.
pub fn hash_password(password: &str) -> Result<String, EngineError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| EngineError::Internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Constant-time verification of `password` against a stored PHC string.
/// An unparseable stored hash verifies as false rather than erroring.
pub fn verify_password(stored: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Valid PHC string that matches no real password, used to equalize the
/// unknown-identifier path with a real verification.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(b"snackquest-dummy", &salt)
            .map(|hash| hash.to_string())
            // Fallback only reachable if argon2 itself is broken; an
            // unparseable string still verifies as false.
            .unwrap_or_else(|_| String::from("!"))
    })
}
