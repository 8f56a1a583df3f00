use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use sha2::{Digest, Sha512};

use crate::constants::{SESSION_COOKIE, SESSION_MAX_AGE_HOURS};
use crate::error::{AppError, Result};

// =============================================================================
// Password Hashing
// =============================================================================

/// Hash a plain password with argon2id and a random salt
pub fn hash_password(password: &str) -> Result<String> {
    use argon2::Argon2;
    use password_hash::rand_core::OsRng;
    use password_hash::{PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

/// Verify a password against an argon2id hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::Argon2;
    use password_hash::{PasswordHash, PasswordVerifier};

    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// =============================================================================
// Session Cookie
// =============================================================================

/// Derive the cookie encryption key from the configured secret
///
/// `Key` needs 64 bytes of key material, which is exactly one SHA-512 digest.
/// Without a secret a random key is generated and sessions end with the process.
pub fn session_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) if !secret.is_empty() => Key::from(Sha512::digest(secret.as_bytes()).as_slice()),
        _ => {
            tracing::warn!("No server.secret_key configured; sessions will not survive a restart");
            Key::generate()
        }
    }
}

/// Store the user's session token in the encrypted session cookie
pub fn start_session(jar: PrivateCookieJar, token: &str) -> PrivateCookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, token.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::hours(SESSION_MAX_AGE_HOURS))
            .build(),
    )
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/").build())
}

/// Session token carried by a cookie that decrypted and authenticated
pub fn session_token(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("123456").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("123456", &hash));
        assert!(!verify_password("654321", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let first = hash_password("123456").unwrap();
        let second = hash_password("123456").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("123456", &second));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("123456", "123456"));
        assert!(!verify_password("123456", ""));
    }

    #[test]
    fn test_session_key_is_deterministic_for_secret() {
        let a = session_key(Some("shared-secret"));
        let b = session_key(Some("shared-secret"));
        let c = session_key(Some("other-secret"));

        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }

    #[test]
    fn test_session_round_trip() {
        let key = session_key(Some("shared-secret"));
        let jar = start_session(PrivateCookieJar::new(key), "token-42");
        assert_eq!(session_token(&jar).as_deref(), Some("token-42"));

        let jar = end_session(jar);
        assert_eq!(session_token(&jar), None);
    }
}
