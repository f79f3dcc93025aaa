use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

/// The argon2 primitive itself failed (bad parameters, unparsable stored hash).
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct HashingError(String);

lazy_static! {
    /// Verified against when the email is unknown, so a miss costs as much as a hit.
    static ref DUMMY_HASH: Option<String> = hash_password("mealplanner-dummy-password").ok();
}

pub fn hash_password(plain: &str) -> Result<String, HashingError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            HashingError(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash cannot be parsed.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, HashingError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        HashingError(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Computes the dummy hash now so the first unknown-email login costs the
/// same as every later one. Returns whether it is available.
pub fn prime_dummy_hash() -> bool {
    DUMMY_HASH.is_some()
}

/// Burns one verification for a login against an unknown email.
pub fn verify_dummy(plain: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(plain, hash);
    }
}

pub async fn hash_password_blocking(plain: String) -> Result<String, HashingError> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| HashingError(e.to_string()))?
}

pub async fn verify_password_blocking(plain: String, hash: String) -> Result<bool, HashingError> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .map_err(|e| HashingError(e.to_string()))?
}

pub async fn verify_dummy_blocking(plain: String) {
    let _ = tokio::task::spawn_blocking(move || verify_dummy(&plain)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_hash_primes_and_rejects_other_passwords() {
        assert!(prime_dummy_hash());
        let hash = DUMMY_HASH.as_deref().unwrap();
        assert!(!verify_password("secret1", hash).unwrap());
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("secret1", &a).unwrap());
        assert!(verify_password("secret1", &b).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn blocking_wrappers_agree_with_sync_versions() {
        let hash = hash_password_blocking("secret1".into()).await.unwrap();
        assert!(verify_password_blocking("secret1".into(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password_blocking("secret2".into(), hash).await.unwrap());
    }
}
