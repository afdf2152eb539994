use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::OnceLock;

/// Hashing failed inside argon2 (entropy or parameter trouble). Fatal to the
/// request that triggered it.
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(String);

/// Hashes a plaintext password into a PHC string.
///
/// A fresh random salt is generated on every call, so hashing the same
/// password twice gives two different strings that both verify.
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError(e.to_string()))
}

/// Checks a plaintext password against a stored PHC string.
///
/// A mismatch is `false`, never an error. argon2 compares the derived output
/// in constant time. A stored hash we can't even parse also counts as a
/// mismatch, since there is nothing the caller could do differently.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Stored password hash is not a valid PHC string: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

const DUMMY_PASSWORD: &str = "codefolio-no-such-user";

/// Hash of a password no account has, built once on first use.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    DUMMY_HASH
        .get_or_init(|| hash_password(DUMMY_PASSWORD).ok())
        .as_deref()
}

/// Runs a full argon2 verify against a throwaway hash and always fails.
///
/// Login calls this for unknown usernames so they cost the same as a wrong
/// password for a real account.
pub fn verify_dummy(password: &str) -> bool {
    if let Some(hash) = dummy_hash() {
        let _ = verify_password(password, hash);
    }
    false
}
