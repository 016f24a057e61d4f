// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$...`) carrying their own
//! random salt and parameters.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

const SALT_LEN: usize = 16;

/// Hash that matches no password, with the same parameters as
/// `Argon2::default()`. Verifying against it costs as much as a real check.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$cEuwCcKdypG2IeSnp1C64w$Cs1SYkfTeav4YWkLOKfzWlgjg/BwAjNTQPdYR4abNrg";

/// Errors from hashing a new password.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to gather salt entropy: {0}")]
    Entropy(String),

    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Password worker failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt_bytes = [0u8; SALT_LEN];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| PasswordError::Entropy(e.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Hash(e.to_string()))?;

    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Check a password against a stored PHC hash.
///
/// Malformed hashes never match.
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Run a verification that always fails but costs the same as a real one.
///
/// Used when the login identifier is unknown, so response time does not
/// reveal whether an account exists.
pub fn verify_against_dummy(password: &str) {
    let _ = verify_password(DUMMY_HASH, password);
}

// ─── Off the async workers ───────────────────────────────────

/// [`hash_password`] on the blocking thread pool.
pub async fn hash(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

/// [`verify_password`] on the blocking thread pool.
pub async fn verify(stored_hash: String, password: String) -> Result<bool, PasswordError> {
    Ok(tokio::task::spawn_blocking(move || verify_password(&stored_hash, &password)).await?)
}

/// [`verify_against_dummy`] on the blocking thread pool.
pub async fn verify_dummy(password: String) -> Result<(), PasswordError> {
    Ok(tokio::task::spawn_blocking(move || verify_against_dummy(&password)).await?)
}
