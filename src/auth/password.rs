//! bcrypt password hashing.

use crate::error::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a plaintext password with the given bcrypt work factor.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plaintext, cost)
}

/// Check a plaintext password against a stored hash. A malformed hash
/// counts as a mismatch.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    bcrypt::verify(plaintext, hash).unwrap_or(false)
}

/// [`hash_password`] on the blocking pool, off the async workers.
pub async fn hash_password_blocking(plaintext: String, cost: u32) -> AppResult<String> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&plaintext, cost))
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))??;
    Ok(hash)
}

/// [`verify_password`] on the blocking pool, off the async workers.
pub async fn verify_password_blocking(plaintext: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plaintext, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("verify task failed: {}", e)))
}
