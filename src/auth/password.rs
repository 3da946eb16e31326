use thiserror::Error;

/// bcrypt's default work factor.
pub use bcrypt::DEFAULT_COST;

/// Failure reported by the hashing backend.
#[derive(Debug, Error)]
#[error("failed to hash password: {0}")]
pub struct HashError(pub String);

/// Adaptive, salted, one-way password hashing.
///
/// Implementations must be safe to call from many store operations at once;
/// the only shared input is the cost factor passed in by the caller.
pub trait PasswordHasher: Send + Sync {
    /// Hashes `plaintext` with the given cost. The salt is embedded in the result.
    fn hash(&self, plaintext: &str, cost: u32) -> Result<String, HashError>;

    /// Returns `true` when `plaintext` matches `hash`. A malformed hash is a mismatch.
    fn verify(&self, hash: &str, plaintext: &str) -> bool;
}

/// `PasswordHasher` backed by the `bcrypt` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct BcryptHasher;

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str, cost: u32) -> Result<String, HashError> {
        bcrypt::hash(plaintext, cost).map_err(|e| HashError(e.to_string()))
    }

    fn verify(&self, hash: &str, plaintext: &str) -> bool {
        match bcrypt::verify(plaintext, hash) {
            Ok(matches) => matches,
            Err(e) => {
                log::debug!("Rejecting unverifiable password hash: {}", e);
                false
            }
        }
    }
}
