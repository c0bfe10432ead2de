use thiserror::Error;

/// Error type for password operations.
///
/// Verification does not error: any malformed input fails closed as a
/// non-match. Only the hashing primitive itself can fail, which is an
/// operational fault rather than an authentication outcome.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
