use thiserror::Error;

/// Error type for JWT operations.
///
/// Decode failures are distinguishable so callers can log them apart,
/// even though they all collapse to the same unauthorized response at
/// the HTTP boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// Wrong segment count, undecodable segments, or claims that do not
    /// deserialize.
    #[error("Token is malformed: {0}")]
    Malformed(String),

    /// Signature does not match the presented header and payload. Covers
    /// tampering and tokens signed with a different key or algorithm.
    #[error("Token signature is invalid")]
    BadSignature,

    /// Signature is valid but the expiry timestamp has passed.
    #[error("Token is expired")]
    Expired,
}
