use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access token lifetime. Fixed with no refresh mechanism; an expired
/// token requires a fresh login.
pub const TOKEN_LIFETIME_DAYS: i64 = 7;

/// Claims embedded in an access token.
///
/// The subject is the username of the authenticated identity. Timestamps
/// are Unix seconds; `exp` is always `iat` plus [`TOKEN_LIFETIME_DAYS`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username of the authenticated identity)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject, issued now with the fixed lifetime.
    pub fn for_subject(subject: impl Into<String>) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::days(TOKEN_LIFETIME_DAYS);

        Self {
            sub: subject.into(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Check whether the claims are expired at the given Unix timestamp.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
