use std::fmt;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::movie::errors::MovieIdError;

/// Movie aggregate entity.
///
/// Genre and director are embedded value objects rather than independent
/// aggregates; the catalog is looked up by title, genre name, or director
/// name.
#[derive(Debug, Clone)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub description: String,
    pub genre: Genre,
    pub director: Director,
    pub image_path: Option<String>,
    pub featured: bool,
}

/// Movie unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MovieId(pub Uuid);

impl MovieId {
    /// Generate a new random movie ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a movie ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, MovieIdError> {
        Uuid::parse_str(s)
            .map(MovieId)
            .map_err(|e| MovieIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for MovieId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Genre value object embedded in a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub name: String,
    pub description: String,
}

/// Director value object embedded in a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Director {
    pub name: String,
    pub bio: String,
    pub birth: Option<NaiveDate>,
    pub death: Option<NaiveDate>,
}
