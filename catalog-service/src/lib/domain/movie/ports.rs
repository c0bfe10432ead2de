use async_trait::async_trait;

use crate::movie::errors::MovieError;
use crate::movie::models::Director;
use crate::movie::models::Genre;
use crate::movie::models::Movie;

/// Port for movie catalog service operations.
///
/// The catalog is read-only over HTTP; titles, genre names, and director
/// names are the lookup keys.
#[async_trait]
pub trait MovieServicePort: Send + Sync + 'static {
    /// Retrieve all movies in the catalog.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_movies(&self) -> Result<Vec<Movie>, MovieError>;

    /// Retrieve a movie by its exact title.
    ///
    /// # Errors
    /// * `NotFoundByTitle` - No movie with this title
    /// * `DatabaseError` - Database operation failed
    async fn get_movie_by_title(&self, title: &str) -> Result<Movie, MovieError>;

    /// Retrieve genre details by genre name.
    ///
    /// # Errors
    /// * `GenreNotFound` - No movie carries this genre
    /// * `DatabaseError` - Database operation failed
    async fn get_genre_by_name(&self, name: &str) -> Result<Genre, MovieError>;

    /// Retrieve director details by director name.
    ///
    /// # Errors
    /// * `DirectorNotFound` - No movie carries this director
    /// * `DatabaseError` - Database operation failed
    async fn get_director_by_name(&self, name: &str) -> Result<Director, MovieError>;
}

/// Persistence operations for the movie catalog.
#[async_trait]
pub trait MovieRepository: Send + Sync + 'static {
    /// Retrieve all movies from storage.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_all(&self) -> Result<Vec<Movie>, MovieError>;

    /// Retrieve a movie by exact title.
    ///
    /// # Returns
    /// Optional movie entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, MovieError>;

    /// Retrieve one movie carrying the given genre name.
    ///
    /// # Returns
    /// Optional movie entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_genre_name(&self, name: &str) -> Result<Option<Movie>, MovieError>;

    /// Retrieve one movie carrying the given director name.
    ///
    /// # Returns
    /// Optional movie entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_director_name(&self, name: &str) -> Result<Option<Movie>, MovieError>;
}
