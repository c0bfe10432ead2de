use std::sync::Arc;

use async_trait::async_trait;

use crate::movie::errors::MovieError;
use crate::movie::models::Director;
use crate::movie::models::Genre;
use crate::movie::models::Movie;
use crate::movie::ports::MovieRepository;
use crate::movie::ports::MovieServicePort;

/// Domain service implementation for catalog lookups.
pub struct MovieService<MR>
where
    MR: MovieRepository,
{
    repository: Arc<MR>,
}

impl<MR> MovieService<MR>
where
    MR: MovieRepository,
{
    /// Create a new movie service with an injected repository.
    pub fn new(repository: Arc<MR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<MR> MovieServicePort for MovieService<MR>
where
    MR: MovieRepository,
{
    async fn list_movies(&self) -> Result<Vec<Movie>, MovieError> {
        self.repository.find_all().await
    }

    async fn get_movie_by_title(&self, title: &str) -> Result<Movie, MovieError> {
        self.repository
            .find_by_title(title)
            .await?
            .ok_or(MovieError::NotFoundByTitle(title.to_string()))
    }

    async fn get_genre_by_name(&self, name: &str) -> Result<Genre, MovieError> {
        self.repository
            .find_by_genre_name(name)
            .await?
            .map(|movie| movie.genre)
            .ok_or(MovieError::GenreNotFound(name.to_string()))
    }

    async fn get_director_by_name(&self, name: &str) -> Result<Director, MovieError> {
        self.repository
            .find_by_director_name(name)
            .await?
            .map(|movie| movie.director)
            .ok_or(MovieError::DirectorNotFound(name.to_string()))
    }
}
