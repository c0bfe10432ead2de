use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::movie::models::Director;
use crate::domain::movie::models::Genre;
use crate::domain::movie::models::Movie;
use crate::domain::movie::models::MovieId;
use crate::domain::movie::ports::MovieRepository;
use crate::movie::errors::MovieError;

const SELECT_MOVIE: &str = r#"
    SELECT id, title, description,
           genre_name, genre_description,
           director_name, director_bio, director_birth, director_death,
           image_path, featured
    FROM movies
"#;

pub struct PostgresMovieRepository {
    pool: PgPool,
}

impl PostgresMovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        condition: &str,
        value: &str,
    ) -> Result<Option<Movie>, MovieError> {
        let query = format!("{} WHERE {} = $1 LIMIT 1", SELECT_MOVIE, condition);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(|r| map_movie_row(&r)).transpose()
    }
}

fn db_err(e: sqlx::Error) -> MovieError {
    MovieError::DatabaseError(e.to_string())
}

fn map_movie_row(row: &PgRow) -> Result<Movie, MovieError> {
    Ok(Movie {
        id: MovieId(row.try_get("id").map_err(db_err)?),
        title: row.try_get("title").map_err(db_err)?,
        description: row.try_get("description").map_err(db_err)?,
        genre: Genre {
            name: row.try_get("genre_name").map_err(db_err)?,
            description: row.try_get("genre_description").map_err(db_err)?,
        },
        director: Director {
            name: row.try_get("director_name").map_err(db_err)?,
            bio: row.try_get("director_bio").map_err(db_err)?,
            birth: row
                .try_get::<Option<NaiveDate>, _>("director_birth")
                .map_err(db_err)?,
            death: row
                .try_get::<Option<NaiveDate>, _>("director_death")
                .map_err(db_err)?,
        },
        image_path: row
            .try_get::<Option<String>, _>("image_path")
            .map_err(db_err)?,
        featured: row.try_get("featured").map_err(db_err)?,
    })
}

#[async_trait]
impl MovieRepository for PostgresMovieRepository {
    async fn find_all(&self) -> Result<Vec<Movie>, MovieError> {
        let query = format!("{} ORDER BY title", SELECT_MOVIE);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(map_movie_row).collect()
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, MovieError> {
        self.fetch_one_where("title", title).await
    }

    async fn find_by_genre_name(&self, name: &str) -> Result<Option<Movie>, MovieError> {
        self.fetch_one_where("genre_name", name).await
    }

    async fn find_by_director_name(&self, name: &str) -> Result<Option<Movie>, MovieError> {
        self.fetch_one_where("director_name", name).await
    }
}
