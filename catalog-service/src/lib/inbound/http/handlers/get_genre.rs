use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::GenreData;
use crate::domain::movie::ports::MovieRepository;
use crate::domain::movie::ports::MovieServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn get_genre<UR, MR>(
    State(state): State<AppState<UR, MR>>,
    Path(name): Path<String>,
) -> Result<ApiSuccess<GenreData>, ApiError>
where
    UR: UserRepository,
    MR: MovieRepository,
{
    state
        .movie_service
        .get_genre_by_name(&name)
        .await
        .map_err(ApiError::from)
        .map(|ref genre| ApiSuccess::new(StatusCode::OK, genre.into()))
}
