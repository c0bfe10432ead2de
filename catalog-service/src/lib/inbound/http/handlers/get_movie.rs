use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::MovieData;
use crate::domain::movie::ports::MovieRepository;
use crate::domain::movie::ports::MovieServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn get_movie<UR, MR>(
    State(state): State<AppState<UR, MR>>,
    Path(title): Path<String>,
) -> Result<ApiSuccess<MovieData>, ApiError>
where
    UR: UserRepository,
    MR: MovieRepository,
{
    state
        .movie_service
        .get_movie_by_title(&title)
        .await
        .map_err(ApiError::from)
        .map(|ref movie| ApiSuccess::new(StatusCode::OK, movie.into()))
}
