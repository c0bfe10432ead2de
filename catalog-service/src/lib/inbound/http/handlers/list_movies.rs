use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::MovieData;
use crate::domain::movie::ports::MovieRepository;
use crate::domain::movie::ports::MovieServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn list_movies<UR, MR>(
    State(state): State<AppState<UR, MR>>,
) -> Result<ApiSuccess<Vec<MovieData>>, ApiError>
where
    UR: UserRepository,
    MR: MovieRepository,
{
    state
        .movie_service
        .list_movies()
        .await
        .map_err(ApiError::from)
        .map(|movies| {
            ApiSuccess::new(
                StatusCode::OK,
                movies.iter().map(MovieData::from).collect(),
            )
        })
}
