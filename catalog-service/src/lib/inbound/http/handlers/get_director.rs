use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::DirectorData;
use crate::domain::movie::ports::MovieRepository;
use crate::domain::movie::ports::MovieServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn get_director<UR, MR>(
    State(state): State<AppState<UR, MR>>,
    Path(name): Path<String>,
) -> Result<ApiSuccess<DirectorData>, ApiError>
where
    UR: UserRepository,
    MR: MovieRepository,
{
    state
        .movie_service
        .get_director_by_name(&name)
        .await
        .map_err(ApiError::from)
        .map(|ref director| ApiSuccess::new(StatusCode::OK, director.into()))
}
