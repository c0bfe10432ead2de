use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::movie::models::MovieId;
use crate::domain::movie::ports::MovieRepository;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn remove_favorite<UR, MR>(
    State(state): State<AppState<UR, MR>>,
    Path((username, movie_id)): Path<(String, String)>,
) -> Result<ApiSuccess<UserData>, ApiError>
where
    UR: UserRepository,
    MR: MovieRepository,
{
    let username = Username::new(username).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let movie_id =
        MovieId::from_string(&movie_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .user_service
        .remove_favorite(&username, &movie_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
