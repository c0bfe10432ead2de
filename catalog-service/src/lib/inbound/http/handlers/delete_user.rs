use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::movie::ports::MovieRepository;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn delete_user<UR, MR>(
    State(state): State<AppState<UR, MR>>,
    Path(username): Path<String>,
) -> Result<ApiSuccess<()>, ApiError>
where
    UR: UserRepository,
    MR: MovieRepository,
{
    let username = Username::new(username).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .user_service
        .delete_user(&username)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
