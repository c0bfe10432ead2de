use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::movie::ports::MovieRepository;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_users<UR, MR>(
    State(state): State<AppState<UR, MR>>,
) -> Result<ApiSuccess<Vec<UserData>>, ApiError>
where
    UR: UserRepository,
    MR: MovieRepository,
{
    state
        .user_service
        .list_users()
        .await
        .map_err(ApiError::from)
        .map(|users| {
            ApiSuccess::new(
                StatusCode::OK,
                users.iter().map(UserData::from).collect(),
            )
        })
}
