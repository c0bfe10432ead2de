use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::movie::ports::MovieRepository;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Login endpoint: verify credentials and hand back an identity plus a
/// signed access token.
///
/// Every rejection path collapses to the same generic 400 so the response
/// does not reveal whether the username exists. Operational faults in the
/// hashing or signing primitives stay 500s and are never downgraded to a
/// credential failure.
pub async fn login<UR, MR>(
    State(state): State<AppState<UR, MR>>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError>
where
    UR: UserRepository,
    MR: MovieRepository,
{
    // A syntactically invalid username cannot belong to any account
    let username =
        Username::new(body.username).map_err(|_| ApiError::credential_failure())?;

    let user = state
        .user_service
        .get_user_by_username(&username)
        .await
        .map_err(|e| match e {
            UserError::NotFoundByUsername(_) => {
                tracing::warn!("Login rejected for unknown username");
                ApiError::credential_failure()
            }
            _ => ApiError::from(e),
        })?;

    let claims = auth::Claims::for_subject(user.username.as_str());

    // Verify password, then mint the token; issuance never precedes
    // successful verification
    let result = state
        .authenticator
        .authenticate(&body.password, &user.password_hash, &claims)
        .map_err(|e| match e {
            auth::AuthenticationError::InvalidCredentials => {
                tracing::warn!(username = %user.username, "Login rejected: password mismatch");
                ApiError::credential_failure()
            }
            auth::AuthenticationError::Password(err) => {
                ApiError::InternalServerError(format!("Password verification failed: {}", err))
            }
            auth::AuthenticationError::Jwt(err) => {
                ApiError::InternalServerError(format!("Token generation failed: {}", err))
            }
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            user: (&user).into(),
            token: result.access_token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: UserData,
    pub token: String,
}
