use auth::JwtError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::movie::ports::MovieRepository;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Extension type carrying the authenticated user resolved by the guard.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// Bearer-token guard for protected routes.
///
/// Validates the presented token, then re-resolves its subject against the
/// user store before any handler runs. There is no revocation list, so the
/// store lookup is what makes a deleted-after-issuance identity fail
/// closed. Every failure short-circuits with 401; token failure classes
/// are only distinguished in the logs.
pub async fn authenticate<UR, MR>(
    State(state): State<AppState<UR, MR>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response>
where
    UR: UserRepository,
    MR: MovieRepository,
{
    let token = extract_token_from_header(&req)?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        match e {
            JwtError::Expired => tracing::warn!("Rejected expired access token"),
            JwtError::BadSignature => {
                tracing::warn!("Rejected access token with invalid signature")
            }
            _ => tracing::warn!(error = %e, "Rejected malformed access token"),
        }
        unauthorized("Invalid or expired token")
    })?;

    let username = Username::new(claims.sub).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a valid username");
        unauthorized("Invalid or expired token")
    })?;

    let user = state
        .user_service
        .get_user_by_username(&username)
        .await
        .map_err(|e| match e {
            UserError::NotFoundByUsername(_) => {
                tracing::warn!(username = %username, "Token subject no longer resolvable");
                unauthorized("Invalid or expired token")
            }
            other => {
                tracing::error!(error = %other, "Failed to resolve token subject");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                )
                    .into_response()
            }
        })?;

    req.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(req).await)
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message
        })),
    )
        .into_response()
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    if !auth_str.starts_with("Bearer ") {
        return Err(unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>",
        ));
    }

    Ok(auth_str.trim_start_matches("Bearer "))
}
