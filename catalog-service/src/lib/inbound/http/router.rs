use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::add_favorite::add_favorite;
use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::get_director::get_director;
use super::handlers::get_genre::get_genre;
use super::handlers::get_movie::get_movie;
use super::handlers::get_user::get_user;
use super::handlers::list_movies::list_movies;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::remove_favorite::remove_favorite;
use super::handlers::update_user::update_user;
use super::middleware::authenticate as auth_middleware;
use crate::domain::movie::ports::MovieRepository;
use crate::domain::movie::service::MovieService;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::service::UserService;

pub struct AppState<UR, MR>
where
    UR: UserRepository,
    MR: MovieRepository,
{
    pub user_service: Arc<UserService<UR>>,
    pub movie_service: Arc<MovieService<MR>>,
    pub authenticator: Arc<Authenticator>,
}

// Manual impl: the repositories themselves are not Clone, only the Arcs are.
impl<UR, MR> Clone for AppState<UR, MR>
where
    UR: UserRepository,
    MR: MovieRepository,
{
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            movie_service: Arc::clone(&self.movie_service),
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

async fn welcome() -> &'static str {
    "Welcome to the movie catalog API"
}

/// Build the application router.
///
/// Login and registration are public; every catalog and user route sits
/// behind the bearer-token guard, which runs before any protected handler.
pub fn create_router<UR, MR>(
    user_service: Arc<UserService<UR>>,
    movie_service: Arc<MovieService<MR>>,
    authenticator: Arc<Authenticator>,
) -> Router
where
    UR: UserRepository,
    MR: MovieRepository,
{
    let state = AppState {
        user_service,
        movie_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/", get(welcome))
        .route("/login", post(login::<UR, MR>))
        .route("/users", post(create_user::<UR, MR>));

    let protected_routes = Router::new()
        .route("/movies", get(list_movies::<UR, MR>))
        .route("/movies/:title", get(get_movie::<UR, MR>))
        .route("/movies/genre/:name", get(get_genre::<UR, MR>))
        .route("/movies/director/:name", get(get_director::<UR, MR>))
        .route("/users", get(list_users::<UR, MR>))
        .route("/users/:username", get(get_user::<UR, MR>))
        .route("/users/:username", put(update_user::<UR, MR>))
        .route("/users/:username", delete(delete_user::<UR, MR>))
        .route(
            "/users/:username/movies/:movie_id",
            post(add_favorite::<UR, MR>),
        )
        .route(
            "/users/:username/movies/:movie_id",
            delete(remove_favorite::<UR, MR>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<UR, MR>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
