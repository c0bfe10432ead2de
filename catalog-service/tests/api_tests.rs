mod common;

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use auth::Authenticator;
use auth::Claims;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use catalog_service::domain::movie::service::MovieService;
use catalog_service::domain::user::service::UserService;
use catalog_service::inbound::http::middleware::authenticate;
use catalog_service::inbound::http::router::AppState;
use chrono::Duration;
use chrono::Utc;
use reqwest::StatusCode;

use common::InMemoryMovieRepository;
use common::InMemoryUserRepository;
use common::TestApp;

/// Flip one character of the payload segment so the signature no longer
/// matches the token body.
fn tamper_payload(token: &str) -> String {
    let mut segments: Vec<String> = token.split('.').map(String::from).collect();
    assert_eq!(segments.len(), 3);

    let payload = &segments[1];
    let flipped = if payload.starts_with('A') { 'B' } else { 'A' };
    segments[1] = format!("{}{}", flipped, &payload[1..]);
    segments.join(".")
}

#[tokio::test]
async fn welcome_route_is_public() {
    let app = TestApp::spawn().await;

    let response = app.get("/").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "Welcome to the movie catalog API");
}

#[tokio::test]
async fn create_user_returns_201_and_never_exposes_the_password() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/users")
        .json(&serde_json::json!({
            "username": "alice123",
            "email": "alice@example.com",
            "password": "correct-pw",
            "birthday": "1990-04-12"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["username"], "alice123");
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert_eq!(body["data"]["birthday"], "1990-04-12");

    let serialized = body.to_string();
    assert!(!serialized.contains("correct-pw"));
    assert!(!serialized.contains("$argon2"));
}

#[tokio::test]
async fn create_user_with_invalid_username_returns_422() {
    let app = TestApp::spawn().await;

    for username in ["ab", "alice_123", "alice 123"] {
        let response = app
            .post("/users")
            .json(&serde_json::json!({
                "username": username,
                "email": "alice@example.com",
                "password": "correct-pw"
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn create_user_with_taken_username_returns_409() {
    let app = TestApp::spawn().await;
    app.seed_user("alice123", "correct-pw");

    let response = app
        .post("/users")
        .json(&serde_json::json!({
            "username": "alice123",
            "email": "other@example.com",
            "password": "another-pw"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_issues_a_token_bound_to_the_username() {
    let app = TestApp::spawn().await;
    app.seed_user("alice123", "correct-pw");

    let response = app
        .post("/login")
        .json(&serde_json::json!({
            "username": "alice123",
            "password": "correct-pw"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["user"]["username"], "alice123");

    let token = body["data"]["token"].as_str().unwrap();
    let claims = app.jwt_handler.decode(token).unwrap();
    assert_eq!(claims.sub, "alice123");
    assert!(claims.exp > claims.iat);
}

#[tokio::test]
async fn login_failure_response_does_not_reveal_whether_the_username_exists() {
    let app = TestApp::spawn().await;
    app.seed_user("alice123", "correct-pw");

    let wrong_password = app
        .post("/login")
        .json(&serde_json::json!({
            "username": "alice123",
            "password": "wrong-pw"
        }))
        .send()
        .await
        .unwrap();
    let unknown_username = app
        .post("/login")
        .json(&serde_json::json!({
            "username": "nosuchuser",
            "password": "correct-pw"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_username.status(), StatusCode::BAD_REQUEST);

    let wrong_password_body: serde_json::Value = wrong_password.json().await.unwrap();
    let unknown_username_body: serde_json::Value = unknown_username.json().await.unwrap();
    assert_eq!(wrong_password_body, unknown_username_body);
    assert!(wrong_password_body["data"].get("token").is_none());
}

#[tokio::test]
async fn protected_routes_reject_requests_without_a_token() {
    let app = TestApp::spawn().await;

    let response = app.get("/users").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.get("/movies").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_reject_non_bearer_authorization() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/users")
        .header("Authorization", "Basic YWxpY2U6cHc=")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tampered_token_never_reaches_the_handler() {
    let user_repo = Arc::new(InMemoryUserRepository::default());
    let movie_repo = Arc::new(InMemoryMovieRepository::default());
    let user_service = Arc::new(UserService::new(Arc::clone(&user_repo)));
    let movie_service = Arc::new(MovieService::new(Arc::clone(&movie_repo)));
    let authenticator = Arc::new(Authenticator::new(common::TEST_JWT_SECRET));
    let state = AppState {
        user_service,
        movie_service,
        authenticator: Arc::clone(&authenticator),
    };

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let router = Router::new()
        .route(
            "/protected",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "ok"
                }
            }),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            authenticate::<InMemoryUserRepository, InMemoryMovieRepository>,
        ));

    let address = common::serve(router).await;
    let client = reqwest::Client::new();

    let app = TestApp {
        address: address.clone(),
        api_client: client.clone(),
        jwt_handler: auth::JwtHandler::new(common::TEST_JWT_SECRET),
        user_repo: Arc::clone(&user_repo),
        movie_repo,
    };
    app.seed_user("alice123", "correct-pw");

    let token = app
        .jwt_handler
        .encode(&Claims::for_subject("alice123"))
        .unwrap();

    let response = client
        .get(format!("{}/protected", address))
        .bearer_auth(tamper_payload(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    // A genuine token still passes through the same guard.
    let response = client
        .get(format!("{}/protected", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_token_returns_401() {
    let app = TestApp::spawn().await;
    app.seed_user("alice123", "correct-pw");

    let now = Utc::now();
    let expired = Claims {
        sub: "alice123".to_string(),
        iat: (now - Duration::days(8)).timestamp(),
        exp: (now - Duration::days(1)).timestamp(),
    };
    let token = app.jwt_handler.encode(&expired).unwrap();

    let response = app
        .get_authenticated("/users", &token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_a_deleted_user_is_rejected() {
    let app = TestApp::spawn().await;
    app.seed_user("alice123", "correct-pw");
    let token = app.login("alice123", "correct-pw").await;

    // The token works while the user exists.
    let response = app
        .get_authenticated("/users/alice123", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Once the identity is gone, the still-valid token must fail closed.
    app.user_repo.remove("alice123");
    let response = app
        .get_authenticated("/users/alice123", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn favorites_add_is_idempotent_and_remove_round_trips() {
    let app = TestApp::spawn().await;
    app.seed_user("alice123", "correct-pw");
    let movie = app.seed_movie("Heat", "Crime", "Michael Mann");
    let token = app.login("alice123", "correct-pw").await;

    let path = format!("/users/alice123/movies/{}", movie.id);

    let response = app
        .post_authenticated(&path, &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["favorites"][0], movie.id.to_string());

    // Adding the same movie again does not duplicate it.
    let response = app
        .post_authenticated(&path, &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["favorites"].as_array().unwrap().len(), 1);

    let response = app
        .delete_authenticated(&path, &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["data"]["favorites"].as_array().unwrap().is_empty());

    // Removing a movie that is no longer a favorite is a no-op.
    let response = app
        .delete_authenticated(&path, &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn favorites_reject_a_malformed_movie_id() {
    let app = TestApp::spawn().await;
    app.seed_user("alice123", "correct-pw");
    let token = app.login("alice123", "correct-pw").await;

    let response = app
        .post_authenticated("/users/alice123/movies/not-a-uuid", &token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn movie_catalog_lookups_work_with_a_valid_token() {
    let app = TestApp::spawn().await;
    app.seed_user("alice123", "correct-pw");
    app.seed_movie("Heat", "Crime", "Michael Mann");
    let token = app.login("alice123", "correct-pw").await;

    let response = app
        .get_authenticated("/movies", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .get_authenticated("/movies/Heat", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["title"], "Heat");
    assert_eq!(body["data"]["genre"]["name"], "Crime");

    let response = app
        .get_authenticated("/movies/genre/Crime", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Crime");

    let response = app
        .get_authenticated("/movies/director/Michael%20Mann", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Michael Mann");

    let response = app
        .get_authenticated("/movies/Unknown", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_user_renames_and_rehashes() {
    let app = TestApp::spawn().await;
    app.seed_user("alice123", "correct-pw");
    let token = app.login("alice123", "correct-pw").await;

    let response = app
        .put_authenticated("/users/alice123", &token)
        .json(&serde_json::json!({
            "username": "alice456",
            "password": "new-password"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["username"], "alice456");

    // The new credentials work end to end.
    let response = app
        .post("/login")
        .json(&serde_json::json!({
            "username": "alice456",
            "password": "new-password"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The old ones no longer do.
    let response = app
        .post("/login")
        .json(&serde_json::json!({
            "username": "alice123",
            "password": "correct-pw"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_user_returns_204_and_404_for_missing() {
    let app = TestApp::spawn().await;
    app.seed_user("alice123", "correct-pw");
    app.seed_user("bobby99", "another-pw");
    let token = app.login("alice123", "correct-pw").await;

    let response = app
        .delete_authenticated("/users/bobby99", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .delete_authenticated("/users/bobby99", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
