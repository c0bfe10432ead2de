use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtHandler;
use axum::Router;
use catalog_service::domain::movie::errors::MovieError;
use catalog_service::domain::movie::models::Director;
use catalog_service::domain::movie::models::Genre;
use catalog_service::domain::movie::models::Movie;
use catalog_service::domain::movie::models::MovieId;
use catalog_service::domain::movie::ports::MovieRepository;
use catalog_service::domain::movie::service::MovieService;
use catalog_service::domain::user::errors::UserError;
use catalog_service::domain::user::models::EmailAddress;
use catalog_service::domain::user::models::User;
use catalog_service::domain::user::models::UserId;
use catalog_service::domain::user::models::Username;
use catalog_service::domain::user::ports::UserRepository;
use catalog_service::domain::user::service::UserService;
use catalog_service::inbound::http::router::create_router;
use chrono::Utc;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// In-memory user store mirroring the Postgres repository semantics,
/// so the API tests run without a live database.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Insert a user directly, bypassing the HTTP surface.
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    /// Remove a user directly, simulating deletion behind the API's back.
    pub fn remove(&self, username: &str) {
        self.users
            .lock()
            .unwrap()
            .retain(|u| u.username.as_str() != username);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| &u.username == username).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if users
            .iter()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }

        let existing = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(UserError::NotFound(user.id.to_string()))?;
        *existing = user.clone();
        Ok(user)
    }

    async fn delete_by_username(&self, username: &Username) -> Result<(), UserError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| &u.username != username);

        if users.len() == before {
            return Err(UserError::NotFoundByUsername(username.to_string()));
        }
        Ok(())
    }

    async fn add_favorite(
        &self,
        username: &Username,
        movie_id: &MovieId,
    ) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| &u.username == username)
            .ok_or(UserError::NotFoundByUsername(username.to_string()))?;

        if !user.favorites.contains(movie_id) {
            user.favorites.push(*movie_id);
        }
        Ok(user.clone())
    }

    async fn remove_favorite(
        &self,
        username: &Username,
        movie_id: &MovieId,
    ) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| &u.username == username)
            .ok_or(UserError::NotFoundByUsername(username.to_string()))?;

        user.favorites.retain(|id| id != movie_id);
        Ok(user.clone())
    }
}

/// In-memory movie catalog for the integration tests.
#[derive(Default)]
pub struct InMemoryMovieRepository {
    movies: Mutex<Vec<Movie>>,
}

impl InMemoryMovieRepository {
    pub fn insert(&self, movie: Movie) {
        self.movies.lock().unwrap().push(movie);
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn find_all(&self) -> Result<Vec<Movie>, MovieError> {
        Ok(self.movies.lock().unwrap().clone())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, MovieError> {
        let movies = self.movies.lock().unwrap();
        Ok(movies.iter().find(|m| m.title == title).cloned())
    }

    async fn find_by_genre_name(&self, name: &str) -> Result<Option<Movie>, MovieError> {
        let movies = self.movies.lock().unwrap();
        Ok(movies.iter().find(|m| m.genre.name == name).cloned())
    }

    async fn find_by_director_name(&self, name: &str) -> Result<Option<Movie>, MovieError> {
        let movies = self.movies.lock().unwrap();
        Ok(movies.iter().find(|m| m.director.name == name).cloned())
    }
}

/// Test application that spawns a real server on a random port.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
    pub user_repo: Arc<InMemoryUserRepository>,
    pub movie_repo: Arc<InMemoryMovieRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let user_repo = Arc::new(InMemoryUserRepository::default());
        let movie_repo = Arc::new(InMemoryMovieRepository::default());

        let user_service = Arc::new(UserService::new(Arc::clone(&user_repo)));
        let movie_service = Arc::new(MovieService::new(Arc::clone(&movie_repo)));
        let authenticator = Arc::new(Authenticator::new(TEST_JWT_SECRET));

        let router = create_router(user_service, movie_service, authenticator);
        let address = serve(router).await;

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(TEST_JWT_SECRET),
            user_repo,
            movie_repo,
        }
    }

    /// Register a user directly in the store with a real password hash.
    pub fn seed_user(&self, username: &str, password: &str) -> User {
        let hash = Authenticator::new(TEST_JWT_SECRET)
            .hash_password(password)
            .expect("Failed to hash password");

        let user = User {
            id: UserId::new(),
            username: Username::new(username.to_string()).expect("Invalid test username"),
            email: EmailAddress::new(format!("{}@example.com", username))
                .expect("Invalid test email"),
            password_hash: hash,
            birthday: None,
            favorites: Vec::new(),
            created_at: Utc::now(),
        };

        self.user_repo.insert(user.clone());
        user
    }

    /// Add a movie directly to the catalog.
    pub fn seed_movie(&self, title: &str, genre_name: &str, director_name: &str) -> Movie {
        let movie = Movie {
            id: MovieId::new(),
            title: title.to_string(),
            description: format!("Description of {}", title),
            genre: Genre {
                name: genre_name.to_string(),
                description: format!("{} movies", genre_name),
            },
            director: Director {
                name: director_name.to_string(),
                bio: format!("Biography of {}", director_name),
                birth: None,
                death: None,
            },
            image_path: None,
            featured: false,
        };

        self.movie_repo.insert(movie.clone());
        movie
    }

    /// Log in through the API and return the issued token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute login request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse login body");
        body["data"]["token"]
            .as_str()
            .expect("Login response carried no token")
            .to_string()
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }
}

/// Serve a router on a random local port and return its base address.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server error");
    });

    format!("http://127.0.0.1:{}", port)
}
