use async_trait::async_trait;

use crate::domain::movie::models::MovieId;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Port for user domain service operations.
///
/// Every operation is keyed by username, the unique external identifier
/// presented by clients.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Create new user with validated fields, hashing the password.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve all registered users.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Retrieve user by unique username.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `DatabaseError` - Database operation failed
    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError>;

    /// Update the user currently registered under `username` with optional
    /// fields. A supplied password is re-hashed; a supplied username renames
    /// the record without changing its identity.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update_user(
        &self,
        username: &Username,
        command: UpdateUserCommand,
    ) -> Result<User, UserError>;

    /// Delete existing user by username.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, username: &Username) -> Result<(), UserError>;

    /// Add a movie to the user's favorites. Adding a movie that is already
    /// a favorite is a no-op.
    ///
    /// # Returns
    /// Updated user entity
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `UnknownMovie` - Movie id does not exist in the catalog
    /// * `DatabaseError` - Database operation failed
    async fn add_favorite(&self, username: &Username, movie_id: &MovieId)
        -> Result<User, UserError>;

    /// Remove a movie from the user's favorites. Removing a movie that is
    /// not a favorite is a no-op.
    ///
    /// # Returns
    /// Updated user entity
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `DatabaseError` - Database operation failed
    async fn remove_favorite(
        &self,
        username: &Username,
        movie_id: &MovieId,
    ) -> Result<User, UserError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Retrieve all users from storage.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Update existing user in storage, keyed by its internal id.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove user from storage by username.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `DatabaseError` - Database operation failed
    async fn delete_by_username(&self, username: &Username) -> Result<(), UserError>;

    /// Record a favorite movie for the user. Idempotent for movies that
    /// are already favorites.
    ///
    /// # Returns
    /// Updated user entity
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `UnknownMovie` - Movie id does not exist in the catalog
    /// * `DatabaseError` - Database operation failed
    async fn add_favorite(&self, username: &Username, movie_id: &MovieId)
        -> Result<User, UserError>;

    /// Remove a favorite movie for the user. Idempotent for movies that
    /// are not favorites.
    ///
    /// # Returns
    /// Updated user entity
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `DatabaseError` - Database operation failed
    async fn remove_favorite(
        &self,
        username: &Username,
        movie_id: &MovieId,
    ) -> Result<User, UserError>;
}
