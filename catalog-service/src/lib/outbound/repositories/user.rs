use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::movie::models::MovieId;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// User rows joined with their favorites. The aggregate is always loaded
/// whole so callers see the favorites list the store currently holds.
const SELECT_USER: &str = r#"
    SELECT u.id, u.username, u.email, u.password_hash, u.birthday, u.created_at,
           COALESCE(
               ARRAY_AGG(f.movie_id) FILTER (WHERE f.movie_id IS NOT NULL),
               ARRAY[]::uuid[]
           ) AS favorites
    FROM users u
    LEFT JOIN user_favorites f ON f.user_id = u.id
"#;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let query = format!("{} WHERE u.username = $1 GROUP BY u.id", SELECT_USER);

        let row = sqlx::query(&query)
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(|r| map_user_row(&r)).transpose()
    }
}

fn db_err(e: sqlx::Error) -> UserError {
    UserError::DatabaseError(e.to_string())
}

fn map_user_row(row: &PgRow) -> Result<User, UserError> {
    let favorites: Vec<Uuid> = row.try_get("favorites").map_err(db_err)?;

    Ok(User {
        id: UserId(row.try_get("id").map_err(db_err)?),
        username: Username::new(row.try_get::<String, _>("username").map_err(db_err)?)?,
        email: EmailAddress::new(row.try_get::<String, _>("email").map_err(db_err)?)?,
        password_hash: row.try_get("password_hash").map_err(db_err)?,
        birthday: row
            .try_get::<Option<NaiveDate>, _>("birthday")
            .map_err(db_err)?,
        favorites: favorites.into_iter().map(MovieId).collect(),
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(db_err)?,
    })
}

fn map_unique_violation(e: sqlx::Error, user: &User) -> UserError {
    if let Some(db_error) = e.as_database_error() {
        if db_error.is_unique_violation() {
            if db_error.constraint() == Some("users_username_key") {
                return UserError::UsernameAlreadyExists(user.username.as_str().to_string());
            }
            if db_error.constraint() == Some("users_email_key") {
                return UserError::EmailAlreadyExists(user.email.as_str().to_string());
            }
        }
    }
    db_err(e)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, birthday, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.birthday)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &user))?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        self.fetch_by_username(username).await
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let query = format!("{} GROUP BY u.id ORDER BY u.created_at DESC", SELECT_USER);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(map_user_row).collect()
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, email = $3, password_hash = $4, birthday = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.birthday)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &user))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(user.id.to_string()));
        }

        Ok(user)
    }

    async fn delete_by_username(&self, username: &Username) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFoundByUsername(username.to_string()));
        }

        Ok(())
    }

    async fn add_favorite(
        &self,
        username: &Username,
        movie_id: &MovieId,
    ) -> Result<User, UserError> {
        let user = self
            .fetch_by_username(username)
            .await?
            .ok_or(UserError::NotFoundByUsername(username.to_string()))?;

        // ON CONFLICT keeps the operation idempotent for existing favorites
        sqlx::query(
            r#"
            INSERT INTO user_favorites (user_id, movie_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user.id.0)
        .bind(movie_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_error) = e.as_database_error() {
                if db_error.is_foreign_key_violation() {
                    return UserError::UnknownMovie(movie_id.to_string());
                }
            }
            db_err(e)
        })?;

        self.fetch_by_username(username)
            .await?
            .ok_or(UserError::NotFoundByUsername(username.to_string()))
    }

    async fn remove_favorite(
        &self,
        username: &Username,
        movie_id: &MovieId,
    ) -> Result<User, UserError> {
        let user = self
            .fetch_by_username(username)
            .await?
            .ok_or(UserError::NotFoundByUsername(username.to_string()))?;

        // Removing a movie that is not a favorite affects zero rows
        sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND movie_id = $2")
            .bind(user.id.0)
            .bind(movie_id.0)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        self.fetch_by_username(username)
            .await?
            .ok_or(UserError::NotFoundByUsername(username.to_string()))
    }
}
