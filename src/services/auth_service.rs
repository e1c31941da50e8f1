//! Domain service for authentication and user management.
//!
//! Handles signup, login with bearer-token issuance, token verification,
//! and password changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::users::Role;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated caller context, attached to requests by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.user_id,
            username: claims.sub,
            role: claims.role,
        }
    }
}

/// User info DTO for responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

/// Issued bearer token plus metadata.
#[derive(Debug, Clone, Serialize)]
pub struct TokenBundle {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a new account. The role is fixed at creation.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] for duplicates and
    /// [`AuthError::Validation`] for malformed usernames or short passwords.
    async fn signup(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<UserInfo, AuthError>;

    /// Verifies credentials and issues a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<TokenBundle, AuthError>;

    /// Verifies a bearer token and returns the caller context.
    fn verify_token(&self, token: &str) -> Result<AuthUser, AuthError>;

    /// Gets information for a specific user.
    async fn get_user_info(&self, username: &str) -> Result<UserInfo, AuthError>;

    /// Lists all accounts.
    async fn list_users(&self) -> Result<Vec<UserInfo>, AuthError>;

    /// Changes a user's password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if the current password is
    /// incorrect or the new password is invalid.
    async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;
}
