//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::config::AuthConfig;
use crate::db::{Store, User};
use crate::entities::users::Role;
use crate::services::auth_service::{
    AuthError, AuthService, AuthUser, Claims, TokenBundle, UserInfo,
};

pub struct SeaOrmAuthService {
    store: Store,
    config: AuthConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, config: AuthConfig) -> Self {
        Self { store, config }
    }
}

fn to_user_info(user: User) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username,
        role: user.role,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

/// Username rules: 3-50 chars, alphanumeric plus `_` and `-`, starting
/// with an alphanumeric character.
fn validate_username(username: &str) -> Result<(), AuthError> {
    if username.len() < 3 {
        return Err(AuthError::Validation(
            "Username must be at least 3 characters".to_string(),
        ));
    }

    if username.len() > 50 {
        return Err(AuthError::Validation(
            "Username must be at most 50 characters".to_string(),
        ));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AuthError::Validation(
            "Username can only contain letters, numbers, underscore, and hyphen".to_string(),
        ));
    }

    if !username
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
    {
        return Err(AuthError::Validation(
            "Username must start with a letter or number".to_string(),
        ));
    }

    Ok(())
}

pub(crate) fn issue_token(
    config: &AuthConfig,
    user_id: i32,
    username: &str,
    role: Role,
) -> Result<(String, i64), AuthError> {
    let now = Utc::now();
    let expires_in = config.token_expiry_minutes * 60;

    let claims = Claims {
        sub: username.to_string(),
        user_id,
        role,
        iat: now.timestamp(),
        exp: (now + Duration::minutes(config.token_expiry_minutes)).timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AuthError::Internal(format!("Token creation failed: {e}")))?;

    Ok((token, expires_in))
}

pub(crate) fn decode_token(config: &AuthConfig, token: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn signup(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<UserInfo, AuthError> {
        validate_username(username)?;

        if password.len() < self.config.min_password_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                self.config.min_password_length
            )));
        }

        if self.store.get_user_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let user = self
            .store
            .create_user(username, password, role, &self.config)
            .await?;

        Ok(to_user_info(user))
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenBundle, AuthError> {
        let is_valid = self.store.verify_user_password(username, password).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let (access_token, expires_in) =
            issue_token(&self.config, user.id, &user.username, user.role)?;

        Ok(TokenBundle {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
        })
    }

    fn verify_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = decode_token(&self.config, token)?;
        Ok(AuthUser::from(claims))
    }

    async fn get_user_info(&self, username: &str) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(to_user_info(user))
    }

    async fn list_users(&self) -> Result<Vec<UserInfo>, AuthError> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(to_user_info).collect())
    }

    async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.len() < self.config.min_password_length {
            return Err(AuthError::Validation(format!(
                "New password must be at least {} characters",
                self.config.min_password_length
            )));
        }

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let is_valid = self
            .store
            .verify_user_password(username, current_password)
            .await?;

        if !is_valid {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        self.store
            .update_user_password(username, new_password, &self.config)
            .await?;

        Ok(())
    }
}
