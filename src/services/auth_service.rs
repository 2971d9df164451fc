use crate::models::{token::Claims, user::User};
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use crate::services::token_service::{TokenError, TokenService};
use crate::services::user_service::verify_password;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("Token error: {0}")]
    Token(#[from] TokenError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Result of a successful login.
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
}

/// Result of a successful token verification.
pub struct VerifiedToken {
    pub user: User,
    pub claims: Claims,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(user_repository: Arc<dyn UserRepository>, tokens: TokenService) -> Self {
        Self {
            user_repository,
            tokens,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AuthServiceError> {
        let user = self
            .user_repository
            .find_by_email(request.email.trim())
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        if !verify_password(&request.password, &user.password_hash) {
            tracing::warn!(user_id = user.id, "Login rejected: wrong password");
            return Err(AuthServiceError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        tracing::info!(user_id = user.id, "User logged in");

        Ok(LoginOutcome { user, token })
    }

    /// Checks signature and expiry, then re-resolves the account the token
    /// was issued for.
    pub async fn verify(&self, token: &str) -> Result<VerifiedToken, AuthServiceError> {
        let claims = self.tokens.verify(token)?;
        let user = self.get_user_by_id(claims.user_id).await?;

        Ok(VerifiedToken { user, claims })
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> Result<User, AuthServiceError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}
