use crate::models::user::User;
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, SaltString},
    Argon2, PasswordVerifier,
};
use rand::rngs::OsRng;
use std::sync::Arc;

const MAX_NAME_LEN: usize = 50;
const MAX_EMAIL_LEN: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("{0} is required and must be at most 50 characters")]
    InvalidName(&'static str),
    #[error("Password is required")]
    EmptyPassword,
    #[error("User not found")]
    UserNotFound,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserServiceError> {
        let first_name = request.first_name.trim();
        let last_name = request.last_name.trim();
        let email = request.email.trim();

        validate_name(first_name, "First name")?;
        validate_name(last_name, "Last name")?;
        validate_email(email)?;

        if request.password.is_empty() {
            return Err(UserServiceError::EmptyPassword);
        }

        let password_hash = hash_password(&request.password)?;

        match self
            .repository
            .create_user(first_name, last_name, email, &password_hash)
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = user.id, "Created user account");
                Ok(user)
            }
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn get_user(&self, id: i64) -> Result<User, UserServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserServiceError::UserNotFound)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_email(email).await?)
    }

    pub async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repository.list_users(limit, offset).await?)
    }
}

fn validate_name(name: &str, field: &'static str) -> Result<(), UserServiceError> {
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(UserServiceError::InvalidName(field));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), UserServiceError> {
    if email.is_empty() || !email.contains('@') || email.chars().count() > MAX_EMAIL_LEN {
        return Err(UserServiceError::InvalidEmail);
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, UserServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserServiceError::HashingError(e.to_string()))
}

/// Constant-time check of `password` against a stored PHC string. A hash that
/// fails to parse never verifies.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}
