use crate::error::AppError;
use axum::http::{header, HeaderMap};

/// Extract Bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AppError::MissingAuthorizationHeader)?
        .to_str()
        .map_err(|_| AppError::InvalidAuthorizationFormat)?;

    let (scheme, token) = auth_header
        .split_once(' ')
        .ok_or(AppError::InvalidAuthorizationFormat)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::InvalidAuthorizationFormat);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::InvalidAuthorizationFormat);
    }

    Ok(token)
}
