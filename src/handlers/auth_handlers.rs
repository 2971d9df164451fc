use crate::auth::extract_bearer_token;
use crate::error::Result;
use crate::models::token::{LoginResponse, VerifyResponse};
use crate::services::auth_service::LoginRequest;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

pub async fn login_handler(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<LoginForm>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(form) = payload?;
    let outcome = app_state
        .auth_service
        .login(LoginRequest {
            email: form.email,
            password: form.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: outcome.token,
    }))
}

pub async fn verify_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<VerifyResponse>> {
    let token = extract_bearer_token(&headers)?;
    let verified = app_state.auth_service.verify(token).await?;

    Ok(Json(VerifyResponse {
        message: "Token is valid".to_string(),
        user_id: verified.user.id,
        payload: verified.claims,
    }))
}
