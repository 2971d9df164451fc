use crate::error::Result;
use crate::models::user::UserResponse;
use crate::services::user_service::CreateUserRequest;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SignupForm {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
}

pub async fn create_user_handler(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<SignupForm>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let Json(form) = payload?;
    let request = CreateUserRequest {
        first_name: form.first_name,
        last_name: form.last_name,
        email: form.email,
        password: form.password,
    };

    let user = app_state.user_service.create_user(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse::new(
            StatusCode::CREATED.as_u16(),
            "User created successfully",
            user,
        )),
    ))
}

pub async fn get_user_handler(
    State(app_state): State<AppState>,
    user_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<UserResponse>> {
    let Path(user_id) = user_id?;
    let user = app_state.user_service.get_user(user_id).await?;

    Ok(Json(UserResponse::new(
        StatusCode::OK.as_u16(),
        "Success!",
        user,
    )))
}
