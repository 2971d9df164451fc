pub mod auth_handlers;
pub mod data_handlers;
pub mod user_handlers;

pub use auth_handlers::{login_handler, verify_handler};
pub use data_handlers::{
    convert_file_handler, data_root_handler, full_dataset_handler, upload_file_handler,
};
pub use user_handlers::{create_user_handler, get_user_handler};

use axum::Json;
use serde_json::{json, Value};

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
