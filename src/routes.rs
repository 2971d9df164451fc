use crate::config::{CorsOrigins, Settings};
use crate::handlers;
use crate::AppState;
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the full HTTP surface. `main` and the integration tests share it.
pub fn app(state: AppState, settings: &Settings) -> Router {
    // Flat so both the bare and trailing-slash forms resolve.
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/auth/login", post(handlers::login_handler))
        .route("/api/auth/verify", post(handlers::verify_handler))
        .route("/api/users", post(handlers::create_user_handler))
        .route("/api/users/", post(handlers::create_user_handler))
        .route("/api/users/{id}", get(handlers::get_user_handler))
        .route("/api/data", get(handlers::data_root_handler))
        .route("/api/data/", get(handlers::data_root_handler))
        .route("/api/data/upload-file", post(handlers::upload_file_handler))
        .route(
            "/api/data/get-full-dataset",
            post(handlers::full_dataset_handler),
        )
        .route("/api/data/convert-file", post(handlers::convert_file_handler))
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .layer(middleware::from_fn(add_security_headers))
        .layer(cors_layer(&settings.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    match origins {
        CorsOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsOrigins::List(list) => {
            let origins: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                        None
                    }
                })
                .collect();

            // Credentialed CORS forbids wildcards, so methods and headers are explicit.
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
                .allow_credentials(true)
        }
    }
}

async fn add_security_headers(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}
