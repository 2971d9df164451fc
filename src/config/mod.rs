pub mod settings;

pub use settings::{ConfigError, CorsOrigins, JwtSettings, Settings, DEFAULT_MAX_UPLOAD_BYTES};
