pub mod analysis;
pub mod auth_service;
pub mod token_service;
pub mod user_service;

pub use analysis::{DataAnalysisService, OutputFormat, UploadedFile};
pub use auth_service::AuthService;
pub use token_service::TokenService;
pub use user_service::UserService;
