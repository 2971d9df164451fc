pub mod test_helpers {
    use crate::config::{CorsOrigins, JwtSettings, Settings, DEFAULT_MAX_UPLOAD_BYTES};
    use crate::AppState;
    use jsonwebtoken::Algorithm;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use tempfile::NamedTempFile;

    pub const TEST_JWT_SECRET: &str = "test-secret-key-for-integration-tests-0123";

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    /// Useful when several connections must see the same data
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;
        let database_url = format!("sqlite://{}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok((pool, temp_file))
    }

    /// Insert a test user with hashed password
    pub async fn insert_test_user(
        pool: &SqlitePool,
        email: &str,
        password: &str,
    ) -> Result<i64, sqlx::Error> {
        let password_hash = crate::services::user_service::hash_password(password).map_err(|e| {
            sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
        })?;

        let result = sqlx::query(
            "INSERT INTO users (first_name, last_name, email, password_hash) VALUES (?, ?, ?, ?)",
        )
        .bind("Test")
        .bind("User")
        .bind(email)
        .bind(password_hash)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub fn test_jwt_settings() -> JwtSettings {
        JwtSettings {
            secret: TEST_JWT_SECRET.to_string(),
            algorithm: Algorithm::HS256,
        }
    }

    pub fn test_settings() -> Settings {
        Settings {
            database_url: "sqlite::memory:".to_string(),
            jwt: test_jwt_settings(),
            cors_origins: CorsOrigins::Any,
            host: [127, 0, 0, 1].into(),
            port: 0,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            environment: "test".to_string(),
        }
    }

    pub fn create_test_state(pool: SqlitePool) -> AppState {
        AppState::new(pool, &test_jwt_settings())
    }
}

// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}
