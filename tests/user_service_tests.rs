use datalens::{
    db,
    repositories::user_repository::SqliteUserRepository,
    services::user_service::{CreateUserRequest, UserService, UserServiceError},
    test_utils::test_helpers,
};
use std::sync::Arc;

fn signup(email: &str, password: &str) -> CreateUserRequest {
    CreateUserRequest {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_create_user_success() {
    // Create isolated test database
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool));
    let service = UserService::new(repository);

    let user = service
        .create_user(signup("test@example.com", "password123"))
        .await
        .unwrap();

    assert_eq!(user.email, "test@example.com");
    assert_eq!(user.first_name, "Grace");
    assert_ne!(user.password_hash, "password123");
    assert!(user.password_hash.starts_with("$argon2"));
}

#[tokio::test]
async fn test_create_user_duplicate_email() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repository);

    service
        .create_user(signup("duplicate@example.com", "password123"))
        .await
        .unwrap();

    // Try to create second user with same email
    let result = service
        .create_user(signup("duplicate@example.com", "password456"))
        .await;
    assert!(matches!(result, Err(UserServiceError::EmailTaken)));
}

#[tokio::test]
async fn test_create_user_rejects_invalid_input() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = UserService::new(Arc::new(SqliteUserRepository::new(pool)));

    let result = service.create_user(signup("not-an-email", "pw")).await;
    assert!(matches!(result, Err(UserServiceError::InvalidEmail)));

    let result = service.create_user(signup("ok@example.com", "")).await;
    assert!(matches!(result, Err(UserServiceError::EmptyPassword)));

    let mut long_name = signup("ok@example.com", "pw");
    long_name.first_name = "x".repeat(51);
    let result = service.create_user(long_name).await;
    assert!(matches!(result, Err(UserServiceError::InvalidName(_))));

    // Nothing was persisted by the failed attempts
    assert!(service.list_users(None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_user() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = UserService::new(Arc::new(SqliteUserRepository::new(pool)));

    let created = service
        .create_user(signup("find@example.com", "password123"))
        .await
        .unwrap();

    let found = service.get_user(created.id).await.unwrap();
    assert_eq!(found.email, "find@example.com");

    let missing = service.get_user(created.id + 100).await;
    assert!(matches!(missing, Err(UserServiceError::UserNotFound)));
}

#[tokio::test]
async fn test_find_and_list_users() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = UserService::new(Arc::new(SqliteUserRepository::new(pool)));

    for email in ["a@example.com", "b@example.com", "c@example.com"] {
        service.create_user(signup(email, "pw")).await.unwrap();
    }

    let found = service.find_user_by_email("b@example.com").await.unwrap();
    assert!(found.is_some());
    assert!(service
        .find_user_by_email("zzz@example.com")
        .await
        .unwrap()
        .is_none());

    let page = service.list_users(Some(2), Some(1)).await.unwrap();
    let emails: Vec<_> = page.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["b@example.com", "c@example.com"]);
}

#[tokio::test]
async fn test_users_persist_across_pools() {
    let (pool, db_file) = test_helpers::create_test_db_file().await.unwrap();
    let service = UserService::new(Arc::new(SqliteUserRepository::new(pool.clone())));

    let created = service
        .create_user(signup("durable@example.com", "password123"))
        .await
        .unwrap();
    pool.close().await;

    // A fresh pool on the same file sees the committed row
    let database_url = format!("sqlite://{}", db_file.path().display());
    let reopened = db::create_pool(&database_url).await.unwrap();
    db::run_migrations(&reopened).await.unwrap();
    let service = UserService::new(Arc::new(SqliteUserRepository::new(reopened)));

    let found = service.get_user(created.id).await.unwrap();
    assert_eq!(found.email, "durable@example.com");
}
