use userbase::{
    repositories::user_repository::SqliteUserRepository,
    services::user_service::{CreateUserRequest, UpdateProfileRequest, UserService},
    test_utils::test_helpers,
};
use std::sync::Arc;

#[tokio::test]
async fn test_create_user_success() {
    // Create isolated test database
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool));
    let service = UserService::new(repository);

    let request = CreateUserRequest {
        name: "Toregeldi".to_string(),
        email: "tore@gmail.com".to_string(),
        password: "779977abc".to_string(),
    };

    let result = service.create_user(request).await;
    assert!(result.is_ok());

    let user = result.unwrap();
    assert_eq!(user.name, "Toregeldi");
    assert_eq!(user.email, "tore@gmail.com");
    // Only the digest is persisted
    assert_ne!(user.password_hash, "779977abc");
    assert!(service.verify_password("779977abc", &user.password_hash));
}

#[tokio::test]
async fn test_create_user_duplicate_email() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repository);

    let request1 = CreateUserRequest {
        name: "First".to_string(),
        email: "duplicate@example.com".to_string(),
        password: "red1234!".to_string(),
    };

    let result1 = service.create_user(request1).await;
    assert!(result1.is_ok());

    // Same address, different case: normalization makes them collide
    let request2 = CreateUserRequest {
        name: "Second".to_string(),
        email: "Duplicate@Example.com".to_string(),
        password: "blue5678!".to_string(),
    };

    let result2 = service.create_user(request2).await;
    assert!(result2.is_err());
    assert!(matches!(
        result2.unwrap_err(),
        userbase::services::user_service::UserServiceError::EmailTaken
    ));
}

#[tokio::test]
async fn test_update_profile_name() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repository);

    let user = service
        .create_user(CreateUserRequest {
            name: "Toregeldi".to_string(),
            email: "rename@example.com".to_string(),
            password: "red1234!".to_string(),
        })
        .await
        .unwrap();

    let updated = service
        .update_profile(
            user.id,
            UpdateProfileRequest {
                name: Some("Aigul".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Aigul");
    assert_eq!(updated.email, "rename@example.com");
}

#[tokio::test]
async fn test_update_profile_email_duplicate() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repository);

    service
        .create_user(CreateUserRequest {
            name: "First".to_string(),
            email: "user1@example.com".to_string(),
            password: "red1234!".to_string(),
        })
        .await
        .unwrap();

    let user2 = service
        .create_user(CreateUserRequest {
            name: "Second".to_string(),
            email: "user2@example.com".to_string(),
            password: "red1234!".to_string(),
        })
        .await
        .unwrap();

    let result = service
        .update_profile(
            user2.id,
            UpdateProfileRequest {
                email: Some("user1@example.com".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(result.is_err());
    assert!(matches!(
        result.unwrap_err(),
        userbase::services::user_service::UserServiceError::EmailTaken
    ));

    // Record unchanged
    let unchanged = service.find_user_by_id(user2.id).await.unwrap().unwrap();
    assert_eq!(unchanged.email, "user2@example.com");
}

#[tokio::test]
async fn test_update_profile_keeping_own_email_is_allowed() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repository);

    let user = service
        .create_user(CreateUserRequest {
            name: "Same".to_string(),
            email: "same@example.com".to_string(),
            password: "red1234!".to_string(),
        })
        .await
        .unwrap();

    let result = service
        .update_profile(
            user.id,
            UpdateProfileRequest {
                email: Some("same@example.com".to_string()),
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().name, "Renamed");
}

#[tokio::test]
async fn test_update_profile_password() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repository);

    let user = service
        .create_user(CreateUserRequest {
            name: "Pass".to_string(),
            email: "pass@example.com".to_string(),
            password: "oldsecret1".to_string(),
        })
        .await
        .unwrap();

    service
        .update_profile(
            user.id,
            UpdateProfileRequest {
                password: Some("newsecret2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let updated = service.find_user_by_id(user.id).await.unwrap().unwrap();
    assert!(service.verify_password("newsecret2", &updated.password_hash));
    assert!(!service.verify_password("oldsecret1", &updated.password_hash));
}

#[tokio::test]
async fn test_delete_user() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repository);

    let user = service
        .create_user(CreateUserRequest {
            name: "Doomed".to_string(),
            email: "delete_me@example.com".to_string(),
            password: "red1234!".to_string(),
        })
        .await
        .unwrap();

    let result = service.delete_user(user.id).await;
    assert!(result.is_ok());

    // Lookup by the former id returns absent
    let find_result = service.find_user_by_id(user.id).await.unwrap();
    assert!(find_result.is_none());
}

#[tokio::test]
async fn test_avatar_roundtrip() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repository);

    let user = service
        .create_user(CreateUserRequest {
            name: "Pic".to_string(),
            email: "pic@example.com".to_string(),
            password: "red1234!".to_string(),
        })
        .await
        .unwrap();

    assert!(service.get_avatar(user.id).await.unwrap().is_none());

    let bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3, 4, 5];
    service
        .set_avatar(user.id, &bytes, "image/jpeg")
        .await
        .unwrap();

    let (stored, mime) = service.get_avatar(user.id).await.unwrap().unwrap();
    assert_eq!(stored, bytes);
    assert_eq!(mime, "image/jpeg");

    service.clear_avatar(user.id).await.unwrap();
    assert!(service.get_avatar(user.id).await.unwrap().is_none());
}
