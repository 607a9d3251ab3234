mod common;

use anyhow::Result;
use common::test_service;
use tally::application::AppError;

#[tokio::test]
async fn test_user_auth() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.create_user("joe", "password123").await?;

    assert!(!service.authenticate("nonexistent", "pass").await?);
    assert!(!service.authenticate("joe", "wrong_password").await?);
    assert!(service.authenticate("joe", "password123").await?);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_user() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.create_user("joe", "password123").await?;

    let err = service.create_user("joe", "p").await.unwrap_err();
    assert!(matches!(err, AppError::DuplicateUsername(ref name) if name == "joe"));

    // The first registration is unaffected by the failed second one
    assert!(service.authenticate("joe", "password123").await?);
    assert!(!service.authenticate("joe", "p").await?);

    Ok(())
}

#[tokio::test]
async fn test_stored_credential_is_hashed() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let user = service.create_user("joe", "password123").await?;
    assert_ne!(user.password_hash, "password123");
    assert!(user.password_hash.starts_with("$argon2"));

    Ok(())
}
