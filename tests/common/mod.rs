// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use tally::application::IouService;
use tally::domain::NewTransaction;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(IouService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = IouService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Register a set of users with a throwaway password
pub async fn register_users(service: &IouService, usernames: &[&str]) -> Result<()> {
    for username in usernames {
        service.create_user(username, "pass").await?;
    }
    Ok(())
}

/// Shorthand for building a transaction record
pub fn iou(borrower: &str, lender: &str, amount: i64, timestamp: i64) -> NewTransaction {
    NewTransaction::new(borrower, lender, amount, timestamp, "comment")
}
