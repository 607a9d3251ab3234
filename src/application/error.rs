use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("Invalid username in list of transactions: {0}")]
    InvalidUser(String),

    #[error("Credential hashing failed: {0}")]
    Credential(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
