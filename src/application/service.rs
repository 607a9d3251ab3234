use crate::domain::{NewTransaction, Statement, Transaction, User};
use crate::storage::Repository;

use super::{AppError, auth};

/// Application service providing high-level operations for the IOU ledger.
/// This is the primary interface for any client (web layer, CLI, tests).
pub struct IouService {
    repo: Repository,
}

impl IouService {
    /// Create a new service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path (created if missing).
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Create the schema if it does not exist yet. Safe to call repeatedly;
    /// an existing schema is left untouched with a warning.
    pub async fn create_tables(&self) -> Result<(), AppError> {
        Ok(self.repo.migrate().await?)
    }

    // ========================
    // User operations
    // ========================

    /// Register a new user with a hashed credential. Fails with
    /// `DuplicateUsername` if the username is taken; failure leaves no
    /// partial state.
    pub async fn create_user(&self, username: &str, password: &str) -> Result<User, AppError> {
        let user = User::new(username, auth::hash_password(password)?);
        self.repo.create_user(&user).await?;
        Ok(user)
    }

    /// Whether (username, password) is a valid login. Unknown usernames
    /// return false rather than an error, so callers cannot distinguish a
    /// missing account from a wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool, AppError> {
        match self.repo.password_hash_for(username).await? {
            Some(hash) => auth::verify_password(password, &hash),
            None => Ok(false),
        }
    }

    // ========================
    // Ledger operations
    // ========================

    /// Record a batch of transactions atomically, in list order, computing
    /// each row's running balance. Either the whole batch commits or none of
    /// it does; an unknown username anywhere in the batch rejects it all with
    /// `InvalidUser`.
    pub async fn add_transactions(
        &self,
        batch: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, AppError> {
        let stored = self.repo.insert_transactions(&batch).await?;
        tracing::debug!(count = stored.len(), "committed transaction batch");
        Ok(stored)
    }

    /// Aggregate statements for `user`, one per counterparty with at least
    /// one transaction. Order is unspecified.
    pub async fn get_ious(&self, user: &str) -> Result<Vec<Statement>, AppError> {
        Ok(self.repo.statements_for(user).await?)
    }

    /// Transaction history between two users, most recent first. Symmetric
    /// in its arguments.
    pub async fn get_transactions(
        &self,
        user1: &str,
        user2: &str,
    ) -> Result<Vec<Transaction>, AppError> {
        Ok(self.repo.transactions_between(user1, user2).await?)
    }
}
