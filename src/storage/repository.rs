use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};

use crate::application::AppError;
use crate::domain::{Cents, NewTransaction, RunningBalances, Statement, Transaction, User};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting and querying users and IOU transactions.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Create the schema. Idempotent: if the tables already exist this is a
    /// no-op that logs a warning and leaves existing data untouched.
    pub async fn migrate(&self) -> Result<()> {
        let existing: Option<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'user'",
        )
        .fetch_optional(&self.pool)
        .await
        .context("Failed to inspect schema")?;

        if existing.is_some() {
            tracing::warn!("schema already exists, leaving tables untouched");
            return Ok(());
        }

        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // User operations
    // ========================

    /// Save a new user. The primary key is the source of truth for
    /// uniqueness; a violation maps to `DuplicateUsername` and leaves no
    /// partial state.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let result = sqlx::query("INSERT INTO user (username, password_hash) VALUES (?, ?)")
            .bind(&user.username)
            .bind(&user.password_hash)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AppError::DuplicateUsername(user.username.clone()))
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context("Failed to save user")
                .into()),
        }
    }

    /// Get the stored password hash for a username, if the user exists.
    pub async fn password_hash_for(&self, username: &str) -> Result<Option<String>> {
        sqlx::query_scalar("SELECT password_hash FROM user WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch password hash")
    }

    // ========================
    // Transaction operations
    // ========================

    /// Insert a batch of transactions atomically, computing each row's
    /// running balance in batch order.
    ///
    /// The whole batch - existence checks, prior-balance reads, and inserts -
    /// runs inside one database transaction. That makes the batch
    /// all-or-nothing and serializes competing batches touching the same
    /// pair, so a concurrent writer cannot slip between the balance read and
    /// the insert. Pairs already touched by this batch reuse the carried
    /// in-memory balance; only first-touch pairs hit the store.
    pub async fn insert_transactions(
        &self,
        batch: &[NewTransaction],
    ) -> Result<Vec<Transaction>, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let mut carried = RunningBalances::new();
        let mut stored = Vec::with_capacity(batch.len());

        for record in batch {
            for name in [&record.borrower, &record.lender] {
                let known: Option<i64> = sqlx::query_scalar("SELECT 1 FROM user WHERE username = ?")
                    .bind(name)
                    .fetch_optional(&mut *tx)
                    .await
                    .context("Failed to check user existence")?;
                if known.is_none() {
                    return Err(AppError::InvalidUser(name.clone()));
                }
            }

            let pair = record.pair();
            if !carried.contains(&pair) {
                let prior = sqlx::query(
                    r#"
                    SELECT lender, balance FROM iou_transaction
                    WHERE (borrower = ? AND lender = ?) OR (borrower = ? AND lender = ?)
                    ORDER BY timestamp DESC, id DESC
                    LIMIT 1
                    "#,
                )
                .bind(&record.borrower)
                .bind(&record.lender)
                .bind(&record.lender)
                .bind(&record.borrower)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to fetch prior balance")?;

                if let Some(row) = prior {
                    let lender: String = row.get("lender");
                    let balance: Cents = row.get("balance");
                    carried.seed(pair.clone(), &lender, balance);
                }
            }

            let balance = carried.apply(&pair, &record.lender, record.amount);

            let result = sqlx::query(
                r#"
                INSERT INTO iou_transaction (borrower, lender, amount, timestamp, comment, balance)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&record.borrower)
            .bind(&record.lender)
            .bind(record.amount)
            .bind(record.timestamp)
            .bind(&record.comment)
            .bind(balance)
            .execute(&mut *tx)
            .await;

            // Early returns drop `tx`, rolling back everything inserted so far.
            let id = match result {
                Ok(done) => done.last_insert_rowid(),
                Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                    return Err(AppError::InvalidUser(record.borrower.clone()));
                }
                Err(e) => {
                    return Err(anyhow::Error::new(e)
                        .context("Failed to insert transaction")
                        .into());
                }
            };

            stored.push(Transaction {
                id,
                borrower: record.borrower.clone(),
                lender: record.lender.clone(),
                amount: record.amount,
                timestamp: record.timestamp,
                comment: record.comment.clone(),
                balance,
            });
        }

        tx.commit()
            .await
            .context("Failed to commit transaction batch")?;

        Ok(stored)
    }

    /// All transactions between the unordered pair {user1, user2}, most
    /// recent first. Symmetric in its arguments: the WHERE clause and
    /// ordering are independent of which user is named first.
    pub async fn transactions_between(
        &self,
        user1: &str,
        user2: &str,
    ) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, borrower, lender, amount, timestamp, comment, balance
            FROM iou_transaction
            WHERE (borrower = ? AND lender = ?) OR (borrower = ? AND lender = ?)
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .bind(user1)
        .bind(user2)
        .bind(user2)
        .bind(user1)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions for pair")?;

        Ok(rows.iter().map(Self::row_to_transaction).collect())
    }

    /// One aggregate statement per counterparty of `user`, computed in a
    /// single grouped query. Iteration order is unspecified.
    pub async fn statements_for(&self, user: &str) -> Result<Vec<Statement>> {
        let rows = sqlx::query(
            r#"
            SELECT
                other_person,
                SUM(amount_owed) AS owed,
                SUM(amount_lent) AS total_owed,
                SUM(amount_borrowed) AS total_borrowed
            FROM (
                SELECT
                    (CASE borrower WHEN ? THEN lender ELSE borrower END) AS other_person,
                    amount * (CASE lender WHEN ? THEN 1 ELSE -1 END) AS amount_owed,
                    (CASE lender WHEN ? THEN amount ELSE 0 END) AS amount_lent,
                    (CASE borrower WHEN ? THEN amount ELSE 0 END) AS amount_borrowed
                FROM iou_transaction
                WHERE borrower = ? OR lender = ?
            )
            GROUP BY other_person
            "#,
        )
        .bind(user)
        .bind(user)
        .bind(user)
        .bind(user)
        .bind(user)
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .context("Failed to aggregate statements")?;

        Ok(rows
            .iter()
            .map(|row| Statement {
                user: user.to_string(),
                other_person: row.get("other_person"),
                owed: row.get("owed"),
                total_owed: row.get("total_owed"),
                total_borrowed: row.get("total_borrowed"),
            })
            .collect())
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Transaction {
        Transaction {
            id: row.get("id"),
            borrower: row.get("borrower"),
            lender: row.get("lender"),
            amount: row.get("amount"),
            timestamp: row.get("timestamp"),
            comment: row.get("comment"),
            balance: row.get("balance"),
        }
    }
}
