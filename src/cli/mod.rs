use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::application::IouService;
use crate::domain::{NewTransaction, format_cents, parse_cents};

/// Tally - shared IOU ledger
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "A shared IOU ledger tracking debts between pairs of users")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "ioudb.sqlite")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the tables required for the app
    Init,

    /// Register a new user
    AddUser {
        username: String,
        password: String,
    },

    /// Record an IOU: the borrower owes the lender an amount
    AddIou {
        /// Who owes the money
        borrower: String,

        /// Who is owed the money
        lender: String,

        /// Amount owed (e.g. "12.50"); omit to open a blank IOU
        #[arg(short, long)]
        amount: Option<String>,

        /// Description of the IOU
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Show aggregate statements for a user, one per counterparty
    Ious {
        user: String,
    },

    /// Show the transaction history between two users, most recent first
    History {
        user1: String,
        user2: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                IouService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::AddUser { username, password } => {
                let service = IouService::connect(&self.database).await?;
                let user = service.create_user(&username, &password).await?;
                println!("Registered user: {}", user.username);
            }

            Commands::AddIou {
                borrower,
                lender,
                amount,
                comment,
            } => {
                let service = IouService::connect(&self.database).await?;

                // A blank IOU opens the ledger between two users at zero.
                let amount_cents = amount
                    .map(|a| parse_cents(&a))
                    .transpose()
                    .context("Invalid amount format. Use '12.50' or '12'")?
                    .unwrap_or(0);

                let comment = comment
                    .unwrap_or_else(|| format!("Creating IOU for {} and {}", borrower, lender));
                let timestamp = Utc::now().timestamp();

                let stored = service
                    .add_transactions(vec![NewTransaction::new(
                        &borrower,
                        &lender,
                        amount_cents,
                        timestamp,
                        comment,
                    )])
                    .await?;

                let transaction = &stored[0];
                println!(
                    "Recorded IOU: {} owes {} {} (pair balance now {})",
                    transaction.borrower,
                    transaction.lender,
                    format_cents(transaction.amount),
                    format_cents(transaction.balance)
                );
            }

            Commands::Ious { user } => {
                let service = IouService::connect(&self.database).await?;
                let statements = service.get_ious(&user).await?;

                if statements.is_empty() {
                    println!("No IOUs for {}", user);
                }
                for statement in statements {
                    println!(
                        "{}: owed {} (lent {}, borrowed {})",
                        statement.other_person,
                        format_cents(statement.owed),
                        format_cents(statement.total_owed),
                        format_cents(statement.total_borrowed)
                    );
                }
            }

            Commands::History { user1, user2 } => {
                let service = IouService::connect(&self.database).await?;
                let transactions = service.get_transactions(&user1, &user2).await?;

                if transactions.is_empty() {
                    println!("No transactions between {} and {}", user1, user2);
                }
                for transaction in transactions {
                    let when = DateTime::from_timestamp(transaction.timestamp, 0)
                        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_else(|| transaction.timestamp.to_string());
                    println!(
                        "[{}] {} owes {} {} - {} (balance {})",
                        when,
                        transaction.borrower,
                        transaction.lender,
                        format_cents(transaction.amount),
                        transaction.comment,
                        format_cents(transaction.balance)
                    );
                }
            }
        }

        Ok(())
    }
}
