use serde::{Deserialize, Serialize};

use super::Cents;

/// A stored IOU: `borrower` owes `lender` `amount`.
/// Transactions are immutable and append-only - never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub borrower: String,
    pub lender: String,
    /// Amount in cents
    pub amount: Cents,
    /// Unix timestamp, used for ordering (not necessarily unique)
    pub timestamp: i64,
    /// Free-text description
    pub comment: String,
    /// Running total for the unordered pair as of and including this row,
    /// signed relative to this row's lender (positive = borrower owes lender).
    pub balance: Cents,
}

impl Transaction {
    /// The unordered pair of users this transaction belongs to.
    pub fn pair(&self) -> PairKey {
        PairKey::new(&self.borrower, &self.lender)
    }
}

/// Caller input shape for a transaction to be recorded. The id and running
/// balance are assigned by the repository on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub borrower: String,
    pub lender: String,
    pub amount: Cents,
    pub timestamp: i64,
    pub comment: String,
}

impl NewTransaction {
    pub fn new(
        borrower: impl Into<String>,
        lender: impl Into<String>,
        amount: Cents,
        timestamp: i64,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            borrower: borrower.into(),
            lender: lender.into(),
            amount,
            timestamp,
            comment: comment.into(),
        }
    }

    pub fn pair(&self) -> PairKey {
        PairKey::new(&self.borrower, &self.lender)
    }
}

/// Canonical identifier for an unordered pair of users: (a, b) and (b, a)
/// name the same ledger. Usernames are kept in lexicographic order so the
/// key - and any balance normalized against it - is independent of who
/// happened to be borrower or lender in a given row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey(String, String);

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_string(), b.to_string())
        } else {
            Self(b.to_string(), a.to_string())
        }
    }

    /// The lexicographically first username of the pair. Canonical balances
    /// are signed as if this user were the lender.
    pub fn first(&self) -> &str {
        &self.0
    }

    pub fn second(&self) -> &str {
        &self.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_unordered() {
        assert_eq!(PairKey::new("john", "paul"), PairKey::new("paul", "john"));
        assert_eq!(PairKey::new("john", "paul").first(), "john");
        assert_eq!(PairKey::new("paul", "john").second(), "paul");
    }

    #[test]
    fn test_pair_key_allows_self_pair() {
        let pair = PairKey::new("joe", "joe");
        assert_eq!(pair.first(), "joe");
        assert_eq!(pair.second(), "joe");
    }

    #[test]
    fn test_transaction_pair_ignores_roles() {
        let a = NewTransaction::new("john", "paul", 1000, 100, "lunch");
        let b = NewTransaction::new("paul", "john", 500, 101, "coffee");
        assert_eq!(a.pair(), b.pair());
    }
}
