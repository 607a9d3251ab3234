use serde::{Deserialize, Serialize};

use super::Cents;

/// Derived per-counterparty aggregate over all transactions between two
/// users, from `user`'s perspective. Never persisted; recomputed on every
/// query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub user: String,
    pub other_person: String,
    /// Net amount `other_person` owes `user`; negative means `user` owes them.
    pub owed: Cents,
    /// Total `user` lent to `other_person`.
    pub total_owed: Cents,
    /// Total `user` borrowed from `other_person`.
    pub total_borrowed: Cents,
}
