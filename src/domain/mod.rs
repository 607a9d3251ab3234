mod ledger;
mod money;
mod statement;
mod transaction;
mod user;

pub use ledger::*;
pub use money::*;
pub use statement::*;
pub use transaction::*;
pub use user::*;
