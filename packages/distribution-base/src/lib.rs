pub mod accountant;
pub mod error;
pub mod ledger;
pub mod ledger_msg;
pub mod msg;
pub mod schedule;
pub mod types;
