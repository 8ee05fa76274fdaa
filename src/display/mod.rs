//! Display formatting for terminal output

pub mod budget;
pub mod report;
pub mod transaction;

pub use budget::format_budget_list;
pub use transaction::{format_transaction_details, format_transaction_list, format_transaction_row};
