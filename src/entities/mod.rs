//! SeaORM entities for the stock ledger.
//!
//! `item`, `bin_location`, and `user_account` are master data owned by
//! external services; this crate only reads them for validation and display
//! joins. `inventory_position` and `stock_transaction` are the ledger proper.

pub mod bin_location;
pub mod inventory_position;
pub mod item;
pub mod stock_transaction;
pub mod user_account;
