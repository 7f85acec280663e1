//! Error types for the ledger core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Transaction validation failed: {0}")]
    TransactionValidation(String),

    #[error("Block validation failed: {0}")]
    BlockValidation(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
