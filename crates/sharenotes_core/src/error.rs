//! Application error types for core storage and domain logic.
use crate::snowflake::SnowflakeError;
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Storage error: {0}")]
    StorageMessage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Id generation failed: {0}")]
    IdGeneration(#[from] SnowflakeError),

    /// A freshly minted token or id already exists in storage. This only
    /// happens when two live generators share a worker id.
    #[error("Token collision on '{token}' (snowflake id {id})")]
    TokenCollision { token: String, id: u64 },

    #[error("Not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<redb::DatabaseError> for AppError {
    fn from(value: redb::DatabaseError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TransactionError> for AppError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TableError> for AppError {
    fn from(value: redb::TableError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::StorageError> for AppError {
    fn from(value: redb::StorageError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::CommitError> for AppError {
    fn from(value: redb::CommitError) -> Self {
        Self::Database(value.into())
    }
}
