//! Unified error types and result handling.
//!
//! Validation and authorization errors are produced before any write happens.
//! Persistence failures of any kind collapse into [`Error::StoreUnavailable`].

use crate::entities::ShareStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Permission denied: cannot {operation} {entity}")]
    PermissionDenied {
        operation: &'static str,
        entity: String,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Shares add up to {shares_total:.2} but the expense total is {total:.2}")]
    AmountMismatch { total: f64, shares_total: f64 },

    #[error("Share {share_id} is already {current} and cannot change again")]
    InvalidStateTransition {
        share_id: i64,
        current: ShareStatus,
    },

    #[error("Invalid input: {message}")]
    Validation { message: String },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn permission_denied(operation: &'static str, entity: impl Into<String>) -> Self {
        Self::PermissionDenied {
            operation,
            entity: entity.into(),
        }
    }
}

impl From<sea_orm::DbErr> for Error {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::StoreUnavailable(value.to_string())
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
