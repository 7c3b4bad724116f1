//! Error types for interface model building and code generation

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("duplicate symbol '{0}' encountered")]
    DuplicateSymbol(String),

    #[error("symbol '{symbol}' refers to '{reference}', which does not name a known value")]
    UnresolvedReference { symbol: String, reference: String },

    #[error("no template for signature '{signature}' (used by '{symbol}')")]
    UnsupportedSignature { symbol: String, signature: String },

    #[error("template placeholder '${placeholder}' has no value in '{template}'")]
    MissingPlaceholder {
        placeholder: String,
        template: String,
    },

    #[error("invalid integer literal '{value}' for '{symbol}'")]
    InvalidValue { symbol: String, value: String },

    #[error("syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("feature '{0}' is declared more than once")]
    DuplicateFeature(String),

    #[error("message number {value} of '{name}' is already in use")]
    DuplicateMessage { name: String, value: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
