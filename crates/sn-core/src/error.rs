//! Core error type.
//!
//! Each `sn-*` crate keeps its own error enum; this one only covers what
//! `sn-core` itself can reject.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `sn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
