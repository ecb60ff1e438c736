//! Framework error type.
//!
//! Sub-crates define their own error enums and either wrap `CoreError` as one
//! variant (see `hm-sim`) or keep it separate when no core call can fail.

use thiserror::Error;

/// The error type for `hm-core` and a common base for sub-crates.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid tag {0:?}: tags must be non-empty and contain no whitespace")]
    InvalidTag(String),
}

/// Shorthand result type for `hm-core`.
pub type CoreResult<T> = Result<T, CoreError>;
