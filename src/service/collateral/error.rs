//! Error types for collateral generation

use thiserror::Error;

use crate::service::profile::{ParseError, RetryError};

/// Error type for collateral generation
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CollateralError {
    #[error("account has no claims; generate a profile first")]
    NoClaims,

    #[error(transparent)]
    Model(#[from] RetryError),

    #[error("model returned an unusable response: {0}")]
    Parse(#[from] ParseError),

    #[error("generated {kind} is invalid: {reason}")]
    Invalid { kind: &'static str, reason: String },
}
