//! Error types for profile generation

use std::fmt;

use thiserror::Error;

use super::parser::ParseError;
use super::retry::RetryError;
use super::validation::ValidationError;

/// Pipeline stage an error originated in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Sources,
    Model,
    Parse,
    Validation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Sources => "sources",
            Stage::Model => "model",
            Stage::Parse => "parse",
            Stage::Validation => "validation",
        };
        f.write_str(name)
    }
}

/// Error type for profile generation
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileGenerationError {
    #[error("no successfully fetched sources for this account; fetch sources first")]
    NoSources,

    #[error("at most {max} extra URLs are allowed, got {given}")]
    TooManyExtraUrls { given: usize, max: usize },

    #[error(transparent)]
    Model(#[from] RetryError),

    #[error("model returned an unusable response: {0}")]
    Parse(#[from] ParseError),

    #[error("{}", describe_validation(.index, .source))]
    Validation {
        /// Position of the offending claim; `None` for profile-level fields
        index: Option<usize>,
        source: ValidationError,
    },
}

impl ProfileGenerationError {
    pub fn stage(&self) -> Stage {
        match self {
            ProfileGenerationError::NoSources
            | ProfileGenerationError::TooManyExtraUrls { .. } => Stage::Sources,
            ProfileGenerationError::Model(_) => Stage::Model,
            ProfileGenerationError::Parse(_) => Stage::Parse,
            ProfileGenerationError::Validation { .. } => Stage::Validation,
        }
    }

    pub(crate) fn profile_field(source: ValidationError) -> Self {
        ProfileGenerationError::Validation {
            index: None,
            source,
        }
    }

    pub(crate) fn claim(index: usize, source: ValidationError) -> Self {
        ProfileGenerationError::Validation {
            index: Some(index),
            source,
        }
    }
}

fn describe_validation(index: &Option<usize>, source: &ValidationError) -> String {
    match index {
        Some(i) => format!("claim {} failed validation: {}", i + 1, source),
        None => format!("profile failed validation: {}", source),
    }
}
