use thiserror::Error;

use crate::{catalog::CatalogError, config::ConfigError};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn negative_age() -> Self {
        Self::InvalidInput("age cannot be negative".to_owned())
    }
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl ApplicationError {
    /// Stable machine-readable class used in command output envelopes.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::InvalidInput(_)) => "invalid_input",
            Self::Domain(DomainError::InvariantViolation(_)) => "profile_validation",
            Self::Catalog(_) => "catalog",
            Self::Configuration(_) => "config_validation",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Catalog(_) => 3,
            Self::Domain(_) => 4,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(_) => "The pet profile could not be used. Check inputs and try again.",
            Self::Catalog(_) => "The food catalog could not be loaded or queried.",
            Self::Configuration(_) => "The configuration is invalid.",
        }
    }
}
