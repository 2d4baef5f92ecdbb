use crate::types::FlavorName;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FlavorError>;

/// Coarse classification of a [`FlavorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Parse,
    Communication,
    Timeout,
    InvalidArgument,
    Configuration,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlavorError {
    #[error("{flavor}: cannot parse {what} {input:?}: {reason}")]
    Parse {
        flavor: FlavorName,
        what: &'static str,
        input: String,
        reason: String,
    },

    #[error("{flavor}: {operation} failed: {message}")]
    Communication {
        flavor: FlavorName,
        operation: &'static str,
        message: String,
    },

    #[error("{flavor}: timed out after {timeout:?} waiting for position {target}")]
    Timeout {
        flavor: FlavorName,
        target: String,
        timeout: Duration,
    },

    #[error("{flavor}: {operation} was given a value produced by flavor {found}")]
    InvalidArgument {
        flavor: FlavorName,
        operation: &'static str,
        found: FlavorName,
    },

    #[error("MySQL flavor is set to unknown value {requested:?} (known flavors: {known:?})")]
    UnknownFlavor {
        requested: FlavorName,
        known: Vec<FlavorName>,
    },

    #[error("MySQL flavor is not set and cannot be inferred (known flavors: {known:?})")]
    AmbiguousFlavor { known: Vec<FlavorName> },

    #[error("MySQL flavor {0:?} is already registered")]
    DuplicateFlavor(FlavorName),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FlavorError {
    pub fn parse(
        flavor: impl Into<FlavorName>,
        what: &'static str,
        input: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FlavorError::Parse {
            flavor: flavor.into(),
            what,
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Wraps a transport failure from a server or stream handle.
    pub fn communication(
        flavor: impl Into<FlavorName>,
        operation: &'static str,
        cause: &std::io::Error,
    ) -> Self {
        FlavorError::Communication {
            flavor: flavor.into(),
            operation,
            message: cause.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FlavorError::Parse { .. } => ErrorKind::Parse,
            FlavorError::Communication { .. } => ErrorKind::Communication,
            FlavorError::Timeout { .. } => ErrorKind::Timeout,
            FlavorError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            FlavorError::UnknownFlavor { .. }
            | FlavorError::AmbiguousFlavor { .. }
            | FlavorError::DuplicateFlavor(_)
            | FlavorError::Config(_)
            | FlavorError::InvalidConfig(_) => ErrorKind::Configuration,
        }
    }

    /// Configuration errors leave the process without a usable flavor; every
    /// other kind is left to the caller to retry or escalate.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}
