// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::dag::NodeId;

#[derive(Error, Debug)]
pub enum DepgraphError {
    #[error("node must have a non-empty name")]
    EmptyName,

    #[error("node '{0}' cannot depend on itself")]
    SelfDependency(String),

    #[error("node '{dependent}' already depends on '{dependency}'")]
    DuplicateDependency {
        dependent: String,
        dependency: String,
    },

    #[error("results were already applied to node '{0}'")]
    AlreadyResolved(String),

    #[error("circular dependency detected involving node '{0}'")]
    CircularDependency(String),

    #[error("node '{0}' has not been resolved; cannot step")]
    NotResolved(String),

    #[error("node stack is empty")]
    EmptyStack,

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("job '{job}' failed: {source}")]
    JobFailed {
        job: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DepgraphError>;
