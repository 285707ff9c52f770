//! Error types for permgroup
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors that are part of the API;
//! the binary wraps them in `anyhow` at the top level.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Permission store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Strict mode: {} parse warning(s)\n{}", .warnings.len(), .warnings.join("\n"))]
    StrictParse { warnings: Vec<String> },
}

/// Errors raised by the permission store
///
/// Every variant is fatal to the call that produced it and leaves the store
/// unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Permission store is already initialized; load with overwrite to replace it")]
    AlreadyInitialized,

    #[error("Permission store is not initialized; load data first")]
    NotInitialized,

    #[error("Group not found: {group}")]
    GroupNotFound { group: String },

    #[error("Player '{player}' is not a member of group '{group}'")]
    PlayerNotFound { player: String, group: String },

    #[error("Group already exists: {group}")]
    GroupAlreadyExists { group: String },

    #[error("Group name must not be empty")]
    EmptyGroupName,
}

impl StoreError {
    pub fn group_not_found(group: impl Into<String>) -> Self {
        Self::GroupNotFound {
            group: group.into(),
        }
    }

    pub fn player_not_found(player: impl Into<String>, group: impl Into<String>) -> Self {
        Self::PlayerNotFound {
            player: player.into(),
            group: group.into(),
        }
    }

    pub fn group_already_exists(group: impl Into<String>) -> Self {
        Self::GroupAlreadyExists {
            group: group.into(),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Failed to read permission file {}: {source}", .path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for permission store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
