//! Error types for the organizer application.
//!
//! The collection core is total and never fails. These errors only come from
//! the edges: the storage backend, configuration loading, and the CLI.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the organizer application.
#[derive(Error, Debug)]
pub enum OrganizerError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A storage key that cannot be mapped onto the backend.
    #[error("Invalid storage key: {key}")]
    InvalidKey { key: String },

    /// The backend refused to serve a request.
    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    /// User input rejected at the CLI boundary.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// No record with the given id in the named collection.
    #[error("No {kind} with id {id}")]
    NotFound { kind: &'static str, id: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    #[error("{message}")]
    EditorError { message: String },
}
