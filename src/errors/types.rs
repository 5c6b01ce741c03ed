//! # Error Types
//!
//! Error types for KV secret gauge collection using `thiserror`.
//!
//! Errors are classified by how far their blast radius reaches inside one
//! collection tick: the whole tick, one namespace, or one mount. Cancellation
//! and the tick deadline are not errors; they surface as cancelled walks.

/// Custom result type for collection operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for KV secret gauge collection
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// The namespace tree could not be read; aborts the whole tick
    #[error("Namespace source unavailable: {message}")]
    NamespaceSource { message: String },

    /// The mount table of one namespace could not be read
    #[error("Mount table unavailable for namespace '{namespace}': {message}")]
    MountTable { namespace: String, message: String },

    /// A list call failed while walking a mount
    #[error("Storage list failed for mount '{mount_point}' at '{key}': {message}")]
    Storage { mount_point: String, key: String, message: String },

    /// The mount no longer routes to a backend (removed between enumeration and walk)
    #[error("Unsupported path for mount '{mount_point}' at '{key}'")]
    UnsupportedPath { mount_point: String, key: String },

    /// Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Create a namespace source error
    pub fn namespace_source<S: Into<String>>(message: S) -> Self {
        Self::NamespaceSource { message: message.into() }
    }

    /// Create a mount table error scoped to one namespace
    pub fn mount_table<N: Into<String>, S: Into<String>>(namespace: N, message: S) -> Self {
        Self::MountTable { namespace: namespace.into(), message: message.into() }
    }

    /// Create a storage list error
    pub fn storage<M: Into<String>, K: Into<String>, S: Into<String>>(
        mount_point: M,
        key: K,
        message: S,
    ) -> Self {
        Self::Storage { mount_point: mount_point.into(), key: key.into(), message: message.into() }
    }

    /// Create an unsupported path error
    pub fn unsupported_path<M: Into<String>, K: Into<String>>(mount_point: M, key: K) -> Self {
        Self::UnsupportedPath { mount_point: mount_point.into(), key: key.into() }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Short label for structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config",
            Error::Validation { .. } => "validation",
            Error::NamespaceSource { .. } => "namespace_source",
            Error::MountTable { .. } => "mount_table",
            Error::Storage { .. } => "storage",
            Error::UnsupportedPath { .. } => "unsupported_path",
            Error::Internal { .. } => "internal",
        }
    }

    /// Whether this error aborts an entire collection tick.
    ///
    /// Only an unreadable namespace tree does; mount-table and storage
    /// failures are absorbed into metrics and logs.
    pub fn is_fatal_to_tick(&self) -> bool {
        matches!(self, Error::NamespaceSource { .. })
    }

    /// Whether the failing mount most likely disappeared mid-walk
    pub fn is_unsupported_path(&self) -> bool {
        matches!(self, Error::UnsupportedPath { .. })
    }
}

impl From<config::ConfigError> for Error {
    fn from(error: config::ConfigError) -> Self {
        Self::config_with_source("Configuration loading failed", Box::new(error))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(format!("Validation failed: {}", message))
    }
}
