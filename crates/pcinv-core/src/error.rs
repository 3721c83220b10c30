//! Core error types for pcinv-core

use thiserror::Error;

/// Errors that end a run
///
/// API failures are not here: they travel as data inside the output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A required setting has no value in any layer
    #[error(
        "could not find a value for PrismCentral {key}; it must be set in the ini file, \
         with {flag}, or with the {env} environment variable"
    )]
    MissingConfig {
        /// Setting name
        key: &'static str,
        /// Command-line flag supplying it
        flag: &'static str,
        /// Environment variable supplying it
        env: &'static str,
    },

    /// A setting is present but unusable
    #[error("invalid value for {key}: {reason}")]
    InvalidConfig {
        /// Setting name
        key: String,
        /// What is wrong with it
        reason: String,
    },

    /// Configuration file could not be read or parsed
    #[error("cannot read configuration file {path}: {reason}")]
    ConfigFile {
        /// File path
        path: String,
        /// Underlying error
        reason: String,
    },

    /// `--force-cache` with no cache file on disk
    #[error("cache file {0} does not exist and --force-cache was specified")]
    ForceCacheMissing(String),

    /// `--force-cache` with a cache holding no data
    #[error("cache is empty and --force-cache was specified")]
    ForceCacheEmpty,

    /// Cache file could not be written
    #[error("cannot write cache file: {0}")]
    CacheWrite(String),

    /// Search returned no match for the host
    #[error("no VM matches host {0}")]
    HostNotFound(String),

    /// Search request failed or returned an unexpected shape
    #[error("lookup of host {host} failed: {reason}")]
    Lookup {
        /// Requested host
        host: String,
        /// Failure description
        reason: String,
    },
}
