//! pcinv-core: Run logic for the Prism Central inventory
//!
//! Configuration layering, the cache file, fetch-or-cache decisions, host
//! lookup and the per-mode run that produces the output document.

pub mod cache;
pub mod config;
pub mod error;
pub mod literal;
pub mod loader;
pub mod lookup;
pub mod runner;

pub use cache::{CACHE_FILE_NAME, CacheSnapshot, CacheStore};
pub use config::{Config, Endpoint, PartialConfig, RunOptions};
pub use error::CoreError;
pub use literal::{LiteralError, parse_literal};
pub use loader::{CachePolicy, ResourceLoader, RunContext, Selection};
pub use lookup::lookup_host;
pub use runner::{Mode, Runner};
