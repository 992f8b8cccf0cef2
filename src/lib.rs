pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::geo::IbgeCatalog;
pub use adapters::storage::JsonFileStorage;
pub use config::{CascadeVariant, CliConfig};
pub use core::session::Session;
pub use utils::error::{ColetorError, Result};
