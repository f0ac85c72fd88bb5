//! Configuration adapters: the TOML schema and its loader.

pub mod file_config;
pub mod loader;

pub use file_config::{CatalogSection, FileConfig, GameSection};
pub use loader::ConfigLoader;
