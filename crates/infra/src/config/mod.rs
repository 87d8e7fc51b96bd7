//! Configuration loading
//!
//! Reads [`WriterConfig`](queuesink_domain::WriterConfig) from the
//! environment or from TOML/JSON files.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
