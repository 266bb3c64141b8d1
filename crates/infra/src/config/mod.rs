//! Configuration loading
//!
//! Environment variables (optionally seeded from `.env`) with a fallback to
//! a `config.toml` / `config.json` file.

pub mod loader;

pub use loader::{build_family_map, load, load_from_env, load_from_file, probe_config_paths};
