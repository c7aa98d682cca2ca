//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML configuration file from the
//! platform config directory, falls back to defaults when no file exists,
//! and writes a file back for `--print-config` and tests.

pub mod config;
