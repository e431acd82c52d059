//! different utility modules used throughout the project
/// run configuration (round limit, backend, logging) read from TOML
pub mod config;
/// simplelog setup: terminal and/or file sinks
pub mod logger;
