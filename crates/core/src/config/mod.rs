//! Configuration loading and schema definitions
//!
//! Settings come from a TOML file (`rutekita.toml`, `.rutekita.toml`, or
//! `<config dir>/rutekita/config.toml`) layered over built-in defaults.
//! Client settings are further layered over the environment.

mod loader;
mod schema;

pub use loader::AppConfig;
pub use schema::*;
