//! Filesystem rule loader.
//!
//! Reads every `*.yml` / `*.yaml` file directly inside the rules directory and
//! concatenates their rule sequences in file-name order. The daemon reloads the
//! directory at the start of every evaluation cycle.

mod core;
mod error;


pub use self::core::RuleLoader;
pub use self::error::LoadError;
