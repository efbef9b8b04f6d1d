//! Tettris (workspace facade crate).
//!
//! The game itself lives in dedicated crates under `crates/`; this package
//! re-exports them as `tettris::{core,input,term,types}` and adds the runtime
//! pieces the binary needs (environment configuration and file logging).

pub mod config;
pub mod logging;

pub use tettris_core as core;
pub use tettris_input as input;
pub use tettris_term as term;
pub use tettris_types as types;
