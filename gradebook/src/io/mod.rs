//! I/O helpers: codec, roster files, and configuration.

pub mod codec;
pub mod config;
pub mod roster_store;
