//! Deterministic, pure grade-record logic.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return typed results suitable for tests.

pub mod catalog;
pub mod error;
pub mod roster;
pub mod snapshot;
pub mod student;
pub mod types;
