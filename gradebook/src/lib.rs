//! Student and course grade records.
//!
//! The crate keeps an in-memory roster of students and a course catalog,
//! validates every mutation, computes credit-weighted averages, and persists
//! the whole state to a JSON document:
//!
//! - **[`core`]**: Pure, deterministic logic (catalog, student records, roster,
//!   snapshots). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (codec, atomic file writes, config).
//!
//! [`commands`] coordinates core logic with I/O to implement CLI commands.

pub mod commands;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::core::catalog::{Course, CourseCatalog};
pub use crate::core::error::RosterError;
pub use crate::core::roster::{GradeLine, Roster, StudentReport};
pub use crate::core::snapshot::{Snapshot, check_snapshot};
pub use crate::core::student::StudentRecord;
pub use crate::core::types::{CourseId, OrphanPolicy, Score, StudentId};
pub use crate::io::roster_store::{StoreError, load_roster, save_roster};
