//! Stable exit codes for gradebook CLI commands.

use crate::core::error::RosterError;
use crate::io::roster_store::StoreError;

/// Command succeeded.
pub const OK: i32 = 0;
/// I/O or configuration failure.
pub const FAILED: i32 = 1;
/// Command-line usage error (reported by clap).
pub const USAGE: i32 = 2;
/// A roster operation was rejected by validation.
pub const REJECTED: i32 = 3;
/// The data file is missing or malformed.
pub const DATA: i32 = 4;

/// Pick the exit code for an error returned by a command.
pub fn for_error(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.downcast_ref::<RosterError>().is_some() {
            return REJECTED;
        }
        if let Some(store) = cause.downcast_ref::<StoreError>() {
            return match store {
                StoreError::FileNotFound(_) | StoreError::MalformedData { .. } => DATA,
                StoreError::Rejected(_) => REJECTED,
                StoreError::Io { .. } => FAILED,
            };
        }
    }
    FAILED
}

/// Error kind name shown to users, when the error has one.
pub fn kind_of(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(roster) = cause.downcast_ref::<RosterError>() {
            return Some(roster.kind());
        }
        cause.downcast_ref::<StoreError>().map(StoreError::kind)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn roster_errors_are_rejections_even_with_context() {
        let err = Err::<(), _>(RosterError::StudentNotFound(4))
            .context("record grade")
            .expect_err("error");
        assert_eq!(for_error(&err), REJECTED);
        assert_eq!(kind_of(&err), Some("StudentNotFound"));
    }

    #[test]
    fn store_errors_map_by_kind() {
        let missing = anyhow::Error::new(StoreError::FileNotFound(PathBuf::from("x.json")));
        assert_eq!(for_error(&missing), DATA);
        assert_eq!(kind_of(&missing), Some("FileNotFound"));

        let rejected =
            anyhow::Error::new(StoreError::Rejected(RosterError::InconsistentSnapshot(vec![])));
        assert_eq!(for_error(&rejected), REJECTED);
        assert_eq!(kind_of(&rejected), Some("InconsistentSnapshot"));

        let plain = anyhow::anyhow!("boom");
        assert_eq!(for_error(&plain), FAILED);
        assert_eq!(kind_of(&plain), None);
    }
}
