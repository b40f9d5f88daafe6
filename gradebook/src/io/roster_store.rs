//! Roster load/save checkpoints on disk.
//!
//! Saves go through a temporary sibling file that is flushed, synced and then
//! renamed over the target, so a failed save leaves the previous file intact.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::catalog::CourseCatalog;
use crate::core::error::RosterError;
use crate::core::roster::Roster;
use crate::core::snapshot::{Snapshot, check_snapshot};
use crate::core::types::OrphanPolicy;
use crate::io::codec::{self, CodecError};

/// Errors from loading or saving roster files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("malformed data in {}: {source}", .path.display())]
    MalformedData {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error(transparent)]
    Rejected(#[from] RosterError),

    #[error("{}: I/O error: {message}", .path.display())]
    Io { path: PathBuf, message: String },
}

impl StoreError {
    /// Stable kind name for adapters that surface the specific failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "FileNotFound",
            Self::MalformedData { .. } => "MalformedData",
            Self::Rejected(err) => err.kind(),
            Self::Io { .. } => "Io",
        }
    }

    fn io(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    fn malformed(path: &Path, source: CodecError) -> Self {
        Self::MalformedData {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read and decode a snapshot.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
    debug!(path = %path.display(), "loading roster snapshot");
    let bytes = read_bytes(path)?;
    let snapshot = codec::decode(&bytes).map_err(|err| StoreError::malformed(path, err))?;
    debug!(
        courses = snapshot.catalog.len(),
        students = snapshot.students.len(),
        "roster snapshot loaded"
    );
    Ok(snapshot)
}

/// Load a roster, applying `policy` to the decoded snapshot.
///
/// Under the lenient policy findings are logged and the snapshot is trusted.
pub fn load_roster(path: &Path, policy: OrphanPolicy) -> Result<Roster, StoreError> {
    let snapshot = load_snapshot(path)?;
    if policy == OrphanPolicy::Lenient {
        let findings = check_snapshot(&snapshot);
        if !findings.is_empty() {
            warn!(
                path = %path.display(),
                findings = findings.len(),
                "loaded roster has consistency findings"
            );
        }
    }
    let roster = Roster::from_snapshot(snapshot, policy)?;
    info!(path = %path.display(), students = roster.len(), "roster loaded");
    Ok(roster)
}

/// Encode and atomically write a snapshot, replacing any existing file.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), StoreError> {
    debug!(path = %path.display(), students = snapshot.students.len(), "writing roster snapshot");
    let bytes = codec::encode(snapshot).map_err(|err| StoreError::malformed(path, err))?;
    write_atomic(path, &bytes)
}

/// Save the roster's current state.
pub fn save_roster(path: &Path, roster: &Roster) -> Result<(), StoreError> {
    save_snapshot(path, &roster.export_snapshot())?;
    info!(path = %path.display(), students = roster.len(), "roster saved");
    Ok(())
}

/// Read a standalone catalog document.
pub fn load_catalog(path: &Path) -> Result<CourseCatalog, StoreError> {
    debug!(path = %path.display(), "loading course catalog");
    let bytes = read_bytes(path)?;
    let catalog = codec::decode_catalog(&bytes).map_err(|err| StoreError::malformed(path, err))?;
    debug!(courses = catalog.len(), "course catalog loaded");
    Ok(catalog)
}

/// Atomically write a standalone catalog document.
pub fn save_catalog(path: &Path, catalog: &CourseCatalog) -> Result<(), StoreError> {
    let bytes = codec::encode_catalog(catalog).map_err(|err| StoreError::malformed(path, err))?;
    write_atomic(path, &bytes)
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, StoreError> {
    fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => StoreError::FileNotFound(path.to_path_buf()),
        _ => StoreError::io(path, err),
    })
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
    }

    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> Result<(), StoreError> {
        let mut file = File::create(&tmp_path).map_err(|err| StoreError::io(&tmp_path, err))?;
        file.write_all(contents)
            .map_err(|err| StoreError::io(&tmp_path, err))?;
        file.sync_all().map_err(|err| StoreError::io(&tmp_path, err))?;
        Ok(())
    })();

    if let Err(err) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    fs::rename(&tmp_path, path).map_err(|err| {
        let _ = fs::remove_file(&tmp_path);
        StoreError::io(path, err)
    })
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}", std::process::id()));
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Course;

    fn roster() -> Roster {
        let mut roster = Roster::new(CourseCatalog::default_catalog());
        roster.add_student(1, "Ada").expect("add");
        roster.record_grade(1, 2, 80.0).expect("record");
        roster.record_grade(1, 5, 90.0).expect("record");
        roster
    }

    /// Verifies save → load round-trip preserves the roster.
    #[test]
    fn save_and_load_round_trip() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("roster.json");

        let roster = roster();
        save_roster(&path, &roster).expect("save");
        let loaded = load_roster(&path, OrphanPolicy::Strict).expect("load");
        assert_eq!(loaded, roster);
    }

    #[test]
    fn load_missing_file_is_file_not_found() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = load_roster(&temp.path().join("missing.json"), OrphanPolicy::Lenient)
            .expect_err("missing");
        assert!(matches!(err, StoreError::FileNotFound(_)));
    }

    #[test]
    fn load_garbage_is_malformed() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("roster.json");
        fs::write(&path, "[1, 2, 3]").expect("write fixture");

        let err = load_roster(&path, OrphanPolicy::Lenient).expect_err("malformed");
        assert!(matches!(err, StoreError::MalformedData { .. }));
    }

    #[test]
    fn save_overwrites_and_leaves_no_temp_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("roster.json");

        save_roster(&path, &roster()).expect("first save");
        let mut second = Roster::new(CourseCatalog::default_catalog());
        second.add_student(9, "Zed").expect("add");
        save_roster(&path, &second).expect("second save");

        let contents = fs::read_to_string(&path).expect("read");
        assert!(contents.contains("Zed"));
        assert!(!contents.contains("Ada"));

        let entries: Vec<_> = fs::read_dir(temp.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(entries.len(), 1, "unexpected files: {entries:?}");
    }

    #[test]
    fn failed_save_keeps_previous_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("roster.json");
        save_roster(&path, &roster()).expect("save");
        let before = fs::read(&path).expect("read");

        // A directory where the temp file should go makes the write fail.
        fs::create_dir(tmp_write_path(&path)).expect("block temp path");
        let err = save_roster(&path, &Roster::default()).expect_err("blocked save");
        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(fs::read(&path).expect("read"), before);
    }

    #[test]
    fn strict_load_rejects_orphans_lenient_trusts() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("roster.json");
        let snapshot = Snapshot {
            catalog: CourseCatalog::from_courses(vec![Course::new(1, "One", 1.0)]),
            students: vec![crate::core::student::StudentRecord::with_grades(
                1,
                "Ada",
                [(1, 70.0), (2, 90.0)],
            )],
        };
        save_snapshot(&path, &snapshot).expect("save");

        let err = load_roster(&path, OrphanPolicy::Strict).expect_err("strict");
        assert!(matches!(
            err,
            StoreError::Rejected(RosterError::InconsistentSnapshot(_))
        ));

        let roster = load_roster(&path, OrphanPolicy::Lenient).expect("lenient");
        assert_eq!(roster.weighted_average(1), Ok(70.0));
    }

    #[test]
    fn catalog_file_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("catalog.json");
        let catalog = CourseCatalog::default_catalog();
        save_catalog(&path, &catalog).expect("save");
        assert_eq!(load_catalog(&path).expect("load"), catalog);
    }
}
