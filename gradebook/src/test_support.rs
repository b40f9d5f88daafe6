//! Test-only helpers for building rosters and scratch workspaces.

use std::path::PathBuf;

use tempfile::TempDir;

use crate::commands::Session;
use crate::core::catalog::{Course, CourseCatalog};
use crate::core::roster::Roster;
use crate::core::types::OrphanPolicy;
use crate::io::config::{GradebookConfig, write_config};
use crate::io::roster_store::{StoreError, load_roster, save_roster};

/// Two-course catalog: course 1 (2 credits) and course 2 (1 credit).
pub fn sample_catalog() -> CourseCatalog {
    CourseCatalog::from_courses(vec![
        Course::new(1, "Statistics", 2.0),
        Course::new(2, "Economics", 1.0),
    ])
}

/// Student 1 "Ada" graded 80 and 90; student 2 "Bob" without grades.
pub fn sample_roster() -> Roster {
    let mut roster = Roster::new(sample_catalog());
    roster.add_student(1, "Ada").expect("add Ada");
    roster.add_student(2, "Bob").expect("add Bob");
    roster.record_grade(1, 1, 80.0).expect("grade Ada/1");
    roster.record_grade(1, 2, 90.0).expect("grade Ada/2");
    roster
}

/// Scratch directory holding a roster file and a config file.
pub struct TestDir {
    pub dir: TempDir,
    pub data_path: PathBuf,
    pub config_path: PathBuf,
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let data_path = dir.path().join("student_data.json");
        let config_path = dir.path().join("gradebook.toml");
        Ok(Self {
            dir,
            data_path,
            config_path,
        })
    }

    pub fn config(&self, policy: OrphanPolicy) -> GradebookConfig {
        GradebookConfig {
            data_path: self.data_path.clone(),
            orphan_policy: policy,
            seed_catalog: true,
        }
    }

    pub fn session(&self, policy: OrphanPolicy) -> Session {
        Session::new(self.config(policy))
    }

    /// Write `gradebook.toml` pointing at this directory's roster file.
    pub fn write_config(&self, policy: OrphanPolicy) -> anyhow::Result<()> {
        write_config(&self.config_path, &self.config(policy))
    }

    pub fn seed(&self, roster: &Roster) -> Result<(), StoreError> {
        save_roster(&self.data_path, roster)
    }

    pub fn load(&self, policy: OrphanPolicy) -> Result<Roster, StoreError> {
        load_roster(&self.data_path, policy)
    }
}
