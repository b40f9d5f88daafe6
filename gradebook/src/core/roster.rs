//! The roster: owner of every student record and the course catalog.
//!
//! All operations validate before mutating, so a rejected call leaves the
//! roster exactly as it was.

use std::collections::BTreeMap;

use crate::core::catalog::{Course, CourseCatalog};
use crate::core::error::RosterError;
use crate::core::snapshot::{Snapshot, check_snapshot};
use crate::core::student::StudentRecord;
use crate::core::types::{CourseId, OrphanPolicy, Score, StudentId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    students: BTreeMap<StudentId, StudentRecord>,
    catalog: CourseCatalog,
}

/// One grade with its course resolved against the current catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeLine {
    pub course_id: CourseId,
    pub score: Score,
    /// `None` when the grade is orphaned.
    pub course: Option<Course>,
}

/// Result of [`Roster::query`].
#[derive(Debug, Clone, PartialEq)]
pub struct StudentReport {
    pub student: StudentRecord,
    /// Ordered by course id.
    pub lines: Vec<GradeLine>,
    /// `None` when no grade resolves (the `NoGrades` case).
    pub weighted_average: Option<f64>,
}

impl StudentReport {
    /// Lines whose course is missing from the catalog.
    pub fn orphaned(&self) -> impl Iterator<Item = &GradeLine> {
        self.lines.iter().filter(|line| line.course.is_none())
    }
}

impl Roster {
    /// Empty roster over `catalog`.
    pub fn new(catalog: CourseCatalog) -> Self {
        Self {
            students: BTreeMap::new(),
            catalog,
        }
    }

    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    pub fn list_courses(&self) -> Vec<Course> {
        self.catalog.list()
    }

    /// Students in ascending id order.
    pub fn students(&self) -> impl Iterator<Item = &StudentRecord> {
        self.students.values()
    }

    pub fn student(&self, student_id: StudentId) -> Option<&StudentRecord> {
        self.students.get(&student_id)
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn add_student(
        &mut self,
        student_id: StudentId,
        name: impl Into<String>,
    ) -> Result<(), RosterError> {
        if self.students.contains_key(&student_id) {
            return Err(RosterError::AlreadyExists(student_id));
        }
        self.students
            .insert(student_id, StudentRecord::new(student_id, name));
        Ok(())
    }

    /// Remove a student and return the dropped record.
    pub fn remove_student(&mut self, student_id: StudentId) -> Result<StudentRecord, RosterError> {
        self.students
            .remove(&student_id)
            .ok_or(RosterError::StudentNotFound(student_id))
    }

    /// Record a first grade.
    ///
    /// Checks run in a fixed order: student, course, score range, duplicate.
    pub fn record_grade(
        &mut self,
        student_id: StudentId,
        course_id: CourseId,
        score: Score,
    ) -> Result<(), RosterError> {
        let student = self
            .students
            .get_mut(&student_id)
            .ok_or(RosterError::StudentNotFound(student_id))?;
        if !self.catalog.contains(course_id) {
            return Err(RosterError::CourseNotFound(course_id));
        }
        student.record_grade(course_id, score)
    }

    /// Overwrite an existing grade.
    ///
    /// Checks run in a fixed order: student, course, prior grade, score range.
    pub fn alter_grade(
        &mut self,
        student_id: StudentId,
        course_id: CourseId,
        score: Score,
    ) -> Result<(), RosterError> {
        let student = self
            .students
            .get_mut(&student_id)
            .ok_or(RosterError::StudentNotFound(student_id))?;
        if !self.catalog.contains(course_id) {
            return Err(RosterError::CourseNotFound(course_id));
        }
        student.alter_grade(course_id, score)
    }

    /// Weighted average for one student against the current catalog.
    pub fn weighted_average(&self, student_id: StudentId) -> Result<f64, RosterError> {
        self.students
            .get(&student_id)
            .ok_or(RosterError::StudentNotFound(student_id))?
            .weighted_average(&self.catalog)
    }

    /// Resolve a student's grades and aggregate them.
    pub fn query(&self, student_id: StudentId) -> Result<StudentReport, RosterError> {
        let student = self
            .students
            .get(&student_id)
            .ok_or(RosterError::StudentNotFound(student_id))?;

        let lines = student
            .grades()
            .iter()
            .map(|(course_id, score)| GradeLine {
                course_id: *course_id,
                score: *score,
                course: self.catalog.get(*course_id).cloned(),
            })
            .collect();

        let weighted_average = match student.weighted_average(&self.catalog) {
            Ok(avg) => Some(avg),
            Err(RosterError::NoGrades) => None,
            Err(err) => return Err(err),
        };

        Ok(StudentReport {
            student: student.clone(),
            lines,
            weighted_average,
        })
    }

    /// Copy the whole state for persistence.
    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot {
            catalog: self.catalog.clone(),
            students: self.students.values().cloned().collect(),
        }
    }

    /// Replace catalog and students with `snapshot`.
    ///
    /// `Lenient` trusts the snapshot (duplicate student ids keep the last
    /// record). `Strict` rejects it when [`check_snapshot`] reports anything.
    pub fn import_snapshot(
        &mut self,
        snapshot: Snapshot,
        policy: OrphanPolicy,
    ) -> Result<(), RosterError> {
        if policy == OrphanPolicy::Strict {
            let findings = check_snapshot(&snapshot);
            if !findings.is_empty() {
                return Err(RosterError::InconsistentSnapshot(findings));
            }
        }
        self.catalog = snapshot.catalog;
        self.students = snapshot
            .students
            .into_iter()
            .map(|student| (student.id, student))
            .collect();
        Ok(())
    }

    /// Swap in a new catalog, leaving grades untouched.
    ///
    /// `Strict` rejects a catalog that would orphan any recorded grade or that
    /// carries a non-positive credit.
    pub fn replace_catalog(
        &mut self,
        catalog: CourseCatalog,
        policy: OrphanPolicy,
    ) -> Result<(), RosterError> {
        if policy == OrphanPolicy::Strict {
            let candidate = Snapshot {
                catalog,
                students: self.students.values().cloned().collect(),
            };
            let findings = check_snapshot(&candidate);
            if !findings.is_empty() {
                return Err(RosterError::InconsistentSnapshot(findings));
            }
            self.catalog = candidate.catalog;
            return Ok(());
        }
        self.catalog = catalog;
        Ok(())
    }

    /// Build a roster straight from a snapshot.
    pub fn from_snapshot(snapshot: Snapshot, policy: OrphanPolicy) -> Result<Self, RosterError> {
        let mut roster = Self::default();
        roster.import_snapshot(snapshot, policy)?;
        Ok(roster)
    }
}
