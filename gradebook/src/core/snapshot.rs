//! Self-contained copies of roster state and their consistency checks.

use std::collections::BTreeSet;

use crate::core::catalog::CourseCatalog;
use crate::core::student::StudentRecord;
use crate::core::types::score_in_range;

/// Immutable copy of `{catalog, students}` suitable for persistence.
///
/// Students are kept in ascending id order when produced by a roster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub catalog: CourseCatalog,
    pub students: Vec<StudentRecord>,
}

/// Report every consistency problem in `snapshot`.
///
/// Checks:
/// - course and student ids are positive
/// - course credits are positive and finite
/// - no duplicate student ids
/// - scores within `0..=100`
/// - every graded course exists in the catalog (no orphans)
pub fn check_snapshot(snapshot: &Snapshot) -> Vec<String> {
    let mut findings = Vec::new();

    for course in snapshot.catalog.iter() {
        if course.id == 0 {
            findings.push("course id 0 is not allowed".to_string());
        }
        if !(course.credit.is_finite() && course.credit > 0.0) {
            findings.push(format!(
                "course {}: credit {} must be positive",
                course.id, course.credit
            ));
        }
    }

    let mut seen = BTreeSet::new();
    for student in &snapshot.students {
        if student.id == 0 {
            findings.push("student id 0 is not allowed".to_string());
        }
        if !seen.insert(student.id) {
            findings.push(format!("duplicate student id {}", student.id));
        }
        for (course_id, score) in student.grades() {
            if !score_in_range(*score) {
                findings.push(format!(
                    "student {}: score {} for course {} is out of range",
                    student.id, score, course_id
                ));
            }
            if !snapshot.catalog.contains(*course_id) {
                findings.push(format!(
                    "student {}: orphaned grade for unknown course {}",
                    student.id, course_id
                ));
            }
        }
    }

    findings
}
