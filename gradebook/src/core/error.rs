//! Domain errors returned by roster operations.

use crate::core::types::{CourseId, StudentId};

/// Validation failures of catalog, student, and roster operations.
///
/// Every variant leaves the roster unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RosterError {
    #[error("invalid id: {0:?} is not a positive integer")]
    InvalidId(String),

    #[error("student name must not be empty")]
    InvalidName,

    #[error("student {0} already exists")]
    AlreadyExists(StudentId),

    #[error("student {0} not found")]
    StudentNotFound(StudentId),

    #[error("course {0} not found")]
    CourseNotFound(CourseId),

    #[error("invalid score: {0} (expected a number in 0..=100)")]
    InvalidScore(String),

    #[error("student {student_id} already has a grade for course {course_id}")]
    DuplicateGrade {
        student_id: StudentId,
        course_id: CourseId,
    },

    #[error("student {student_id} has no grade for course {course_id}")]
    GradeNotFound {
        student_id: StudentId,
        course_id: CourseId,
    },

    #[error("no grades resolve against the current catalog")]
    NoGrades,

    #[error("inconsistent snapshot:\n- {}", .0.join("\n- "))]
    InconsistentSnapshot(Vec<String>),
}

impl RosterError {
    /// Stable kind name for adapters that surface the specific failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "InvalidId",
            Self::InvalidName => "InvalidName",
            Self::AlreadyExists(_) => "AlreadyExists",
            Self::StudentNotFound(_) => "StudentNotFound",
            Self::CourseNotFound(_) => "CourseNotFound",
            Self::InvalidScore(_) => "InvalidScore",
            Self::DuplicateGrade { .. } => "DuplicateGrade",
            Self::GradeNotFound { .. } => "GradeNotFound",
            Self::NoGrades => "NoGrades",
            Self::InconsistentSnapshot(_) => "InconsistentSnapshot",
        }
    }
}
