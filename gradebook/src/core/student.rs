//! Student identity plus per-course grades.

use std::collections::BTreeMap;

use crate::core::catalog::CourseCatalog;
use crate::core::error::RosterError;
use crate::core::types::{CourseId, Score, StudentId, score_in_range};

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub id: StudentId,
    pub name: String,
    grades: BTreeMap<CourseId, Score>,
}

impl StudentRecord {
    pub fn new(id: StudentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            grades: BTreeMap::new(),
        }
    }

    /// Rebuild a record from persisted grades without validation.
    pub fn with_grades(
        id: StudentId,
        name: impl Into<String>,
        grades: impl IntoIterator<Item = (CourseId, Score)>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            grades: grades.into_iter().collect(),
        }
    }

    /// Grades in ascending course id order.
    pub fn grades(&self) -> &BTreeMap<CourseId, Score> {
        &self.grades
    }

    pub fn grade(&self, course_id: CourseId) -> Option<Score> {
        self.grades.get(&course_id).copied()
    }

    /// Record a first grade for `course_id`.
    ///
    /// Range is checked before duplication.
    pub fn record_grade(&mut self, course_id: CourseId, score: Score) -> Result<(), RosterError> {
        check_score(score)?;
        if self.grades.contains_key(&course_id) {
            return Err(RosterError::DuplicateGrade {
                student_id: self.id,
                course_id,
            });
        }
        self.grades.insert(course_id, score);
        Ok(())
    }

    /// Overwrite an existing grade for `course_id`.
    pub fn alter_grade(&mut self, course_id: CourseId, score: Score) -> Result<(), RosterError> {
        let Some(slot) = self.grades.get_mut(&course_id) else {
            return Err(RosterError::GradeNotFound {
                student_id: self.id,
                course_id,
            });
        };
        check_score(score)?;
        *slot = score;
        Ok(())
    }

    /// Credit-weighted mean over grades whose course resolves in `catalog`.
    ///
    /// Orphaned grades are left out of both sums. An empty included set is
    /// [`RosterError::NoGrades`].
    pub fn weighted_average(&self, catalog: &CourseCatalog) -> Result<f64, RosterError> {
        let (points, credits) = self
            .grades
            .iter()
            .filter_map(|(course_id, score)| {
                catalog
                    .get(*course_id)
                    .map(|course| (course.credit * score, course.credit))
            })
            .fold((0.0, 0.0), |(points, credits), (p, c)| {
                (points + p, credits + c)
            });

        if credits <= 0.0 {
            return Err(RosterError::NoGrades);
        }
        Ok(points / credits)
    }
}

fn check_score(score: Score) -> Result<(), RosterError> {
    if score_in_range(score) {
        Ok(())
    } else {
        Err(RosterError::InvalidScore(score.to_string()))
    }
}
