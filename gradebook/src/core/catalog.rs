//! Course catalog: the authoritative set of course ids and their metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::CourseId;

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    /// Credit weight used by weighted averages. Positive.
    pub credit: f64,
}

impl Course {
    pub fn new(id: CourseId, name: impl Into<String>, credit: f64) -> Self {
        Self {
            id,
            name: name.into(),
            credit,
        }
    }
}

/// Courses keyed by id.
///
/// Entries are not edited individually; the whole catalog is swapped with
/// [`CourseCatalog::replace`]. Replacing never touches recorded grades.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseCatalog {
    courses: BTreeMap<CourseId, Course>,
}

const DEFAULT_COURSES: [(CourseId, &str, f64); 11] = [
    (1, "Securities Investment Analysis", 1.0),
    (2, "Financial Risk Management", 2.0),
    (3, "Business Data Analysis", 2.0),
    (4, "Categorical Data Analysis", 2.0),
    (5, "Data Mining and Machine Learning", 1.0),
    (6, "Bayesian Statistics", 2.0),
    (7, "Financial Engineering", 2.0),
    (8, "Distributed Statistical Computing", 2.0),
    (9, "Computing Foundations for Big Data", 1.0),
    (10, "Financial Institutions and Markets", 1.0),
    (11, "Deep Learning and Applications", 2.0),
];

impl CourseCatalog {
    /// Build a catalog from courses. Duplicate ids keep the last entry.
    pub fn from_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        let mut catalog = Self::default();
        catalog.replace(courses);
        catalog
    }

    /// The built-in elective catalog used to seed fresh rosters.
    pub fn default_catalog() -> Self {
        Self::from_courses(
            DEFAULT_COURSES
                .iter()
                .map(|(id, name, credit)| Course::new(*id, *name, *credit)),
        )
    }

    /// All courses in ascending id order.
    pub fn list(&self) -> Vec<Course> {
        self.courses.values().cloned().collect()
    }

    /// Iterate courses in ascending id order without cloning.
    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    pub fn get(&self, course_id: CourseId) -> Option<&Course> {
        self.courses.get(&course_id)
    }

    pub fn contains(&self, course_id: CourseId) -> bool {
        self.courses.contains_key(&course_id)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Wholesale swap of every entry.
    pub fn replace(&mut self, courses: impl IntoIterator<Item = Course>) {
        self.courses = courses
            .into_iter()
            .map(|course| (course.id, course))
            .collect();
    }
}
