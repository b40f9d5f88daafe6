//! Shared identifier and score types.
//!
//! Ids are plain integers in memory. Text forms only exist at the edges (CLI
//! arguments and JSON object keys) and are converted with the helpers here.

use serde::{Deserialize, Serialize};

use crate::core::error::RosterError;

/// Course identifier (`>= 1`).
pub type CourseId = u32;

/// Student identifier (`>= 1` when parsed from external text).
pub type StudentId = u32;

/// Numeric grade in `[MIN_SCORE, MAX_SCORE]`.
pub type Score = f64;

pub const MIN_SCORE: Score = 0.0;
pub const MAX_SCORE: Score = 100.0;

/// True if `score` lies in the inclusive grade range.
pub fn score_in_range(score: Score) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// Which catalog consistency policy applies when state is swapped in wholesale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Trust imported state; orphaned grades are skipped by aggregation.
    #[default]
    Lenient,
    /// Reject imported state that has any consistency finding.
    Strict,
}

/// Parse a student id typed by a user. Must be a positive integer.
pub fn parse_student_id(text: &str) -> Result<StudentId, RosterError> {
    parse_positive(text)
}

/// Parse a course id typed by a user. Must be a positive integer.
pub fn parse_course_id(text: &str) -> Result<CourseId, RosterError> {
    parse_positive(text)
}

/// Trim a student name typed by a user. Must not be blank.
pub fn parse_student_name(text: &str) -> Result<&str, RosterError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RosterError::InvalidName);
    }
    Ok(trimmed)
}

/// Parse a score typed by a user. Range is checked by the roster, not here.
pub fn parse_score(text: &str) -> Result<Score, RosterError> {
    let trimmed = text.trim();
    match trimmed.parse::<Score>() {
        Ok(score) if score.is_finite() => Ok(score),
        _ => Err(RosterError::InvalidScore(trimmed.to_string())),
    }
}

fn parse_positive(text: &str) -> Result<u32, RosterError> {
    let trimmed = text.trim();
    match trimmed.parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(RosterError::InvalidId(trimmed.to_string())),
    }
}
