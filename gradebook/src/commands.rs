//! CLI command implementations.
//!
//! Each command loads the roster from the configured data file, performs one
//! operation, and writes a checkpoint if it mutated anything. Output is
//! written to `out` so callers (and tests) choose the sink.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::core::catalog::CourseCatalog;
use crate::core::error::RosterError;
use crate::core::roster::{Roster, StudentReport};
use crate::core::snapshot::check_snapshot;
use crate::core::types::{parse_course_id, parse_score, parse_student_id, parse_student_name};
use crate::io::config::GradebookConfig;
use crate::io::roster_store::{load_catalog, load_roster, load_snapshot, save_roster};

/// Resolved settings for one command invocation.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: GradebookConfig,
}

impl Session {
    pub fn new(config: GradebookConfig) -> Self {
        Self { config }
    }

    pub fn data_path(&self) -> &Path {
        &self.config.data_path
    }

    fn load(&self) -> Result<Roster> {
        let roster = load_roster(self.data_path(), self.config.orphan_policy)
            .with_context(|| format!("load roster {}", self.data_path().display()))?;
        Ok(roster)
    }

    /// Load, apply one mutation, and save only if it succeeded.
    fn mutate<T, F>(&self, mutator: F) -> Result<T>
    where
        F: FnOnce(&mut Roster) -> Result<T, RosterError>,
    {
        let mut roster = self.load()?;
        let value = mutator(&mut roster)?;
        save_roster(self.data_path(), &roster)
            .with_context(|| format!("save roster {}", self.data_path().display()))?;
        Ok(value)
    }
}

/// Create a fresh roster file.
pub fn init(session: &Session, force: bool, out: &mut impl Write) -> Result<()> {
    let path = session.data_path();
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    let catalog = if session.config.seed_catalog {
        CourseCatalog::default_catalog()
    } else {
        CourseCatalog::default()
    };
    let roster = Roster::new(catalog);
    save_roster(path, &roster).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), courses = roster.catalog().len(), "roster initialized");
    writeln!(
        out,
        "initialized {} with {} courses",
        path.display(),
        roster.catalog().len()
    )?;
    Ok(())
}

/// Print the course catalog.
pub fn courses(session: &Session, out: &mut impl Write) -> Result<()> {
    let roster = session.load()?;
    writeln!(out, "{:<8}{:<40}{:<8}", "id", "name", "credit")?;
    for course in roster.list_courses() {
        writeln!(out, "{:<8}{:<40}{:<8}", course.id, course.name, course.credit)?;
    }
    Ok(())
}

/// Print every student with their weighted average.
pub fn students(session: &Session, out: &mut impl Write) -> Result<()> {
    let roster = session.load()?;
    writeln!(out, "{:<10}{:<30}{:<10}", "id", "name", "average")?;
    for student in roster.students() {
        let average = match student.weighted_average(roster.catalog()) {
            Ok(avg) => format!("{avg:.2}"),
            Err(RosterError::NoGrades) => "n/a".to_string(),
            Err(err) => return Err(err.into()),
        };
        writeln!(out, "{:<10}{:<30}{:<10}", student.id, student.name, average)?;
    }
    Ok(())
}

pub fn add_student(session: &Session, id: &str, name: &str, out: &mut impl Write) -> Result<()> {
    let student_id = parse_student_id(id)?;
    let name = parse_student_name(name)?;
    session.mutate(|roster| roster.add_student(student_id, name))?;
    info!(student_id, "student added");
    writeln!(out, "added student {student_id} ({name})")?;
    Ok(())
}

pub fn remove_student(session: &Session, id: &str, out: &mut impl Write) -> Result<()> {
    let student_id = parse_student_id(id)?;
    let removed = session.mutate(|roster| roster.remove_student(student_id))?;
    info!(student_id, "student removed");
    writeln!(out, "removed student {} ({})", removed.id, removed.name)?;
    Ok(())
}

pub fn record_grade(
    session: &Session,
    student: &str,
    course: &str,
    score: &str,
    out: &mut impl Write,
) -> Result<()> {
    let (student_id, course_id, score) = parse_grade_args(student, course, score)?;
    let course_name = session.mutate(|roster| {
        roster.record_grade(student_id, course_id, score)?;
        Ok(course_name(roster, course_id))
    })?;
    debug!(student_id, course_id, score, "grade recorded");
    writeln!(out, "recorded {course_name}: {score}")?;
    Ok(())
}

pub fn alter_grade(
    session: &Session,
    student: &str,
    course: &str,
    score: &str,
    out: &mut impl Write,
) -> Result<()> {
    let (student_id, course_id, score) = parse_grade_args(student, course, score)?;
    let course_name = session.mutate(|roster| {
        roster.alter_grade(student_id, course_id, score)?;
        Ok(course_name(roster, course_id))
    })?;
    debug!(student_id, course_id, score, "grade altered");
    writeln!(out, "altered {course_name}: {score}")?;
    Ok(())
}

/// Print one student's grades and weighted average.
pub fn query(session: &Session, id: &str, out: &mut impl Write) -> Result<()> {
    let student_id = parse_student_id(id)?;
    let roster = session.load()?;
    let report = roster.query(student_id)?;
    write_report(&report, out)
}

/// Replace the catalog with one read from `path`.
pub fn replace_catalog(session: &Session, path: &Path, out: &mut impl Write) -> Result<()> {
    let catalog =
        load_catalog(path).with_context(|| format!("load catalog {}", path.display()))?;
    let count = catalog.len();
    let policy = session.config.orphan_policy;
    session.mutate(|roster| roster.replace_catalog(catalog, policy))?;
    info!(path = %path.display(), courses = count, "catalog replaced");
    writeln!(out, "catalog replaced with {count} courses")?;
    Ok(())
}

/// Report consistency findings in the data file.
///
/// Fails with `InconsistentSnapshot` when anything is found.
pub fn check(session: &Session, out: &mut impl Write) -> Result<()> {
    let snapshot = load_snapshot(session.data_path())
        .with_context(|| format!("load roster {}", session.data_path().display()))?;
    let findings = check_snapshot(&snapshot);
    if findings.is_empty() {
        writeln!(
            out,
            "ok: {} courses, {} students",
            snapshot.catalog.len(),
            snapshot.students.len()
        )?;
        return Ok(());
    }
    for finding in &findings {
        writeln!(out, "finding: {finding}")?;
    }
    Err(RosterError::InconsistentSnapshot(findings).into())
}

fn parse_grade_args(
    student: &str,
    course: &str,
    score: &str,
) -> Result<(u32, u32, f64), RosterError> {
    Ok((
        parse_student_id(student)?,
        parse_course_id(course)?,
        parse_score(score)?,
    ))
}

fn course_name(roster: &Roster, course_id: u32) -> String {
    roster
        .catalog()
        .get(course_id)
        .map(|course| course.name.clone())
        .unwrap_or_else(|| format!("course {course_id}"))
}

fn write_report(report: &StudentReport, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "student {}: {}",
        report.student.id, report.student.name
    )?;
    writeln!(
        out,
        "{:<8}{:<40}{:<8}{:<8}",
        "course", "name", "credit", "score"
    )?;
    for line in &report.lines {
        match &line.course {
            Some(course) => writeln!(
                out,
                "{:<8}{:<40}{:<8}{:<8}",
                line.course_id, course.name, course.credit, line.score
            )?,
            None => writeln!(
                out,
                "{:<8}{:<40}{:<8}{:<8}",
                line.course_id, "(not in catalog)", "-", line.score
            )?,
        }
    }
    match report.weighted_average {
        // Rounding is presentation only; the roster keeps full precision.
        Some(avg) => writeln!(out, "weighted average: {avg:.2}")?,
        None => writeln!(out, "weighted average: n/a (no grades)")?,
    }
    Ok(())
}
