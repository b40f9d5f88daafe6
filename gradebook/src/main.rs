//! Student grade-record manager.
//!
//! Keeps a roster of students and a course catalog in a JSON file
//! (`student_data.json` by default). Every subcommand loads the file, runs one
//! operation, and saves it again when something changed.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gradebook::commands::{self, Session};
use gradebook::exit_codes;
use gradebook::io::config::{DEFAULT_CONFIG_FILE, load_config};
use gradebook::logging;

#[derive(Parser)]
#[command(
    name = "gradebook",
    version,
    about = "Student and course grade records with weighted averages"
)]
struct Cli {
    /// Config file (TOML). Missing file means defaults.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Roster file; overrides `data_path` from the config.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the roster file, seeded with the default catalog.
    Init {
        /// Overwrite an existing roster file.
        #[arg(short, long)]
        force: bool,
    },
    /// List all courses.
    Courses,
    /// List all students with their weighted averages.
    Students,
    /// Add a new student.
    AddStudent { id: String, name: String },
    /// Remove a student and all of their grades.
    RemoveStudent { id: String },
    /// Record a first grade for a student in a course.
    Record {
        student: String,
        course: String,
        #[arg(allow_hyphen_values = true)]
        score: String,
    },
    /// Change an existing grade.
    Alter {
        student: String,
        course: String,
        #[arg(allow_hyphen_values = true)]
        score: String,
    },
    /// Show a student's grades and weighted average.
    Query { student: String },
    /// Replace the course catalog from a catalog JSON file.
    LoadCatalog { path: PathBuf },
    /// Report consistency problems in the roster file.
    Check,
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        match exit_codes::kind_of(&err) {
            Some(kind) => eprintln!("error[{kind}]: {err:#}"),
            None => eprintln!("error: {err:#}"),
        }
        std::process::exit(exit_codes::for_error(&err));
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    let session = Session::new(config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Init { force } => commands::init(&session, force, &mut out),
        Command::Courses => commands::courses(&session, &mut out),
        Command::Students => commands::students(&session, &mut out),
        Command::AddStudent { id, name } => commands::add_student(&session, &id, &name, &mut out),
        Command::RemoveStudent { id } => commands::remove_student(&session, &id, &mut out),
        Command::Record {
            student,
            course,
            score,
        } => commands::record_grade(&session, &student, &course, &score, &mut out),
        Command::Alter {
            student,
            course,
            score,
        } => commands::alter_grade(&session, &student, &course, &score, &mut out),
        Command::Query { student } => commands::query(&session, &student, &mut out),
        Command::LoadCatalog { path } => commands::replace_catalog(&session, &path, &mut out),
        Command::Check => commands::check(&session, &mut out),
    }?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::parse_from(["gradebook", "init"]);
        assert!(matches!(cli.command, Command::Init { force: false }));
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["gradebook", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
    }

    #[test]
    fn parse_record_keeps_raw_text() {
        let cli = Cli::parse_from(["gradebook", "--data", "x.json", "record", "7", "abc", "90"]);
        assert_eq!(cli.data, Some(PathBuf::from("x.json")));
        match cli.command {
            Command::Record {
                student,
                course,
                score,
            } => {
                assert_eq!((student.as_str(), course.as_str(), score.as_str()), ("7", "abc", "90"));
            }
            _ => panic!("expected record command"),
        }
    }

    #[test]
    fn parse_negative_score_as_value() {
        let cli = Cli::parse_from(["gradebook", "alter", "1", "2", "-1"]);
        assert!(matches!(cli.command, Command::Alter { ref score, .. } if score == "-1"));
    }

    #[test]
    fn parse_load_catalog() {
        let cli = Cli::parse_from(["gradebook", "load-catalog", "courses.json"]);
        assert!(
            matches!(cli.command, Command::LoadCatalog { ref path } if path == &PathBuf::from("courses.json"))
        );
    }
}
