//! JSON codec for roster snapshots.
//!
//! The wire document keys courses by their id *as text* because JSON object
//! keys are always strings. Encoding writes ids with `to_string`; decoding
//! parses every key back to an integer and rejects anything that does not fit.
//!
//! ```text
//! {
//!   "courses":  {"<id>": {"course_id": <int>, "name": "..", "credit": <num>}},
//!   "students": [{"student_id": <int>, "name": "..", "courses": {"<id>": <score>}}]
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use jsonschema::Draft;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::core::catalog::{Course, CourseCatalog};
use crate::core::snapshot::Snapshot;
use crate::core::student::StudentRecord;
use crate::core::types::{CourseId, Score, StudentId};

const ROSTER_SCHEMA: &str = include_str!("../../schemas/roster/v1.schema.json");
const CATALOG_SCHEMA: &str = include_str!("../../schemas/catalog/v1.schema.json");

/// Ways a document can fail to decode. All of them are malformed data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("document is not valid UTF-8")]
    Utf8,

    #[error("parse json: {0}")]
    Json(String),

    #[error("schema validation failed:\n- {}", .0.join("\n- "))]
    Schema(Vec<String>),

    #[error("{section}: key {key:?} is not a positive integer id")]
    InvalidKey { section: String, key: String },

    #[error("courses: key {key:?} does not match course_id {course_id}")]
    CourseIdMismatch { key: String, course_id: CourseId },

    #[error("students: duplicate student_id {0}")]
    DuplicateStudent(StudentId),

    #[error("serialize json: {0}")]
    Serialize(String),
}

/// Encode a snapshot as pretty-printed JSON with a trailing newline.
///
/// Course keys and grade keys are ordered numerically; students by id.
pub fn encode(snapshot: &Snapshot) -> Result<Vec<u8>, CodecError> {
    let mut students: Vec<&StudentRecord> = snapshot.students.iter().collect();
    students.sort_by_key(|student| student.id);

    let document = WireDocument {
        courses: catalog_entries(&snapshot.catalog),
        students: students
            .into_iter()
            .map(|student| WireStudent {
                student_id: student.id,
                name: &student.name,
                courses: IdKeyed(
                    student
                        .grades()
                        .iter()
                        .map(|(course_id, score)| (*course_id, *score))
                        .collect(),
                ),
            })
            .collect(),
    };

    to_pretty_bytes(&document)
}

/// Encode only a catalog, in the same shape as the `courses` section.
pub fn encode_catalog(catalog: &CourseCatalog) -> Result<Vec<u8>, CodecError> {
    to_pretty_bytes(&catalog_entries(catalog))
}

/// Decode a roster document.
pub fn decode(bytes: &[u8]) -> Result<Snapshot, CodecError> {
    let value = parse_validated(bytes, ROSTER_SCHEMA)?;
    let raw: RawDocument =
        serde_json::from_value(value).map_err(|err| CodecError::Json(err.to_string()))?;

    let catalog = coerce_courses(raw.courses)?;

    let mut seen = BTreeSet::new();
    let mut students = Vec::with_capacity(raw.students.len());
    for student in raw.students {
        if !seen.insert(student.student_id) {
            return Err(CodecError::DuplicateStudent(student.student_id));
        }
        let section = format!("students[{}].courses", student.student_id);
        let grades = coerce_keys(&section, student.courses)?;
        students.push(StudentRecord::with_grades(
            student.student_id,
            student.name,
            grades,
        ));
    }

    Ok(Snapshot { catalog, students })
}

/// Decode a standalone catalog document.
pub fn decode_catalog(bytes: &[u8]) -> Result<CourseCatalog, CodecError> {
    let value = parse_validated(bytes, CATALOG_SCHEMA)?;
    let raw: BTreeMap<String, RawCourse> =
        serde_json::from_value(value).map_err(|err| CodecError::Json(err.to_string()))?;
    coerce_courses(raw)
}

/// Parse a text key as a positive integer id.
///
/// The key must be exactly the id's decimal form, so `"+1"`, `"01"` and `"0"`
/// are rejected and two keys can never name the same id.
pub fn parse_key(section: &str, key: &str) -> Result<u32, CodecError> {
    match key.parse::<u32>() {
        Ok(id) if id > 0 && id.to_string() == key => Ok(id),
        _ => Err(CodecError::InvalidKey {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn parse_validated(bytes: &[u8], schema_raw: &str) -> Result<Value, CodecError> {
    let text = std::str::from_utf8(bytes).map_err(|_| CodecError::Utf8)?;
    let value: Value = serde_json::from_str(text).map_err(|err| CodecError::Json(err.to_string()))?;
    validate_schema(&value, schema_raw)?;
    Ok(value)
}

/// Validate JSON instance against an embedded JSON Schema (Draft 2020-12).
fn validate_schema(instance: &Value, schema_raw: &str) -> Result<(), CodecError> {
    let schema: Value = serde_json::from_str(schema_raw)
        .map_err(|err| CodecError::Schema(vec![format!("embedded schema: {err}")]))?;
    let compiled = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .map_err(|err| CodecError::Schema(vec![format!("compile schema: {err}")]))?;
    let messages: Vec<String> = compiled
        .iter_errors(instance)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        return Err(CodecError::Schema(messages));
    }
    Ok(())
}

fn coerce_courses(raw: BTreeMap<String, RawCourse>) -> Result<CourseCatalog, CodecError> {
    let mut courses = BTreeMap::new();
    for (key, course) in raw {
        let id = parse_key("courses", &key)?;
        if id != course.course_id {
            return Err(CodecError::CourseIdMismatch {
                key,
                course_id: course.course_id,
            });
        }
        courses.insert(id, Course::new(id, course.name, course.credit));
    }
    Ok(CourseCatalog::from_courses(courses.into_values()))
}

fn coerce_keys<V>(section: &str, raw: BTreeMap<String, V>) -> Result<BTreeMap<u32, V>, CodecError> {
    raw.into_iter()
        .map(|(key, value)| Ok((parse_key(section, &key)?, value)))
        .collect()
}

fn catalog_entries(catalog: &CourseCatalog) -> IdKeyed<WireCourse<'_>> {
    IdKeyed(
        catalog
            .iter()
            .map(|course| {
                (
                    course.id,
                    WireCourse {
                        course_id: course.id,
                        name: &course.name,
                        credit: course.credit,
                    },
                )
            })
            .collect(),
    )
}

fn to_pretty_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    let mut buf =
        serde_json::to_string_pretty(value).map_err(|err| CodecError::Serialize(err.to_string()))?;
    buf.push('\n');
    Ok(buf.into_bytes())
}

/// Id-keyed entries serialized as a JSON object with text keys, in the
/// order they are stored.
struct IdKeyed<T>(Vec<(u32, T)>);

impl<T: Serialize> Serialize for IdKeyed<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, value) in &self.0 {
            map.serialize_entry(&id.to_string(), value)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct WireDocument<'a> {
    courses: IdKeyed<WireCourse<'a>>,
    students: Vec<WireStudent<'a>>,
}

#[derive(Serialize)]
struct WireCourse<'a> {
    course_id: CourseId,
    name: &'a str,
    credit: f64,
}

#[derive(Serialize)]
struct WireStudent<'a> {
    student_id: StudentId,
    name: &'a str,
    courses: IdKeyed<Score>,
}

#[derive(Deserialize)]
struct RawDocument {
    courses: BTreeMap<String, RawCourse>,
    students: Vec<RawStudent>,
}

#[derive(Deserialize)]
struct RawCourse {
    course_id: CourseId,
    name: String,
    credit: f64,
}

#[derive(Deserialize)]
struct RawStudent {
    student_id: StudentId,
    name: String,
    courses: BTreeMap<String, Score>,
}
