use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;

use crate::courses::repo_types::{Course, EnrolledStudent};
use crate::error::{AppError, AppResult};
use crate::flash::Flash;
use crate::forms;

use super::repo_types::AttendanceStatus;

/// What the form said about one student; absent fields fall back to
/// `Present` / empty notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceEntry {
    pub status: Option<AttendanceStatus>,
    pub notes: Option<String>,
}

/// A validated attendance form: course, date and per-student entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSubmission {
    pub course_id: String,
    pub date: Date,
    pub entries: BTreeMap<i32, AttendanceEntry>,
}

enum Field {
    Status,
    Notes,
}

fn entry_key(key: &str) -> Option<(i32, Field)> {
    lazy_static! {
        static ref KEY_RE: Regex =
            Regex::new(r"^attendance\[(\d+)\]\[(status|notes)\]$").unwrap();
    }
    let caps = KEY_RE.captures(key)?;
    let id = caps[1].parse::<i32>().ok()?;
    let field = match &caps[2] {
        "status" => Field::Status,
        _ => Field::Notes,
    };
    Some((id, field))
}

impl AttendanceSubmission {
    /// Parses raw form pairs. `Ok(None)` means no course or date was
    /// selected. The first value of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> AppResult<Option<Self>> {
        let mut course_id = None;
        let mut date = None;
        let mut entries: BTreeMap<i32, AttendanceEntry> = BTreeMap::new();

        for (key, value) in pairs {
            match key.as_str() {
                "course_id" => {
                    course_id.get_or_insert(value);
                }
                "date" => {
                    date.get_or_insert(value);
                }
                _ => {
                    let Some((student_id, field)) = entry_key(&key) else {
                        continue;
                    };
                    let entry = entries.entry(student_id).or_default();
                    match field {
                        Field::Status if entry.status.is_none() && !value.trim().is_empty() => {
                            let status = value.parse::<AttendanceStatus>().map_err(|_| {
                                AppError::validation(format!(
                                    "Invalid attendance status '{}' for student {student_id}.",
                                    value.trim()
                                ))
                            })?;
                            entry.status = Some(status);
                        }
                        Field::Notes if entry.notes.is_none() => entry.notes = Some(value),
                        _ => {}
                    }
                }
            }
        }

        let course_id = course_id.map(|c| c.trim().to_string()).unwrap_or_default();
        let date = date.map(|d| d.trim().to_string()).unwrap_or_default();
        if course_id.is_empty() || date.is_empty() {
            return Ok(None);
        }

        Ok(Some(Self {
            course_id,
            date: forms::date("date", &date)?,
            entries,
        }))
    }
}

/// Optional preselection for `GET /admin/mark_attendance`.
#[derive(Debug, Default, Deserialize)]
pub struct AttendanceQuery {
    pub course_id: Option<String>,
    pub date: Option<String>,
}

/// Stored status/notes shown next to each roster line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceMark {
    pub status: AttendanceStatus,
    pub notes: String,
}

#[derive(Debug, Default, Serialize)]
pub struct AttendancePage {
    pub courses: Vec<Course>,
    pub selected_course: String,
    pub selected_date: String,
    pub students: Vec<EnrolledStudent>,
    pub existing_attendance: BTreeMap<i32, AttendanceMark>,
    pub flashes: Vec<Flash>,
}
