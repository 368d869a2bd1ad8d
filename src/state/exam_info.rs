//! Exam metadata shown alongside the clock

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::display::{Language, Message};

pub const MAX_FIELD_CHARS: usize = 100;

/// Separator used for fields that list several values
const MULTI_VALUE_SEPARATOR: &str = " / ";

/// Seat-count notes like `(40 ที่)` appended to room names
static ROOM_SEAT_NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^)]*ที่\)\s*").expect("room note pattern is valid"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExamInfoError {
    #[error("{field} must not exceed {max} characters (got {len})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// Exam details entered by the invigilator. Empty fields are not displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExamInfo {
    pub course_code: String,
    pub course_name: String,
    pub lecture: String,
    pub lab: String,
    /// Time range text, e.g. `09:00 - 12:00`; drives the countdown
    pub time: String,
    pub exam_room: String,
    pub remarks: String,
}

/// One labelled line of the exam info panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamField {
    pub label: String,
    pub values: Vec<String>,
}

impl ExamInfo {
    fn fields(&self) -> [(&'static str, Message, &str); 7] {
        [
            ("course_code", Message::CourseCode, &self.course_code),
            ("time", Message::ExamTime, &self.time),
            ("course_name", Message::CourseName, &self.course_name),
            ("lecture", Message::Lecture, &self.lecture),
            ("lab", Message::Lab, &self.lab),
            ("exam_room", Message::ExamRoom, &self.exam_room),
            ("remarks", Message::Remarks, &self.remarks),
        ]
    }

    /// Check field lengths
    pub fn validate(&self) -> Result<(), ExamInfoError> {
        for (field, _, value) in self.fields() {
            let len = value.chars().count();
            if len > MAX_FIELD_CHARS {
                return Err(ExamInfoError::TooLong {
                    field,
                    len,
                    max: MAX_FIELD_CHARS,
                });
            }
        }
        Ok(())
    }

    /// True when any field has content
    pub fn has_exam_info(&self) -> bool {
        self.fields().iter().any(|(_, _, value)| !value.trim().is_empty())
    }

    /// Labelled, cleaned-up lines for the display, skipping empty fields.
    ///
    /// Times are shown with `:` separators, seat-count notes are dropped from
    /// the room, and `" / "`-separated lists become multiple values (remarks
    /// are kept whole).
    pub fn display_fields(&self, language: Language) -> Vec<ExamField> {
        self.fields()
            .into_iter()
            .filter(|(_, _, value)| !value.trim().is_empty())
            .map(|(field, label, value)| {
                let values = match field {
                    "time" => vec![value.replace('.', ":")],
                    "exam_room" => vec![ROOM_SEAT_NOTE.replace_all(value, "").trim().to_string()],
                    "remarks" => vec![value.to_string()],
                    _ => value
                        .split(MULTI_VALUE_SEPARATOR)
                        .map(|v| v.trim().to_string())
                        .collect(),
                };
                ExamField {
                    label: label.text(language).to_string(),
                    values,
                }
            })
            .collect()
    }
}
