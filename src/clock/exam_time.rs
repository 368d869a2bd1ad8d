//! Parsing of human-entered exam time ranges such as `09:00 - 12:00`

use chrono::{DateTime, Days, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `H[:.]MM - H[:.]MM`, searched anywhere in the cleaned text
static TIME_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{1,2})[:.]([0-9]{2})\s*-\s*([0-9]{1,2})[:.]([0-9]{2})")
        .expect("time range pattern is valid")
});

/// Thai "o'clock" suffix and AM/PM markers, dropped before matching
static MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)น\.|AM|PM").expect("marker pattern is valid"));

/// The `[start, end)` pair an exam runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExamWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ExamWindow {
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// Result of parsing an exam time string. Invalid input yields no window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedExamTime {
    pub window: Option<ExamWindow>,
}

impl ParsedExamTime {
    pub fn invalid() -> Self {
        Self { window: None }
    }

    pub fn is_valid(&self) -> bool {
        self.window.is_some()
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.window.map(|w| w.start)
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.window.map(|w| w.end)
    }
}

/// Parse a time range like `"09:00 - 12:00"`, `"12.00-15.00"`,
/// `"09:00 AM - 12:00 PM"` or `"9:00 - 12:00 น."`.
///
/// Both instants land on `reference`'s calendar day in `reference`'s time
/// zone, with zero seconds. An end earlier than the start is moved to the
/// next day. AM/PM markers are stripped, not interpreted. Anything that does
/// not parse, including out-of-range hours or minutes, gives an invalid
/// result rather than an error.
pub fn parse_exam_time<Tz: TimeZone>(text: &str, reference: &DateTime<Tz>) -> ParsedExamTime {
    if text.trim().is_empty() {
        return ParsedExamTime::invalid();
    }

    let cleaned = MARKERS.replace_all(text, "");
    let Some(caps) = TIME_RANGE.captures(cleaned.trim()) else {
        return ParsedExamTime::invalid();
    };

    let field = |i: usize| caps[i].parse::<u32>().ok();
    let (Some(start_hour), Some(start_minute), Some(end_hour), Some(end_minute)) =
        (field(1), field(2), field(3), field(4))
    else {
        return ParsedExamTime::invalid();
    };

    let (Some(start_of_day), Some(end_of_day)) = (
        NaiveTime::from_hms_opt(start_hour, start_minute, 0),
        NaiveTime::from_hms_opt(end_hour, end_minute, 0),
    ) else {
        return ParsedExamTime::invalid();
    };

    let day = reference.date_naive();
    let start = day.and_time(start_of_day);
    let mut end = day.and_time(end_of_day);
    if end < start {
        match end.checked_add_days(Days::new(1)) {
            Some(next_day) => end = next_day,
            None => return ParsedExamTime::invalid(),
        }
    }

    let tz = reference.timezone();
    match (resolve(&tz, start), resolve(&tz, end)) {
        (Some(start), Some(end)) => ParsedExamTime {
            window: Some(ExamWindow { start, end }),
        },
        _ => ParsedExamTime::invalid(),
    }
}

/// [`parse_exam_time`] anchored to today in the local time zone
pub fn parse_exam_time_today(text: &str) -> ParsedExamTime {
    parse_exam_time(text, &Local::now())
}

// Ambiguous local times (DST fall-back) take the earlier instant; times that
// do not exist (spring-forward gap) have no instant.
fn resolve<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
