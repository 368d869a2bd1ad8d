//! Render-ready view of one display tick

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{
    format::{format_date, format_time, FormattedTime},
    translations::{Language, Message},
};
use crate::{
    clock::{ClockState, CountdownState},
    state::{ExamField, ExamInfo},
};

/// Countdown as the UI draws it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownView {
    #[serde(flatten)]
    pub state: CountdownState,
    pub time_left_text: String,
}

impl From<CountdownState> for CountdownView {
    fn from(state: CountdownState) -> Self {
        Self {
            time_left_text: state.time_left.to_string(),
            state,
        }
    }
}

/// Everything the display shell needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    pub display_time: DateTime<Utc>,
    pub offset_millis: i64,
    pub language: Language,
    pub time: FormattedTime,
    pub date: String,
    pub exam_rule: String,
    pub footer: String,
    pub exam_fields: Vec<ExamField>,
    /// Present only when the exam time parsed into a valid window
    pub countdown: Option<CountdownView>,
}

impl DisplaySnapshot {
    /// Build a snapshot, formatting the clock face in `tz`
    pub fn build<Tz: TimeZone>(
        clock: ClockState,
        tz: &Tz,
        language: Language,
        exam: &ExamInfo,
        countdown: Option<CountdownState>,
    ) -> Self {
        let local = clock.display_time.with_timezone(tz);
        Self {
            display_time: clock.display_time,
            offset_millis: clock.offset_millis,
            language,
            time: format_time(&local),
            date: format_date(&local, language),
            exam_rule: Message::ExamRuleSubmission.text(language).to_string(),
            footer: Message::Footer.text(language).to_string(),
            exam_fields: exam.display_fields(language),
            countdown: countdown.map(CountdownView::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{CountdownStatus, TimeLeft};

    #[test]
    fn builds_from_tick_and_countdown() {
        let clock = ClockState {
            display_time: Utc.with_ymd_and_hms(2024, 1, 15, 11, 46, 0).unwrap(),
            offset_millis: 250,
        };
        let exam = ExamInfo {
            time: "09:00 - 12:00".to_string(),
            ..Default::default()
        };
        let mut countdown = CountdownState::before_start();
        countdown.status = CountdownStatus::InProgress;
        countdown.time_left = TimeLeft::from_millis(14 * 60_000);

        let snapshot = DisplaySnapshot::build(clock, &Utc, Language::En, &exam, Some(countdown));

        assert_eq!(snapshot.time.to_hms(), "11:46:00");
        assert_eq!(snapshot.date, "January 15, 2024");
        assert_eq!(snapshot.offset_millis, 250);
        assert_eq!(snapshot.exam_fields.len(), 1);
        assert_eq!(snapshot.countdown.unwrap().time_left_text, "14m 0s");
    }

    #[test]
    fn countdown_serializes_flat() {
        let view = CountdownView::from(CountdownState::finished());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "finished");
        assert_eq!(json["color"], "red");
        assert_eq!(json["time_left_text"], "0s");
    }
}
