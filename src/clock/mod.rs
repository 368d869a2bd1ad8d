//! Clock core: server-time sync, exam time parsing and the countdown
//!
//! Data flows one way: [`TimeSync::tick`] gives a display time, the exam time
//! string is parsed once into an [`ExamWindow`], and [`Countdown::evaluate`]
//! combines the two into a [`CountdownState`] every tick.

pub mod countdown;
pub mod exam_time;
pub mod time_sync;
pub mod wall_clock;

pub use countdown::{
    format_time_left, Countdown, CountdownColor, CountdownConfig, CountdownConfigError,
    CountdownState, CountdownStatus, TimeLeft,
};
pub use exam_time::{parse_exam_time, parse_exam_time_today, ExamWindow, ParsedExamTime};
pub use time_sync::{ClockState, SyncFailurePolicy, SyncOutcome, TimeSync};
pub use wall_clock::{ManualClock, SystemClock, WallClock};
