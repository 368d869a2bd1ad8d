//! Exam Clock - A server-time synchronized exam-room clock
//!
//! This library keeps a display clock corrected against a trusted server
//! time, parses exam time ranges, and drives the exam countdown with its
//! color bands, progress and one-shot minute-mark alerts.

pub mod api;
pub mod clock;
pub mod config;
pub mod display;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use clock::{parse_exam_time, Countdown, CountdownConfig, CountdownState, TimeSync};
pub use config::Config;
pub use state::{AppSettings, AppState};
pub use utils::signals::shutdown_signal;
