//! State management module
//! 
//! This module contains the shared application state, the exam metadata and
//! the alert events passed between tasks.

pub mod alert_event;
pub mod app_state;
pub mod exam_info;

// Re-export main types
pub use alert_event::AlertEvent;
pub use app_state::{AppSettings, AppState};
pub use exam_info::{ExamField, ExamInfo, ExamInfoError};
