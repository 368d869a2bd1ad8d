//! Display formatting and translations

pub mod format;
pub mod snapshot;
pub mod translations;

pub use format::{format_date, format_time, FormattedTime};
pub use snapshot::{CountdownView, DisplaySnapshot};
pub use translations::{announcement, Language, Message};
