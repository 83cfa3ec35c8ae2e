pub mod client;
pub mod project;
pub mod task;
pub mod payment;
pub mod time_log;

pub use client::*;
pub use project::*;
pub use task::*;
pub use payment::*;
pub use time_log::*;

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

use crate::error::FptError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Parse a user-supplied `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, FptError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        FptError::validation(format!(
            "Invalid date '{trimmed}'. Expected format YYYY-MM-DD"
        ))
    })
}
