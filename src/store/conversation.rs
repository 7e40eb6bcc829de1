use crate::transcript::TranscriptMessage;
use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Shown instead of "0 min" for sessions shorter than a minute
pub const SHORT_DURATION_LABEL: &str = "< 1 min";

const DAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A finished session, immutable once saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedConversation {
    pub id: String,

    /// When the conversation was persisted
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date_created: DateTime<Utc>,

    /// When the session was started
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,

    /// When the session was stopped
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub end_time: Option<DateTime<Utc>>,

    /// Whole minutes, e.g. "2 min", or `SHORT_DURATION_LABEL`
    pub duration: String,

    pub message_count: usize,

    /// Snapshot of the transcript at save time
    pub interview: Vec<TranscriptMessage>,
}

/// One row of the history list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub created: String,
    pub duration: String,
    pub message_count: usize,
}

impl SavedConversation {
    /// Summary for the history list; `index` is the zero-based list position
    pub fn summary(&self, index: usize) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: format!("Sona Session #{}", index + 1),
            created: format_date_time(&self.date_created.with_timezone(&Local)).full,
            duration: self.duration.clone(),
            message_count: self.message_count,
        }
    }
}

/// Elapsed time between `start` and `end` in whole minutes, rounded down
pub fn duration_label(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let minutes = end.signed_duration_since(start).num_minutes();
    if minutes > 0 {
        format!("{} min", minutes)
    } else {
        SHORT_DURATION_LABEL.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedDateTime {
    /// e.g. "Wed 11th Jun 2025"
    pub date: String,
    /// e.g. "3:07 pm"
    pub time: String,
    /// e.g. "Wed 11th Jun 2025, 3:07 pm"
    pub full: String,
}

pub fn format_date_time<Tz: TimeZone>(dt: &DateTime<Tz>) -> FormattedDateTime {
    let day = dt.day();
    let ordinal = match (day % 10, day) {
        (1, d) if d != 11 => "st",
        (2, d) if d != 12 => "nd",
        (3, d) if d != 13 => "rd",
        _ => "th",
    };

    let date = format!(
        "{} {}{} {} {}",
        DAYS[dt.weekday().num_days_from_sunday() as usize],
        day,
        ordinal,
        MONTHS[dt.month0() as usize],
        dt.year()
    );

    let (is_pm, hour) = dt.hour12();
    let time = format!(
        "{}:{:02} {}",
        hour,
        dt.minute(),
        if is_pm { "pm" } else { "am" }
    );

    FormattedDateTime {
        full: format!("{}, {}", date, time),
        date,
        time,
    }
}
