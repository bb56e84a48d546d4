//! The external calendar contract.
//!
//! Every persisted assignment may be mirrored as one event in an external
//! calendar. The mirror is best-effort: callers log failures and carry on.

use std::{convert::Infallible, future::Future};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};

// ─── Event ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
  Popup,
  Email,
}

/// A reminder fired `minutes` before the event starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
  pub method:  ReminderMethod,
  pub minutes: u32,
}

/// An event to be created in the external calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
  pub summary:     String,
  pub description: String,
  pub start:       DateTime<FixedOffset>,
  pub end:         DateTime<FixedOffset>,
  /// IANA zone name passed through to the calendar, e.g. `America/Sao_Paulo`.
  pub time_zone:   Option<String>,
  pub reminders:   Vec<Reminder>,
}

// ─── Template ────────────────────────────────────────────────────────────────

/// How assignment events are rendered. Deserialised from the `[event]`
/// section of the server configuration.
///
/// `utc_offset_minutes` is the office's offset from UTC; it also decides
/// which calendar date counts as "today".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventTemplate {
  pub summary:            String,
  pub start_hour:         u32,
  pub duration_minutes:   u32,
  pub utc_offset_minutes: i32,
  pub time_zone:          Option<String>,
  pub reminder_minutes:   Vec<u32>,
}

impl Default for EventTemplate {
  fn default() -> Self {
    Self {
      summary:            "Office bathroom cleaning - your turn!".to_string(),
      start_hour:         15,
      duration_minutes:   60,
      utc_offset_minutes: -180,
      time_zone:          Some("America/Sao_Paulo".to_string()),
      reminder_minutes:   vec![24 * 60, 60],
    }
  }
}

impl EventTemplate {
  /// The configured offset, falling back to UTC if out of range.
  pub fn offset(&self) -> FixedOffset {
    FixedOffset::east_opt(self.utc_offset_minutes * 60)
      .unwrap_or_else(|| Utc.fix())
  }

  pub fn description(&self, name: &str, date: NaiveDate) -> String {
    format!(
      "Hi {name}! It's your turn to clean the office bathroom this Friday, {}. \
       Please follow the standard cleaning instructions. Any questions, talk to \
       the administration.",
      date.format("%d/%m/%Y")
    )
  }

  /// Build the event for `name` on `date`, starting at `start_hour` local time.
  pub fn event(&self, name: &str, date: NaiveDate) -> CalendarEvent {
    let offset = self.offset();
    let time   = NaiveTime::from_hms_opt(self.start_hour.min(23), 0, 0).unwrap_or_default();
    let local  = date.and_time(time);
    let start  = DateTime::from_naive_utc_and_offset(
      local - Duration::seconds(offset.local_minus_utc() as i64),
      offset,
    );
    let end = start + Duration::minutes(self.duration_minutes as i64);

    CalendarEvent {
      summary: self.summary.clone(),
      description: self.description(name, date),
      start,
      end,
      time_zone: self.time_zone.clone(),
      reminders: self
        .reminder_minutes
        .iter()
        .map(|&minutes| Reminder { method: ReminderMethod::Popup, minutes })
        .collect(),
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an external calendar.
///
/// Implementations make exactly one attempt per call; retry policy, if any,
/// belongs to the caller.
pub trait CalendarMirror: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create an event and return its external identifier.
  ///
  /// Returns `None` when the mirror is disabled and nothing was created.
  fn create_event(
    &self,
    event: CalendarEvent,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  /// Replace the description of an existing event.
  fn update_description(
    &self,
    event_id: String,
    description: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// A mirror that does nothing. Used when no calendar is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCalendar;

impl CalendarMirror for NoCalendar {
  type Error = Infallible;

  async fn create_event(&self, _event: CalendarEvent) -> Result<Option<String>, Infallible> {
    Ok(None)
  }

  async fn update_description(&self, _event_id: String, _description: String) -> Result<(), Infallible> {
    Ok(())
  }
}
