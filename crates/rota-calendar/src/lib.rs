//! External calendar mirrors for the rotation service.
//!
//! [`GoogleCalendar`] talks to the Google Calendar v3 REST API.
//! [`CalendarBackend`] is what the server holds: either that client or a
//! disabled mirror when no calendar is configured.

pub mod error;
pub mod google;

pub use error::{Error, Result};
pub use google::{GoogleCalendar, GoogleCalendarConfig};

use rota_core::calendar::{CalendarEvent, CalendarMirror};

/// The calendar mirror selected at startup.
#[derive(Clone)]
pub enum CalendarBackend {
  Google(GoogleCalendar),
  Disabled,
}

impl CalendarBackend {
  /// Build a Google mirror if `config` is present, otherwise a disabled one.
  pub fn from_config(config: Option<GoogleCalendarConfig>) -> Result<Self> {
    match config {
      Some(cfg) => Ok(Self::Google(GoogleCalendar::new(cfg)?)),
      None => Ok(Self::Disabled),
    }
  }

  pub fn is_enabled(&self) -> bool { matches!(self, Self::Google(_)) }
}

impl CalendarMirror for CalendarBackend {
  type Error = Error;

  async fn create_event(&self, event: CalendarEvent) -> Result<Option<String>> {
    match self {
      Self::Google(google) => google.create_event(event).await,
      Self::Disabled => Ok(None),
    }
  }

  async fn update_description(&self, event_id: String, description: String) -> Result<()> {
    match self {
      Self::Google(google) => google.update_description(event_id, description).await,
      Self::Disabled => Ok(()),
    }
  }
}
