//! Google Calendar v3 client.
//!
//! Only the two calls the rotation needs are implemented: inserting an event
//! and patching an event's description. Authentication is a bearer access
//! token supplied through configuration; minting that token (service-account
//! OAuth) happens outside this process.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use rota_core::calendar::{CalendarEvent, CalendarMirror, ReminderMethod};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

// ─── Configuration ───────────────────────────────────────────────────────────

fn default_base_url() -> String { "https://www.googleapis.com/calendar/v3".to_string() }

fn default_timeout_secs() -> u64 { 30 }

/// Connection settings, deserialised from the `[calendar]` config section.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleCalendarConfig {
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  pub calendar_id:  String,
  pub access_token: String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventTime<'a> {
  date_time: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  time_zone: Option<&'a str>,
}

#[derive(Serialize)]
struct ReminderOverride {
  method:  ReminderMethod,
  minutes: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Reminders {
  use_default: bool,
  overrides:   Vec<ReminderOverride>,
}

#[derive(Serialize)]
struct EventBody<'a> {
  summary:     &'a str,
  description: &'a str,
  start:       EventTime<'a>,
  end:         EventTime<'a>,
  reminders:   Reminders,
}

impl<'a> From<&'a CalendarEvent> for EventBody<'a> {
  fn from(event: &'a CalendarEvent) -> Self {
    let time_zone = event.time_zone.as_deref();
    Self {
      summary:     &event.summary,
      description: &event.description,
      start:       EventTime { date_time: event.start.to_rfc3339(), time_zone },
      end:         EventTime { date_time: event.end.to_rfc3339(), time_zone },
      reminders:   Reminders {
        use_default: false,
        overrides:   event
          .reminders
          .iter()
          .map(|r| ReminderOverride { method: r.method, minutes: r.minutes })
          .collect(),
      },
    }
  }
}

#[derive(Serialize)]
struct DescriptionPatch<'a> {
  description: &'a str,
}

#[derive(Deserialize)]
struct CreatedEvent {
  id: Option<String>,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async client for a single Google calendar.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GoogleCalendar {
  client: Client,
  config: GoogleCalendarConfig,
}

impl GoogleCalendar {
  pub fn new(config: GoogleCalendarConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config })
  }

  /// `{base}/calendars/{calendar_id}/events[/{event_id}]`, percent-encoded.
  fn events_url(&self, event_id: Option<&str>) -> Result<Url> {
    let mut url = Url::parse(&self.config.base_url).map_err(|e| Error::Url(e.to_string()))?;
    {
      let mut segments = url
        .path_segments_mut()
        .map_err(|_| Error::Url(format!("{} cannot be a base URL", self.config.base_url)))?;
      segments
        .pop_if_empty()
        .extend(["calendars", self.config.calendar_id.as_str(), "events"]);
      if let Some(id) = event_id {
        segments.push(id);
      }
    }
    Ok(url)
  }
}

/// Turn a non-2xx response into [`Error::Status`].
async fn ensure_success(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(Error::Status { status: status.as_u16(), body })
}

impl CalendarMirror for GoogleCalendar {
  type Error = Error;

  /// `POST /calendars/{id}/events`
  async fn create_event(&self, event: CalendarEvent) -> Result<Option<String>> {
    let url  = self.events_url(None)?;
    let resp = self
      .client
      .post(url)
      .bearer_auth(&self.config.access_token)
      .json(&EventBody::from(&event))
      .send()
      .await?;

    let created: CreatedEvent = ensure_success(resp).await?.json().await?;
    let id = created.id.ok_or(Error::MissingEventId)?;
    debug!(event_id = %id, "calendar event created");
    Ok(Some(id))
  }

  /// `PATCH /calendars/{id}/events/{event_id}`
  async fn update_description(&self, event_id: String, description: String) -> Result<()> {
    let url  = self.events_url(Some(&event_id))?;
    let resp = self
      .client
      .patch(url)
      .bearer_auth(&self.config.access_token)
      .json(&DescriptionPatch { description: &description })
      .send()
      .await?;

    ensure_success(resp).await?;
    debug!(%event_id, "calendar event description updated");
    Ok(())
  }
}
