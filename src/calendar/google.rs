//! Calendar provider backed by the Google Calendar v3 REST API

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use super::{CalendarProvider, NewCalendarEvent};
use crate::{
    config::CalendarConfig,
    error::{AppError, AppResult},
    models::BusyInterval,
};

/// Upper bound accepted by the events.list endpoint
const PAGE_SIZE: &str = "2500";

#[derive(Clone)]
pub struct GoogleCalendarClient {
    http: Client,
    base_url: Url,
    calendar_id: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventList {
    #[serde(default)]
    items: Vec<EventItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventItem {
    id: Option<String>,
    status: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
}

/// Either `dateTime` (timed event) or `date` (all-day event) is set
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: Option<DateTime<FixedOffset>>,
    #[allow(dead_code)]
    date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventBody<'a> {
    summary: &'a str,
    description: &'a str,
    start: EventDateTime<'a>,
    end: EventDateTime<'a>,
    attendees: Vec<AttendeeBody<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventDateTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttendeeBody<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreatedEvent {
    id: String,
}

impl GoogleCalendarClient {
    pub fn new(config: &CalendarConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.api_url)
            .map_err(|e| AppError::Internal(format!("Invalid calendar api_url: {}", e)))?;

        Ok(Self {
            http: Client::new(),
            base_url,
            calendar_id: config.calendar_id.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// `{base}/calendars/{calendar_id}/events[/{event_id}]`
    fn events_url(&self, event_id: Option<&str>) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| AppError::Internal("Calendar api_url cannot be a base".to_string()))?;
            segments
                .pop_if_empty()
                .extend(["calendars", self.calendar_id.as_str(), "events"]);
            if let Some(id) = event_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn fetch_page(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> AppResult<EventList> {
        let mut query = vec![
            ("timeMin", start.to_rfc3339()),
            ("timeMax", end.to_rfc3339()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
            ("maxResults", PAGE_SIZE.to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let page = self
            .http
            .get(self.events_url(None)?)
            .bearer_auth(&self.access_token)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json::<EventList>()
            .await?;
        Ok(page)
    }
}

/// Keep timed, non-cancelled events as busy intervals
fn busy_from_items(items: Vec<EventItem>) -> Vec<BusyInterval> {
    items
        .into_iter()
        .filter(|item| item.status.as_deref() != Some("cancelled"))
        .filter_map(|item| {
            let start = item.start?.date_time?.with_timezone(&Utc);
            let end = item.end?.date_time?.with_timezone(&Utc);
            let busy = BusyInterval::new(start, end);
            Some(match item.id {
                Some(id) => busy.with_event_id(id),
                None => busy,
            })
        })
        .collect()
}

#[async_trait]
impl CalendarProvider for GoogleCalendarClient {
    async fn list_busy(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<BusyInterval>> {
        let mut busy = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(start, end, page_token.as_deref()).await?;
            busy.extend(busy_from_items(page.items));
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        busy.sort_by_key(|b| b.start);
        tracing::debug!("Calendar returned {} busy intervals for {} .. {}", busy.len(), start, end);
        Ok(busy)
    }

    async fn create_event(&self, event: NewCalendarEvent) -> AppResult<String> {
        let body = EventBody {
            summary: &event.summary,
            description: &event.description,
            start: EventDateTime {
                date_time: event.start.to_rfc3339(),
                time_zone: &event.timezone,
            },
            end: EventDateTime {
                date_time: event.end.to_rfc3339(),
                time_zone: &event.timezone,
            },
            attendees: event
                .attendees
                .iter()
                .map(|a| AttendeeBody {
                    email: &a.email,
                    display_name: a.display_name.as_deref(),
                })
                .collect(),
        };

        let created = self
            .http
            .post(self.events_url(None)?)
            .bearer_auth(&self.access_token)
            .query(&[("sendUpdates", "all")])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<CreatedEvent>()
            .await?;

        tracing::info!("Created calendar event {}", created.id);
        Ok(created.id)
    }

    async fn delete_event(&self, event_id: &str) -> AppResult<()> {
        let response = self
            .http
            .delete(self.events_url(Some(event_id))?)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        // Already gone counts as deleted
        if matches!(response.status(), StatusCode::NOT_FOUND | StatusCode::GONE) {
            return Ok(());
        }
        response.error_for_status()?;
        tracing::info!("Deleted calendar event {}", event_id);
        Ok(())
    }
}
