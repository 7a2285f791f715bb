use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::models::Appointment;

/// What the calendar needs to know about one appointment slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub duration_minutes: i64,
}

impl CalendarEvent {
    pub fn for_appointment(
        name: &str,
        phone: &str,
        reason: &str,
        start: NaiveDateTime,
        duration_minutes: i64,
    ) -> Self {
        Self {
            summary: format!("Dental - {name}"),
            description: format!("Patient: {name}\nPhone: {phone}\nReason: {reason}"),
            start,
            duration_minutes,
        }
    }
}

/// External calendar contract. `delete_event` must tolerate ids that are
/// already gone, so a retried cleanup is never fatal.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn create_event(&self, event: &CalendarEvent) -> anyhow::Result<String>;
    async fn delete_event(&self, event_id: &str) -> anyhow::Result<()>;
}

/// JSON REST calendar backend: POST /events, DELETE /events/:id.
pub struct HttpCalendarProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpCalendarProvider {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::builder()
                .timeout(StdDuration::from_secs(15))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct CreatedEvent {
    id: String,
}

#[async_trait]
impl CalendarProvider for HttpCalendarProvider {
    async fn create_event(&self, event: &CalendarEvent) -> anyhow::Result<String> {
        let end = event.start + Duration::minutes(event.duration_minutes);
        let body = serde_json::json!({
            "summary": event.summary,
            "description": event.description,
            "start": event.start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "end": end.format("%Y-%m-%dT%H:%M:%S").to_string(),
        });

        let created: CreatedEvent = self
            .client
            .post(format!("{}/events", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to call calendar API")?
            .error_for_status()
            .context("calendar API rejected event creation")?
            .json()
            .await
            .context("failed to parse calendar API response")?;

        Ok(created.id)
    }

    async fn delete_event(&self, event_id: &str) -> anyhow::Result<()> {
        let resp = self
            .client
            .delete(format!("{}/events/{}", self.base_url, event_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("failed to call calendar API")?;

        // Already deleted is fine.
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        resp.error_for_status()
            .context("calendar API rejected event deletion")?;
        Ok(())
    }
}

/// Development backend keeping events in the local database, selected the
/// same way the LLM provider is.
pub struct LocalCalendarProvider {
    db: Arc<Mutex<Connection>>,
}

impl LocalCalendarProvider {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CalendarProvider for LocalCalendarProvider {
    async fn create_event(&self, event: &CalendarEvent) -> anyhow::Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let start = event.start.format("%Y-%m-%d %H:%M:%S").to_string();
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO calendar_events (id, summary, description, start, duration_minutes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, event.summary, event.description, start, event.duration_minutes],
        )
        .context("failed to store local calendar event")?;
        Ok(id)
    }

    async fn delete_event(&self, event_id: &str) -> anyhow::Result<()> {
        let db = self.db.lock().unwrap();
        // Zero rows affected means it was already gone; not an error.
        db.execute("DELETE FROM calendar_events WHERE id = ?1", params![event_id])
            .context("failed to delete local calendar event")?;
        Ok(())
    }
}

/// Renders one VEVENT for an appointment that still has a date and time.
fn ics_event(appt: &Appointment, duration_minutes: i64) -> Option<String> {
    let start = appt.start()?;
    let dtstart = start.format("%Y%m%dT%H%M%S").to_string();
    let dtend = (start + Duration::minutes(duration_minutes))
        .format("%Y%m%dT%H%M%S")
        .to_string();
    let dtstamp = appt.created_at.format("%Y%m%dT%H%M%S").to_string();
    let uid = format!("{}@smiledesk", appt.id);
    let summary = format!("Dental - {}", appt.name);
    let description = appt.reason.as_deref().unwrap_or("No reason given");

    Some(format!(
        "BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART:{dtstart}\r\n\
         DTEND:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         END:VEVENT\r\n"
    ))
}

pub fn generate_ics(appointments: &[Appointment], duration_minutes: i64) -> String {
    let mut out = String::from(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Smiledesk//Appointment Assistant//EN\r\n",
    );
    for appt in appointments {
        if let Some(event) = ics_event(appt, duration_minutes) {
            out.push_str(&event);
        }
    }
    out.push_str("END:VCALENDAR\r\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn appt(date: Option<&str>, time: Option<(u32, u32)>) -> Appointment {
        let created =
            NaiveDateTime::parse_from_str("2026-08-25 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        Appointment {
            id: "row-1".to_string(),
            customer_id: "CUST001".to_string(),
            name: "Alice".to_string(),
            phone: "5551234".to_string(),
            date: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            time: time.map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap()),
            reason: Some("Cleaning".to_string()),
            calendar_event_id: Some("evt-1".to_string()),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_generate_ics() {
        let ics = generate_ics(&[appt(Some("2026-09-01"), Some((14, 0)))], 30);
        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(ics.contains("UID:row-1@smiledesk"));
        assert!(ics.contains("DTSTART:20260901T140000"));
        assert!(ics.contains("DTEND:20260901T143000"));
        assert!(ics.contains("SUMMARY:Dental - Alice"));
        assert!(ics.contains("DESCRIPTION:Cleaning"));
        assert!(ics.contains("END:VCALENDAR"));
    }

    #[test]
    fn test_generate_ics_skips_cancelled_rows() {
        let ics = generate_ics(&[appt(None, None)], 30);
        assert!(!ics.contains("BEGIN:VEVENT"));
    }

    #[tokio::test]
    async fn test_local_provider_roundtrip() {
        let conn = crate::db::init_db(":memory:").unwrap();
        let provider = LocalCalendarProvider::new(Arc::new(Mutex::new(conn)));

        let event = CalendarEvent::for_appointment(
            "Alice",
            "5551234",
            "Cleaning",
            NaiveDateTime::parse_from_str("2026-09-01 14:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
            30,
        );
        let id = provider.create_event(&event).await.unwrap();
        provider.delete_event(&id).await.unwrap();
        // Deleting again must stay non-fatal.
        provider.delete_event(&id).await.unwrap();
    }
}
