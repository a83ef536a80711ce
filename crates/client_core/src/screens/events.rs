//! Events with their sponsors and extra links.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use reqwest::multipart::Form;
use shared::{
    domain::{Event, EventId},
    protocol::{EventLink, EventSponsor},
};
use tracing::info;

use super::{Upload, ViewHandle};
use crate::{error::ClientError, gateway::ApiGateway};

/// Combines a `YYYY-MM-DD` date and an `HH:MM[:SS]` time read in `tz`.
pub fn combine_date_time<Tz: TimeZone>(
    date: &str,
    time: &str,
    tz: &Tz,
) -> Result<DateTime<Utc>, ClientError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| ClientError::InvalidInput(format!("invalid event date '{date}': {e}")))?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time.trim(), "%H:%M:%S"))
        .map_err(|e| ClientError::InvalidInput(format!("invalid event time '{time}': {e}")))?;

    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| ClientError::InvalidInput("event time does not exist in the local timezone".to_string()))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub day: String,
    pub duration_hours: f64,
    pub registration_link: String,
    pub image: Option<Upload>,
    pub sponsor_images: Vec<Upload>,
    pub sponsors: Vec<EventSponsor>,
    pub other_links: Vec<EventLink>,
}

impl EventDraft {
    fn into_form(self) -> Result<Form, ClientError> {
        if self.title.trim().is_empty() {
            return Err(ClientError::InvalidInput("Event title is required.".to_string()));
        }
        let starts_at = self
            .starts_at
            .ok_or_else(|| ClientError::InvalidInput("Event date and time are required.".to_string()))?;
        let sponsors = serde_json::to_string(&self.sponsors)
            .map_err(|e| ClientError::InvalidInput(format!("invalid sponsors: {e}")))?;
        let other_links = serde_json::to_string(&self.other_links)
            .map_err(|e| ClientError::InvalidInput(format!("invalid links: {e}")))?;

        let mut form = Form::new()
            .text("title", self.title.trim().to_string())
            .text("description", self.description)
            .text("location", self.location)
            .text("dateTime", starts_at.to_rfc3339_opts(SecondsFormat::Millis, true))
            .text("day", self.day)
            .text("durationHours", self.duration_hours.to_string())
            .text("registrationLink", self.registration_link);

        if let Some(image) = self.image {
            form = form.part("image", image.into_part()?);
        }
        for image in self.sponsor_images {
            form = form.part("sponsorImages", image.into_part()?);
        }

        Ok(form
            .text("sponsors", sponsors)
            .text("otherLinks", other_links))
    }
}

#[derive(Clone)]
pub struct EventsScreen {
    gateway: ApiGateway,
    view: ViewHandle<Vec<Event>>,
}

impl EventsScreen {
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            view: ViewHandle::new(),
        }
    }

    pub fn view(&self) -> &ViewHandle<Vec<Event>> {
        &self.view
    }

    pub async fn load(&self) -> Result<Vec<Event>, ClientError> {
        self.view
            .run(self.gateway.get_json("/event/get-all-events"))
            .await
    }

    pub async fn create(&self, draft: EventDraft) -> Result<Vec<Event>, ClientError> {
        let title = draft.title.trim().to_string();
        let form = draft.into_form()?;
        self.gateway.post_multipart("/event/create-event", form).await?;
        info!(title, "event created");
        self.load().await
    }

    pub async fn delete(&self, event_id: EventId) -> Result<Vec<Event>, ClientError> {
        self.gateway
            .delete(&format!("/event/delete-event/{event_id}"))
            .await?;
        info!(%event_id, "event deleted");
        self.load().await
    }
}

#[cfg(test)]
#[path = "../tests/events_tests.rs"]
mod tests;
