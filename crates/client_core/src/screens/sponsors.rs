use reqwest::multipart::Form;
use shared::domain::{EventId, Sponsor, SponsorCategory, SponsorId};
use tracing::info;

use super::{Upload, ViewHandle};
use crate::{error::ClientError, gateway::ApiGateway};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SponsorDraft {
    pub name: String,
    pub category: SponsorCategory,
    pub description: String,
    pub website: String,
    pub event_id: Option<EventId>,
    pub image: Option<Upload>,
}

impl SponsorDraft {
    fn into_form(self) -> Result<Form, ClientError> {
        if self.name.trim().is_empty() {
            return Err(ClientError::InvalidInput("Sponsor name is required.".to_string()));
        }

        let mut form = Form::new()
            .text("name", self.name.trim().to_string())
            .text("category", self.category.as_str())
            .text("description", self.description)
            .text("website", self.website)
            .text(
                "eventId",
                self.event_id.map(|id| id.to_string()).unwrap_or_default(),
            );
        if let Some(image) = self.image {
            form = form.part("image", image.into_part()?);
        }
        Ok(form)
    }
}

#[derive(Clone)]
pub struct SponsorsScreen {
    gateway: ApiGateway,
    view: ViewHandle<Vec<Sponsor>>,
}

impl SponsorsScreen {
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            view: ViewHandle::new(),
        }
    }

    pub fn view(&self) -> &ViewHandle<Vec<Sponsor>> {
        &self.view
    }

    pub async fn load(&self) -> Result<Vec<Sponsor>, ClientError> {
        self.view
            .run(self.gateway.get_json("/sponsor/get-all-sponsors"))
            .await
    }

    pub async fn create(&self, draft: SponsorDraft) -> Result<Vec<Sponsor>, ClientError> {
        let name = draft.name.trim().to_string();
        let form = draft.into_form()?;
        self.gateway
            .post_multipart("/sponsor/create-sponsor", form)
            .await?;
        info!(name, "sponsor created");
        self.load().await
    }

    pub async fn delete(&self, sponsor_id: SponsorId) -> Result<Vec<Sponsor>, ClientError> {
        self.gateway
            .delete(&format!("/sponsor/delete-sponsor/{sponsor_id}"))
            .await?;
        info!(%sponsor_id, "sponsor deleted");
        self.load().await
    }
}
