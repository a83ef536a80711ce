//! Awards and their nominees.

use futures::future::join_all;
use shared::{
    domain::{Award, AwardId, AwardStatus, Nominee, NomineeSubject, PitchId},
    protocol::{AwardsResponse, CreateAwardRequest, NomineesResponse, PitchDetailResponse, ToggleAwardStatusRequest},
};
use tracing::{debug, info, warn};

use super::ViewHandle;
use crate::{error::ClientError, gateway::ApiGateway};

pub const UNKNOWN_PITCH: &str = "Unknown Pitch";

#[derive(Clone)]
pub struct AwardsScreen {
    gateway: ApiGateway,
    view: ViewHandle<Vec<Award>>,
}

impl AwardsScreen {
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            view: ViewHandle::new(),
        }
    }

    pub fn view(&self) -> &ViewHandle<Vec<Award>> {
        &self.view
    }

    async fn fetch(&self) -> Result<Vec<Award>, ClientError> {
        let response: AwardsResponse = self.gateway.get_json("/award/get-awards").await?;
        Ok(response.awards)
    }

    pub async fn load(&self) -> Result<Vec<Award>, ClientError> {
        self.view.run(self.fetch()).await
    }

    pub async fn create(
        &self,
        title: &str,
        description: &str,
    ) -> Result<Vec<Award>, ClientError> {
        if title.trim().is_empty() {
            return Err(ClientError::InvalidInput("Award title is required.".to_string()));
        }
        self.gateway
            .post_json_discard(
                "/award/create-award",
                &CreateAwardRequest {
                    title: title.trim().to_string(),
                    description: description.trim().to_string(),
                },
            )
            .await?;
        info!(title, "award created");
        self.load().await
    }

    /// Award statuses move freely; the list is patched in place on success.
    pub async fn set_status(&self, award_id: AwardId, status: AwardStatus) -> Result<(), ClientError> {
        self.gateway
            .post_json_discard(
                "/award/toggle-award-status",
                &ToggleAwardStatusRequest { award_id, status },
            )
            .await?;
        self.view
            .update(|awards| {
                for award in awards.iter_mut().filter(|award| award.id == award_id) {
                    award.status = Some(status);
                }
            })
            .await;
        info!(%award_id, %status, "award status updated");
        Ok(())
    }

    pub async fn delete(&self, award_id: AwardId) -> Result<(), ClientError> {
        self.gateway
            .delete(&format!("/award/delete-award/{award_id}"))
            .await?;
        self.view
            .update(|awards| awards.retain(|award| award.id != award_id))
            .await;
        info!(%award_id, "award deleted");
        Ok(())
    }
}

/// A nominee together with the name shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NomineeRow {
    pub nominee: Nominee,
    pub display_name: String,
}

#[derive(Clone)]
pub struct NomineesScreen {
    gateway: ApiGateway,
    award_id: AwardId,
    view: ViewHandle<Vec<NomineeRow>>,
}

impl NomineesScreen {
    pub fn new(gateway: ApiGateway, award_id: AwardId) -> Self {
        Self {
            gateway,
            award_id,
            view: ViewHandle::new(),
        }
    }

    pub fn view(&self) -> &ViewHandle<Vec<NomineeRow>> {
        &self.view
    }

    pub async fn load(&self) -> Result<Vec<NomineeRow>, ClientError> {
        self.view.run(self.fetch()).await
    }

    async fn fetch(&self) -> Result<Vec<NomineeRow>, ClientError> {
        let response: NomineesResponse = self
            .gateway
            .get_json(&format!("/award/get-award-nominees/{}", self.award_id))
            .await?;

        let nominees: Vec<Nominee> = response
            .into_nominees()
            .filter_map(|row| match row {
                Ok(nominee) => Some(nominee),
                Err(err) => {
                    warn!(award_id = %self.award_id, error = %err, "skipping malformed nominee");
                    None
                }
            })
            .collect();

        let names = join_all(
            nominees
                .iter()
                .map(|nominee| self.display_name(&nominee.subject)),
        )
        .await;

        Ok(nominees
            .into_iter()
            .zip(names)
            .map(|(nominee, display_name)| NomineeRow {
                nominee,
                display_name,
            })
            .collect())
    }

    async fn display_name(&self, subject: &NomineeSubject) -> String {
        match subject {
            NomineeSubject::User(person) | NomineeSubject::Business(person) => {
                person.full_name.clone().unwrap_or_default()
            }
            NomineeSubject::Pitch(pitch_id) => self.pitch_name(*pitch_id).await,
        }
    }

    async fn pitch_name(&self, pitch_id: PitchId) -> String {
        match self
            .gateway
            .get_json::<PitchDetailResponse>(&format!("/pitch/get-pitch/{pitch_id}"))
            .await
        {
            Ok(response) => response
                .pitch
                .business_name()
                .map(str::to_string)
                .unwrap_or_else(|| UNKNOWN_PITCH.to_string()),
            Err(err) => {
                debug!(%pitch_id, error = %err, "failed to resolve pitch name");
                UNKNOWN_PITCH.to_string()
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/awards_tests.rs"]
mod tests;
