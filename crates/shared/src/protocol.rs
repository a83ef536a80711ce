//! Request and response bodies of the dashboard REST surface.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Award, AwardId, AwardStatus, Identity, MeetingId, Nominee, PitchDetail, PitchId,
    ReviewStatus,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Identity,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: Identity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchDetailResponse {
    pub pitch: PitchDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPitchRequest {
    pub pitch_id: PitchId,
    pub review_status: ReviewStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewMeetingRequest {
    pub meeting_id: MeetingId,
    #[serde(default)]
    pub meeting_link: String,
    pub review_status: ReviewStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardsResponse {
    #[serde(default)]
    pub awards: Vec<Award>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAwardRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleAwardStatusRequest {
    pub award_id: AwardId,
    pub status: AwardStatus,
}

/// Nominee rows stay raw until [`NomineesResponse::into_nominees`] so a
/// single malformed row can be dropped without failing the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NomineesResponse {
    #[serde(default)]
    pub nominees: Vec<serde_json::Value>,
}

impl NomineesResponse {
    pub fn into_nominees(self) -> impl Iterator<Item = Result<Nominee, serde_json::Error>> {
        self.nominees.into_iter().map(serde_json::from_value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAdminRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAccountRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessRequest {
    pub business_name: String,
    pub business_description: String,
    pub business_owner_name: String,
    pub business_owner_email: String,
    pub business_owner_phone: String,
    pub website: String,
    pub logo: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSponsor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLink {
    pub title: String,
    pub url: String,
}
