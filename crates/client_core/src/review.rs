//! Pitch review engine: recency/status filtering, the four-step section
//! pipeline, and review status transitions.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Months, Utc};
use shared::{
    domain::{
        CompetitionQuestions, PersonalInformation, Pitch, PitchDetail, PitchId,
        ProfessionalBackground, Review, ReviewStatus, ScheduledMeeting, TechnicalAgreement,
    },
    error::ParseEnumError,
    protocol::{PitchDetailResponse, ReviewPitchRequest},
};
use tracing::info;

use crate::{error::ClientError, gateway::ApiGateway};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecencyWindow {
    #[default]
    All,
    LastWeek,
    Month,
    Year,
}

impl RecencyWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::LastWeek => "last-week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Oldest `updated_at` still inside the window, or `None` for `All`.
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::All => None,
            Self::LastWeek => Some(now - Duration::days(7)),
            Self::Month => Some(now.checked_sub_months(Months::new(1)).unwrap_or(now)),
            Self::Year => Some(now.checked_sub_months(Months::new(12)).unwrap_or(now)),
        }
    }

    /// A missing timestamp only passes the `All` window.
    pub fn admits(self, updated_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match self.cutoff(now) {
            None => true,
            Some(cutoff) => updated_at.is_some_and(|at| at >= cutoff),
        }
    }
}

impl fmt::Display for RecencyWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecencyWindow {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "last-week" | "week" => Ok(Self::LastWeek),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(ParseEnumError::new("recency window", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ReviewStatus),
}

impl StatusFilter {
    /// Case-insensitive exact match; unknown statuses only pass `All`.
    pub fn admits(self, review_status: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => {
                review_status.is_some_and(|raw| raw.eq_ignore_ascii_case(wanted.as_str()))
            }
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => f.write_str(status.as_str()),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<ReviewStatus>()
            .map(Self::Only)
            .map_err(|_| ParseEnumError::new("status filter", s))
    }
}

/// Anything carrying a review sub-object.
pub trait Reviewed {
    fn review(&self) -> Option<&Review>;

    fn review_status_raw(&self) -> Option<&str> {
        self.review()?.review_status.as_deref()
    }

    fn reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.review()?.updated_at()
    }
}

impl Reviewed for Pitch {
    fn review(&self) -> Option<&Review> {
        self.review.as_ref()
    }
}

impl Reviewed for ScheduledMeeting {
    fn review(&self) -> Option<&Review> {
        self.review.as_ref()
    }
}

/// Filters against the current clock. See [`apply_filters_at`].
pub fn apply_filters<T>(collection: &[T], window: RecencyWindow, status: StatusFilter) -> Vec<T>
where
    T: Reviewed + Clone,
{
    apply_filters_at(collection, window, status, Utc::now())
}

/// Keeps the items admitted by both predicates, preserving order. The input
/// is never modified.
pub fn apply_filters_at<T>(
    collection: &[T],
    window: RecencyWindow,
    status: StatusFilter,
    now: DateTime<Utc>,
) -> Vec<T>
where
    T: Reviewed + Clone,
{
    collection
        .iter()
        .filter(|item| window.admits(item.reviewed_at(), now))
        .filter(|item| status.admits(item.review_status_raw()))
        .cloned()
        .collect()
}

/// The four ordered steps of a pitch review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchSection {
    Personal,
    Professional,
    Competition,
    Technical,
}

impl PitchSection {
    pub const ORDER: [PitchSection; 4] = [
        Self::Personal,
        Self::Professional,
        Self::Competition,
        Self::Technical,
    ];

    pub fn next(self) -> Option<PitchSection> {
        match self {
            Self::Personal => Some(Self::Professional),
            Self::Professional => Some(Self::Competition),
            Self::Competition => Some(Self::Technical),
            Self::Technical => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Professional => "professional",
            Self::Competition => "competition",
            Self::Technical => "technical",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Personal => "Personal Information",
            Self::Professional => "Professional Background",
            Self::Competition => "Competition Questions",
            Self::Technical => "Technical Agreement",
        }
    }
}

impl fmt::Display for PitchSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PitchSection {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("pitch section", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionContent {
    Personal(PersonalInformation),
    Professional(ProfessionalBackground),
    Competition(CompetitionQuestions),
    Technical(TechnicalAgreement),
}

/// One step of the pipeline with the pitch's review status carried along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub pitch_id: PitchId,
    pub section: PitchSection,
    pub review_status: Option<String>,
    pub content: SectionContent,
}

impl SectionView {
    /// Missing sections render as empty rather than failing.
    pub fn from_detail(pitch_id: PitchId, section: PitchSection, detail: &PitchDetail) -> Self {
        let content = match section {
            PitchSection::Personal => SectionContent::Personal(
                detail.personal_information.clone().unwrap_or_default(),
            ),
            PitchSection::Professional => SectionContent::Professional(
                detail.professional_background.clone().unwrap_or_default(),
            ),
            PitchSection::Competition => SectionContent::Competition(
                detail.competition_questions.clone().unwrap_or_default(),
            ),
            PitchSection::Technical => SectionContent::Technical(
                detail.technical_agreement.clone().unwrap_or_default(),
            ),
        };

        Self {
            pitch_id,
            section,
            review_status: detail.review_status.clone(),
            content,
        }
    }

    pub fn status_label(&self) -> &str {
        match self.review_status.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => "Unknown",
        }
    }
}

#[derive(Clone)]
pub struct PitchReviewEngine {
    gateway: ApiGateway,
}

impl PitchReviewEngine {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    /// The full, unfiltered collection.
    pub async fn list_pitches(&self) -> Result<Vec<Pitch>, ClientError> {
        self.gateway.get_json("/admin/get-Pitches").await
    }

    pub async fn get_pitch(&self, pitch_id: PitchId) -> Result<PitchDetail, ClientError> {
        let response: PitchDetailResponse = self
            .gateway
            .get_json(&format!("/admin/get-pitch/{pitch_id}"))
            .await?;
        Ok(response.pitch)
    }

    pub async fn section(
        &self,
        pitch_id: PitchId,
        section: PitchSection,
    ) -> Result<SectionView, ClientError> {
        let detail = self.get_pitch(pitch_id).await?;
        Ok(SectionView::from_detail(pitch_id, section, &detail))
    }

    /// Issues the transition. Callers re-fetch afterwards: reviewer and
    /// timestamp are assigned by the server.
    pub async fn set_review_status(
        &self,
        pitch_id: PitchId,
        new_status: ReviewStatus,
    ) -> Result<(), ClientError> {
        self.gateway
            .patch_json_discard(
                "/admin/review-pitch",
                &ReviewPitchRequest {
                    pitch_id,
                    review_status: new_status,
                },
            )
            .await?;
        info!(%pitch_id, status = %new_status, "pitch review status updated");
        Ok(())
    }

    /// Checks the transition against the pitch's known status, applies it,
    /// and returns the re-fetched collection. Unknown statuses are left to
    /// the server to judge.
    pub async fn review(
        &self,
        pitch: &Pitch,
        target: ReviewStatus,
    ) -> Result<Vec<Pitch>, ClientError> {
        if let Some(current) = pitch.review.as_ref().and_then(Review::status) {
            current.transition(target)?;
        }
        self.set_review_status(pitch.id, target).await?;
        self.list_pitches().await
    }
}

#[cfg(test)]
#[path = "tests/review_tests.rs"]
mod tests;
