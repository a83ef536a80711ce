use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::error::{ParseEnumError, TransitionError};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(PitchId);
id_newtype!(BusinessId);
id_newtype!(EventId);
id_newtype!(AwardId);
id_newtype!(NomineeId);
id_newtype!(SponsorId);
id_newtype!(MeetingId);

/// Decodes a field, turning a present-but-malformed value into `None`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
    #[default]
    #[serde(other)]
    Other,
}

/// Cached profile of the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Declined,
}

impl ReviewStatus {
    pub const ALL: [ReviewStatus; 3] = [Self::Pending, Self::Approved, Self::Declined];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
        }
    }

    /// Transitions an administrator may issue from this status.
    ///
    /// Pending and declined pitches can be approved; pending and approved
    /// pitches can be declined. Nothing moves back to pending, and neither
    /// approved nor declined is terminal.
    pub fn can_transition_to(self, target: ReviewStatus) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Approved)
                | (Self::Declined, Self::Approved)
                | (Self::Pending, Self::Declined)
                | (Self::Approved, Self::Declined)
        )
    }

    pub fn transition(self, target: ReviewStatus) -> Result<ReviewStatus, TransitionError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(TransitionError {
                from: self.as_str(),
                to: target.as_str(),
            })
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == lowered)
            .ok_or_else(|| ParseEnumError::new("review status", s))
    }
}

/// Review sub-object shared by pitches and scheduled meetings.
///
/// Fields stay as received so that unexpected casing or formats never fail
/// decoding; typed accessors interpret them on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, deserialize_with = "lenient")]
    pub review_status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub reviewer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,
}

impl Review {
    pub fn status(&self) -> Option<ReviewStatus> {
        self.review_status.as_deref()?.parse().ok()
    }

    pub fn status_label(&self) -> &str {
        match self.review_status.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => "Unknown",
        }
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.updated_at.as_deref()?)
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitterSummary {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitch {
    pub id: PitchId,
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<SubmitterSummary>,
    #[serde(default, deserialize_with = "lenient")]
    pub review: Option<Review>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInformation {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub ethnicity: Option<String>,
    #[serde(default)]
    pub requires_disability_support: Option<bool>,
    #[serde(default)]
    pub disability_support_description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalBackground {
    #[serde(default)]
    pub current_occupation: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionQuestions {
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub business_description: Option<String>,
    #[serde(default)]
    pub reason_of_interest: Option<String>,
    #[serde(default)]
    pub investment_prize_usage_plan: Option<String>,
    #[serde(default)]
    pub impact_plan_with_investment_prize: Option<String>,
    #[serde(default)]
    pub summary_of_why_you_should_participate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalAgreement {
    #[serde(default)]
    pub have_current_investors: Option<bool>,
    #[serde(default)]
    pub have_current_investors_description: Option<String>,
    #[serde(default)]
    pub have_current_employees: Option<bool>,
    #[serde(default)]
    pub have_current_employees_description: Option<String>,
    #[serde(default)]
    pub have_debts: Option<bool>,
    #[serde(default)]
    pub have_debts_description: Option<String>,
}

/// Full submission as returned by the single-pitch endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchDetail {
    #[serde(default)]
    pub id: Option<PitchId>,
    #[serde(default, deserialize_with = "lenient")]
    pub review_status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub personal_information: Option<PersonalInformation>,
    #[serde(default, deserialize_with = "lenient")]
    pub professional_background: Option<ProfessionalBackground>,
    #[serde(default, deserialize_with = "lenient")]
    pub competition_questions: Option<CompetitionQuestions>,
    #[serde(default, deserialize_with = "lenient")]
    pub technical_agreement: Option<TechnicalAgreement>,
}

impl PitchDetail {
    pub fn status(&self) -> Option<ReviewStatus> {
        self.review_status.as_deref()?.parse().ok()
    }

    pub fn business_name(&self) -> Option<&str> {
        self.competition_questions
            .as_ref()?
            .business_name
            .as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMeeting {
    pub id: MeetingId,
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<SubmitterSummary>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub review: Option<Review>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AwardStatus {
    NotStarted,
    NominationsOpen,
    VotingOpen,
    Closed,
}

impl AwardStatus {
    pub const ALL: [AwardStatus; 4] = [
        Self::NotStarted,
        Self::NominationsOpen,
        Self::VotingOpen,
        Self::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::NominationsOpen => "nominations-open",
            Self::VotingOpen => "voting-open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for AwardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AwardStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == lowered)
            .ok_or_else(|| ParseEnumError::new("award status", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub id: AwardId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<AwardStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NomineeRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// What a nominee stands for. Exactly one subject per nominee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NomineeSubject {
    User(NomineeRef),
    Business(NomineeRef),
    Pitch(PitchId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNominee", into = "RawNominee")]
pub struct Nominee {
    pub id: NomineeId,
    pub nominee_type: Option<String>,
    pub votes_count: u64,
    pub subject: NomineeSubject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNominee {
    id: NomineeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nominee_type: Option<String>,
    #[serde(default)]
    votes_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_nominee: Option<NomineeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    business_nominee: Option<NomineeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pitch_nominee: Option<NomineeRef>,
}

impl TryFrom<RawNominee> for Nominee {
    type Error = String;

    fn try_from(raw: RawNominee) -> Result<Self, Self::Error> {
        let subject = match (raw.user_nominee, raw.business_nominee, raw.pitch_nominee) {
            (Some(user), None, None) => NomineeSubject::User(user),
            (None, Some(business), None) => NomineeSubject::Business(business),
            (None, None, Some(pitch)) => {
                let id = pitch
                    .id
                    .ok_or_else(|| format!("nominee {} references a pitch without id", raw.id))?;
                NomineeSubject::Pitch(PitchId(id))
            }
            (None, None, None) => return Err(format!("nominee {} has no subject", raw.id)),
            _ => return Err(format!("nominee {} has more than one subject", raw.id)),
        };

        Ok(Self {
            id: raw.id,
            nominee_type: raw.nominee_type,
            votes_count: raw.votes_count,
            subject,
        })
    }
}

impl From<Nominee> for RawNominee {
    fn from(nominee: Nominee) -> Self {
        let mut raw = RawNominee {
            id: nominee.id,
            nominee_type: nominee.nominee_type,
            votes_count: nominee.votes_count,
            user_nominee: None,
            business_nominee: None,
            pitch_nominee: None,
        };
        match nominee.subject {
            NomineeSubject::User(user) => raw.user_nominee = Some(user),
            NomineeSubject::Business(business) => raw.business_nominee = Some(business),
            NomineeSubject::Pitch(pitch_id) => {
                raw.pitch_nominee = Some(NomineeRef {
                    id: Some(pitch_id.0),
                    full_name: None,
                })
            }
        }
        raw
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    #[serde(default)]
    pub id: Option<BusinessId>,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub business_description: Option<String>,
    #[serde(default)]
    pub business_owner_name: Option<String>,
    #[serde(default)]
    pub business_owner_email: Option<String>,
    #[serde(default)]
    pub business_owner_phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration_hours: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SponsorCategory {
    #[default]
    General,
    Event,
    Award,
    Pitch,
    Business,
}

impl SponsorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Event => "event",
            Self::Award => "award",
            Self::Pitch => "pitch",
            Self::Business => "business",
        }
    }
}

impl FromStr for SponsorCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(Self::General),
            "event" => Ok(Self::Event),
            "award" => Ok(Self::Award),
            "pitch" => Ok(Self::Pitch),
            "business" => Ok(Self::Business),
            _ => Err(ParseEnumError::new("sponsor category", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsor {
    pub id: SponsorId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<SponsorCategory>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_businesses: u64,
    #[serde(default)]
    pub total_pitches: u64,
    #[serde(default)]
    pub approved_pitches: u64,
    #[serde(default)]
    pub pending_reviews: u64,
    #[serde(default)]
    pub declined_pitches: u64,
}

impl Metrics {
    pub fn review_breakdown(&self) -> [(&'static str, u64); 3] {
        [
            ("Approved", self.approved_pitches),
            ("Pending", self.pending_reviews),
            ("Declined", self.declined_pitches),
        ]
    }

    pub fn totals(&self) -> [(&'static str, u64); 3] {
        [
            ("Total Users", self.total_users),
            ("Total Businesses", self.total_businesses),
            ("Total Pitches", self.total_pitches),
        ]
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
