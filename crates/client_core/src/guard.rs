//! Route guard: decides whether a view may render for the current session.

use shared::domain::{AwardId, PitchId};

use crate::{
    review::PitchSection,
    session::{AuthState, Session, SessionStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    AccessDenied,
    Privacy,
    DeleteAccount,
    Dashboard,
    Pitches,
    PitchSection {
        pitch_id: PitchId,
        section: PitchSection,
    },
    Businesses,
    Events,
    Personnel,
    Support,
    Notifications,
    ScheduledMeetings,
    Awards,
    Nominees {
        award_id: AwardId,
    },
    Sponsors,
}

impl View {
    /// Login and the two legal pages are reachable signed out; the
    /// access-denied page still needs a credential, which a 403 keeps.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login | Self::Privacy | Self::DeleteAccount)
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::AccessDenied => "/access-denied".to_string(),
            Self::Privacy => "/privacy".to_string(),
            Self::DeleteAccount => "/delete".to_string(),
            Self::Dashboard => "/".to_string(),
            Self::Pitches => "/pitches".to_string(),
            Self::PitchSection { pitch_id, section } => match section {
                PitchSection::Personal => format!("/pitch/{pitch_id}"),
                other => format!("/pitch/{}/{pitch_id}", other.as_str()),
            },
            Self::Businesses => "/businesses".to_string(),
            Self::Events => "/events".to_string(),
            Self::Personnel => "/personnel".to_string(),
            Self::Support => "/support".to_string(),
            Self::Notifications => "/notifications".to_string(),
            Self::ScheduledMeetings => "/scheduledMeetings".to_string(),
            Self::Awards => "/awards".to_string(),
            Self::Nominees { award_id } => format!("/awards/nominees/{award_id}"),
            Self::Sponsors => "/sponsors".to_string(),
        }
    }

    pub fn from_path(path: &str) -> Option<View> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let view = match segments.as_slice() {
            [] => Self::Dashboard,
            ["login"] => Self::Login,
            ["access-denied"] => Self::AccessDenied,
            ["privacy"] => Self::Privacy,
            ["delete"] => Self::DeleteAccount,
            ["pitches"] => Self::Pitches,
            ["pitch", id] => Self::PitchSection {
                pitch_id: PitchId(id.parse().ok()?),
                section: PitchSection::Personal,
            },
            ["pitch", section, id] => {
                let section: PitchSection = section.parse().ok()?;
                if section == PitchSection::Personal {
                    return None;
                }
                Self::PitchSection {
                    pitch_id: PitchId(id.parse().ok()?),
                    section,
                }
            }
            ["businesses"] => Self::Businesses,
            ["events"] => Self::Events,
            ["personnel"] => Self::Personnel,
            ["support"] => Self::Support,
            ["notifications"] => Self::Notifications,
            ["scheduledMeetings"] => Self::ScheduledMeetings,
            ["awards"] => Self::Awards,
            ["awards", "nominees", id] => Self::Nominees {
                award_id: AwardId(id.parse().ok()?),
            },
            ["sponsors"] => Self::Sponsors,
            _ => return None,
        };
        Some(view)
    }

    /// "Next" in the pitch pipeline; `None` past the last section.
    pub fn next_pitch_step(&self) -> Option<View> {
        match self {
            Self::PitchSection { pitch_id, section } => section.next().map(|next| {
                Self::PitchSection {
                    pitch_id: *pitch_id,
                    section: next,
                }
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render(View),
    Redirect(View),
}

/// Pure decision for a requested view against a session snapshot. Token
/// freshness is not checked here; an expired token surfaces as a 401 later.
pub fn decide(view: View, session: &Session) -> GuardDecision {
    if !view.is_protected() || session.auth_state() == AuthState::Authenticated {
        GuardDecision::Render(view)
    } else {
        GuardDecision::Redirect(View::Login)
    }
}

#[derive(Clone)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    pub fn check(&self, view: View) -> GuardDecision {
        decide(view, &self.session.snapshot())
    }

    /// `None` for paths that name no view.
    pub fn check_path(&self, path: &str) -> Option<GuardDecision> {
        View::from_path(path).map(|view| self.check(view))
    }
}

#[cfg(test)]
#[path = "tests/guard_tests.rs"]
mod tests;
