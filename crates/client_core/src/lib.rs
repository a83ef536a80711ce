use std::sync::Arc;

use shared::domain::{AwardId, PitchId};
use storage::Storage;
use tokio::sync::broadcast;
use tracing::{info, warn};

pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod review;
pub mod screens;
pub mod session;

pub use config::{load_config, ClientConfig};
pub use error::ClientError;
pub use gateway::{ApiGateway, ClientEvent};
pub use guard::{GuardDecision, RouteGuard, View};
pub use review::{PitchReviewEngine, PitchSection, RecencyWindow, StatusFilter};
pub use session::{
    AuthState, MemorySessionPersistence, SessionPersistence, SessionStore,
    UnavailableSessionPersistence,
};

use screens::{
    account::AccountController,
    awards::{AwardsScreen, NomineesScreen},
    businesses::BusinessesScreen,
    dashboard::DashboardScreen,
    events::EventsScreen,
    meetings::MeetingsScreen,
    personnel::PersonnelScreen,
    pitches::{PitchSectionScreen, PitchesScreen},
    sponsors::SponsorsScreen,
};

/// Opens durable session storage, falling back to a backend that refuses
/// every operation so the session still works in memory.
pub async fn open_session_persistence(session_db_url: &str) -> Arc<dyn SessionPersistence> {
    match Storage::new(session_db_url).await {
        Ok(storage) => Arc::new(storage),
        Err(err) => {
            warn!(%session_db_url, error = %err, "session storage unavailable; session will not survive restart");
            Arc::new(UnavailableSessionPersistence)
        }
    }
}

/// The wired-up dashboard core: one session, one gateway, one guard.
#[derive(Clone)]
pub struct AdminClient {
    session: SessionStore,
    gateway: ApiGateway,
    guard: RouteGuard,
    engine: PitchReviewEngine,
}

impl AdminClient {
    pub fn new(session: SessionStore, api_base_url: &str) -> Result<Self, ClientError> {
        let gateway = ApiGateway::new(api_base_url, session.clone())?;
        Ok(Self::from_gateway(gateway))
    }

    pub fn from_gateway(gateway: ApiGateway) -> Self {
        let session = gateway.session().clone();
        Self {
            guard: RouteGuard::new(session.clone()),
            engine: PitchReviewEngine::new(gateway.clone()),
            session,
            gateway,
        }
    }

    /// Validates `config`, restores the stored session and connects.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let persistence = open_session_persistence(&config.session_db_url).await;
        let session = SessionStore::restore(persistence).await;
        info!(api_base_url = %config.api_base_url, auth = ?session.auth_state(), "client ready");
        Self::new(session, &config.api_base_url)
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub fn engine(&self) -> &PitchReviewEngine {
        &self.engine
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.gateway.subscribe_events()
    }

    pub fn account(&self) -> AccountController {
        AccountController::new(self.gateway.clone())
    }

    pub fn dashboard(&self) -> DashboardScreen {
        DashboardScreen::new(self.gateway.clone())
    }

    pub fn pitches(&self) -> PitchesScreen {
        PitchesScreen::new(self.engine.clone())
    }

    pub fn pitch_section(&self, pitch_id: PitchId, section: PitchSection) -> PitchSectionScreen {
        PitchSectionScreen::new(self.engine.clone(), pitch_id, section)
    }

    pub fn meetings(&self) -> MeetingsScreen {
        MeetingsScreen::new(self.gateway.clone())
    }

    pub fn awards(&self) -> AwardsScreen {
        AwardsScreen::new(self.gateway.clone())
    }

    pub fn nominees(&self, award_id: AwardId) -> NomineesScreen {
        NomineesScreen::new(self.gateway.clone(), award_id)
    }

    pub fn businesses(&self) -> BusinessesScreen {
        BusinessesScreen::new(self.gateway.clone())
    }

    pub fn personnel(&self) -> PersonnelScreen {
        PersonnelScreen::new(self.gateway.clone())
    }

    pub fn sponsors(&self) -> SponsorsScreen {
        SponsorsScreen::new(self.gateway.clone())
    }

    pub fn events(&self) -> EventsScreen {
        EventsScreen::new(self.gateway.clone())
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
