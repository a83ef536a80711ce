use std::sync::Arc;

use shared::domain::{Pitch, PitchId, Review, ReviewStatus};
use tokio::sync::Mutex;

use super::ViewHandle;
use crate::{
    error::ClientError,
    guard::View,
    review::{apply_filters, PitchReviewEngine, PitchSection, RecencyWindow, SectionView, StatusFilter},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PitchFilters {
    pub window: RecencyWindow,
    pub status: StatusFilter,
}

/// The pitch list with its two filters.
#[derive(Clone)]
pub struct PitchesScreen {
    engine: PitchReviewEngine,
    view: ViewHandle<Vec<Pitch>>,
    filters: Arc<Mutex<PitchFilters>>,
}

impl PitchesScreen {
    pub fn new(engine: PitchReviewEngine) -> Self {
        Self {
            engine,
            view: ViewHandle::new(),
            filters: Arc::new(Mutex::new(PitchFilters::default())),
        }
    }

    pub fn view(&self) -> &ViewHandle<Vec<Pitch>> {
        &self.view
    }

    pub async fn load(&self) -> Result<Vec<Pitch>, ClientError> {
        self.view.run(self.engine.list_pitches()).await
    }

    pub async fn set_window(&self, window: RecencyWindow) {
        self.filters.lock().await.window = window;
    }

    pub async fn set_status_filter(&self, status: StatusFilter) {
        self.filters.lock().await.status = status;
    }

    pub async fn filters(&self) -> PitchFilters {
        *self.filters.lock().await
    }

    /// Derived from the loaded collection on every call.
    pub async fn visible(&self) -> Vec<Pitch> {
        let filters = self.filters().await;
        let pitches = self.view.data().await.unwrap_or_default();
        apply_filters(&pitches, filters.window, filters.status)
    }

    /// Transitions one pitch and reloads the authoritative list. A rejected
    /// transition or failed request leaves the loaded list untouched.
    pub async fn change_status(
        &self,
        pitch_id: PitchId,
        target: ReviewStatus,
    ) -> Result<Vec<Pitch>, ClientError> {
        let current = self.view.data().await.and_then(|pitches| {
            pitches
                .into_iter()
                .find(|pitch| pitch.id == pitch_id)
                .and_then(|pitch| pitch.review.as_ref().and_then(Review::status))
        });
        if let Some(current) = current {
            current.transition(target)?;
        }

        self.engine.set_review_status(pitch_id, target).await?;
        self.load().await
    }

    pub fn open(&self, pitch_id: PitchId) -> View {
        View::PitchSection {
            pitch_id,
            section: PitchSection::Personal,
        }
    }
}

/// One step of the review pipeline for a single pitch.
#[derive(Clone)]
pub struct PitchSectionScreen {
    engine: PitchReviewEngine,
    pitch_id: PitchId,
    section: PitchSection,
    view: ViewHandle<SectionView>,
}

impl PitchSectionScreen {
    pub fn new(engine: PitchReviewEngine, pitch_id: PitchId, section: PitchSection) -> Self {
        Self {
            engine,
            pitch_id,
            section,
            view: ViewHandle::new(),
        }
    }

    pub fn section(&self) -> PitchSection {
        self.section
    }

    pub fn view(&self) -> &ViewHandle<SectionView> {
        &self.view
    }

    pub async fn load(&self) -> Result<SectionView, ClientError> {
        self.view
            .run(self.engine.section(self.pitch_id, self.section))
            .await
    }

    /// Where "Next" leads; `None` on the last step.
    pub fn next(&self) -> Option<View> {
        self.section.next().map(|section| View::PitchSection {
            pitch_id: self.pitch_id,
            section,
        })
    }
}
