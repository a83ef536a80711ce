use std::sync::Arc;

use shared::{
    domain::{MeetingId, ReviewStatus, ScheduledMeeting},
    protocol::ReviewMeetingRequest,
};
use tokio::sync::Mutex;
use tracing::info;

use super::{pitches::PitchFilters, ViewHandle};
use crate::{
    error::ClientError,
    gateway::ApiGateway,
    review::{apply_filters, RecencyWindow, Reviewed, StatusFilter},
};

/// Scheduled meetings share the pitch review model and filters.
#[derive(Clone)]
pub struct MeetingsScreen {
    gateway: ApiGateway,
    view: ViewHandle<Vec<ScheduledMeeting>>,
    filters: Arc<Mutex<PitchFilters>>,
}

impl MeetingsScreen {
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            view: ViewHandle::new(),
            filters: Arc::new(Mutex::new(PitchFilters::default())),
        }
    }

    pub fn view(&self) -> &ViewHandle<Vec<ScheduledMeeting>> {
        &self.view
    }

    async fn fetch(&self) -> Result<Vec<ScheduledMeeting>, ClientError> {
        let meetings: Option<Vec<ScheduledMeeting>> = self
            .gateway
            .get_json("/admin/get-all-scheduled-meetings")
            .await?;
        Ok(meetings.unwrap_or_default())
    }

    pub async fn load(&self) -> Result<Vec<ScheduledMeeting>, ClientError> {
        self.view.run(self.fetch()).await
    }

    pub async fn set_window(&self, window: RecencyWindow) {
        self.filters.lock().await.window = window;
    }

    pub async fn set_status_filter(&self, status: StatusFilter) {
        self.filters.lock().await.status = status;
    }

    pub async fn visible(&self) -> Vec<ScheduledMeeting> {
        let filters = *self.filters.lock().await;
        let meetings = self.view.data().await.unwrap_or_default();
        apply_filters(&meetings, filters.window, filters.status)
    }

    pub async fn change_status(
        &self,
        meeting_id: MeetingId,
        target: ReviewStatus,
    ) -> Result<Vec<ScheduledMeeting>, ClientError> {
        let current = self.view.data().await.and_then(|meetings| {
            meetings
                .iter()
                .find(|meeting| meeting.id == meeting_id)
                .and_then(|meeting| meeting.review()?.status())
        });
        if let Some(current) = current {
            current.transition(target)?;
        }

        self.gateway
            .patch_json_discard(
                "/admin/review-meeting-schedule",
                &ReviewMeetingRequest {
                    meeting_id,
                    meeting_link: String::new(),
                    review_status: target,
                },
            )
            .await?;
        info!(%meeting_id, status = %target, "meeting review status updated");
        self.load().await
    }
}
