//! Per-screen view state holders.
//!
//! Each screen keeps its data in a [`ViewHandle`]. Loads take a ticket and
//! only the holder of the latest ticket may publish, so a response that
//! lands after the view was torn down or reloaded is dropped.

use std::{future::Future, sync::Arc};

use reqwest::multipart::Part;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::ClientError;

pub mod account;
pub mod awards;
pub mod businesses;
pub mod dashboard;
pub mod events;
pub mod meetings;
pub mod personnel;
pub mod pitches;
pub mod sponsors;

#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(ClientError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
struct ViewState<T> {
    generation: u64,
    phase: Phase<T>,
}

pub struct ViewHandle<T> {
    state: Arc<Mutex<ViewState<T>>>,
}

impl<T> Clone for ViewHandle<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for ViewHandle<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(ViewState {
                generation: 0,
                phase: Phase::Idle,
            })),
        }
    }
}

impl<T: Clone> ViewHandle<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin(&self) -> LoadTicket {
        let mut guard = self.state.lock().await;
        guard.generation += 1;
        guard.phase = Phase::Loading;
        LoadTicket(guard.generation)
    }

    /// Publishes a result if `ticket` is still current. Returns whether it was applied.
    pub async fn finish(&self, ticket: LoadTicket, result: Result<T, ClientError>) -> bool {
        let mut guard = self.state.lock().await;
        if guard.generation != ticket.0 {
            debug!(
                ticket = ticket.0,
                current = guard.generation,
                "discarding stale view result"
            );
            return false;
        }
        guard.phase = match result {
            Ok(data) => Phase::Ready(data),
            Err(err) => Phase::Failed(err),
        };
        true
    }

    pub async fn run<F>(&self, work: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let ticket = self.begin().await;
        let result = work.await;
        self.finish(ticket, result.clone()).await;
        result
    }

    /// Applies an in-place edit to ready data without a round trip.
    pub async fn update(&self, edit: impl FnOnce(&mut T)) {
        let mut guard = self.state.lock().await;
        if let Phase::Ready(data) = &mut guard.phase {
            edit(data);
        }
    }

    /// Invalidates any in-flight load and forgets the data.
    pub async fn teardown(&self) {
        let mut guard = self.state.lock().await;
        guard.generation += 1;
        guard.phase = Phase::Idle;
    }

    pub async fn phase(&self) -> Phase<T> {
        self.state.lock().await.phase.clone()
    }

    pub async fn data(&self) -> Option<T> {
        match &self.state.lock().await.phase {
            Phase::Ready(data) => Some(data.clone()),
            _ => None,
        }
    }

    pub async fn is_loading(&self) -> bool {
        matches!(self.state.lock().await.phase, Phase::Loading)
    }
}

/// A file attached to a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub(crate) fn into_part(self) -> Result<Part, ClientError> {
        let part = Part::bytes(self.bytes).file_name(self.filename);
        match self.mime_type {
            Some(mime) => part
                .mime_str(&mime)
                .map_err(|e| ClientError::InvalidInput(format!("invalid mime type '{mime}': {e}"))),
            None => Ok(part),
        }
    }
}

#[cfg(test)]
#[path = "../tests/view_state_tests.rs"]
mod tests;
