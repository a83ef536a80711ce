//! Session store: the current credential and identity, mirrored to durable storage.

use std::{collections::HashMap, sync::Arc};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::domain::Identity;
use storage::Storage;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub const CREDENTIAL_KEY: &str = "token";
pub const IDENTITY_KEY: &str = "user";

/// Durable key-value backend for the two session entries.
#[async_trait]
pub trait SessionPersistence: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>>;
    async fn store(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl SessionPersistence for Storage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        self.load_entry(key).await
    }

    async fn store(&self, key: &str, value: &str) -> Result<()> {
        self.store_entry(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.remove_entry(key).await.map(|_| ())
    }
}

/// Process-local persistence; clones share the same entries.
#[derive(Clone, Default)]
pub struct MemorySessionPersistence {
    entries: Arc<std::sync::Mutex<HashMap<String, String>>>,
}

impl MemorySessionPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl SessionPersistence for MemorySessionPersistence {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    async fn store(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Used when no durable storage could be opened.
pub struct UnavailableSessionPersistence;

#[async_trait]
impl SessionPersistence for UnavailableSessionPersistence {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Err(anyhow!("session storage unavailable while loading '{key}'"))
    }

    async fn store(&self, key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("session storage unavailable while storing '{key}'"))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        Err(anyhow!("session storage unavailable while removing '{key}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    credential: Option<String>,
    identity: Option<Identity>,
}

impl Session {
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// The identity only counts while a credential is present.
    pub fn identity(&self) -> Option<&Identity> {
        self.credential.as_ref()?;
        self.identity.as_ref()
    }

    pub fn auth_state(&self) -> AuthState {
        if self.credential.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }
}

/// Shared handle to the session; cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<watch::Sender<Session>>,
    persistence: Arc<dyn SessionPersistence>,
}

impl SessionStore {
    /// Starts unauthenticated without reading storage.
    pub fn new(persistence: Arc<dyn SessionPersistence>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            state: Arc::new(state),
            persistence,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionPersistence::new()))
    }

    /// Rebuilds the session from storage. Missing or unreadable entries mean
    /// "unauthenticated", never an error.
    pub async fn restore(persistence: Arc<dyn SessionPersistence>) -> Self {
        let store = Self::new(persistence);

        let credential = match store.persistence.load(CREDENTIAL_KEY).await {
            Ok(value) => value.filter(|token| !token.is_empty()),
            Err(err) => {
                warn!(error = %err, "failed to read stored credential; starting signed out");
                None
            }
        };

        let Some(credential) = credential else {
            debug!("no stored credential");
            return store;
        };

        let identity = match store.persistence.load(IDENTITY_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => Some(identity),
                Err(err) => {
                    warn!(error = %err, "stored identity is not valid json; ignoring it");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "failed to read stored identity");
                None
            }
        };

        info!(has_identity = identity.is_some(), "session restored from storage");
        store.state.send_replace(Session {
            credential: Some(credential),
            identity,
        });
        store
    }

    /// Sets credential and identity together, then persists both.
    /// Storage failures are logged; the in-memory session stays authoritative.
    pub async fn sign_in(&self, token: impl Into<String>, identity: Identity) {
        let token = token.into();
        let serialized_identity = serde_json::to_string(&identity);
        self.state.send_replace(Session {
            credential: Some(token.clone()),
            identity: Some(identity),
        });

        if let Err(err) = self.persistence.store(CREDENTIAL_KEY, &token).await {
            warn!(error = %err, "failed to persist credential");
        }
        match serialized_identity {
            Ok(raw) => {
                if let Err(err) = self.persistence.store(IDENTITY_KEY, &raw).await {
                    warn!(error = %err, "failed to persist identity");
                }
            }
            Err(err) => warn!(error = %err, "failed to serialize identity"),
        }
    }

    /// Clears the session and both storage entries. Safe to call repeatedly.
    pub async fn sign_out(&self) {
        let was_signed_in = self.state.send_replace(Session::default()).credential.is_some();
        if was_signed_in {
            info!("session cleared");
        }

        for key in [CREDENTIAL_KEY, IDENTITY_KEY] {
            if let Err(err) = self.persistence.remove(key).await {
                warn!(error = %err, key, "failed to erase stored session entry");
            }
        }
    }

    /// Replaces the cached identity of the current session. Ignored when
    /// signed out so the identity never outlives its credential.
    pub async fn update_identity(&self, identity: Identity) {
        let updated = self.state.send_if_modified(|session| {
            if session.credential.is_none() || session.identity.as_ref() == Some(&identity) {
                return false;
            }
            session.identity = Some(identity.clone());
            true
        });

        if !updated {
            return;
        }
        match serde_json::to_string(&identity) {
            Ok(raw) => {
                if let Err(err) = self.persistence.store(IDENTITY_KEY, &raw).await {
                    warn!(error = %err, "failed to persist identity");
                }
            }
            Err(err) => warn!(error = %err, "failed to serialize identity"),
        }
    }

    pub fn current_credential(&self) -> Option<String> {
        self.state.borrow().credential.clone()
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn auth_state(&self) -> AuthState {
        self.state.borrow().auth_state()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
