//! In-memory authority for who is signed in.
//!
//! `Session` wraps the `TokenStore` and owns the status/credential
//! pair. A credential record is held in memory iff the status is
//! `SignedIn`; every transition keeps the stored copy in step.
//!
//! The session is an explicitly constructed object: create it once at
//! process start, `hydrate()` before showing any authenticated screen,
//! then share it (behind `Arc`) with the API client and the app shell.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::store::TokenStore;

/// The persisted/in-memory credential bundle for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    /// Reserved for a future refresh flow; always empty today.
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: String::new(),
            user_id: user_id.into(),
        }
    }
}

/// Authentication status.
///
/// `Idle` exists only before the first `hydrate()` completes; no
/// transition leads back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    SignedOut,
    SignedIn,
}

struct SessionState {
    status: SessionStatus,
    credentials: Option<Credentials>,
}

pub struct Session {
    store: TokenStore,
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new(store: TokenStore) -> Self {
        Self {
            store,
            state: RwLock::new(SessionState {
                status: SessionStatus::Idle,
                credentials: None,
            }),
        }
    }

    /// Load any persisted credentials into memory.
    ///
    /// A found record transitions to `SignedIn`; a missing, unreadable,
    /// or corrupt record transitions to `SignedOut`. Never fails, and
    /// re-running it repeats the same decision for unchanged storage.
    pub async fn hydrate(&self) {
        // The write lock is held across the store read so a racing
        // sign-in or sign-out cannot interleave with the decision.
        let mut state = self.state.write().await;
        match self.store.load().await {
            Some(record) => {
                debug!(user_id = %record.user_id, "Hydrated stored session");
                state.status = SessionStatus::SignedIn;
                state.credentials = Some(record);
            }
            None => {
                debug!("No stored session, starting signed out");
                state.status = SessionStatus::SignedOut;
                state.credentials = None;
            }
        }
    }

    /// Persist the record and transition to `SignedIn`.
    ///
    /// A failed save is logged and the in-memory transition still
    /// happens; the stored copy will simply be missing on next launch.
    pub async fn sign_in(&self, record: Credentials) {
        let mut state = self.state.write().await;
        if let Err(e) = self.store.save(&record).await {
            warn!(error = %e, "Failed to persist credentials");
        }
        state.status = SessionStatus::SignedIn;
        state.credentials = Some(record);
    }

    /// Clear the stored record and transition to `SignedOut`.
    /// Safe to call when already signed out.
    pub async fn sign_out(&self) {
        let mut state = self.state.write().await;
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        state.status = SessionStatus::SignedOut;
        state.credentials = None;
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.read().await.status
    }

    pub async fn credentials(&self) -> Option<Credentials> {
        self.state.read().await.credentials.clone()
    }

    /// Get the bearer token if signed in
    pub async fn token(&self) -> Option<String> {
        self.state
            .read()
            .await
            .credentials
            .as_ref()
            .map(|c| c.access_token.clone())
    }

    /// Get the signed-in user's id
    pub async fn user_id(&self) -> Option<String> {
        self.state
            .read()
            .await
            .credentials
            .as_ref()
            .map(|c| c.user_id.clone())
    }

    pub async fn is_signed_in(&self) -> bool {
        self.status().await == SessionStatus::SignedIn
    }

    /// Ownership check for user-generated content ("is this mine?")
    pub async fn is_owner(&self, user_id: &str) -> bool {
        self.user_id().await.as_deref() == Some(user_id)
    }
}
