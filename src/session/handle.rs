//! SessionHandle - client interface to the session actor

use eyre::{Result, eyre};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use super::messages::SessionRequest;
use super::state::SessionState;
use crate::domain::KsaField;

/// Handle for interacting with a running session
///
/// Cloneable; every operation is async and non-blocking. The only failure
/// mode is the actor being gone (channel closed).
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionRequest>,
}

impl SessionHandle {
    pub(crate) fn new(tx: mpsc::Sender<SessionRequest>) -> Self {
        Self { tx }
    }

    /// Set one form field's value
    ///
    /// Editing the task field clears the other three fields and restarts
    /// the suggestion debounce window.
    pub async fn edit_field(&self, field: KsaField, value: impl Into<String>) -> Result<()> {
        debug!(field = %field.name(), "SessionHandle::edit_field: called");
        self.send(SessionRequest::EditField {
            field,
            value: value.into(),
        })
        .await
    }

    /// Toggle one mastery behavior checkbox
    pub async fn set_behavior(&self, name: impl Into<String>, selected: bool) -> Result<()> {
        let name = name.into();
        debug!(%name, %selected, "SessionHandle::set_behavior: called");
        self.send(SessionRequest::SetBehavior { name, selected }).await
    }

    /// Replace the custom mastery criterion text
    pub async fn set_custom(&self, text: impl Into<String>) -> Result<()> {
        debug!("SessionHandle::set_custom: called");
        self.send(SessionRequest::SetCustom { text: text.into() }).await
    }

    /// Trigger plan generation
    ///
    /// A no-op at the actor if the form is incomplete or a generation is
    /// already in flight.
    pub async fn generate(&self) -> Result<()> {
        debug!("SessionHandle::generate: called");
        self.send(SessionRequest::Generate).await
    }

    /// Reset the whole session to its initial defaults
    pub async fn clear_all(&self) -> Result<()> {
        debug!("SessionHandle::clear_all: called");
        self.send(SessionRequest::ClearAll).await
    }

    /// Snapshot the current session state
    pub async fn state(&self) -> Result<SessionState> {
        debug!("SessionHandle::state: called");
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(SessionRequest::State { reply_tx }).await?;

        reply_rx.await.map_err(|_| eyre!("Session shut down before reply"))
    }

    /// Shut the session actor down
    pub async fn shutdown(&self) -> Result<()> {
        debug!("SessionHandle::shutdown: called");
        self.send(SessionRequest::Shutdown).await
    }

    async fn send(&self, req: SessionRequest) -> Result<()> {
        self.tx.send(req).await.map_err(|_| eyre!("Session channel closed"))
    }
}
