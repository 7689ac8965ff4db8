//! Session actor implementation

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::handle::SessionHandle;
use super::messages::SessionRequest;
use super::state::{GenerationStatus, SessionState};
use crate::config::{Config, SessionConfig};
use crate::domain::{KsaField, LearningPlan};
use crate::generation::{FieldSuggestions, Generator};
use crate::llm::GenerationError;

/// Fallback error text when a plan failure carries no message of its own
const GENERIC_PLAN_ERROR: &str = "Plan generation failed. Please try again.";

/// The session actor: owns the state and the request channel
pub struct Session {
    config: SessionConfig,
    generator: Arc<Generator>,
    tx: mpsc::Sender<SessionRequest>,
    rx: mpsc::Receiver<SessionRequest>,
}

impl Session {
    /// Create a new session actor
    pub fn new(config: &Config, generator: Arc<Generator>) -> Self {
        let (tx, rx) = mpsc::channel(config.session.channel_buffer);
        Self {
            config: config.session.clone(),
            generator,
            tx,
            rx,
        }
    }

    /// Create a handle for interacting with this session
    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(self.tx.clone())
    }

    /// Run the session actor until shutdown
    ///
    /// This consumes the session. All state mutation happens here, in
    /// response to one message at a time.
    pub async fn run(mut self) {
        let mut inner = Inner {
            state: SessionState::default(),
            suggest_seq: 0,
            plan_epoch: 0,
            config: self.config,
            generator: self.generator,
            tx: self.tx,
        };

        info!("Session started");

        while let Some(req) = self.rx.recv().await {
            match req {
                SessionRequest::EditField { field, value } => inner.on_edit_field(field, value),
                SessionRequest::SetBehavior { name, selected } => inner.on_set_behavior(&name, selected),
                SessionRequest::SetCustom { text } => inner.on_set_custom(text),
                SessionRequest::Generate => inner.on_generate(),
                SessionRequest::ClearAll => inner.on_clear_all(),
                SessionRequest::State { reply_tx } => {
                    let _ = reply_tx.send(inner.state.clone());
                }
                SessionRequest::Shutdown => {
                    debug!("run: shutdown requested");
                    break;
                }
                SessionRequest::DebounceElapsed { seq } => inner.on_debounce_elapsed(seq),
                SessionRequest::SuggestionsReady { seq, result } => inner.on_suggestions_ready(seq, result),
                SessionRequest::PlanReady { epoch, result } => inner.on_plan_ready(epoch, result),
            }
        }

        info!("Session stopped");
    }
}

/// Actor-internal state: the session snapshot plus the staleness counters
struct Inner {
    state: SessionState,
    /// Bumped on every task edit and clear-all. A debounce window or
    /// suggestion fetch only takes effect if its tag still matches.
    suggest_seq: u64,
    /// Bumped on every generation start and clear-all. A resolving plan
    /// fetch only takes effect if its tag still matches.
    plan_epoch: u64,
    config: SessionConfig,
    generator: Arc<Generator>,
    tx: mpsc::Sender<SessionRequest>,
}

impl Inner {
    fn on_edit_field(&mut self, field: KsaField, value: String) {
        debug!(field = %field.name(), "on_edit_field: called");
        if field == KsaField::Task {
            // A new task invalidates prior suggestions and answers.
            self.state.ksa.task = value;
            self.state.ksa.knowledge.clear();
            self.state.ksa.skills.clear();
            self.state.ksa.abilities.clear();
            self.state.suggested = Default::default();
            self.restart_debounce();
        } else {
            self.state.ksa.set(field, value);
            // The value is now user-authored, whatever it was before.
            self.state.suggested.set(field, false);
        }
    }

    /// Cancel any pending debounce window and start a fresh one
    ///
    /// Cancellation is by supersession: the sleep task itself always fires,
    /// but its tag no longer matches, so it has no effect.
    fn restart_debounce(&mut self) {
        self.suggest_seq += 1;
        let seq = self.suggest_seq;
        let delay = Duration::from_millis(self.config.debounce_ms);
        let tx = self.tx.clone();

        debug!(%seq, ?delay, "restart_debounce: window started");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(SessionRequest::DebounceElapsed { seq }).await;
        });
    }

    fn on_debounce_elapsed(&mut self, seq: u64) {
        if seq != self.suggest_seq {
            debug!(%seq, current = %self.suggest_seq, "on_debounce_elapsed: superseded window, ignoring");
            return;
        }

        let task = self.state.ksa.task.trim().to_string();
        if task.is_empty() {
            debug!("on_debounce_elapsed: task blank, nothing to suggest");
            return;
        }

        let fields = self.state.ksa.blank_suggestible_fields();
        if fields.is_empty() {
            debug!("on_debounce_elapsed: no blank fields, nothing to suggest");
            return;
        }

        debug!(%seq, field_count = %fields.len(), "on_debounce_elapsed: fetching suggestions");
        let generator = self.generator.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = generator.request_suggestions(&task, &fields).await;
            let _ = tx.send(SessionRequest::SuggestionsReady { seq, result }).await;
        });
    }

    fn on_suggestions_ready(&mut self, seq: u64, result: Result<FieldSuggestions, GenerationError>) {
        if seq != self.suggest_seq {
            debug!(%seq, current = %self.suggest_seq, "on_suggestions_ready: stale fetch, discarding");
            return;
        }

        let suggestions = match result {
            Ok(s) => s,
            Err(e) => {
                // Non-fatal: the user just sees an empty field.
                warn!(error = %e, "on_suggestions_ready: suggestion fetch failed");
                return;
            }
        };

        for field in KsaField::SUGGESTIBLE {
            // Merge guard: the user may have typed into the field while the
            // request was in flight. Only fill fields still blank now.
            if let Some(value) = suggestions.get(field)
                && self.state.ksa.is_blank(field)
            {
                debug!(field = %field.name(), "on_suggestions_ready: filling field");
                self.state.ksa.set(field, value.to_string());
                self.state.suggested.set(field, true);
            }
        }
    }

    fn on_set_behavior(&mut self, name: &str, selected: bool) {
        match self.state.mastery.behaviors.get_mut(name) {
            Some(value) => {
                debug!(%name, %selected, "on_set_behavior: toggled");
                *value = selected;
            }
            None => {
                warn!(%name, "on_set_behavior: unknown behavior, ignoring");
            }
        }
    }

    fn on_set_custom(&mut self, text: String) {
        debug!(len = %text.len(), "on_set_custom: called");
        self.state.mastery.custom = text;
    }

    fn on_generate(&mut self) {
        if self.state.status == GenerationStatus::Generating {
            debug!("on_generate: already generating, rejecting");
            return;
        }
        if !self.state.ksa.is_complete() {
            debug!("on_generate: form incomplete, ignoring");
            return;
        }

        self.state.plan = None;
        self.state.error = None;
        self.state.status = GenerationStatus::Generating;
        self.plan_epoch += 1;
        let epoch = self.plan_epoch;

        info!(%epoch, "on_generate: starting plan generation");
        let generator = self.generator.clone();
        let ksa = self.state.ksa.clone();
        let mastery = self.state.mastery.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = generator.request_plan(&ksa, &mastery).await;
            let _ = tx.send(SessionRequest::PlanReady { epoch, result }).await;
        });
    }

    fn on_plan_ready(&mut self, epoch: u64, result: Result<LearningPlan, GenerationError>) {
        if epoch != self.plan_epoch {
            debug!(%epoch, current = %self.plan_epoch, "on_plan_ready: stale attempt, discarding");
            return;
        }

        match result {
            Ok(plan) => {
                info!(%epoch, "on_plan_ready: plan generated");
                self.state.plan = Some(plan);
                self.state.error = None;
            }
            Err(e) => {
                warn!(%epoch, blocked = %e.is_blocked(), error = %e, "on_plan_ready: plan generation failed");
                let message = e.user_message();
                self.state.error = Some(if message.trim().is_empty() {
                    GENERIC_PLAN_ERROR.to_string()
                } else {
                    message
                });
                self.state.plan = None;
            }
        }
        self.state.status = GenerationStatus::Idle;
    }

    fn on_clear_all(&mut self) {
        info!("on_clear_all: resetting session");
        self.state = SessionState::default();
        // Orphan every in-flight window and request.
        self.suggest_seq += 1;
        self.plan_epoch += 1;
    }
}
