//! The calendar sync engine.
//!
//! [`CalendarEngine`] is the single entry point the presentation layer
//! talks to: navigation signals come in through [`CalendarEngine::handle_navigation`],
//! mutation intents through the `submit_*` methods, and rendering reads
//! [`CalendarEngine::snapshot`]. The engine owns the local event store and
//! the window controller; the remote API and the token provider are
//! injected dependencies, never ambient state.
//!
//! Execution is single-task cooperative. The only suspension points are
//! the network calls; everything either side of an await runs under one
//! lock acquisition, so observers never see a half-applied write.

use tokio::sync::RwLock;
use tracing::{debug, info};

use calview_client::{
    normalize, normalize_page, ApiError, CalendarApi, CreatedEvent, EventDraft, TokenProvider,
};
use calview_core::{EventRecord, TimeWindow};

use crate::controller::{FetchPhase, WindowController};
use crate::error::{EngineError, EngineResult};
use crate::store::EventStore;

/// Which side of a successful update the store trusts.
///
/// The update response is not guaranteed to be in the normalized entry
/// shape, so the default is to rebuild the store entry from the submitted
/// fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconciliationStrategy {
    /// Rebuild the store entry from the submitted draft.
    #[default]
    TrustRequest,
    /// Normalize the server's echoed entry and store that. Fails with a
    /// malformed-record error when the response does not normalize.
    TrustResponse,
}

/// Mutable engine state, guarded as one unit so fetch-completion checks
/// and store writes are atomic with respect to each other.
#[derive(Debug, Default)]
struct EngineState {
    store: EventStore,
    controller: WindowController,
}

/// The calendar synchronization and mutation engine.
pub struct CalendarEngine<A, T> {
    api: A,
    tokens: T,
    strategy: ReconciliationStrategy,
    state: RwLock<EngineState>,
}

impl<A, T> CalendarEngine<A, T>
where
    A: CalendarApi,
    T: TokenProvider,
{
    /// Creates an engine over the given API and token provider, with the
    /// default (trust-request) reconciliation strategy.
    pub fn new(api: A, tokens: T) -> Self {
        Self::with_strategy(api, tokens, ReconciliationStrategy::default())
    }

    /// Creates an engine with an explicit reconciliation strategy.
    pub fn with_strategy(api: A, tokens: T, strategy: ReconciliationStrategy) -> Self {
        Self {
            api,
            tokens,
            strategy,
            state: RwLock::new(EngineState::default()),
        }
    }

    /// Returns the configured reconciliation strategy.
    pub fn strategy(&self) -> ReconciliationStrategy {
        self.strategy
    }

    /// Handles a navigation signal: fetches `window` and replaces the
    /// store with its normalized result.
    ///
    /// A navigation arriving while an earlier fetch is still in flight
    /// supersedes it; the superseded result is discarded on completion
    /// whether it succeeded or failed. On failure of the current fetch the
    /// store is left untouched and the error is returned.
    pub async fn handle_navigation(&self, window: TimeWindow) -> EngineResult<()> {
        let token = self.bearer()?;

        let tag = self.state.write().await.controller.begin_fetch(window.clone());

        let outcome = self.api.fetch_window(window.clone(), token).await;

        let mut state = self.state.write().await;
        if !state.controller.is_current(tag) {
            debug!(
                window_start = %window.start,
                "discarding superseded window fetch"
            );
            return Ok(());
        }

        state.controller.finish(tag);
        match outcome {
            Ok(raw_events) => {
                let events = normalize_page(&raw_events);
                info!(entries = events.len(), "window fetch complete");
                state.store.replace_window(window, events);
                Ok(())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Submits a create mutation.
    ///
    /// The store is not updated: the creation response is not trusted to
    /// be in the normalized shape, so the caller decides whether to show
    /// the confirmation (with any resolved join URL) or navigate to
    /// trigger a refetch.
    pub async fn submit_create(&self, draft: EventDraft) -> EngineResult<CreatedEvent> {
        let token = self.bearer()?;
        draft.validate()?;
        Ok(self.api.create_event(draft, token).await?)
    }

    /// Submits an update mutation for event `id` and reconciles the store
    /// entry according to the configured strategy.
    pub async fn submit_update(&self, id: &str, draft: EventDraft) -> EngineResult<()> {
        let token = self.bearer()?;
        draft.validate()?;

        let prior = self.state.read().await.store.get(id).cloned();
        let echoed = self.api.update_event(id.to_string(), draft.clone(), token).await?;

        let record = match self.strategy {
            ReconciliationStrategy::TrustRequest => draft.to_record(id, prior.as_ref()),
            ReconciliationStrategy::TrustResponse => {
                let raw = echoed.ok_or_else(|| {
                    ApiError::malformed(Some(id), "update response not in entry shape")
                })?;
                normalize(&raw)?
            }
        };

        // Applied unconditionally, even with a window fetch in flight.
        self.state.write().await.store.upsert(record);
        Ok(())
    }

    /// Submits a cancel mutation for event `id`, optionally sending `note`
    /// to attendees, and removes the entry on success.
    ///
    /// Cancelling an id the store does not hold (e.g. a double submit)
    /// fails explicitly with [`EngineError::UnknownEvent`] before any
    /// request is issued.
    pub async fn submit_cancel(&self, id: &str, note: Option<String>) -> EngineResult<()> {
        let token = self.bearer()?;

        if !self.state.read().await.store.contains(id) {
            return Err(EngineError::unknown_event(id));
        }

        self.api.cancel_event(id.to_string(), note, token).await?;

        self.state.write().await.store.remove(id);
        Ok(())
    }

    /// Signs out: clears the store and discards any in-flight fetch.
    pub async fn sign_out(&self) {
        let mut state = self.state.write().await;
        state.store.clear();
        state.controller.reset();
        info!("signed out; event store cleared");
    }

    /// A snapshot of the store ordered by start time.
    pub async fn snapshot(&self) -> Vec<EventRecord> {
        self.state.read().await.store.snapshot()
    }

    /// The event with the given id, if materialized.
    pub async fn event(&self, id: &str) -> Option<EventRecord> {
        self.state.read().await.store.get(id).cloned()
    }

    /// The current fetch phase (the presentation layer's loading signal).
    pub async fn phase(&self) -> FetchPhase {
        self.state.read().await.controller.phase()
    }

    /// The window currently materialized in the store, if any.
    pub async fn window(&self) -> Option<TimeWindow> {
        self.state.read().await.store.window().cloned()
    }

    /// Resolves the current bearer token, treating a missing or expired
    /// credential as unauthenticated without touching the network.
    fn bearer(&self) -> EngineResult<String> {
        match self.tokens.credential() {
            Some(credential) if !credential.is_expired() => Ok(credential.token),
            _ => Err(EngineError::NotAuthenticated),
        }
    }
}
