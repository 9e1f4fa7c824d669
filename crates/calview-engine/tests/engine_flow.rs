//! Engine flow tests with scripted calendar APIs.
//!
//! These exercise the ordering and reconciliation rules without a
//! network: window replacement is atomic, superseded fetches are
//! discarded, mutations edit exactly one key, and every failure leaves
//! the store on its last good snapshot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::oneshot;

use calview_client::raw::RawDateTime;
use calview_client::{
    ApiError, ApiResult, BoxFuture, CalendarApi, CreatedEvent, Credential, DraftAttendee,
    EventDraft, RawEvent, StaticTokenProvider,
};
use calview_core::TimeWindow;
use calview_engine::{CalendarEngine, EngineError, FetchPhase, ReconciliationStrategy};

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

fn month_window(month: u32) -> TimeWindow {
    let start = Utc.with_ymd_and_hms(2023, month, 1, 0, 0, 0).unwrap();
    let end = if month == 12 {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    } else {
        Utc.with_ymd_and_hms(2023, month + 1, 1, 0, 0, 0).unwrap()
    };
    TimeWindow::new(start, end)
}

fn raw_event(id: &str, day: u32, hour: u32) -> RawEvent {
    RawEvent {
        id: Some(id.to_string()),
        subject: Some(format!("Event {id}")),
        start: Some(RawDateTime::utc(format!("2023-11-{day:02}T{hour:02}:00:00"))),
        end: Some(RawDateTime::utc(format!("2023-11-{day:02}T{hour:02}:30:00"))),
        ..RawEvent::default()
    }
}

fn signed_in() -> StaticTokenProvider {
    StaticTokenProvider::with_credential(Credential::new(
        "tok",
        Utc::now() + chrono::Duration::hours(1),
    ))
}

fn expired() -> StaticTokenProvider {
    StaticTokenProvider::with_credential(Credential::new(
        "tok",
        Utc::now() - chrono::Duration::minutes(1),
    ))
}

fn sample_draft() -> EventDraft {
    EventDraft::new(
        "Updated subject",
        utc(2023, 11, 6, 9, 0, 0),
        utc(2023, 11, 6, 10, 0, 0),
    )
    .with_body("New agenda")
    .with_attendee(DraftAttendee::new("Bilal", "bilal@example.com"))
}

/// Records calls and answers immediately from scripted results.
#[derive(Default)]
struct StubApi {
    fetch_results: Mutex<HashMap<i64, ApiResult<Vec<RawEvent>>>>,
    update_echo: Mutex<Option<RawEvent>>,
    calls: Mutex<Vec<String>>,
}

impl StubApi {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn script_fetch(&self, window: &TimeWindow, result: ApiResult<Vec<RawEvent>>) {
        self.fetch_results
            .lock()
            .unwrap()
            .insert(window.start.timestamp(), result);
    }

    fn script_update_echo(&self, echo: Option<RawEvent>) {
        *self.update_echo.lock().unwrap() = echo;
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CalendarApi for StubApi {
    fn fetch_window(
        &self,
        window: TimeWindow,
        _token: String,
    ) -> BoxFuture<'_, ApiResult<Vec<RawEvent>>> {
        self.calls.lock().unwrap().push("fetch".to_string());
        let result = self
            .fetch_results
            .lock()
            .unwrap()
            .remove(&window.start.timestamp())
            .unwrap_or_else(|| Err(ApiError::transport("no scripted fetch for window")));
        Box::pin(async move { result })
    }

    fn create_event(
        &self,
        _draft: EventDraft,
        _token: String,
    ) -> BoxFuture<'_, ApiResult<CreatedEvent>> {
        self.calls.lock().unwrap().push("create".to_string());
        Box::pin(async move {
            Ok(CreatedEvent {
                id: Some("evt-new".to_string()),
                online_meeting_url: Some("https://teams.microsoft.com/l/meetup-join/new".into()),
            })
        })
    }

    fn update_event(
        &self,
        _id: String,
        _draft: EventDraft,
        _token: String,
    ) -> BoxFuture<'_, ApiResult<Option<RawEvent>>> {
        self.calls.lock().unwrap().push("update".to_string());
        let echo = self.update_echo.lock().unwrap().clone();
        Box::pin(async move { Ok(echo) })
    }

    fn cancel_event(
        &self,
        _id: String,
        _note: Option<String>,
        _token: String,
    ) -> BoxFuture<'_, ApiResult<()>> {
        self.calls.lock().unwrap().push("cancel".to_string());
        Box::pin(async move { Ok(()) })
    }
}

/// Holds each fetch open until the test releases it, so completion order
/// can be forced.
#[derive(Default)]
struct GatedApi {
    gates: Mutex<HashMap<i64, oneshot::Receiver<ApiResult<Vec<RawEvent>>>>>,
    started: Mutex<Vec<i64>>,
}

impl GatedApi {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Scripts a gated fetch for `window`; the returned sender releases it.
    fn gate(&self, window: &TimeWindow) -> oneshot::Sender<ApiResult<Vec<RawEvent>>> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .insert(window.start.timestamp(), rx);
        tx
    }

    /// Waits until `n` fetches have been issued.
    async fn wait_for_started(&self, n: usize) {
        loop {
            if self.started.lock().unwrap().len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }
}

impl CalendarApi for GatedApi {
    fn fetch_window(
        &self,
        window: TimeWindow,
        _token: String,
    ) -> BoxFuture<'_, ApiResult<Vec<RawEvent>>> {
        let key = window.start.timestamp();
        let gate = self.gates.lock().unwrap().remove(&key);
        self.started.lock().unwrap().push(key);
        Box::pin(async move {
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(ApiError::transport("gate dropped"))),
                None => Err(ApiError::transport("no gate scripted for window")),
            }
        })
    }

    fn create_event(
        &self,
        _draft: EventDraft,
        _token: String,
    ) -> BoxFuture<'_, ApiResult<CreatedEvent>> {
        Box::pin(async move { Err(ApiError::transport("not scripted")) })
    }

    fn update_event(
        &self,
        _id: String,
        _draft: EventDraft,
        _token: String,
    ) -> BoxFuture<'_, ApiResult<Option<RawEvent>>> {
        Box::pin(async move { Err(ApiError::transport("not scripted")) })
    }

    fn cancel_event(
        &self,
        _id: String,
        _note: Option<String>,
        _token: String,
    ) -> BoxFuture<'_, ApiResult<()>> {
        Box::pin(async move { Err(ApiError::transport("not scripted")) })
    }
}

/// Navigates once with a scripted page so the store holds known events.
async fn materialize(
    engine: &CalendarEngine<Arc<StubApi>, StaticTokenProvider>,
    api: &StubApi,
    events: Vec<RawEvent>,
) {
    let window = month_window(11);
    api.script_fetch(&window, Ok(events));
    engine.handle_navigation(window).await.unwrap();
}

#[tokio::test]
async fn navigation_replaces_store_with_normalized_window() {
    let api = StubApi::new();
    let engine = CalendarEngine::new(api.clone(), signed_in());

    materialize(&engine, &api, vec![raw_event("evt-2", 7, 10), raw_event("evt-1", 6, 9)]).await;

    let snapshot = engine.snapshot().await;
    let ids: Vec<_> = snapshot.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["evt-1", "evt-2"]); // ordered by start
    assert_eq!(engine.phase().await, FetchPhase::Idle);
    assert_eq!(engine.window().await, Some(month_window(11)));
}

#[tokio::test]
async fn malformed_entries_are_skipped_not_fatal() {
    let api = StubApi::new();
    let engine = CalendarEngine::new(api.clone(), signed_in());

    let missing_start = RawEvent {
        id: Some("evt-bad".to_string()),
        subject: Some("Broken".to_string()),
        start: None,
        end: Some(RawDateTime::utc("2023-11-06T10:00:00")),
        ..RawEvent::default()
    };

    materialize(
        &engine,
        &api,
        vec![raw_event("evt-1", 6, 9), missing_start, raw_event("evt-2", 7, 10)],
    )
    .await;

    let ids: Vec<_> = engine.snapshot().await.iter().map(|e| e.id.clone()).collect();
    assert_eq!(ids, ["evt-1", "evt-2"]);
}

#[tokio::test]
async fn last_window_wins_over_late_completion() {
    let api = GatedApi::new();
    let engine = Arc::new(CalendarEngine::new(api.clone(), signed_in()));

    let october = month_window(10);
    let november = month_window(11);
    let release_october = api.gate(&october);
    let release_november = api.gate(&november);

    // Navigation to October starts first...
    let engine_a = engine.clone();
    let october_task =
        tokio::spawn(async move { engine_a.handle_navigation(month_window(10)).await });
    api.wait_for_started(1).await;

    // ...then the user moves on to November while October is in flight.
    let engine_b = engine.clone();
    let november_task =
        tokio::spawn(async move { engine_b.handle_navigation(month_window(11)).await });
    api.wait_for_started(2).await;

    // November completes first; October completes late.
    release_november
        .send(Ok(vec![raw_event("nov-1", 6, 9), raw_event("nov-2", 7, 10)]))
        .unwrap();
    november_task.await.unwrap().unwrap();

    release_october
        .send(Ok(vec![raw_event("oct-1", 2, 9)]))
        .unwrap();
    october_task.await.unwrap().unwrap();

    // The store is exactly November's result; nothing of October's
    // late-arriving set leaked in.
    let ids: Vec<_> = engine.snapshot().await.iter().map(|e| e.id.clone()).collect();
    assert_eq!(ids, ["nov-1", "nov-2"]);
    assert_eq!(engine.window().await, Some(month_window(11)));
    assert_eq!(engine.phase().await, FetchPhase::Idle);
}

#[tokio::test]
async fn failed_fetch_leaves_last_good_snapshot() {
    let api = StubApi::new();
    let engine = CalendarEngine::new(api.clone(), signed_in());

    materialize(&engine, &api, vec![raw_event("evt-1", 6, 9)]).await;

    let december = month_window(12);
    api.script_fetch(&december, Err(ApiError::transport_status(500, "boom")));

    let error = engine.handle_navigation(december).await.unwrap_err();
    assert!(matches!(error, EngineError::Api(ApiError::Transport { .. })));

    // Store untouched, engine still usable.
    let ids: Vec<_> = engine.snapshot().await.iter().map(|e| e.id.clone()).collect();
    assert_eq!(ids, ["evt-1"]);
    assert_eq!(engine.phase().await, FetchPhase::Idle);
}

#[tokio::test]
async fn create_returns_outcome_without_touching_store() {
    let api = StubApi::new();
    let engine = CalendarEngine::new(api.clone(), signed_in());

    materialize(&engine, &api, vec![raw_event("evt-1", 6, 9)]).await;

    let created = engine.submit_create(sample_draft()).await.unwrap();
    assert_eq!(created.id.as_deref(), Some("evt-new"));
    assert!(created.online_meeting_url.is_some());

    // The created event is not auto-inserted; the caller decides.
    assert_eq!(engine.snapshot().await.len(), 1);
}

#[tokio::test]
async fn create_validation_rejects_before_dispatch() {
    let api = StubApi::new();
    let engine = CalendarEngine::new(api.clone(), signed_in());

    let inverted = EventDraft::new(
        "Backwards",
        utc(2023, 11, 6, 10, 0, 0),
        utc(2023, 11, 6, 9, 0, 0),
    );

    let error = engine.submit_create(inverted).await.unwrap_err();
    assert!(matches!(
        error,
        EngineError::Api(ApiError::InvalidDraft { .. })
    ));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn update_trust_request_reflects_submitted_fields() {
    let api = StubApi::new();
    let engine = CalendarEngine::with_strategy(
        api.clone(),
        signed_in(),
        ReconciliationStrategy::TrustRequest,
    );

    materialize(&engine, &api, vec![raw_event("evt-1", 6, 9)]).await;

    // The server echoes something entirely different; trust-request
    // ignores it.
    api.script_update_echo(Some(raw_event("evt-1", 20, 23)));

    engine.submit_update("evt-1", sample_draft()).await.unwrap();

    let record = engine.event("evt-1").await.unwrap();
    assert_eq!(record.title, "Updated subject");
    assert_eq!(record.start, utc(2023, 11, 6, 9, 0, 0));
    assert_eq!(record.end, utc(2023, 11, 6, 10, 0, 0));
    assert_eq!(record.attendees.len(), 1);
    assert_eq!(record.attendees[0].address, "bilal@example.com");
}

#[tokio::test]
async fn update_trust_response_stores_normalized_echo() {
    let api = StubApi::new();
    let engine = CalendarEngine::with_strategy(
        api.clone(),
        signed_in(),
        ReconciliationStrategy::TrustResponse,
    );

    materialize(&engine, &api, vec![raw_event("evt-1", 6, 9)]).await;
    api.script_update_echo(Some(raw_event("evt-1", 20, 15)));

    engine.submit_update("evt-1", sample_draft()).await.unwrap();

    let record = engine.event("evt-1").await.unwrap();
    assert_eq!(record.title, "Event evt-1"); // from the echo, not the draft
    assert_eq!(record.start, utc(2023, 11, 20, 15, 0, 0));
}

#[tokio::test]
async fn update_trust_response_fails_on_unusable_echo() {
    let api = StubApi::new();
    let engine = CalendarEngine::with_strategy(
        api.clone(),
        signed_in(),
        ReconciliationStrategy::TrustResponse,
    );

    materialize(&engine, &api, vec![raw_event("evt-1", 6, 9)]).await;
    api.script_update_echo(None);

    let error = engine.submit_update("evt-1", sample_draft()).await.unwrap_err();
    assert!(matches!(
        error,
        EngineError::Api(ApiError::MalformedRecord { .. })
    ));

    // Reconciliation failed, so the prior record stands.
    let record = engine.event("evt-1").await.unwrap();
    assert_eq!(record.title, "Event evt-1");
    assert_eq!(record.start, utc(2023, 11, 6, 9, 0, 0));
}

#[tokio::test]
async fn cancel_removes_entry_and_double_cancel_fails() {
    let api = StubApi::new();
    let engine = CalendarEngine::new(api.clone(), signed_in());

    materialize(&engine, &api, vec![raw_event("evt-1", 6, 9), raw_event("evt-2", 7, 10)]).await;

    engine
        .submit_cancel("evt-1", Some("moved".to_string()))
        .await
        .unwrap();
    assert!(engine.event("evt-1").await.is_none());
    assert_eq!(engine.snapshot().await.len(), 1);

    // A double submit fails explicitly and issues no second request.
    let error = engine.submit_cancel("evt-1", None).await.unwrap_err();
    assert!(matches!(error, EngineError::UnknownEvent { .. }));
    assert_eq!(
        api.calls().iter().filter(|c| c.as_str() == "cancel").count(),
        1
    );
}

#[tokio::test]
async fn expired_credential_blocks_every_operation() {
    let api = StubApi::new();
    let engine = CalendarEngine::new(api.clone(), expired());

    let nav = engine.handle_navigation(month_window(11)).await;
    assert!(matches!(nav, Err(EngineError::NotAuthenticated)));

    let create = engine.submit_create(sample_draft()).await;
    assert!(matches!(create, Err(EngineError::NotAuthenticated)));

    let update = engine.submit_update("evt-1", sample_draft()).await;
    assert!(matches!(update, Err(EngineError::NotAuthenticated)));

    let cancel = engine.submit_cancel("evt-1", None).await;
    assert!(matches!(cancel, Err(EngineError::NotAuthenticated)));

    // Nothing reached the network.
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn sign_out_clears_store_and_discards_in_flight_fetch() {
    let api = GatedApi::new();
    let engine = Arc::new(CalendarEngine::new(api.clone(), signed_in()));

    let november = month_window(11);
    let release = api.gate(&november);

    let engine_task = engine.clone();
    let task = tokio::spawn(async move { engine_task.handle_navigation(month_window(11)).await });
    api.wait_for_started(1).await;

    engine.sign_out().await;

    // The fetch completes after sign-out; its result must not repopulate
    // the cleared store.
    release.send(Ok(vec![raw_event("evt-1", 6, 9)])).unwrap();
    task.await.unwrap().unwrap();

    assert!(engine.snapshot().await.is_empty());
    assert_eq!(engine.window().await, None);
}
