//! Presenter dashboard: live feeds plus the locally cached entry log.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{SubsecRound, Utc};
use serde_json::Value;
use tokio::sync::watch;

use crate::app::AppContext;
use crate::app::refresher::{PollHandle, spawn_poll};
use crate::domain::{
    AppError, DASHBOARD_EXPORT_ENDPOINT, DashboardEntry, DashboardFeed, DashboardSnapshot,
    EntryIdGenerator, EntryKind, FormFields,
};
use crate::ports::{ApiRequest, LocalStore, SiteBackend};

/// Submitted testimonies and call logs, newest first, mirrored to the local store.
///
/// The cache only grows: entries are never edited, evicted or reconciled with
/// the backend.
pub struct EntryLog<B: SiteBackend, S: LocalStore> {
    backend: Arc<B>,
    store: Arc<S>,
    testimonies: Vec<DashboardEntry>,
    call_logs: Vec<DashboardEntry>,
    ids: EntryIdGenerator,
}

impl<B: SiteBackend, S: LocalStore> EntryLog<B, S> {
    /// Load both cached lists once. Unreadable caches start empty.
    pub fn load(backend: Arc<B>, store: Arc<S>) -> Self {
        let testimonies = read_cached(store.as_ref(), EntryKind::Testimony);
        let call_logs = read_cached(store.as_ref(), EntryKind::CallLog);
        let ids = EntryIdGenerator::seeded(testimonies.iter().chain(call_logs.iter()));
        Self { backend, store, testimonies, call_logs, ids }
    }

    pub fn entries(&self, kind: EntryKind) -> &[DashboardEntry] {
        match kind {
            EntryKind::Testimony => &self.testimonies,
            EntryKind::CallLog => &self.call_logs,
        }
    }

    /// POST an entry; on success prepend it and rewrite the cached list.
    ///
    /// A backend failure leaves the cache untouched. A local write failure is
    /// logged only: the backend already holds the entry.
    pub async fn submit(
        &mut self,
        kind: EntryKind,
        fields: FormFields,
    ) -> Result<&DashboardEntry, AppError> {
        fields.require(kind.required_fields())?;

        // Millisecond precision, matching what the cache stores.
        let submitted_at = Utc::now().trunc_subsecs(3);
        let entry = DashboardEntry::new(self.ids.next_id(submitted_at), submitted_at, fields);

        self.backend
            .send(ApiRequest::post_json(kind.endpoint(), entry.to_payload()?))
            .await?
            .error_for_status()?;

        tracing::info!(kind = %kind, id = %entry.id, "dashboard entry submitted");

        let list = match kind {
            EntryKind::Testimony => &mut self.testimonies,
            EntryKind::CallLog => &mut self.call_logs,
        };
        list.insert(0, entry);

        if let Err(err) = write_cached(self.store.as_ref(), kind, list) {
            tracing::warn!(kind = %kind, error = %err, "failed to persist dashboard cache");
        }

        Ok(&list[0])
    }

    pub async fn submit_testimony(&mut self, fields: FormFields) -> Result<&DashboardEntry, AppError> {
        self.submit(EntryKind::Testimony, fields).await
    }

    pub async fn submit_call_log(&mut self, fields: FormFields) -> Result<&DashboardEntry, AppError> {
        self.submit(EntryKind::CallLog, fields).await
    }
}

fn read_cached(store: &impl LocalStore, kind: EntryKind) -> Vec<DashboardEntry> {
    let raw = match store.read(kind.storage_key()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(kind = %kind, error = %err, "dashboard cache unreadable");
            return Vec::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|err| {
        tracing::warn!(kind = %kind, error = %err, "dashboard cache corrupt; starting empty");
        Vec::new()
    })
}

fn write_cached(
    store: &impl LocalStore,
    kind: EntryKind,
    entries: &[DashboardEntry],
) -> Result<(), AppError> {
    let raw = serde_json::to_string(entries)?;
    store.write(kind.storage_key(), &raw)
}

/// Read cached entries without mounting the dashboard.
pub fn cached_entries(store: &impl LocalStore, kind: EntryKind) -> Vec<DashboardEntry> {
    read_cached(store, kind)
}

/// Download the backend's CSV export.
pub async fn export_csv<B: SiteBackend + ?Sized>(backend: &B) -> Result<Vec<u8>, AppError> {
    let response = backend.send(ApiRequest::get(DASHBOARD_EXPORT_ENDPOINT)).await?;
    Ok(response.error_for_status()?.body)
}

type SharedSnapshot = Arc<Mutex<DashboardSnapshot>>;

fn lock(snapshot: &SharedSnapshot) -> MutexGuard<'_, DashboardSnapshot> {
    // Writers only assign whole fields, so a poisoned value is still consistent.
    snapshot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Unmounted dashboard view.
pub struct DashboardView<B: SiteBackend, S: LocalStore> {
    backend: Arc<B>,
    store: Arc<S>,
    refresh_interval: Duration,
}

impl<B: SiteBackend + 'static, S: LocalStore> DashboardView<B, S> {
    pub fn new(ctx: &AppContext<B, S>) -> Self {
        Self {
            backend: Arc::clone(ctx.backend()),
            store: Arc::clone(ctx.store()),
            refresh_interval: ctx.config().dashboard.weather_refresh_interval(),
        }
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Fetch every feed once, load the entry cache, and start the weather poll.
    pub async fn mount(self) -> MountedDashboard<B, S> {
        let snapshot: SharedSnapshot = Arc::default();

        let (weather, schedule, presenters) = tokio::join!(
            fetch_feed(self.backend.as_ref(), DashboardFeed::Weather),
            fetch_feed(self.backend.as_ref(), DashboardFeed::Schedule),
            fetch_feed(self.backend.as_ref(), DashboardFeed::Presenters),
        );
        {
            let mut current = lock(&snapshot);
            if let Some(value) = weather {
                current.weather = Some(value);
                current.weather_updated_at = Some(Utc::now());
            }
            current.schedule = schedule;
            current.presenters = presenters;
        }

        let (refreshed_tx, refreshes) = watch::channel(0u64);
        let refreshed_tx = Arc::new(refreshed_tx);
        let backend = Arc::clone(&self.backend);
        let shared = Arc::clone(&snapshot);
        let poll = spawn_poll(self.refresh_interval, move || {
            let backend = Arc::clone(&backend);
            let shared = Arc::clone(&shared);
            let refreshed_tx = Arc::clone(&refreshed_tx);
            async move {
                refresh_weather(backend.as_ref(), &shared).await;
                refreshed_tx.send_modify(|count| *count += 1);
            }
        });

        tracing::info!(interval_secs = self.refresh_interval.as_secs(), "dashboard mounted");

        MountedDashboard {
            backend: Arc::clone(&self.backend),
            snapshot,
            entries: EntryLog::load(self.backend, self.store),
            poll: Some(poll),
            refreshes,
        }
    }
}

async fn fetch_feed<B: SiteBackend + ?Sized>(backend: &B, feed: DashboardFeed) -> Option<Value> {
    match backend.get_json(feed.endpoint()).await {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(feed = feed.endpoint(), error = %err, "dashboard feed unavailable");
            None
        }
    }
}

/// Replace the weather on success; keep the previous value on failure.
async fn refresh_weather<B: SiteBackend + ?Sized>(backend: &B, snapshot: &SharedSnapshot) {
    if let Some(value) = fetch_feed(backend, DashboardFeed::Weather).await {
        let mut current = lock(snapshot);
        current.weather = Some(value);
        current.weather_updated_at = Some(Utc::now());
    }
}

/// A dashboard on screen. Unmounting (or dropping) stops the weather poll.
pub struct MountedDashboard<B: SiteBackend, S: LocalStore> {
    backend: Arc<B>,
    snapshot: SharedSnapshot,
    entries: EntryLog<B, S>,
    poll: Option<PollHandle>,
    refreshes: watch::Receiver<u64>,
}

impl<B: SiteBackend, S: LocalStore> MountedDashboard<B, S> {
    pub fn snapshot(&self) -> DashboardSnapshot {
        lock(&self.snapshot).clone()
    }

    pub fn entries(&self, kind: EntryKind) -> &[DashboardEntry] {
        self.entries.entries(kind)
    }

    pub async fn submit_testimony(&mut self, fields: FormFields) -> Result<&DashboardEntry, AppError> {
        self.entries.submit_testimony(fields).await
    }

    pub async fn submit_call_log(&mut self, fields: FormFields) -> Result<&DashboardEntry, AppError> {
        self.entries.submit_call_log(fields).await
    }

    pub async fn export_csv(&self) -> Result<Vec<u8>, AppError> {
        export_csv(self.backend.as_ref()).await
    }

    /// Wait until the next weather refresh has been applied to the snapshot.
    ///
    /// A failed refresh counts too; the snapshot then still holds the previous
    /// value. Returns `false` once the poll has stopped.
    pub async fn next_refresh(&mut self) -> bool {
        self.refreshes.changed().await.is_ok()
    }

    pub fn is_polling(&self) -> bool {
        self.poll.as_ref().is_some_and(|poll| !poll.is_finished())
    }

    pub fn unmount(&mut self) {
        if let Some(poll) = self.poll.take() {
            poll.cancel();
            tracing::info!("dashboard unmounted");
        }
    }
}

impl<B: SiteBackend, S: LocalStore> Drop for MountedDashboard<B, S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::adapters::MemoryLocalStore;
    use crate::domain::SiteConfig;
    use crate::ports::Method;
    use crate::testing::FakeBackend;

    const WEATHER: &str = "/api/dashboard/weather";
    const FIFTEEN_MINUTES: Duration = Duration::from_secs(15 * 60);

    fn context(backend: &FakeBackend, store: &MemoryLocalStore) -> AppContext<FakeBackend, MemoryLocalStore> {
        AppContext::new(backend.clone(), store.clone(), SiteConfig::default())
    }

    fn scripted_feeds() -> FakeBackend {
        let backend = FakeBackend::new();
        backend.reply_json(Method::Get, WEATHER, 200, json!({"temp": 30}));
        backend.reply_json(Method::Get, "/api/dashboard/schedule", 200, json!([{"slot": "06:00"}]));
        backend.reply_json(Method::Get, "/api/dashboard/presenters", 200, json!([{"name": "Ama"}]));
        backend
    }

    fn testimony() -> FormFields {
        FormFields::new().with("name", "Efua").with("testimony", "Healed after prayer")
    }

    #[tokio::test(start_paused = true)]
    async fn weather_is_fetched_at_mount_and_every_fifteen_minutes() {
        let backend = scripted_feeds();
        let store = MemoryLocalStore::new();
        let mut dashboard = DashboardView::new(&context(&backend, &store)).mount().await;

        assert_eq!(backend.count(Method::Get, WEATHER), 1);
        assert_eq!(backend.count(Method::Get, "/api/dashboard/schedule"), 1);
        assert_eq!(backend.count(Method::Get, "/api/dashboard/presenters"), 1);

        tokio::time::sleep(FIFTEEN_MINUTES - Duration::from_secs(1)).await;
        assert_eq!(backend.count(Method::Get, WEATHER), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(backend.count(Method::Get, WEATHER), 2);

        tokio::time::sleep(FIFTEEN_MINUTES * 2).await;
        assert_eq!(backend.count(Method::Get, WEATHER), 4);

        // Schedule and presenters are mount-only.
        assert_eq!(backend.count(Method::Get, "/api/dashboard/schedule"), 1);

        dashboard.unmount();
        tokio::time::sleep(FIFTEEN_MINUTES * 4).await;
        assert_eq!(backend.count(Method::Get, WEATHER), 4);
        assert!(!dashboard.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn next_refresh_sees_the_new_weather() {
        let backend = FakeBackend::new();
        backend.reply_json(Method::Get, WEATHER, 200, json!({"temp": 28}));
        backend.reply_json(Method::Get, WEATHER, 200, json!({"temp": 33}));
        let store = MemoryLocalStore::new();
        let mut dashboard = DashboardView::new(&context(&backend, &store)).mount().await;
        assert_eq!(dashboard.snapshot().weather, Some(json!({"temp": 28})));

        assert!(dashboard.next_refresh().await);
        assert_eq!(backend.count(Method::Get, WEATHER), 2);
        assert_eq!(dashboard.snapshot().weather, Some(json!({"temp": 33})));

        dashboard.unmount();
        assert!(!dashboard.next_refresh().await);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_keeps_previous_weather() {
        let backend = FakeBackend::new();
        backend.reply_json(Method::Get, WEATHER, 200, json!({"temp": 28}));
        backend.reply(Method::Get, WEATHER, 502, "bad gateway");
        let store = MemoryLocalStore::new();
        let dashboard = DashboardView::new(&context(&backend, &store)).mount().await;

        let before = dashboard.snapshot();
        assert_eq!(before.weather, Some(json!({"temp": 28})));

        tokio::time::sleep(FIFTEEN_MINUTES + Duration::from_secs(1)).await;
        assert_eq!(backend.count(Method::Get, WEATHER), 2);
        let after = dashboard.snapshot();
        assert_eq!(after.weather, Some(json!({"temp": 28})));
        assert_eq!(after.weather_updated_at, before.weather_updated_at);
    }

    #[tokio::test(start_paused = true)]
    async fn successful_refresh_replaces_weather() {
        let backend = FakeBackend::new();
        backend.reply_json(Method::Get, WEATHER, 200, json!({"temp": 20}));
        backend.reply_json(Method::Get, WEATHER, 200, json!({"temp": 25}));
        let store = MemoryLocalStore::new();
        let dashboard = DashboardView::new(&context(&backend, &store)).mount().await;

        tokio::time::sleep(FIFTEEN_MINUTES + Duration::from_secs(1)).await;
        assert_eq!(dashboard.snapshot().weather, Some(json!({"temp": 25})));
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_aborts_in_flight_refresh() {
        let backend = FakeBackend::new();
        backend.reply_json(Method::Get, WEATHER, 200, json!({"temp": 20}));
        backend.reply_json(Method::Get, WEATHER, 200, json!({"temp": 99}));
        let store = MemoryLocalStore::new();
        let mut dashboard = DashboardView::new(&context(&backend, &store))
            .with_refresh_interval(Duration::from_secs(60))
            .mount()
            .await;
        // Mount already consumed the first reply; slow down the refresh.
        backend.delay(WEATHER, Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(70)).await;
        assert_eq!(backend.count(Method::Get, WEATHER), 2);

        dashboard.unmount();
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(dashboard.snapshot().weather, Some(json!({"temp": 20})));
        assert_eq!(backend.count(Method::Get, WEATHER), 2);
    }

    #[tokio::test]
    async fn mount_survives_unavailable_feeds() {
        let backend = FakeBackend::new();
        backend.fail(Method::Get, WEATHER);
        let store = MemoryLocalStore::new();
        let dashboard = DashboardView::new(&context(&backend, &store)).mount().await;

        let snapshot = dashboard.snapshot();
        assert!(snapshot.weather.is_none());
        assert!(snapshot.schedule.is_none());
        assert!(snapshot.presenters.is_none());
    }

    #[tokio::test]
    async fn reloaded_entry_equals_submitted_entry() {
        let backend = FakeBackend::new();
        backend.reply(Method::Post, "/api/dashboard/testimony", 201, "");
        let store = Arc::new(MemoryLocalStore::new());
        let mut log = EntryLog::load(Arc::new(backend), Arc::clone(&store));

        let entry = log.submit_testimony(testimony()).await.unwrap().clone();
        assert_eq!(entry.submitted_at.timestamp_subsec_nanos() % 1_000_000, 0);

        let reloaded = EntryLog::load(Arc::new(FakeBackend::new()), store);
        assert_eq!(reloaded.entries(EntryKind::Testimony), &[entry][..]);
    }

    #[tokio::test]
    async fn testimony_is_prepended_and_persisted() {
        let backend = scripted_feeds();
        backend.reply_json(Method::Post, "/api/dashboard/testimony", 201, json!({"success": true}));
        let store = MemoryLocalStore::new();
        let mut dashboard = DashboardView::new(&context(&backend, &store)).mount().await;

        let first_id = dashboard.submit_testimony(testimony()).await.unwrap().id.clone();
        let resolved_at = Utc::now();
        let second = dashboard
            .submit_testimony(FormFields::new().with("name", "Yaw").with("testimony", "New job"))
            .await
            .unwrap()
            .clone();

        assert_ne!(first_id, second.id);
        let entries = dashboard.entries(EntryKind::Testimony);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, second.id);
        assert!(entries[1].submitted_at <= resolved_at);

        let cached: Vec<DashboardEntry> =
            serde_json::from_str(&store.read("dashboard_testimonies").unwrap().unwrap()).unwrap();
        assert_eq!(cached, entries.to_vec());

        let payload = backend.requests().last().unwrap().json_body().cloned().unwrap();
        assert_eq!(payload["id"], json!(second.id));
        assert!(payload["submittedAt"].is_string());
        assert_eq!(payload["name"], "Yaw");
    }

    #[tokio::test]
    async fn failed_post_leaves_cache_untouched() {
        let backend = FakeBackend::new();
        backend.reply(Method::Post, "/api/dashboard/call-log", 500, "");
        let store = MemoryLocalStore::new();
        let mut log = EntryLog::load(Arc::new(backend), Arc::new(store.clone()));

        let fields = FormFields::new().with("caller_name", "Nana").with("reason", "Prayer request");
        let err = log.submit_call_log(fields).await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(log.entries(EntryKind::CallLog).is_empty());
        assert!(store.read("dashboard_call_logs").unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_fields_are_rejected_before_posting() {
        let backend = FakeBackend::new();
        let mut log = EntryLog::load(Arc::new(backend.clone()), Arc::new(MemoryLocalStore::new()));

        let err = log.submit_testimony(FormFields::new().with("name", "Efua")).await.unwrap_err();
        assert!(matches!(err, AppError::MissingFields(_)));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn cache_is_loaded_once_at_mount_and_survives_remount() {
        let backend = FakeBackend::new();
        backend.reply_json(Method::Post, "/api/dashboard/testimony", 200, json!({}));
        let store = MemoryLocalStore::new();

        let mut first = EntryLog::load(Arc::new(backend.clone()), Arc::new(store.clone()));
        let id = first.submit_testimony(testimony()).await.unwrap().id.clone();

        let second = EntryLog::load(Arc::new(backend), Arc::new(store));
        assert_eq!(second.entries(EntryKind::Testimony).len(), 1);
        assert_eq!(second.entries(EntryKind::Testimony)[0].id, id);
    }

    #[test]
    fn corrupt_cache_starts_empty() {
        let store = MemoryLocalStore::new();
        store.write("dashboard_testimonies", "{not json").unwrap();
        assert!(cached_entries(&store, EntryKind::Testimony).is_empty());
    }

    #[tokio::test]
    async fn export_returns_csv_bytes() {
        let backend = FakeBackend::new();
        backend.reply(Method::Get, DASHBOARD_EXPORT_ENDPOINT, 200, "id,name\n1,Efua\n");

        let csv = export_csv(&backend).await.unwrap();
        assert_eq!(csv, b"id,name\n1,Efua\n".to_vec());
    }
}
