// Widget data source - fetch on mount, poll, refetch when the query changes
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::domain::filters::{Filters, WidgetQuery};
use crate::domain::widget_data::{ChartData, GeoData, KpiData, TableData};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// A payload a widget can fetch, with the polling cadence for its kind.
pub trait WidgetPayload: Clone + Send + Sync + 'static {
    const KIND: &'static str;
    const POLL_INTERVAL: Duration;

    fn fetch<'a>(
        api: &'a dyn DashboardApi,
        query: &'a WidgetQuery,
    ) -> BoxFuture<'a, Result<Self, ApiError>>;
}

impl WidgetPayload for KpiData {
    const KIND: &'static str = "kpi";
    const POLL_INTERVAL: Duration = Duration::from_secs(30);

    fn fetch<'a>(api: &'a dyn DashboardApi, query: &'a WidgetQuery) -> BoxFuture<'a, Result<Self, ApiError>> {
        api.kpi_data(query)
    }
}

impl WidgetPayload for ChartData {
    const KIND: &'static str = "lineChart";
    const POLL_INTERVAL: Duration = Duration::from_secs(60);

    fn fetch<'a>(api: &'a dyn DashboardApi, query: &'a WidgetQuery) -> BoxFuture<'a, Result<Self, ApiError>> {
        api.chart_data(query)
    }
}

impl WidgetPayload for TableData {
    const KIND: &'static str = "table";
    const POLL_INTERVAL: Duration = Duration::from_secs(60);

    fn fetch<'a>(api: &'a dyn DashboardApi, query: &'a WidgetQuery) -> BoxFuture<'a, Result<Self, ApiError>> {
        api.table_data(query)
    }
}

impl WidgetPayload for GeoData {
    const KIND: &'static str = "geoMap";
    const POLL_INTERVAL: Duration = Duration::from_secs(120);

    fn fetch<'a>(api: &'a dyn DashboardApi, query: &'a WidgetQuery) -> BoxFuture<'a, Result<Self, ApiError>> {
        api.geo_data(query)
    }
}

/// What a widget currently shows. A failure replaces any earlier data.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState<T> {
    Loading,
    Ready(T),
    Failed(ApiError),
}

impl<T> WidgetState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, WidgetState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            WidgetState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            WidgetState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceOptions {
    pub poll_interval: Duration,
    /// `Some` for paged widgets; the page is sent with every request.
    pub initial_page: Option<u32>,
    pub reset_page_on_filter_change: bool,
}

impl SourceOptions {
    pub fn for_payload<T: WidgetPayload>() -> Self {
        Self {
            poll_interval: T::POLL_INTERVAL,
            initial_page: None,
            reset_page_on_filter_change: false,
        }
    }
}

/// Handle to a running widget fetch loop. Dropping it stops polling and
/// cancels any request still in flight.
pub struct WidgetSource<T> {
    widget_id: String,
    state: Arc<watch::Sender<WidgetState<T>>>,
    page: Arc<watch::Sender<Option<u32>>>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl<T: WidgetPayload> WidgetSource<T> {
    pub fn spawn(api: Arc<dyn DashboardApi>, widget_id: &str, filters: watch::Receiver<Filters>) -> Self {
        Self::spawn_with(api, widget_id, filters, SourceOptions::for_payload::<T>())
    }

    pub fn spawn_with(
        api: Arc<dyn DashboardApi>,
        widget_id: &str,
        filters: watch::Receiver<Filters>,
        options: SourceOptions,
    ) -> Self {
        let state = Arc::new(watch::channel(WidgetState::Loading).0);
        let page = Arc::new(watch::channel(options.initial_page).0);
        let refresh = Arc::new(Notify::new());

        let task = tokio::spawn(run_source::<T>(
            api,
            widget_id.to_string(),
            filters,
            page.clone(),
            state.clone(),
            refresh.clone(),
            options,
        ));

        Self {
            widget_id: widget_id.to_string(),
            state,
            page,
            refresh,
            task,
        }
    }

    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    pub fn state(&self) -> WidgetState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WidgetState<T>> {
        self.state.subscribe()
    }

    pub fn page(&self) -> Option<u32> {
        *self.page.borrow()
    }

    /// Returns false when `page` is already the current page. A new page
    /// shows Loading at once, so the previous page's rows are never paired
    /// with the new page number.
    pub fn set_page(&self, page: u32) -> bool {
        let changed = self.page.send_if_modified(|current| {
            if *current == Some(page) {
                false
            } else {
                *current = Some(page);
                true
            }
        });
        if changed {
            self.state.send_replace(WidgetState::Loading);
        }
        changed
    }

    /// Refetch now instead of waiting for the next poll.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// Wait until the source is no longer loading and return what it shows.
    pub async fn settled(&self) -> WidgetState<T> {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }
}

impl<T> Drop for WidgetSource<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

enum Wake {
    Poll,
    FiltersChanged,
    PageChanged,
    Closed,
}

async fn run_source<T: WidgetPayload>(
    api: Arc<dyn DashboardApi>,
    widget_id: String,
    mut filters: watch::Receiver<Filters>,
    page_tx: Arc<watch::Sender<Option<u32>>>,
    state: Arc<watch::Sender<WidgetState<T>>>,
    refresh: Arc<Notify>,
    options: SourceOptions,
) {
    let mut page = page_tx.subscribe();
    let mut ticker = time::interval_at(Instant::now() + options.poll_interval, options.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut key_changed = true;

    loop {
        let query = WidgetQuery {
            widget_id: widget_id.clone(),
            filters: filters.borrow_and_update().clone(),
            page: *page.borrow_and_update(),
        };
        if key_changed {
            state.send_replace(WidgetState::Loading);
        }

        let interrupted = tokio::select! {
            result = T::fetch(api.as_ref(), &query) => {
                match result {
                    Ok(data) => {
                        state.send_replace(WidgetState::Ready(data));
                    }
                    Err(e) => {
                        tracing::warn!(widget_id = %widget_id, kind = T::KIND, "Widget fetch failed: {}", e);
                        state.send_replace(WidgetState::Failed(e));
                    }
                }
                None
            }
            changed = filters.changed() => Some(if changed.is_ok() { Wake::FiltersChanged } else { Wake::Closed }),
            _ = page.changed() => Some(Wake::PageChanged),
        };

        let wake = match interrupted {
            Some(wake) => {
                tracing::debug!(widget_id = %widget_id, "Superseded in-flight widget fetch");
                wake
            }
            None => tokio::select! {
                _ = ticker.tick() => Wake::Poll,
                _ = refresh.notified() => Wake::Poll,
                changed = filters.changed() => if changed.is_ok() { Wake::FiltersChanged } else { Wake::Closed },
                _ = page.changed() => Wake::PageChanged,
            },
        };

        match wake {
            Wake::Closed => {
                tracing::debug!(widget_id = %widget_id, "Filter source closed, stopping widget");
                return;
            }
            Wake::Poll => key_changed = false,
            Wake::FiltersChanged => {
                if options.reset_page_on_filter_change {
                    page_tx.send_if_modified(|current| match current {
                        Some(n) if *n != 1 => {
                            *n = 1;
                            true
                        }
                        _ => false,
                    });
                }
                key_changed = true;
                ticker.reset();
            }
            Wake::PageChanged => {
                key_changed = true;
                ticker.reset();
            }
        }
    }
}
