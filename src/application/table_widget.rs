// Table widget - a paged widget source with local page navigation
use crate::application::dashboard_api::DashboardApi;
use crate::application::widget_source::{SourceOptions, WidgetSource, WidgetState};
use crate::domain::filters::Filters;
use crate::domain::widget_data::{Pager, TableData};
use std::sync::Arc;
use tokio::sync::watch;

pub struct TableWidget {
    source: WidgetSource<TableData>,
}

impl TableWidget {
    pub fn spawn(
        api: Arc<dyn DashboardApi>,
        widget_id: &str,
        filters: watch::Receiver<Filters>,
        reset_page_on_filter_change: bool,
    ) -> Self {
        let options = SourceOptions {
            initial_page: Some(1),
            reset_page_on_filter_change,
            ..SourceOptions::for_payload::<TableData>()
        };
        Self {
            source: WidgetSource::spawn_with(api, widget_id, filters, options),
        }
    }

    pub fn source(&self) -> &WidgetSource<TableData> {
        &self.source
    }

    pub fn state(&self) -> WidgetState<TableData> {
        self.source.state()
    }

    pub fn current_page(&self) -> u32 {
        self.source.page().unwrap_or(1)
    }

    /// Pager for the current page, once the server has reported pagination.
    pub fn pager(&self) -> Option<Pager> {
        match self.source.state() {
            WidgetState::Ready(data) => data
                .pagination
                .map(|pagination| Pager::new(self.current_page(), &pagination)),
            _ => None,
        }
    }

    pub fn next_page(&self) -> bool {
        match self.pager() {
            Some(pager) if pager.has_next() => self.source.set_page(pager.current_page + 1),
            _ => false,
        }
    }

    pub fn previous_page(&self) -> bool {
        let current = self.current_page();
        if current > 1 {
            self.source.set_page(current - 1)
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeApi;

    #[tokio::test(start_paused = true)]
    async fn test_navigation_bounds() {
        let api = Arc::new(FakeApi::default());
        let (_filters_tx, filters_rx) = watch::channel(Filters::default());
        let table = TableWidget::spawn(api.clone(), "table", filters_rx, false);
        table.source().settled().await;

        let pager = table.pager().unwrap();
        assert_eq!(pager.summary(), "Showing 1 to 10 of 50 results");
        assert!(!pager.has_previous());
        assert!(!table.previous_page());

        for expected in 2..=5 {
            assert!(table.next_page());
            tokio::task::yield_now().await;
            table.source().settled().await;
            assert_eq!(table.current_page(), expected);
        }

        let pager = table.pager().unwrap();
        assert!(!pager.has_next());
        assert!(!table.next_page());
        assert_eq!(table.current_page(), 5);

        assert!(table.previous_page());
        assert_eq!(table.current_page(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_change_hides_previous_rows() {
        let api = Arc::new(FakeApi::default());
        let (_filters_tx, filters_rx) = watch::channel(Filters::default());
        let table = TableWidget::spawn(api, "table", filters_rx, false);
        table.source().settled().await;

        assert!(table.next_page());
        assert!(table.state().is_loading());
        assert!(table.pager().is_none());

        let state = table.source().settled().await;
        let data = state.data().unwrap();
        assert_eq!(data.rows[0]["name"], "Lead 11");
        assert_eq!(table.pager().unwrap().summary(), "Showing 11 to 20 of 50 results");
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_disabled_while_loading() {
        let api = Arc::new(FakeApi::with_latency(std::time::Duration::from_secs(1)));
        let (_filters_tx, filters_rx) = watch::channel(Filters::default());
        let table = TableWidget::spawn(api, "table", filters_rx, false);

        assert!(table.pager().is_none());
        assert!(!table.next_page());
    }
}
