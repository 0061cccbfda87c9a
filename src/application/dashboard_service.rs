// Dashboard controller - loads a config, owns the filters, mounts widgets
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::application::table_widget::TableWidget;
use crate::application::widget_source::WidgetSource;
use crate::domain::dashboard::{ColumnSpan, DashboardConfig, Widget, WidgetKind, WidgetOptions};
use crate::domain::filters::{FilterError, FilterField, Filters};
use crate::domain::widget_data::{ChartData, GeoData, KpiData};
use crate::infrastructure::config::DashboardSettings;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// The data source bound to a widget descriptor, chosen by its kind.
pub enum WidgetBinding {
    Kpi(WidgetSource<KpiData>),
    LineChart(WidgetSource<ChartData>),
    Table(TableWidget),
    GeoMap(WidgetSource<GeoData>),
    Unsupported(WidgetKind),
}

impl WidgetBinding {
    pub fn mount(
        api: Arc<dyn DashboardApi>,
        widget: &Widget,
        filters: watch::Receiver<Filters>,
        settings: &DashboardSettings,
    ) -> Self {
        match &widget.kind {
            WidgetKind::Kpi => WidgetBinding::Kpi(WidgetSource::spawn(api, &widget.id, filters)),
            WidgetKind::LineChart => {
                WidgetBinding::LineChart(WidgetSource::spawn(api, &widget.id, filters))
            }
            WidgetKind::Table => WidgetBinding::Table(TableWidget::spawn(
                api,
                &widget.id,
                filters,
                settings.reset_table_page_on_filter_change,
            )),
            WidgetKind::GeoMap => WidgetBinding::GeoMap(WidgetSource::spawn(api, &widget.id, filters)),
            WidgetKind::PieChart | WidgetKind::Other(_) => {
                tracing::debug!(widget_id = %widget.id, kind = %widget.kind, "No renderer for widget kind");
                WidgetBinding::Unsupported(widget.kind.clone())
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        match self {
            WidgetBinding::Kpi(source) => source.state().is_loading(),
            WidgetBinding::LineChart(source) => source.state().is_loading(),
            WidgetBinding::Table(table) => table.state().is_loading(),
            WidgetBinding::GeoMap(source) => source.state().is_loading(),
            WidgetBinding::Unsupported(_) => false,
        }
    }

    pub fn refresh(&self) {
        match self {
            WidgetBinding::Kpi(source) => source.refresh(),
            WidgetBinding::LineChart(source) => source.refresh(),
            WidgetBinding::Table(table) => table.source().refresh(),
            WidgetBinding::GeoMap(source) => source.refresh(),
            WidgetBinding::Unsupported(_) => {}
        }
    }

    async fn settled(&self) {
        match self {
            WidgetBinding::Kpi(source) => {
                source.settled().await;
            }
            WidgetBinding::LineChart(source) => {
                source.settled().await;
            }
            WidgetBinding::Table(table) => {
                table.source().settled().await;
            }
            WidgetBinding::GeoMap(source) => {
                source.settled().await;
            }
            WidgetBinding::Unsupported(_) => {}
        }
    }
}

pub struct MountedWidget {
    pub descriptor: Widget,
    pub span: ColumnSpan,
    pub options: WidgetOptions,
    pub binding: WidgetBinding,
}

pub struct DashboardController {
    api: Arc<dyn DashboardApi>,
    settings: DashboardSettings,
    dashboard_id: String,
    config: DashboardConfig,
    filters: watch::Sender<Filters>,
    widgets: Vec<MountedWidget>,
}

impl DashboardController {
    /// Fetch the dashboard config and mount a data source per widget.
    pub async fn load(
        api: Arc<dyn DashboardApi>,
        dashboard_id: &str,
        filters: Filters,
        settings: DashboardSettings,
    ) -> Result<Self, ApiError> {
        let config = api.dashboard_config(dashboard_id).await?;
        tracing::info!(
            dashboard_id = %config.id,
            widgets = config.widgets.len(),
            "Loaded dashboard config"
        );

        let (filters, _) = watch::channel(filters);
        let mut controller = Self {
            api,
            settings,
            dashboard_id: dashboard_id.to_string(),
            config,
            filters,
            widgets: Vec::new(),
        };
        controller.mount_widgets();
        Ok(controller)
    }

    fn mount_widgets(&mut self) {
        self.widgets = self
            .config
            .widgets
            .iter()
            .map(|widget| MountedWidget {
                descriptor: widget.clone(),
                span: widget.column_span(),
                options: widget.options(),
                binding: WidgetBinding::mount(
                    self.api.clone(),
                    widget,
                    self.filters.subscribe(),
                    &self.settings,
                ),
            })
            .collect();
    }

    pub fn dashboard_id(&self) -> &str {
        &self.dashboard_id
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn widgets(&self) -> &[MountedWidget] {
        &self.widgets
    }

    pub fn widget(&self, widget_id: &str) -> Option<&MountedWidget> {
        self.widgets.iter().find(|w| w.descriptor.id == widget_id)
    }

    pub fn filters(&self) -> Filters {
        self.filters.borrow().clone()
    }

    /// Replace the filter set. Widgets refetch only if it actually changed.
    pub fn set_filters(&self, filters: Filters) -> bool {
        self.filters.send_if_modified(|current| {
            if *current == filters {
                false
            } else {
                *current = filters;
                true
            }
        })
    }

    pub fn update_filter(&self, field: FilterField, value: &str) -> Result<bool, FilterError> {
        let updated = self.filters().with_field(field, value)?;
        Ok(self.set_filters(updated))
    }

    /// Re-fetch the dashboard config and remount every widget. On failure the
    /// current widgets stay mounted.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let config = self.api.dashboard_config(&self.dashboard_id).await?;
        self.config = config;
        self.mount_widgets();
        Ok(())
    }

    /// Refetch every widget without reloading the config.
    pub fn refresh_widgets(&self) {
        for widget in &self.widgets {
            widget.binding.refresh();
        }
    }

    /// Wait for every widget to leave the loading state. Returns false if the
    /// timeout elapsed first.
    pub async fn settled(&self, timeout: Duration) -> bool {
        let all = futures::future::join_all(self.widgets.iter().map(|w| w.binding.settled()));
        tokio::time::timeout(timeout, all).await.is_ok()
    }

    pub fn is_loading(&self) -> bool {
        self.widgets.iter().any(|w| w.binding.is_loading())
    }
}
