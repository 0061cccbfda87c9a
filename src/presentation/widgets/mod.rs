// Per-kind widget renderers
pub mod geo_map;
pub mod kpi;
pub mod line_chart;
pub mod table;

use crate::application::dashboard_service::{MountedWidget, WidgetBinding};
use crate::application::widget_source::WidgetState;
use crate::domain::dashboard::{ColumnSpan, WidgetKind};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetView {
    Loading,
    Failed { message: &'static str },
    Kpi(kpi::KpiView),
    LineChart(line_chart::ChartView),
    Table(table::TableView),
    GeoMap(geo_map::GeoView),
    Placeholder { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedWidget {
    pub id: String,
    pub title: String,
    pub span: ColumnSpan,
    pub view: WidgetView,
}

pub fn placeholder_message(kind: &WidgetKind) -> String {
    format!("Widget type '{}' not implemented", kind)
}

fn from_state<T>(
    state: WidgetState<T>,
    failure: &'static str,
    ready: impl FnOnce(&T) -> WidgetView,
) -> WidgetView {
    match state {
        WidgetState::Loading => WidgetView::Loading,
        WidgetState::Ready(data) => ready(&data),
        WidgetState::Failed(_) => WidgetView::Failed { message: failure },
    }
}

pub fn render_widget(widget: &MountedWidget) -> RenderedWidget {
    let title = widget.descriptor.title.as_str();
    let view = match &widget.binding {
        WidgetBinding::Kpi(source) => from_state(source.state(), "Failed to load data", |data| {
            WidgetView::Kpi(kpi::render(title, data))
        }),
        WidgetBinding::LineChart(source) => {
            from_state(source.state(), "Failed to load chart data", |data| {
                WidgetView::LineChart(line_chart::render(data))
            })
        }
        WidgetBinding::Table(paged) => {
            let page = paged.current_page();
            from_state(paged.state(), "Failed to load table data", |data| {
                WidgetView::Table(table::render(data, page))
            })
        }
        WidgetBinding::GeoMap(source) => from_state(source.state(), "Failed to load map data", |data| {
            WidgetView::GeoMap(geo_map::render(data))
        }),
        WidgetBinding::Unsupported(kind) => WidgetView::Placeholder {
            message: placeholder_message(kind),
        },
    };

    RenderedWidget {
        id: widget.descriptor.id.clone(),
        title: title.to_string(),
        span: widget.span,
        view,
    }
}

impl fmt::Display for RenderedWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "── {} ({} col) ──", self.title, self.span.columns())?;
        match &self.view {
            WidgetView::Loading => write!(f, "Loading..."),
            WidgetView::Failed { message } => write!(f, "{}", message),
            WidgetView::Kpi(view) => write!(f, "{}", view),
            WidgetView::LineChart(view) => write!(f, "{}", view),
            WidgetView::Table(view) => write!(f, "{}", view),
            WidgetView::GeoMap(view) => write!(f, "{}", view),
            WidgetView::Placeholder { message } => write!(f, "{}", message),
        }
    }
}
