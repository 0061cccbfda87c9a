// Dashboard page view model and its terminal rendering
use crate::application::dashboard_service::DashboardController;
use crate::domain::filters::Filters;
use crate::presentation::widgets::{RenderedWidget, render_widget};
use std::fmt;

pub const NOT_FOUND_TITLE: &str = "Dashboard Not Found";
pub const NOT_FOUND_MESSAGE: &str = "The dashboard you're looking for doesn't exist or couldn't be loaded.";

/// Grid columns on a wide layout; widgets span 1 to 3 of them.
const GRID_COLUMNS: u8 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Loaded {
        title: String,
        description: Option<String>,
        filters: Filters,
        widgets: Vec<RenderedWidget>,
    },
    NotFound {
        dashboard_id: String,
    },
}

pub fn render_dashboard(controller: &DashboardController) -> DashboardView {
    let config = controller.config();
    DashboardView::Loaded {
        title: config.title.clone(),
        description: config.description.clone(),
        filters: controller.filters(),
        widgets: controller.widgets().iter().map(render_widget).collect(),
    }
}

pub fn not_found(dashboard_id: &str) -> DashboardView {
    DashboardView::NotFound {
        dashboard_id: dashboard_id.to_string(),
    }
}

/// Pack widgets into rows of at most three columns, in config order.
pub fn grid_rows(widgets: &[RenderedWidget]) -> Vec<Vec<&RenderedWidget>> {
    let mut rows: Vec<Vec<&RenderedWidget>> = Vec::new();
    let mut used = 0;
    for widget in widgets {
        let span = widget.span.columns();
        if rows.is_empty() || used + span > GRID_COLUMNS {
            rows.push(Vec::new());
            used = 0;
        }
        used += span;
        if let Some(row) = rows.last_mut() {
            row.push(widget);
        }
    }
    rows
}

fn filter_line(filters: &Filters) -> String {
    format!(
        "Filters: {} | region: {} | type: {}",
        filters.date_range.label(),
        filters.region.as_deref().unwrap_or("All regions"),
        filters.property_type.as_deref().unwrap_or("All types"),
    )
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardView::NotFound { dashboard_id } => {
                writeln!(f, "{}", NOT_FOUND_TITLE)?;
                write!(f, "{} (id: {})", NOT_FOUND_MESSAGE, dashboard_id)
            }
            DashboardView::Loaded {
                title,
                description,
                filters,
                widgets,
            } => {
                writeln!(f, "{}", title)?;
                if let Some(description) = description {
                    writeln!(f, "{}", description)?;
                }
                write!(f, "{}", filter_line(filters))?;
                for row in grid_rows(widgets) {
                    writeln!(f)?;
                    for widget in row {
                        write!(f, "\n{}\n", widget)?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{FakeApi, sample_config};
    use crate::domain::filters::FilterField;
    use crate::infrastructure::config::DashboardSettings;
    use crate::presentation::widgets::WidgetView;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_renders_every_widget_in_order() {
        let api = Arc::new(FakeApi::with_config(sample_config()));
        api.fail_widget("chart");
        let controller =
            DashboardController::load(api, "main", Filters::default(), DashboardSettings::default())
                .await
                .unwrap();
        controller.update_filter(FilterField::Region, "downtown").unwrap();
        assert!(controller.settled(Duration::from_secs(5)).await);

        let view = render_dashboard(&controller);
        let DashboardView::Loaded { widgets, filters, .. } = &view else {
            panic!("expected a loaded dashboard");
        };
        assert_eq!(filters.region.as_deref(), Some("downtown"));

        let ids: Vec<&str> = widgets.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["kpi-leads", "chart", "table", "geo", "pie"]);
        assert!(matches!(widgets[0].view, WidgetView::Kpi(_)));
        assert_eq!(
            widgets[1].view,
            WidgetView::Failed {
                message: "Failed to load chart data"
            }
        );
        assert!(matches!(widgets[2].view, WidgetView::Table(_)));
        assert!(matches!(widgets[3].view, WidgetView::GeoMap(_)));
        assert!(matches!(widgets[4].view, WidgetView::Placeholder { .. }));

        let text = view.to_string();
        assert!(text.contains("region: downtown"));
        assert!(text.contains("Widget type 'pieChart' not implemented"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_grid_packs_rows_by_span() {
        let api = Arc::new(FakeApi::with_config(sample_config()));
        let controller =
            DashboardController::load(api, "main", Filters::default(), DashboardSettings::default())
                .await
                .unwrap();
        let DashboardView::Loaded { widgets, .. } = render_dashboard(&controller) else {
            panic!("expected a loaded dashboard");
        };

        // spans 1, 2 | 2 | 3 | 2
        let rows: Vec<usize> = grid_rows(&widgets).iter().map(Vec::len).collect();
        assert_eq!(rows, vec![2, 1, 1, 1]);
    }

    #[test]
    fn test_not_found_view() {
        let text = not_found("missing").to_string();
        assert!(text.starts_with(NOT_FOUND_TITLE));
        assert!(text.contains("id: missing"));
    }
}
