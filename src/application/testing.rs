// In-memory API double for application-layer tests
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::domain::dashboard::{DashboardConfig, Position, Widget, WidgetKind};
use crate::domain::filters::WidgetQuery;
use crate::domain::lead::{LeadPage, LeadReceipt, PropertyLead};
use crate::domain::widget_data::{
    ChangeType, ChartData, Dataset, GeoData, KpiData, Pagination, Region, TableData,
};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct FakeApi {
    latency: Duration,
    queries: Mutex<Vec<WidgetQuery>>,
    completed: AtomicUsize,
    failing: Mutex<HashSet<String>>,
    config_calls: AtomicUsize,
    config: Mutex<Option<DashboardConfig>>,
    submit_response: Mutex<Option<Result<LeadReceipt, ApiError>>>,
    submissions: Mutex<Vec<PropertyLead>>,
}

impl FakeApi {
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Default::default()
        }
    }

    pub fn with_config(config: DashboardConfig) -> Self {
        let api = Self::default();
        *api.config.lock().unwrap() = Some(config);
        api
    }

    pub fn fail_widget(&self, widget_id: &str) {
        self.failing.lock().unwrap().insert(widget_id.to_string());
    }

    pub fn respond_to_submit(&self, response: Result<LeadReceipt, ApiError>) {
        *self.submit_response.lock().unwrap() = Some(response);
    }

    pub fn widget_queries(&self, widget_id: &str) -> Vec<WidgetQuery> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.widget_id == widget_id)
            .cloned()
            .collect()
    }

    pub fn widget_calls(&self, widget_id: &str) -> usize {
        self.widget_queries(widget_id).len()
    }

    pub fn completed_calls(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn config_calls(&self) -> usize {
        self.config_calls.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> Vec<PropertyLead> {
        self.submissions.lock().unwrap().clone()
    }

    /// Records the query and returns how many requests this widget has seen,
    /// or the scripted failure.
    async fn begin(&self, query: &WidgetQuery) -> Result<usize, ApiError> {
        let count = {
            let mut queries = self.queries.lock().unwrap();
            queries.push(query.clone());
            queries.iter().filter(|q| q.widget_id == query.widget_id).count()
        };
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        let endpoint = format!("/widget/{}/data", query.widget_id);
        if self.failing.lock().unwrap().contains(&query.widget_id) {
            return Err(ApiError::http(&endpoint, 500, "Internal Server Error"));
        }
        Ok(count)
    }
}

pub fn sample_config() -> DashboardConfig {
    DashboardConfig::new(
        "main".to_string(),
        "Property Lead Dashboard".to_string(),
        None,
        vec![
            Widget::new("kpi-leads", WidgetKind::Kpi, "Total Leads", Position::new(0, 0, 3, 2), json!({"metric": "total_leads"})),
            Widget::new("chart", WidgetKind::LineChart, "Leads Trend", Position::new(0, 2, 6, 4), Value::Null),
            Widget::new("table", WidgetKind::Table, "Recent Leads", Position::new(6, 0, 6, 6), json!({"limit": 10})),
            Widget::new("geo", WidgetKind::GeoMap, "Leads by Region", Position::new(0, 6, 8, 4), Value::Null),
            Widget::new("pie", WidgetKind::PieChart, "Split", Position::new(8, 6, 4, 4), Value::Null),
        ],
    )
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn dashboard_config(&self, dashboard_id: &str) -> Result<DashboardConfig, ApiError> {
        self.config_calls.fetch_add(1, Ordering::SeqCst);
        match self.config.lock().unwrap().clone() {
            Some(config) => Ok(config),
            None => Err(ApiError::http(
                &format!("/dashboard/{}/config", dashboard_id),
                404,
                "Not Found",
            )),
        }
    }

    async fn kpi_data(&self, query: &WidgetQuery) -> Result<KpiData, ApiError> {
        let count = self.begin(query).await?;
        Ok(KpiData {
            value: count as f64,
            label: "Total Leads".to_string(),
            change: 12.5,
            change_type: ChangeType::Positive,
            target: Some(1500.0),
        })
    }

    async fn chart_data(&self, query: &WidgetQuery) -> Result<ChartData, ApiError> {
        self.begin(query).await?;
        Ok(ChartData {
            labels: vec!["Jan 1".to_string(), "Jan 2".to_string()],
            datasets: vec![Dataset {
                label: "New Leads".to_string(),
                data: vec![20.0, 31.0],
                color: None,
            }],
        })
    }

    async fn table_data(&self, query: &WidgetQuery) -> Result<TableData, ApiError> {
        self.begin(query).await?;
        let page = query.page.unwrap_or(1);
        let mut row = Map::new();
        row.insert("name".to_string(), json!(format!("Lead {}", (page - 1) * 10 + 1)));
        Ok(TableData {
            headers: vec!["Name".to_string()],
            rows: vec![row],
            pagination: Some(Pagination {
                page,
                total: 50,
                page_size: 10,
            }),
        })
    }

    async fn geo_data(&self, query: &WidgetQuery) -> Result<GeoData, ApiError> {
        self.begin(query).await?;
        Ok(GeoData {
            regions: vec![
                Region::new("A", 100.0, -74.0, 40.7),
                Region::new("B", 50.0, -73.9, 40.6),
            ],
        })
    }

    async fn submit_lead(&self, lead: &PropertyLead) -> Result<LeadReceipt, ApiError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.submissions.lock().unwrap().push(lead.clone());
        self.submit_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| {
                Ok(LeadReceipt {
                    success: true,
                    lead_id: Some("lead_123".to_string()),
                })
            })
    }

    async fn leads(&self, _page: u32, _limit: u32) -> Result<LeadPage, ApiError> {
        let leads = self.submissions();
        let total = leads.len() as u64;
        Ok(LeadPage { leads, total })
    }

    async fn dimensions(&self) -> Result<Vec<String>, ApiError> {
        Ok(vec!["region".to_string()])
    }

    async fn measures(&self) -> Result<Vec<String>, ApiError> {
        Ok(vec!["lead_count".to_string()])
    }
}
