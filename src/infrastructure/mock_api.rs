// Mock dashboard backend with static and randomized data
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::domain::dashboard::{DashboardConfig, Position, Widget, WidgetKind};
use crate::domain::filters::WidgetQuery;
use crate::domain::lead::{LeadPage, LeadReceipt, PropertyLead};
use crate::domain::widget_data::{
    ChangeType, ChartData, Dataset, GeoData, KpiData, Pagination, Region, TableData, column_key,
};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Local, Utc};
use rand::Rng;
use serde_json::{Map, Value, json};
use std::time::Duration;
use tokio::sync::RwLock;

const TABLE_TOTAL_ROWS: u64 = 50;
const TABLE_PAGE_SIZE: u32 = 10;
const CHART_DAYS: i64 = 30;

const TABLE_PROPERTY_TYPES: &[&str] = &["Apartment", "House", "Condo", "Townhouse", "Villa"];
const TABLE_AREAS: &[&str] = &["Downtown", "Suburbs", "Waterfront", "City Center", "Residential"];

pub struct MockDashboardApi {
    submit_delay: Duration,
    leads: RwLock<Vec<PropertyLead>>,
}

impl MockDashboardApi {
    pub fn new(submit_delay: Duration) -> Self {
        Self {
            submit_delay,
            leads: RwLock::new(seed_leads()),
        }
    }

    /// Widget payload as JSON, shaped by the kind the config declares for
    /// the widget id.
    pub fn widget_payload(&self, query: &WidgetQuery) -> Result<Value, ApiError> {
        let endpoint = format!("/widget/{}/data", query.widget_id);
        let config = mock_config("main");
        let widget = config
            .widget(&query.widget_id)
            .ok_or_else(|| ApiError::http(&endpoint, 404, "Not Found"))?;

        let payload = match widget.kind {
            WidgetKind::Kpi => serde_json::to_value(mock_kpi(&query.widget_id)),
            WidgetKind::LineChart => serde_json::to_value(mock_chart()),
            WidgetKind::Table => serde_json::to_value(mock_table(query.page.unwrap_or(1))),
            WidgetKind::GeoMap => serde_json::to_value(mock_geo()),
            WidgetKind::PieChart | WidgetKind::Other(_) => {
                return Err(ApiError::http(&endpoint, 404, "Not Found"));
            }
        };
        payload.map_err(|e| ApiError::decode(&endpoint, e.to_string()))
    }
}

fn mock_config(dashboard_id: &str) -> DashboardConfig {
    DashboardConfig::new(
        dashboard_id.to_string(),
        "Property Lead Dashboard".to_string(),
        Some("Real-time insights into property leads and market performance".to_string()),
        vec![
            Widget::new(
                "kpi-leads",
                WidgetKind::Kpi,
                "Total Leads",
                Position::new(0, 0, 3, 2),
                json!({"metric": "total_leads"}),
            ),
            Widget::new(
                "kpi-conversion",
                WidgetKind::Kpi,
                "Conversion Rate",
                Position::new(3, 0, 3, 2),
                json!({"metric": "conversion_rate"}),
            ),
            Widget::new(
                "chart-leads-trend",
                WidgetKind::LineChart,
                "Leads Trend",
                Position::new(0, 2, 6, 4),
                json!({"timeframe": "30d"}),
            ),
            Widget::new(
                "table-recent-leads",
                WidgetKind::Table,
                "Recent Leads",
                Position::new(6, 0, 6, 6),
                json!({"limit": 10}),
            ),
            Widget::new(
                "geo-leads-map",
                WidgetKind::GeoMap,
                "Leads by Region",
                Position::new(0, 6, 8, 4),
                json!({"mapType": "regions"}),
            ),
        ],
    )
}

fn mock_kpi(widget_id: &str) -> KpiData {
    match widget_id {
        "kpi-conversion" => KpiData {
            value: 23.8,
            label: "Conversion Rate (%)".to_string(),
            change: -2.1,
            change_type: ChangeType::Negative,
            target: Some(25.0),
        },
        _ => KpiData {
            value: 1247.0,
            label: "Total Leads".to_string(),
            change: 12.5,
            change_type: ChangeType::Positive,
            target: Some(1500.0),
        },
    }
}

fn mock_chart() -> ChartData {
    let mut rng = rand::rng();
    let today = Local::now().date_naive();
    let labels = (0..CHART_DAYS)
        .map(|i| {
            let date = today - ChronoDuration::days(CHART_DAYS - 1 - i);
            date.format("%b %-d").to_string()
        })
        .collect();
    let data = (0..CHART_DAYS)
        .map(|_| f64::from(rng.random_range(20..70_u32)))
        .collect();

    ChartData {
        labels,
        datasets: vec![Dataset {
            label: "New Leads".to_string(),
            data,
            color: None,
        }],
    }
}

fn mock_table(page: u32) -> TableData {
    let mut rng = rand::rng();
    let headers = ["Name", "Phone", "Property Type", "Area", "Budget", "Date"];
    let first = u64::from(page.max(1) - 1) * u64::from(TABLE_PAGE_SIZE);
    let count = TABLE_TOTAL_ROWS.saturating_sub(first).min(u64::from(TABLE_PAGE_SIZE));

    let rows = (0..count)
        .map(|i| {
            let days_ago = rng.random_range(0..30);
            let values = [
                json!(format!("Lead {}", first + i + 1)),
                json!(format!(
                    "+1 (555) {}-{}",
                    rng.random_range(100..1000),
                    rng.random_range(1000..10000)
                )),
                json!(TABLE_PROPERTY_TYPES[rng.random_range(0..TABLE_PROPERTY_TYPES.len())]),
                json!(TABLE_AREAS[rng.random_range(0..TABLE_AREAS.len())]),
                json!(format!("${}K", rng.random_range(200..700))),
                json!((Local::now() - ChronoDuration::days(days_ago)).format("%-m/%-d/%Y").to_string()),
            ];
            headers
                .iter()
                .map(|header| column_key(header))
                .zip(values)
                .collect::<Map<String, Value>>()
        })
        .collect();

    TableData {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows,
        pagination: Some(Pagination {
            page,
            total: TABLE_TOTAL_ROWS,
            page_size: TABLE_PAGE_SIZE,
        }),
    }
}

fn mock_geo() -> GeoData {
    GeoData {
        regions: vec![
            Region::new("Downtown", 450.0, -74.006, 40.7128),
            Region::new("Brooklyn", 320.0, -73.9442, 40.6782),
            Region::new("Queens", 280.0, -73.7949, 40.7282),
            Region::new("Bronx", 180.0, -73.8648, 40.8448),
            Region::new("Staten Island", 120.0, -74.1502, 40.5795),
        ],
    }
}

fn seed_leads() -> Vec<PropertyLead> {
    let lead = |name: &str, phone: &str, email: &str, property_type: &str, area: &str, budget: &str| {
        PropertyLead {
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            property_area: area.to_string(),
            property_type: property_type.to_string(),
            budget: Some(budget.to_string()),
            message: None,
        }
    };
    vec![
        lead("Sarah Johnson", "+1 (555) 123-4567", "sarah.johnson@email.com", "Apartment", "Downtown", "$400K - $600K"),
        lead("Michael Chen", "+1 (555) 234-5678", "michael.chen@email.com", "House", "Suburbs", "$600K - $800K"),
        lead("Emily Rodriguez", "+1 (555) 345-6789", "emily.rodriguez@email.com", "Condo", "Waterfront", "$800K - $1M"),
    ]
}

fn decode<T: serde::de::DeserializeOwned>(query: &WidgetQuery, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::decode(&format!("/widget/{}/data", query.widget_id), e.to_string()))
}

#[async_trait]
impl DashboardApi for MockDashboardApi {
    async fn dashboard_config(&self, dashboard_id: &str) -> Result<DashboardConfig, ApiError> {
        Ok(mock_config(dashboard_id))
    }

    async fn kpi_data(&self, query: &WidgetQuery) -> Result<KpiData, ApiError> {
        // Unknown ids fall back to the total-leads figures.
        Ok(mock_kpi(&query.widget_id))
    }

    async fn chart_data(&self, query: &WidgetQuery) -> Result<ChartData, ApiError> {
        decode(query, self.widget_payload(query)?)
    }

    async fn table_data(&self, query: &WidgetQuery) -> Result<TableData, ApiError> {
        decode(query, self.widget_payload(query)?)
    }

    async fn geo_data(&self, query: &WidgetQuery) -> Result<GeoData, ApiError> {
        decode(query, self.widget_payload(query)?)
    }

    async fn submit_lead(&self, lead: &PropertyLead) -> Result<LeadReceipt, ApiError> {
        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }
        let lead_id = format!("lead_{}", Utc::now().timestamp_millis());
        self.leads.write().await.push(lead.clone());
        tracing::info!(lead_id = %lead_id, area = %lead.property_area, "Accepted mock lead");

        Ok(LeadReceipt {
            success: true,
            lead_id: Some(lead_id),
        })
    }

    async fn leads(&self, page: u32, limit: u32) -> Result<LeadPage, ApiError> {
        let leads = self.leads.read().await;
        let start = (page.max(1) as usize - 1).saturating_mul(limit as usize);
        Ok(LeadPage {
            leads: leads.iter().skip(start).take(limit as usize).cloned().collect(),
            total: leads.len() as u64,
        })
    }

    async fn dimensions(&self) -> Result<Vec<String>, ApiError> {
        Ok(["region", "propertyType", "propertyArea", "budget", "date"]
            .into_iter()
            .map(String::from)
            .collect())
    }

    async fn measures(&self) -> Result<Vec<String>, ApiError> {
        Ok(["lead_count", "conversion_rate", "average_budget"]
            .into_iter()
            .map(String::from)
            .collect())
    }
}
