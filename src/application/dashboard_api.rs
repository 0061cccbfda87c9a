// API trait for dashboard and lead data access
use crate::domain::dashboard::DashboardConfig;
use crate::domain::filters::WidgetQuery;
use crate::domain::lead::{LeadPage, LeadReceipt, PropertyLead};
use crate::domain::widget_data::{ChartData, GeoData, KpiData, TableData};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiErrorCause {
    #[error("network failure: {0}")]
    Network(String),
    #[error("HTTP {status} {status_text}")]
    Http { status: u16, status_text: String },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("request body could not be encoded: {0}")]
    Encode(String),
}

/// Failure of a single API call. Carries the endpoint that failed so widget
/// error states can say which request broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("API request to {endpoint} failed: {cause}")]
pub struct ApiError {
    pub endpoint: String,
    #[source]
    pub cause: ApiErrorCause,
}

impl ApiError {
    pub fn network(endpoint: &str, message: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            cause: ApiErrorCause::Network(message.into()),
        }
    }

    pub fn http(endpoint: &str, status: u16, status_text: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            cause: ApiErrorCause::Http {
                status,
                status_text: status_text.into(),
            },
        }
    }

    pub fn decode(endpoint: &str, message: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            cause: ApiErrorCause::Decode(message.into()),
        }
    }

    pub fn encode(endpoint: &str, message: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            cause: ApiErrorCause::Encode(message.into()),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match &self.cause {
            ApiErrorCause::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// One method per remote capability. Implementations do not retry or cache.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn dashboard_config(&self, dashboard_id: &str) -> Result<DashboardConfig, ApiError>;

    async fn kpi_data(&self, query: &WidgetQuery) -> Result<KpiData, ApiError>;

    async fn chart_data(&self, query: &WidgetQuery) -> Result<ChartData, ApiError>;

    async fn table_data(&self, query: &WidgetQuery) -> Result<TableData, ApiError>;

    async fn geo_data(&self, query: &WidgetQuery) -> Result<GeoData, ApiError>;

    async fn submit_lead(&self, lead: &PropertyLead) -> Result<LeadReceipt, ApiError>;

    async fn leads(&self, page: u32, limit: u32) -> Result<LeadPage, ApiError>;

    /// Schema discovery: dimension names the backend can group by
    async fn dimensions(&self) -> Result<Vec<String>, ApiError>;

    /// Schema discovery: measure names the backend can aggregate
    async fn measures(&self) -> Result<Vec<String>, ApiError>;
}
