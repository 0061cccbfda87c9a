// HTTP implementation of the dashboard API
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::domain::dashboard::DashboardConfig;
use crate::domain::filters::WidgetQuery;
use crate::domain::lead::{LeadPage, LeadReceipt, PropertyLead};
use crate::domain::widget_data::{ChartData, GeoData, KpiData, TableData};
use crate::infrastructure::config::endpoint_url;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let request = self.client.get(endpoint_url(&self.base_url, endpoint));
        self.execute(endpoint, request).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let payload = serde_json::to_vec(body).map_err(|e| ApiError::encode(endpoint, e.to_string()))?;
        let request = self
            .client
            .post(endpoint_url(&self.base_url, endpoint))
            .body(payload);
        self.execute(endpoint, request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let result = self.send(endpoint, request).await;
        if let Err(e) = &result {
            tracing::error!(endpoint, "API request failed: {}", e.cause);
        }
        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::network(endpoint, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::http(
                endpoint,
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(endpoint, e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| ApiError::decode(endpoint, e.to_string()))
    }

    fn widget_endpoint(query: &WidgetQuery) -> String {
        let query_string = query.query_string();
        let widget_id = urlencoding::encode(&query.widget_id);
        if query_string.is_empty() {
            format!("/widget/{}/data", widget_id)
        } else {
            format!("/widget/{}/data?{}", widget_id, query_string)
        }
    }
}

#[async_trait]
impl DashboardApi for HttpApiClient {
    async fn dashboard_config(&self, dashboard_id: &str) -> Result<DashboardConfig, ApiError> {
        self.get_json(&format!("/dashboard/{}/config", urlencoding::encode(dashboard_id)))
            .await
    }

    async fn kpi_data(&self, query: &WidgetQuery) -> Result<KpiData, ApiError> {
        self.get_json(&Self::widget_endpoint(query)).await
    }

    async fn chart_data(&self, query: &WidgetQuery) -> Result<ChartData, ApiError> {
        self.get_json(&Self::widget_endpoint(query)).await
    }

    async fn table_data(&self, query: &WidgetQuery) -> Result<TableData, ApiError> {
        self.get_json(&Self::widget_endpoint(query)).await
    }

    async fn geo_data(&self, query: &WidgetQuery) -> Result<GeoData, ApiError> {
        self.get_json(&Self::widget_endpoint(query)).await
    }

    async fn submit_lead(&self, lead: &PropertyLead) -> Result<LeadReceipt, ApiError> {
        self.post_json("/leads", lead).await
    }

    async fn leads(&self, page: u32, limit: u32) -> Result<LeadPage, ApiError> {
        self.get_json(&format!("/leads?page={}&limit={}", page, limit)).await
    }

    async fn dimensions(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("/schema/dimensions").await
    }

    async fn measures(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("/schema/measures").await
    }
}
