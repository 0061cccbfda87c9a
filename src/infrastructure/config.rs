use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_SERVER_BIND: &str = "0.0.0.0:3001";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub server: ServerSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
    /// Artificial latency for mock lead submissions, in milliseconds
    #[serde(default)]
    pub submit_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct DashboardSettings {
    /// Jump tables back to page 1 whenever the shared filters change. Off by
    /// default: a table keeps its page across filter changes.
    #[serde(default)]
    pub reset_table_page_on_filter_change: bool,
}

/// Defaults, then `config/app.{toml,yaml,json}` if present, then `LEADS_*`
/// environment variables (`LEADS_API__BASE_URL`, `LEADS_SERVER__BIND`, ...).
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    build_app_config("config/app", leads_environment())
}

fn leads_environment() -> config::Environment {
    config::Environment::with_prefix("LEADS")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn build_app_config(file: &str, environment: config::Environment) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .set_default("api.base_url", DEFAULT_API_BASE_URL)?
        .set_default("server.bind", DEFAULT_SERVER_BIND)?
        .set_default("server.submit_delay_ms", 1000)?
        .set_default("dashboard.reset_table_page_on_filter_change", false)?
        .add_source(config::File::with_name(file).required(false))
        .add_source(environment)
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Join the API base URL and an endpoint path without doubling slashes.
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
