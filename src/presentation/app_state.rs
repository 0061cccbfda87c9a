// Application state for the mock backend's HTTP handlers
use crate::infrastructure::mock_api::MockDashboardApi;

pub struct AppState {
    pub api: MockDashboardApi,
}
