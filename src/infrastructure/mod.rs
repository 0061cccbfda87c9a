// Infrastructure layer - Configuration and API adapters
pub mod config;
pub mod http_api_client;
pub mod mock_api;
