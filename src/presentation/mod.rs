// Presentation layer - mock HTTP surface and dashboard view models
pub mod app_state;
pub mod dashboard_view;
pub mod format;
pub mod handlers;
pub mod widgets;
