// Application layer - Data sources, dashboard and lead form controllers
pub mod dashboard_api;
pub mod dashboard_service;
pub mod lead_form;
pub mod table_widget;
pub mod widget_source;

#[cfg(test)]
pub(crate) mod testing;
