// Domain layer - Dashboard, widget payload and lead models
pub mod dashboard;
pub mod filters;
pub mod lead;
pub mod widget_data;
