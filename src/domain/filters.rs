// Shared dashboard filters and the per-widget query built from them
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const ALL_REGIONS: &str = "all-regions";
pub const ALL_TYPES: &str = "all-types";

pub const REGION_OPTIONS: &[&str] = &["downtown", "suburbs", "waterfront"];
pub const PROPERTY_TYPE_OPTIONS: &[&str] = &["apartment", "house", "condo"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown date range '{0}' (expected one of 7d, 30d, 90d, 1y)")]
    UnknownDateRange(String),
    #[error("unknown filter field '{0}'")]
    UnknownField(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DateRange {
    Last7Days,
    #[default]
    Last30Days,
    Last90Days,
    LastYear,
}

impl DateRange {
    pub const ALL: [DateRange; 4] = [
        DateRange::Last7Days,
        DateRange::Last30Days,
        DateRange::Last90Days,
        DateRange::LastYear,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DateRange::Last7Days => "7d",
            DateRange::Last30Days => "30d",
            DateRange::Last90Days => "90d",
            DateRange::LastYear => "1y",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateRange::Last7Days => "Last 7 days",
            DateRange::Last30Days => "Last 30 days",
            DateRange::Last90Days => "Last 90 days",
            DateRange::LastYear => "Last year",
        }
    }
}

impl FromStr for DateRange {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateRange::ALL
            .into_iter()
            .find(|range| range.as_str() == s)
            .ok_or_else(|| FilterError::UnknownDateRange(s.to_string()))
    }
}

impl TryFrom<String> for DateRange {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateRange> for String {
    fn from(range: DateRange) -> Self {
        range.as_str().to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter set shared by every widget on a dashboard view. `None` means "all".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(default)]
    pub date_range: DateRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
}

impl Filters {
    pub fn new(date_range: DateRange, region: Option<String>, property_type: Option<String>) -> Self {
        Self {
            date_range,
            region,
            property_type,
        }
    }

    /// Apply a single field change. The "all" sentinels clear the field.
    pub fn with_field(mut self, field: FilterField, value: &str) -> Result<Self, FilterError> {
        match field {
            FilterField::DateRange => self.date_range = value.parse()?,
            FilterField::Region => self.region = optional_value(value, ALL_REGIONS),
            FilterField::PropertyType => self.property_type = optional_value(value, ALL_TYPES),
        }
        Ok(self)
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("dateRange", self.date_range.as_str().to_string())];
        if let Some(region) = &self.region {
            pairs.push(("region", region.clone()));
        }
        if let Some(property_type) = &self.property_type {
            pairs.push(("propertyType", property_type.clone()));
        }
        pairs
    }
}

fn optional_value(value: &str, all_sentinel: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == all_sentinel {
        None
    } else {
        Some(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    DateRange,
    Region,
    PropertyType,
}

impl FromStr for FilterField {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dateRange" => Ok(FilterField::DateRange),
            "region" => Ok(FilterField::Region),
            "propertyType" => Ok(FilterField::PropertyType),
            other => Err(FilterError::UnknownField(other.to_string())),
        }
    }
}

/// Everything a widget data request depends on. Two queries that compare
/// equal produce the same request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WidgetQuery {
    pub widget_id: String,
    pub filters: Filters,
    pub page: Option<u32>,
}

impl WidgetQuery {
    pub fn new(widget_id: &str, filters: Filters) -> Self {
        Self {
            widget_id: widget_id.to_string(),
            filters,
            page: None,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Percent-encoded `key=value&...` string, without the leading `?`.
    pub fn query_string(&self) -> String {
        let mut pairs = self.filters.query_pairs();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
