// Widget payload domain models
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiData {
    pub value: f64,
    pub label: String,
    pub change: f64,
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// True when every dataset has exactly one point per label.
    pub fn is_aligned(&self) -> bool {
        self.datasets.iter().all(|d| d.data.len() == self.labels.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub total: u64,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl TableData {
    pub fn cell<'a>(&self, row: &'a Map<String, Value>, header: &str) -> Option<&'a Value> {
        row.get(&column_key(header))
    }
}

/// Row key for a header: lowercased with all whitespace removed.
pub fn column_key(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Client-side page cursor over a server-reported pagination block. The
/// current page is owned by the widget, not taken from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub current_page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Pager {
    pub fn new(current_page: u32, pagination: &Pagination) -> Self {
        Self {
            current_page: current_page.max(1),
            page_size: pagination.page_size,
            total: pagination.total,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.current_page) < self.total_pages()
    }

    pub fn first_row(&self) -> u64 {
        u64::from(self.current_page - 1) * u64::from(self.page_size) + 1
    }

    pub fn last_row(&self) -> u64 {
        (u64::from(self.current_page) * u64::from(self.page_size)).min(self.total)
    }

    pub fn summary(&self) -> String {
        format!(
            "Showing {} to {} of {} results",
            self.first_row(),
            self.last_row(),
            self.total
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub value: f64,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

impl Region {
    pub fn new(name: &str, value: f64, lon: f64, lat: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            coordinates: [lon, lat],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoData {
    pub regions: Vec<Region>,
}

impl GeoData {
    pub fn max_value(&self) -> Option<f64> {
        self.regions.iter().map(|r| r.value).reduce(f64::max)
    }

    pub fn total(&self) -> f64 {
        self.regions.iter().map(|r| r.value).sum()
    }

    pub fn average(&self) -> f64 {
        if self.regions.is_empty() {
            0.0
        } else {
            self.total() / self.regions.len() as f64
        }
    }
}
