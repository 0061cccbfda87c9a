// Dashboard configuration domain model
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl DashboardConfig {
    pub fn new(id: String, title: String, description: Option<String>, widgets: Vec<Widget>) -> Self {
        Self {
            id,
            title,
            description,
            widgets,
        }
    }

    pub fn widget(&self, widget_id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == widget_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub title: String,
    pub position: Position,
    #[serde(default)]
    pub config: Value,
}

impl Widget {
    pub fn new(id: &str, kind: WidgetKind, title: &str, position: Position, config: Value) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title: title.to_string(),
            position,
            config,
        }
    }

    pub fn column_span(&self) -> ColumnSpan {
        ColumnSpan::from_width(self.position.w)
    }

    /// Parse the raw `config` object into the options recognized for this
    /// widget's kind. Anything else in the object is reported and dropped.
    pub fn options(&self) -> WidgetOptions {
        let (options, ignored) = WidgetOptions::parse(&self.kind, &self.config);
        if !ignored.is_empty() {
            tracing::warn!(
                widget_id = %self.id,
                kind = %self.kind,
                "Ignoring unrecognized widget options: {}",
                ignored.join(", ")
            );
        }
        options
    }
}

/// Closed set of widget kinds. Tags we do not know are kept verbatim so the
/// placeholder can name them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetKind {
    Kpi,
    LineChart,
    Table,
    GeoMap,
    PieChart,
    Other(String),
}

impl WidgetKind {
    pub fn as_str(&self) -> &str {
        match self {
            WidgetKind::Kpi => "kpi",
            WidgetKind::LineChart => "lineChart",
            WidgetKind::Table => "table",
            WidgetKind::GeoMap => "geoMap",
            WidgetKind::PieChart => "pieChart",
            WidgetKind::Other(tag) => tag,
        }
    }
}

impl From<String> for WidgetKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "kpi" => WidgetKind::Kpi,
            "lineChart" => WidgetKind::LineChart,
            "table" => WidgetKind::Table,
            "geoMap" => WidgetKind::GeoMap,
            "pieChart" => WidgetKind::PieChart,
            _ => WidgetKind::Other(tag),
        }
    }
}

impl From<WidgetKind> for String {
    fn from(kind: WidgetKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Position {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Responsive column tier. Only the width takes part in layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColumnSpan {
    One,
    Two,
    Three,
}

impl ColumnSpan {
    pub fn from_width(w: u32) -> Self {
        if w <= 3 {
            ColumnSpan::One
        } else if w <= 6 {
            ColumnSpan::Two
        } else {
            ColumnSpan::Three
        }
    }

    pub fn columns(self) -> u8 {
        match self {
            ColumnSpan::One => 1,
            ColumnSpan::Two => 2,
            ColumnSpan::Three => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct KpiOptions {
    pub metric: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineChartOptions {
    pub timeframe: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableOptions {
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoMapOptions {
    pub map_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetOptions {
    Kpi(KpiOptions),
    LineChart(LineChartOptions),
    Table(TableOptions),
    GeoMap(GeoMapOptions),
    None,
}

impl WidgetOptions {
    /// Returns the typed options and the keys that were not recognized (or
    /// had the wrong JSON type) for `kind`.
    pub fn parse(kind: &WidgetKind, raw: &Value) -> (Self, Vec<String>) {
        let empty = Map::new();
        let object = match raw {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => return (Self::empty_for(kind), vec!["<non-object config>".to_string()]),
        };

        let mut ignored = Vec::new();

        let options = match kind {
            WidgetKind::Kpi => WidgetOptions::Kpi(KpiOptions {
                metric: string_option(object, "metric", &mut ignored),
            }),
            WidgetKind::LineChart => WidgetOptions::LineChart(LineChartOptions {
                timeframe: string_option(object, "timeframe", &mut ignored),
            }),
            WidgetKind::GeoMap => WidgetOptions::GeoMap(GeoMapOptions {
                map_type: string_option(object, "mapType", &mut ignored),
            }),
            WidgetKind::Table => {
                let limit = match object.get("limit") {
                    Some(value) => match value.as_u64().and_then(|n| u32::try_from(n).ok()) {
                        Some(n) => Some(n),
                        None => {
                            ignored.push("limit".to_string());
                            None
                        }
                    },
                    None => None,
                };
                WidgetOptions::Table(TableOptions { limit })
            }
            WidgetKind::PieChart | WidgetKind::Other(_) => WidgetOptions::None,
        };

        let recognized: &[&str] = match kind {
            WidgetKind::Kpi => &["metric"],
            WidgetKind::LineChart => &["timeframe"],
            WidgetKind::Table => &["limit"],
            WidgetKind::GeoMap => &["mapType"],
            WidgetKind::PieChart | WidgetKind::Other(_) => &[],
        };
        ignored.extend(
            object
                .keys()
                .filter(|key| !recognized.contains(&key.as_str()))
                .cloned(),
        );
        ignored.sort();

        (options, ignored)
    }

    fn empty_for(kind: &WidgetKind) -> Self {
        match kind {
            WidgetKind::Kpi => WidgetOptions::Kpi(KpiOptions::default()),
            WidgetKind::LineChart => WidgetOptions::LineChart(LineChartOptions::default()),
            WidgetKind::Table => WidgetOptions::Table(TableOptions::default()),
            WidgetKind::GeoMap => WidgetOptions::GeoMap(GeoMapOptions::default()),
            WidgetKind::PieChart | WidgetKind::Other(_) => WidgetOptions::None,
        }
    }
}

fn string_option(object: &Map<String, Value>, key: &str, ignored: &mut Vec<String>) -> Option<String> {
    match object.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            ignored.push(key.to_string());
            None
        }
        None => None,
    }
}
