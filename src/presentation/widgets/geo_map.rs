use crate::domain::widget_data::GeoData;
use crate::presentation::format::format_number;
use std::fmt;

/// Five color tiers relative to the busiest region, 1 being the most intense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Intensity(pub u8);

impl Intensity {
    pub fn for_ratio(ratio: f64) -> Self {
        if ratio > 0.8 {
            Intensity(1)
        } else if ratio > 0.6 {
            Intensity(2)
        } else if ratio > 0.4 {
            Intensity(3)
        } else if ratio > 0.2 {
            Intensity(4)
        } else {
            Intensity(5)
        }
    }

    pub fn color(self) -> String {
        format!("chart-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    High,
    Medium,
    Low,
}

impl Badge {
    pub fn for_ratio(ratio: f64) -> Self {
        if ratio > 0.8 {
            Badge::High
        } else if ratio > 0.6 {
            Badge::Medium
        } else {
            Badge::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionView {
    pub name: String,
    pub value: String,
    /// "lat, lon" with four decimals
    pub coordinates: String,
    pub intensity: Intensity,
    pub badge: Badge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoView {
    /// Sorted by value, highest first
    pub regions: Vec<RegionView>,
    pub region_count: usize,
    pub total: String,
    pub average: String,
}

pub fn render(data: &GeoData) -> GeoView {
    let max = data.max_value().unwrap_or(0.0);
    let ratio = |value: f64| if max > 0.0 { value / max } else { 0.0 };

    let mut sorted: Vec<_> = data.regions.iter().collect();
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value));

    let regions = sorted
        .into_iter()
        .map(|region| RegionView {
            name: region.name.clone(),
            value: format_number(region.value),
            coordinates: format!("{:.4}, {:.4}", region.latitude(), region.longitude()),
            intensity: Intensity::for_ratio(ratio(region.value)),
            badge: Badge::for_ratio(ratio(region.value)),
        })
        .collect();

    GeoView {
        regions,
        region_count: data.regions.len(),
        total: format_number(data.total()),
        average: format_number(data.average().round()),
    }
}

impl fmt::Display for GeoView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for region in &self.regions {
            writeln!(
                f,
                "{:<16} {:>8}  ({})  [{}]",
                region.name,
                region.value,
                region.coordinates,
                region.intensity.color()
            )?;
        }
        write!(
            f,
            "{} regions, total {}, average {}",
            self.region_count, self.total, self.average
        )
    }
}
