use crate::domain::widget_data::ChartData;
use crate::presentation::format::format_number;
use std::fmt;

/// Series colors used when a dataset does not name its own.
pub const DEFAULT_PALETTE: [&str; 5] = ["chart-1", "chart-2", "chart-3", "chart-4", "chart-5"];

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub color: String,
}

/// One x-axis position. `values[i]` belongs to `series[i]`; a dataset shorter
/// than the label list leaves a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub series: Vec<Series>,
    pub points: Vec<ChartPoint>,
}

pub fn render(data: &ChartData) -> ChartView {
    if !data.is_aligned() {
        tracing::debug!(
            labels = data.labels.len(),
            "Chart datasets do not match the label count"
        );
    }

    let series = data
        .datasets
        .iter()
        .enumerate()
        .map(|(i, dataset)| Series {
            label: dataset.label.clone(),
            color: dataset
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_PALETTE[i % DEFAULT_PALETTE.len()].to_string()),
        })
        .collect();

    // Points past the last label have no x position and are dropped.
    let points = data
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| ChartPoint {
            label: label.clone(),
            values: data.datasets.iter().map(|d| d.data.get(i).copied()).collect(),
        })
        .collect();

    ChartView { series, points }
}

impl fmt::Display for ChartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let legend: Vec<String> = self
            .series
            .iter()
            .map(|s| format!("{} [{}]", s.label, s.color))
            .collect();
        write!(f, "{}", legend.join(", "))?;

        for point in &self.points {
            let values: Vec<String> = point
                .values
                .iter()
                .map(|v| v.map(format_number).unwrap_or_else(|| "-".to_string()))
                .collect();
            write!(f, "\n  {:<8} {}", point.label, values.join("  "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::widget_data::Dataset;

    fn dataset(label: &str, data: &[f64], color: Option<&str>) -> Dataset {
        Dataset {
            label: label.to_string(),
            data: data.to_vec(),
            color: color.map(str::to_string),
        }
    }

    #[test]
    fn test_points_follow_labels() {
        let data = ChartData {
            labels: vec!["Jan 1".to_string(), "Jan 2".to_string()],
            datasets: vec![
                dataset("Leads", &[40.0, 52.0], Some("#2563eb")),
                dataset("Qualified", &[12.0, 18.0], None),
            ],
        };
        let view = render(&data);

        assert_eq!(view.series[0].color, "#2563eb");
        assert_eq!(view.series[1].color, "chart-2");
        assert_eq!(view.points.len(), 2);
        assert_eq!(view.points[1].label, "Jan 2");
        assert_eq!(view.points[1].values, vec![Some(52.0), Some(18.0)]);
    }

    #[test]
    fn test_short_dataset_leaves_gaps() {
        let data = ChartData {
            labels: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            datasets: vec![dataset("Leads", &[1.0, 2.0], None)],
        };
        let view = render(&data);
        assert_eq!(view.points.len(), 3);
        assert_eq!(view.points[2].values, vec![None]);
        assert!(view.to_string().contains("c        -"));
    }

    #[test]
    fn test_extra_points_are_dropped() {
        let data = ChartData {
            labels: vec!["a".to_string()],
            datasets: vec![dataset("Leads", &[1.0, 2.0, 3.0], None)],
        };
        let view = render(&data);
        assert_eq!(view.points.len(), 1);
        assert_eq!(view.points[0].values, vec![Some(1.0)]);
    }

    #[test]
    fn test_palette_wraps() {
        let datasets = (0..6).map(|i| dataset(&format!("s{}", i), &[], None)).collect();
        let view = render(&ChartData {
            labels: Vec::new(),
            datasets,
        });
        assert_eq!(view.series[5].color, "chart-1");
        assert!(view.points.is_empty());
    }
}
