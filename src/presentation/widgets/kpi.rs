use crate::domain::widget_data::{ChangeType, KpiData};
use crate::presentation::format::{format_change, format_number};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Flat => "→",
        }
    }
}

impl From<ChangeType> for Trend {
    fn from(change_type: ChangeType) -> Self {
        match change_type {
            ChangeType::Positive => Trend::Up,
            ChangeType::Negative => Trend::Down,
            ChangeType::Neutral => Trend::Flat,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetProgress {
    pub target: String,
    /// Share of the target reached, capped at 100
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiView {
    pub value: String,
    pub label: String,
    pub change: String,
    pub trend: Trend,
    pub progress: Option<TargetProgress>,
}

/// Titles mentioning a rate or a percent sign show the value as a percentage.
fn is_percentage(title: &str) -> bool {
    title.to_lowercase().contains("rate") || title.contains('%')
}

fn format_value(title: &str, value: f64) -> String {
    if is_percentage(title) {
        format!("{:.1}%", value)
    } else {
        format_number(value)
    }
}

pub fn render(title: &str, data: &KpiData) -> KpiView {
    let progress = data.target.filter(|target| *target > 0.0).map(|target| TargetProgress {
        target: format_value(title, target),
        percent: (data.value / target * 100.0).min(100.0),
    });

    KpiView {
        value: format_value(title, data.value),
        label: data.label.clone(),
        change: format_change(data.change),
        trend: data.change_type.into(),
        progress,
    }
}

impl fmt::Display for KpiView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {} {}  {}", self.value, self.trend.arrow(), self.change, self.label)?;
        if let Some(progress) = &self.progress {
            write!(f, "\n  Target: {} ({:.0}%)", progress.target, progress.percent)?;
        }
        Ok(())
    }
}
