use crate::domain::widget_data::{Pager, TableData};
use crate::presentation::format::format_number;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct PagerView {
    pub summary: String,
    pub page: u32,
    pub total_pages: u64,
    pub can_previous: bool,
    pub can_next: bool,
}

impl From<Pager> for PagerView {
    fn from(pager: Pager) -> Self {
        Self {
            summary: pager.summary(),
            page: pager.current_page,
            total_pages: pager.total_pages(),
            can_previous: pager.has_previous(),
            can_next: pager.has_next(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub pager: Option<PagerView>,
}

pub fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Some(other) => other.to_string(),
    }
}

/// `current_page` is the widget's own page, which may differ from the page
/// echoed in the payload.
pub fn render(data: &TableData, current_page: u32) -> TableView {
    let rows = data
        .rows
        .iter()
        .map(|row| {
            data.headers
                .iter()
                .map(|header| format_cell(data.cell(row, header)))
                .collect()
        })
        .collect();

    TableView {
        headers: data.headers.clone(),
        rows,
        pager: data
            .pagination
            .map(|pagination| Pager::new(current_page, &pagination).into()),
    }
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" | ")
        };

        write!(f, "{}", line(&self.headers))?;
        for row in &self.rows {
            write!(f, "\n{}", line(row))?;
        }
        if let Some(pager) = &self.pager {
            write!(
                f,
                "\n{}  [{}prev | next{}]",
                pager.summary,
                if pager.can_previous { "<" } else { " " },
                if pager.can_next { ">" } else { " " }
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::widget_data::Pagination;
    use serde_json::json;

    fn sample() -> TableData {
        serde_json::from_value(json!({
            "headers": ["Name", "Property Type", "Budget", "Verified"],
            "rows": [
                {"name": "Sarah Johnson", "propertytype": "Condo", "budget": 450000, "verified": true},
                {"name": "Michael Chen", "propertytype": null}
            ],
            "pagination": {"page": 1, "total": 25, "pageSize": 10}
        }))
        .unwrap()
    }

    #[test]
    fn test_cells_use_normalized_keys() {
        let view = render(&sample(), 1);
        assert_eq!(view.rows[0], vec!["Sarah Johnson", "Condo", "450,000", "true"]);
        assert_eq!(view.rows[1], vec!["Michael Chen", "-", "-", "-"]);
    }

    #[test]
    fn test_pager_uses_widget_page() {
        let pager = render(&sample(), 3).pager.unwrap();
        assert_eq!(pager.summary, "Showing 21 to 25 of 25 results");
        assert_eq!(pager.total_pages, 3);
        assert!(pager.can_previous);
        assert!(!pager.can_next);

        let pager = render(&sample(), 1).pager.unwrap();
        assert_eq!(pager.summary, "Showing 1 to 10 of 25 results");
        assert!(!pager.can_previous);
        assert!(pager.can_next);
    }

    #[test]
    fn test_no_pagination_no_pager() {
        let mut data = sample();
        data.pagination = None;
        assert!(render(&data, 1).pager.is_none());
    }

    #[test]
    fn test_text_layout() {
        let data = TableData {
            headers: vec!["Name".to_string()],
            rows: Vec::new(),
            pagination: Some(Pagination {
                page: 1,
                total: 0,
                page_size: 10,
            }),
        };
        let text = render(&data, 1).to_string();
        assert!(text.starts_with("Name"));
        assert!(text.contains("of 0 results"));
    }
}
