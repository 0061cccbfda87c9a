// Number formatting shared by the widget renderers

/// en-US style grouping with at most three fraction digits:
/// `1247.0 -> "1,247"`, `1234.5678 -> "1,234.568"`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let rounded = (value * 1000.0).round() / 1000.0;
    let sign = if rounded < 0.0 { "-" } else { "" };
    let fixed = format!("{:.3}", rounded.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}

/// Signed percentage with one decimal: `12.5 -> "+12.5%"`, `-2.1 -> "-2.1%"`.
pub fn format_change(change: f64) -> String {
    let prefix = if change > 0.0 { "+" } else { "" };
    format!("{}{:.1}%", prefix, change)
}
