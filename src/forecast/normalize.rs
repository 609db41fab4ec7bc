//! Field-level normalization shared by both page layouts

use scraper::ElementRef;

const DEGREE_SUFFIX: char = '℃';

const WEEKDAYS: [(&str, &str); 8] = [
    ("星期一", "周一"),
    ("星期二", "周二"),
    ("星期三", "周三"),
    ("星期四", "周四"),
    ("星期五", "周五"),
    ("星期六", "周六"),
    ("星期日", "周日"),
    ("星期天", "周日"),
];

/// Replace a full weekday name with its two-character form, in place
///
/// `3日（星期三）` becomes `3日（周三）`. Dates without a full weekday name
/// (`3日（今天）`) are returned as they are.
#[must_use]
pub fn abbreviate_weekday(date: &str) -> String {
    WEEKDAYS
        .iter()
        .find(|(full, _)| date.contains(full))
        .map_or_else(|| date.to_string(), |(full, short)| date.replace(full, short))
}

/// Reorder a weekday-first date into the day-first display form
///
/// `周三（3日）` becomes `3日（周三）`. Anything that does not split into
/// exactly two parts around `（` passes through unchanged.
#[must_use]
pub fn reorder_extended_date(raw: &str) -> String {
    let body = raw.strip_suffix('）').unwrap_or(raw);
    let parts: Vec<&str> = body.split('（').collect();
    match parts.as_slice() {
        [weekday, day] => format!("{day}（{weekday}）"),
        _ => raw.to_string(),
    }
}

/// Strip the degree suffix and whitespace from a temperature figure
///
/// Empty figures count as missing so the backfill rule can apply.
#[must_use]
pub fn clean_temperature(text: &str) -> Option<String> {
    let value = text.trim().trim_end_matches(DEGREE_SUFFIX).trim();
    non_empty(value)
}

/// Visible text of an element, trimmed; `None` when blank
#[must_use]
pub fn element_text(element: ElementRef<'_>) -> Option<String> {
    non_empty(element.text().collect::<String>().trim())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
