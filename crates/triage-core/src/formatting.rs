/// Format a count with thousands separators.
///
/// # Examples
///
/// ```
/// use triage_core::formatting::format_count;
///
/// assert_eq!(format_count(7), "7");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

/// Calculate `(part / whole) * 100` without rounding.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use triage_core::formatting::percentage;
///
/// assert!((percentage(1, 4) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0, 0), 0.0);
/// ```
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64) * 100.0
}

/// Format a percentage with two decimal places and a `%` suffix.
///
/// # Examples
///
/// ```
/// use triage_core::formatting::format_percent;
///
/// assert_eq!(format_percent(33.3333), "33.33%");
/// assert_eq!(format_percent(0.0), "0.00%");
/// ```
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Placeholder shown for the empty business goal of uncategorized records.
pub const NO_GOAL_PLACEHOLDER: &str = "-";

/// Display form of a business goal, substituting [`NO_GOAL_PLACEHOLDER`]
/// for the empty goal.
pub fn display_goal(goal: &str) -> &str {
    if goal.is_empty() {
        NO_GOAL_PLACEHOLDER
    } else {
        goal
    }
}

/// Shorten `text` to at most `max_chars` characters, ending in `…` when cut.
///
/// Newlines are flattened to spaces so the result fits on one table row.
///
/// # Examples
///
/// ```
/// use triage_core::formatting::truncate_text;
///
/// assert_eq!(truncate_text("short", 10), "short");
/// assert_eq!(truncate_text("a rather long complaint", 10), "a rather …");
/// ```
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = flat.chars().take(keep).collect();
    out.push('…');
    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_count ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_count_zero() {
        assert_eq!(format_count(0), "0");
    }

    #[test]
    fn test_format_count_exact_thousands() {
        assert_eq!(format_count(1_000), "1,000");
    }

    #[test]
    fn test_format_count_millions() {
        assert_eq!(format_count(12_345_678), "12,345,678");
    }

    // ── percentage ───────────────────────────────────────────────────────────

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(10, 0), 0.0);
    }

    #[test]
    fn test_percentage_full() {
        assert!((percentage(5, 5) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_not_rounded() {
        let p = percentage(1, 3);
        assert!((p - 33.333_333).abs() < 1e-5, "percentage = {p}");
    }

    // ── format_percent ───────────────────────────────────────────────────────

    #[test]
    fn test_format_percent_rounds() {
        assert_eq!(format_percent(66.666_666), "66.67%");
        assert_eq!(format_percent(100.0), "100.00%");
    }

    // ── display_goal ─────────────────────────────────────────────────────────

    #[test]
    fn test_display_goal_placeholder() {
        assert_eq!(display_goal(""), "-");
        assert_eq!(display_goal("Improve Billing"), "Improve Billing");
    }

    // ── truncate_text ────────────────────────────────────────────────────────

    #[test]
    fn test_truncate_text_exact_length_untouched() {
        assert_eq!(truncate_text("abcde", 5), "abcde");
    }

    #[test]
    fn test_truncate_text_multibyte() {
        assert_eq!(truncate_text("ééééé", 3), "éé…");
    }

    #[test]
    fn test_truncate_text_flattens_newlines() {
        assert_eq!(truncate_text("line one\nline two", 40), "line one line two");
    }
}
