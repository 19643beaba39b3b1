// Renderer module - formatting utilities
// Most rendering logic is in layout.rs; these are the small text helpers it shares

use crate::dataset::SourceCounts;

/// Case count with thousands separators
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Human label for the selected window option
pub fn window_label(selected: &str) -> String {
    match selected {
        "any" => "all days".to_string(),
        "1" => "last 1 day".to_string(),
        n => format!("last {} days", n),
    }
}

/// `confirmed 2, probable 1`
pub fn format_sources(counts: &SourceCounts) -> String {
    if counts.is_empty() {
        return "-".to_string();
    }
    counts
        .iter()
        .map(|(source, count)| format!("{} {}", source, format_count(*count)))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_labels() {
        assert_eq!(checkbox(true), "[x]");
        assert_eq!(window_label("any"), "all days");
        assert_eq!(window_label("1"), "last 1 day");
        assert_eq!(window_label("14"), "last 14 days");
    }

    #[test]
    fn test_format_sources() {
        let counts: SourceCounts = [("confirmed".to_string(), 2), ("probable".to_string(), 1)]
            .into_iter()
            .collect();
        assert_eq!(format_sources(&counts), "confirmed 2, probable 1");
        assert_eq!(format_sources(&SourceCounts::new()), "-");
    }
}
