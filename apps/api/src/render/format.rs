//! Date and URL display helpers shared by every template and the PDF exporter.

use chrono::NaiveDate;

pub const PRESENT: &str = "Present";

/// "2021-01" → "Jan 2021". Input that is not a year-month is returned unchanged.
pub fn format_year_month(raw: &str) -> String {
    let trimmed = raw.trim();
    match NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d") {
        Ok(date) => date.format("%b %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// "<start> - <end>", with a missing or blank end rendered as "Present".
pub fn format_date_range(start: &str, end: Option<&str>) -> String {
    let end = match end.map(str::trim).filter(|e| !e.is_empty()) {
        Some(end) => format_year_month(end),
        None => PRESENT.to_string(),
    };
    if start.trim().is_empty() {
        return end;
    }
    format!("{} - {}", format_year_month(start), end)
}

/// Display form of a URL: scheme and leading `www.` removed. Applying it twice changes nothing.
pub fn strip_scheme(url: &str) -> &str {
    let mut current = url.trim();
    loop {
        let next = strip_once(current);
        if next.len() == current.len() {
            return current;
        }
        current = next;
    }
}

fn strip_once(url: &str) -> &str {
    for prefix in ["https://", "http://", "www."] {
        if let Some(head) = url.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                return &url[prefix.len()..];
            }
        }
    }
    url
}

/// Absolute href for user-entered URLs ("github.com/jane" → "https://github.com/jane").
pub fn absolute_href(url: &str) -> String {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("mailto:") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_year_month() {
        assert_eq!(format_year_month("2021-01"), "Jan 2021");
        assert_eq!(format_year_month("1999-12"), "Dec 1999");
    }

    #[test]
    fn test_format_year_month_returns_malformed_input_raw() {
        assert_eq!(format_year_month("sometime"), "sometime");
        assert_eq!(format_year_month("2021-13"), "2021-13");
        assert_eq!(format_year_month(""), "");
    }

    #[test]
    fn test_date_range_open_end_is_present() {
        assert_eq!(format_date_range("2021-01", None), "Jan 2021 - Present");
        assert_eq!(format_date_range("2021-01", Some("")), "Jan 2021 - Present");
        assert_eq!(
            format_date_range("2019-03", Some("2020-11")),
            "Mar 2019 - Nov 2020"
        );
    }

    #[test]
    fn test_strip_scheme() {
        assert_eq!(strip_scheme("https://www.example.com/a"), "example.com/a");
        assert_eq!(strip_scheme("http://example.com"), "example.com");
        assert_eq!(strip_scheme("HTTPS://WWW.Example.com"), "Example.com");
        assert_eq!(strip_scheme("example.com"), "example.com");
    }

    #[test]
    fn test_strip_scheme_is_idempotent() {
        for url in [
            "https://www.www.example.com",
            "http://https://x.io",
            "www.",
            "",
            "ftp://files.example.com",
        ] {
            let once = strip_scheme(url);
            assert_eq!(strip_scheme(once), once, "not idempotent for {url:?}");
        }
    }

    #[test]
    fn test_absolute_href() {
        assert_eq!(absolute_href("github.com/jane"), "https://github.com/jane");
        assert_eq!(absolute_href("http://x.io"), "http://x.io");
        assert_eq!(absolute_href("mailto:a@b.c"), "mailto:a@b.c");
    }
}
