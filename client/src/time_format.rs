use chrono::NaiveDate;

/// Render a `YYYY-MM-DD` survey date as "Mon DD, YYYY" for the overlay.
/// Labels that do not parse come back unchanged so the slider still shows
/// something for malformed dataset entries.
pub fn format_date_label(label: &str) -> String {
    NaiveDate::parse_from_str(label, "%Y-%m-%d")
        .map(|date| date.format("%b %d, %Y").to_string())
        .unwrap_or_else(|_| label.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_iso_dates() {
        assert_eq!(format_date_label("2020-01-05"), "Jan 05, 2020");
        assert_eq!(format_date_label("2019-12-31"), "Dec 31, 2019");
    }

    #[test]
    fn passes_unparseable_labels_through() {
        assert_eq!(format_date_label("wave-3"), "wave-3");
        assert_eq!(format_date_label(""), "");
    }
}
