//! Display helpers for article timestamps and body text.

use time::{
    OffsetDateTime,
    format_description::{FormatItem, well_known::Rfc3339},
    macros::format_description,
};

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

pub fn format_human_date(ts: OffsetDateTime) -> String {
    ts.format(HUMAN_DATE_FORMAT).expect("valid calendar date")
}

pub fn format_iso_date(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).expect("valid calendar date")
}

/// Split a stored article body into paragraphs on blank lines.
pub fn body_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn human_date_is_long_month() {
        let ts = datetime!(2026-03-07 09:30 UTC);
        assert_eq!(format_human_date(ts), "March 7, 2026");
    }

    #[test]
    fn iso_date_round_trips_rfc3339() {
        let ts = datetime!(2026-03-07 09:30 UTC);
        assert_eq!(format_iso_date(ts), "2026-03-07T09:30:00Z");
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let body = "First paragraph.\n\nSecond one,\nstill the same block.\n\n\n";
        assert_eq!(
            body_paragraphs(body),
            vec![
                "First paragraph.".to_string(),
                "Second one,\nstill the same block.".to_string(),
            ]
        );
    }

    #[test]
    fn whitespace_only_body_yields_no_paragraphs() {
        assert!(body_paragraphs("  \n\n \n").is_empty());
    }
}
