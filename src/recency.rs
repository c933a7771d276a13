//! Recency and staleness gates.
//!
//! Two independent checks, both of which an article has to pass:
//! - `is_recent`: the publish timestamp falls inside the lookback window.
//!   Unparseable timestamps are rejected, never assumed fresh.
//! - `is_about_past_event`: the text does not recap or reference old events
//!   ("yesterday", "newsletter", "daily roundup", ...), even when the article
//!   itself was published a minute ago.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

/// Age description returned for timestamps nothing could parse.
pub const UNKNOWN_AGE: &str = "unknown age";

/// Formats carrying a numeric offset, tried in order.
const OFFSET_FORMATS: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Formats with a zone name or `Z` suffix; all of these denote UTC.
const UTC_FORMATS: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S GMT",
    "%a, %d %b %Y %H:%M:%S UTC",
    "%a, %d %b %Y %H:%M:%S UT",
    "%Y-%m-%dT%H:%M:%SZ",
];

/// Past-time references and roundup/newsletter markers (English + German).
pub const STALENESS_MARKERS: &[&str] = &[
    // past time references
    "yesterday",
    "gestern",
    "einen tag nach",
    "one day after",
    "last week",
    "letzte woche",
    "days ago",
    "vor tagen",
    "last month",
    "letzten monat",
    "weeks ago",
    "vor wochen",
    // daily summaries and newsletters
    "tagesnachrichten",
    "daily news",
    "the daily",
    "newsletter",
    "daily roundup",
    "roundup",
    "zusammenfassung",
    "wochentagnachmittagen",
    "weekly roundup",
    "wochenrückblick",
    "recap",
    "rückblick",
];

/// Parse a feed timestamp into naive UTC.
///
/// Known formats are tried first, in order; the first hit wins. Anything left
/// over goes through the generic RFC 2822 / RFC 3339 parsers. Offsets are
/// applied before the zone is dropped, so the result is comparable with
/// `Utc::now().naive_utc()`.
pub fn parse_published(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }
    for fmt in UTC_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    generic_feed_date(s)
}

/// Fallback parser for the RFC dialects feeds actually emit
/// (single-digit days, obsolete zone names, fractional seconds).
fn generic_feed_date(s: &str) -> Option<NaiveDateTime> {
    let parsed = OffsetDateTime::parse(s, &Rfc2822)
        .or_else(|_| OffsetDateTime::parse(s, &Rfc3339))
        .ok()?;
    DateTime::<Utc>::from_timestamp(parsed.unix_timestamp(), parsed.nanosecond())
        .map(|dt| dt.naive_utc())
}

/// Human age: "N minutes old" under an hour, "N hours old" under a day,
/// otherwise "N days old". Truncates toward zero.
pub fn describe_age(age: Duration) -> String {
    let secs = age.num_seconds();
    if secs < 3_600 {
        format!("{} minutes old", secs / 60)
    } else if secs < 86_400 {
        format!("{} hours old", secs / 3_600)
    } else {
        format!("{} days old", secs / 86_400)
    }
}

/// `(is_recent, age_description)` relative to the current time.
pub fn is_recent(published: &str, lookback_hours: u32) -> (bool, String) {
    is_recent_at(published, lookback_hours, Utc::now().naive_utc())
}

/// Same as [`is_recent`] with an explicit `now` (naive UTC).
pub fn is_recent_at(published: &str, lookback_hours: u32, now: NaiveDateTime) -> (bool, String) {
    let Some(published_at) = parse_published(published) else {
        tracing::debug!(published, "could not parse timestamp");
        return (false, UNKNOWN_AGE.to_string());
    };

    let age = now - published_at;
    // A window reaching past the calendar's start has no lower bound.
    let fresh = Duration::try_hours(i64::from(lookback_hours))
        .and_then(|window| now.checked_sub_signed(window))
        .map_or(true, |cutoff| published_at > cutoff);
    (fresh, describe_age(age))
}

/// True when title or summary contains any staleness marker (case-insensitive).
pub fn is_about_past_event(title: &str, summary: &str) -> bool {
    let title = title.to_lowercase();
    let summary = summary.to_lowercase();
    STALENESS_MARKERS
        .iter()
        .any(|m| title.contains(m) || summary.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn parses_rfc822_with_numeric_offset() {
        let dt = parse_published("Sat, 06 Dec 2025 16:02:00 +0200").unwrap();
        assert_eq!(dt, at(2025, 12, 6, 14, 2));
    }

    #[test]
    fn parses_rfc822_with_zone_name() {
        let dt = parse_published("Sat, 06 Dec 2025 16:02:00 GMT").unwrap();
        assert_eq!(dt, at(2025, 12, 6, 16, 2));
    }

    #[test]
    fn parses_iso_variants() {
        assert_eq!(
            parse_published("2025-12-06T16:02:00Z").unwrap(),
            at(2025, 12, 6, 16, 2)
        );
        assert_eq!(
            parse_published("2025-12-06T16:02:00+01:00").unwrap(),
            at(2025, 12, 6, 15, 2)
        );
        assert_eq!(
            parse_published("2025-12-06T16:02:00.250+0000")
                .unwrap()
                .and_utc()
                .timestamp(),
            at(2025, 12, 6, 16, 2).and_utc().timestamp()
        );
    }

    #[test]
    fn parses_single_digit_day() {
        let dt = parse_published("Sat, 6 Dec 2025 16:02:00 +0000").unwrap();
        assert_eq!(dt, at(2025, 12, 6, 16, 2));
    }

    #[test]
    fn generic_fallback_handles_fractional_zulu() {
        let dt = parse_published("2025-12-06T16:02:00.5Z").unwrap();
        assert_eq!(
            dt.and_utc().timestamp(),
            at(2025, 12, 6, 16, 2).and_utc().timestamp()
        );
    }

    #[test]
    fn garbage_is_rejected_closed() {
        let now = at(2025, 12, 6, 16, 0);
        assert_eq!(
            is_recent_at("not a date", 3, now),
            (false, UNKNOWN_AGE.to_string())
        );
        assert_eq!(is_recent_at("", 3, now), (false, UNKNOWN_AGE.to_string()));
    }

    #[test]
    fn inside_and_outside_window() {
        let now = at(2025, 12, 6, 16, 0);
        let (fresh, age) = is_recent_at("Sat, 06 Dec 2025 15:30:00 GMT", 1, now);
        assert!(fresh);
        assert_eq!(age, "30 minutes old");

        let (old, age) = is_recent_at("Sat, 06 Dec 2025 12:00:00 GMT", 3, now);
        assert!(!old);
        assert_eq!(age, "4 hours old");

        let (older, age) = is_recent_at("Wed, 03 Dec 2025 12:00:00 GMT", 4, now);
        assert!(!older);
        assert_eq!(age, "3 days old");
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let now = at(2025, 12, 6, 16, 0);
        let (recent, _) = is_recent_at("Sat, 06 Dec 2025 15:00:00 GMT", 1, now);
        assert!(!recent);
    }

    #[test]
    fn huge_window_has_no_lower_bound() {
        let now = at(2025, 12, 6, 16, 0);
        let (fresh, age) = is_recent_at("Sat, 06 Dec 2025 15:30:00 GMT", u32::MAX, now);
        assert!(fresh);
        assert_eq!(age, "30 minutes old");

        let (fresh, _) = is_recent_at("Mon, 01 Jan 1990 00:00:00 GMT", u32::MAX, now);
        assert!(fresh);
    }

    #[test]
    fn daily_newsletter_is_past_event() {
        let title = "Die Tagesnachrichten: JPMorgan sagt, dass Strategie der Schlüssel zu Bitcoins nächstem Schritt ist";
        let summary = "Der folgende Artikel ist aus dem Newsletter von The Block, The Daily, adaptiert, der an Wochentagnachmittagen erscheint.";
        assert!(is_about_past_event(title, summary));
    }

    #[test]
    fn fresh_headline_is_not_past_event() {
        assert!(!is_about_past_event("Bitcoin reaches $95k", ""));
    }

    #[test]
    fn marker_in_summary_only_counts() {
        assert!(is_about_past_event("ETH moves", "A recap of the session"));
        assert!(is_about_past_event("Markt", "Wie GESTERN berichtet"));
    }
}
