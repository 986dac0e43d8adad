/// Cell-level text formatting: truncation, id abbreviation, timestamps.
use std::borrow::Cow;

use chrono::{DateTime, Utc};

/// Appended to anything cut short.
pub const ELLIPSIS: &str = "...";

/// Table column thresholds, in characters.
pub const TITLE_WIDTH: usize = 50;
pub const DESCRIPTION_WIDTH: usize = 60;

/// Leading characters kept when abbreviating an id.
pub const ID_PREFIX_LEN: usize = 8;

/// Flatten `text` onto one line and cut it to `max` characters plus
/// [`ELLIPSIS`].
///
/// The cut happens on a char boundary and trailing whitespace before the
/// marker is dropped, so the result is at most `max + ELLIPSIS.len()` chars.
#[must_use]
pub fn truncate(text: &str, max: usize) -> Cow<'_, str> {
    let flat: Cow<'_, str> = if text.contains(['\n', '\r']) {
        Cow::Owned(text.replace('\r', "").replace('\n', " "))
    } else {
        Cow::Borrowed(text)
    };

    if flat.chars().count() <= max {
        return flat;
    }

    let cut: String = flat.chars().take(max).collect();
    let mut out = cut.trim_end().to_owned();
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

/// [`truncate`] unless `no_truncate`, in which case `text` is returned as is.
#[must_use]
pub fn maybe_truncate(text: &str, max: usize, no_truncate: bool) -> Cow<'_, str> {
    if no_truncate {
        Cow::Borrowed(text)
    } else {
        truncate(text, max)
    }
}

/// Shorten an opaque id to its first [`ID_PREFIX_LEN`] chars plus
/// [`ELLIPSIS`], unless `full` or the id is already short.
#[must_use]
pub fn display_id(id: &str, full: bool) -> Cow<'_, str> {
    if full || id.chars().count() <= ID_PREFIX_LEN + ELLIPSIS.len() {
        return Cow::Borrowed(id);
    }
    let mut out: String = id.chars().take(ID_PREFIX_LEN).collect();
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `2026-01-30T18:04:11.123Z` → `2026-01-30 18:04`. Unparseable input is
/// returned verbatim.
#[must_use]
pub fn format_timestamp(ts: &str) -> String {
    parse_timestamp(ts).map_or_else(
        || ts.to_owned(),
        |dt| dt.format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// Compact relative age of `ts` as seen from `now`: `45s`, `12m`, `3h`,
/// `5d`, `2mo`, `1y`. Future timestamps read as `0s`.
#[must_use]
pub fn format_age(ts: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(ts) else {
        return ts.to_owned();
    };
    let secs = (now - then).num_seconds().max(0);
    match secs {
        s if s < 60 => format!("{s}s"),
        s if s < 3_600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3_600),
        s if s < 30 * 86_400 => format!("{}d", s / 86_400),
        s if s < 365 * 86_400 => format!("{}mo", s / (30 * 86_400)),
        s => format!("{}y", s / (365 * 86_400)),
    }
}

/// Similarity in [0, 1] as a whole percentage.
#[must_use]
pub fn format_similarity(similarity: Option<f64>) -> String {
    match similarity {
        Some(s) if s.is_finite() => format!("{:.0}%", s.clamp(0.0, 1.0) * 100.0),
        _ => "-".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_truncate_long_text() {
        let text = "a".repeat(80);
        let out = truncate(&text, TITLE_WIDTH);
        assert!(out.ends_with(ELLIPSIS));
        assert_eq!(out.chars().count(), TITLE_WIDTH + ELLIPSIS.len());
    }

    #[test]
    fn test_truncate_bound_holds_across_lengths() {
        for len in [0, 1, 49, 50, 51, 119, 120, 121, 500] {
            let text = "word ".repeat(len / 5) + &"x".repeat(len % 5);
            let out = truncate(&text, TITLE_WIDTH);
            if text.chars().count() > TITLE_WIDTH {
                assert!(out.ends_with(ELLIPSIS), "len {len}");
                assert!(out.chars().count() <= TITLE_WIDTH + ELLIPSIS.len(), "len {len}");
            } else {
                assert_eq!(out, text.as_str());
            }
        }
    }

    #[test]
    fn test_truncate_multibyte_on_char_boundary() {
        let text = "🦞".repeat(10);
        let out = truncate(&text, 4);
        assert_eq!(out, "🦞🦞🦞🦞...");
    }

    #[test]
    fn test_truncate_flattens_newlines() {
        assert_eq!(truncate("line one\r\nline two", 100), "line one line two");
    }

    #[test]
    fn test_no_truncate_keeps_original() {
        let text = format!("{}\nsecond line", "z".repeat(300));
        let out = maybe_truncate(&text, TITLE_WIDTH, true);
        assert_eq!(out.len(), text.len());
        assert_eq!(out, text.as_str());
    }

    #[test]
    fn test_display_id() {
        let id = "74b073fd-37db-4a32-a9e1-c7652e5c0d59";
        assert_eq!(display_id(id, false), "74b073fd...");
        assert_eq!(display_id(id, true), id);
        assert_eq!(display_id("short", false), "short");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2026-01-30T18:04:11.123Z"), "2026-01-30 18:04");
        assert_eq!(format_timestamp("2026-01-30T20:04:11+02:00"), "2026-01-30 18:04");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_format_age() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        assert_eq!(format_age("2026-02-01T11:59:15Z", now), "45s");
        assert_eq!(format_age("2026-02-01T11:48:00Z", now), "12m");
        assert_eq!(format_age("2026-02-01T09:00:00Z", now), "3h");
        assert_eq!(format_age("2026-01-27T12:00:00Z", now), "5d");
        assert_eq!(format_age("2025-12-01T12:00:00Z", now), "2mo");
        assert_eq!(format_age("2024-12-01T12:00:00Z", now), "1y");
        assert_eq!(format_age("2026-03-01T00:00:00Z", now), "0s");
        assert_eq!(format_age("", now), "");
    }

    #[test]
    fn test_format_similarity() {
        assert_eq!(format_similarity(Some(0.823)), "82%");
        assert_eq!(format_similarity(Some(1.0)), "100%");
        assert_eq!(format_similarity(None), "-");
    }
}
