//! Temporal alignment of forecast series and display-time formatting.
//!
//! The raw hourly series starts at local midnight; the display window must
//! start at "now". All series timestamps are zone-less ISO strings in the
//! location's own timezone (`timezone=auto`), so they are parsed and compared
//! as naive wall-clock values.

use chrono::{NaiveDate, NaiveDateTime};

/// Parse an Open-Meteo timestamp (`2026-08-06T14:30`, seconds optional).
#[must_use]
pub fn parse_iso_minutes(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Pick the index the hourly display window starts at.
///
/// An exact match on the current observation timestamp wins; otherwise the
/// first entry at or after `now` is used; a series that is empty or lies
/// entirely in the past anchors at 0.
#[must_use]
pub fn pick_hourly_start(times: &[String], current_time: Option<&str>, now: NaiveDateTime) -> usize {
    if times.is_empty() {
        return 0;
    }
    if let Some(current) = current_time {
        if let Some(index) = times.iter().position(|t| t == current) {
            return index;
        }
    }
    times
        .iter()
        .position(|t| parse_iso_minutes(t).is_some_and(|slot| slot >= now))
        .unwrap_or(0)
}

/// 12-hour clock, e.g. "5:43 AM". Unparseable input renders as "--".
#[must_use]
pub fn format_clock(iso_text: &str) -> String {
    match parse_iso_minutes(iso_text) {
        Some(dt) => dt.format("%-I:%M %p").to_string(),
        None => "--".to_string(),
    }
}

/// Hour label for a forecast slot; the first slot is pinned to "Now".
#[must_use]
pub fn format_hour_label(iso_text: &str, is_first: bool) -> String {
    if is_first {
        return "Now".to_string();
    }
    match parse_iso_minutes(iso_text) {
        Some(dt) => dt.format("%-I%P").to_string(),
        None => "--".to_string(),
    }
}

/// Day label for a daily slot; index 0 is pinned to "Today".
#[must_use]
pub fn format_day_label(iso_date: &str, index: usize) -> String {
    if index == 0 {
        return "Today".to_string();
    }
    match NaiveDate::parse_from_str(iso_date, "%Y-%m-%d") {
        Ok(date) => date.format("%a, %b %-d").to_string(),
        Err(_) => "--".to_string(),
    }
}

/// Full date-time, e.g. "Thu, Aug 6, 2:30 PM".
#[must_use]
pub fn format_date_time(iso_text: &str) -> String {
    match parse_iso_minutes(iso_text) {
        Some(dt) => format!("{}, {}", dt.format("%a, %b %-d"), dt.format("%-I:%M %p")),
        None => "--".to_string(),
    }
}

/// Timezone tag for the "updated" line: abbreviation, else zone name, else
/// "local".
#[must_use]
pub fn timezone_tag(abbreviation: Option<&str>, timezone: Option<&str>) -> String {
    abbreviation
        .filter(|tag| !tag.is_empty())
        .or(timezone.filter(|tag| !tag.is_empty()))
        .unwrap_or("local")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(text: &str) -> NaiveDateTime {
        parse_iso_minutes(text).unwrap()
    }

    fn series(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_current_time_match_wins() {
        let times = series(&[
            "2026-08-06T10:00",
            "2026-08-06T11:00",
            "2026-08-06T12:00",
        ]);
        let start = pick_hourly_start(&times, Some("2026-08-06T11:00"), naive("2026-08-06T09:00"));
        assert_eq!(start, 1);
    }

    #[test]
    fn first_future_slot_when_no_exact_match() {
        let times = series(&[
            "2026-08-06T10:00",
            "2026-08-06T11:00",
            "2026-08-06T12:00",
        ]);
        let start = pick_hourly_start(&times, Some("2026-08-06T11:23"), naive("2026-08-06T11:23"));
        assert_eq!(start, 2);
    }

    #[test]
    fn series_entirely_in_past_anchors_at_zero() {
        let times = series(&[
            "2026-08-06T10:00",
            "2026-08-06T11:00",
            "2026-08-06T12:00",
        ]);
        let start = pick_hourly_start(&times, None, naive("2026-08-06T13:00"));
        assert_eq!(start, 0);
    }

    #[test]
    fn empty_series_anchors_at_zero() {
        assert_eq!(pick_hourly_start(&[], None, naive("2026-08-06T13:00")), 0);
    }

    #[test]
    fn series_entirely_in_future_anchors_at_first_entry() {
        let times = series(&["2026-08-07T06:00", "2026-08-07T07:00"]);
        let start = pick_hourly_start(&times, None, naive("2026-08-06T13:00"));
        assert_eq!(start, 0);
    }

    #[test]
    fn unparseable_entries_are_skipped() {
        let times = series(&["garbage", "2026-08-06T15:00"]);
        let start = pick_hourly_start(&times, None, naive("2026-08-06T13:00"));
        assert_eq!(start, 1);
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock("2026-08-06T05:43"), "5:43 AM");
        assert_eq!(format_clock("2026-08-06T17:05"), "5:05 PM");
        assert_eq!(format_clock("2026-08-06T00:10"), "12:10 AM");
        assert_eq!(format_clock("2026-08-06T12:00"), "12:00 PM");
        assert_eq!(format_clock("not a time"), "--");
    }

    #[test]
    fn hour_labels() {
        assert_eq!(format_hour_label("2026-08-06T15:00", true), "Now");
        assert_eq!(format_hour_label("2026-08-06T15:00", false), "3pm");
        assert_eq!(format_hour_label("2026-08-06T00:00", false), "12am");
        assert_eq!(format_hour_label("junk", false), "--");
    }

    #[test]
    fn day_labels() {
        assert_eq!(format_day_label("2026-08-06", 0), "Today");
        assert_eq!(format_day_label("2026-08-08", 2), "Sat, Aug 8");
        assert_eq!(format_day_label("junk", 3), "--");
    }

    #[test]
    fn date_time_formatting() {
        assert_eq!(format_date_time("2026-08-06T14:30"), "Thu, Aug 6, 2:30 PM");
    }

    #[test]
    fn timezone_tag_fallback_chain() {
        assert_eq!(timezone_tag(Some("IST"), Some("Asia/Kolkata")), "IST");
        assert_eq!(timezone_tag(None, Some("Asia/Kolkata")), "Asia/Kolkata");
        assert_eq!(timezone_tag(Some(""), None), "local");
        assert_eq!(timezone_tag(None, None), "local");
    }
}
