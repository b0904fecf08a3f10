use chrono::{DateTime, FixedOffset, TimeZone};
use tracing_flexible::{DatePattern, PatternError};

fn at(offset_secs: i32, ymd: (i32, u32, u32), hms: (u32, u32, u32), millis: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(offset_secs)
        .unwrap()
        .with_ymd_and_hms(ymd.0, ymd.1, ymd.2, hms.0, hms.1, hms.2)
        .unwrap()
        + chrono::Duration::milliseconds(millis as i64)
}

fn format(pattern: &str, time: &DateTime<FixedOffset>) -> String {
    DatePattern::parse(pattern).unwrap().format(time)
}

#[test]
fn test_default_pattern() {
    let time = at(0, (2026, 7, 4), (9, 5, 3), 0);

    let default = DatePattern::default();
    assert_eq!(default.as_str(), "MM/dd/yyyy HH:mm:ss");
    assert_eq!(default, DatePattern::parse("MM/dd/yyyy HH:mm:ss").unwrap());
    assert_eq!(default.format(&time), "07/04/2026 09:05:03");
}

#[test]
fn test_numeric_padding() {
    let time = at(0, (2026, 7, 4), (9, 5, 3), 7);

    assert_eq!(format("d/M/y H:m:s", &time), "4/7/2026 9:5:3");
    assert_eq!(format("dd/MM/yy HH:mm:ss", &time), "04/07/26 09:05:03");
    assert_eq!(format("SSS", &time), "007");
    assert_eq!(format("yyyyy", &time), "02026");
}

#[test]
fn test_text_fields() {
    // A Saturday
    let time = at(0, (2026, 10, 17), (21, 0, 0), 0);

    assert_eq!(format("MMM", &time), "Oct");
    assert_eq!(format("MMMM", &time), "October");
    assert_eq!(format("E", &time), "Sat");
    assert_eq!(format("EEEE", &time), "Saturday");
    assert_eq!(format("a", &time), "PM");
    assert_eq!(format("G", &time), "AD");
    assert_eq!(format("u", &time), "6");
}

#[test]
fn test_hour_fields() {
    let midnight = at(0, (2026, 10, 17), (0, 30, 0), 0);
    let noon = at(0, (2026, 10, 17), (12, 30, 0), 0);

    assert_eq!(format("H k K h a", &midnight), "0 24 0 12 AM");
    assert_eq!(format("H k K h a", &noon), "12 12 0 12 PM");
}

#[test]
fn test_calendar_fields() {
    let time = at(0, (2026, 10, 17), (0, 0, 0), 0);

    assert_eq!(format("D", &time), "290");
    assert_eq!(format("F", &time), "3");
    assert_eq!(format("w", &time), "42");
    assert_eq!(format("YYYY", &time), "2026");
    // October 2026 starts on a Thursday, so the 17th is in its third week
    assert_eq!(format("W", &time), "3");
}

#[test]
fn test_zone_fields() {
    let east = at(2 * 3600 + 30 * 60, (2026, 10, 17), (0, 0, 0), 0);
    let west = at(-5 * 3600, (2026, 10, 17), (0, 0, 0), 0);
    let utc = at(0, (2026, 10, 17), (0, 0, 0), 0);

    assert_eq!(format("Z", &east), "+0230");
    assert_eq!(format("z", &east), "GMT+02:30");
    assert_eq!(format("X|XX|XXX", &east), "+02|+0230|+02:30");

    assert_eq!(format("Z", &west), "-0500");
    assert_eq!(format("XXX", &west), "-05:00");

    assert_eq!(format("Z", &utc), "+0000");
    assert_eq!(format("z", &utc), "GMT");
    assert_eq!(format("X", &utc), "Z");
}

#[test]
fn test_quoting() {
    let time = at(0, (2026, 10, 17), (9, 5, 3), 0);

    assert_eq!(format("yyyy-MM-dd'T'HH:mm", &time), "2026-10-17T09:05");
    assert_eq!(format("'at' HH 'o''clock'", &time), "at 09 o'clock");
    assert_eq!(format("HH''mm", &time), "09'05");
    assert_eq!(format("'day' d", &time), "day 17");
}

#[test]
fn test_invalid_patterns() {
    assert_eq!(
        DatePattern::parse("yyyy-MM-dd T"),
        Err(PatternError::IllegalLetter('T'))
    );
    assert_eq!(DatePattern::parse("HH 'open"), Err(PatternError::UnterminatedQuote));
    assert!("bogus".parse::<DatePattern>().is_err());
}

#[test]
fn test_non_letters_are_literal() {
    let time = at(0, (2026, 10, 17), (9, 5, 3), 0);

    assert_eq!(format("[HH] → {mm} ü", &time), "[09] → {05} ü");
    assert_eq!(format("", &time), "");
}

#[test]
fn test_week_fields_use_iso_weeks() {
    // Friday, ISO week 53 of 2020
    let time = at(0, (2021, 1, 1), (0, 0, 0), 0);
    assert_eq!(format("YYYY-'W'ww", &time), "2020-W53");
    assert_eq!(format("yyyy", &time), "2021");

    // Sunday, still ISO week 52
    let time = at(0, (2026, 12, 27), (0, 0, 0), 0);
    assert_eq!(format("w", &time), "52");
}
