use chrono::{NaiveTime, Timelike};

/// Parses a `HH:MM` wall-clock string (hours 0-23, minutes 0-59) into
/// minutes since midnight. Anything chrono cannot parse as `%H:%M` is an
/// error, including out-of-range components and trailing input.
pub fn minutes_from_hhmm(time: &str) -> anyhow::Result<i64> {
    let t = NaiveTime::parse_from_str(time, "%H:%M")?;
    Ok(t.hour() as i64 * 60 + t.minute() as i64)
}

pub fn hhmm_from_minutes(minutes_since_midnight: i64) -> String {
    let min = minutes_since_midnight % 60;
    let hour = minutes_since_midnight / 60;
    format!("{hour:0>2}:{min:0>2}")
}

#[test]
fn test_minutes_from_hhmm() {
    for (time, minutes) in &[
        ("00:00", 0),
        ("08:00", 480),
        ("09:00", 540),
        ("10:00", 600),
        ("23:59", 1439),
    ] {
        let m = minutes_from_hhmm(time)
            .map_err(|e| println!("parse {time} error: {e}")).unwrap();
        assert_eq!(m, *minutes);
    }
}

#[test]
fn test_minutes_from_hhmm_rejects_malformed() {
    for time in &["", "9am", "24:00", "12:60", "08:00:00", "8.30", "foo"] {
        assert!(minutes_from_hhmm(time).is_err(), "{time} should not parse");
    }
}

#[test]
fn test_hhmm_round_trip() {
    for time in &["00:00", "07:05", "12:30", "23:59"] {
        let m = minutes_from_hhmm(time).unwrap();
        assert_eq!(&hhmm_from_minutes(m), time);
    }
}
