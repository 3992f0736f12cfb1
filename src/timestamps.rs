use jiff::{
    Timestamp,
    tz::{Offset, TimeZone},
};

/// Display offset for all outgoing timestamps (UTC+5:30, IST).
const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

pub fn now_sec() -> i64 {
    Timestamp::now().as_second()
}

/// Renders stored epoch seconds as `YYYY-MM-DD HH:MM:SS` in IST, 24-hour
/// clock, independent of server or client locale. Presentation only; the
/// stored value stays an epoch timestamp.
pub fn format_ist(epoch_seconds: i64) -> String {
    let ts = Timestamp::from_second(epoch_seconds).unwrap_or(Timestamp::UNIX_EPOCH);
    let tz = TimeZone::fixed(Offset::from_seconds(IST_OFFSET_SECONDS).unwrap_or(Offset::UTC));
    ts.to_zoned(tz).strftime("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn now_ist() -> String {
    format_ist(now_sec())
}

pub fn current_year() -> i32 {
    i32::from(jiff::Zoned::now().date().year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_renders_with_ist_offset() {
        assert_eq!(format_ist(0), "1970-01-01 05:30:00");
    }

    #[test]
    fn format_is_24_hour_and_zero_padded() {
        // 2023-11-14 22:13:20 UTC
        assert_eq!(format_ist(1_700_000_000), "2023-11-15 03:43:20");
    }

    #[test]
    fn same_input_formats_identically() {
        let ts = 1_600_000_000;
        assert_eq!(format_ist(ts), format_ist(ts));
    }
}
