//! IEC 60870-5-4 time tag codecs.
//!
//! Three little-endian formats: CP16Time2a (2 octets, milliseconds),
//! CP24Time2a (3 octets, milliseconds + minute + validity) and CP56Time2a
//! (7 octets, full calendar time with validity and summer-time bits).
//! Encoding and decoding run against the session time zone from `Params`;
//! the century is inferred as 2000-based.

use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone, Timelike, Utc};

/// A CP24Time2a tag with the invalid bit set; stands in for an absent time.
pub const CP24TIME2A_INVALID: [u8; 3] = [0, 0, 0x80];

/// A CP56Time2a tag with the invalid bit set; stands in for an absent time.
pub const CP56TIME2A_INVALID: [u8; 7] = [0, 0, 0x80, 0, 0, 0, 0];

/// Encode a CP56Time2a time tag (7 octets) in the given zone.
pub fn cp56time2a(t: DateTime<Utc>, zone: FixedOffset) -> [u8; 7] {
    let ts = t.with_timezone(&zone);
    let msec = ts.second() * 1000 + ts.timestamp_subsec_millis();
    [
        msec as u8,
        (msec >> 8) as u8,
        ts.minute() as u8,
        ts.hour() as u8,
        ((ts.weekday().number_from_monday() as u8) << 5) | ts.day() as u8,
        ts.month() as u8,
        ((ts.year() - 2000) as u8) & 0x7F,
    ]
}

/// Decode a CP56Time2a time tag into an instant in the given zone.
///
/// Returns `None` when the invalid bit is set or the calendar fields do not
/// name a real date.
pub fn parse_cp56time2a(b: &[u8; 7], zone: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if b[2] & 0x80 != 0 {
        return None;
    }
    let x = u32::from(u16::from_le_bytes([b[0], b[1]]));
    let msec = x % 1000;
    let sec = x / 1000;
    let min = u32::from(b[2] & 0x3F);
    let hour = u32::from(b[3] & 0x1F);
    let day = u32::from(b[4] & 0x1F);
    let month = u32::from(b[5] & 0x0F);
    let year = 2000 + i32::from(b[6] & 0x7F);

    zone.with_ymd_and_hms(year, month, day, hour, min, sec)
        .single()?
        .checked_add_signed(Duration::milliseconds(i64::from(msec)))
}

/// Encode a CP24Time2a time tag (3 octets): milliseconds and minute only.
pub fn cp24time2a(t: DateTime<Utc>, zone: FixedOffset) -> [u8; 3] {
    let ts = t.with_timezone(&zone);
    let msec = ts.second() * 1000 + ts.timestamp_subsec_millis();
    [msec as u8, (msec >> 8) as u8, ts.minute() as u8]
}

/// Decode a CP24Time2a time tag.
///
/// The format carries only milliseconds and minute; the remaining calendar
/// fields are taken from the reception instant in the given zone. Returns
/// `None` when the invalid bit is set.
pub fn parse_cp24time2a(b: &[u8; 3], zone: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if b[2] & 0x80 != 0 {
        return None;
    }
    let x = u32::from(u16::from_le_bytes([b[0], b[1]]));
    let msec = x % 1000;
    let sec = x / 1000;
    let min = u32::from(b[2] & 0x3F);

    let now = Utc::now().with_timezone(&zone);
    zone.with_ymd_and_hms(now.year(), now.month(), now.day(), now.hour(), min, sec)
        .single()?
        .checked_add_signed(Duration::milliseconds(i64::from(msec)))
}

/// Encode a CP16Time2a time tag (2 octets): raw milliseconds 0..59999.
#[inline]
pub fn cp16time2a(msec: u16) -> [u8; 2] {
    msec.to_le_bytes()
}

/// Decode a CP16Time2a time tag.
#[inline]
pub fn parse_cp16time2a(b: &[u8; 2]) -> u16 {
    u16::from_le_bytes(*b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc_zone() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_cp56_layout() {
        // 2019-06-05 04:03:02.001 UTC, a Wednesday (dow = 3)
        let t = Utc.with_ymd_and_hms(2019, 6, 5, 4, 3, 2).unwrap()
            + Duration::milliseconds(1);
        let b = cp56time2a(t, utc_zone());
        assert_eq!(b, [0xD1, 0x07, 3, 4, (3 << 5) | 5, 6, 19]);
    }

    #[test]
    fn test_cp56_roundtrip() {
        let zone = utc_zone();
        let samples = [
            Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap() + Duration::milliseconds(999),
            Utc.with_ymd_and_hms(2055, 7, 14, 12, 30, 45).unwrap() + Duration::milliseconds(123),
            Utc.with_ymd_and_hms(2099, 12, 31, 23, 59, 59).unwrap(),
        ];
        for t in samples {
            let b = cp56time2a(t, zone);
            let decoded = parse_cp56time2a(&b, zone).unwrap();
            assert_eq!(decoded.with_timezone(&Utc), t, "roundtrip failed for {}", t);
        }
    }

    #[test]
    fn test_cp56_roundtrip_offset_zone() {
        let zone = FixedOffset::east_opt(8 * 3600).unwrap();
        let t = Utc.with_ymd_and_hms(2021, 3, 15, 20, 0, 1).unwrap() + Duration::milliseconds(500);
        let b = cp56time2a(t, zone);
        // 20:00 UTC is 04:00 next day in +08:00
        assert_eq!(b[3], 4);
        assert_eq!(b[4] & 0x1F, 16);
        let decoded = parse_cp56time2a(&b, zone).unwrap();
        assert_eq!(decoded.with_timezone(&Utc), t);
    }

    #[test]
    fn test_cp56_invalid_bit() {
        let t = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let mut b = cp56time2a(t, utc_zone());
        b[2] |= 0x80;
        assert!(parse_cp56time2a(&b, utc_zone()).is_none());
    }

    #[test]
    fn test_cp56_bad_calendar() {
        // month 0 is not a real date
        let b = [0, 0, 0, 0, 1, 0, 20];
        assert!(parse_cp56time2a(&b, utc_zone()).is_none());
    }

    #[test]
    fn test_cp24_encode() {
        let t = Utc.with_ymd_and_hms(2019, 6, 5, 4, 3, 2).unwrap()
            + Duration::milliseconds(1);
        assert_eq!(cp24time2a(t, utc_zone()), [0xD1, 0x07, 3]);
    }

    #[test]
    fn test_cp24_decode_takes_minute_and_msec() {
        let zone = utc_zone();
        let now = Utc::now();
        let b = cp24time2a(now, zone);
        let decoded = parse_cp24time2a(&b, zone).unwrap();
        assert_eq!(decoded.minute(), now.with_timezone(&zone).minute());
        assert_eq!(
            decoded.second() * 1000 + decoded.timestamp_subsec_millis(),
            now.second() * 1000 + now.timestamp_subsec_millis()
        );
    }

    #[test]
    fn test_cp24_invalid_bit() {
        assert!(parse_cp24time2a(&[0, 0, 0x80], utc_zone()).is_none());
    }

    #[test]
    fn test_cp16_roundtrip() {
        for msec in [0u16, 1, 999, 30000, 59999] {
            assert_eq!(parse_cp16time2a(&cp16time2a(msec)), msec);
        }
        assert_eq!(cp16time2a(0x0102), [0x02, 0x01]);
    }
}
