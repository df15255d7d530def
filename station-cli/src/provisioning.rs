//! Provisioning timestamp parsing (spec.md §6.6).
//!
//! The diagnostic channel delivers a 14-digit `YYYYMMDDhhmmss;` timestamp at
//! boot; a malformed one is logged and ignored rather than treated as fatal,
//! the same tolerance the original firmware's `rs232_parse_fecha_hora`
//! applies before falling back to the build timestamp.

use station_core::datetime::DateTime;

/// Parses a `YYYYMMDDhhmmss` timestamp, with or without the trailing `;`.
/// Returns `None` on anything that does not match exactly 14 ASCII digits.
pub fn parse_provision_timestamp(input: &str) -> Option<DateTime> {
    let digits = input.trim().trim_end_matches(';');
    if digits.len() != 14 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let field = |range: std::ops::Range<usize>| digits[range].parse::<u16>().ok();
    let year = field(0..4)?;
    let month = field(4..6)? as u8;
    let day = field(6..8)? as u8;
    let hour = field(8..10)? as u8;
    let minute = field(10..12)? as u8;
    let second = field(12..14)? as u8;

    if !(2000..=2099).contains(&year)
        || !(1..=12).contains(&month)
        || !(1..=31).contains(&day)
        || hour > 23
        || minute > 59
        || second > 59
    {
        return None;
    }

    Some(DateTime::new(year, month, day, hour, minute, second))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_trailing_semicolon() {
        let dt = parse_provision_timestamp("20260729120010;").unwrap();
        assert_eq!(dt, DateTime::new(2026, 7, 29, 12, 0, 10));
    }

    #[test]
    fn parses_without_semicolon() {
        let dt = parse_provision_timestamp("20260729120010").unwrap();
        assert_eq!(dt, DateTime::new(2026, 7, 29, 12, 0, 10));
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(parse_provision_timestamp("2026072912001"), None);
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert_eq!(parse_provision_timestamp("20261329120010"), None);
        assert_eq!(parse_provision_timestamp("20260732120010"), None);
        assert_eq!(parse_provision_timestamp("20260729996010"), None);
    }

    #[test]
    fn rejects_year_outside_2000_2099() {
        assert_eq!(parse_provision_timestamp("18000101000000;"), None);
        assert_eq!(parse_provision_timestamp("21000101000000;"), None);
    }

    #[test]
    fn rejects_non_digits() {
        assert_eq!(parse_provision_timestamp("2026072x120010"), None);
    }
}
