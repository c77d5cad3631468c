// src/core/sanitize.rs

/// Collapse whitespace runs (incl. nbsp) to single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() || ch == '\u{a0}' {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Largest count a cell may hold. Anything above is page garbage, not a
/// registration figure, and would overflow sums downstream.
pub const MAX_COUNT: u64 = 1_000_000_000_000;

/// Parse a registration count cell.
/// Strips thousands separators ("1,23,456" and "1,234,567" both work).
/// `None` for empty, non-numeric or out of range; callers coerce that to 0.
pub fn parse_count(cell: &str) -> Option<u64> {
    let cleaned: String = cell
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '\u{a0}')
        .collect();
    // "1200.0" from re-saved sheets; no other fractions, no exponents
    let digits = match cleaned.split_once('.') {
        Some((int, frac)) if !frac.is_empty() && frac.bytes().all(|b| b == b'0') => int,
        Some(_) => return None,
        None => cleaned.as_str(),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok().filter(|&v| v <= MAX_COUNT)
}

/// Header text reduced to ascii alphanumerics, lowercased ("S. No." → "sno").
pub fn header_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Serial-number column headers the portal uses.
pub fn is_serial_header(s: &str) -> bool {
    matches!(header_key(s).as_str(), "sno" | "srno" | "slno" | "serialno" | "sn" | "no" | "")
        || s.trim() == "#"
}

/// "TOTAL", "Total", "Grand Total".
pub fn is_total_label(s: &str) -> bool {
    matches!(header_key(s).as_str(), "total" | "grandtotal")
}

/// File-name-safe stem: alphanumerics kept, runs of anything else become one '_'.
pub fn file_stem(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_us = false;
        } else if !last_us {
            out.push('_');
            last_us = true;
        }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { "export".to_string() } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        assert_eq!(parse_count("1,200"), Some(1200));
        assert_eq!(parse_count(" 1,23,456 "), Some(123_456));
        assert_eq!(parse_count("800.0"), Some(800));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("-"), None);
        assert_eq!(parse_count("n/a"), None);
        assert_eq!(parse_count("-5"), None);
    }

    #[test]
    fn huge_and_float_counts_rejected() {
        assert_eq!(parse_count("18446744073709551615"), None);
        assert_eq!(parse_count("99999999999999999999999"), None);
        assert_eq!(parse_count("1e30"), None);
        assert_eq!(parse_count("1.5"), None);
        assert_eq!(parse_count("inf"), None);
        assert_eq!(parse_count("1,000,000,000,000"), Some(MAX_COUNT));
        assert_eq!(parse_count("1,000,000,000,001"), None);
    }

    #[test]
    fn serial_and_total_headers() {
        assert!(is_serial_header("S No"));
        assert!(is_serial_header("S.No."));
        assert!(is_serial_header("#"));
        assert!(!is_serial_header("Maker"));
        assert!(is_total_label("TOTAL"));
        assert!(is_total_label("Grand Total"));
        assert!(!is_total_label("Totals by month"));
    }

    #[test]
    fn whitespace_and_stems() {
        assert_eq!(normalize_ws("  MARUTI\u{a0} SUZUKI\n LTD "), "MARUTI SUZUKI LTD");
        assert_eq!(file_stem("Manufacturer Month Wise / 2024"), "manufacturer_month_wise_2024");
        assert_eq!(file_stem("***"), "export");
    }
}
