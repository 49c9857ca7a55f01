//! Number formatting for filter labels.

/// Formats a number the way an en-US locale does: comma thousands separators
/// and at most three fraction digits, trailing zeros dropped.
pub fn format_thousands(value: f64) -> String {
    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((&rounded, ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    if value.is_sign_negative() && rounded.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        grouped.push('-');
    }
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

/// Formats a number with the shortest representation, `120` rather than `120.0`.
pub fn format_plain(value: f64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1500.0), "1,500");
        assert_eq!(format_thousands(250_000.0), "250,000");
        assert_eq!(format_thousands(1_234_567.0), "1,234,567");
        assert_eq!(format_thousands(1500.5), "1,500.5");
        assert_eq!(format_thousands(1234.5678), "1,234.568");
        assert_eq!(format_thousands(-2500.0), "-2,500");
    }

    #[test]
    fn test_format_plain() {
        assert_eq!(format_plain(120.0), "120");
        assert_eq!(format_plain(2.5), "2.5");
    }
}
