//! Lenient number parsing and formatting shared by the parser and built-in tags.
//!
//! Template text is untyped, so every numeric operand arrives as a string.
//! None of these helpers fail loudly: callers turn `None` into an empty
//! substitution.

/// Parse a whole operand as a number.
///
/// Surrounding whitespace is ignored and an empty operand reads as `0`.
/// `Infinity` is accepted with an optional sign; other words (`inf`, `nan`)
/// are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    if text
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }

    text.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Parse the longest numeric prefix of an operand (`"5px"` reads as `5`).
///
/// Returns `None` when the operand does not start with a number.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if text[end..].starts_with("Infinity") {
        return text[..end + "Infinity".len()].replace("Infinity", "inf").parse().ok();
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}

/// Whether the operand starts with an integer (optional sign, then digits).
pub fn has_integer_prefix(text: &str) -> bool {
    let text = text.trim_start();
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    digits.starts_with(|c: char| c.is_ascii_digit())
}

/// Parse an operand as a non-negative integral list index.
pub fn parse_index(text: &str) -> Option<usize> {
    let n = parse_number(text)?;
    if !n.is_finite() || n < 0.0 || n.fract() != 0.0 || n > usize::MAX as f64 {
        return None;
    }
    Some(n as usize)
}

/// Format a number the way template output expects it.
///
/// Integral values print without a fraction, `-0` prints as `0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        return format!("{:.0}", n);
    }
    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number(" -3.5 "), Some(-3.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number(""), Some(0.0));
        assert_eq!(parse_number("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("12px"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("5px"), Some(5.0));
        assert_eq!(parse_float_prefix("  -2.25rem"), Some(-2.25));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("3e2x"), Some(300.0));
        assert_eq!(parse_float_prefix("3e"), Some(3.0));
        assert_eq!(parse_float_prefix("null"), None);
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix(""), None);
    }

    #[test]
    fn test_has_integer_prefix() {
        assert!(has_integer_prefix("12abc"));
        assert!(has_integer_prefix(" -7"));
        assert!(!has_integer_prefix("abc"));
        assert!(!has_integer_prefix(""));
        assert!(!has_integer_prefix("-"));
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("2"), Some(2));
        assert_eq!(parse_index(""), Some(0));
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index("1.5"), None);
        assert_eq!(parse_index("x"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }
}
