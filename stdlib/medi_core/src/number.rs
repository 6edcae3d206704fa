//! Numeric text handling compatible with how a browser form treats input.
//!
//! The panels coerce field text in two different ways: arithmetic on a
//! field value ([`to_number`]) and an explicit `parseFloat` right before a
//! request is built ([`parse_float`]). Both yield `NaN` rather than an
//! error; callers that want strictness check `is_nan()` themselves.

fn is_js_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Coerces text the way numeric arithmetic on a string does.
///
/// Surrounding whitespace is ignored, empty text is `0`, and anything that
/// is not entirely a numeric literal is `NaN`.
///
/// ```
/// use medi_core::to_number;
/// assert_eq!(to_number(" 42 "), 42.0);
/// assert_eq!(to_number(""), 0.0);
/// assert!(to_number("42kg").is_nan());
/// ```
pub fn to_number(text: &str) -> f64 {
    let s = text.trim_matches(is_js_space);
    if s.is_empty() {
        return 0.0;
    }
    if let Some(value) = parse_radix(s) {
        return value;
    }
    match decimal_prefix(s) {
        Some((len, value)) if len == s.len() => value,
        _ => f64::NAN,
    }
}

/// Parses the longest numeric prefix of `text`, `parseFloat` style.
///
/// ```
/// use medi_core::parse_float;
/// assert_eq!(parse_float("12abc"), 12.0);
/// assert_eq!(parse_float("  -3.5e2 mmHg"), -350.0);
/// assert!(parse_float("abc").is_nan());
/// assert!(parse_float("").is_nan());
/// ```
pub fn parse_float(text: &str) -> f64 {
    let s = text.trim_start_matches(is_js_space);
    decimal_prefix(s).map_or(f64::NAN, |(_, value)| value)
}

/// Formats with a fixed number of decimals the way `Number.prototype.toFixed`
/// does: the exact binary value is rounded, ties go to the larger
/// magnitude, `-0` prints without a sign, and non-finite values are spelled
/// `NaN`, `Infinity` and `-Infinity`.
///
/// ```
/// use medi_core::to_fixed;
/// assert_eq!(to_fixed(0.865, 2), "0.86");
/// assert_eq!(to_fixed(0.125, 2), "0.13");
/// assert_eq!(to_fixed(-0.0, 2), "0.00");
/// ```
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 1e21 {
        // exponent is at least 21, so always positive
        return format!("{value:e}").replacen('e', "e+", 1);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{}", round_half_up(magnitude, digits))
}

// Every finite f64 has at most this many digits after the decimal point.
const MAX_FRACTION_DIGITS: usize = 1074;

/// Rounds a non-negative finite value to `digits` decimals using its exact
/// decimal expansion.
fn round_half_up(magnitude: f64, digits: usize) -> String {
    let exact = format!("{magnitude:.prec$}", prec = MAX_FRACTION_DIGITS);
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .collect();
    let round_up = frac_part.as_bytes().get(digits).is_some_and(|&d| d >= b'5');

    let mut int_len = int_part.len();
    if round_up {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
            int_len += 1;
        }
    }

    let (int_digits, frac_digits) = kept.split_at(int_len);
    let mut out = String::from_utf8_lossy(int_digits).into_owned();
    if digits > 0 {
        out.push('.');
        out.push_str(&String::from_utf8_lossy(frac_digits));
    }
    out
}

// `0x`, `0o` and `0b` literals; unsigned only.
fn parse_radix(s: &str) -> Option<f64> {
    let (radix, digits) = match s.get(..2)? {
        "0x" | "0X" => (16, &s[2..]),
        "0o" | "0O" => (8, &s[2..]),
        "0b" | "0B" => (2, &s[2..]),
        _ => return None,
    };
    Some(u64::from_str_radix(digits, radix).map_or(f64::NAN, |v| v as f64))
}

/// Returns the byte length and value of the longest decimal literal at the
/// start of `s`, or `None` when `s` does not start with one.
fn decimal_prefix(s: &str) -> Option<(usize, f64)> {
    let bytes = s.as_bytes();
    let mut i = 0;
    let negative = bytes.first() == Some(&b'-');
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i = 1;
    }

    if s[i..].starts_with("Infinity") {
        let value = if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return Some((i + "Infinity".len(), value));
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        if digits > 0 {
            i = j;
        }
    }
    if digits == 0 {
        return None;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    s[..i].parse::<f64>().ok().map(|value| (i, value))
}
