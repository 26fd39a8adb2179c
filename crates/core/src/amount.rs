// Embedded Bank - UART Console Banking Demo
// Copyright (C) 2026 LabWired Team
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

/// Parses an amount typed at the console.
///
/// Mirrors `atof`: leading whitespace is skipped, then the longest valid
/// prefix is converted and anything after it ignored. Accepted forms are
/// decimal (`12.5e1`), hexadecimal (`0x1.8p3`) and case-insensitive
/// `inf`, `infinity` and `nan`, each with an optional sign. Input without
/// a numeric prefix yields `0.0`.
pub fn parse_amount(buf: &[u8]) -> f64 {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    let text = &buf[..end];
    let start = text
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(text.len());
    let text = &text[start..];

    let (negative, body) = match text.first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let magnitude = parse_special(body)
        .or_else(|| parse_hex(body))
        .unwrap_or_else(|| parse_decimal(body));
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

fn starts_with_ignore_case(s: &[u8], prefix: &[u8]) -> bool {
    s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn parse_special(s: &[u8]) -> Option<f64> {
    if starts_with_ignore_case(s, b"inf") {
        Some(f64::INFINITY)
    } else if starts_with_ignore_case(s, b"nan") {
        Some(f64::NAN)
    } else {
        None
    }
}

/// `0x` mantissa with optional fraction and binary `p` exponent.
/// Returns `None` when no hex digit follows the prefix, leaving the
/// leading `0` to the decimal path.
fn parse_hex(s: &[u8]) -> Option<f64> {
    if !starts_with_ignore_case(s, b"0x") {
        return None;
    }
    let mut i = 2;
    let mut value = 0.0f64;
    let mut digits = 0;

    while let Some(d) = s.get(i).and_then(|b| (*b as char).to_digit(16)) {
        value = value * 16.0 + d as f64;
        digits += 1;
        i += 1;
    }
    if s.get(i) == Some(&b'.') {
        let mut j = i + 1;
        let mut scale = 1.0 / 16.0;
        let mut frac_digits = 0;
        while let Some(d) = s.get(j).and_then(|b| (*b as char).to_digit(16)) {
            value += d as f64 * scale;
            scale /= 16.0;
            frac_digits += 1;
            j += 1;
        }
        if digits > 0 || frac_digits > 0 {
            digits += frac_digits;
            i = j;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(s.get(i), Some(b'p') | Some(b'P')) {
        let mut j = i + 1;
        let exp_negative = match s.get(j) {
            Some(b'-') => {
                j += 1;
                true
            }
            Some(b'+') => {
                j += 1;
                false
            }
            _ => false,
        };
        let exp_digits = count_digits(&s[j.min(s.len())..]);
        if exp_digits > 0 {
            let exp: i32 = std::str::from_utf8(&s[j..j + exp_digits])
                .ok()
                .and_then(|e| e.parse().ok())
                .unwrap_or(i32::MAX);
            value *= 2f64.powi(if exp_negative { -exp } else { exp });
        }
    }

    Some(value)
}

fn parse_decimal(s: &[u8]) -> f64 {
    let len = decimal_prefix_len(s);
    std::str::from_utf8(&s[..len])
        .ok()
        .and_then(|t| t.parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn decimal_prefix_len(s: &[u8]) -> usize {
    let int_digits = count_digits(s);
    let mut i = int_digits;

    let mut frac_digits = 0;
    if s.get(i) == Some(&b'.') {
        frac_digits = count_digits(&s[i + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    // Exponent only counts if at least one digit follows it.
    if matches!(s.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        if matches!(s.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_digits = count_digits(&s[j.min(s.len())..]);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }

    i
}

fn count_digits(s: &[u8]) -> usize {
    s.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_amount(b"100"), 100.0);
        assert_eq!(parse_amount(b"40.5"), 40.5);
        assert_eq!(parse_amount(b".5"), 0.5);
        assert_eq!(parse_amount(b"7."), 7.0);
        assert_eq!(parse_amount(b"-3"), -3.0);
        assert_eq!(parse_amount(b"+3"), 3.0);
        assert_eq!(parse_amount(b"1e3"), 1000.0);
    }

    #[test]
    fn test_zero_padded_buffer() {
        let mut buf = [0u8; crate::AMOUNT_SIZE];
        buf[..4].copy_from_slice(b"12.5");
        assert_eq!(parse_amount(&buf), 12.5);
    }

    #[test]
    fn test_prefix_and_garbage() {
        assert_eq!(parse_amount(b"  25abc"), 25.0);
        assert_eq!(parse_amount(b"3e"), 3.0);
        assert_eq!(parse_amount(b"3e+"), 3.0);
        assert_eq!(parse_amount(b"abc"), 0.0);
        assert_eq!(parse_amount(b"."), 0.0);
        assert_eq!(parse_amount(b"-"), 0.0);
        assert_eq!(parse_amount(b""), 0.0);
    }

    #[test]
    fn test_hex_amounts() {
        assert_eq!(parse_amount(b"0x10"), 16.0);
        assert_eq!(parse_amount(b"0XfF"), 255.0);
        assert_eq!(parse_amount(b"-0x10"), -16.0);
        assert_eq!(parse_amount(b"0x1.8"), 1.5);
        assert_eq!(parse_amount(b"0x.8"), 0.5);
        assert_eq!(parse_amount(b"0x1p4"), 16.0);
        assert_eq!(parse_amount(b"0x1.8p-1"), 0.75);
        assert_eq!(parse_amount(b"0x1p"), 1.0);
        assert_eq!(parse_amount(b"0x10zz"), 16.0);
        // No hex digit after the prefix: only the leading zero parses.
        assert_eq!(parse_amount(b"0x"), 0.0);
        assert_eq!(parse_amount(b"0xg"), 0.0);
    }

    #[test]
    fn test_infinity_and_nan() {
        assert_eq!(parse_amount(b"inf"), f64::INFINITY);
        assert_eq!(parse_amount(b"INFINITY"), f64::INFINITY);
        assert_eq!(parse_amount(b"-Inf"), f64::NEG_INFINITY);
        assert_eq!(parse_amount(b"  infinite"), f64::INFINITY);
        assert!(parse_amount(b"nan").is_nan());
        assert!(parse_amount(b"NaN(123)").is_nan());
        assert_eq!(parse_amount(b"in"), 0.0);
        assert_eq!(parse_amount(b"na"), 0.0);
    }
}
