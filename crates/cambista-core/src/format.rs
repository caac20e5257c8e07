//! # Number Formatting
//!
//! Every number Cambista emits goes through one of two representations.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Two Representations                                 │
//! │                                                                         │
//! │  raw f64 ──┬──► to_canonical / to_storage ──► Canonical                │
//! │            │      integral?  → Integer(9)     JSON: 9                   │
//! │            │      otherwise  → Decimal(9.57)  JSON: 9.57                │
//! │            │                                                            │
//! │            └──► to_display ─────────────────► String                   │
//! │                   integral?  → "1.234.567"                              │
//! │                   otherwise  → "1.234,50"   (always two decimals)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The display convention (`.` grouping, `,` decimals) is the fixed
//! [`ARGENTINE_LOCALE`]; it is never read from the process environment.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest magnitude at which every integer is exactly representable as f64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

// =============================================================================
// Display Locale
// =============================================================================

/// Separators used when rendering numbers for people.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayLocale {
    /// Thousands grouping separator.
    pub grouping: char,
    /// Separator between integer and fractional digits.
    pub decimal: char,
}

/// `1.234.567` / `1.234,50`
pub const ARGENTINE_LOCALE: DisplayLocale = DisplayLocale {
    grouping: '.',
    decimal: ',',
};

// =============================================================================
// Canonical Number
// =============================================================================

/// A number in its storage form.
///
/// Serializes as a bare JSON number: `Integer(9)` is written `9` (never
/// `9.0`), `Decimal(10.26)` is written `10.26`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Canonical {
    Integer(i64),
    Decimal(f64),
}

impl Canonical {
    /// Returns the value as a float.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Canonical::Integer(value) => value as f64,
            Canonical::Decimal(value) => value,
        }
    }

    /// Returns true for the integer form.
    pub fn is_integer(&self) -> bool {
        matches!(self, Canonical::Integer(_))
    }
}

impl fmt::Display for Canonical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Canonical::Integer(value) => write!(f, "{}", value),
            Canonical::Decimal(value) => write!(f, "{}", value),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// Converts a raw value to its canonical form.
///
/// ## Rules
/// - Integral values become [`Canonical::Integer`]
/// - Everything else is rounded to two fractional digits
/// - A value that rounds onto an integer (`9.999` → `10`) collapses to
///   the integer form, so storage never shows a trailing `.0`
///
/// ## Example
/// ```rust
/// use cambista_core::format::{to_canonical, Canonical};
///
/// assert_eq!(to_canonical(10.0), Canonical::Integer(10));
/// assert_eq!(to_canonical(10.256), Canonical::Decimal(10.26));
/// ```
pub fn to_canonical(value: f64) -> Canonical {
    if is_integral(value) {
        return Canonical::Integer(value as i64);
    }

    let rounded = round_to_cents(value);
    if is_integral(rounded) {
        Canonical::Integer(rounded as i64)
    } else {
        Canonical::Decimal(rounded)
    }
}

/// Storage form for values written into an operation record.
///
/// Same contract as [`to_canonical`]; kept separate because the call sites
/// (record emission vs. calculation internals) are different concerns.
#[inline]
pub fn to_storage(value: f64) -> Canonical {
    to_canonical(value)
}

/// Renders a value for the operator or client using [`ARGENTINE_LOCALE`].
///
/// ## Example
/// ```rust
/// use cambista_core::format::to_display;
///
/// assert_eq!(to_display(1234567.0), "1.234.567");
/// assert_eq!(to_display(1234.5), "1.234,50");
/// assert_eq!(to_display(0.0), "0");
/// ```
pub fn to_display(value: f64) -> String {
    to_display_with(value, &ARGENTINE_LOCALE)
}

/// Renders a value with explicit separators.
pub fn to_display_with(value: f64, locale: &DisplayLocale) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    if magnitude.fract() == 0.0 {
        let digits = format!("{:.0}", magnitude);
        return format!("{}{}", sign, group_digits(&digits, locale.grouping));
    }

    let fixed = format!("{:.2}", magnitude);
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!(
        "{}{}{}{}",
        sign,
        group_digits(whole, locale.grouping),
        locale.decimal,
        cents
    )
}

// =============================================================================
// Helpers
// =============================================================================

fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER
}

/// Rounds on the exact binary value, the same digits `{:.2}` would print.
fn round_to_cents(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Inserts `separator` every three digits counting from the right.
fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_integral() {
        assert_eq!(to_canonical(10.0), Canonical::Integer(10));
        assert_eq!(to_canonical(0.0), Canonical::Integer(0));
        assert_eq!(to_canonical(-3.0), Canonical::Integer(-3));
    }

    #[test]
    fn test_canonical_rounds_to_two_places() {
        assert_eq!(to_canonical(10.256), Canonical::Decimal(10.26));
        assert_eq!(to_canonical(0.5), Canonical::Decimal(0.5));
        assert_eq!(to_canonical(1234.5678), Canonical::Decimal(1234.57));
    }

    #[test]
    fn test_canonical_collapses_rounded_integers() {
        assert_eq!(to_canonical(9.999), Canonical::Integer(10));
        assert_eq!(to_canonical(199.9999999), Canonical::Integer(200));
    }

    #[test]
    fn test_storage_matches_canonical() {
        for value in [0.0, 1.0, 2.5, 10.256, 199.99999, 1e6 + 0.123] {
            assert_eq!(to_storage(value), to_canonical(value));
        }
    }

    #[test]
    fn test_canonical_json_shape() {
        let integer = serde_json::to_string(&to_canonical(9.0)).unwrap();
        assert_eq!(integer, "9");

        let decimal = serde_json::to_string(&to_canonical(9.5678)).unwrap();
        assert_eq!(decimal, "9.57");
    }

    #[test]
    fn test_display_integral() {
        assert_eq!(to_display(1234567.0), "1.234.567");
        assert_eq!(to_display(1000.0), "1.000");
        assert_eq!(to_display(999.0), "999");
        assert_eq!(to_display(0.0), "0");
    }

    #[test]
    fn test_display_fractional() {
        assert_eq!(to_display(1234.5), "1.234,50");
        assert_eq!(to_display(0.25), "0,25");
        assert_eq!(to_display(1234567.891), "1.234.567,89");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(to_display(-1234.5), "-1.234,50");
        assert_eq!(to_display(-1000.0), "-1.000");
    }

    #[test]
    fn test_display_with_other_locale() {
        let english = DisplayLocale {
            grouping: ',',
            decimal: '.',
        };
        assert_eq!(to_display_with(1234.5, &english), "1,234.50");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("1", '.'), "1");
        assert_eq!(group_digits("123", '.'), "123");
        assert_eq!(group_digits("1234", '.'), "1.234");
        assert_eq!(group_digits("123456", '.'), "123.456");
    }

    #[test]
    fn test_canonical_display() {
        assert_eq!(Canonical::Integer(200).to_string(), "200");
        assert_eq!(Canonical::Decimal(10.26).to_string(), "10.26");
        assert_eq!(Canonical::Decimal(10.26).as_f64(), 10.26);
    }
}
