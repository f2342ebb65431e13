//! Normalisation of the loosely formatted size and fee columns.
//!
//! The reference table mixes `"1.5M"`, `"2 B"`, `"750k"`, plain numbers and
//! `"N/A"` in the same column. Nothing here fails: a value that cannot be
//! read is `None`.

/// A raw cell value as handed over by the loader or a caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

impl<'a> From<&'a str> for RawValue<'a> {
    fn from(value: &'a str) -> Self {
        RawValue::Text(value)
    }
}

impl<'a> From<&'a String> for RawValue<'a> {
    fn from(value: &'a String) -> Self {
        RawValue::Text(value.as_str())
    }
}

impl<'a> From<Option<&'a str>> for RawValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(RawValue::Missing, RawValue::Text)
    }
}

impl<'a> From<Option<&'a String>> for RawValue<'a> {
    fn from(value: Option<&'a String>) -> Self {
        value.map_or(RawValue::Missing, |s| RawValue::Text(s.as_str()))
    }
}

impl From<f64> for RawValue<'_> {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<i32> for RawValue<'_> {
    fn from(value: i32) -> Self {
        RawValue::Number(f64::from(value))
    }
}

impl From<i64> for RawValue<'_> {
    fn from(value: i64) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<u64> for RawValue<'_> {
    fn from(value: u64) -> Self {
        RawValue::Number(value as f64)
    }
}

/// True for the cells the source table uses to mean "no value".
pub fn is_missing(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("N/A")
}

/// Parses a monetary size such as an AUM into base currency units.
///
/// Suffixes are checked in the order `B`, `M`, `K` anywhere in the
/// upper-cased text; with a suffix only digits and dots are kept before
/// scaling. Without one the trimmed text must be a plain decimal.
pub fn parse_size<'a>(raw: impl Into<RawValue<'a>>) -> Option<f64> {
    let text = match raw.into() {
        RawValue::Missing => return None,
        RawValue::Number(value) => return value.is_finite().then_some(value),
        RawValue::Text(text) => text,
    };
    if is_missing(text) {
        return None;
    }

    let normalized = text.trim().to_uppercase();
    let multiplier = if normalized.contains('B') {
        Some(1e9)
    } else if normalized.contains('M') {
        Some(1e6)
    } else if normalized.contains('K') {
        Some(1e3)
    } else {
        None
    };

    let value = match multiplier {
        Some(multiplier) => extract_number(&normalized)? * multiplier,
        None => text.trim().parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Parses a percentage fee such as `"1,5%"` into a fraction (`0.015`).
pub fn parse_fee<'a>(raw: impl Into<RawValue<'a>>) -> Option<f64> {
    let percent = match raw.into() {
        RawValue::Missing => return None,
        RawValue::Number(value) => value,
        RawValue::Text(text) => {
            if is_missing(text) {
                return None;
            }
            text.trim()
                .replace('%', "")
                .replace(',', ".")
                .trim()
                .parse::<f64>()
                .ok()?
        }
    };
    let fraction = percent / 100.0;
    fraction.is_finite().then_some(fraction)
}

/// Keeps only digits and dots, then parses what is left.
fn extract_number(text: &str) -> Option<f64> {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok()
}
