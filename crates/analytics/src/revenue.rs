use crate::parsers::{parse_fee, parse_size, RawValue};

/// Implied yearly fee revenue of a fund: AUM times the fee rate.
///
/// `None` unless both inputs parse.
pub fn revenue<'a, 'b>(
    aum: impl Into<RawValue<'a>>,
    fee: impl Into<RawValue<'b>>,
) -> Option<f64> {
    let aum = parse_size(aum)?;
    let fee = parse_fee(fee)?;
    Some(aum * fee)
}
