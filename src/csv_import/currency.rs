//! Conversion between decimal amounts and miliunits.
//!
//! Amounts are stored as integers scaled by 1000 ("miliunits") so that sums
//! and comparisons are exact, e.g. `-42.50` is stored as `-42500`.

use crate::Error;

/// The number of miliunits in one unit of currency.
pub const MILIUNITS_PER_UNIT: i64 = 1000;

/// Convert a decimal `amount` to miliunits, rounding half away from zero.
///
/// # Errors
/// Returns [Error::InvalidAmount] if `amount` is not finite or is too large to
/// be represented as an `i64` number of miliunits.
pub fn to_miliunits(amount: f64) -> Result<i64, Error> {
    if !amount.is_finite() {
        return Err(Error::InvalidAmount(amount.to_string()));
    }

    let scaled = (amount * MILIUNITS_PER_UNIT as f64).round();

    // i64::MAX as f64 rounds up to 2^63, so the upper bound must be exclusive.
    if scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
        return Err(Error::InvalidAmount(amount.to_string()));
    }

    Ok(scaled as i64)
}

/// Convert miliunits back to a decimal amount for display.
pub fn from_miliunits(miliunits: i64) -> f64 {
    miliunits as f64 / MILIUNITS_PER_UNIT as f64
}

/// Parse the text of a CSV cell as a decimal amount and convert it to miliunits.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
/// Returns [Error::InvalidAmount] with the original cell text if the text is
/// not a finite decimal number.
pub fn parse_miliunits(text: &str) -> Result<i64, Error> {
    let amount: f64 = text
        .trim()
        .parse()
        .map_err(|_| Error::InvalidAmount(text.to_owned()))?;

    to_miliunits(amount).map_err(|_| Error::InvalidAmount(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{from_miliunits, parse_miliunits, to_miliunits};

    #[test]
    fn converts_whole_and_fractional_amounts() {
        assert_eq!(to_miliunits(0.0), Ok(0));
        assert_eq!(to_miliunits(1.0), Ok(1000));
        assert_eq!(to_miliunits(-42.5), Ok(-42500));
        assert_eq!(to_miliunits(12.345), Ok(12345));
        assert_eq!(to_miliunits(0.1 + 0.2), Ok(300));
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(to_miliunits(0.0005), Ok(1));
        assert_eq!(to_miliunits(-0.0005), Ok(-1));
        assert_eq!(to_miliunits(1.0004), Ok(1000));
        assert_eq!(to_miliunits(-1.0004), Ok(-1000));
    }

    #[test]
    fn round_trip_is_within_half_a_miliunit() {
        for amount in [-1234.5678, -0.001, 0.0, 0.4999, 3.14159, 99999.9999, 1e9 + 0.25] {
            let miliunits = to_miliunits(amount).unwrap();

            assert!(
                (from_miliunits(miliunits) - amount).abs() <= 0.0005 + f64::EPSILON * amount.abs(),
                "{amount} -> {miliunits} is not within half a miliunit"
            );
        }
    }

    #[test]
    fn rejects_non_finite_amounts() {
        assert!(matches!(to_miliunits(f64::NAN), Err(Error::InvalidAmount(_))));
        assert!(matches!(
            to_miliunits(f64::INFINITY),
            Err(Error::InvalidAmount(_))
        ));
        assert!(matches!(
            to_miliunits(f64::NEG_INFINITY),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn rejects_amounts_that_overflow() {
        assert!(matches!(to_miliunits(1e17), Err(Error::InvalidAmount(_))));
        assert!(matches!(to_miliunits(-1e17), Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn parses_cell_text() {
        assert_eq!(parse_miliunits("-42.50"), Ok(-42500));
        assert_eq!(parse_miliunits(" 7 "), Ok(7000));
        assert_eq!(parse_miliunits("+0.25"), Ok(250));
    }

    #[test]
    fn non_numeric_cell_is_invalid_amount() {
        assert_eq!(
            parse_miliunits("abc"),
            Err(Error::InvalidAmount("abc".to_owned()))
        );
        assert_eq!(parse_miliunits(""), Err(Error::InvalidAmount("".to_owned())));
        assert_eq!(
            parse_miliunits("NaN"),
            Err(Error::InvalidAmount("NaN".to_owned()))
        );
    }
}
