use crate::error::CoreError;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Largest accepted distance of the decimal point from the digits, either way.
/// `1e30` and `0.000…1` with a few thousand places are fine; `1e999999999` is not,
/// since summing it with `0.1` would materialise a billion-digit integer.
pub const MAX_DECIMAL_EXPONENT: i64 = 4_096;

/// A single timestamped measurement pushed into the rolling window.
///
/// Field order matters: the derived ordering compares `timestamp` first, which is
/// the key the aggregator evicts by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Event {
    /// Epoch milliseconds.
    pub timestamp: i64,
    /// The exact-decimal quantity. Arbitrary precision, never rounded.
    pub x: BigDecimal,
    /// The integer quantity.
    pub y: i64,
}

impl Event {
    pub fn new(timestamp: i64, x: BigDecimal, y: i64) -> Self {
        Self { timestamp, x, y }
    }
}

/// Parses one `timestamp,x,y` line.
impl FromStr for Event {
    type Err = CoreError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidEvent(line.to_string());

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [timestamp, x, y] = fields.as_slice() else {
            return Err(invalid());
        };

        let timestamp = timestamp.parse::<i64>().map_err(|_| invalid())?;
        let x = parse_decimal(x).ok_or_else(invalid)?;
        let y = y.parse::<i64>().map_err(|_| invalid())?;

        Ok(Self { timestamp, x, y })
    }
}

/// Accepts plain (`0.25`) and scientific (`2.5e-1`) notation, exactly.
fn parse_decimal(text: &str) -> Option<BigDecimal> {
    let value = BigDecimal::from_str(text).ok()?;
    let (_, scale) = value.as_bigint_and_exponent();
    (scale.abs() <= MAX_DECIMAL_EXPONENT).then_some(value)
}

/// Splits a plain-text payload on newlines and parses every line.
///
/// One result per line, in input order. Blank lines are reported as failures so
/// callers can tell how many lines were dropped.
pub fn parse_events(text: &str) -> Vec<Result<Event, CoreError>> {
    text.split('\n').map(Event::from_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> BigDecimal {
        text.parse().unwrap()
    }

    #[test]
    fn parses_a_well_formed_line() {
        let event: Event = "1607341341814,0.0442672968,1282509067".parse().unwrap();

        assert_eq!(event.timestamp, 1607341341814);
        assert_eq!(event.x, dec("0.0442672968"));
        assert_eq!(event.y, 1282509067);
    }

    #[test]
    fn tolerates_surrounding_whitespace_and_carriage_returns() {
        let event: Event = " 10 , 1.5 , -2\r".parse().unwrap();

        assert_eq!(event, Event::new(10, dec("1.5"), -2));
    }

    #[test]
    fn accepts_scientific_notation_for_the_decimal_quantity() {
        let event: Event = "10,2.5e-1,1".parse().unwrap();
        assert_eq!(event.x, dec("0.25"));

        let large: Event = "10,1e30,1".parse().unwrap();
        assert_eq!(large.x, dec("1000000000000000000000000000000"));
    }

    #[test]
    fn keeps_every_digit_of_long_inputs() {
        let digits = "0.12345678901234567890123456789012345678901234567890";
        let event: Event = format!("10,{digits},1").parse().unwrap();

        assert_eq!(event.x.to_plain_string(), digits);
    }

    #[test]
    fn rejects_malformed_lines() {
        let malformed = [
            "",
            "1,1",
            "1,1,1,1",
            "1,1a,1",
            "a,1,1",
            "1,1,1.5",
            "1,,1",
            "1,1e5000,1",
        ];

        for line in malformed {
            assert_eq!(
                line.parse::<Event>(),
                Err(CoreError::InvalidEvent(line.to_string())),
                "line {line:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_events_reports_one_result_per_line() {
        let results = parse_events("1,1.0,1\n1,1a,1\n2,0.5,2");

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(results[2], Ok(Event::new(2, dec("0.5"), 2)));
    }

    #[test]
    fn ordering_is_by_timestamp_first() {
        let older = Event::new(1, dec("100"), 100);
        let newer = Event::new(2, dec("0"), 0);

        assert!(older < newer);
    }

    #[test]
    fn equal_values_are_equal_events() {
        assert_eq!(Event::new(1, dec("1.0"), 1), Event::new(1, dec("1.00"), 1));
    }
}
