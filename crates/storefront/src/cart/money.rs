//! Decimal amounts as plain JSON numbers, written and read digit for digit.
//!
//! `rust_decimal::serde::float` goes through `f64` and loses anything past
//! about 15 significant digits. These helpers hand the decimal's own text to
//! `serde_json` as a raw number instead.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    RawValue::from_string(value.normalize().to_string())
        .map_err(S::Error::custom)?
        .serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    parse(raw.get()).map_err(D::Error::custom)
}

fn parse(text: &str) -> Result<Decimal, String> {
    let parsed = if text.contains(['e', 'E']) {
        Decimal::from_scientific(text)
    } else {
        Decimal::from_str(text)
    };
    parsed.map_err(|e| format!("invalid amount {text}: {e}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_scientific() {
        assert_eq!(parse("20").unwrap(), Decimal::from(20));
        assert_eq!(parse("19.99").unwrap(), Decimal::new(1999, 2));
        assert_eq!(parse("1.5E2").unwrap(), Decimal::from(150));
    }

    #[test]
    fn test_parse_rejects_non_numbers() {
        assert!(parse("\"20\"").is_err());
        assert!(parse("null").is_err());
    }
}
