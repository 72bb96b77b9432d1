use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Accepts either a JSON number or a numeric string.
///
/// Decimal columns come back from the API as strings (`"1200.00"`).
pub fn deserialize_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("invalid amount '{}'", s))),
    }
}

/// Formats an amount without a trailing `.0` for whole values.
pub fn format_amount(amount: f64) -> String {
    if amount.is_finite() && amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{:.0}", amount)
    } else {
        amount.to_string()
    }
}
