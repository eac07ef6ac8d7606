use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A pending transaction observed by the caller (e.g. a mempool watcher).
///
/// Only `to` and `value` are interpreted here; every other field is carried
/// through untouched so the validator and executor see the original payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetTransaction {
    pub to: String,
    #[serde(deserialize_with = "deserialize_native_value")]
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TargetTransaction {
    pub fn new(to: impl Into<String>, value: f64) -> Self {
        Self {
            to: to.into(),
            value,
            data: None,
            extra: Map::new(),
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}

// Wallet-style payloads often carry the amount as a decimal string ("0.01").
fn deserialize_native_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NativeValue {
        Number(f64),
        Text(String),
    }

    match NativeValue::deserialize(deserializer)? {
        NativeValue::Number(n) => Ok(n),
        NativeValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid value {:?}: {}", s, e))),
    }
}

/// Parsed form of a target transaction, produced by the validator.
/// Opaque to the evaluator beyond being logged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedTransaction(pub Value);

/// What the validator says about a target transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub decoded: DecodedTransaction,
    pub token_symbol: String,
}

impl ValidationVerdict {
    pub fn valid(decoded: DecodedTransaction, token_symbol: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            decoded,
            token_symbol: token_symbol.into(),
        }
    }

    pub fn rejected() -> Self {
        Self {
            is_valid: false,
            decoded: DecodedTransaction::default(),
            token_symbol: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_value_and_keeps_extra_fields() {
        let tx: TargetTransaction = serde_json::from_str(
            r#"{"to": "0xabc", "value": "0.01", "data": "0x", "gas": 21000}"#,
        )
        .unwrap();

        assert_eq!(tx.to, "0xabc");
        assert!((tx.value - 0.01).abs() < f64::EPSILON);
        assert_eq!(tx.data.as_deref(), Some("0x"));
        assert_eq!(tx.extra.get("gas"), Some(&Value::from(21000)));
    }

    #[test]
    fn parses_numeric_value() {
        let tx: TargetTransaction =
            serde_json::from_str(r#"{"to": "0xabc", "value": 1.5}"#).unwrap();
        assert_eq!(tx.value, 1.5);
        assert!(tx.data.is_none());
    }

    #[test]
    fn rejects_garbage_value() {
        let parsed =
            serde_json::from_str::<TargetTransaction>(r#"{"to": "0xabc", "value": "lots"}"#);
        assert!(parsed.is_err());
    }
}
