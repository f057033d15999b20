//! Cache Value Module
//!
//! Storable values, generated keys, and the decoders used when reading back.

use std::fmt;

use uuid::Uuid;

use crate::error::{CacheError, Result};

// == Value ==
/// A value the cache can store.
///
/// Every variant has exactly one byte encoding, see [`Value::encode`].
#[derive(Clone, PartialEq)]
pub enum Value {
    /// UTF-8 text
    Text(String),
    /// Raw bytes, stored unchanged
    Bytes(Vec<u8>),
    /// 64-bit signed integer, stored as decimal text
    Int(i64),
    /// 64-bit float, stored as decimal text
    Float(f64),
}

impl Value {
    // == Encode ==
    /// Serializes the value into the bytes written to the store.
    ///
    /// Floats always keep a fractional part or exponent (`1.0`, `1e100`) so
    /// they never read back as integers.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Value::Text(text) => text.as_bytes().to_vec(),
            Value::Bytes(bytes) => bytes.clone(),
            Value::Int(n) => n.to_string().into_bytes(),
            Value::Float(x) => format!("{:?}", x).into_bytes(),
        }
    }

    // == Parse Literal ==
    /// Reads a command-line style literal: an integer if it parses as one,
    /// then a finite float, otherwise text.
    pub fn parse_literal(literal: &str) -> Self {
        if let Ok(n) = literal.parse::<i64>() {
            return Value::Int(n);
        }
        match literal.parse::<f64>() {
            Ok(x) if x.is_finite() => Value::Float(x),
            _ => Value::Text(literal.to_string()),
        }
    }
}

/// Renders the value the way it appears in recorded argument tuples:
/// `"foo"`, `b"\x00ab"`, `42`, `2.75`.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{:?}", text),
            Value::Bytes(bytes) => write!(f, "b\"{}\"", bytes.escape_ascii()),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

/// Converts dynamically typed input. Only strings and numbers that fit an
/// `i64` or `f64` are storable.
impl TryFrom<&serde_json::Value> for Value {
    type Error = CacheError;

    fn try_from(json: &serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::String(text) => Ok(Value::Text(text.clone())),
            serde_json::Value::Number(number) => {
                if let Some(n) = number.as_i64() {
                    Ok(Value::Int(n))
                } else if number.is_f64() {
                    number.as_f64().map(Value::Float).ok_or_else(|| {
                        CacheError::UnsupportedValue(format!("number {}", number))
                    })
                } else {
                    Err(CacheError::UnsupportedValue(format!(
                        "integer {} out of range",
                        number
                    )))
                }
            }
            serde_json::Value::Bool(flag) => {
                Err(CacheError::UnsupportedValue(format!("boolean {}", flag)))
            }
            serde_json::Value::Null => Err(CacheError::UnsupportedValue("null".to_string())),
            serde_json::Value::Array(_) => {
                Err(CacheError::UnsupportedValue("array".to_string()))
            }
            serde_json::Value::Object(_) => {
                Err(CacheError::UnsupportedValue("object".to_string()))
            }
        }
    }
}

// == Key ==
/// Opaque handle to a stored record.
///
/// Minted fresh from a random UUID on every store; never derived from content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key(String);

impl Key {
    // == Generate ==
    /// Mints a new random key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the key as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// == Decoders ==
/// Decodes stored bytes as UTF-8 text.
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| CacheError::Decode(e.to_string()))
}

/// Decodes stored bytes as a canonical decimal integer.
pub fn decode_int(bytes: &[u8]) -> Result<i64> {
    let text = std::str::from_utf8(bytes).map_err(|e| CacheError::Decode(e.to_string()))?;
    text.parse::<i64>()
        .map_err(|e| CacheError::Decode(format!("{:?} is not an integer: {}", text, e)))
}

/// Decodes stored bytes as a decimal float.
pub fn decode_float(bytes: &[u8]) -> Result<f64> {
    let text = std::str::from_utf8(bytes).map_err(|e| CacheError::Decode(e.to_string()))?;
    text.parse::<f64>()
        .map_err(|e| CacheError::Decode(format!("{:?} is not a float: {}", text, e)))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_each_shape() {
        assert_eq!(Value::from("foo").encode(), b"foo".to_vec());
        assert_eq!(Value::from(vec![0u8, 255]).encode(), vec![0u8, 255]);
        assert_eq!(Value::from(42).encode(), b"42".to_vec());
        assert_eq!(Value::from(-7i64).encode(), b"-7".to_vec());
        assert_eq!(Value::from(2.75).encode(), b"2.75".to_vec());
        assert_eq!(Value::from(1.0).encode(), b"1.0".to_vec());
    }

    #[test]
    fn test_debug_rendering() {
        assert_eq!(format!("{:?}", Value::from("foo")), "\"foo\"");
        assert_eq!(format!("{:?}", Value::from("say \"hi\"")), "\"say \\\"hi\\\"\"");
        assert_eq!(format!("{:?}", Value::from(&b"\x00ab"[..])), "b\"\\x00ab\"");
        assert_eq!(format!("{:?}", Value::from(42)), "42");
        assert_eq!(format!("{:?}", Value::from(2.5)), "2.5");
    }

    #[test]
    fn test_tuple_rendering() {
        assert_eq!(format!("{:?}", (Value::from("foo"),)), "(\"foo\",)");
        assert_eq!(format!("{:?}", (Value::from(42),)), "(42,)");
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(Value::parse_literal("42"), Value::Int(42));
        assert_eq!(Value::parse_literal("-3"), Value::Int(-3));
        assert_eq!(Value::parse_literal("2.5"), Value::Float(2.5));
        assert_eq!(Value::parse_literal("foo"), Value::from("foo"));
        assert_eq!(Value::parse_literal("inf"), Value::from("inf"));
        assert_eq!(Value::parse_literal("NaN"), Value::from("NaN"));
    }

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Value::try_from(&json!("foo")).unwrap(), Value::from("foo"));
        assert_eq!(Value::try_from(&json!(42)).unwrap(), Value::Int(42));
        assert_eq!(Value::try_from(&json!(2.5)).unwrap(), Value::Float(2.5));
    }

    #[test]
    fn test_from_json_unsupported_shapes() {
        for json in [json!(true), json!(null), json!([1, 2]), json!({"a": 1}), json!(u64::MAX)] {
            let result = Value::try_from(&json);
            assert!(
                matches!(result, Err(CacheError::UnsupportedValue(_))),
                "{} should be rejected",
                json
            );
        }
    }

    #[test]
    fn test_keys_are_unique_uuids() {
        let a = Key::generate();
        let b = Key::generate();

        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
        assert_eq!(a.to_string(), a.as_str());
    }

    #[test]
    fn test_decode_text() {
        assert_eq!(decode_text(b"foo").unwrap(), "foo");
        assert!(matches!(decode_text(&[0xff, 0xfe]), Err(CacheError::Decode(_))));
    }

    #[test]
    fn test_decode_int() {
        assert_eq!(decode_int(b"42").unwrap(), 42);
        assert_eq!(decode_int(b"-9223372036854775808").unwrap(), i64::MIN);
        assert!(matches!(decode_int(b"4.2"), Err(CacheError::Decode(_))));
        assert!(matches!(decode_int(b"foo"), Err(CacheError::Decode(_))));
    }

    #[test]
    fn test_decode_float() {
        assert_eq!(decode_float(b"2.75").unwrap(), 2.75);
        assert_eq!(decode_float(b"1e100").unwrap(), 1e100);
        assert!(matches!(decode_float(b"pi"), Err(CacheError::Decode(_))));
    }
}
