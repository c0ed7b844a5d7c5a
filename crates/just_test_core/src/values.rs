//! Assertion value semantics: rendering for diagnostics, strict identity, and coercive equality.
//!
//! Assertions accept dynamic values (anything `Into<serde_json::Value>`), so `equals(1, "1")` can be written
//! and compared the way test authors expect.
//!
//! ## Notes
//! - **Identity** (`ok`/`notOk`) is structural equality with no coercion: `1` is not `true`, `1` is not `1.0`.
//! - **Coercive equality** (`equals`/`notEquals`):
//!   - a boolean on either side compares against the truthiness of the other side;
//!   - `null` equals `""`, and otherwise equals any falsy value;
//!   - numbers compare numerically, and a numeric string compares as the number it spells (integer spellings as
//!     integers, so values beyond `f64` precision stay exact);
//!   - two numeric strings compare numerically (`"1e1"` equals `"10"`);
//!   - arrays and objects compare element-wise with the same rules.
//! - A non-numeric string never equals a number unless it is the number's exact textual form.

use serde_json::Number;

pub use serde_json::Value;

/// Render a value the way a diagnostic block shows it.
///
/// ## Examples
/// ```rust
/// use just_test_core::values::{format_value, Value};
/// use serde_json::json;
///
/// assert_eq!(format_value(&Value::Bool(false)), "false");
/// assert_eq!(format_value(&Value::Null), "null");
/// assert_eq!(format_value(&json!("raw text")), "raw text");
/// assert_eq!(format_value(&json!([1, {"a": true}])), r#"[1,{"a":true}]"#);
/// ```
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        // serde_json's Display is the compact serialized form.
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Render an optional value; absence renders as `null`.
pub fn format_optional(value: Option<&Value>) -> String {
    value.map_or_else(|| "null".to_string(), format_value)
}

/// Strict identity: same type, same value.
pub fn is_identical(actual: &Value, expected: &Value) -> bool {
    actual == expected
}

/// Truthiness used by coercive comparisons.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Coercive equality.
///
/// ## Examples
/// ```rust
/// use just_test_core::values::loosely_equal;
/// use serde_json::json;
///
/// assert!(loosely_equal(&json!(1), &json!("1")));
/// assert!(loosely_equal(&json!(null), &json!(false)));
/// assert!(!loosely_equal(&json!(1), &json!(2)));
/// ```
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), other) | (other, Value::Bool(x)) => *x == is_truthy(other),
        (Value::Null, Value::String(s)) | (Value::String(s), Value::Null) => s.is_empty(),
        (Value::Null, other) | (other, Value::Null) => !is_truthy(other),
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => match parse_numeric(s) {
            Some(parsed) => numbers_equal(n, &parsed),
            None => n.to_string() == *s,
        },
        (Value::String(x), Value::String(y)) => match (parse_numeric(x), parse_numeric(y)) {
            (Some(nx), Some(ny)) => numbers_equal(&nx, &ny),
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| loosely_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len() && xs.iter().all(|(key, x)| ys.get(key).is_some_and(|y| loosely_equal(x, y)))
        }
        _ => false,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Parse a string that spells a finite decimal number (surrounding whitespace allowed).
///
/// Integer spellings stay integers so that large values compare exactly.
fn parse_numeric(s: &str) -> Option<Number> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')) {
        return None;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Number::from(int));
    }
    if let Ok(int) = trimmed.parse::<u64>() {
        return Some(Number::from(int));
    }
    trimmed.parse::<f64>().ok().and_then(Number::from_f64)
}
