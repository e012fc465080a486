//! Coercions between model values and control state.
//!
//! Controls hold text and a checked flag; models hold JSON. These helpers
//! define how one becomes the other.

use serde_json::Value;

/// The text a control displays for a model value.
///
/// Strings are used as-is, `null` becomes empty, booleans use their literal
/// form, arrays join their elements with `,` and objects collapse to
/// `[object Object]`. Numbers follow JavaScript's `Number.prototype.toString`
/// (see [`number_text`]), except that integers outside the `f64` exact range
/// keep every digit.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                number_text(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Shortest round-trip text for a float, laid out the way JavaScript prints
/// numbers.
///
/// Positional notation is used for decimal exponents from -7 to 20 and
/// exponent notation (`1e+21`, `1.5e-7`) outside that range. Negative zero
/// prints as `0`.
pub fn number_text(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if f < 0.0 {
        return format!("-{}", number_text(-f));
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e3"
    let scientific = format!("{f:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = digits.len() as i32;
    let n = exponent + 1;

    if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{lead}e{sign}{}", (n - 1).abs())
        } else {
            format!("{lead}.{rest}e{sign}{}", (n - 1).abs())
        }
    }
}

/// Whether a model value checks a checkbox.
///
/// `false`, `null`, zero and the empty string are falsy. Everything else,
/// including empty arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The set of control values a group write accepts.
///
/// Arrays contribute each element; any other value is a one-element set.
/// Membership is strict: only string elements can equal a control's value,
/// so numbers, booleans, `null` and nested arrays or objects accept nothing.
pub fn accepted_values(value: &Value) -> Vec<&str> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        other => std::slice::from_ref(other),
    };
    items.iter().filter_map(Value::as_str).collect()
}
