// In: src/kernels/text.rs

//! Generic text conversion, used for labels and dictionary keys that are not
//! temporal. Output follows the conventions of the dynamic runtimes tables
//! usually come from: `True`/`False`, `None`, `1.0`, `1e+20`, `nan`.

use crate::kernels::temporal::{duration_text, duration_to_ns, NAT};
use crate::types::Value;

/// Shortest round-trip text for a double, exponent form outside `[1e-4, 1e16)`.
pub fn float_text(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        // Rust writes `1e20` / `1.5e-7`; pad to a signed two-digit exponent.
        let text = format!("{:e}", value);
        if let Some((mantissa, exponent)) = text.split_once('e') {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            return format!("{}e{}{:0>2}", mantissa, sign, digits);
        }
        return text;
    }
    format!("{:?}", value)
}

/// The text a label or key takes when it has no dedicated encoding.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        other => repr_text(other, false),
    }
}

fn repr_text(value: &Value, nested: bool) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),
        Value::BigInt(i) => i.to_string(),
        Value::Float(f) => float_text(*f),
        Value::Decimal(d) => d.to_string(),
        Value::Str(s) if nested => quote(s),
        Value::Str(s) => s.clone(),
        Value::Bytes(b) => format!("b{}", quote(&String::from_utf8_lossy(b))),
        Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
        Value::ZonedDateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S%.f%:z").to_string(),
        Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        Value::Time(t) => t.format("%H:%M:%S%.f").to_string(),
        Value::Timedelta(d) => match duration_to_ns(d) {
            Ok(ns) => duration_text(ns),
            Err(_) => d.to_string(),
        },
        Value::NaT => "NaT".to_string(),
        Value::Datetime64(NAT) | Value::Timedelta64(NAT) => "NaT".to_string(),
        Value::Datetime64(ns) => chrono::DateTime::from_timestamp_nanos(*ns)
            .naive_utc()
            .format("%Y-%m-%d %H:%M:%S%.f")
            .to_string(),
        Value::Timedelta64(ns) => duration_text(*ns),
        Value::List(items) => format!("[{}]", join(items)),
        Value::Tuple(items) if items.len() == 1 => format!("({},)", join(items)),
        Value::Tuple(items) => format!("({})", join(items)),
        Value::Set(items) if items.is_empty() => "set()".to_string(),
        Value::Set(items) => format!("{{{}}}", join(items)),
        Value::Dict(entries) => {
            let parts: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}: {}", repr_text(k, true), repr_text(v, true)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        other => format!("<{} object>", other.type_name()),
    }
}

fn join(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| repr_text(item, true))
        .collect::<Vec<_>>()
        .join(", ")
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}
