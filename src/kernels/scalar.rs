// In: src/kernels/scalar.rs

//! The scalar classifier.
//!
//! Decides, for one value, whether it encodes as a JSON scalar (and with which
//! payload) or needs a composite traversal, a mapping produced by a conversion,
//! an attribute listing, or the caller's default handler.

use chrono::NaiveTime;
use num_traits::ToPrimitive;
use std::borrow::Cow;

use crate::config::TemporalConfig;
use crate::error::FrameJsonError;
use crate::kernels::temporal;
use crate::sink::JsonScalar;
use crate::types::{AttrValue, Item, Opaque, Value};

/// The outcome of classifying one value.
#[derive(Debug)]
pub enum Kind<'v> {
    Scalar(JsonScalar<'v>),
    /// A container the dispatcher walks (lists, dicts, arrays, labeled data).
    Composite,
    /// Entries produced by an object's mapping conversion.
    Mapping(Vec<(Value, Value)>),
    /// Public, readable, non-callable attributes of an object.
    Attributes(Vec<(String, Value)>),
    /// Hand the value to the caller's default handler.
    Delegate,
}

/// Classifies a value from the dynamic value tree.
pub fn classify<'v>(
    value: &'v Value,
    config: TemporalConfig,
    has_default_handler: bool,
) -> Result<Kind<'v>, FrameJsonError> {
    let scalar = match value {
        Value::Null | Value::NaT => JsonScalar::Null,
        Value::Bool(b) => JsonScalar::Bool(*b),
        Value::Int(i) => JsonScalar::Int(*i),
        Value::UInt(u) => JsonScalar::Int(checked_i64(*u)?),
        Value::BigInt(i) => JsonScalar::Int(checked_i64(*i)?),
        Value::Float(f) => float_scalar(*f),
        Value::Decimal(d) => float_scalar(d.to_f64()),
        Value::Str(s) => JsonScalar::Str(Cow::Borrowed(s.as_str())),
        Value::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => JsonScalar::Str(Cow::Borrowed(s)),
            Err(e) => {
                return Err(FrameJsonError::UnsupportedValue(format!(
                    "bytes value is not valid UTF-8: {}",
                    e
                )))
            }
        },
        Value::DateTime(dt) => temporal::encode_naive(dt, config)?,
        Value::ZonedDateTime(dt) => temporal::encode_naive(&dt.naive_utc(), config)?,
        Value::Date(d) => temporal::encode_naive(&d.and_time(NaiveTime::MIN), config)?,
        Value::Time(t) => JsonScalar::Str(Cow::Owned(temporal::time_to_iso(t))),
        Value::Timedelta(d) => {
            temporal::encode_duration_ns(temporal::duration_to_ns(d)?, config.unit)
        }
        Value::Datetime64(ns) => temporal::encode_datetime_ns(*ns, config)?,
        Value::Timedelta64(ns) => temporal::encode_duration_ns(*ns, config.unit),
        Value::Array(array) if array.ndim() == 0 => {
            return Err(FrameJsonError::UnsupportedValue(
                "0d array is not JSON serializable at the moment".to_string(),
            ))
        }
        Value::List(_)
        | Value::Tuple(_)
        | Value::Set(_)
        | Value::Dict(_)
        | Value::Array(_)
        | Value::Index(_)
        | Value::Series(_)
        | Value::Frame(_) => return Ok(Kind::Composite),
        Value::Object(obj) => return Ok(classify_opaque(obj.as_ref(), has_default_handler)),
    };
    Ok(Kind::Scalar(scalar))
}

/// Classifies one element read from an array.
pub fn classify_item<'v>(
    item: Item<'v>,
    config: TemporalConfig,
    has_default_handler: bool,
) -> Result<Kind<'v>, FrameJsonError> {
    let scalar = match item {
        Item::Bool(b) => JsonScalar::Bool(b),
        Item::Int(i) => JsonScalar::Int(i),
        Item::UInt(u) => JsonScalar::Int(checked_i64(u)?),
        Item::Float(f) => float_scalar(f),
        Item::Datetime64(ns) => temporal::encode_datetime_ns(ns, config)?,
        Item::Timedelta64(ns) => temporal::encode_duration_ns(ns, config.unit),
        Item::Object(value) => return classify(value, config, has_default_handler),
    };
    Ok(Kind::Scalar(scalar))
}

fn classify_opaque<'v>(obj: &dyn Opaque, has_default_handler: bool) -> Kind<'v> {
    match obj.to_mapping() {
        Some(Ok(Value::Dict(entries))) => return Kind::Mapping(entries),
        Some(Ok(other)) => {
            log::debug!(
                "{} mapping conversion returned {}, encoding null",
                obj.type_name(),
                other.type_name()
            );
            return Kind::Scalar(JsonScalar::Null);
        }
        Some(Err(reason)) => {
            log::debug!(
                "{} mapping conversion failed ({}), encoding null",
                obj.type_name(),
                reason
            );
            return Kind::Scalar(JsonScalar::Null);
        }
        None => {}
    }

    if has_default_handler {
        return Kind::Delegate;
    }

    let attributes = obj
        .attributes()
        .into_iter()
        .filter(|attr| !attr.name.starts_with('_'))
        .filter_map(|attr| match attr.value {
            AttrValue::Data(value) => Some((attr.name, value)),
            AttrValue::Callable => None,
            AttrValue::Unreadable(reason) => {
                log::trace!("skipping attribute '{}': {}", attr.name, reason);
                None
            }
        })
        .collect();
    Kind::Attributes(attributes)
}

fn checked_i64<T: ToPrimitive + std::fmt::Display + Copy>(value: T) -> Result<i64, FrameJsonError> {
    value.to_i64().ok_or_else(|| {
        FrameJsonError::Overflow(format!("{} does not fit in a signed 64-bit integer", value))
    })
}

fn float_scalar<'v>(value: f64) -> JsonScalar<'v> {
    if value.is_finite() {
        JsonScalar::Float(value)
    } else {
        JsonScalar::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeUnit;
    use crate::error::ErrorKind;
    use crate::types::{Attribute, Decimal, NdArray};
    use chrono::{NaiveDate, TimeDelta};
    use std::sync::Arc;

    fn epoch_ms() -> TemporalConfig {
        TemporalConfig::default()
    }

    fn scalar_of(value: &Value) -> JsonScalar<'_> {
        match classify(value, epoch_ms(), false).unwrap() {
            Kind::Scalar(s) => s,
            other => panic!("Expected a scalar, got {:?}", other),
        }
    }

    #[derive(Debug)]
    struct Point {
        mapping: Option<Result<Value, String>>,
    }

    impl Opaque for Point {
        fn type_name(&self) -> &str {
            "Point"
        }

        fn to_mapping(&self) -> Option<Result<Value, String>> {
            self.mapping.clone()
        }

        fn attributes(&self) -> Vec<Attribute> {
            vec![
                Attribute {
                    name: "x".into(),
                    value: AttrValue::Data(Value::Int(1)),
                },
                Attribute {
                    name: "_hidden".into(),
                    value: AttrValue::Data(Value::Int(2)),
                },
                Attribute {
                    name: "norm".into(),
                    value: AttrValue::Callable,
                },
                Attribute {
                    name: "broken".into(),
                    value: AttrValue::Unreadable("property raised".into()),
                },
            ]
        }
    }

    #[test]
    fn test_bool_before_numbers() {
        assert_eq!(scalar_of(&Value::Bool(true)), JsonScalar::Bool(true));
        let item = classify_item(Item::Bool(false), epoch_ms(), false).unwrap();
        assert!(matches!(item, Kind::Scalar(JsonScalar::Bool(false))));
    }

    #[test]
    fn test_integer_overflow() {
        let result = classify(&Value::UInt(1u64 << 63), epoch_ms(), false);
        match result {
            Err(err) => assert_eq!(err.kind(), ErrorKind::Overflow),
            Ok(kind) => panic!("Expected overflow, got {:?}", kind),
        }
        assert_eq!(
            scalar_of(&Value::UInt(i64::MAX as u64)),
            JsonScalar::Int(i64::MAX)
        );
        assert!(classify(&Value::BigInt(i128::MAX), epoch_ms(), false).is_err());
    }

    #[test]
    fn test_non_finite_floats_are_null() {
        assert_eq!(scalar_of(&Value::Float(f64::NAN)), JsonScalar::Null);
        assert_eq!(scalar_of(&Value::Float(f64::INFINITY)), JsonScalar::Null);
        assert_eq!(scalar_of(&Value::Float(2.5)), JsonScalar::Float(2.5));
    }

    #[test]
    fn test_decimal_as_float() {
        let value = Value::Decimal(Decimal::new(150, 2));
        assert_eq!(scalar_of(&value), JsonScalar::Float(1.5));
    }

    #[test]
    fn test_temporal_scalars() {
        let date = Value::Date(NaiveDate::from_ymd_opt(2013, 1, 1).unwrap());
        assert_eq!(scalar_of(&date), JsonScalar::Int(1_356_998_400_000));

        let iso = TemporalConfig {
            unit: TimeUnit::Second,
            iso: true,
        };
        match classify(&date, iso, false).unwrap() {
            Kind::Scalar(JsonScalar::Str(s)) => assert_eq!(s, "2013-01-01T00:00:00Z"),
            other => panic!("Expected ISO string, got {:?}", other),
        }

        // Durations stay integers in ISO mode.
        let delta = Value::Timedelta(TimeDelta::try_seconds(3).unwrap());
        assert!(matches!(
            classify(&delta, iso, false).unwrap(),
            Kind::Scalar(JsonScalar::Int(3))
        ));
        assert_eq!(scalar_of(&Value::NaT), JsonScalar::Null);
    }

    #[test]
    fn test_zero_dim_array_rejected() {
        let scalar = NdArray::from(vec![1i64]).into_shape(&[]).unwrap();
        let result = classify(&Value::Array(scalar), epoch_ms(), false);
        assert!(matches!(result, Err(FrameJsonError::UnsupportedValue(_))));
    }

    #[test]
    fn test_mapping_conversion() {
        let ok = Value::Object(Arc::new(Point {
            mapping: Some(Ok(Value::Dict(vec![(Value::from("k"), Value::Int(1))]))),
        }));
        assert!(matches!(classify(&ok, epoch_ms(), false).unwrap(), Kind::Mapping(e) if e.len() == 1));

        let failed = Value::Object(Arc::new(Point {
            mapping: Some(Err("boom".into())),
        }));
        assert!(matches!(
            classify(&failed, epoch_ms(), true).unwrap(),
            Kind::Scalar(JsonScalar::Null)
        ));

        let not_a_dict = Value::Object(Arc::new(Point {
            mapping: Some(Ok(Value::Int(3))),
        }));
        assert!(matches!(
            classify(&not_a_dict, epoch_ms(), false).unwrap(),
            Kind::Scalar(JsonScalar::Null)
        ));
    }

    #[test]
    fn test_attribute_fallback_and_delegate() {
        let obj = Value::Object(Arc::new(Point { mapping: None }));
        match classify(&obj, epoch_ms(), false).unwrap() {
            Kind::Attributes(attrs) => {
                let names: Vec<&str> = attrs.iter().map(|(n, _)| n.as_str()).collect();
                assert_eq!(names, vec!["x"]);
            }
            other => panic!("Expected attributes, got {:?}", other),
        }
        assert!(matches!(
            classify(&obj, epoch_ms(), true).unwrap(),
            Kind::Delegate
        ));
    }
}
