//! The dynamically typed value tree the encoder walks.
//!
//! `Value` is a closed enum: scalars, temporal scalars, generic containers,
//! the three labeled containers (`Index`, `Series`, `DataFrame`) and an escape
//! hatch for user types (`Object`) that can describe themselves through the
//! [`Opaque`] trait.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::fmt;
use std::sync::Arc;

use crate::types::{DataFrame, Index, NdArray, Series};

/// A fixed-point decimal, `mantissa * 10^-scale`, laid out like Arrow's `Decimal128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    pub mantissa: i128,
    pub scale: i8,
}

impl Decimal {
    pub fn new(mantissa: i128, scale: i8) -> Self {
        Self { mantissa, scale }
    }

    /// Best-effort conversion to a double. Extreme scales may produce infinities.
    pub fn to_f64(&self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale <= 0 {
            write!(f, "{}", self.mantissa)?;
            for _ in 0..(-(self.scale as i32)) {
                f.write_str("0")?;
            }
            return Ok(());
        }
        let scale = self.scale as usize;
        let digits = self.mantissa.unsigned_abs().to_string();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, int_part, frac_part)
        } else {
            write!(f, "{}0.{:0>width$}", sign, digits, width = scale)
        }
    }
}

/// One attribute reported by an [`Opaque`] value.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

/// The readable state of an attribute.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Data(Value),
    /// Methods and other callables are never serialized.
    Callable,
    /// Reading the attribute failed; it is skipped.
    Unreadable(String),
}

/// A user value the encoder does not know natively.
///
/// The classifier first asks for a mapping conversion, then (without a
/// default handler) falls back to the public attributes.
pub trait Opaque: fmt::Debug {
    /// Short type name used in diagnostics.
    fn type_name(&self) -> &str;

    /// A dictionary-like conversion. `None` means the type has no such
    /// conversion; `Some(Err(_))` means it exists but failed.
    fn to_mapping(&self) -> Option<Result<Value, String>> {
        None
    }

    fn attributes(&self) -> Vec<Attribute> {
        Vec::new()
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    /// Integers wider than 64 bits; encodable only when they fit in `i64`.
    BigInt(i128),
    Float(f64),
    Decimal(Decimal),
    Str(String),
    Bytes(Vec<u8>),
    /// A naive datetime, interpreted as UTC.
    DateTime(NaiveDateTime),
    /// A timezone-aware datetime, converted to UTC before encoding.
    ZonedDateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timedelta(TimeDelta),
    /// The missing temporal value.
    NaT,
    /// A datetime scalar in nanoseconds since the epoch.
    Datetime64(i64),
    /// A duration scalar in nanoseconds.
    Timedelta64(i64),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Set(Vec<Value>),
    /// Insertion-ordered key/value pairs.
    Dict(Vec<(Value, Value)>),
    Array(NdArray),
    Index(Box<Index>),
    Series(Box<Series>),
    Frame(Box<DataFrame>),
    Object(Arc<dyn Opaque>),
}

impl Value {
    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) | Value::BigInt(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "Decimal",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::DateTime(_) | Value::ZonedDateTime(_) => "datetime",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Timedelta(_) => "timedelta",
            Value::NaT => "NaTType",
            Value::Datetime64(_) => "datetime64",
            Value::Timedelta64(_) => "timedelta64",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Dict(_) => "dict",
            Value::Array(_) => "ndarray",
            Value::Index(_) => "Index",
            Value::Series(_) => "Series",
            Value::Frame(_) => "DataFrame",
            Value::Object(obj) => obj.type_name(),
        }
    }
}

macro_rules! impl_value_from {
    ($($T:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$T> for Value {
                fn from(v: $T) -> Self {
                    Value::$variant(v.into())
                }
            }
        )+
    };
}

impl_value_from!(
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u64 => UInt,
    f64 => Float,
    String => Str,
    &str => Str,
    Decimal => Decimal,
    NaiveDateTime => DateTime,
    NaiveDate => Date,
    NaiveTime => Time,
    TimeDelta => Timedelta,
    NdArray => Array,
    Index => Index,
    Series => Series,
    DataFrame => Frame,
);

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_display() {
        assert_eq!(Decimal::new(12345, 2).to_string(), "123.45");
        assert_eq!(Decimal::new(-5, 3).to_string(), "-0.005");
        assert_eq!(Decimal::new(7, -2).to_string(), "700");
        assert_eq!(Decimal::new(12345, 2).to_f64(), 123.45);
    }
}
