// In: src/bridge/arrow_impl.rs

use arrow::array::{Array, AsArray, PrimitiveArray};
use arrow::compute::cast;
use arrow::datatypes::*;
use arrow::record_batch::RecordBatch;

use crate::error::FrameJsonError;
use crate::kernels::temporal::NAT;
use crate::types::{DType, DataFrame, Decimal, Index, NdArray, Value};

/// DATA MARSHALLING
/// Converts an Arrow `RecordBatch` into a block-backed `DataFrame`.
///
/// Each Arrow column becomes one table column named after its field; columns of
/// the same resulting dtype are consolidated into one block. Without an explicit
/// `index` the rows are labeled `0..num_rows`.
///
/// Null handling follows the table model:
/// * floating point nulls become `NaN` (and so encode as `null`),
/// * temporal nulls become the missing-value sentinel,
/// * integer and boolean columns with nulls are widened to object columns that
///   hold `Value::Null` in the null slots.
pub fn record_batch_to_frame(
    batch: &RecordBatch,
    index: Option<Index>,
) -> Result<DataFrame, FrameJsonError> {
    let schema = batch.schema();
    let mut columns = Vec::with_capacity(batch.num_columns());
    for (field, array) in schema.fields().iter().zip(batch.columns()) {
        let values = arrow_to_ndarray(array.as_ref())?;
        log::trace!(
            "column '{}' ({}) materialized as {}",
            field.name(),
            array.data_type(),
            values.dtype()
        );
        columns.push((field.name().clone(), values));
    }

    let index = index.unwrap_or_else(|| Index::range(batch.num_rows()));
    let frame = DataFrame::from_columns(columns, Some(index))?;
    log_metric!(
        "event" = "record_batch_to_frame",
        "rows" = batch.num_rows(),
        "columns" = batch.num_columns(),
        "blocks" = frame.blocks.len()
    );
    Ok(frame)
}

/// Converts a single Arrow array into a 1-D `NdArray`.
pub fn arrow_to_ndarray(array: &dyn Array) -> Result<NdArray, FrameJsonError> {
    let dtype = DType::from_arrow_type(array.data_type())?;

    macro_rules! downcast_primitive {
        ($T:ty) => {
            array
                .as_any()
                .downcast_ref::<PrimitiveArray<$T>>()
                .ok_or_else(|| downcast_error(array))?
        };
    }

    // Null-free columns keep their native dtype; columns with nulls are
    // widened to objects, wrapping each present value with `$wrap`.
    macro_rules! integer_column {
        ($T:ty, $wrap:expr) => {{
            let typed = downcast_primitive!($T);
            if typed.null_count() == 0 {
                NdArray::from(typed.values().to_vec())
            } else {
                let wrap = $wrap;
                let values: Vec<Value> = typed
                    .iter()
                    .map(|v| v.map_or(Value::Null, wrap))
                    .collect();
                NdArray::from(values)
            }
        }};
    }

    macro_rules! float_column {
        ($T:ty, $nan:expr) => {{
            let typed = downcast_primitive!($T);
            let values: Vec<_> = typed.iter().map(|v| v.unwrap_or($nan)).collect();
            NdArray::from(values)
        }};
    }

    let values = match array.data_type() {
        DataType::Int8 => integer_column!(Int8Type, |v: i8| Value::Int(i64::from(v))),
        DataType::Int16 => integer_column!(Int16Type, |v: i16| Value::Int(i64::from(v))),
        DataType::Int32 => integer_column!(Int32Type, |v: i32| Value::Int(i64::from(v))),
        DataType::Int64 => integer_column!(Int64Type, Value::Int),
        DataType::UInt8 => integer_column!(UInt8Type, |v: u8| Value::UInt(u64::from(v))),
        DataType::UInt16 => integer_column!(UInt16Type, |v: u16| Value::UInt(u64::from(v))),
        DataType::UInt32 => integer_column!(UInt32Type, |v: u32| Value::UInt(u64::from(v))),
        DataType::UInt64 => integer_column!(UInt64Type, Value::UInt),
        DataType::Float32 => float_column!(Float32Type, f32::NAN),
        DataType::Float64 => float_column!(Float64Type, f64::NAN),
        DataType::Boolean => {
            let typed = array
                .as_boolean_opt()
                .ok_or_else(|| downcast_error(array))?;
            if typed.null_count() == 0 {
                NdArray::from(typed.values().iter().collect::<Vec<bool>>())
            } else {
                let values: Vec<Value> = typed
                    .iter()
                    .map(|v| v.map_or(Value::Null, Value::Bool))
                    .collect();
                NdArray::from(values)
            }
        }
        DataType::Timestamp(unit, _) | DataType::Duration(unit) => {
            let nanos = temporal_nanos(array, nanos_per_tick(unit))?;
            if dtype == DType::Timedelta64 {
                NdArray::timedelta64(nanos)
            } else {
                NdArray::datetime64(nanos)
            }
        }
        DataType::Date32 => NdArray::datetime64(temporal_nanos(array, NANOS_PER_DAY)?),
        DataType::Date64 => NdArray::datetime64(temporal_nanos(array, 1_000_000)?),
        DataType::Utf8 => {
            let typed = array
                .as_string_opt::<i32>()
                .ok_or_else(|| downcast_error(array))?;
            NdArray::from(typed.iter().map(string_value).collect::<Vec<Value>>())
        }
        DataType::LargeUtf8 => {
            let typed = array
                .as_string_opt::<i64>()
                .ok_or_else(|| downcast_error(array))?;
            NdArray::from(typed.iter().map(string_value).collect::<Vec<Value>>())
        }
        DataType::Decimal128(_, scale) => {
            let typed = downcast_primitive!(Decimal128Type);
            let scale = *scale;
            let values: Vec<Value> = typed
                .iter()
                .map(|v| v.map_or(Value::Null, |m| Value::Decimal(Decimal::new(m, scale))))
                .collect();
            NdArray::from(values)
        }
        dt => {
            return Err(FrameJsonError::UnsupportedValue(format!(
                "Unsupported Arrow type: {}",
                dt
            )))
        }
    };
    Ok(values)
}

const NANOS_PER_DAY: i64 = 86_400_000_000_000;

fn nanos_per_tick(unit: &TimeUnit) -> i64 {
    match unit {
        TimeUnit::Second => 1_000_000_000,
        TimeUnit::Millisecond => 1_000_000,
        TimeUnit::Microsecond => 1_000,
        TimeUnit::Nanosecond => 1,
    }
}

/// Reads a temporal column as nanosecond counts; nulls become the sentinel.
fn temporal_nanos(array: &dyn Array, nanos_per_tick: i64) -> Result<Vec<i64>, FrameJsonError> {
    let ticks = cast(array, &DataType::Int64)?;
    let ticks = ticks
        .as_primitive_opt::<Int64Type>()
        .ok_or_else(|| downcast_error(array))?;
    ticks
        .iter()
        .map(|tick| match tick {
            None => Ok(NAT),
            Some(tick) => tick
                .checked_mul(nanos_per_tick)
                .filter(|ns| *ns != NAT)
                .ok_or_else(|| {
                    FrameJsonError::Overflow(format!(
                        "{} {} ticks exceed the nanosecond range",
                        tick,
                        array.data_type()
                    ))
                }),
        })
        .collect()
}

fn string_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, Value::from)
}

fn downcast_error(array: &dyn Array) -> FrameJsonError {
    FrameJsonError::InternalError(format!(
        "Arrow array does not match its declared type {}",
        array.data_type()
    ))
}
