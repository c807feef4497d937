//! This module defines the canonical, type-safe representation of element types
//! stored in arrays, blocks and index labels.

use crate::error::FrameJsonError;
use arrow::datatypes::DataType as ArrowDataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The element type of an [`NdArray`](crate::types::NdArray).
///
/// Temporal dtypes always hold signed 64-bit nanosecond counts, with
/// `i64::MIN` reserved as the missing-value sentinel.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    DateTime64,
    Timedelta64,
    Object,
}

impl DType {
    /// Maps an Arrow `DataType` onto the dtype the bridge materializes it as.
    ///
    /// Integer and boolean columns that carry nulls are widened to `Object` by
    /// the bridge itself; this mapping describes the null-free case.
    pub fn from_arrow_type(arrow_type: &ArrowDataType) -> Result<Self, FrameJsonError> {
        match arrow_type {
            ArrowDataType::Boolean => Ok(Self::Boolean),
            ArrowDataType::Int8 => Ok(Self::Int8),
            ArrowDataType::Int16 => Ok(Self::Int16),
            ArrowDataType::Int32 => Ok(Self::Int32),
            ArrowDataType::Int64 => Ok(Self::Int64),
            ArrowDataType::UInt8 => Ok(Self::UInt8),
            ArrowDataType::UInt16 => Ok(Self::UInt16),
            ArrowDataType::UInt32 => Ok(Self::UInt32),
            ArrowDataType::UInt64 => Ok(Self::UInt64),
            ArrowDataType::Float32 => Ok(Self::Float32),
            ArrowDataType::Float64 => Ok(Self::Float64),
            ArrowDataType::Timestamp(_, _) | ArrowDataType::Date32 | ArrowDataType::Date64 => {
                Ok(Self::DateTime64)
            }
            ArrowDataType::Duration(_) => Ok(Self::Timedelta64),
            ArrowDataType::Utf8 | ArrowDataType::LargeUtf8 | ArrowDataType::Decimal128(_, _) => {
                Ok(Self::Object)
            }
            dt => Err(FrameJsonError::UnsupportedValue(format!(
                "Cannot convert Arrow type {:?} to DType",
                dt
            ))),
        }
    }

    /// Returns `true` for the nanosecond-backed datetime and duration dtypes.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::DateTime64 | Self::Timedelta64)
    }
}

/// Provides the canonical string representation for a `DType`.
impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::TimeUnit as ArrowTimeUnit;

    #[test]
    fn test_arrow_temporal_mapping() {
        assert_eq!(
            DType::from_arrow_type(&ArrowDataType::Timestamp(ArrowTimeUnit::Millisecond, None))
                .unwrap(),
            DType::DateTime64
        );
        assert_eq!(
            DType::from_arrow_type(&ArrowDataType::Duration(ArrowTimeUnit::Second)).unwrap(),
            DType::Timedelta64
        );
        assert!(DType::Timedelta64.is_temporal());
        assert!(!DType::Object.is_temporal());
    }

    #[test]
    fn test_unsupported_arrow_type() {
        let result = DType::from_arrow_type(&ArrowDataType::Binary);
        assert!(matches!(result, Err(FrameJsonError::UnsupportedValue(_))));
    }
}
