//! N-dimensional typed storage and the borrowed views cursors read from.
//!
//! `NdArray` owns its elements in an `ndarray::ArrayD` per dtype; `NdView` is the
//! matching borrowed view. Views carry arbitrary strides, so transposing is a
//! metadata-only operation and cursors never copy element storage.

use ndarray::{Array1, ArrayD, ArrayViewD, Axis, IxDyn};

use crate::error::FrameJsonError;
use crate::traits::ToItem;
use crate::types::{DType, Value};

/// One element read out of an array, ready for classification.
#[derive(Debug, Clone, Copy)]
pub enum Item<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Datetime64(i64),
    Timedelta64(i64),
    Object(&'a Value),
}

/// Owned N-dimensional storage, one variant per dtype.
#[derive(Debug, Clone)]
pub enum NdArray {
    Bool(ArrayD<bool>),
    Int8(ArrayD<i8>),
    Int16(ArrayD<i16>),
    Int32(ArrayD<i32>),
    Int64(ArrayD<i64>),
    UInt8(ArrayD<u8>),
    UInt16(ArrayD<u16>),
    UInt32(ArrayD<u32>),
    UInt64(ArrayD<u64>),
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
    /// Nanoseconds since the epoch; `i64::MIN` is the missing value.
    DateTime64(ArrayD<i64>),
    /// Nanosecond durations; `i64::MIN` is the missing value.
    Timedelta64(ArrayD<i64>),
    Object(ArrayD<Value>),
}

/// A borrowed, possibly strided view of an [`NdArray`].
#[derive(Debug, Clone)]
pub enum NdView<'a> {
    Bool(ArrayViewD<'a, bool>),
    Int8(ArrayViewD<'a, i8>),
    Int16(ArrayViewD<'a, i16>),
    Int32(ArrayViewD<'a, i32>),
    Int64(ArrayViewD<'a, i64>),
    UInt8(ArrayViewD<'a, u8>),
    UInt16(ArrayViewD<'a, u16>),
    UInt32(ArrayViewD<'a, u32>),
    UInt64(ArrayViewD<'a, u64>),
    Float32(ArrayViewD<'a, f32>),
    Float64(ArrayViewD<'a, f64>),
    DateTime64(ArrayViewD<'a, i64>),
    Timedelta64(ArrayViewD<'a, i64>),
    Object(ArrayViewD<'a, Value>),
}

/// Expands `$body` once per variant with `$a` bound to the inner array, wrapping
/// the result back into the same variant of `$Out`.
macro_rules! map_variants {
    ($source:expr, $Src:ident => $Out:ident, |$a:ident| $body:expr) => {
        match $source {
            $Src::Bool($a) => $Out::Bool($body),
            $Src::Int8($a) => $Out::Int8($body),
            $Src::Int16($a) => $Out::Int16($body),
            $Src::Int32($a) => $Out::Int32($body),
            $Src::Int64($a) => $Out::Int64($body),
            $Src::UInt8($a) => $Out::UInt8($body),
            $Src::UInt16($a) => $Out::UInt16($body),
            $Src::UInt32($a) => $Out::UInt32($body),
            $Src::UInt64($a) => $Out::UInt64($body),
            $Src::Float32($a) => $Out::Float32($body),
            $Src::Float64($a) => $Out::Float64($body),
            $Src::DateTime64($a) => $Out::DateTime64($body),
            $Src::Timedelta64($a) => $Out::Timedelta64($body),
            $Src::Object($a) => $Out::Object($body),
        }
    };
}

/// Evaluates `$body` for whichever variant is active, with `$a` bound to the
/// inner array.
macro_rules! with_variant {
    ($source:expr, $Src:ident, |$a:ident| $body:expr) => {
        match $source {
            $Src::Bool($a) => $body,
            $Src::Int8($a) => $body,
            $Src::Int16($a) => $body,
            $Src::Int32($a) => $body,
            $Src::Int64($a) => $body,
            $Src::UInt8($a) => $body,
            $Src::UInt16($a) => $body,
            $Src::UInt32($a) => $body,
            $Src::UInt64($a) => $body,
            $Src::Float32($a) => $body,
            $Src::Float64($a) => $body,
            $Src::DateTime64($a) => $body,
            $Src::Timedelta64($a) => $body,
            $Src::Object($a) => $body,
        }
    };
}

impl NdArray {
    pub fn dtype(&self) -> DType {
        match self {
            Self::Bool(_) => DType::Boolean,
            Self::Int8(_) => DType::Int8,
            Self::Int16(_) => DType::Int16,
            Self::Int32(_) => DType::Int32,
            Self::Int64(_) => DType::Int64,
            Self::UInt8(_) => DType::UInt8,
            Self::UInt16(_) => DType::UInt16,
            Self::UInt32(_) => DType::UInt32,
            Self::UInt64(_) => DType::UInt64,
            Self::Float32(_) => DType::Float32,
            Self::Float64(_) => DType::Float64,
            Self::DateTime64(_) => DType::DateTime64,
            Self::Timedelta64(_) => DType::Timedelta64,
            Self::Object(_) => DType::Object,
        }
    }

    pub fn view(&self) -> NdView<'_> {
        map_variants!(self, NdArray => NdView, |a| a.view())
    }

    pub fn shape(&self) -> &[usize] {
        with_variant!(self, NdArray, |a| a.shape())
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Extent of the first axis (0 for rank-0 arrays).
    pub fn len(&self) -> usize {
        self.shape().first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a 1-D datetime array from nanosecond epoch values.
    pub fn datetime64(values: Vec<i64>) -> Self {
        Self::DateTime64(Array1::from(values).into_dyn())
    }

    /// Builds a 1-D duration array from nanosecond values.
    pub fn timedelta64(values: Vec<i64>) -> Self {
        Self::Timedelta64(Array1::from(values).into_dyn())
    }

    /// Builds a 1-D object array of strings.
    pub fn strings<S: Into<String>>(values: Vec<S>) -> Self {
        values
            .into_iter()
            .map(|s| Value::Str(s.into()))
            .collect::<Vec<_>>()
            .into()
    }

    /// Reshapes the array, keeping its dtype. The element count must match.
    pub fn into_shape(self, shape: &[usize]) -> Result<Self, FrameJsonError> {
        Ok(match self {
            Self::Bool(a) => Self::Bool(reshape(a, shape)?),
            Self::Int8(a) => Self::Int8(reshape(a, shape)?),
            Self::Int16(a) => Self::Int16(reshape(a, shape)?),
            Self::Int32(a) => Self::Int32(reshape(a, shape)?),
            Self::Int64(a) => Self::Int64(reshape(a, shape)?),
            Self::UInt8(a) => Self::UInt8(reshape(a, shape)?),
            Self::UInt16(a) => Self::UInt16(reshape(a, shape)?),
            Self::UInt32(a) => Self::UInt32(reshape(a, shape)?),
            Self::UInt64(a) => Self::UInt64(reshape(a, shape)?),
            Self::Float32(a) => Self::Float32(reshape(a, shape)?),
            Self::Float64(a) => Self::Float64(reshape(a, shape)?),
            Self::DateTime64(a) => Self::DateTime64(reshape(a, shape)?),
            Self::Timedelta64(a) => Self::Timedelta64(reshape(a, shape)?),
            Self::Object(a) => Self::Object(reshape(a, shape)?),
        })
    }

    /// Stacks same-dtype 1-D columns into one `(columns, rows)` array.
    pub fn stack_columns(columns: &[&NdArray]) -> Result<Self, FrameJsonError> {
        let first = columns.first().ok_or_else(|| {
            FrameJsonError::InternalError("cannot stack an empty column list".to_string())
        })?;

        macro_rules! stack_as {
            ($variant:ident) => {{
                let mut views = Vec::with_capacity(columns.len());
                for column in columns {
                    match column {
                        NdArray::$variant(a) => views.push(a.view()),
                        other => {
                            return Err(FrameJsonError::InternalError(format!(
                                "cannot stack {} column into a {} block",
                                other.dtype(),
                                first.dtype()
                            )))
                        }
                    }
                }
                NdArray::$variant(ndarray::stack(Axis(0), &views)?)
            }};
        }

        Ok(match first {
            NdArray::Bool(_) => stack_as!(Bool),
            NdArray::Int8(_) => stack_as!(Int8),
            NdArray::Int16(_) => stack_as!(Int16),
            NdArray::Int32(_) => stack_as!(Int32),
            NdArray::Int64(_) => stack_as!(Int64),
            NdArray::UInt8(_) => stack_as!(UInt8),
            NdArray::UInt16(_) => stack_as!(UInt16),
            NdArray::UInt32(_) => stack_as!(UInt32),
            NdArray::UInt64(_) => stack_as!(UInt64),
            NdArray::Float32(_) => stack_as!(Float32),
            NdArray::Float64(_) => stack_as!(Float64),
            NdArray::DateTime64(_) => stack_as!(DateTime64),
            NdArray::Timedelta64(_) => stack_as!(Timedelta64),
            NdArray::Object(_) => stack_as!(Object),
        })
    }
}

fn reshape<T: Clone>(array: ArrayD<T>, shape: &[usize]) -> Result<ArrayD<T>, FrameJsonError> {
    let flat: Vec<T> = array.iter().cloned().collect();
    Ok(ArrayD::from_shape_vec(IxDyn(shape), flat)?)
}

impl<'a> NdView<'a> {
    pub fn shape(&self) -> &[usize] {
        with_variant!(self, NdView, |a| a.shape())
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Reverses the axis order (a transpose for 2-D views) without copying.
    pub fn reversed_axes(self) -> Self {
        map_variants!(self, NdView => NdView, |a| a.reversed_axes())
    }

    /// Reads the element at `position`, one coordinate per axis.
    pub fn get(&self, position: &[usize]) -> Option<Item<'_>> {
        match self {
            NdView::DateTime64(a) => a.get(position).map(|v| Item::Datetime64(*v)),
            NdView::Timedelta64(a) => a.get(position).map(|v| Item::Timedelta64(*v)),
            NdView::Object(a) => a.get(position).map(Item::Object),
            NdView::Bool(a) => a.get(position).map(ToItem::to_item),
            NdView::Int8(a) => a.get(position).map(ToItem::to_item),
            NdView::Int16(a) => a.get(position).map(ToItem::to_item),
            NdView::Int32(a) => a.get(position).map(ToItem::to_item),
            NdView::Int64(a) => a.get(position).map(ToItem::to_item),
            NdView::UInt8(a) => a.get(position).map(ToItem::to_item),
            NdView::UInt16(a) => a.get(position).map(ToItem::to_item),
            NdView::UInt32(a) => a.get(position).map(ToItem::to_item),
            NdView::UInt64(a) => a.get(position).map(ToItem::to_item),
            NdView::Float32(a) => a.get(position).map(ToItem::to_item),
            NdView::Float64(a) => a.get(position).map(ToItem::to_item),
        }
    }
}

macro_rules! impl_ndarray_from {
    ($($T:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<Vec<$T>> for NdArray {
                fn from(values: Vec<$T>) -> Self {
                    NdArray::$variant(Array1::from(values).into_dyn())
                }
            }

            impl From<ArrayD<$T>> for NdArray {
                fn from(values: ArrayD<$T>) -> Self {
                    NdArray::$variant(values)
                }
            }
        )+
    };
}

impl_ndarray_from!(
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    Value => Object,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_reads_transposed_positions() {
        let array = NdArray::from(vec![1i64, 2, 3, 4, 5, 6]).into_shape(&[2, 3]).unwrap();
        let view = array.view().reversed_axes();
        assert_eq!(view.shape(), &[3, 2]);
        assert!(matches!(view.get(&[2, 1]), Some(Item::Int(6))));
        assert!(matches!(view.get(&[1, 0]), Some(Item::Int(2))));
        assert!(view.get(&[3, 0]).is_none());
    }

    #[test]
    fn test_stack_columns_builds_block_layout() {
        let a = NdArray::from(vec![1.0f64, 2.0]);
        let b = NdArray::from(vec![3.0f64, 4.0]);
        let stacked = NdArray::stack_columns(&[&a, &b]).unwrap();
        assert_eq!(stacked.shape(), &[2, 2]);
        assert!(matches!(stacked.view().get(&[1, 0]), Some(Item::Float(v)) if v == 3.0));
    }

    #[test]
    fn test_stack_columns_rejects_mixed_dtypes() {
        let a = NdArray::from(vec![1i64]);
        let b = NdArray::from(vec![true]);
        let result = NdArray::stack_columns(&[&a, &b]);
        assert!(matches!(result, Err(FrameJsonError::InternalError(_))));
    }
}
