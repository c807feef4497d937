//! Labeled containers: `Index`, `Series` and the block-backed `DataFrame`.
//!
//! A `DataFrame` stores its columns in type-homogeneous `Block`s. Each block owns
//! a `(block_columns, rows)` buffer and a `locs` map from block-local column
//! position to table-wide column position.

use ndarray::{Array1, ArrayD};

use crate::error::FrameJsonError;
use crate::types::{DType, NdArray, NdView, Value};

/// An ordered, optionally named sequence of labels.
#[derive(Debug, Clone)]
pub struct Index {
    pub name: Value,
    /// Always one-dimensional.
    pub values: NdArray,
}

impl Index {
    pub fn new(values: NdArray) -> Self {
        Self {
            name: Value::Null,
            values,
        }
    }

    /// `0..len` as 64-bit integers.
    pub fn range(len: usize) -> Self {
        let values: ArrayD<i64> = Array1::from_iter(0..len as i64).into_dyn();
        Self::new(NdArray::Int64(values))
    }

    /// An object index of string labels.
    pub fn from_labels<S: Into<String>>(labels: Vec<S>) -> Self {
        Self::new(NdArray::strings(labels))
    }

    pub fn with_name(mut self, name: impl Into<Value>) -> Self {
        self.name = name.into();
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One-dimensional labeled data.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: Value,
    pub index: Index,
    pub values: NdArray,
}

impl Series {
    /// A series over `values` with a range index.
    pub fn new(values: NdArray) -> Self {
        Self {
            name: Value::Null,
            index: Index::range(values.len()),
            values,
        }
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.index = index;
        self
    }

    pub fn with_name(mut self, name: impl Into<Value>) -> Self {
        self.name = name.into();
        self
    }
}

/// A group of same-dtype columns stored contiguously.
#[derive(Debug, Clone)]
pub struct Block {
    /// Shaped `(locs.len(), rows)`.
    pub values: NdArray,
    /// `locs[i]` is the table-wide position of block-local column `i`.
    pub locs: Vec<usize>,
}

impl Block {
    pub fn new(values: NdArray, locs: Vec<usize>) -> Result<Self, FrameJsonError> {
        if values.ndim() != 2 {
            return Err(FrameJsonError::UnsupportedValue(format!(
                "block values must be 2-dimensional, got {} dimensions",
                values.ndim()
            )));
        }
        if values.shape()[0] != locs.len() {
            return Err(FrameJsonError::UnsupportedValue(format!(
                "block holds {} columns but maps {} locations",
                values.shape()[0],
                locs.len()
            )));
        }
        Ok(Self { values, locs })
    }

    pub fn dtype(&self) -> DType {
        self.values.dtype()
    }
}

/// A two-dimensional table with row labels (`index`) and column labels (`columns`).
#[derive(Debug, Clone)]
pub struct DataFrame {
    pub columns: Index,
    pub index: Index,
    pub blocks: Vec<Block>,
}

impl DataFrame {
    /// Assembles a table from pre-built blocks, taken as given.
    pub fn from_blocks(columns: Index, index: Index, blocks: Vec<Block>) -> Self {
        Self {
            columns,
            index,
            blocks,
        }
    }

    /// Builds a table from named 1-D columns, consolidating columns of the same
    /// dtype into one block. Without an explicit index a range index is used.
    pub fn from_columns<L, I>(columns: I, index: Option<Index>) -> Result<Self, FrameJsonError>
    where
        L: Into<Value>,
        I: IntoIterator<Item = (L, NdArray)>,
    {
        let (labels, arrays): (Vec<Value>, Vec<NdArray>) = columns
            .into_iter()
            .map(|(label, array)| (label.into(), array))
            .unzip();

        let n_rows = match &index {
            Some(index) => index.len(),
            None => arrays.first().map_or(0, NdArray::len),
        };
        for (label, array) in labels.iter().zip(&arrays) {
            if array.ndim() != 1 || array.len() != n_rows {
                return Err(FrameJsonError::UnsupportedValue(format!(
                    "column {:?} has shape {:?}, expected [{}]",
                    label,
                    array.shape(),
                    n_rows
                )));
            }
        }

        // Group column positions by dtype, in order of first appearance.
        let mut groups: Vec<(DType, Vec<usize>)> = Vec::new();
        for (position, array) in arrays.iter().enumerate() {
            let dtype = array.dtype();
            match groups.iter_mut().find(|(d, _)| *d == dtype) {
                Some((_, locs)) => locs.push(position),
                None => groups.push((dtype, vec![position])),
            }
        }

        let mut blocks = Vec::with_capacity(groups.len());
        for (_, locs) in groups {
            let members: Vec<&NdArray> = locs.iter().map(|&loc| &arrays[loc]).collect();
            let values = NdArray::stack_columns(&members)?;
            blocks.push(Block::new(values, locs)?);
        }
        log::debug!(
            "consolidated {} columns into {} blocks",
            labels.len(),
            blocks.len()
        );

        Ok(Self {
            columns: Index::new(NdArray::from(labels)),
            index: index.unwrap_or_else(|| Index::range(n_rows)),
            blocks,
        })
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    /// `(rows, columns)` of the stored data, independent of the labels.
    pub fn data_shape(&self) -> (usize, usize) {
        let n_rows = self
            .blocks
            .first()
            .and_then(|block| block.values.shape().get(1).copied())
            .unwrap_or_else(|| self.index.len());
        let n_columns = self.blocks.iter().map(|block| block.locs.len()).sum();
        (n_rows, n_columns)
    }

    /// The `(rows, columns)` view of a table backed by a single block whose
    /// columns are already in table order. `None` for any other layout.
    pub fn simple_view(&self) -> Option<NdView<'_>> {
        match self.blocks.as_slice() {
            [block] if block.locs.iter().enumerate().all(|(i, &loc)| i == loc) => {
                Some(block.values.view().reversed_axes())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_columns_consolidates_by_dtype() {
        // 1. Arrange: int, float, int columns.
        let frame = DataFrame::from_columns(
            vec![
                ("a", NdArray::from(vec![1i64, 2])),
                ("b", NdArray::from(vec![0.5f64, 1.5])),
                ("c", NdArray::from(vec![3i64, 4])),
            ],
            None,
        )
        .unwrap();

        // 2. Assert: two blocks, ints mapped to positions 0 and 2.
        assert_eq!(frame.blocks.len(), 2);
        assert_eq!(frame.blocks[0].locs, vec![0, 2]);
        assert_eq!(frame.blocks[0].values.shape(), &[2, 2]);
        assert_eq!(frame.blocks[1].locs, vec![1]);
        assert_eq!(frame.n_rows(), 2);
        assert!(frame.simple_view().is_none());
    }

    #[test]
    fn test_simple_view_for_single_block() {
        let frame = DataFrame::from_columns(
            vec![
                ("a", NdArray::from(vec![1i64, 3])),
                ("b", NdArray::from(vec![2i64, 4])),
            ],
            Some(Index::from_labels(vec!["x", "y"])),
        )
        .unwrap();
        let view = frame.simple_view().unwrap();
        assert_eq!(view.shape(), &[2, 2]);
    }

    #[test]
    fn test_from_columns_rejects_ragged_columns() {
        let result = DataFrame::from_columns(
            vec![
                ("a", NdArray::from(vec![1i64, 2])),
                ("b", NdArray::from(vec![1i64])),
            ],
            None,
        );
        assert!(matches!(result, Err(FrameJsonError::UnsupportedValue(_))));
    }

    #[test]
    fn test_block_validates_layout() {
        let flat = NdArray::from(vec![1i64, 2]);
        assert!(Block::new(flat, vec![0]).is_err());
    }
}
