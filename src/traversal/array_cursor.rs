// In: src/traversal/array_cursor.rs

//! Dimension-by-dimension iteration over an N-dimensional strided view.
//!
//! A cursor visits one dimension (its *stride dimension*). Above the innermost
//! dimension each step yields a child cursor one dimension deeper; at the
//! innermost dimension each step yields an element. A transposed cursor starts
//! at the last dimension and walks towards the first, which swaps row and
//! column nesting for 2-D data without touching storage.

use std::rc::Rc;

use crate::error::FrameJsonError;
use crate::kernels::labels::LabelSet;
use crate::types::{Item, NdView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Forward,
    Reverse,
}

#[derive(Debug, Clone)]
pub struct ArrayCursor<'a> {
    view: NdView<'a>,
    /// Index of the innermost dimension (`rank - 1`).
    ndim: usize,
    /// Number of dimensions descended so far.
    curdim: usize,
    stridedim: usize,
    step: Step,
    /// Extent of the stride dimension.
    dim: usize,
    /// Steps taken in each dimension.
    index: Vec<usize>,
    /// Coordinates of the current element or child.
    offset: Vec<usize>,
    item_mode: bool,
    pub(crate) row_labels: Option<Rc<LabelSet>>,
    pub(crate) column_labels: Option<Rc<LabelSet>>,
}

impl<'a> ArrayCursor<'a> {
    /// Positions a new cursor at the first (or, transposed, the last) dimension.
    pub fn begin(
        view: NdView<'a>,
        transpose: bool,
        row_labels: Option<Rc<LabelSet>>,
        column_labels: Option<Rc<LabelSet>>,
    ) -> Result<Self, FrameJsonError> {
        let rank = view.ndim();
        if rank == 0 {
            return Err(FrameJsonError::UnsupportedValue(
                "0d array is not JSON serializable at the moment".to_string(),
            ));
        }
        let ndim = rank - 1;
        let (stridedim, step) = if transpose {
            (ndim, Step::Reverse)
        } else {
            (0, Step::Forward)
        };
        let dim = view.shape()[stridedim];
        log::trace!(
            "array cursor over shape {:?}, transpose={}",
            view.shape(),
            transpose
        );

        Ok(Self {
            view,
            ndim,
            curdim: 0,
            stridedim,
            step,
            dim,
            index: vec![0; rank],
            offset: vec![0; rank],
            item_mode: ndim == 0,
            row_labels,
            column_labels,
        })
    }

    /// Steps the stride dimension; `false` once its extent is exhausted.
    pub fn next(&mut self) -> bool {
        let position = self.index[self.stridedim];
        if position >= self.dim {
            return false;
        }
        self.offset[self.stridedim] = position;
        self.index[self.stridedim] = position + 1;
        true
    }

    /// `true` when steps yield elements rather than child cursors.
    pub fn is_item_mode(&self) -> bool {
        self.item_mode
    }

    pub fn has_column_labels(&self) -> bool {
        self.column_labels.is_some()
    }

    /// Zero-based position of the last step, `None` before the first.
    pub fn position(&self) -> Option<usize> {
        self.index[self.stridedim].checked_sub(1)
    }

    /// The element at the current position. Only valid in item mode.
    pub fn current(&self) -> Result<Item<'_>, FrameJsonError> {
        if !self.item_mode || self.position().is_none() {
            return Err(FrameJsonError::InternalError(
                "array cursor read outside item mode".to_string(),
            ));
        }
        self.view.get(&self.offset).ok_or_else(|| {
            FrameJsonError::InternalError(format!(
                "array position {:?} out of bounds for shape {:?}",
                self.offset,
                self.view.shape()
            ))
        })
    }

    /// The cursor one dimension deeper at the current position, with its own
    /// position reset to zero. This cursor is left untouched. Fails in item
    /// mode, where there is no deeper dimension, and before the first step.
    pub(crate) fn descend(&self) -> Result<Self, FrameJsonError> {
        if self.item_mode || self.position().is_none() {
            return Err(FrameJsonError::InternalError(format!(
                "cannot descend array cursor at dimension {} of {}",
                self.curdim, self.ndim
            )));
        }
        let mut child = self.clone();
        child.curdim += 1;
        child.stridedim = match self.step {
            Step::Forward => self.stridedim + 1,
            Step::Reverse => self.stridedim.saturating_sub(1),
        };
        child.dim = child.view.shape()[child.stridedim];
        child.index[child.stridedim] = 0;
        child.item_mode = child.curdim >= child.ndim;
        Ok(child)
    }

    /// The child cursor at `position` of the stride dimension, as if this cursor
    /// had stepped there. Used to address one column of a block directly.
    pub fn child_at(&self, position: usize) -> Result<Self, FrameJsonError> {
        if self.item_mode || position >= self.dim {
            return Err(FrameJsonError::InternalError(format!(
                "cannot position array cursor at {} of {}",
                position, self.dim
            )));
        }
        let mut parent = self.clone();
        parent.offset[parent.stridedim] = position;
        parent.index[parent.stridedim] = position + 1;
        parent.descend()
    }

    /// Label of the current step: a column label for elements, a row label for
    /// child rows.
    pub fn name(&self) -> Result<&str, FrameJsonError> {
        let position = self.position().ok_or_else(|| {
            FrameJsonError::InternalError("array cursor named before first step".to_string())
        })?;
        let labels = if self.item_mode {
            &self.column_labels
        } else {
            &self.row_labels
        };
        match labels {
            Some(labels) => labels.get(position),
            None => Err(FrameJsonError::InternalError(
                "array cursor has no labels for this dimension".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NdArray;

    fn ints(cursor: &ArrayCursor<'_>) -> i64 {
        match cursor.current().unwrap() {
            Item::Int(v) => v,
            other => panic!("Expected an int item, got {:?}", other),
        }
    }

    /// Walks a 2-D cursor into nested vectors.
    fn walk_2d(mut cursor: ArrayCursor<'_>) -> Vec<Vec<i64>> {
        let mut rows = Vec::new();
        while cursor.next() {
            let mut child = cursor.descend().unwrap();
            let mut row = Vec::new();
            while child.next() {
                row.push(ints(&child));
            }
            rows.push(row);
        }
        rows
    }

    #[test]
    fn test_row_major_order() {
        let array = NdArray::from(vec![1i64, 2, 3, 4, 5, 6]).into_shape(&[2, 3]).unwrap();
        let cursor = ArrayCursor::begin(array.view(), false, None, None).unwrap();
        assert!(!cursor.is_item_mode());
        assert_eq!(walk_2d(cursor), vec![vec![1, 2, 3], vec![4, 5, 6]]);
    }

    #[test]
    fn test_transposed_order() {
        let array = NdArray::from(vec![1i64, 2, 3, 4, 5, 6]).into_shape(&[2, 3]).unwrap();
        let cursor = ArrayCursor::begin(array.view(), true, None, None).unwrap();
        assert_eq!(walk_2d(cursor), vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
    }

    #[test]
    fn test_three_dimensions() {
        let array = NdArray::from((0..8).collect::<Vec<i64>>())
            .into_shape(&[2, 2, 2])
            .unwrap();
        let mut cursor = ArrayCursor::begin(array.view(), false, None, None).unwrap();
        let mut flat = Vec::new();
        while cursor.next() {
            let mut middle = cursor.descend().unwrap();
            assert!(!middle.is_item_mode());
            while middle.next() {
                let mut inner = middle.descend().unwrap();
                assert!(inner.is_item_mode());
                while inner.next() {
                    flat.push(ints(&inner));
                }
            }
        }
        assert_eq!(flat, (0..8).collect::<Vec<i64>>());
    }

    #[test]
    fn test_parent_position_survives_child() {
        let array = NdArray::from(vec![1i64, 2, 3, 4]).into_shape(&[2, 2]).unwrap();
        let mut cursor = ArrayCursor::begin(array.view(), false, None, None).unwrap();
        assert!(cursor.next());
        let mut child = cursor.descend().unwrap();
        while child.next() {}
        assert_eq!(cursor.position(), Some(0));
        assert!(cursor.next());
        assert_eq!(cursor.position(), Some(1));
        assert!(!cursor.next());
    }

    #[test]
    fn test_child_at_addresses_one_column() {
        // (rows=3, columns=2) transposed view of a (2, 3) block.
        let block = NdArray::from(vec![1i64, 2, 3, 10, 20, 30]).into_shape(&[2, 3]).unwrap();
        let view = block.view().reversed_axes();
        let parent = ArrayCursor::begin(view, true, None, None).unwrap();
        let mut column = parent.child_at(1).unwrap();
        let mut values = Vec::new();
        while column.next() {
            values.push(ints(&column));
        }
        assert_eq!(values, vec![10, 20, 30]);
        assert!(parent.child_at(2).is_err());
    }

    #[test]
    fn test_descend_past_innermost_dimension_fails() {
        // 1. Arrange: a 1-D cursor is in item mode from the start.
        let array = NdArray::from(vec![1i64, 2]);
        let mut flat = ArrayCursor::begin(array.view(), false, None, None).unwrap();
        assert!(flat.next());

        // 2. Act
        let result = flat.descend();

        // 3. Assert
        if let Err(FrameJsonError::InternalError(_)) = result {
            // Expected
        } else {
            panic!("Expected InternalError, got {:?}", result);
        }

        // A 2-D cursor cannot descend before its first step either.
        let grid = NdArray::from(vec![1i64, 2, 3, 4]).into_shape(&[2, 2]).unwrap();
        let fresh = ArrayCursor::begin(grid.view(), false, None, None).unwrap();
        assert!(fresh.descend().is_err());
        let mut row = fresh.child_at(0).unwrap();
        assert!(row.next());
        assert!(row.descend().is_err());
    }

    #[test]
    fn test_rank_zero_rejected() {
        let scalar = NdArray::from(vec![1i64]).into_shape(&[]).unwrap();
        assert!(ArrayCursor::begin(scalar.view(), false, None, None).is_err());
    }

    #[test]
    fn test_empty_axis_is_exhausted() {
        let empty = NdArray::from(Vec::<i64>::new());
        let mut cursor = ArrayCursor::begin(empty.view(), false, None, None).unwrap();
        assert!(!cursor.next());
        assert!(cursor.current().is_err());
    }
}
