// In: src/traversal/block_cursor.rs

//! Iteration over a table whose columns live in type-homogeneous blocks.
//!
//! One [`ArrayCursor`] per table column is built up front, each addressing its
//! column inside its block's transposed `(rows, block_columns)` view. The cursor
//! then walks either columns-first (transposed, one column exhausted before the
//! next) or row-first (every column advanced by one row per outer step).

use std::rc::Rc;

use crate::error::FrameJsonError;
use crate::kernels::labels::LabelSet;
use crate::traversal::ArrayCursor;
use crate::types::DataFrame;

#[derive(Debug)]
pub struct BlockCursor<'a> {
    /// Per-column cursors in table order, each in item mode over rows.
    columns: Vec<ArrayCursor<'a>>,
    transpose: bool,
    /// Columns-first: the column currently being exhausted.
    column: Option<usize>,
    /// Keys of the outer frame (row labels row-first, column labels transposed).
    row_labels: Option<Rc<LabelSet>>,
    /// Keys of the inner frames.
    column_labels: Option<Rc<LabelSet>>,
}

impl<'a> BlockCursor<'a> {
    /// Builds the per-column cursors for `n_columns` table columns.
    ///
    /// Every table position must be covered by exactly one block column; any
    /// gap or out-of-range location aborts and drops the cursors built so far.
    pub fn begin(
        frame: &'a DataFrame,
        n_columns: usize,
        transpose: bool,
        row_labels: Option<Rc<LabelSet>>,
        column_labels: Option<Rc<LabelSet>>,
    ) -> Result<Self, FrameJsonError> {
        let mut slots: Vec<Option<ArrayCursor<'a>>> = vec![None; n_columns];

        for (block_number, block) in frame.blocks.iter().enumerate() {
            let view = block.values.view().reversed_axes();
            if view.ndim() != 2 {
                return Err(FrameJsonError::UnsupportedValue(format!(
                    "block {} is {}-dimensional, expected 2",
                    block_number,
                    view.ndim()
                )));
            }
            let block_cursor = ArrayCursor::begin(view, true, None, None)?;

            for (local, &loc) in block.locs.iter().enumerate() {
                let slot = slots.get_mut(loc).ok_or_else(|| {
                    FrameJsonError::InternalError(format!(
                        "block {} maps a column to position {} of {}",
                        block_number, loc, n_columns
                    ))
                })?;
                let mut column = block_cursor.child_at(local)?;
                column.column_labels = column_labels.clone();
                *slot = Some(column);
            }
        }

        let columns = slots
            .into_iter()
            .enumerate()
            .map(|(position, slot)| {
                slot.ok_or_else(|| {
                    FrameJsonError::InternalError(format!(
                        "no block holds table column {}",
                        position
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        log_metric!(
            "event" = "block_cursor",
            "blocks" = frame.blocks.len(),
            "columns" = columns.len(),
            "transpose" = transpose
        );

        Ok(Self {
            columns,
            transpose,
            column: None,
            row_labels,
            column_labels,
        })
    }

    pub fn is_transposed(&self) -> bool {
        self.transpose
    }

    pub fn has_column_labels(&self) -> bool {
        self.column_labels.is_some()
    }

    /// Advances to the next column (transposed) or the next row (row-first).
    pub fn next(&mut self) -> Result<bool, FrameJsonError> {
        if self.transpose {
            let next = self.column.map_or(0, |c| c + 1);
            if next >= self.columns.len() {
                return Ok(false);
            }
            self.column = Some(next);
            return Ok(true);
        }

        let mut advanced: Option<bool> = None;
        for (position, column) in self.columns.iter_mut().enumerate() {
            let stepped = column.next();
            match advanced {
                None => advanced = Some(stepped),
                Some(expected) if expected != stepped => {
                    return Err(FrameJsonError::InternalError(format!(
                        "table column {} has a different row count than column 0",
                        position
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(advanced.unwrap_or(false))
    }

    /// Outer key: the row label (row-first) or the column label (transposed).
    pub fn name(&self) -> Result<&str, FrameJsonError> {
        let step = if self.transpose {
            self.column
        } else {
            self.columns.first().and_then(ArrayCursor::position)
        };
        let position = step.ok_or_else(|| {
            FrameJsonError::InternalError("block cursor named before first step".to_string())
        })?;
        match &self.row_labels {
            Some(labels) => labels.get(position),
            None => Err(FrameJsonError::InternalError(
                "block cursor has no outer labels".to_string(),
            )),
        }
    }

    /// Transposed: the cursor over the current column's rows.
    pub fn column_cursor(&self) -> Result<ArrayCursor<'a>, FrameJsonError> {
        self.column
            .and_then(|c| self.columns.get(c))
            .cloned()
            .ok_or_else(|| {
                FrameJsonError::InternalError("block cursor has no current column".to_string())
            })
    }

    pub(crate) fn columns(&self) -> &[ArrayCursor<'a>] {
        &self.columns
    }

    pub(crate) fn column_labels(&self) -> Option<&LabelSet> {
        self.column_labels.as_deref()
    }
}

/// Row-first child frame: the current row, one element per table column.
#[derive(Debug)]
pub struct BlockRowCursor<'a> {
    block: &'a BlockCursor<'a>,
    column: Option<usize>,
}

impl<'a> BlockRowCursor<'a> {
    pub fn new(block: &'a BlockCursor<'a>) -> Self {
        Self {
            block,
            column: None,
        }
    }

    pub fn next(&mut self) -> bool {
        let next = self.column.map_or(0, |c| c + 1);
        if next >= self.block.columns().len() {
            return false;
        }
        self.column = Some(next);
        true
    }

    fn current_column(&self) -> Result<&'a ArrayCursor<'a>, FrameJsonError> {
        self.column
            .and_then(|c| self.block.columns().get(c))
            .ok_or_else(|| {
                FrameJsonError::InternalError("block row read before first step".to_string())
            })
    }

    pub fn current(&self) -> Result<crate::types::Item<'a>, FrameJsonError> {
        self.current_column()?.current()
    }

    /// Inner key: the label of the current column.
    pub fn name(&self) -> Result<&'a str, FrameJsonError> {
        let position = self.column.ok_or_else(|| {
            FrameJsonError::InternalError("block row named before first step".to_string())
        })?;
        match self.block.column_labels() {
            Some(labels) => labels.get(position),
            None => Err(FrameJsonError::InternalError(
                "block row has no column labels".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Block, Index, Item, NdArray};

    /// Two blocks: ints at table positions 0 and 2, floats at position 1.
    fn mixed_frame() -> DataFrame {
        let ints = NdArray::from(vec![1i64, 2, 5, 6]).into_shape(&[2, 2]).unwrap();
        let floats = NdArray::from(vec![0.5f64, 1.5]).into_shape(&[1, 2]).unwrap();
        DataFrame::from_blocks(
            Index::from_labels(vec!["a", "b", "c"]),
            Index::from_labels(vec!["x", "y"]),
            vec![
                Block::new(ints, vec![0, 2]).unwrap(),
                Block::new(floats, vec![1]).unwrap(),
            ],
        )
    }

    fn as_f64(item: Item<'_>) -> f64 {
        match item {
            Item::Int(v) => v as f64,
            Item::Float(v) => v,
            other => panic!("Unexpected item {:?}", other),
        }
    }

    #[test]
    fn test_row_first_remaps_locs() {
        let frame = mixed_frame();
        let mut cursor = BlockCursor::begin(&frame, 3, false, None, None).unwrap();
        let mut rows = Vec::new();
        while cursor.next().unwrap() {
            let mut row = BlockRowCursor::new(&cursor);
            let mut values = Vec::new();
            while row.next() {
                values.push(as_f64(row.current().unwrap()));
            }
            rows.push(values);
        }
        assert_eq!(rows, vec![vec![1.0, 0.5, 5.0], vec![2.0, 1.5, 6.0]]);
    }

    #[test]
    fn test_columns_first() {
        let frame = mixed_frame();
        let mut cursor = BlockCursor::begin(&frame, 3, true, None, None).unwrap();
        let mut columns = Vec::new();
        while cursor.next().unwrap() {
            let mut column = cursor.column_cursor().unwrap();
            let mut values = Vec::new();
            while column.next() {
                values.push(as_f64(column.current().unwrap()));
            }
            columns.push(values);
        }
        assert_eq!(columns, vec![vec![1.0, 2.0], vec![0.5, 1.5], vec![5.0, 6.0]]);
    }

    #[test]
    fn test_zero_columns_is_exhausted() {
        let frame = DataFrame::from_blocks(
            Index::from_labels(Vec::<String>::new()),
            Index::range(3),
            Vec::new(),
        );
        let mut cursor = BlockCursor::begin(&frame, 0, false, None, None).unwrap();
        assert!(!cursor.next().unwrap());
        let mut transposed = BlockCursor::begin(&frame, 0, true, None, None).unwrap();
        assert!(!transposed.next().unwrap());
    }

    #[test]
    fn test_uncovered_column_is_error() {
        let frame = mixed_frame();
        let result = BlockCursor::begin(&frame, 4, false, None, None);
        assert!(matches!(result, Err(FrameJsonError::InternalError(_))));
    }

    #[test]
    fn test_out_of_range_loc_is_error() {
        let frame = mixed_frame();
        let result = BlockCursor::begin(&frame, 2, false, None, None);
        assert!(matches!(result, Err(FrameJsonError::InternalError(_))));
    }
}
