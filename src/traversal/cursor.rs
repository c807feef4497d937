// In: src/traversal/cursor.rs

//! The uniform iteration protocol the driver pulls events through.
//!
//! Every composite node is walked by exactly one [`Cursor`] variant. The driver
//! only ever calls `begin`, `next`, `name` (object frames), `value` and `end`;
//! which variant is active is decided by the dispatcher.

use std::borrow::Cow;

use crate::config::Orientation;
use crate::error::FrameJsonError;
use crate::traversal::block_cursor::BlockRowCursor;
use crate::traversal::containers::{AttributeCursor, FieldCursor, MappingCursor, SequenceCursor};
use crate::traversal::{ArrayCursor, BlockCursor};
use crate::types::{DataFrame, Index, Item, NdArray, Value};

/// A child handed from a cursor to the driver, awaiting classification.
#[derive(Debug)]
pub enum Node<'n> {
    Value(&'n Value),
    Item(Item<'n>),
    Array(&'n NdArray),
    Index(&'n Index),
    Frame(&'n DataFrame),
    /// A child cursor one dimension deeper.
    Dim(ArrayCursor<'n>),
    /// The current row of a row-first block traversal.
    BlockRow(&'n BlockCursor<'n>),
}

/// The JSON container a composite node opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Object,
    Array,
}

#[derive(Debug)]
pub enum Cursor<'n> {
    Empty,
    Sequence(SequenceCursor<'n>),
    Mapping(MappingCursor<'n>),
    Attributes(AttributeCursor),
    Fields(FieldCursor<'n>),
    Array(ArrayCursor<'n>),
    Block(BlockCursor<'n>),
    BlockRow(BlockRowCursor<'n>),
}

impl<'n> Cursor<'n> {
    pub fn begin(&mut self, orient: &mut Orientation) {
        if let Cursor::Fields(fields) = self {
            fields.begin(orient);
        }
    }

    pub fn next(&mut self) -> Result<bool, FrameJsonError> {
        Ok(match self {
            Cursor::Empty => false,
            Cursor::Sequence(c) => c.next(),
            Cursor::Mapping(c) => c.next(),
            Cursor::Attributes(c) => c.next(),
            Cursor::Fields(c) => c.next(),
            Cursor::Array(c) => c.next(),
            Cursor::Block(c) => return c.next(),
            Cursor::BlockRow(c) => c.next(),
        })
    }

    pub fn name(&self) -> Result<Cow<'_, str>, FrameJsonError> {
        Ok(match self {
            Cursor::Mapping(c) => return c.name(),
            Cursor::Attributes(c) => Cow::Borrowed(c.name()?),
            Cursor::Fields(c) => Cow::Borrowed(c.name()?),
            Cursor::Array(c) => Cow::Borrowed(c.name()?),
            Cursor::Block(c) => Cow::Borrowed(c.name()?),
            Cursor::BlockRow(c) => Cow::Borrowed(c.name()?),
            Cursor::Empty | Cursor::Sequence(_) => {
                return Err(FrameJsonError::InternalError(
                    "array frames have no member names".to_string(),
                ))
            }
        })
    }

    pub fn value(&mut self) -> Result<Node<'_>, FrameJsonError> {
        match self {
            Cursor::Empty => Err(FrameJsonError::InternalError(
                "empty cursor has no values".to_string(),
            )),
            Cursor::Sequence(c) => c.value(),
            Cursor::Mapping(c) => c.value(),
            Cursor::Attributes(c) => c.value(),
            Cursor::Fields(c) => c.value(),
            Cursor::Array(c) if c.is_item_mode() => Ok(Node::Item(c.current()?)),
            Cursor::Array(c) => Ok(Node::Dim(c.descend()?)),
            Cursor::Block(c) if c.is_transposed() => Ok(Node::Dim(c.column_cursor()?)),
            Cursor::Block(c) => Ok(Node::BlockRow(c)),
            Cursor::BlockRow(c) => Ok(Node::Item(c.current()?)),
        }
    }

    pub fn end(&mut self, orient: &mut Orientation) {
        if let Cursor::Fields(fields) = self {
            fields.end(orient);
        }
    }
}
