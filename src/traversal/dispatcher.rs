// In: src/traversal/dispatcher.rs

//! Chooses how a node is encoded.
//!
//! Scalars are resolved by the classifier. Composite nodes get a frame kind
//! (object or array) and a cursor chosen from the node type and the active
//! orientation:
//!
//! | orientation | table frame | labels               | traversal          |
//! |-------------|-------------|----------------------|--------------------|
//! | values      | array       | none                 | row-first          |
//! | records     | array       | columns per row      | row-first          |
//! | index       | object      | rows, then columns   | row-first          |
//! | columns     | object      | columns, then rows   | columns-first      |
//! | split       | object      | `columns`/`index`    | fields, then values|

use std::borrow::Cow;
use std::rc::Rc;

use crate::config::{Orientation, TemporalConfig};
use crate::error::FrameJsonError;
use crate::kernels::labels::encode_labels;
use crate::kernels::scalar::{self, Kind};
use crate::sink::JsonScalar;
use crate::traversal::block_cursor::BlockRowCursor;
use crate::traversal::containers::{
    AttributeCursor, FieldCursor, FieldSource, MappingCursor, SequenceCursor,
};
use crate::traversal::cursor::{Cursor, FrameKind, Node};
use crate::traversal::{ArrayCursor, BlockCursor};
use crate::types::{DataFrame, Index, Item, NdArray, Series, Value};

/// What the driver does with a node.
#[derive(Debug)]
pub enum Dispatch<'n> {
    Scalar(JsonScalar<'n>),
    /// Hand the value to the default handler and encode its replacement.
    Delegate(&'n Value),
    Composite(FrameKind, Cursor<'n>),
}

/// Per-node inputs the dispatcher needs from the driver.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext {
    pub orient: Orientation,
    pub temporal: TemporalConfig,
    pub has_default_handler: bool,
}

pub fn dispatch<'n>(node: Node<'n>, ctx: DispatchContext) -> Result<Dispatch<'n>, FrameJsonError> {
    match node {
        Node::Value(value) => dispatch_value(value, ctx),
        // Object elements are classified from their value.
        Node::Item(Item::Object(value)) => dispatch_value(value, ctx),
        Node::Item(item) => {
            match scalar::classify_item(item, ctx.temporal, ctx.has_default_handler)? {
                Kind::Scalar(s) => Ok(Dispatch::Scalar(s)),
                other => Err(FrameJsonError::InternalError(format!(
                    "primitive array element classified as {:?}",
                    other
                ))),
            }
        }
        Node::Array(array) => array_frame(array),
        Node::Index(index) => index_frame(index, ctx.orient),
        Node::Frame(frame) => table_frame(frame, ctx),
        Node::Dim(child) => {
            let kind = if child.has_column_labels() {
                FrameKind::Object
            } else {
                FrameKind::Array
            };
            Ok(Dispatch::Composite(kind, Cursor::Array(child)))
        }
        Node::BlockRow(block) => {
            let kind = if block.has_column_labels() {
                FrameKind::Object
            } else {
                FrameKind::Array
            };
            Ok(Dispatch::Composite(
                kind,
                Cursor::BlockRow(BlockRowCursor::new(block)),
            ))
        }
    }
}

fn dispatch_value<'n>(value: &'n Value, ctx: DispatchContext) -> Result<Dispatch<'n>, FrameJsonError> {
    match scalar::classify(value, ctx.temporal, ctx.has_default_handler)? {
        Kind::Scalar(s) => Ok(Dispatch::Scalar(s)),
        Kind::Delegate => Ok(Dispatch::Delegate(value)),
        Kind::Mapping(entries) => Ok(Dispatch::Composite(
            FrameKind::Object,
            Cursor::Mapping(MappingCursor::new(Cow::Owned(entries))),
        )),
        Kind::Attributes(attributes) => Ok(Dispatch::Composite(
            FrameKind::Object,
            Cursor::Attributes(AttributeCursor::new(attributes)),
        )),
        Kind::Composite => match value {
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => Ok(
                Dispatch::Composite(FrameKind::Array, Cursor::Sequence(SequenceCursor::new(items))),
            ),
            Value::Dict(entries) => Ok(Dispatch::Composite(
                FrameKind::Object,
                Cursor::Mapping(MappingCursor::new(Cow::Borrowed(entries.as_slice()))),
            )),
            Value::Array(array) => array_frame(array),
            Value::Index(index) => index_frame(index, ctx.orient),
            Value::Series(series) => series_frame(series, ctx),
            Value::Frame(frame) => table_frame(frame, ctx),
            other => Err(FrameJsonError::InternalError(format!(
                "{} classified as composite",
                other.type_name()
            ))),
        },
    }
}

/// A bare array: nested arrays, no labels, in any orientation.
fn array_frame(array: &NdArray) -> Result<Dispatch<'_>, FrameJsonError> {
    let cursor = ArrayCursor::begin(array.view(), false, None, None)?;
    Ok(Dispatch::Composite(FrameKind::Array, Cursor::Array(cursor)))
}

fn index_frame(index: &Index, orient: Orientation) -> Result<Dispatch<'_>, FrameJsonError> {
    if orient == Orientation::Split {
        return Ok(Dispatch::Composite(
            FrameKind::Object,
            Cursor::Fields(FieldCursor::new(FieldSource::Index(index))),
        ));
    }
    array_frame(&index.values)
}

fn series_frame(series: &Series, ctx: DispatchContext) -> Result<Dispatch<'_>, FrameJsonError> {
    match ctx.orient {
        Orientation::Split => Ok(Dispatch::Composite(
            FrameKind::Object,
            Cursor::Fields(FieldCursor::new(FieldSource::Series(series))),
        )),
        Orientation::Index | Orientation::Columns => {
            let labels = encode_labels(&series.index, series.values.len(), "index", ctx.temporal)?;
            let cursor = ArrayCursor::begin(series.values.view(), false, None, Some(Rc::new(labels)))?;
            Ok(Dispatch::Composite(FrameKind::Object, Cursor::Array(cursor)))
        }
        Orientation::Records | Orientation::Values => array_frame(&series.values),
    }
}

fn table_frame(frame: &DataFrame, ctx: DispatchContext) -> Result<Dispatch<'_>, FrameJsonError> {
    if ctx.orient == Orientation::Split {
        return Ok(Dispatch::Composite(
            FrameKind::Object,
            Cursor::Fields(FieldCursor::new(FieldSource::Frame(frame))),
        ));
    }

    let (n_rows, n_columns) = frame.data_shape();
    let row_labels = || encode_labels(&frame.index, n_rows, "index", ctx.temporal).map(Rc::new);
    let column_labels =
        || encode_labels(&frame.columns, n_columns, "columns", ctx.temporal).map(Rc::new);

    // (outer labels, inner labels, transpose, frame kind)
    let (outer, inner, transpose, kind) = match ctx.orient {
        Orientation::Values => (None, None, false, FrameKind::Array),
        Orientation::Records => (None, Some(column_labels()?), false, FrameKind::Array),
        Orientation::Index => (
            Some(row_labels()?),
            Some(column_labels()?),
            false,
            FrameKind::Object,
        ),
        Orientation::Columns => (
            Some(column_labels()?),
            Some(row_labels()?),
            true,
            FrameKind::Object,
        ),
        Orientation::Split => {
            return Err(FrameJsonError::InternalError(
                "split orientation reached table traversal".to_string(),
            ))
        }
    };

    let cursor = match frame.simple_view() {
        Some(view) => {
            log::trace!("single-block table, using one array cursor");
            Cursor::Array(ArrayCursor::begin(view, transpose, outer, inner)?)
        }
        None => Cursor::Block(BlockCursor::begin(frame, n_columns, transpose, outer, inner)?),
    };
    Ok(Dispatch::Composite(kind, cursor))
}
