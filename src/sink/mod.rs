// In: src/sink/mod.rs

//! The event vocabulary the traversal produces, and its consumers.
//!
//! The driver emits a flat stream of [`Event`]s; an [`EventSink`] turns them into
//! output. `JsonWriter` renders text, `ValueSink` folds the stream into a
//! `serde_json::Value`.

use std::borrow::Cow;

use crate::error::FrameJsonError;

pub mod json_writer;
pub mod value_sink;

pub use json_writer::JsonWriter;
pub use value_sink::ValueSink;

/// A leaf value ready for output.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonScalar<'a> {
    Null,
    Bool(bool),
    Int(i64),
    /// Always finite; non-finite doubles are classified as `Null` upstream.
    Float(f64),
    Str(Cow<'a, str>),
}

/// One step of the serialization stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    EnterObject,
    EnterArray,
    /// The key of the next member; only valid directly inside an object.
    Key(&'a str),
    Scalar(JsonScalar<'a>),
    /// Closes the innermost open object or array.
    Leave,
}

/// A consumer of serialization events.
pub trait EventSink {
    fn accept(&mut self, event: Event<'_>) -> Result<(), FrameJsonError>;
}
