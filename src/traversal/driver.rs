// In: src/traversal/driver.rs

//! The event driver.
//!
//! Recursively pulls nodes through the dispatcher and cursors and pushes the
//! resulting events into an [`EventSink`]. Each nesting level owns exactly one
//! dispatch result (and so one cursor); it is dropped when the level completes,
//! on success and on every error path.

use std::sync::Arc;

use crate::config::{EncoderConfig, Orientation};
use crate::error::FrameJsonError;
use crate::sink::{Event, EventSink};
use crate::traversal::cursor::{FrameKind, Node};
use crate::traversal::dispatcher::{dispatch, Dispatch, DispatchContext};
use crate::types::Value;

/// Converts values the encoder cannot handle into ones it can.
/// An `Err` aborts the whole encode.
pub type DefaultHandler = dyn Fn(&Value) -> Result<Value, String>;

pub struct Encoder<'h> {
    config: Arc<EncoderConfig>,
    default_handler: Option<&'h DefaultHandler>,
    /// Active orientation; split framing temporarily forces `values`.
    orient: Orientation,
    depth: usize,
}

impl<'h> Encoder<'h> {
    pub fn new(config: Arc<EncoderConfig>) -> Self {
        let orient = config.orient;
        Self {
            config,
            default_handler: None,
            orient,
            depth: 0,
        }
    }

    pub fn with_default_handler(mut self, handler: &'h DefaultHandler) -> Self {
        self.default_handler = Some(handler);
        self
    }

    /// Emits the full event stream for `value` into `sink`.
    pub fn encode<S: EventSink>(&mut self, value: &Value, sink: &mut S) -> Result<(), FrameJsonError> {
        self.orient = self.config.orient;
        self.depth = 0;
        log::debug!(
            "encoding {} with orient={}, date_unit={:?}, iso_dates={}",
            value.type_name(),
            self.orient,
            self.config.date_unit,
            self.config.iso_dates
        );
        self.encode_node(Node::Value(value), sink)
    }

    fn context(&self) -> DispatchContext {
        DispatchContext {
            orient: self.orient,
            temporal: self.config.temporal(),
            has_default_handler: self.default_handler.is_some(),
        }
    }

    fn encode_node<S: EventSink>(&mut self, node: Node<'_>, sink: &mut S) -> Result<(), FrameJsonError> {
        if self.depth >= self.config.max_depth {
            return Err(FrameJsonError::RecursionLimit(self.config.max_depth));
        }
        self.depth += 1;
        let result = self.visit(node, sink);
        self.depth -= 1;
        result
    }

    fn visit<S: EventSink>(&mut self, node: Node<'_>, sink: &mut S) -> Result<(), FrameJsonError> {
        match dispatch(node, self.context())? {
            Dispatch::Scalar(scalar) => sink.accept(Event::Scalar(scalar)),
            Dispatch::Delegate(value) => {
                let handler = self.default_handler.ok_or_else(|| {
                    FrameJsonError::InternalError("delegated without a default handler".to_string())
                })?;
                let replacement = handler(value).map_err(FrameJsonError::DefaultHandler)?;
                self.encode_node(Node::Value(&replacement), sink)
            }
            Dispatch::Composite(kind, mut cursor) => {
                sink.accept(match kind {
                    FrameKind::Object => Event::EnterObject,
                    FrameKind::Array => Event::EnterArray,
                })?;
                cursor.begin(&mut self.orient);
                while cursor.next()? {
                    if kind == FrameKind::Object {
                        let name = cursor.name()?;
                        sink.accept(Event::Key(&name))?;
                    }
                    let child = cursor.value()?;
                    self.encode_node(child, sink)?;
                }
                cursor.end(&mut self.orient);
                sink.accept(Event::Leave)
            }
        }
    }
}
