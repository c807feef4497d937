// In: src/traversal/containers.rs

//! Cursors over generic containers: sequences, mappings, attribute listings and
//! the fixed field sets used by the split orientation.

use std::borrow::Cow;

use crate::config::Orientation;
use crate::error::FrameJsonError;
use crate::kernels::text;
use crate::traversal::cursor::Node;
use crate::types::{DataFrame, Index, Series, Value};

fn before_first_step(what: &str) -> FrameJsonError {
    FrameJsonError::InternalError(format!("{} cursor read before first step", what))
}

//==================================================================================
// 1. Sequences (lists, tuples, sets)
//==================================================================================

#[derive(Debug)]
pub struct SequenceCursor<'n> {
    items: &'n [Value],
    position: usize,
}

impl<'n> SequenceCursor<'n> {
    pub fn new(items: &'n [Value]) -> Self {
        Self { items, position: 0 }
    }

    pub fn next(&mut self) -> bool {
        if self.position >= self.items.len() {
            return false;
        }
        self.position += 1;
        true
    }

    pub fn value(&self) -> Result<Node<'n>, FrameJsonError> {
        self.position
            .checked_sub(1)
            .and_then(|p| self.items.get(p))
            .map(Node::Value)
            .ok_or_else(|| before_first_step("sequence"))
    }
}

//==================================================================================
// 2. Mappings (dicts and mapping conversions)
//==================================================================================

#[derive(Debug)]
pub struct MappingCursor<'n> {
    entries: Cow<'n, [(Value, Value)]>,
    position: usize,
}

impl<'n> MappingCursor<'n> {
    pub fn new(entries: Cow<'n, [(Value, Value)]>) -> Self {
        Self {
            entries,
            position: 0,
        }
    }

    pub fn next(&mut self) -> bool {
        if self.position >= self.entries.len() {
            return false;
        }
        self.position += 1;
        true
    }

    fn entry(&self) -> Result<&(Value, Value), FrameJsonError> {
        self.position
            .checked_sub(1)
            .and_then(|p| self.entries.get(p))
            .ok_or_else(|| before_first_step("mapping"))
    }

    /// String keys are used as-is; any other key goes through text conversion.
    pub fn name(&self) -> Result<Cow<'_, str>, FrameJsonError> {
        Ok(match &self.entry()?.0 {
            Value::Str(s) => Cow::Borrowed(s.as_str()),
            Value::Bytes(b) => String::from_utf8_lossy(b),
            other => Cow::Owned(text::display_text(other)),
        })
    }

    pub fn value(&self) -> Result<Node<'_>, FrameJsonError> {
        Ok(Node::Value(&self.entry()?.1))
    }
}

//==================================================================================
// 3. Attribute listings
//==================================================================================

#[derive(Debug)]
pub struct AttributeCursor {
    entries: Vec<(String, Value)>,
    position: usize,
}

impl AttributeCursor {
    pub fn new(entries: Vec<(String, Value)>) -> Self {
        Self {
            entries,
            position: 0,
        }
    }

    pub fn next(&mut self) -> bool {
        if self.position >= self.entries.len() {
            return false;
        }
        self.position += 1;
        true
    }

    fn entry(&self) -> Result<&(String, Value), FrameJsonError> {
        self.position
            .checked_sub(1)
            .and_then(|p| self.entries.get(p))
            .ok_or_else(|| before_first_step("attribute"))
    }

    pub fn name(&self) -> Result<&str, FrameJsonError> {
        Ok(self.entry()?.0.as_str())
    }

    pub fn value(&self) -> Result<Node<'_>, FrameJsonError> {
        Ok(Node::Value(&self.entry()?.1))
    }
}

//==================================================================================
// 4. Split-orientation fields
//==================================================================================

#[derive(Debug, Clone, Copy)]
pub enum FieldSource<'n> {
    Index(&'n Index),
    Series(&'n Series),
    Frame(&'n DataFrame),
}

const INDEX_FIELDS: &[&str] = &["name", "data"];
const SERIES_FIELDS: &[&str] = &["name", "index", "data"];
const FRAME_FIELDS: &[&str] = &["columns", "index", "data"];

/// The fixed members of a split-oriented container.
///
/// Series and tables force `values` orientation on their members while the
/// cursor is active and restore the previous orientation at the end.
#[derive(Debug)]
pub struct FieldCursor<'n> {
    source: FieldSource<'n>,
    position: usize,
    saved: Option<Orientation>,
}

impl<'n> FieldCursor<'n> {
    pub fn new(source: FieldSource<'n>) -> Self {
        Self {
            source,
            position: 0,
            saved: None,
        }
    }

    fn fields(&self) -> &'static [&'static str] {
        match self.source {
            FieldSource::Index(_) => INDEX_FIELDS,
            FieldSource::Series(_) => SERIES_FIELDS,
            FieldSource::Frame(_) => FRAME_FIELDS,
        }
    }

    pub fn begin(&mut self, orient: &mut Orientation) {
        if matches!(self.source, FieldSource::Series(_) | FieldSource::Frame(_)) {
            self.saved = Some(*orient);
            *orient = Orientation::Values;
        }
    }

    pub fn end(&mut self, orient: &mut Orientation) {
        if let Some(saved) = self.saved.take() {
            *orient = saved;
        }
    }

    pub fn next(&mut self) -> bool {
        if self.position >= self.fields().len() {
            return false;
        }
        self.position += 1;
        true
    }

    pub fn name(&self) -> Result<&'static str, FrameJsonError> {
        self.position
            .checked_sub(1)
            .and_then(|p| self.fields().get(p))
            .copied()
            .ok_or_else(|| before_first_step("field"))
    }

    pub fn value(&self) -> Result<Node<'n>, FrameJsonError> {
        let node = match (self.source, self.name()?) {
            (FieldSource::Index(index), "name") => Node::Value(&index.name),
            (FieldSource::Index(index), _) => Node::Array(&index.values),
            (FieldSource::Series(series), "name") => Node::Value(&series.name),
            (FieldSource::Series(series), "index") => Node::Index(&series.index),
            (FieldSource::Series(series), _) => Node::Array(&series.values),
            (FieldSource::Frame(frame), "columns") => Node::Index(&frame.columns),
            (FieldSource::Frame(frame), "index") => Node::Index(&frame.index),
            (FieldSource::Frame(frame), _) => Node::Frame(frame),
        };
        Ok(node)
    }
}
