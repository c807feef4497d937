// In: src/sink/value_sink.rs

//! Builds an in-memory `serde_json::Value` from the event stream.
//!
//! Used by callers that post-process the document, and by the tests to compare
//! output structurally. Object members keep the order they were emitted in;
//! a duplicate key keeps its first position and takes the last value.

use serde_json::{Map, Number, Value as JsonValue};

use crate::error::FrameJsonError;
use crate::sink::{Event, EventSink, JsonScalar};

#[derive(Debug)]
enum Partial {
    Object {
        map: Map<String, JsonValue>,
        key: Option<String>,
    },
    Array(Vec<JsonValue>),
}

#[derive(Debug, Default)]
pub struct ValueSink {
    stack: Vec<Partial>,
    root: Option<JsonValue>,
}

impl ValueSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Result<JsonValue, FrameJsonError> {
        if !self.stack.is_empty() {
            return Err(FrameJsonError::InternalError(format!(
                "incomplete JSON document ({} containers still open)",
                self.stack.len()
            )));
        }
        self.root
            .ok_or_else(|| FrameJsonError::InternalError("no value was produced".to_string()))
    }

    fn place(&mut self, value: JsonValue) -> Result<(), FrameJsonError> {
        match self.stack.last_mut() {
            Some(Partial::Array(items)) => {
                items.push(value);
                Ok(())
            }
            Some(Partial::Object { map, key }) => {
                let key = key.take().ok_or_else(|| {
                    FrameJsonError::InternalError("object member written without a key".to_string())
                })?;
                map.insert(key, value);
                Ok(())
            }
            None if self.root.is_none() => {
                self.root = Some(value);
                Ok(())
            }
            None => Err(FrameJsonError::InternalError(
                "more than one root value".to_string(),
            )),
        }
    }
}

fn scalar_to_json(scalar: JsonScalar<'_>) -> JsonValue {
    match scalar {
        JsonScalar::Null => JsonValue::Null,
        JsonScalar::Bool(b) => JsonValue::Bool(b),
        JsonScalar::Int(i) => JsonValue::Number(i.into()),
        JsonScalar::Float(f) => Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
        JsonScalar::Str(s) => JsonValue::String(s.into_owned()),
    }
}

impl EventSink for ValueSink {
    fn accept(&mut self, event: Event<'_>) -> Result<(), FrameJsonError> {
        match event {
            Event::EnterObject => {
                self.stack.push(Partial::Object {
                    map: Map::new(),
                    key: None,
                });
                Ok(())
            }
            Event::EnterArray => {
                self.stack.push(Partial::Array(Vec::new()));
                Ok(())
            }
            Event::Key(name) => match self.stack.last_mut() {
                Some(Partial::Object { key, .. }) if key.is_none() => {
                    *key = Some(name.to_string());
                    Ok(())
                }
                _ => Err(FrameJsonError::InternalError(
                    "key written outside an object".to_string(),
                )),
            },
            Event::Scalar(scalar) => self.place(scalar_to_json(scalar)),
            Event::Leave => {
                let finished = match self.stack.pop() {
                    Some(Partial::Object { key: Some(_), .. }) => {
                        return Err(FrameJsonError::InternalError(
                            "container closed after a dangling key".to_string(),
                        ))
                    }
                    Some(Partial::Object { map, .. }) => JsonValue::Object(map),
                    Some(Partial::Array(items)) => JsonValue::Array(items),
                    None => {
                        return Err(FrameJsonError::InternalError(
                            "leave without an open container".to_string(),
                        ))
                    }
                };
                self.place(finished)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::borrow::Cow;

    #[test]
    fn test_builds_nested_value() {
        let mut sink = ValueSink::new();
        let events = vec![
            Event::EnterObject,
            Event::Key("a"),
            Event::EnterArray,
            Event::Scalar(JsonScalar::Int(1)),
            Event::Scalar(JsonScalar::Float(f64::NAN)),
            Event::Leave,
            Event::Key("b"),
            Event::Scalar(JsonScalar::Str(Cow::Borrowed("x"))),
            Event::Leave,
        ];
        for event in events {
            sink.accept(event).unwrap();
        }
        assert_eq!(sink.finish().unwrap(), json!({"a": [1, null], "b": "x"}));
    }

    #[test]
    fn test_object_keeps_emission_order() {
        // 1. Arrange: keys arrive in non-alphabetical order.
        let mut sink = ValueSink::new();
        let events = vec![
            Event::EnterObject,
            Event::Key("b"),
            Event::Scalar(JsonScalar::Int(1)),
            Event::Key("a"),
            Event::Scalar(JsonScalar::Int(2)),
            Event::Key("10"),
            Event::Scalar(JsonScalar::Int(3)),
            Event::Key("9"),
            Event::Scalar(JsonScalar::Int(4)),
            Event::Leave,
        ];

        // 2. Act
        for event in events {
            sink.accept(event).unwrap();
        }
        let value = sink.finish().unwrap();

        // 3. Assert
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["b", "a", "10", "9"]);
    }

    #[test]
    fn test_rejects_second_root() {
        let mut sink = ValueSink::new();
        sink.accept(Event::Scalar(JsonScalar::Null)).unwrap();
        let result = sink.accept(Event::Scalar(JsonScalar::Null));
        if let Err(FrameJsonError::InternalError(_)) = result {
            // Expected
        } else {
            panic!("Expected InternalError, got {:?}", result);
        }
    }

    #[test]
    fn test_empty_sink_has_no_value() {
        assert!(ValueSink::new().finish().is_err());
    }
}
