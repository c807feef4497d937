// In: src/bridge/stateless_api.rs

use std::sync::Arc;

use arrow::record_batch::RecordBatch;

use crate::bridge::arrow_impl;
use crate::config::EncoderConfig;
use crate::error::FrameJsonError;
use crate::sink::{EventSink, JsonWriter, ValueSink};
use crate::traversal::{DefaultHandler, Encoder};
use crate::types::Value;

/// Serializes `value` to JSON text.
///
/// The configuration is validated before traversal starts. On error no partial
/// output is returned.
pub fn to_json(value: &Value, config: &EncoderConfig) -> Result<String, FrameJsonError> {
    encode_to_string(value, config, None)
}

/// Like [`to_json`], but values the encoder cannot handle natively are passed
/// to `handler` and its replacement is encoded instead.
pub fn to_json_with_handler(
    value: &Value,
    config: &EncoderConfig,
    handler: &DefaultHandler,
) -> Result<String, FrameJsonError> {
    encode_to_string(value, config, Some(handler))
}

/// Encodes `value` into an in-memory `serde_json::Value` instead of text.
pub fn to_json_value(
    value: &Value,
    config: &EncoderConfig,
) -> Result<serde_json::Value, FrameJsonError> {
    let mut sink = ValueSink::new();
    encode_events(value, config, None, &mut sink)?;
    sink.finish()
}

/// Drives the full event stream for `value` into any [`EventSink`].
pub fn encode_events<S: EventSink>(
    value: &Value,
    config: &EncoderConfig,
    handler: Option<&DefaultHandler>,
    sink: &mut S,
) -> Result<(), FrameJsonError> {
    // 1. Reject bad options before any output is produced.
    config.validate()?;

    // 2. One encoder per call; it holds the orientation and depth state.
    let mut encoder = Encoder::new(Arc::new(config.clone()));
    if let Some(handler) = handler {
        encoder = encoder.with_default_handler(handler);
    }
    encoder.encode(value, sink)
}

/// Converts an Arrow `RecordBatch` to a table and serializes it.
pub fn record_batch_to_json(
    batch: &RecordBatch,
    config: &EncoderConfig,
) -> Result<String, FrameJsonError> {
    let frame = arrow_impl::record_batch_to_frame(batch, None)?;
    to_json(&Value::from(frame), config)
}

fn encode_to_string(
    value: &Value,
    config: &EncoderConfig,
    handler: Option<&DefaultHandler>,
) -> Result<String, FrameJsonError> {
    let mut writer = JsonWriter::new(config);
    encode_events(value, config, handler, &mut writer)?;
    let json = writer.finish()?;
    log_metric!(
        "event" = "to_json",
        "root" = value.type_name(),
        "orient" = config.orient,
        "bytes" = json.len()
    );
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Orientation;
    use crate::types::{DataFrame, Index, NdArray};

    #[test]
    fn test_to_json_round_trips_through_serde() {
        // 1. Arrange: a small labeled table.
        let frame = DataFrame::from_columns(
            vec![
                ("a", NdArray::from(vec![1i64, 3])),
                ("b", NdArray::from(vec![0.25f64, 0.75])),
            ],
            Some(Index::from_labels(vec!["x", "y"])),
        )
        .unwrap();
        let value = Value::from(frame);
        let config = EncoderConfig {
            orient: Orientation::Index,
            ..EncoderConfig::default()
        };

        // 2. Act: encode as text and as a value tree.
        let text = to_json(&value, &config).unwrap();
        let tree = to_json_value(&value, &config).unwrap();

        // 3. Assert: both describe the same document.
        let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed, tree);
        assert_eq!(tree["y"]["b"], serde_json::json!(0.75));
    }

    #[test]
    fn test_value_tree_keeps_label_order() {
        // 1. Arrange: labels that would reorder under a sorted map.
        let frame = DataFrame::from_columns(
            vec![
                ("b", NdArray::from(vec![1i64, 2])),
                ("a", NdArray::from(vec![3i64, 4])),
            ],
            Some(Index::from_labels(vec!["10", "9"])),
        )
        .unwrap();
        let config = EncoderConfig {
            orient: Orientation::Columns,
            ..EncoderConfig::default()
        };

        // 2. Act
        let value = Value::from(frame);
        let tree = to_json_value(&value, &config).unwrap();
        let text = to_json(&value, &config).unwrap();

        // 3. Assert: same member order as the text output.
        let columns: Vec<&String> = tree.as_object().unwrap().keys().collect();
        assert_eq!(columns, vec!["b", "a"]);
        let rows: Vec<&String> = tree["b"].as_object().unwrap().keys().collect();
        assert_eq!(rows, vec!["10", "9"]);
        assert_eq!(text, r#"{"b":{"10":1,"9":2},"a":{"10":3,"9":4}}"#);
        assert_eq!(serde_json::to_string(&tree).unwrap(), text);
    }

    #[test]
    fn test_invalid_config_rejected_before_output() {
        let config = EncoderConfig {
            double_precision: 16,
            ..EncoderConfig::default()
        };
        let result = to_json(&Value::Int(1), &config);
        if let Err(FrameJsonError::InvalidConfig(_)) = result {
            // Expected
        } else {
            panic!("Expected InvalidConfig, got {:?}", result);
        }
    }

    #[test]
    fn test_handler_api() {
        let handler = |_: &Value| -> Result<Value, String> { Ok(Value::from("replaced")) };
        #[derive(Debug)]
        struct Unknown;
        impl crate::types::Opaque for Unknown {
            fn type_name(&self) -> &str {
                "Unknown"
            }
        }
        let value = Value::Object(Arc::new(Unknown));
        let json = to_json_with_handler(&value, &EncoderConfig::default(), &handler).unwrap();
        assert_eq!(json, r#""replaced""#);
        assert_eq!(to_json(&value, &EncoderConfig::default()).unwrap(), "{}");
    }

    #[test]
    fn test_indent_option() {
        let value = Value::List(vec![Value::Int(1), Value::Dict(vec![])]);
        let config = EncoderConfig {
            indent: 4,
            ..EncoderConfig::default()
        };
        assert_eq!(to_json(&value, &config).unwrap(), "[\n    1,\n    {}\n]");
    }
}
