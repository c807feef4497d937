// In: src/kernels/labels.rs

//! The label encoder.
//!
//! Renders the row or column labels of one axis to text once per node, before
//! any data is traversed, so object keys can be emitted by position.

use chrono::NaiveTime;

use crate::config::TemporalConfig;
use crate::error::FrameJsonError;
use crate::kernels::temporal::{self, NAT};
use crate::kernels::text;
use crate::types::{Index, Item, Value};

/// Text the missing temporal value takes when used as a key.
const NULL_LABEL: &str = "null";

/// Pre-rendered labels for one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, position: usize) -> Result<&str, FrameJsonError> {
        self.labels
            .get(position)
            .map(String::as_str)
            .ok_or_else(|| {
                FrameJsonError::InternalError(format!(
                    "label position {} out of range for {} labels",
                    position,
                    self.labels.len()
                ))
            })
    }
}

/// Renders the labels of `index` for an axis of length `extent`.
///
/// The label count must equal `extent` exactly.
pub fn encode_labels(
    index: &Index,
    extent: usize,
    axis: &'static str,
    config: TemporalConfig,
) -> Result<LabelSet, FrameJsonError> {
    let count = index.len();
    if index.values.ndim() != 1 || count != extent {
        return Err(FrameJsonError::LabelMismatch {
            axis,
            labels: count,
            extent,
        });
    }

    let view = index.values.view();
    let mut labels = Vec::with_capacity(count);
    for position in 0..count {
        let item = view.get(&[position]).ok_or_else(|| {
            FrameJsonError::InternalError(format!("label {} unreadable", position))
        })?;
        labels.push(label_for_item(item, config)?);
    }
    log::trace!("encoded {} {} labels", labels.len(), axis);
    Ok(LabelSet { labels })
}

fn label_for_item(item: Item<'_>, config: TemporalConfig) -> Result<String, FrameJsonError> {
    Ok(match item {
        Item::Datetime64(ns) => datetime_label(ns, config)?,
        Item::Timedelta64(ns) => duration_label(ns, config),
        Item::Bool(b) => text::display_text(&Value::Bool(b)),
        Item::Int(i) => i.to_string(),
        Item::UInt(u) => u.to_string(),
        Item::Float(f) => text::float_text(f),
        Item::Object(value) => label_for_value(value, config)?,
    })
}

fn label_for_value(value: &Value, config: TemporalConfig) -> Result<String, FrameJsonError> {
    Ok(match value {
        Value::NaT => NULL_LABEL.to_string(),
        Value::Datetime64(ns) => datetime_label(*ns, config)?,
        Value::Timedelta64(ns) => duration_label(*ns, config),
        Value::Timedelta(d) => duration_label(temporal::duration_to_ns(d)?, config),
        Value::DateTime(dt) => structured_label(dt, config)?,
        Value::ZonedDateTime(dt) => structured_label(&dt.naive_utc(), config)?,
        Value::Date(d) => structured_label(&d.and_time(NaiveTime::MIN), config)?,
        other => text::display_text(other),
    })
}

fn datetime_label(value_ns: i64, config: TemporalConfig) -> Result<String, FrameJsonError> {
    if value_ns == NAT {
        Ok(NULL_LABEL.to_string())
    } else if config.iso {
        temporal::to_iso(value_ns, config.unit)
    } else {
        Ok(temporal::scale_to_unit(value_ns, config.unit).to_string())
    }
}

fn duration_label(value_ns: i64, config: TemporalConfig) -> String {
    if value_ns == NAT {
        NULL_LABEL.to_string()
    } else if config.iso {
        temporal::duration_to_iso(value_ns)
    } else {
        temporal::scale_to_unit(value_ns, config.unit).to_string()
    }
}

fn structured_label(
    dt: &chrono::NaiveDateTime,
    config: TemporalConfig,
) -> Result<String, FrameJsonError> {
    if config.iso {
        Ok(temporal::naive_to_iso(dt, config.unit))
    } else {
        Ok(temporal::to_epoch(dt, config.unit)?.to_string())
    }
}
