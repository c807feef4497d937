// In: src/config.rs

//! The single source of truth for all encoder configuration.
//!
//! `EncoderConfig` is created once at the application boundary (from string
//! options, a JSON document, or plain struct construction), validated, and then
//! passed down through the traversal as a shared, read-only `Arc<EncoderConfig>`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FrameJsonError;

/// Largest number of decimals the double formatter accepts.
pub const MAX_DOUBLE_PRECISION: usize = 15;

/// Initial capacity of the JSON output buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 65_536;

//==================================================================================
// I. Option Enums
//==================================================================================

/// The output shape used for tables and labeled series.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// `{"columns": [...], "index": [...], "data": [[...]]}`
    Split,
    /// `[{column: value}, ...]`
    Records,
    /// `{row: {column: value}}`
    Index,
    /// **Default:** `{column: {row: value}}`
    #[default]
    Columns,
    /// Plain nested arrays, no labels.
    Values,
}

impl FromStr for Orientation {
    type Err = FrameJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "split" => Ok(Self::Split),
            "records" => Ok(Self::Records),
            "index" => Ok(Self::Index),
            "columns" => Ok(Self::Columns),
            "values" => Ok(Self::Values),
            other => Err(FrameJsonError::InvalidConfig(format!(
                "Invalid value '{}' for option 'orient'",
                other
            ))),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Split => "split",
            Self::Records => "records",
            Self::Index => "index",
            Self::Columns => "columns",
            Self::Values => "values",
        };
        f.write_str(name)
    }
}

/// The unit epoch integers are expressed in, and the precision of ISO output.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeUnit {
    #[serde(rename = "s")]
    Second,
    /// **Default**
    #[default]
    #[serde(rename = "ms")]
    Millisecond,
    #[serde(rename = "us")]
    Microsecond,
    #[serde(rename = "ns")]
    Nanosecond,
}

impl TimeUnit {
    /// Number of nanoseconds in one tick of this unit.
    pub fn nanos_per_unit(&self) -> i64 {
        match self {
            Self::Second => 1_000_000_000,
            Self::Millisecond => 1_000_000,
            Self::Microsecond => 1_000,
            Self::Nanosecond => 1,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = FrameJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s" => Ok(Self::Second),
            "ms" => Ok(Self::Millisecond),
            "us" => Ok(Self::Microsecond),
            "ns" => Ok(Self::Nanosecond),
            other => Err(FrameJsonError::InvalidConfig(format!(
                "Invalid value '{}' for option 'date_unit'",
                other
            ))),
        }
    }
}

/// The subset of the configuration the temporal codec needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemporalConfig {
    pub unit: TimeUnit,
    pub iso: bool,
}

//==================================================================================
// II. The Unified EncoderConfig
//==================================================================================

/// The single, unified configuration for one encode call.
/// This struct is created once and shared throughout the traversal via an `Arc`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct EncoderConfig {
    /// Escape every non-ASCII character as `\uXXXX`.
    #[serde(default = "default_true")]
    pub ensure_ascii: bool,

    /// Number of decimals written for floating point values (0..=15).
    #[serde(default = "default_double_precision")]
    pub double_precision: usize,

    /// Escape `<`, `>` and `&` as unicode escapes.
    #[serde(default)]
    pub encode_html_chars: bool,

    /// Output shape for tables and series.
    #[serde(default)]
    pub orient: Orientation,

    /// Unit for epoch integers and precision of ISO strings.
    #[serde(default)]
    pub date_unit: TimeUnit,

    /// Write datetimes as ISO-8601 strings instead of epoch integers.
    #[serde(default)]
    pub iso_dates: bool,

    /// Spaces per nesting level; 0 writes compact output.
    #[serde(default)]
    pub indent: usize,

    /// Nesting ceiling after which encoding aborts.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ensure_ascii: true,
            double_precision: default_double_precision(),
            encode_html_chars: false,
            orient: Orientation::default(),
            date_unit: TimeUnit::default(),
            iso_dates: false,
            indent: 0,
            max_depth: default_max_depth(),
        }
    }
}

impl EncoderConfig {
    /// Builds a configuration from the string-typed options of the public entry
    /// point. `None` keeps the default for that option.
    pub fn from_options(
        orient: Option<&str>,
        date_unit: Option<&str>,
        iso_dates: bool,
        double_precision: Option<usize>,
        ensure_ascii: bool,
    ) -> Result<Self, FrameJsonError> {
        let mut config = Self {
            ensure_ascii,
            iso_dates,
            ..Self::default()
        };
        if let Some(orient) = orient {
            config.orient = orient.parse()?;
        }
        if let Some(unit) = date_unit {
            config.date_unit = unit.parse()?;
        }
        if let Some(precision) = double_precision {
            config.double_precision = precision;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, FrameJsonError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects option combinations the encoder cannot honor.
    pub fn validate(&self) -> Result<(), FrameJsonError> {
        if self.double_precision > MAX_DOUBLE_PRECISION {
            return Err(FrameJsonError::InvalidConfig(format!(
                "Invalid value '{}' for option 'double_precision', max is '{}'",
                self.double_precision, MAX_DOUBLE_PRECISION
            )));
        }
        if self.max_depth == 0 {
            return Err(FrameJsonError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn temporal(&self) -> TemporalConfig {
        TemporalConfig {
            unit: self.date_unit,
            iso: self.iso_dates,
        }
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_double_precision() -> usize {
    10
}

fn default_max_depth() -> usize {
    1024
}
