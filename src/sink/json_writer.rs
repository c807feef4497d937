// In: src/sink/json_writer.rs

//! Renders the event stream as JSON text.
//!
//! Formatting rules: forward slashes are escaped as `\/`; control characters use
//! the short escapes where JSON has them and lowercase `\u00xx` otherwise;
//! doubles are written with at most `double_precision` decimals and trailing
//! zeros trimmed (whole numbers keep `.0`), switching to `%.15e` style above
//! `1e16`; indentation puts every member on its own line with no space after
//! the colon.

use std::fmt::Write as _;

use crate::config::{EncoderConfig, DEFAULT_BUFFER_CAPACITY};
use crate::error::FrameJsonError;
use crate::sink::{Event, EventSink, JsonScalar};

/// Above this magnitude doubles are written in exponent form.
const EXPONENT_THRESHOLD: f64 = 1e16 - 1.0;

#[derive(Debug)]
struct Level {
    object: bool,
    members: usize,
}

#[derive(Debug)]
pub struct JsonWriter {
    out: String,
    ensure_ascii: bool,
    encode_html_chars: bool,
    double_precision: usize,
    indent: usize,
    stack: Vec<Level>,
    after_key: bool,
}

impl JsonWriter {
    pub fn new(config: &EncoderConfig) -> Self {
        Self {
            out: String::with_capacity(DEFAULT_BUFFER_CAPACITY),
            ensure_ascii: config.ensure_ascii,
            encode_html_chars: config.encode_html_chars,
            double_precision: config.double_precision,
            indent: config.indent,
            stack: Vec::new(),
            after_key: false,
        }
    }

    /// Returns the rendered text once exactly one complete root value was written.
    /// The working buffer is shrunk to the text's length.
    pub fn finish(mut self) -> Result<String, FrameJsonError> {
        if !self.stack.is_empty() || self.after_key || self.out.is_empty() {
            return Err(FrameJsonError::InternalError(format!(
                "incomplete JSON document ({} containers still open)",
                self.stack.len()
            )));
        }
        self.out.shrink_to_fit();
        Ok(self.out)
    }

    fn newline(&mut self, depth: usize) {
        if self.indent > 0 {
            self.out.push('\n');
            for _ in 0..self.indent * depth {
                self.out.push(' ');
            }
        }
    }

    /// Writes the separator and indentation that precede a value.
    fn begin_value(&mut self) -> Result<(), FrameJsonError> {
        if self.after_key {
            self.after_key = false;
            return Ok(());
        }
        let depth = self.stack.len();
        let first = match self.stack.last_mut() {
            Some(level) if level.object => {
                return Err(FrameJsonError::InternalError(
                    "object member written without a key".to_string(),
                ))
            }
            Some(level) => {
                level.members += 1;
                level.members == 1
            }
            None if self.out.is_empty() => return Ok(()),
            None => {
                return Err(FrameJsonError::InternalError(
                    "more than one root value".to_string(),
                ))
            }
        };
        if !first {
            self.out.push(',');
        }
        self.newline(depth);
        Ok(())
    }

    fn write_key(&mut self, key: &str) -> Result<(), FrameJsonError> {
        let depth = self.stack.len();
        let first = match self.stack.last_mut() {
            Some(level) if level.object && !self.after_key => {
                level.members += 1;
                level.members == 1
            }
            _ => {
                return Err(FrameJsonError::InternalError(
                    "key written outside an object".to_string(),
                ))
            }
        };
        if !first {
            self.out.push(',');
        }
        self.newline(depth);
        self.write_string(key);
        self.out.push(':');
        self.after_key = true;
        Ok(())
    }

    fn leave(&mut self) -> Result<(), FrameJsonError> {
        if self.after_key {
            return Err(FrameJsonError::InternalError(
                "container closed after a dangling key".to_string(),
            ));
        }
        let level = self.stack.pop().ok_or_else(|| {
            FrameJsonError::InternalError("leave without an open container".to_string())
        })?;
        if level.members > 0 {
            let depth = self.stack.len();
            self.newline(depth);
        }
        self.out.push(if level.object { '}' } else { ']' });
        Ok(())
    }

    fn write_string(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '/' => self.out.push_str("\\/"),
                '\u{08}' => self.out.push_str("\\b"),
                '\u{0c}' => self.out.push_str("\\f"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                '<' | '>' | '&' if self.encode_html_chars => self.push_unicode_escape(c as u16),
                c if (c as u32) < 0x20 => self.push_unicode_escape(c as u16),
                c if self.ensure_ascii && !c.is_ascii() => {
                    let mut units = [0u16; 2];
                    for unit in c.encode_utf16(&mut units) {
                        self.push_unicode_escape(*unit);
                    }
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    fn push_unicode_escape(&mut self, unit: u16) {
        // Writing into a String cannot fail.
        let _ = write!(self.out, "\\u{:04x}", unit);
    }

    fn write_scalar(&mut self, scalar: &JsonScalar<'_>) {
        match scalar {
            JsonScalar::Null => self.out.push_str("null"),
            JsonScalar::Bool(true) => self.out.push_str("true"),
            JsonScalar::Bool(false) => self.out.push_str("false"),
            JsonScalar::Int(i) => {
                let _ = write!(self.out, "{}", i);
            }
            JsonScalar::Float(f) => {
                let text = format_double(*f, self.double_precision);
                self.out.push_str(&text);
            }
            JsonScalar::Str(s) => self.write_string(s),
        }
    }
}

/// Formats a finite double the way the text encoder writes it.
pub fn format_double(value: f64, precision: usize) -> String {
    if value.abs() > EXPONENT_THRESHOLD {
        let text = format!("{:.15e}", value);
        return match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => text,
        };
    }

    let mut text = format!("{:.*}", precision, value);
    if precision > 0 {
        let trimmed = text.trim_end_matches('0').len();
        text.truncate(trimmed);
        if text.ends_with('.') {
            text.push('0');
        }
    }
    if text == "-0" || text == "-0.0" {
        text.remove(0);
    }
    text
}

impl EventSink for JsonWriter {
    fn accept(&mut self, event: Event<'_>) -> Result<(), FrameJsonError> {
        match event {
            Event::EnterObject | Event::EnterArray => {
                self.begin_value()?;
                let object = matches!(event, Event::EnterObject);
                self.out.push(if object { '{' } else { '[' });
                self.stack.push(Level { object, members: 0 });
                Ok(())
            }
            Event::Key(key) => self.write_key(key),
            Event::Scalar(scalar) => {
                self.begin_value()?;
                self.write_scalar(&scalar);
                Ok(())
            }
            Event::Leave => self.leave(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    fn render(events: Vec<Event<'_>>, config: &EncoderConfig) -> String {
        let mut writer = JsonWriter::new(config);
        for event in events {
            writer.accept(event).unwrap();
        }
        writer.finish().unwrap()
    }

    fn string(s: &str) -> Event<'_> {
        Event::Scalar(JsonScalar::Str(Cow::Borrowed(s)))
    }

    #[test]
    fn test_finish_releases_spare_capacity() {
        // 1. Arrange
        let config = EncoderConfig::default();
        let mut writer = JsonWriter::new(&config);
        writer.accept(Event::Scalar(JsonScalar::Int(42))).unwrap();

        // 2. Act
        let json = writer.finish().unwrap();

        // 3. Assert
        assert_eq!(json, "42");
        assert!(json.capacity() < DEFAULT_BUFFER_CAPACITY);
    }

    #[test]
    fn test_compact_nesting() {
        let events = vec![
            Event::EnterObject,
            Event::Key("a"),
            Event::EnterArray,
            Event::Scalar(JsonScalar::Int(1)),
            Event::Scalar(JsonScalar::Null),
            Event::Leave,
            Event::Key("b"),
            Event::Scalar(JsonScalar::Bool(true)),
            Event::Leave,
        ];
        assert_eq!(
            render(events, &EncoderConfig::default()),
            r#"{"a":[1,null],"b":true}"#
        );
    }

    #[test]
    fn test_indentation() {
        let config = EncoderConfig {
            indent: 2,
            ..EncoderConfig::default()
        };
        let events = vec![
            Event::EnterObject,
            Event::Key("a"),
            Event::EnterArray,
            Event::Scalar(JsonScalar::Int(1)),
            Event::Leave,
            Event::Key("b"),
            Event::EnterObject,
            Event::Leave,
            Event::Leave,
        ];
        assert_eq!(
            render(events, &config),
            "{\n  \"a\":[\n    1\n  ],\n  \"b\":{}\n}"
        );
    }

    #[test]
    fn test_string_escapes() {
        let config = EncoderConfig::default();
        assert_eq!(
            render(vec![string("a/b\"c\\\n\u{1}")], &config),
            r#""a\/b\"c\\\n\u0001""#
        );
        assert_eq!(
            render(vec![string("é😀")], &config),
            r#""\u00e9\ud83d\ude00""#
        );

        let utf8 = EncoderConfig {
            ensure_ascii: false,
            ..EncoderConfig::default()
        };
        assert_eq!(render(vec![string("é")], &utf8), "\"é\"");
    }

    #[test]
    fn test_html_escapes() {
        let config = EncoderConfig {
            encode_html_chars: true,
            ..EncoderConfig::default()
        };
        assert_eq!(
            render(vec![string("<a&b>")], &config),
            r#""\u003ca\u0026b\u003e""#
        );
        assert_eq!(
            render(vec![string("<a>")], &EncoderConfig::default()),
            r#""<a>""#
        );
    }

    #[test]
    fn test_format_double() {
        assert_eq!(format_double(1.0, 10), "1.0");
        assert_eq!(format_double(0.1, 10), "0.1");
        assert_eq!(format_double(1.0 / 3.0, 3), "0.333");
        assert_eq!(format_double(2.5, 0), "2");
        assert_eq!(format_double(-1.25, 10), "-1.25");
        assert_eq!(format_double(1e-12, 10), "0.0");
        assert_eq!(format_double(1e17, 10), "1.000000000000000e+17");
    }

    #[test]
    fn test_incomplete_document_is_error() {
        let mut writer = JsonWriter::new(&EncoderConfig::default());
        writer.accept(Event::EnterArray).unwrap();
        assert!(writer.finish().is_err());

        let mut writer = JsonWriter::new(&EncoderConfig::default());
        assert!(writer.accept(Event::Key("loose")).is_err());
    }
}
