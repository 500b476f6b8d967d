//! JSON parsing and serialization

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::config::Limits;
use crate::error::{Error, Pos, Result};
use crate::format::Format;
use crate::value::Value;

pub const DEFAULT_INDENT: usize = 4;

/// Configuration for JSON input and output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub limits: Limits,
    /// Spaces per indentation level in written documents
    pub indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            indent: DEFAULT_INDENT,
        }
    }
}

/// Parse a JSON document
pub fn parse(input: &[u8], config: &Config) -> Result<Value> {
    config.limits.check_size(input.len())?;
    let value: Value = serde_json::from_slice(input).map_err(|err| {
        let pos = Pos::from_offset(input, offset_of(input, err.line(), err.column()));
        Error::parse(Format::Json, err).at(pos)
    })?;
    config.limits.check_depth(value.depth())?;
    Ok(value)
}

/// Serialize a value as indented JSON with a trailing newline
pub fn to_string(value: &Value, config: &Config) -> Result<String> {
    if value.has_non_finite() {
        return Err(Error::write("NaN and infinite numbers cannot be represented in JSON"));
    }

    let indent = " ".repeat(config.indent);
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer).map_err(Error::write)?;

    let mut json = String::from_utf8(out).map_err(Error::write)?;
    json.push('\n');
    Ok(json)
}

/// Byte offset of a 1-based line and byte column as reported by serde_json
fn offset_of(input: &[u8], line: usize, column: usize) -> usize {
    let line_start: usize = input
        .split_inclusive(|byte| *byte == b'\n')
        .take(line.saturating_sub(1))
        .map(<[u8]>::len)
        .sum();
    line_start
        .saturating_add(column.saturating_sub(1))
        .min(input.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::Object;

    #[test]
    fn test_parse_object() -> Result<()> {
        let value = parse(br#"{"name": "John", "age": 30}"#, &Config::default())?;
        let obj = value.as_object().cloned().unwrap_or_default();
        assert_eq!(obj["name"], Value::from("John"));
        assert_eq!(obj["age"], Value::from(30));
        Ok(())
    }

    #[test]
    fn test_parse_error_has_position() {
        let err = parse(b"{\n  \"a\": }", &Config::default()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Parse { format: Format::Json });
        let pos = err.pos().unwrap_or_default();
        assert_eq!(pos.line, 2);
        assert_eq!(pos.col, 8);
        assert_eq!(pos.offset, 9);
        assert!(err.message().starts_with("invalid JSON document:"));
    }

    #[test]
    fn test_parse_error_offset_on_first_line() {
        let input = br#"{"a": }"#;
        let err = parse(input, &Config::default()).unwrap_err();
        let pos = err.pos().unwrap_or_default();
        assert_eq!(input.get(pos.offset), Some(&b'}'));
    }

    #[test]
    fn test_floats_survive_a_round_trip() -> Result<()> {
        let floats = [1.071_566_039_146_582_6e-75, -1.819_967_304_027_17e-179, 0.1, 1e300];
        for n in floats {
            let text = to_string(&Value::from(n), &Config::default())?;
            assert_eq!(parse(text.as_bytes(), &Config::default())?, Value::from(n), "{text}");
        }
        Ok(())
    }

    #[test]
    fn test_max_size() {
        let config = Config {
            limits: Limits::new(0, 4),
            ..Config::default()
        };
        let err = parse(b"[1, 2, 3]", &config).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MaxSizeExceeded { max: 4 });
    }

    #[test]
    fn test_max_depth() {
        let config = Config {
            limits: Limits::new(2, 0),
            ..Config::default()
        };
        assert!(parse(b"[[1]]", &config).is_ok());
        let err = parse(b"[[[1]]]", &config).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MaxDepthExceeded { max: 2 });
    }

    #[test]
    fn test_to_string_uses_four_spaces() -> Result<()> {
        let mut obj = Object::new();
        obj.insert("a", 1);
        obj.insert("b", vec![Value::from(2), Value::from(3)]);
        let json = to_string(&Value::Object(obj), &Config::default())?;
        assert_eq!(
            json,
            "{\n    \"a\": 1,\n    \"b\": [\n        2,\n        3\n    ]\n}\n"
        );
        Ok(())
    }

    #[test]
    fn test_to_string_custom_indent() -> Result<()> {
        let config = Config {
            indent: 2,
            ..Config::default()
        };
        let json = to_string(&Value::from(vec![Value::Null]), &config)?;
        assert_eq!(json, "[\n  null\n]\n");
        Ok(())
    }

    #[test]
    fn test_non_finite_is_write_error() {
        let err = to_string(&Value::from(f64::NAN), &Config::default()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Write);
    }
}
