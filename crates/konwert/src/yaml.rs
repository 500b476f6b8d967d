//! YAML parsing and serialization
//!
//! Only plain scalars, sequences and mappings are accepted. Custom tags are
//! rejected; anchors and aliases are expanded by `serde_yaml` under its own
//! repetition limit.

use crate::config::Limits;
use crate::error::{Error, Pos, Result};
use crate::format::Format;
use crate::value::Value;

/// Configuration for YAML input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub limits: Limits,
}

/// Parse a single YAML document. An empty document is `Value::Null`.
pub fn parse(input: &[u8], config: &Config) -> Result<Value> {
    config.limits.check_size(input.len())?;
    if is_empty_document(input) {
        return Ok(Value::Null);
    }

    let value: Value = serde_yaml::from_slice(input).map_err(|err| {
        let pos = err.location().map(|loc| {
            Pos::new(loc.index(), to_u32(loc.line()), to_u32(loc.column()))
        });
        let error = Error::parse(Format::Yaml, &err);
        match pos {
            Some(pos) => error.at(pos),
            None => error,
        }
    })?;
    config.limits.check_depth(value.depth())?;
    Ok(value)
}

/// Serialize a value as block-style YAML
pub fn to_string(value: &Value) -> Result<String> {
    serde_yaml::to_string(value).map_err(Error::write)
}

/// Only blank lines and comments
fn is_empty_document(input: &[u8]) -> bool {
    input.split(|byte| *byte == b'\n').all(|line| {
        let line = line.trim_ascii_start();
        line.is_empty() || line.first() == Some(&b'#')
    })
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
