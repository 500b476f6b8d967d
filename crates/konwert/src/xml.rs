//! XML element tree, parser and writer

pub mod model;
pub mod parser;
pub mod writer;

pub use model::Element;
pub use parser::Parser;
pub use writer::to_string;

use crate::config::Limits;

/// Configuration for XML input and output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub limits: Limits,
    /// Emit an `<?xml ...?>` declaration before the root element
    pub declaration: bool,
}

/// Parse an XML document into its root element
pub fn parse(input: &[u8], config: &Config) -> crate::Result<Element> {
    Parser::with_limits(input, config.limits).parse()
}

/// Returns true if `name` is a well-formed XML name.
///
/// First char: letter, `_` or `:`; then letters, digits, `-`, `_`, `.`, `:`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == ':' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("root"));
        assert!(is_valid_name("_private"));
        assert!(is_valid_name("ns:tag"));
        assert!(is_valid_name("a-b.c_1"));
        assert!(is_valid_name("zażółć"));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("1abc"));
        assert!(!is_valid_name("-a"));
        assert!(!is_valid_name("has space"));
        assert!(!is_valid_name("a/b"));
        assert!(!is_valid_name("#text"));
    }
}
