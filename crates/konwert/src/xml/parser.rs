//! XML parser implementation (well-formedness only)

use std::fmt;

use indexmap::IndexMap;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::trace;

use crate::config::Limits;
use crate::error::{Error, Pos, Result};
use crate::format::Format;
use crate::xml::is_valid_name;
use crate::xml::model::Element;

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    input: &'a [u8],
    limits: Limits,
}

/// An element whose end tag has not been seen yet
struct Open {
    element: Element,
    text: String,
}

impl Open {
    fn finish(self) -> Element {
        let Self { mut element, text } = self;
        if !text.trim().is_empty() {
            element.text = Some(text);
        }
        element
    }
}

impl<'a> Parser<'a> {
    /// Create a new XML parser with default limits
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_limits(input, Limits::default())
    }

    pub fn with_limits(input: &'a [u8], limits: Limits) -> Self {
        Self { input, limits }
    }

    /// Parse the document and return its root element
    pub fn parse(&mut self) -> Result<Element> {
        self.limits.check_size(self.input.len())?;

        let mut reader = Reader::from_reader(self.input);
        reader.config_mut().check_end_names = true;

        let mut buf = Vec::new();
        let mut stack: Vec<Open> = Vec::new();
        let mut root: Option<Element> = None;
        let mut entities: IndexMap<String, String> = IndexMap::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Err(err) => return Err(self.error(reader.buffer_position(), err)),
                Ok(Event::Start(start)) => {
                    let offset = reader.buffer_position();
                    let element =
                        self.open(&start, offset, &stack, root.is_some(), &entities)?;
                    stack.push(Open {
                        element,
                        text: String::new(),
                    });
                    self.check_depth(stack.len(), offset)?;
                }
                Ok(Event::Empty(start)) => {
                    let offset = reader.buffer_position();
                    let element =
                        self.open(&start, offset, &stack, root.is_some(), &entities)?;
                    self.check_depth(stack.len() + 1, offset)?;
                    attach(element, &mut stack, &mut root);
                }
                Ok(Event::End(_)) => {
                    let Some(open) = stack.pop() else {
                        return Err(self.error(reader.buffer_position(), "unexpected closing tag"));
                    };
                    attach(open.finish(), &mut stack, &mut root);
                }
                Ok(Event::Text(text)) => {
                    let offset = reader.buffer_position();
                    if contains_cdata_end(&text) {
                        return Err(self.error(offset, "']]>' is not allowed in character data"));
                    }
                    let text = text
                        .unescape_with(|name| resolve(&entities, name))
                        .map_err(|err| self.error(offset, err))?;
                    self.check_chars(&text, offset)?;
                    match stack.last_mut() {
                        Some(open) => open.text.push_str(&text),
                        None if text.trim().is_empty() => {}
                        None => return Err(self.error(offset, "text outside the root element")),
                    }
                }
                Ok(Event::CData(data)) => {
                    let offset = reader.buffer_position();
                    let data = String::from_utf8(data.into_inner().into_owned())
                        .map_err(|err| self.error(offset, err))?;
                    self.check_chars(&data, offset)?;
                    match stack.last_mut() {
                        Some(open) => open.text.push_str(&data),
                        None => return Err(self.error(offset, "CDATA outside the root element")),
                    }
                }
                Ok(Event::DocType(doctype)) => {
                    let offset = reader.buffer_position();
                    let doctype =
                        std::str::from_utf8(&doctype).map_err(|err| self.error(offset, err))?;
                    entities = declared_entities(doctype).map_err(|err| self.error(offset, err))?;
                }
                Ok(Event::Eof) => break,
                // comments, processing instructions and the declaration are not kept
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_)) => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            let message = format!("unclosed element <{}>", open.element.name);
            return Err(self.error(self.input.len(), message));
        }
        root.ok_or_else(|| self.error(self.input.len(), "no root element"))
    }

    fn open(
        &self,
        start: &BytesStart<'_>,
        offset: usize,
        stack: &[Open],
        has_root: bool,
        entities: &IndexMap<String, String>,
    ) -> Result<Element> {
        if stack.is_empty() && has_root {
            return Err(self.error(offset, "multiple root elements"));
        }

        let name = self.name(start.name().as_ref(), offset)?;
        let mut attributes = IndexMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|err| self.error(offset, err))?;
            let key = self.name(attr.key.as_ref(), offset)?;
            let value = attr
                .unescape_value_with(|name| resolve(entities, name))
                .map_err(|err| self.error(offset, err))?
                .into_owned();
            self.check_chars(&value, offset)?;
            attributes.insert(key, value);
        }

        trace!(element = %name, depth = stack.len() + 1, "open element");
        Ok(Element {
            name,
            attributes,
            text: None,
            children: Vec::new(),
        })
    }

    fn name(&self, raw: &[u8], offset: usize) -> Result<String> {
        let name = std::str::from_utf8(raw).map_err(|err| self.error(offset, err))?;
        if !is_valid_name(name) {
            return Err(self.error(offset, format!("invalid name '{name}'")));
        }
        Ok(name.to_owned())
    }

    fn check_chars(&self, text: &str, offset: usize) -> Result<()> {
        match text.chars().find(|ch| !is_xml_char(*ch)) {
            Some(ch) => Err(self.error(
                offset,
                format_args!("character U+{:04X} is not allowed in XML", u32::from(ch)),
            )),
            None => Ok(()),
        }
    }

    fn check_depth(&self, depth: usize, offset: usize) -> Result<()> {
        self.limits
            .check_depth(depth)
            .map_err(|err| err.at(Pos::from_offset(self.input, offset)))
    }

    fn error(&self, offset: usize, detail: impl fmt::Display) -> Error {
        let pos = Pos::from_offset(self.input, offset);
        Error::parse(
            Format::Xml,
            format_args!("{detail} (line {}, column {})", pos.line, pos.col),
        )
        .at(pos)
    }
}

/// The `Char` production of XML 1.0
fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}')
        || ch >= '\u{10000}'
}

/// `]]>` may only close a CDATA section
fn contains_cdata_end(raw: &[u8]) -> bool {
    raw.windows(3).any(|window| window == b"]]>")
}

fn resolve<'e>(entities: &'e IndexMap<String, String>, name: &str) -> Option<&'e str> {
    resolve_predefined_entity(name).or_else(|| entities.get(name).map(String::as_str))
}

/// General entities declared in the internal DTD subset.
///
/// Only internal entities with plain-text replacement are supported. External
/// and parameter entities are skipped, so references to them stay unresolved.
fn declared_entities(doctype: &str) -> std::result::Result<IndexMap<String, String>, String> {
    let mut entities = IndexMap::new();
    let Some((_, subset)) = doctype.split_once('[') else {
        return Ok(entities);
    };

    for decl in subset.split("<!ENTITY").skip(1) {
        let decl = decl.trim_start();
        if decl.starts_with('%') {
            continue;
        }
        let Some((name, rest)) = decl.split_once(char::is_whitespace) else {
            return Err("malformed entity declaration".to_string());
        };
        if !is_valid_name(name) {
            return Err(format!("invalid entity name '{name}'"));
        }
        let rest = rest.trim_start();
        let Some(quote) = rest.chars().next().filter(|ch| matches!(ch, '"' | '\'')) else {
            continue;
        };
        let Some((value, _)) = rest
            .strip_prefix(quote)
            .and_then(|literal| literal.split_once(quote))
        else {
            return Err(format!("unterminated value for entity '{name}'"));
        };
        if value.contains(['<', '&', '%']) {
            return Err(format!("entity '{name}' contains markup or references"));
        }
        // the first declaration of an entity is binding
        entities.entry(name.to_owned()).or_insert_with(|| value.to_owned());
    }
    Ok(entities)
}

/// Hand a completed element to its parent, or make it the root
fn attach(element: Element, stack: &mut [Open], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.element.children.push(element),
        None => *root = Some(element),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn parse(input: &str) -> Result<Element> {
        Parser::new(input.as_bytes()).parse()
    }

    #[test]
    fn test_parse_nested() -> Result<()> {
        let root = parse(
            r#"<?xml version="1.0"?>
<!-- greeting -->
<root id="7">
  <name>test</name>
  <value>42</value>
  <empty/>
</root>
"#,
        )?;
        assert_eq!(root.name, "root");
        assert_eq!(root.attributes.get("id").map(String::as_str), Some("7"));
        assert_eq!(root.text, None);
        let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["name", "value", "empty"]);
        assert_eq!(root.child("value").and_then(|v| v.text.as_deref()), Some("42"));
        assert_eq!(root.child("empty").and_then(|e| e.text.as_deref()), None);
        Ok(())
    }

    #[test]
    fn test_entities_and_cdata() -> Result<()> {
        let root = parse(r#"<a t="&quot;q&quot;">1 &lt; 2 <![CDATA[& <raw>]]></a>"#)?;
        assert_eq!(root.text.as_deref(), Some("1 < 2 & <raw>"));
        assert_eq!(root.attributes.get("t").map(String::as_str), Some("\"q\""));
        Ok(())
    }

    #[test]
    fn test_mixed_text_is_concatenated() -> Result<()> {
        let root = parse("<a>x<b/>y</a>")?;
        assert_eq!(root.text.as_deref(), Some("xy"));
        assert_eq!(root.children.len(), 1);
        Ok(())
    }

    #[test]
    fn test_malformed_documents() {
        let cases = [
            "<root><child></root>",
            "<root>",
            "</root>",
            "<a/><b/>",
            "",
            "just text",
            "<a>&bogus;</a>",
            "<a x=\"1\" x=\"2\"/>",
            "<1a/>",
            "<a>x\u{1}</a>",
            "<a>]]></a>",
            "<a>&#1;</a>",
            "<a t=\"\u{8}\"/>",
            "<!DOCTYPE a [<!ENTITY e \"v\">]><a>&f;</a>",
        ];
        for case in cases {
            let err = parse(case).unwrap_err();
            assert_eq!(
                err.kind(),
                &ErrorKind::Parse { format: Format::Xml },
                "case {case:?}"
            );
        }
    }

    #[test]
    fn test_unclosed_reports_location() {
        let err = parse("<root>\n  <child>\n").unwrap_err();
        assert!(err.message().contains("unclosed element <child>"));
        assert_eq!(err.pos().map(|p| p.line), Some(3));
    }

    #[test]
    fn test_internal_subset_entities() -> Result<()> {
        let root = parse(
            r#"<!DOCTYPE a [
  <!ENTITY e "value">
  <!ENTITY ext SYSTEM "ext.txt">
  <!ENTITY % param "p">
]>
<a k="&e;!">&e; &amp; more</a>"#,
        )?;
        assert_eq!(root.text.as_deref(), Some("value & more"));
        assert_eq!(root.attributes.get("k").map(String::as_str), Some("value!"));
        Ok(())
    }

    #[test]
    fn test_entity_with_markup_is_rejected() {
        let err = parse(r#"<!DOCTYPE a [<!ENTITY e "<b/>">]><a>&e;</a>"#).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Parse { format: Format::Xml });
    }

    #[test]
    fn test_escaped_cdata_end_is_text() -> Result<()> {
        let root = parse("<a>]]&gt;\t\u{e9}</a>")?;
        assert_eq!(root.text.as_deref(), Some("]]>\t\u{e9}"));
        Ok(())
    }

    #[test]
    fn test_depth_ceiling_without_limit() {
        let depth = 200_000;
        let input = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
        let mut parser = Parser::with_limits(input.as_bytes(), Limits::new(0, 0));
        let err = parser.parse().unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::MaxDepthExceeded {
                max: crate::config::MAX_DEPTH_CEILING
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut parser = Parser::with_limits(b"<a><b><c/></b></a>", Limits::new(2, 0));
        let err = parser.parse().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MaxDepthExceeded { max: 2 });
    }
}
