//! XML serialization

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};
use crate::xml::model::Element;
use crate::xml::Config;

/// Serialize an element tree verbatim, without indentation.
///
/// Text is written before the children; elements with neither text nor
/// children are written as `<tag/>`.
pub fn to_string(root: &Element, config: &Config) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    if config.declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(Error::write)?;
    }
    write_element(&mut writer, root)?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(Error::write)?;
    xml.push('\n');
    Ok(xml)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.text.is_none() && element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(Error::write);
    }

    writer.write_event(Event::Start(start)).map_err(Error::write)?;
    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(Error::write)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(Error::write)
}
