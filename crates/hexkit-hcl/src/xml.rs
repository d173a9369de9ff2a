//! Minimal XML element tree over `quick-xml`.
//!
//! The wire format is small and flat, so documents are read into an
//! [`XmlElement`] tree and written back from one. Attribute order is preserved.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::error::CodecError;

/// One XML element with its attributes, text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Tag name
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Concatenated character data directly inside the element
    pub text: String,
    /// Child elements in document order
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an element without attributes or content.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns an attribute value, or the empty string if absent.
    #[must_use]
    pub fn attr_or_empty(&self, name: &str) -> &str {
        self.attr(name).unwrap_or("")
    }

    /// Sets an attribute, replacing an existing one of the same name.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name.to_string(), value));
        }
    }

    /// Sets an attribute only if `value` is not empty.
    pub fn set_attr_nonempty(&mut self, name: &str, value: &str) {
        if !value.is_empty() {
            self.set_attr(name, value);
        }
    }

    /// Parses a required integer attribute.
    ///
    /// # Errors
    ///
    /// `MissingAttribute` or `InvalidAttribute`.
    pub fn i32_attr(&self, name: &'static str) -> Result<i32, CodecError> {
        let raw = self.attr(name).ok_or_else(|| self.missing(name))?;
        raw.trim().parse().map_err(|_| self.invalid(name, raw))
    }

    /// Parses a required unsigned integer attribute.
    ///
    /// # Errors
    ///
    /// `MissingAttribute` or `InvalidAttribute`.
    pub fn u32_attr(&self, name: &'static str) -> Result<u32, CodecError> {
        let raw = self.attr(name).ok_or_else(|| self.missing(name))?;
        raw.trim().parse().map_err(|_| self.invalid(name, raw))
    }

    /// Parses an optional integer attribute, `0` if absent.
    ///
    /// # Errors
    ///
    /// `InvalidAttribute` if present but not an integer.
    pub fn i32_attr_or_zero(&self, name: &'static str) -> Result<i32, CodecError> {
        match self.attr(name) {
            Some(raw) => raw.trim().parse().map_err(|_| self.invalid(name, raw)),
            None => Ok(0),
        }
    }

    /// Parses a required boolean attribute: `true`/`false`/`1`/`0`.
    ///
    /// # Errors
    ///
    /// `MissingAttribute` or `InvalidAttribute`.
    pub fn bool_attr(&self, name: &'static str) -> Result<bool, CodecError> {
        let raw = self.attr(name).ok_or_else(|| self.missing(name))?;
        match raw.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(self.invalid(name, raw)),
        }
    }

    /// Iterates over child elements with the given tag.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Builds a `MissingAttribute` error for this element.
    #[must_use]
    pub fn missing(&self, attribute: &'static str) -> CodecError {
        CodecError::MissingAttribute {
            element: self.name.clone(),
            attribute,
        }
    }

    /// Builds an `InvalidAttribute` error for this element.
    #[must_use]
    pub fn invalid(&self, attribute: &'static str, value: &str) -> CodecError {
        CodecError::InvalidAttribute {
            element: self.name.clone(),
            attribute,
            value: value.to_string(),
        }
    }

    /// Checks the element's tag.
    ///
    /// # Errors
    ///
    /// `UnexpectedElement` if the tag differs.
    pub fn expect_name(&self, expected: &'static str) -> Result<(), CodecError> {
        if self.name == expected {
            Ok(())
        } else {
            Err(CodecError::UnexpectedElement {
                expected,
                found: self.name.clone(),
            })
        }
    }
}

fn xml_error(err: impl std::fmt::Display) -> CodecError {
    CodecError::Xml(err.to_string())
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, CodecError> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(xml_error)?
        .to_string();
    let mut element = XmlElement::new(&name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(xml_error)?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(xml_error)?
            .to_string();
        let value = attribute.unescape_value().map_err(xml_error)?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Parses a document and returns its root element.
///
/// Declarations, comments and processing instructions are skipped. Character
/// data is kept verbatim, except whitespace-only text around child elements.
///
/// # Errors
///
/// `Xml` for malformed documents, `Empty` if there is no root element.
pub fn parse(document: &str) -> Result<XmlElement, CodecError> {
    let mut reader = Reader::from_str(document);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => stack.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => {
                        root.get_or_insert(element);
                    }
                }
            }
            Event::End(_) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| CodecError::Xml("unbalanced end tag".to_string()))?;
                // indentation between child elements
                if !element.children.is_empty() && element.text.trim().is_empty() {
                    element.text.clear();
                }
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => {
                        root.get_or_insert(element);
                    }
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(std::str::from_utf8(&data).map_err(xml_error)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(CodecError::Xml("unexpected end of document".to_string()));
    }
    root.ok_or(CodecError::Empty)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), CodecError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if element.children.is_empty() && element.text.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    if !element.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&element.text)))
            .map_err(xml_error)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(xml_error)
}

/// Writes an element tree as an indented document without declaration.
///
/// # Errors
///
/// `Xml` if the writer fails.
pub fn write(element: &XmlElement) -> Result<String, CodecError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_element(&mut writer, element)?;
    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_and_attributes() {
        let root = parse(
            r#"<?xml version="1.0"?>
            <program>
              <!-- comment -->
              <ShowImage id="arrow" delay="40"><site x="1" y="2"/><site x="3" y="4"/></ShowImage>
              <ShowMessage id="red"><details>a &amp; b</details></ShowMessage>
            </program>"#,
        )
        .unwrap();
        assert_eq!(root.name, "program");
        assert_eq!(root.children.len(), 2);
        let image = &root.children[0];
        assert_eq!(image.attr("id"), Some("arrow"));
        assert_eq!(image.i32_attr("delay").unwrap(), 40);
        assert_eq!(image.children_named("site").count(), 2);
        assert_eq!(root.children[1].children[0].text, "a & b");
    }

    #[test]
    fn writes_and_reads_back() {
        let mut root = XmlElement::new("SetEntityName");
        root.set_attr("id", "unit-1");
        root.set_attr("text", "Tom \"the\" <Bold>");
        let mut details = XmlElement::new("details");
        details.text = " spaced  text ".to_string();
        root.children.push(details);

        let xml = write(&root).unwrap();
        assert_eq!(parse(&xml).unwrap(), root);
    }

    #[test]
    fn booleans_accept_digits() {
        let mut element = XmlElement::new("SetUnitCanMove");
        element.set_attr("canMove", "1");
        assert!(element.bool_attr("canMove").unwrap());
        element.set_attr("canMove", "false");
        assert!(!element.bool_attr("canMove").unwrap());
        element.set_attr("canMove", "maybe");
        assert!(matches!(
            element.bool_attr("canMove"),
            Err(CodecError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn missing_and_malformed_documents() {
        assert_eq!(parse("   "), Err(CodecError::Empty));
        assert!(matches!(parse("<a><b></a>"), Err(CodecError::Xml(_))));
        let element = XmlElement::new("SetEntityFrameOffset");
        assert!(matches!(
            element.i32_attr("value"),
            Err(CodecError::MissingAttribute { .. })
        ));
        assert_eq!(element.i32_attr_or_zero("delay").unwrap(), 0);
    }
}
