//! Payload shapes shared by instruction variants.
//!
//! Each payload is plain data plus its slice of the wire format. Composite
//! payloads write their base part first and then their own attributes, so the
//! attribute order on the wire is always `id`, `text`, `value`, ...
//!
//! | Payload | Attributes / children |
//! |---|---|
//! | [`IdArgs`] | `id` (omitted if empty) |
//! | [`TextArgs`] | + `text` (omitted if empty) |
//! | [`ValueArgs`] | `id`, `value` |
//! | [`FlagArgs`] | `id`, variant-specific boolean |
//! | [`TextValueArgs`] | `id`, `text`, `value` |
//! | [`TextFlagArgs`] | `id`, `text`, `value` (boolean) |
//! | [`ModifierArgs`] | `id`, `text`, `value`, `target` |
//! | [`PointArgs`] | `id`, `x`, `y` |
//! | [`ImageArgs`] | `id`, `delay` (omitted if not positive), `<site x y/>`* |
//! | [`MessageArgs`] | `id`, `text`, `<details>` (omitted if empty), `<name>`* |

use hexkit_world::{ModifierTarget, Point, INVALID_LOCATION};
use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::xml::XmlElement;

fn write_id(element: &mut XmlElement, id: &str) {
    element.set_attr_nonempty("id", id);
}

fn write_text(element: &mut XmlElement, id: &str, text: &str) {
    write_id(element, id);
    element.set_attr_nonempty("text", text);
}

fn read_point(element: &XmlElement) -> Result<Point, CodecError> {
    Ok(Point::new(element.i32_attr("x")?, element.i32_attr("y")?))
}

fn write_point(element: &mut XmlElement, point: Point) {
    element.set_attr("x", point.x.to_string());
    element.set_attr("y", point.y.to_string());
}

/// Identifier only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdArgs {
    /// Primary identifier
    pub id: String,
}

impl IdArgs {
    /// Creates the payload.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }

    pub(crate) fn write(&self, element: &mut XmlElement) {
        write_id(element, &self.id);
    }

    pub(crate) fn read(element: &XmlElement) -> Result<Self, CodecError> {
        Ok(Self::new(element.attr_or_empty("id")))
    }
}

/// Identifier and a text argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextArgs {
    /// Primary identifier
    pub id: String,
    /// Secondary identifier or free text
    pub text: String,
}

impl TextArgs {
    /// Creates the payload.
    #[must_use]
    pub fn new(id: &str, text: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    pub(crate) fn write(&self, element: &mut XmlElement) {
        write_text(element, &self.id, &self.text);
    }

    pub(crate) fn read(element: &XmlElement) -> Result<Self, CodecError> {
        Ok(Self::new(
            element.attr_or_empty("id"),
            element.attr_or_empty("text"),
        ))
    }
}

/// Identifier and an integer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueArgs {
    /// Primary identifier
    pub id: String,
    /// Integer argument
    pub value: i32,
}

impl ValueArgs {
    /// Creates the payload.
    #[must_use]
    pub fn new(id: &str, value: i32) -> Self {
        Self {
            id: id.to_string(),
            value,
        }
    }

    pub(crate) fn write(&self, element: &mut XmlElement) {
        write_id(element, &self.id);
        element.set_attr("value", self.value.to_string());
    }

    pub(crate) fn read(element: &XmlElement) -> Result<Self, CodecError> {
        Ok(Self::new(element.attr_or_empty("id"), element.i32_attr("value")?))
    }
}

/// Identifier and a boolean stored under a variant-specific attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagArgs {
    /// Primary identifier
    pub id: String,
    /// Boolean argument
    pub value: bool,
}

impl FlagArgs {
    /// Creates the payload.
    #[must_use]
    pub fn new(id: &str, value: bool) -> Self {
        Self {
            id: id.to_string(),
            value,
        }
    }

    pub(crate) fn write(&self, element: &mut XmlElement, attribute: &str) {
        write_id(element, &self.id);
        element.set_attr(attribute, self.value.to_string());
    }

    pub(crate) fn read(element: &XmlElement, attribute: &'static str) -> Result<Self, CodecError> {
        Ok(Self::new(
            element.attr_or_empty("id"),
            element.bool_attr(attribute)?,
        ))
    }
}

/// Identifier, text and integer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextValueArgs {
    /// Primary identifier
    pub id: String,
    /// Secondary identifier
    pub text: String,
    /// Integer argument
    pub value: i32,
}

impl TextValueArgs {
    /// Creates the payload.
    #[must_use]
    pub fn new(id: &str, text: &str, value: i32) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            value,
        }
    }

    pub(crate) fn write(&self, element: &mut XmlElement) {
        write_text(element, &self.id, &self.text);
        element.set_attr("value", self.value.to_string());
    }

    pub(crate) fn read(element: &XmlElement) -> Result<Self, CodecError> {
        let base = TextArgs::read(element)?;
        Ok(Self {
            id: base.id,
            text: base.text,
            value: element.i32_attr("value")?,
        })
    }
}

/// Identifier, text and boolean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFlagArgs {
    /// Primary identifier
    pub id: String,
    /// Secondary identifier
    pub text: String,
    /// Boolean argument
    pub value: bool,
}

impl TextFlagArgs {
    /// Creates the payload.
    #[must_use]
    pub fn new(id: &str, text: &str, value: bool) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            value,
        }
    }

    pub(crate) fn write(&self, element: &mut XmlElement) {
        write_text(element, &self.id, &self.text);
        element.set_attr("value", self.value.to_string());
    }

    pub(crate) fn read(element: &XmlElement) -> Result<Self, CodecError> {
        let base = TextArgs::read(element)?;
        Ok(Self {
            id: base.id,
            text: base.text,
            value: element.bool_attr("value")?,
        })
    }
}

/// Entity, variable, value and modifier target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierArgs {
    /// Entity identifier
    pub id: String,
    /// Variable identifier
    pub text: String,
    /// Modifier value
    pub value: i32,
    /// Receiver of the modifier
    pub target: ModifierTarget,
}

impl ModifierArgs {
    /// Creates the payload.
    #[must_use]
    pub fn new(id: &str, text: &str, value: i32, target: ModifierTarget) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            value,
            target,
        }
    }

    pub(crate) fn write(&self, element: &mut XmlElement) {
        write_text(element, &self.id, &self.text);
        element.set_attr("value", self.value.to_string());
        element.set_attr("target", self.target.name());
    }

    pub(crate) fn read(element: &XmlElement) -> Result<Self, CodecError> {
        let base = TextValueArgs::read(element)?;
        let raw = element.attr("target").ok_or_else(|| element.missing("target"))?;
        let target =
            ModifierTarget::from_name(raw).ok_or_else(|| element.invalid("target", raw))?;
        Ok(Self {
            id: base.id,
            text: base.text,
            value: base.value,
            target,
        })
    }
}

/// Identifier and a map location.
///
/// The location defaults to [`INVALID_LOCATION`], meaning "no site".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointArgs {
    /// Primary identifier
    pub id: String,
    /// Map location
    pub location: Point,
}

impl Default for PointArgs {
    fn default() -> Self {
        Self {
            id: String::new(),
            location: INVALID_LOCATION,
        }
    }
}

impl PointArgs {
    /// Creates the payload.
    #[must_use]
    pub fn new(id: &str, location: Point) -> Self {
        Self {
            id: id.to_string(),
            location,
        }
    }

    pub(crate) fn write(&self, element: &mut XmlElement) {
        write_id(element, &self.id);
        write_point(element, self.location);
    }

    pub(crate) fn read(element: &XmlElement) -> Result<Self, CodecError> {
        Ok(Self::new(element.attr_or_empty("id"), read_point(element)?))
    }
}

/// Image shown over a sequence of sites.
///
/// `delay` is the display time per site in milliseconds. Values of zero or less
/// leave the choice to the display; see
/// [`effective_delay`](crate::display::effective_delay).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageArgs {
    /// Entity class providing the image
    pub id: String,
    /// Sites the image visits, in order
    pub sites: Vec<Point>,
    /// Display time per site in milliseconds
    pub delay: i32,
}

impl ImageArgs {
    /// Creates the payload.
    #[must_use]
    pub fn new(id: &str, sites: Vec<Point>, delay: i32) -> Self {
        Self {
            id: id.to_string(),
            sites,
            delay,
        }
    }

    pub(crate) fn write(&self, element: &mut XmlElement) {
        write_id(element, &self.id);
        if self.delay > 0 {
            element.set_attr("delay", self.delay.to_string());
        }
        for site in &self.sites {
            let mut child = XmlElement::new("site");
            write_point(&mut child, *site);
            element.children.push(child);
        }
    }

    pub(crate) fn read(element: &XmlElement) -> Result<Self, CodecError> {
        let sites = element
            .children_named("site")
            .map(read_point)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(
            element.attr_or_empty("id"),
            sites,
            element.i32_attr_or_zero("delay")?,
        ))
    }
}

/// Message addressed to a faction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageArgs {
    /// Faction the message concerns
    pub id: String,
    /// Summary line
    pub text: String,
    /// Detailed message body
    pub details: String,
    /// Names listed with the message, e.g. affected entities
    pub names: Vec<String>,
}

impl MessageArgs {
    /// Creates the payload.
    #[must_use]
    pub fn new(id: &str, text: &str, details: &str, names: Vec<String>) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            details: details.to_string(),
            names,
        }
    }

    pub(crate) fn write(&self, element: &mut XmlElement) {
        write_text(element, &self.id, &self.text);
        if !self.details.is_empty() {
            let mut child = XmlElement::new("details");
            child.text.clone_from(&self.details);
            element.children.push(child);
        }
        for name in &self.names {
            let mut child = XmlElement::new("name");
            child.text.clone_from(name);
            element.children.push(child);
        }
    }

    pub(crate) fn read(element: &XmlElement) -> Result<Self, CodecError> {
        let base = TextArgs::read(element)?;
        let details = element
            .children_named("details")
            .next()
            .map(|child| child.text.clone())
            .unwrap_or_default();
        let names = element
            .children_named("name")
            .map(|child| child.text.clone())
            .collect();
        Ok(Self {
            id: base.id,
            text: base.text,
            details,
            names,
        })
    }
}
