//! Concrete accessors for the properties the panel edits.

use crate::binding::{Accessor, Control, ControlValue};
use crate::color::{NEUTRAL_COLOR, normalize_color};
use crate::drawing::{DISPLACEMENT_ATTRIBUTE, Drawing, NAME_ATTRIBUTE, format_number};
use crate::element::{DisplacementParam, ElementId};
use crate::error::{InkformError, Result};
use crate::mutation::MutationFilter;

/// A presentation attribute edited as free text.
///
/// Input is trimmed. Missing attributes read as the empty string, so an
/// empty input clears the attribute when `allow_empty` is set.
#[derive(Debug, Clone)]
pub struct AttributeText {
    name: String,
    allow_empty: bool,
}

impl AttributeText {
    /// Edit the attribute `name` (kebab case).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allow_empty: true,
        }
    }

    /// Reject empty input instead of writing it.
    pub fn non_empty(mut self) -> Self {
        self.allow_empty = false;
        self
    }

    /// The attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Accessor for AttributeText {
    type Value = String;

    fn read(&self, drawing: &Drawing, id: ElementId) -> Option<String> {
        drawing
            .element(id)
            .map(|e| e.attribute(&self.name).unwrap_or_default().to_string())
    }

    fn write(&self, drawing: &mut Drawing, id: ElementId, value: &String) -> Result<()> {
        drawing.set_attribute(id, &self.name, value)
    }

    fn parse(&self, raw: &ControlValue) -> Option<String> {
        let value = raw.as_text().trim();
        if value.is_empty() && !self.allow_empty {
            return None;
        }
        Some(value.to_string())
    }

    fn display(&self, value: Option<&String>) -> ControlValue {
        ControlValue::Text(value.cloned().unwrap_or_default())
    }

    fn filter(&self) -> MutationFilter {
        MutationFilter::attributes([self.name.clone()])
    }
}

/// A color attribute edited with a color picker.
///
/// Values are compared and written as lower-case `#rrggbb`. Elements whose
/// attribute is missing or not a color have no usable value.
#[derive(Debug, Clone)]
pub struct ColorAttribute {
    name: String,
    neutral: String,
}

impl ColorAttribute {
    /// Edit the color attribute `name` (kebab case).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            neutral: NEUTRAL_COLOR.to_string(),
        }
    }

    /// Show `neutral` when there is no single color.
    pub fn with_neutral(mut self, neutral: impl Into<String>) -> Self {
        self.neutral = neutral.into();
        self
    }

    /// The attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Accessor for ColorAttribute {
    type Value = String;

    fn read(&self, drawing: &Drawing, id: ElementId) -> Option<String> {
        drawing.attribute(id, &self.name).and_then(normalize_color)
    }

    fn write(&self, drawing: &mut Drawing, id: ElementId, value: &String) -> Result<()> {
        drawing.set_attribute(id, &self.name, value)
    }

    fn parse(&self, raw: &ControlValue) -> Option<String> {
        normalize_color(raw.as_text())
    }

    fn display(&self, value: Option<&String>) -> ControlValue {
        ControlValue::Text(value.cloned().unwrap_or_else(|| self.neutral.clone()))
    }

    fn filter(&self) -> MutationFilter {
        MutationFilter::attributes([self.name.clone()])
    }
}

/// The text content of bases and numberings.
///
/// Input is trimmed; whitespace-only input is rejected unless empty text is
/// explicitly allowed.
#[derive(Debug, Clone, Default)]
pub struct TextContent {
    allow_empty: bool,
}

impl TextContent {
    /// Edit text content, rejecting empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept empty input.
    pub fn allowing_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }
}

impl Accessor for TextContent {
    type Value = String;

    fn read(&self, drawing: &Drawing, id: ElementId) -> Option<String> {
        drawing.text_content(id).map(str::to_string)
    }

    fn write(&self, drawing: &mut Drawing, id: ElementId, value: &String) -> Result<()> {
        drawing.set_text_content(id, value)
    }

    fn parse(&self, raw: &ControlValue) -> Option<String> {
        let value = raw.as_text().trim();
        if value.is_empty() && !self.allow_empty {
            return None;
        }
        Some(value.to_string())
    }

    fn display(&self, value: Option<&String>) -> ControlValue {
        ControlValue::Text(value.cloned().unwrap_or_default())
    }

    fn filter(&self) -> MutationFilter {
        MutationFilter::CharacterData
    }
}

/// One component of a numbering's displacement, edited as a number.
#[derive(Debug, Clone, Copy)]
pub struct Displacement(pub DisplacementParam);

impl Accessor for Displacement {
    type Value = f64;

    fn read(&self, drawing: &Drawing, id: ElementId) -> Option<f64> {
        drawing.displacement(id).map(|d| self.0.get(d))
    }

    fn write(&self, drawing: &mut Drawing, id: ElementId, value: &f64) -> Result<()> {
        let current = drawing.displacement(id).ok_or(InkformError::MissingProperty {
            id,
            what: "displacement",
        })?;
        drawing.set_displacement(id, self.0.set(current, *value))
    }

    fn parse(&self, raw: &ControlValue) -> Option<f64> {
        raw.as_text()
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    fn display(&self, value: Option<&f64>) -> ControlValue {
        ControlValue::Text(value.map(|v| format_number(*v)).unwrap_or_default())
    }

    fn filter(&self) -> MutationFilter {
        MutationFilter::attributes([DISPLACEMENT_ATTRIBUTE])
    }
}

/// The drawing's own name, read and written through the drawing's id.
///
/// Any other id has no name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawingName;

impl Accessor for DrawingName {
    type Value = String;

    fn read(&self, drawing: &Drawing, id: ElementId) -> Option<String> {
        (id == drawing.id).then(|| drawing.name().to_string())
    }

    fn write(&self, drawing: &mut Drawing, id: ElementId, value: &String) -> Result<()> {
        if id != drawing.id {
            return Err(InkformError::ElementNotFound(id));
        }
        drawing.set_name(value);
        Ok(())
    }

    fn parse(&self, raw: &ControlValue) -> Option<String> {
        Some(raw.as_text().trim().to_string())
    }

    fn display(&self, value: Option<&String>) -> ControlValue {
        ControlValue::Text(value.cloned().unwrap_or_default())
    }

    fn filter(&self) -> MutationFilter {
        MutationFilter::attributes([NAME_ATTRIBUTE])
    }
}

/// Check if a `font-weight` value counts as bold.
pub fn is_bold(font_weight: Option<&str>) -> bool {
    let Some(weight) = font_weight else {
        return false;
    };
    match weight.trim().parse::<f64>() {
        Ok(n) => n >= 700.0,
        Err(_) => weight.trim().eq_ignore_ascii_case("bold"),
    }
}

/// Check if a `text-decoration` value includes an underline.
pub fn is_underlined(text_decoration: Option<&str>) -> bool {
    text_decoration
        .map(|v| {
            v.split_whitespace()
                .any(|item| item.eq_ignore_ascii_case("underline"))
        })
        .unwrap_or(false)
}

/// A boolean view of an attribute, edited with a checkbox.
///
/// Only elements whose flag differs are written, so an element that is
/// already bold keeps its exact `font-weight`.
#[derive(Debug, Clone)]
pub struct FlagAttribute {
    name: &'static str,
    test: fn(Option<&str>) -> bool,
    on: &'static str,
    off: &'static str,
}

impl FlagAttribute {
    /// Bold text: `font-weight` of at least 700.
    pub fn bold() -> Self {
        Self {
            name: "font-weight",
            test: is_bold,
            on: "700",
            off: "400",
        }
    }

    /// Underlined text: `text-decoration` containing `underline`.
    pub fn underlined() -> Self {
        Self {
            name: "text-decoration",
            test: is_underlined,
            on: "underline",
            off: "",
        }
    }

    /// The attribute name.
    pub fn name(&self) -> &str {
        self.name
    }
}

impl Accessor for FlagAttribute {
    type Value = bool;

    fn read(&self, drawing: &Drawing, id: ElementId) -> Option<bool> {
        drawing
            .element(id)
            .map(|e| (self.test)(e.attribute(self.name)))
    }

    fn write(&self, drawing: &mut Drawing, id: ElementId, value: &bool) -> Result<()> {
        if (self.test)(drawing.attribute(id, self.name)) == *value {
            return Ok(());
        }
        let written = if *value { self.on } else { self.off };
        drawing.set_attribute(id, self.name, written)
    }

    fn parse(&self, raw: &ControlValue) -> Option<bool> {
        match raw {
            ControlValue::Checked(checked) => Some(*checked),
            ControlValue::Text(_) => None,
        }
    }

    fn display(&self, value: Option<&bool>) -> ControlValue {
        ControlValue::Checked(value.copied().unwrap_or(false))
    }

    fn filter(&self) -> MutationFilter {
        MutationFilter::attributes([self.name])
    }

    fn control(&self) -> Control {
        Control::checkbox()
    }
}
