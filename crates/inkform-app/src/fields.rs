//! Labelled form fields.

use inkform_core::accessors::{
    AttributeText, ColorAttribute, Displacement, DrawingName, FlagAttribute, TextContent,
};
use inkform_core::{
    Accessor, Binding, BindingContext, BoundControl, CheckpointPolicy, DisplacementParam, Drawing,
    ElementId, ElementKind, LiveSelection, PanelConfig,
};
use std::fmt;

const ATTRIBUTE_REFERENCE: &str = "https://developer.mozilla.org/en-US/docs/Web/SVG/Reference/Attribute";

/// Reference page for an SVG presentation attribute.
pub fn attribute_info_link(name: &str) -> String {
    format!("{}/{}", ATTRIBUTE_REFERENCE, name)
}

/// A control with a label and an optional link explaining what it edits.
pub struct Field {
    label: &'static str,
    info_link: Option<String>,
    control: Box<dyn BoundControl>,
}

impl Field {
    pub fn new(label: &'static str, control: Box<dyn BoundControl>) -> Self {
        Self {
            label,
            info_link: None,
            control,
        }
    }

    /// Attach a link explaining the field.
    pub fn with_info_link(mut self, link: impl Into<String>) -> Self {
        self.info_link = Some(link.into());
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn info_link(&self) -> Option<&str> {
        self.info_link.as_deref()
    }

    /// The bound control.
    pub fn control(&self) -> &dyn BoundControl {
        self.control.as_ref()
    }

    pub fn refresh(&self) {
        self.control.refresh();
    }

    pub fn dispose(&mut self) {
        self.control.dispose();
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("label", &self.label)
            .field("value", &self.control.value())
            .finish()
    }
}

/// Recompute layout of edited elements and of the numbering lines attached
/// to edited numberings.
pub fn reposition(drawing: &mut Drawing, ids: &[ElementId]) {
    let lines: Vec<ElementId> = drawing
        .elements_of_kind(ElementKind::NumberingLine)
        .into_iter()
        .filter(|&line| {
            drawing
                .element(line)
                .and_then(|l| l.owners.first())
                .is_some_and(|owner| ids.contains(owner))
        })
        .collect();

    for &id in ids.iter().chain(&lines) {
        if let Err(e) = drawing.reposition(id) {
            log::warn!("Failed to reposition {}: {}", id, e);
        }
    }
}

/// Re-anchor the text of edited bases so it stays on their centers.
pub fn keep_centered(drawing: &mut Drawing, ids: &[ElementId]) {
    for &id in ids {
        if let Err(e) = drawing.center_text(id) {
            log::warn!("Failed to center text of {}: {}", id, e);
        }
    }
}

/// Whether edits through a field move the edited elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Fixed,
    /// Run [`reposition`] after each edit.
    Reposition,
    /// Run [`keep_centered`] after each edit.
    KeepCenter,
}

/// Builds the fields of one section.
pub struct FieldBuilder<'a> {
    context: &'a BindingContext,
    selection: &'a LiveSelection,
    config: &'a PanelConfig,
}

impl<'a> FieldBuilder<'a> {
    pub fn new(
        context: &'a BindingContext,
        selection: &'a LiveSelection,
        config: &'a PanelConfig,
    ) -> Self {
        Self {
            context,
            selection,
            config,
        }
    }

    fn bind<A: Accessor + 'static>(
        &self,
        accessor: A,
        policy: CheckpointPolicy,
        layout: Layout,
    ) -> Box<dyn BoundControl> {
        let binding = Binding::new(self.context, self.selection.clone(), accessor, policy);
        match layout {
            Layout::Fixed => Box::new(binding),
            Layout::Reposition => Box::new(binding.with_after_edit(reposition)),
            Layout::KeepCenter => Box::new(binding.with_after_edit(keep_centered)),
        }
    }

    /// Free-text attribute field. Data attributes get no info link.
    pub fn attribute(&self, label: &'static str, name: &str, layout: Layout) -> Field {
        let control = self.bind(AttributeText::new(name), CheckpointPolicy::discrete(), layout);
        let field = Field::new(label, control);
        if name.starts_with("data-") {
            field
        } else {
            field.with_info_link(attribute_info_link(name))
        }
    }

    /// Color picker field.
    pub fn color(&self, label: &'static str, name: &str) -> Field {
        let accessor = ColorAttribute::new(name).with_neutral(self.config.neutral_color.clone());
        let control = self.bind(accessor, CheckpointPolicy::continuous(), Layout::Fixed);
        Field::new(label, control).with_info_link(attribute_info_link(name))
    }

    /// Text content field.
    pub fn text_content(&self, layout: Layout) -> Field {
        let accessor = TextContent::new().allowing_empty(self.config.allow_empty_text_content);
        let control = self.bind(accessor, CheckpointPolicy::discrete(), layout);
        Field::new("Text Content", control)
    }

    /// Checkbox field.
    pub fn flag(&self, label: &'static str, accessor: FlagAttribute, layout: Layout) -> Field {
        let link = attribute_info_link(accessor.name());
        let control = self.bind(accessor, CheckpointPolicy::discrete(), layout);
        Field::new(label, control).with_info_link(link)
    }

    /// The drawing's name. Only meaningful over a selection holding the
    /// drawing's id.
    pub fn drawing_name(&self) -> Field {
        let control = self.bind(DrawingName, CheckpointPolicy::discrete(), Layout::Fixed);
        Field::new("Name", control)
    }

    /// Numbering displacement component field.
    pub fn displacement(&self, param: DisplacementParam) -> Field {
        let control = self.bind(
            Displacement(param),
            CheckpointPolicy::discrete(),
            Layout::Reposition,
        );
        Field::new(param.label(), control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkform_core::{ControlValue, Element, Mount, MutationHub};
    use kurbo::{Point, Vec2};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_info_link() {
        assert_eq!(
            attribute_info_link("font-size"),
            "https://developer.mozilla.org/en-US/docs/Web/SVG/Reference/Attribute/font-size"
        );
    }

    #[test]
    fn test_reposition_moves_attached_numbering_lines() {
        let mut drawing = Drawing::new();
        let base = drawing.add_element(Element::base("G", Point::new(10.0, 10.0)));
        let numbering = drawing.add_element(Element::numbering(base, 1, Vec2::new(0.0, 20.0)));
        let line = drawing.add_element(Element::numbering_line(numbering));
        let other = drawing.add_element(Element::numbering_line(base));

        drawing.set_attribute(line, "y2", "0").unwrap();
        drawing.set_attribute(other, "y2", "0").unwrap();
        reposition(&mut drawing, &[numbering]);

        assert_eq!(drawing.attribute(line, "y2"), Some("30"));
        assert_eq!(drawing.attribute(other, "y2"), Some("0"));
    }

    #[test]
    fn test_builder_fields() {
        let mut drawing = Drawing::new();
        let base = drawing.add_element(
            Element::base("A", Point::ZERO)
                .with_attribute("fill", "#FF0000")
                .with_attribute("font-size", "12"),
        );
        let context = BindingContext::new(
            Rc::new(RefCell::new(drawing)),
            MutationHub::new(),
            Mount::attached(),
        );
        let selection = LiveSelection::new();
        selection.add(base);
        let config = PanelConfig::default();
        let builder = FieldBuilder::new(&context, &selection, &config);

        let size = builder.attribute("Font Size", "font-size", Layout::Fixed);
        assert_eq!(size.label(), "Font Size");
        assert_eq!(size.control().value(), ControlValue::Text("12".to_string()));
        assert!(size.info_link().is_some_and(|l| l.ends_with("/font-size")));

        let fill = builder.color("Fill", "fill");
        assert_eq!(fill.control().value(), ControlValue::Text("#ff0000".to_string()));

        let text = builder.text_content(Layout::Fixed);
        assert!(text.info_link().is_none());
        assert_eq!(text.control().value(), ControlValue::Text("A".to_string()));

        let bold = builder.flag("Bold", FlagAttribute::bold(), Layout::Fixed);
        assert_eq!(bold.control().value(), ControlValue::Checked(false));
    }

    #[test]
    fn test_keep_centered_reanchors_edited_bases() {
        let mut drawing = Drawing::new();
        let base = drawing.add_element(Element::base("G", Point::new(50.0, 50.0)));
        let context = BindingContext::new(
            Rc::new(RefCell::new(drawing)),
            MutationHub::new(),
            Mount::attached(),
        );
        let selection = LiveSelection::new();
        selection.add(base);
        let config = PanelConfig::default();
        let builder = FieldBuilder::new(&context, &selection, &config);

        let size = builder.attribute("Font Size", "font-size", Layout::KeepCenter);
        size.control().focus();
        size.control().edit_text("20");
        assert!(size.control().blur().is_applied());

        let drawing = context.drawing.borrow();
        assert_eq!(drawing.attribute(base, "x"), Some("44.5"));
        assert_eq!(drawing.attribute(base, "y"), Some("62"));
        assert_eq!(drawing.center(base), Some(Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_drawing_name_field() {
        let drawing = Drawing::new();
        let id = drawing.id;
        let context = BindingContext::new(
            Rc::new(RefCell::new(drawing)),
            MutationHub::new(),
            Mount::attached(),
        );
        let selection = LiveSelection::new();
        selection.add(id);
        let config = PanelConfig::default();
        let name = FieldBuilder::new(&context, &selection, &config).drawing_name();
        assert_eq!(name.control().value(), ControlValue::Text("Untitled".to_string()));

        name.control().edit_text(" 16S rRNA ");
        assert!(name.control().submit().is_applied());
        assert_eq!(context.drawing.borrow().name(), "16S rRNA");
        assert_eq!(context.drawing.borrow().undo_depth(), 1);
    }
}
