//! Collapsible panel sections: one per element kind, plus one for the
//! drawing itself.

use crate::fields::{Field, FieldBuilder, Layout};
use crate::session::Session;
use crate::tools::{AddTools, RemoveTool, SelectedCounter, SelectionTools, ZTools};
use inkform_core::accessors::FlagAttribute;
use inkform_core::{DisplacementParam, ElementKind, LiveSelection, Mount};

/// The fields shown for a kind, in display order.
fn build_fields(kind: ElementKind, builder: &FieldBuilder<'_>) -> Vec<Field> {
    use Layout::{Fixed, KeepCenter, Reposition};

    match kind {
        ElementKind::Base => vec![
            builder.text_content(KeepCenter),
            builder.attribute("Font Size", "font-size", KeepCenter),
            builder.attribute("Font Weight", "font-weight", KeepCenter),
            builder.color("Fill", "fill"),
        ],
        ElementKind::PrimaryBond | ElementKind::SecondaryBond => vec![
            builder.color("Stroke", "stroke"),
            builder.attribute("Stroke Opacity", "stroke-opacity", Fixed),
            builder.attribute("Stroke Width", "stroke-width", Fixed),
            builder.attribute("Stroke Linecap", "stroke-linecap", Fixed),
            builder.attribute("Stroke Dasharray", "stroke-dasharray", Fixed),
            builder.attribute("Base Padding 1", "data-base-padding1", Reposition),
            builder.attribute("Base Padding 2", "data-base-padding2", Reposition),
        ],
        ElementKind::Outline => vec![
            builder.attribute("Radius", "r", Fixed),
            builder.attribute("Fill", "fill", Fixed),
            builder.color("Fill Color", "fill"),
            builder.attribute("Fill Opacity", "fill-opacity", Fixed),
            builder.color("Stroke", "stroke"),
            builder.attribute("Stroke Width", "stroke-width", Fixed),
            builder.attribute("Stroke Opacity", "stroke-opacity", Fixed),
            builder.attribute("Stroke Dasharray", "stroke-dasharray", Fixed),
        ],
        ElementKind::Numbering => {
            let mut fields = vec![
                builder.text_content(Reposition),
                builder.attribute("Font Family", "font-family", Reposition),
                builder.attribute("Font Size", "font-size", Reposition),
                builder.attribute("Font Weight", "font-weight", Reposition),
                builder.flag("Bold", FlagAttribute::bold(), Reposition),
                builder.attribute("Font Style", "font-style", Reposition),
                builder.attribute("Text Decoration", "text-decoration", Fixed),
                builder.flag("Underlined", FlagAttribute::underlined(), Fixed),
                builder.color("Fill", "fill"),
            ];
            fields.extend(
                DisplacementParam::all()
                    .iter()
                    .map(|&param| builder.displacement(param)),
            );
            fields
        }
        ElementKind::NumberingLine => vec![
            builder.color("Stroke", "stroke"),
            builder.attribute("Stroke Opacity", "stroke-opacity", Fixed),
            builder.attribute("Stroke Width", "stroke-width", Fixed),
            builder.attribute("Stroke Dasharray", "stroke-dasharray", Fixed),
            builder.attribute("Base Padding", "data-base-padding", Reposition),
            builder.attribute("Text Padding", "data-text-padding", Reposition),
        ],
    }
}

/// A section of the panel: counter, tools and fields for one kind.
///
/// The counter, selection tools and add/remove tools show whenever the
/// section is expanded; the z-order tools and fields only while something
/// is selected.
#[derive(Debug)]
pub struct Section {
    kind: ElementKind,
    selection: LiveSelection,
    counter: SelectedCounter,
    selection_tools: SelectionTools,
    add_tools: Option<AddTools>,
    remove_tool: Option<RemoveTool>,
    z_tools: ZTools,
    fields: Vec<Field>,
    collapsed: bool,
}

impl Section {
    pub fn new(session: &Session, kind: ElementKind, mount: &Mount) -> Self {
        let selection = session.selected(kind).clone();
        let context = session.binding_context(mount);
        let builder = FieldBuilder::new(&context, &selection, session.config());
        let fields = build_fields(kind, &builder);

        Self {
            kind,
            counter: SelectedCounter::new(kind, selection.clone(), mount.clone()),
            selection_tools: SelectionTools::new(session, kind),
            add_tools: AddTools::new(session, kind),
            remove_tool: RemoveTool::new(session, kind),
            z_tools: ZTools::new(session, kind),
            selection,
            fields,
            collapsed: session.config().sections_start_collapsed,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn collapse(&mut self) {
        self.collapsed = true;
    }

    pub fn expand(&mut self) {
        self.collapsed = false;
    }

    pub fn toggle(&mut self) {
        self.collapsed = !self.collapsed;
    }

    /// Check if the z-order tools and fields are shown.
    pub fn shows_fields(&self) -> bool {
        !self.collapsed && !self.selection.is_empty()
    }

    pub fn counter(&self) -> &SelectedCounter {
        &self.counter
    }

    pub fn selection_tools(&self) -> &SelectionTools {
        &self.selection_tools
    }

    /// Add button and its "only add missing" option, for outlines,
    /// numberings and numbering lines.
    pub fn add_tools(&self) -> Option<&AddTools> {
        self.add_tools.as_ref()
    }

    pub fn remove_tool(&self) -> Option<&RemoveTool> {
        self.remove_tool.as_ref()
    }

    pub fn z_tools(&self) -> &ZTools {
        &self.z_tools
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by label.
    pub fn field(&self, label: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.label() == label)
    }

    pub fn refresh(&self) {
        self.counter.refresh();
        for field in &self.fields {
            field.refresh();
        }
    }

    pub fn dispose(&mut self) {
        for field in &mut self.fields {
            field.dispose();
        }
    }
}

/// The "Drawing" section: properties of the drawing itself.
///
/// Its fields edit a fixed one-member selection holding the drawing's id.
/// Starts collapsed.
#[derive(Debug)]
pub struct DrawingSection {
    name: Field,
    collapsed: bool,
}

impl DrawingSection {
    pub fn new(session: &Session, mount: &Mount) -> Self {
        let selection = LiveSelection::new();
        selection.add(session.drawing().borrow().id);
        let context = session.binding_context(mount);
        let builder = FieldBuilder::new(&context, &selection, session.config());
        Self {
            name: builder.drawing_name(),
            collapsed: true,
        }
    }

    pub fn title(&self) -> &'static str {
        "Drawing"
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn collapse(&mut self) {
        self.collapsed = true;
    }

    pub fn expand(&mut self) {
        self.collapsed = false;
    }

    pub fn toggle(&mut self) {
        self.collapsed = !self.collapsed;
    }

    /// The drawing's name field.
    pub fn name(&self) -> &Field {
        &self.name
    }

    pub fn refresh(&self) {
        self.name.refresh();
    }

    pub fn dispose(&mut self) {
        self.name.dispose();
    }
}
