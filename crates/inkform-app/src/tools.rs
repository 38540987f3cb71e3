//! Section tools: the selected counter, stacking order, selection, add and
//! remove buttons.

use crate::session::Session;
use inkform_core::{
    Drawing, Element, ElementId, ElementKind, LiveSelection, Mount, Subscription, UndoLog,
};
use kurbo::Vec2;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

/// Where a newly added numbering sits relative to its base.
const NEW_NUMBERING_DISPLACEMENT: Vec2 = Vec2::new(0.0, -20.0);

/// State of a tool button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolButton {
    pub label: &'static str,
    pub enabled: bool,
    pub tooltip: String,
}

impl ToolButton {
    fn enabled(label: &'static str, tooltip: impl Into<String>) -> Self {
        Self {
            label,
            enabled: true,
            tooltip: tooltip.into(),
        }
    }

    fn disabled(label: &'static str, tooltip: impl Into<String>) -> Self {
        Self {
            label,
            enabled: false,
            tooltip: tooltip.into(),
        }
    }
}

/// "N bases are selected."
pub fn selected_text(kind: ElementKind, count: usize) -> String {
    if count == 1 {
        format!("1 {} is selected.", kind.singular())
    } else {
        format!("{} {} are selected.", count, kind.plural())
    }
}

/// Shows how many elements of one kind are selected.
///
/// Follows its selection only while mounted; [`refresh`](Self::refresh)
/// catches up after the panel opens.
#[derive(Debug)]
pub struct SelectedCounter {
    kind: ElementKind,
    selection: LiveSelection,
    text: Rc<RefCell<String>>,
    _subscription: Subscription,
}

impl SelectedCounter {
    pub fn new(kind: ElementKind, selection: LiveSelection, mount: Mount) -> Self {
        let text = Rc::new(RefCell::new(selected_text(kind, selection.len())));
        let shown = Rc::clone(&text);
        let subscription = selection.on_change({
            let selection = selection.clone();
            move |_| {
                if mount.is_mounted() {
                    *shown.borrow_mut() = selected_text(kind, selection.len());
                }
            }
        });
        Self {
            kind,
            selection,
            text,
            _subscription: subscription,
        }
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn refresh(&self) {
        *self.text.borrow_mut() = selected_text(self.kind, self.selection.len());
    }
}

/// Bring to front / send to back for the selected elements of one kind.
#[derive(Debug, Clone)]
pub struct ZTools {
    kind: ElementKind,
    drawing: Rc<RefCell<Drawing>>,
    selection: LiveSelection,
}

impl ZTools {
    pub fn new(session: &Session, kind: ElementKind) -> Self {
        Self {
            kind,
            drawing: Rc::clone(session.drawing()),
            selection: session.selected(kind).clone(),
        }
    }

    /// Front and back buttons.
    pub fn buttons(&self) -> [ToolButton; 2] {
        if self.selection.is_empty() {
            let tooltip = format!("No {} are selected.", self.kind.plural());
            [
                ToolButton::disabled("Front", tooltip.clone()),
                ToolButton::disabled("Back", tooltip),
            ]
        } else {
            [
                ToolButton::enabled("Front", format!("Bring {} to front.", self.kind.plural())),
                ToolButton::enabled("Back", format!("Send {} to back.", self.kind.plural())),
            ]
        }
    }

    /// Selected ids in stacking order, back to front.
    fn stacked(&self, drawing: &Drawing) -> Vec<ElementId> {
        drawing
            .z_order()
            .iter()
            .copied()
            .filter(|&id| self.selection.contains(id))
            .collect()
    }

    /// Bring the selected elements to the front, keeping their relative
    /// order. One checkpoint per click.
    pub fn bring_to_front(&self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let mut drawing = self.drawing.borrow_mut();
        drawing.push_checkpoint();
        for id in self.stacked(&drawing) {
            drawing.bring_to_front(id);
        }
        true
    }

    /// Send the selected elements to the back, keeping their relative order.
    pub fn send_to_back(&self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let mut drawing = self.drawing.borrow_mut();
        drawing.push_checkpoint();
        for id in self.stacked(&drawing).into_iter().rev() {
            drawing.send_to_back(id);
        }
        true
    }
}

/// Select all / none buttons for one kind, plus selecting the numberings
/// of the selected bases.
#[derive(Debug, Clone)]
pub struct SelectionTools {
    kind: ElementKind,
    drawing: Rc<RefCell<Drawing>>,
    selection: LiveSelection,
    bases: LiveSelection,
}

impl SelectionTools {
    pub fn new(session: &Session, kind: ElementKind) -> Self {
        Self {
            kind,
            drawing: Rc::clone(session.drawing()),
            selection: session.selected(kind).clone(),
            bases: session.selected(ElementKind::Base).clone(),
        }
    }

    fn all_of_kind(&self) -> Vec<ElementId> {
        self.drawing.borrow().elements_of_kind(self.kind)
    }

    /// Numberings owned by the selected bases.
    fn numberings_of_selected_bases(&self) -> Vec<ElementId> {
        let drawing = self.drawing.borrow();
        drawing
            .elements_of_kind(ElementKind::Numbering)
            .into_iter()
            .filter(|&id| {
                drawing
                    .element(id)
                    .and_then(|n| n.owners.first())
                    .is_some_and(|&base| self.bases.contains(base))
            })
            .collect()
    }

    pub fn buttons(&self) -> Vec<ToolButton> {
        let plural = self.kind.plural();
        let all = self.all_of_kind();
        let mut buttons = Vec::with_capacity(3);

        buttons.push(if all.is_empty() {
            ToolButton::disabled("All", format!("There are no {} in the drawing.", plural))
        } else if all.iter().all(|&id| self.selection.contains(id)) {
            ToolButton::disabled("All", format!("All {} are already selected.", plural))
        } else {
            ToolButton::enabled("All", format!("Select all {}.", plural))
        });

        if self.kind == ElementKind::Numbering {
            let numbering = self.numberings_of_selected_bases();
            buttons.push(if self.bases.is_empty() {
                ToolButton::disabled("Numbering", "No bases are selected.")
            } else if numbering.is_empty() {
                ToolButton::disabled("Numbering", "None of the selected bases are numbered.")
            } else if numbering.iter().all(|&id| self.selection.contains(id)) {
                ToolButton::disabled(
                    "Numbering",
                    "All numberings numbering the selected bases are already selected.",
                )
            } else {
                ToolButton::enabled("Numbering", "Select numberings numbering the selected bases.")
            });
        }

        buttons.push(if self.selection.is_empty() {
            ToolButton::disabled("None", format!("No {} are selected.", plural))
        } else {
            ToolButton::enabled("None", format!("Deselect all {}.", plural))
        });
        buttons
    }

    pub fn select_all(&self) -> bool {
        let all = self.all_of_kind();
        self.selection.add_all(all)
    }

    /// Select the numberings of the selected bases.
    pub fn select_numbering(&self) -> bool {
        let numbering = self.numberings_of_selected_bases();
        self.selection.add_all(numbering)
    }

    pub fn select_none(&self) -> bool {
        self.selection.clear()
    }
}

/// Adds outlines, numberings or numbering lines to the selected owners
/// (bases, or numberings for numbering lines).
///
/// With "only add missing" checked (the default), owners that already have
/// one are skipped.
#[derive(Debug, Clone)]
pub struct AddTools {
    kind: ElementKind,
    owner_kind: ElementKind,
    drawing: Rc<RefCell<Drawing>>,
    owners: LiveSelection,
    selection: LiveSelection,
    only_add_missing: Cell<bool>,
}

impl AddTools {
    /// Add tools for `kind`, or `None` if the panel cannot add that kind.
    pub fn new(session: &Session, kind: ElementKind) -> Option<Self> {
        let owner_kind = match kind {
            ElementKind::Outline | ElementKind::Numbering => ElementKind::Base,
            ElementKind::NumberingLine => ElementKind::Numbering,
            _ => return None,
        };
        Some(Self {
            kind,
            owner_kind,
            drawing: Rc::clone(session.drawing()),
            owners: session.selected(owner_kind).clone(),
            selection: session.selected(kind).clone(),
            only_add_missing: Cell::new(true),
        })
    }

    /// "Only add missing numberings"
    pub fn option_label(&self) -> String {
        format!("Only add missing {}", self.kind.plural())
    }

    pub fn only_add_missing(&self) -> bool {
        self.only_add_missing.get()
    }

    pub fn set_only_add_missing(&self, only: bool) {
        self.only_add_missing.set(only);
    }

    /// Selected owners without an element of this kind.
    fn missing(&self, drawing: &Drawing) -> Vec<ElementId> {
        let owned: HashSet<ElementId> = drawing
            .elements_of_kind(self.kind)
            .into_iter()
            .filter_map(|id| drawing.element(id)?.owners.first().copied())
            .collect();
        self.owners
            .members()
            .into_iter()
            .filter(|id| !owned.contains(id))
            .collect()
    }

    fn targets(&self, drawing: &Drawing) -> Vec<ElementId> {
        if self.only_add_missing() {
            self.missing(drawing)
        } else {
            self.owners.members()
        }
    }

    pub fn button(&self) -> ToolButton {
        let (all_present, add) = match self.kind {
            ElementKind::Numbering => (
                "All selected bases are already numbered.",
                "Number the selected bases.",
            ),
            ElementKind::NumberingLine => (
                "All selected numberings are already connected by lines.",
                "Connect the selected numberings with lines.",
            ),
            _ => (
                "All selected bases are already outlined.",
                "Outline the selected bases.",
            ),
        };
        if self.owners.is_empty() {
            ToolButton::disabled("Add", format!("No {} are selected.", self.owner_kind.plural()))
        } else if self.only_add_missing() && self.missing(&self.drawing.borrow()).is_empty() {
            ToolButton::disabled("Add", all_present)
        } else {
            ToolButton::enabled("Add", add)
        }
    }

    fn create(&self, owner: ElementId, bases: &[ElementId]) -> Element {
        match self.kind {
            ElementKind::Numbering => {
                // numbered by position in the sequence
                let number = bases
                    .iter()
                    .position(|&b| b == owner)
                    .map_or(0, |i| i as i64 + 1);
                Element::numbering(owner, number, NEW_NUMBERING_DISPLACEMENT)
            }
            ElementKind::NumberingLine => Element::numbering_line(owner),
            _ => Element::outline(owner),
        }
    }

    /// Add an element for each target owner and select the new elements.
    /// One checkpoint per click; nothing happens without targets.
    pub fn add(&self) -> Vec<ElementId> {
        let added: Vec<ElementId> = {
            let mut drawing = self.drawing.borrow_mut();
            let targets = self.targets(&drawing);
            if targets.is_empty() {
                return Vec::new();
            }
            drawing.push_checkpoint();
            let bases = drawing.elements_of_kind(ElementKind::Base);
            targets
                .into_iter()
                .map(|owner| drawing.add_element(self.create(owner, &bases)))
                .collect()
        };
        log::info!("Added {} {}", added.len(), self.kind.plural());
        self.selection.add_all(added.iter().copied());
        added
    }
}

/// Removes the selected elements of one kind from the drawing.
#[derive(Debug, Clone)]
pub struct RemoveTool {
    kind: ElementKind,
    drawing: Rc<RefCell<Drawing>>,
    selection: LiveSelection,
}

impl RemoveTool {
    /// Remove tool for `kind`, or `None` if the panel cannot remove that kind.
    pub fn new(session: &Session, kind: ElementKind) -> Option<Self> {
        matches!(
            kind,
            ElementKind::Outline | ElementKind::Numbering | ElementKind::NumberingLine
        )
        .then(|| Self {
            kind,
            drawing: Rc::clone(session.drawing()),
            selection: session.selected(kind).clone(),
        })
    }

    pub fn button(&self) -> ToolButton {
        let plural = self.kind.plural();
        if self.selection.is_empty() {
            ToolButton::disabled("Remove", format!("No {} are selected.", plural))
        } else {
            ToolButton::enabled(
                "Remove",
                format!("Remove the selected {} from the drawing.", plural),
            )
        }
    }

    /// Remove the selected elements after one checkpoint and deselect them.
    /// Returns how many were removed.
    pub fn remove(&self) -> usize {
        let members = self.selection.members();
        if members.is_empty() {
            return 0;
        }
        let removed = {
            let mut drawing = self.drawing.borrow_mut();
            drawing.push_checkpoint();
            members
                .iter()
                .filter(|&&id| drawing.remove_element(id).is_some())
                .count()
        };
        log::info!("Removed {} {}", removed, self.kind.plural());
        self.selection.remove_all(members);
        removed
    }
}
