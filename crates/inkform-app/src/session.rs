//! Editing session: a drawing, its mutation hub and one live selection per
//! element kind.

use inkform_core::{
    BindingContext, Drawing, ElementId, ElementKind, LiveSelection, Mount, MutationHub,
    PanelConfig, UndoLog,
};
use std::cell::RefCell;
use std::rc::Rc;

const KIND_COUNT: usize = 6;

/// Everything the panel edits through.
#[derive(Debug)]
pub struct Session {
    drawing: Rc<RefCell<Drawing>>,
    hub: MutationHub,
    selections: [LiveSelection; KIND_COUNT],
    config: PanelConfig,
}

impl Session {
    /// Start a session on `drawing`.
    pub fn new(mut drawing: Drawing, config: PanelConfig) -> Self {
        drawing.set_history_limit(config.undo_history_limit);
        Self {
            drawing: Rc::new(RefCell::new(drawing)),
            hub: MutationHub::new(),
            selections: std::array::from_fn(|_| LiveSelection::new()),
            config,
        }
    }

    /// The drawing being edited.
    pub fn drawing(&self) -> &Rc<RefCell<Drawing>> {
        &self.drawing
    }

    pub fn hub(&self) -> &MutationHub {
        &self.hub
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// The selected elements of one kind.
    pub fn selected(&self, kind: ElementKind) -> &LiveSelection {
        &self.selections[kind as usize]
    }

    /// Context for bindings shown under `mount`.
    pub fn binding_context(&self, mount: &Mount) -> BindingContext {
        BindingContext::new(Rc::clone(&self.drawing), self.hub.clone(), mount.clone())
    }

    /// Add elements to the selection of their kind.
    /// Returns true if any selection changed.
    pub fn select(&self, ids: impl IntoIterator<Item = ElementId>) -> bool {
        let mut changed = false;
        for (kind, ids) in self.group_by_kind(ids) {
            changed |= self.selected(kind).add_all(ids);
        }
        changed
    }

    /// Remove elements from the selection of their kind.
    pub fn deselect(&self, ids: impl IntoIterator<Item = ElementId>) -> bool {
        let mut changed = false;
        for (kind, ids) in self.group_by_kind(ids) {
            changed |= self.selected(kind).remove_all(ids);
        }
        changed
    }

    /// Clear every selection.
    pub fn deselect_all(&self) -> bool {
        let mut changed = false;
        for selection in &self.selections {
            changed |= selection.clear();
        }
        changed
    }

    /// Total number of selected elements.
    pub fn selection_count(&self) -> usize {
        self.selections.iter().map(LiveSelection::len).sum()
    }

    fn group_by_kind(
        &self,
        ids: impl IntoIterator<Item = ElementId>,
    ) -> Vec<(ElementKind, Vec<ElementId>)> {
        let drawing = self.drawing.borrow();
        let mut groups: Vec<(ElementKind, Vec<ElementId>)> = Vec::new();
        for id in ids {
            let Some(element) = drawing.element(id) else {
                log::warn!("Ignoring unknown element {}", id);
                continue;
            };
            match groups.iter_mut().find(|(kind, _)| *kind == element.kind) {
                Some((_, group)) => group.push(id),
                None => groups.push((element.kind, vec![id])),
            }
        }
        groups
    }

    /// Push an undo checkpoint ahead of a change made outside a binding.
    pub fn push_checkpoint(&self) {
        self.drawing.borrow_mut().push_checkpoint();
    }

    /// Deliver pending drawing mutations to the panel.
    pub fn flush(&self) -> usize {
        self.hub.flush(&self.drawing)
    }

    /// Undo the last change. Returns true if something was undone.
    pub fn undo(&self) -> bool {
        let undone = self.drawing.borrow_mut().undo();
        if undone {
            self.after_history_change();
        }
        undone
    }

    /// Redo the last undone change.
    pub fn redo(&self) -> bool {
        let redone = self.drawing.borrow_mut().redo();
        if redone {
            self.after_history_change();
        }
        redone
    }

    /// Drop selected ids that no longer exist, then let the panel catch up.
    fn after_history_change(&self) {
        for selection in &self.selections {
            let stale: Vec<ElementId> = {
                let drawing = self.drawing.borrow();
                selection
                    .members()
                    .into_iter()
                    .filter(|&id| !drawing.contains(id))
                    .collect()
            };
            selection.remove_all(stale);
        }
        self.flush();
    }
}
