//! Live selections of drawing elements.

use crate::element::ElementId;
use crate::event::{EventChannel, Subscription};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A membership change of a [`LiveSelection`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionChange {
    /// Elements that joined the selection.
    pub added: Vec<ElementId>,
    /// Elements that left the selection.
    pub removed: Vec<ElementId>,
}

impl SelectionChange {
    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

struct SelectionInner {
    members: RefCell<Vec<ElementId>>,
    changed: EventChannel<SelectionChange>,
}

/// An observable set of selected elements.
///
/// Members iterate in insertion order. Listeners hear about membership
/// changes only: one notification per call that actually adds or removes
/// something, never for edits made to the members themselves.
///
/// Cloning yields another handle to the same selection.
#[derive(Clone)]
pub struct LiveSelection {
    inner: Rc<SelectionInner>,
}

impl Default for LiveSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveSelection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SelectionInner {
                members: RefCell::new(Vec::new()),
                changed: EventChannel::new(),
            }),
        }
    }

    /// Snapshot of the current members.
    pub fn members(&self) -> Vec<ElementId> {
        self.inner.members.borrow().clone()
    }

    /// Number of selected elements.
    pub fn len(&self) -> usize {
        self.inner.members.borrow().len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.inner.members.borrow().is_empty()
    }

    /// Check if an element is selected.
    pub fn contains(&self, id: ElementId) -> bool {
        self.inner.members.borrow().contains(&id)
    }

    /// Add one element. Returns true if membership changed.
    pub fn add(&self, id: ElementId) -> bool {
        self.add_all([id])
    }

    /// Add several elements as one change.
    pub fn add_all(&self, ids: impl IntoIterator<Item = ElementId>) -> bool {
        let mut change = SelectionChange::default();
        {
            let mut members = self.inner.members.borrow_mut();
            for id in ids {
                if !members.contains(&id) {
                    members.push(id);
                    change.added.push(id);
                }
            }
        }
        self.notify(change)
    }

    /// Remove one element. Returns true if membership changed.
    pub fn remove(&self, id: ElementId) -> bool {
        self.remove_all([id])
    }

    /// Remove several elements as one change.
    pub fn remove_all(&self, ids: impl IntoIterator<Item = ElementId>) -> bool {
        let mut change = SelectionChange::default();
        {
            let mut members = self.inner.members.borrow_mut();
            for id in ids {
                if let Some(pos) = members.iter().position(|&m| m == id) {
                    members.remove(pos);
                    change.removed.push(id);
                }
            }
        }
        self.notify(change)
    }

    /// Deselect everything.
    pub fn clear(&self) -> bool {
        let removed = std::mem::take(&mut *self.inner.members.borrow_mut());
        self.notify(SelectionChange {
            added: Vec::new(),
            removed,
        })
    }

    /// Make `ids` the whole selection, as one change.
    pub fn replace(&self, ids: impl IntoIterator<Item = ElementId>) -> bool {
        let mut next: Vec<ElementId> = Vec::new();
        for id in ids {
            if !next.contains(&id) {
                next.push(id);
            }
        }

        let change = {
            let mut members = self.inner.members.borrow_mut();
            let change = SelectionChange {
                added: next.iter().filter(|id| !members.contains(id)).copied().collect(),
                removed: members.iter().filter(|id| !next.contains(id)).copied().collect(),
            };
            *members = next;
            change
        };
        self.notify(change)
    }

    /// Listen for membership changes.
    pub fn on_change(&self, listener: impl Fn(&SelectionChange) + 'static) -> Subscription {
        self.inner.changed.subscribe(listener)
    }

    fn notify(&self, change: SelectionChange) -> bool {
        if change.is_empty() {
            return false;
        }
        log::debug!(
            "Selection changed: +{} -{}",
            change.added.len(),
            change.removed.len()
        );
        self.inner.changed.emit(&change);
        true
    }
}

impl IntoIterator for &LiveSelection {
    type Item = ElementId;
    type IntoIter = std::vec::IntoIter<ElementId>;

    fn into_iter(self) -> Self::IntoIter {
        self.members().into_iter()
    }
}

impl fmt::Debug for LiveSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.members.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use uuid::Uuid;

    fn counting(selection: &LiveSelection) -> (Rc<Cell<usize>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let sub = selection.on_change(move |_| c.set(c.get() + 1));
        (count, sub)
    }

    #[test]
    fn test_add_and_remove_notify_once_each() {
        let selection = LiveSelection::new();
        let (count, _sub) = counting(&selection);
        let id = Uuid::new_v4();

        assert!(selection.add(id));
        assert!(selection.contains(id));
        assert!(selection.remove(id));
        assert!(selection.is_empty());
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_batch_add_notifies_once() {
        let selection = LiveSelection::new();
        let (count, _sub) = counting(&selection);

        selection.add_all([Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()]);
        assert_eq!(selection.len(), 3);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_no_op_changes_do_not_notify() {
        let selection = LiveSelection::new();
        let id = Uuid::new_v4();
        selection.add(id);
        let (count, _sub) = counting(&selection);

        assert!(!selection.add(id));
        assert!(!selection.remove(Uuid::new_v4()));
        assert!(!selection.replace([id]));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_members_keep_insertion_order() {
        let selection = LiveSelection::new();
        let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        selection.add_all(ids);
        assert_eq!(selection.members(), ids.to_vec());
        assert_eq!((&selection).into_iter().collect::<Vec<_>>(), ids.to_vec());
    }

    #[test]
    fn test_replace_reports_added_and_removed() {
        let selection = LiveSelection::new();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        selection.add_all([a, b]);

        let seen = Rc::new(RefCell::new(None));
        let s = Rc::clone(&seen);
        let _sub = selection.on_change(move |change| *s.borrow_mut() = Some(change.clone()));

        selection.replace([b, c]);
        let change = seen.borrow().clone().unwrap();
        assert_eq!(change.added, vec![c]);
        assert_eq!(change.removed, vec![a]);
        assert_eq!(selection.members(), vec![b, c]);
    }

    #[test]
    fn test_listener_can_read_members() {
        let selection = LiveSelection::new();
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let handle = selection.clone();
        let _sub = selection.on_change(move |_| s.set(handle.len()));

        selection.add_all([Uuid::new_v4(), Uuid::new_v4()]);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_clear_on_empty_selection_is_silent() {
        let selection = LiveSelection::new();
        let (count, _sub) = counting(&selection);
        assert!(!selection.clear());
        assert_eq!(count.get(), 0);
    }
}
