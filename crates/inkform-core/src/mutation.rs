//! Drawing mutation observation.
//!
//! The drawing records a [`MutationRecord`] for every change made through it.
//! The host delivers the accumulated records in one batch per
//! [`MutationHub::flush`], after its current handler has finished. Each
//! [`MutationWatcher`] looks at the batch through its own filter and runs its
//! callback at most once per batch, and only while its control is mounted.

use crate::drawing::Drawing;
use crate::element::ElementId;
use crate::event::{EventChannel, Subscription};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A single change made to the drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    /// An attribute of `target` was written.
    Attribute { target: ElementId, name: String },
    /// The text content of `target` was written.
    CharacterData { target: ElementId },
    /// Elements were added, removed or reordered.
    ChildList {
        added: Vec<ElementId>,
        removed: Vec<ElementId>,
    },
    /// The whole drawing was replaced (undo, redo, load).
    Replaced,
}

/// Which mutations a watcher cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationFilter {
    /// Writes to any of the named attributes.
    Attributes(Vec<String>),
    /// Writes to text content.
    CharacterData,
    /// Element additions, removals and reordering.
    ChildList,
}

impl MutationFilter {
    /// Filter for writes to the given attributes.
    pub fn attributes<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Attributes(names.into_iter().map(Into::into).collect())
    }

    /// Check if a record passes this filter. `Replaced` passes every filter.
    pub fn matches(&self, record: &MutationRecord) -> bool {
        match (self, record) {
            (_, MutationRecord::Replaced) => true,
            (Self::Attributes(names), MutationRecord::Attribute { name, .. }) => {
                names.iter().any(|n| n == name)
            }
            (Self::CharacterData, MutationRecord::CharacterData { .. }) => true,
            (Self::ChildList, MutationRecord::ChildList { .. }) => true,
            _ => false,
        }
    }
}

/// Whether a control is currently part of the visible panel.
///
/// Cloning yields another handle to the same flag, so a panel can hand one
/// mount to all of its bindings and open or close them together.
#[derive(Debug, Clone, Default)]
pub struct Mount(Rc<Cell<bool>>);

impl Mount {
    /// A mount that starts detached.
    pub fn detached() -> Self {
        Self::default()
    }

    /// A mount that starts attached.
    pub fn attached() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    /// Check if the control is attached.
    pub fn is_mounted(&self) -> bool {
        self.0.get()
    }

    /// Attach or detach the control.
    pub fn set_mounted(&self, mounted: bool) {
        self.0.set(mounted);
    }
}

/// Delivers batches of drawing mutations to watchers.
#[derive(Debug, Clone, Default)]
pub struct MutationHub {
    channel: EventChannel<Vec<MutationRecord>>,
}

impl MutationHub {
    /// Create a hub with no watchers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for every delivered batch.
    pub fn observe(&self, listener: impl Fn(&Vec<MutationRecord>) + 'static) -> Subscription {
        self.channel.subscribe(listener)
    }

    /// Deliver a batch. Empty batches are dropped.
    pub fn deliver(&self, batch: Vec<MutationRecord>) {
        if batch.is_empty() {
            return;
        }
        log::trace!("Delivering {} mutation records", batch.len());
        self.channel.emit(&batch);
    }

    /// Take the drawing's pending records and deliver them as one batch.
    ///
    /// The drawing is only borrowed while the records are taken, so watchers
    /// are free to read it. Returns the number of records delivered.
    pub fn flush(&self, drawing: &RefCell<Drawing>) -> usize {
        let batch = drawing.borrow_mut().take_mutations();
        let count = batch.len();
        self.deliver(batch);
        count
    }

    /// Number of active watchers.
    pub fn watcher_count(&self) -> usize {
        self.channel.listener_count()
    }
}

/// Runs a callback when a matching mutation is delivered while mounted.
#[derive(Debug)]
pub struct MutationWatcher {
    filter: MutationFilter,
    subscription: Option<Subscription>,
}

impl MutationWatcher {
    /// Start watching `hub` for records passing `filter`.
    pub fn new(
        hub: &MutationHub,
        filter: MutationFilter,
        mount: Mount,
        on_mutation: impl Fn() + 'static,
    ) -> Self {
        let gate = filter.clone();
        let subscription = hub.observe(move |batch| {
            if !batch.iter().any(|record| gate.matches(record)) {
                return;
            }
            if mount.is_mounted() {
                on_mutation();
            } else {
                log::trace!("Skipping refresh for detached control");
            }
        });
        Self {
            filter,
            subscription: Some(subscription),
        }
    }

    /// The filter this watcher was created with.
    pub fn filter(&self) -> &MutationFilter {
        &self.filter
    }

    /// Check if the watcher is still registered.
    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Stop watching. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.dispose();
        }
    }
}
