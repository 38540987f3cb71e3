//! Bindings between one control and a live selection.
//!
//! A [`Binding`] keeps a control showing the consensus value of one property
//! across the selected elements, and writes the control's value back to
//! every selected element when the user edits it.
//!
//! ```text
//! selection change ─┐
//!                   ├─▶ refresh ─▶ consensus ─▶ control
//! drawing mutation ─┘
//!
//! user edit ─▶ parse ─▶ diff ─▶ checkpoint ─▶ write all ─▶ after-edit hook ─▶ refresh
//! ```

use crate::consensus::{ConsensusError, consensus};
use crate::drawing::Drawing;
use crate::element::ElementId;
use crate::error::Result;
use crate::event::Subscription;
use crate::mutation::{Mount, MutationFilter, MutationHub, MutationWatcher};
use crate::selection::LiveSelection;
use crate::undo::CheckpointPolicy;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// The raw value held by a control.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlValue {
    /// Text inputs and color inputs.
    Text(String),
    /// Checkboxes.
    Checked(bool),
}

impl ControlValue {
    /// Text of a text value, empty for checkboxes.
    pub fn as_text(&self) -> &str {
        match self {
            ControlValue::Text(text) => text,
            ControlValue::Checked(_) => "",
        }
    }

    /// State of a checkbox value, false for text.
    pub fn is_checked(&self) -> bool {
        matches!(self, ControlValue::Checked(true))
    }
}

/// A form control: a value sink with a focus flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    value: ControlValue,
    focused: bool,
    /// Value held when the control last gained focus.
    focus_value: Option<ControlValue>,
    /// The user changed the value since it last showed the consensus.
    edited: bool,
}

impl Control {
    /// An empty text input.
    pub fn text() -> Self {
        Self::with_value(ControlValue::Text(String::new()))
    }

    /// An unchecked checkbox.
    pub fn checkbox() -> Self {
        Self::with_value(ControlValue::Checked(false))
    }

    fn with_value(value: ControlValue) -> Self {
        Self {
            value,
            focused: false,
            focus_value: None,
            edited: false,
        }
    }

    /// The value currently shown.
    pub fn value(&self) -> &ControlValue {
        &self.value
    }

    /// Check if the user is editing this control.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Check if the shown value is user input not yet applied.
    pub fn is_edited(&self) -> bool {
        self.edited
    }

    fn set_input(&mut self, value: ControlValue) {
        self.edited = self.focus_value.as_ref() != Some(&value);
        self.value = value;
    }

    fn release_focus(&mut self) {
        self.focused = false;
        self.focus_value = None;
    }
}

/// How a binding reads, parses, writes and shows one property.
pub trait Accessor {
    /// Normalized property value.
    type Value: Clone + PartialEq + fmt::Debug;

    /// Read the property from an element. `None` means the element has no
    /// usable value; it agrees only with other `None`s.
    fn read(&self, drawing: &Drawing, id: ElementId) -> Option<Self::Value>;

    /// Write the property to an element.
    fn write(&self, drawing: &mut Drawing, id: ElementId, value: &Self::Value) -> Result<()>;

    /// Normalize raw control input. `None` rejects the input.
    fn parse(&self, raw: &ControlValue) -> Option<Self::Value>;

    /// What the control shows for a consensus value, or for no consensus.
    fn display(&self, value: Option<&Self::Value>) -> ControlValue;

    /// Mutations that can change what [`read`](Self::read) returns.
    fn filter(&self) -> MutationFilter;

    /// The control this property is edited with.
    fn control(&self) -> Control {
        Control::text()
    }
}

/// What happened to an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The value was written to every selected element.
    Applied {
        /// Whether an undo checkpoint was pushed for this edit.
        checkpoint: bool,
        /// Number of elements written.
        count: usize,
    },
    /// Every selected element already had the value.
    Unchanged,
    /// The input was rejected by the accessor.
    Invalid,
    /// Nothing is selected.
    EmptySelection,
    /// Continuous input that only echoed the value held on focus.
    Ignored,
}

impl EditOutcome {
    /// Check if the edit changed the drawing.
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied { .. })
    }
}

/// Side effect run after every applied edit with the edited element ids.
pub type EditHook = Box<dyn Fn(&mut Drawing, &[ElementId])>;

/// What every binding in a panel shares.
#[derive(Debug, Clone)]
pub struct BindingContext {
    /// The drawing being edited; also its undo log.
    pub drawing: Rc<RefCell<Drawing>>,
    /// Where the drawing's mutations are delivered.
    pub hub: MutationHub,
    /// Whether the panel's controls are visible.
    pub mount: Mount,
}

impl BindingContext {
    /// Bundle a drawing, its mutation hub and a mount.
    pub fn new(drawing: Rc<RefCell<Drawing>>, hub: MutationHub, mount: Mount) -> Self {
        Self {
            drawing,
            hub,
            mount,
        }
    }
}

struct BindingInner<A: Accessor> {
    accessor: A,
    drawing: Rc<RefCell<Drawing>>,
    selection: LiveSelection,
    mount: Mount,
    control: RefCell<Control>,
    policy: RefCell<CheckpointPolicy>,
    after_edit: RefCell<Option<EditHook>>,
}

impl<A: Accessor> BindingInner<A> {
    fn consensus(&self) -> std::result::Result<Option<A::Value>, ConsensusError> {
        let drawing = self.drawing.borrow();
        consensus(
            self.selection
                .members()
                .into_iter()
                .map(|id| self.accessor.read(&drawing, id)),
        )
    }

    /// Write the consensus display into the control, even while focused.
    ///
    /// A focused control adopts the new display as its focus value, so the
    /// user's session continues from what is now shown.
    fn sync(&self) {
        let resolved = self.consensus().ok().flatten();
        let shown = self.accessor.display(resolved.as_ref());
        let mut control = self.control.borrow_mut();
        if control.focused {
            control.focus_value = Some(shown.clone());
        }
        control.value = shown;
        control.edited = false;
    }

    /// Refresh in response to an outside change; leaves a control holding
    /// unapplied user input alone so it is not clobbered.
    fn refresh(&self) {
        let control = self.control.borrow();
        if control.focused && control.edited {
            log::trace!("Refresh deferred while control holds unapplied input");
            return;
        }
        drop(control);
        self.sync();
    }

    /// Apply the control's value if the user edited it; otherwise just
    /// catch the control up with the selection.
    fn apply_edits(&self) -> EditOutcome {
        let (edited, raw) = {
            let control = self.control.borrow();
            (control.edited, control.value.clone())
        };
        if !edited {
            self.sync();
            return EditOutcome::Unchanged;
        }
        self.commit(raw)
    }

    fn commit(&self, raw: ControlValue) -> EditOutcome {
        let Some(value) = self.accessor.parse(&raw) else {
            log::debug!("Rejected input {:?}", raw);
            self.sync();
            return EditOutcome::Invalid;
        };

        let members = self.selection.members();
        if members.is_empty() {
            self.sync();
            return EditOutcome::EmptySelection;
        }

        let unchanged = {
            let drawing = self.drawing.borrow();
            members
                .iter()
                .all(|&id| self.accessor.read(&drawing, id).as_ref() == Some(&value))
        };
        if unchanged {
            log::debug!("Skipping edit to {:?}: nothing differs", value);
            self.sync();
            return EditOutcome::Unchanged;
        }

        let checkpoint = {
            let mut drawing = self.drawing.borrow_mut();
            let checkpoint = self.policy.borrow_mut().checkpoint(&mut *drawing);
            for &id in &members {
                if let Err(e) = self.accessor.write(&mut *drawing, id, &value) {
                    log::warn!("Failed to write {:?} to {}: {}", value, id, e);
                }
            }
            if let Some(hook) = self.after_edit.borrow().as_ref() {
                hook(&mut *drawing, members.as_slice());
            }
            checkpoint
        };
        log::debug!(
            "Applied {:?} to {} elements (checkpoint: {})",
            value,
            members.len(),
            checkpoint
        );

        self.sync();
        EditOutcome::Applied {
            checkpoint,
            count: members.len(),
        }
    }
}

/// One control bound to one property of a live selection.
///
/// The binding listens to its selection and to drawing mutations passing its
/// accessor's filter, refreshing only while its mount is attached. Dropping
/// the binding (or calling [`dispose`](Self::dispose)) stops both.
pub struct Binding<A: Accessor> {
    inner: Rc<BindingInner<A>>,
    selection_subscription: Option<Subscription>,
    watcher: MutationWatcher,
}

impl<A: Accessor + 'static> Binding<A> {
    /// Bind `accessor` over `selection`, checkpointing edits per `policy`.
    pub fn new(
        context: &BindingContext,
        selection: LiveSelection,
        accessor: A,
        policy: CheckpointPolicy,
    ) -> Self {
        let control = accessor.control();
        let filter = accessor.filter();
        let inner = Rc::new(BindingInner {
            accessor,
            drawing: Rc::clone(&context.drawing),
            selection: selection.clone(),
            mount: context.mount.clone(),
            control: RefCell::new(control),
            policy: RefCell::new(policy),
            after_edit: RefCell::new(None),
        });

        let weak: Weak<BindingInner<A>> = Rc::downgrade(&inner);
        let selection_subscription = selection.on_change(move |_| {
            let Some(inner) = weak.upgrade() else { return };
            // a new selection starts a new gesture
            inner.policy.borrow_mut().reset();
            if inner.mount.is_mounted() {
                inner.refresh();
            }
        });

        let weak: Weak<BindingInner<A>> = Rc::downgrade(&inner);
        let watcher = MutationWatcher::new(&context.hub, filter, context.mount.clone(), move || {
            if let Some(inner) = weak.upgrade() {
                inner.refresh();
            }
        });

        inner.sync();
        Self {
            inner,
            selection_subscription: Some(selection_subscription),
            watcher,
        }
    }

    /// Run `hook` after every applied edit.
    pub fn with_after_edit(self, hook: impl Fn(&mut Drawing, &[ElementId]) + 'static) -> Self {
        *self.inner.after_edit.borrow_mut() = Some(Box::new(hook));
        self
    }
}

impl<A: Accessor> Binding<A> {
    /// The accessor this binding edits through.
    pub fn accessor(&self) -> &A {
        &self.inner.accessor
    }

    /// The selection this binding edits.
    pub fn selection(&self) -> &LiveSelection {
        &self.inner.selection
    }

    /// Consensus of the selected elements' values.
    ///
    /// `Ok(None)` means every element agrees on having no usable value.
    pub fn consensus(&self) -> std::result::Result<Option<A::Value>, ConsensusError> {
        self.inner.consensus()
    }

    /// Snapshot of the control.
    pub fn control(&self) -> Control {
        self.inner.control.borrow().clone()
    }

    /// The value the control is showing.
    pub fn value(&self) -> ControlValue {
        self.inner.control.borrow().value.clone()
    }

    /// Recompute the control's display from the selection.
    pub fn refresh(&self) {
        self.inner.refresh();
    }

    /// The user focused the control.
    pub fn focus(&self) {
        let mut control = self.inner.control.borrow_mut();
        control.focused = true;
        control.focus_value = Some(control.value.clone());
        control.edited = false;
    }

    /// The user typed into the control. Nothing is applied until
    /// [`submit`](Self::submit) or [`blur`](Self::blur).
    pub fn edit_text(&self, text: &str) {
        self.inner
            .control
            .borrow_mut()
            .set_input(ControlValue::Text(text.to_string()));
    }

    /// Apply the control's current value (e.g. on Enter).
    ///
    /// A control the user has not typed into only re-syncs, so a stale
    /// display is never written back.
    pub fn submit(&self) -> EditOutcome {
        self.inner.apply_edits()
    }

    /// The control lost focus: leave the editing state and submit.
    pub fn blur(&self) -> EditOutcome {
        self.inner.control.borrow_mut().release_focus();
        self.inner.apply_edits()
    }

    /// Continuous input (a color picker or slider moved).
    ///
    /// Input that merely repeats the value held on focus is ignored, since
    /// some pickers emit one when they open.
    pub fn input(&self, value: ControlValue) -> EditOutcome {
        {
            let mut control = self.inner.control.borrow_mut();
            if control.focus_value.as_ref() == Some(&value) {
                return EditOutcome::Ignored;
            }
            control.value = value.clone();
            control.edited = true;
        }
        self.inner.commit(value)
    }

    /// A checkbox was clicked. Focus is released afterwards so the host's
    /// key bindings keep working.
    pub fn toggle(&self, checked: bool) -> EditOutcome {
        let raw = ControlValue::Checked(checked);
        {
            let mut control = self.inner.control.borrow_mut();
            control.value = raw.clone();
            control.edited = true;
        }
        let outcome = self.inner.commit(raw);
        self.inner.control.borrow_mut().release_focus();
        outcome
    }

    /// Stop listening to the selection and the drawing.
    pub fn dispose(&mut self) {
        if let Some(subscription) = self.selection_subscription.take() {
            subscription.dispose();
        }
        self.watcher.dispose();
    }

    /// Check if the binding still listens for changes.
    pub fn is_active(&self) -> bool {
        self.selection_subscription.is_some() && self.watcher.is_active()
    }
}

/// Object-safe view of a binding, for panels holding many kinds of field.
pub trait BoundControl {
    fn refresh(&self);
    fn control(&self) -> Control;
    fn value(&self) -> ControlValue;
    fn focus(&self);
    fn edit_text(&self, text: &str);
    fn submit(&self) -> EditOutcome;
    fn blur(&self) -> EditOutcome;
    fn input(&self, value: ControlValue) -> EditOutcome;
    fn toggle(&self, checked: bool) -> EditOutcome;
    fn dispose(&mut self);
}

impl<A: Accessor> BoundControl for Binding<A> {
    fn refresh(&self) {
        Binding::refresh(self)
    }

    fn control(&self) -> Control {
        Binding::control(self)
    }

    fn value(&self) -> ControlValue {
        Binding::value(self)
    }

    fn focus(&self) {
        Binding::focus(self)
    }

    fn edit_text(&self, text: &str) {
        Binding::edit_text(self, text)
    }

    fn submit(&self) -> EditOutcome {
        Binding::submit(self)
    }

    fn blur(&self) -> EditOutcome {
        Binding::blur(self)
    }

    fn input(&self, value: ControlValue) -> EditOutcome {
        Binding::input(self, value)
    }

    fn toggle(&self, checked: bool) -> EditOutcome {
        Binding::toggle(self, checked)
    }

    fn dispose(&mut self) {
        Binding::dispose(self)
    }
}

impl<A: Accessor> fmt::Debug for Binding<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("control", &self.inner.control.borrow())
            .field("selection", &self.inner.selection)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessors::{ColorAttribute, Displacement, FlagAttribute, TextContent};
    use crate::element::{DisplacementParam, Element};
    use kurbo::{Point, Vec2};
    use std::cell::Cell;

    struct Fixture {
        context: BindingContext,
        selection: LiveSelection,
        bases: Vec<ElementId>,
    }

    impl Fixture {
        fn new(fills: &[&str]) -> Self {
            let mut drawing = Drawing::new();
            let bases = fills
                .iter()
                .enumerate()
                .map(|(i, fill)| {
                    drawing.add_element(
                        Element::base("A", Point::new(i as f64 * 20.0, 0.0))
                            .with_attribute("fill", *fill),
                    )
                })
                .collect::<Vec<_>>();
            drawing.take_mutations();

            let selection = LiveSelection::new();
            selection.add_all(bases.iter().copied());
            Self {
                context: BindingContext::new(
                    Rc::new(RefCell::new(drawing)),
                    MutationHub::new(),
                    Mount::attached(),
                ),
                selection,
                bases,
            }
        }

        fn fill(&self, policy: CheckpointPolicy) -> Binding<ColorAttribute> {
            Binding::new(
                &self.context,
                self.selection.clone(),
                ColorAttribute::new("fill"),
                policy,
            )
        }

        fn flush(&self) -> usize {
            self.context.hub.flush(&self.context.drawing)
        }

        fn undo_depth(&self) -> usize {
            self.context.drawing.borrow().undo_depth()
        }

        fn fill_of(&self, id: ElementId) -> Option<String> {
            self.context
                .drawing
                .borrow()
                .attribute(id, "fill")
                .map(str::to_string)
        }
    }

    fn text(value: &str) -> ControlValue {
        ControlValue::Text(value.to_string())
    }

    #[test]
    fn test_agreeing_colors_show_consensus() {
        let fixture = Fixture::new(&["#FF0000", "#ff0000"]);
        let binding = fixture.fill(CheckpointPolicy::continuous());
        assert_eq!(binding.value(), text("#ff0000"));
        assert_eq!(binding.consensus(), Ok(Some("#ff0000".to_string())));
    }

    #[test]
    fn test_disagreeing_colors_show_neutral() {
        let fixture = Fixture::new(&["#ff0000", "#00ff00"]);
        let binding = fixture.fill(CheckpointPolicy::continuous());
        assert_eq!(binding.value(), text("#000000"));
        assert_eq!(binding.consensus(), Err(ConsensusError::Indeterminate));
    }

    #[test]
    fn test_joining_member_with_other_fill_turns_neutral() {
        let fixture = Fixture::new(&["#ff0000", "#ff0000"]);
        let binding = fixture.fill(CheckpointPolicy::continuous());
        assert_eq!(binding.value(), text("#ff0000"));

        let base3 = fixture.context.drawing.borrow_mut().add_element(
            Element::base("C", Point::new(40.0, 0.0)).with_attribute("fill", "#00ff00"),
        );
        fixture.selection.add(base3);
        assert_eq!(binding.value(), text("#000000"));
    }

    #[test]
    fn test_color_drag_pushes_once() {
        let fixture = Fixture::new(&["#0000ff", "#0000ff"]);
        let binding = fixture.fill(CheckpointPolicy::continuous());
        fixture.flush();

        binding.focus();
        let applied = ["#ff0000", "#ee0000", "#dd0000"]
            .iter()
            .map(|v| binding.input(text(v)))
            .filter(EditOutcome::is_applied)
            .count();

        assert_eq!(applied, 3);
        assert_eq!(fixture.undo_depth(), 1);
        for &id in &fixture.bases {
            assert_eq!(fixture.fill_of(id).as_deref(), Some("#dd0000"));
        }
    }

    #[test]
    fn test_empty_selection_shows_neutral_and_rejects_edits() {
        let fixture = Fixture::new(&["#ff0000"]);
        fixture.selection.clear();
        let binding = fixture.fill(CheckpointPolicy::continuous());

        assert_eq!(binding.value(), text("#000000"));
        assert_eq!(binding.input(text("#00ff00")), EditOutcome::EmptySelection);
        assert_eq!(fixture.undo_depth(), 0);
    }

    #[test]
    fn test_edit_writes_every_member() {
        let fixture = Fixture::new(&["#ff0000", "#00ff00"]);
        let binding = fixture.fill(CheckpointPolicy::continuous());

        let outcome = binding.input(text("#0000FF"));
        assert_eq!(
            outcome,
            EditOutcome::Applied {
                checkpoint: true,
                count: 2
            }
        );
        for &id in &fixture.bases {
            assert_eq!(fixture.fill_of(id).as_deref(), Some("#0000ff"));
        }
        assert_eq!(binding.value(), text("#0000ff"));
    }

    #[test]
    fn test_slider_gesture_pushes_one_checkpoint() {
        let mut drawing = Drawing::new();
        let base = drawing.add_element(Element::base("A", Point::ZERO));
        let numbering = drawing.add_element(Element::numbering(base, 1, Vec2::new(10.0, 0.0)));
        let context = BindingContext::new(
            Rc::new(RefCell::new(drawing)),
            MutationHub::new(),
            Mount::attached(),
        );
        let selection = LiveSelection::new();
        selection.add(numbering);

        let binding = Binding::new(
            &context,
            selection,
            Displacement(DisplacementParam::X),
            CheckpointPolicy::continuous(),
        );
        assert_eq!(binding.value(), text("10"));

        binding.focus();
        let outcomes = ["11", "12", "13"].map(|v| binding.input(text(v)));
        assert!(outcomes.iter().all(EditOutcome::is_applied));
        assert_eq!(
            outcomes[0],
            EditOutcome::Applied {
                checkpoint: true,
                count: 1
            }
        );
        assert_eq!(context.drawing.borrow().undo_depth(), 1);
        assert_eq!(
            context.drawing.borrow().displacement(numbering),
            Some(Vec2::new(13.0, 0.0))
        );

        assert!(context.drawing.borrow_mut().undo());
        assert_eq!(
            context.drawing.borrow().displacement(numbering),
            Some(Vec2::new(10.0, 0.0))
        );
    }

    #[test]
    fn test_magnitude_edit_shows_and_keeps_typed_value() {
        let mut drawing = Drawing::new();
        let base = drawing.add_element(Element::base("A", Point::ZERO));
        let numberings = [Vec2::new(1.0, 1.0), Vec2::new(3.0, 4.0)]
            .map(|d| drawing.add_element(Element::numbering(base, 1, d)));
        let context = BindingContext::new(
            Rc::new(RefCell::new(drawing)),
            MutationHub::new(),
            Mount::attached(),
        );
        let selection = LiveSelection::new();
        selection.add_all(numberings);
        let binding = Binding::new(
            &context,
            selection,
            Displacement(DisplacementParam::Magnitude),
            CheckpointPolicy::discrete(),
        );

        binding.edit_text("7");
        assert!(binding.submit().is_applied());
        assert_eq!(binding.value(), text("7"));

        binding.edit_text("7");
        assert_eq!(binding.submit(), EditOutcome::Unchanged);
        assert_eq!(context.drawing.borrow().undo_depth(), 1);
    }

    #[test]
    fn test_input_echoing_focus_value_is_ignored() {
        let fixture = Fixture::new(&["#ff0000"]);
        let binding = fixture.fill(CheckpointPolicy::continuous());

        binding.focus();
        assert_eq!(binding.input(text("#ff0000")), EditOutcome::Ignored);
        assert_eq!(fixture.undo_depth(), 0);
    }

    #[test]
    fn test_selection_change_starts_new_gesture() {
        let fixture = Fixture::new(&["#ff0000", "#ff0000"]);
        let binding = fixture.fill(CheckpointPolicy::continuous());

        binding.input(text("#00ff00"));
        binding.input(text("#00ffff"));
        assert_eq!(fixture.undo_depth(), 1);

        fixture.selection.remove(fixture.bases[1]);
        binding.input(text("#0000ff"));
        assert_eq!(fixture.undo_depth(), 2);
        assert_eq!(fixture.fill_of(fixture.bases[1]).as_deref(), Some("#00ffff"));
    }

    #[test]
    fn test_intervening_checkpoint_starts_new_gesture() {
        let fixture = Fixture::new(&["#ff0000"]);
        let fill = fixture.fill(CheckpointPolicy::continuous());
        let stroke = Binding::new(
            &fixture.context,
            fixture.selection.clone(),
            ColorAttribute::new("stroke"),
            CheckpointPolicy::discrete(),
        );

        fill.input(text("#00ff00"));
        stroke.input(text("#123456"));
        fill.input(text("#0000ff"));
        assert_eq!(fixture.undo_depth(), 3);
    }

    #[test]
    fn test_whitespace_text_is_rejected() {
        let fixture = Fixture::new(&["#ff0000", "#ff0000"]);
        let binding = Binding::new(
            &fixture.context,
            fixture.selection.clone(),
            TextContent::new(),
            CheckpointPolicy::discrete(),
        );
        assert_eq!(binding.value(), text("A"));

        binding.focus();
        binding.edit_text("   ");
        assert_eq!(binding.submit(), EditOutcome::Invalid);
        assert_eq!(binding.value(), text("A"));
        assert_eq!(fixture.undo_depth(), 0);
        assert!(!fixture.context.drawing.borrow().has_pending_mutations());
    }

    #[test]
    fn test_text_submit_trims_and_checkpoints() {
        let fixture = Fixture::new(&["#ff0000", "#ff0000"]);
        let binding = Binding::new(
            &fixture.context,
            fixture.selection.clone(),
            TextContent::new(),
            CheckpointPolicy::discrete(),
        );

        binding.focus();
        binding.edit_text(" U ");
        assert!(binding.blur().is_applied());
        for &id in &fixture.bases {
            assert_eq!(fixture.context.drawing.borrow().text_content(id), Some("U"));
        }
        assert_eq!(fixture.undo_depth(), 1);
        assert!(!binding.control().is_focused());
    }

    #[test]
    fn test_unchanged_edit_is_a_no_op() {
        let fixture = Fixture::new(&["#ff0000", "#FF0000"]);
        let binding = fixture.fill(CheckpointPolicy::discrete());

        assert_eq!(binding.input(text("#ff0000")), EditOutcome::Unchanged);
        assert_eq!(fixture.undo_depth(), 0);
        assert_eq!(fixture.flush(), 0);
    }

    #[test]
    fn test_outside_mutation_refreshes() {
        let fixture = Fixture::new(&["#ff0000", "#ff0000"]);
        let binding = fixture.fill(CheckpointPolicy::continuous());

        fixture
            .context
            .drawing
            .borrow_mut()
            .set_attribute(fixture.bases[0], "fill", "#00ff00")
            .unwrap();
        assert_eq!(binding.value(), text("#ff0000"));

        fixture.flush();
        assert_eq!(binding.value(), text("#000000"));
    }

    #[test]
    fn test_focused_control_is_not_clobbered() {
        let fixture = Fixture::new(&["#ff0000"]);
        let binding = Binding::new(
            &fixture.context,
            fixture.selection.clone(),
            TextContent::new(),
            CheckpointPolicy::discrete(),
        );

        binding.focus();
        binding.edit_text("G");
        fixture
            .context
            .drawing
            .borrow_mut()
            .set_text_content(fixture.bases[0], "C")
            .unwrap();
        fixture.flush();
        assert_eq!(binding.value(), text("G"));

        assert!(binding.blur().is_applied());
        assert_eq!(binding.value(), text("G"));
    }

    #[test]
    fn test_untouched_focus_follows_selection_change() {
        let fixture = Fixture::new(&["#ff0000"]);
        let g = fixture
            .context
            .drawing
            .borrow_mut()
            .add_element(Element::base("G", Point::new(40.0, 0.0)));
        fixture.context.drawing.borrow_mut().take_mutations();
        let binding = Binding::new(
            &fixture.context,
            fixture.selection.clone(),
            TextContent::new(),
            CheckpointPolicy::discrete(),
        );
        assert_eq!(binding.value(), text("A"));

        binding.focus();
        fixture.selection.replace([g]);
        assert_eq!(binding.value(), text("G"));
        assert!(!binding.control().is_edited());

        assert_eq!(binding.blur(), EditOutcome::Unchanged);
        assert_eq!(fixture.context.drawing.borrow().text_content(g), Some("G"));
        assert_eq!(fixture.undo_depth(), 0);
        assert_eq!(fixture.flush(), 0);
    }

    #[test]
    fn test_blur_after_undo_keeps_undone_value() {
        let fixture = Fixture::new(&["#ff0000"]);
        let base = fixture.bases[0];
        let binding = Binding::new(
            &fixture.context,
            fixture.selection.clone(),
            TextContent::new(),
            CheckpointPolicy::discrete(),
        );

        binding.focus();
        binding.edit_text("U");
        assert!(binding.submit().is_applied());
        fixture.flush();
        assert!(binding.control().is_focused());

        assert!(fixture.context.drawing.borrow_mut().undo());
        fixture.flush();
        assert_eq!(binding.value(), text("A"));

        assert_eq!(binding.blur(), EditOutcome::Unchanged);
        let drawing = fixture.context.drawing.borrow();
        assert_eq!(drawing.text_content(base), Some("A"));
        assert!(drawing.can_redo());
        assert_eq!(drawing.undo_depth(), 0);
    }

    #[test]
    fn test_submit_without_typing_does_not_write_neutral_display() {
        let fixture = Fixture::new(&["#ff0000", "#00ff00"]);
        let binding = Binding::new(
            &fixture.context,
            fixture.selection.clone(),
            crate::accessors::AttributeText::new("fill"),
            CheckpointPolicy::discrete(),
        );
        assert_eq!(binding.value(), text(""));

        binding.focus();
        assert_eq!(binding.submit(), EditOutcome::Unchanged);
        assert_eq!(fixture.fill_of(fixture.bases[0]).as_deref(), Some("#ff0000"));
        assert_eq!(fixture.undo_depth(), 0);
    }

    #[test]
    fn test_detached_binding_does_not_refresh() {
        let fixture = Fixture::new(&["#ff0000"]);
        fixture.context.mount.set_mounted(false);
        let binding = fixture.fill(CheckpointPolicy::continuous());

        fixture
            .context
            .drawing
            .borrow_mut()
            .set_attribute(fixture.bases[0], "fill", "#00ff00")
            .unwrap();
        fixture.flush();
        assert_eq!(binding.value(), text("#ff0000"));

        fixture.context.mount.set_mounted(true);
        binding.refresh();
        assert_eq!(binding.value(), text("#00ff00"));
    }

    #[test]
    fn test_selection_change_refreshes() {
        let fixture = Fixture::new(&["#ff0000", "#00ff00"]);
        let binding = fixture.fill(CheckpointPolicy::continuous());
        assert_eq!(binding.value(), text("#000000"));

        fixture.selection.remove(fixture.bases[0]);
        assert_eq!(binding.value(), text("#00ff00"));
    }

    #[test]
    fn test_after_edit_hook_sees_edited_elements() {
        let fixture = Fixture::new(&["#ff0000", "#ff0000"]);
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let binding = fixture
            .fill(CheckpointPolicy::discrete())
            .with_after_edit(move |_, ids| s.set(s.get() + ids.len()));

        binding.input(text("#00ff00"));
        binding.input(text("#00ff00"));
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_checkbox_toggle_releases_focus() {
        let fixture = Fixture::new(&["#ff0000", "#ff0000"]);
        let binding = Binding::new(
            &fixture.context,
            fixture.selection.clone(),
            FlagAttribute::bold(),
            CheckpointPolicy::discrete(),
        );
        assert_eq!(binding.value(), ControlValue::Checked(false));

        binding.focus();
        assert!(binding.toggle(true).is_applied());
        assert_eq!(binding.value(), ControlValue::Checked(true));
        assert!(!binding.control().is_focused());
        assert_eq!(
            fixture
                .context
                .drawing
                .borrow()
                .attribute(fixture.bases[0], "font-weight"),
            Some("700")
        );
    }

    #[test]
    fn test_dispose_stops_listening() {
        let fixture = Fixture::new(&["#ff0000"]);
        let mut binding = fixture.fill(CheckpointPolicy::continuous());
        assert_eq!(fixture.context.hub.watcher_count(), 1);

        binding.dispose();
        assert!(!binding.is_active());
        assert_eq!(fixture.context.hub.watcher_count(), 0);

        fixture.selection.clear();
        assert_eq!(binding.value(), text("#ff0000"));
    }

    #[test]
    fn test_bound_control_is_object_safe() {
        let fixture = Fixture::new(&["#ff0000"]);
        let controls: Vec<Box<dyn BoundControl>> = vec![
            Box::new(fixture.fill(CheckpointPolicy::continuous())),
            Box::new(Binding::new(
                &fixture.context,
                fixture.selection.clone(),
                TextContent::new(),
                CheckpointPolicy::discrete(),
            )),
        ];
        assert_eq!(controls[0].value(), text("#ff0000"));
        assert_eq!(controls[1].value(), text("A"));
    }
}
