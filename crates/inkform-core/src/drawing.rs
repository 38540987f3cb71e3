//! The drawing being edited.

use crate::accessors::is_bold;
use crate::element::{Element, ElementId, ElementKind};
use crate::error::{InkformError, Result};
use crate::mutation::MutationRecord;
use crate::undo::{CheckpointToken, UndoLog};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Default number of undo states to keep.
pub const DEFAULT_UNDO_HISTORY: usize = 50;

/// Attribute holding a numbering's displacement, written on every
/// displacement change so watchers can observe it.
pub const DISPLACEMENT_ATTRIBUTE: &str = "data-displacement";

/// Attribute name under which changes to the drawing's name are reported.
pub const NAME_ATTRIBUTE: &str = "data-name";

/// Font size of base text without a `font-size` attribute.
pub const DEFAULT_FONT_SIZE: f64 = 9.0;

/// A snapshot of drawing state for undo/redo.
#[derive(Debug, Clone)]
struct DrawingSnapshot {
    token: CheckpointToken,
    name: String,
    elements: HashMap<ElementId, Element>,
    z_order: Vec<ElementId>,
}

fn default_history_limit() -> usize {
    DEFAULT_UNDO_HISTORY
}

/// A drawing: its elements, their stacking order, and its undo history.
///
/// Every change made through a `Drawing` is recorded as a
/// [`MutationRecord`]; the host hands them to the panel with
/// [`MutationHub::flush`](crate::MutationHub::flush).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drawing {
    /// Unique drawing identifier. Mutations of the drawing itself (its
    /// name) are reported with this as their target.
    pub id: ElementId,
    name: String,
    elements: HashMap<ElementId, Element>,
    /// Stacking order (back to front).
    z_order: Vec<ElementId>,
    #[serde(skip)]
    undo_stack: Vec<DrawingSnapshot>,
    #[serde(skip)]
    redo_stack: Vec<DrawingSnapshot>,
    #[serde(skip)]
    pending: Vec<MutationRecord>,
    #[serde(skip, default = "default_history_limit")]
    history_limit: usize,
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new()
    }
}

impl Drawing {
    /// Create a new empty drawing.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Untitled".to_string(),
            elements: HashMap::new(),
            z_order: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pending: Vec::new(),
            history_limit: DEFAULT_UNDO_HISTORY,
        }
    }

    /// Set how many undo states are kept (at least one).
    pub fn set_history_limit(&mut self, limit: usize) {
        self.history_limit = limit.max(1);
        self.trim_history();
    }

    fn trim_history(&mut self) {
        if self.undo_stack.len() > self.history_limit {
            let excess = self.undo_stack.len() - self.history_limit;
            self.undo_stack.drain(..excess);
        }
    }

    fn snapshot(&self) -> DrawingSnapshot {
        DrawingSnapshot {
            token: CheckpointToken::fresh(),
            name: self.name.clone(),
            elements: self.elements.clone(),
            z_order: self.z_order.clone(),
        }
    }

    fn restore(&mut self, snapshot: DrawingSnapshot) {
        self.name = snapshot.name;
        self.elements = snapshot.elements;
        self.z_order = snapshot.z_order;
        self.pending.push(MutationRecord::Replaced);
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(snapshot) = self.undo_stack.pop() {
            let current = self.snapshot();
            self.redo_stack.push(current);
            self.restore(snapshot);
            true
        } else {
            false
        }
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        if let Some(snapshot) = self.redo_stack.pop() {
            let current = self.snapshot();
            self.undo_stack.push(current);
            self.restore(snapshot);
            true
        } else {
            false
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo states held.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Take every mutation recorded since the last call.
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.pending)
    }

    /// Check if there are mutations waiting to be delivered.
    pub fn has_pending_mutations(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Add an element on top of the stack and place it.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.z_order.push(id);
        self.elements.insert(id, element);
        self.pending.push(MutationRecord::ChildList {
            added: vec![id],
            removed: Vec::new(),
        });
        if let Err(e) = self.reposition(id) {
            log::warn!("Could not place element {}: {}", id, e);
        }
        id
    }

    /// Remove an element from the drawing.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let removed = self.elements.remove(&id)?;
        self.z_order.retain(|&eid| eid != id);
        self.pending.push(MutationRecord::ChildList {
            added: Vec::new(),
            removed: vec![id],
        });
        Some(removed)
    }

    /// Get an element by ID.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        self.elements
            .get_mut(&id)
            .ok_or(InkformError::ElementNotFound(id))
    }

    /// Check if an element exists.
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Get elements in stacking order (back to front).
    pub fn elements_ordered(&self) -> impl Iterator<Item = &Element> {
        self.z_order.iter().filter_map(|id| self.elements.get(id))
    }

    /// IDs of every element of a kind, back to front.
    pub fn elements_of_kind(&self, kind: ElementKind) -> Vec<ElementId> {
        self.elements_ordered()
            .filter(|e| e.kind == kind)
            .map(|e| e.id)
            .collect()
    }

    /// Stacking order (back to front).
    pub fn z_order(&self) -> &[ElementId] {
        &self.z_order
    }

    /// The drawing's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the drawing.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.pending.push(MutationRecord::Attribute {
            target: self.id,
            name: NAME_ATTRIBUTE.to_string(),
        });
    }

    /// Check if the drawing holds any elements.
    pub fn has_elements(&self) -> bool {
        !self.elements.is_empty()
    }

    /// Get the number of elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Get an attribute of an element.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements.get(&id)?.attribute(name)
    }

    /// Set an attribute of an element.
    ///
    /// A mutation is recorded even when the value does not change.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) -> Result<()> {
        self.element_mut(id)?
            .attributes
            .insert(name.to_string(), value.to_string());
        self.pending.push(MutationRecord::Attribute {
            target: id,
            name: name.to_string(),
        });
        Ok(())
    }

    /// Remove an attribute of an element.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) -> Result<()> {
        if self.element_mut(id)?.attributes.remove(name).is_some() {
            self.pending.push(MutationRecord::Attribute {
                target: id,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Get the text content of an element.
    pub fn text_content(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).map(|e| e.text_content.as_str())
    }

    /// Set the text content of an element.
    pub fn set_text_content(&mut self, id: ElementId, text: &str) -> Result<()> {
        self.element_mut(id)?.text_content = text.to_string();
        self.pending.push(MutationRecord::CharacterData { target: id });
        Ok(())
    }

    /// Get a numbering's displacement from its base.
    pub fn displacement(&self, id: ElementId) -> Option<Vec2> {
        self.elements
            .get(&id)
            .filter(|e| e.kind == ElementKind::Numbering)
            .map(|e| e.displacement)
    }

    /// Set a numbering's displacement and move it accordingly.
    pub fn set_displacement(&mut self, id: ElementId, displacement: Vec2) -> Result<()> {
        let element = self.element_mut(id)?;
        if element.kind != ElementKind::Numbering {
            return Err(InkformError::MissingProperty {
                id,
                what: "displacement",
            });
        }
        element.displacement = displacement;
        let encoded = format!(
            "{},{}",
            format_number(displacement.x),
            format_number(displacement.y)
        );
        self.set_attribute(id, DISPLACEMENT_ATTRIBUTE, &encoded)?;
        self.reposition(id)
    }

    /// Get the center point of a base.
    pub fn center(&self, id: ElementId) -> Option<Point> {
        self.elements
            .get(&id)
            .filter(|e| e.kind == ElementKind::Base)
            .map(|e| e.center)
    }

    /// Approximate size of a base's text from its content, font size and
    /// weight.
    pub fn text_size(&self, id: ElementId) -> Option<Size> {
        let base = self
            .elements
            .get(&id)
            .filter(|e| e.kind == ElementKind::Base)?;
        let font_size = base
            .attribute("font-size")
            .and_then(|v| v.trim().trim_end_matches("px").parse::<f64>().ok())
            .unwrap_or(DEFAULT_FONT_SIZE);
        // Bold glyphs run wider
        let char_width_factor = if is_bold(base.attribute("font-weight")) {
            0.60
        } else {
            0.55
        };
        let chars = base.text_content.chars().count() as f64;
        Some(Size::new(
            chars * font_size * char_width_factor,
            font_size * 1.2,
        ))
    }

    /// Anchor a base's text (`x`, `y` at the bottom left of its glyph box)
    /// so the glyphs stay centered on the base's center.
    pub fn center_text(&mut self, id: ElementId) -> Result<()> {
        let (Some(center), Some(size)) = (self.center(id), self.text_size(id)) else {
            return Err(InkformError::MissingProperty { id, what: "center" });
        };
        let x = center.x - size.width / 2.0;
        let y = center.y + size.height / 2.0;
        self.set_attribute(id, "x", &format_number(x))?;
        self.set_attribute(id, "y", &format_number(y))
    }

    /// Where a numbering sits: its base's center plus its displacement.
    fn numbering_position(&self, numbering: &Element) -> Option<Point> {
        let base = *numbering.owners.first()?;
        Some(self.center(base)? + numbering.displacement)
    }

    /// Recompute the geometry attributes that depend on an element's owners
    /// and padding values.
    ///
    /// Bases are positioned by their own center and need no work; elements
    /// whose owners are missing are left where they are.
    pub fn reposition(&mut self, id: ElementId) -> Result<()> {
        let element = self
            .elements
            .get(&id)
            .ok_or(InkformError::ElementNotFound(id))?;

        let updates: Vec<(&'static str, f64)> = match element.kind {
            ElementKind::Base => Vec::new(),
            ElementKind::Numbering => match self.numbering_position(element) {
                Some(p) => vec![("x", p.x), ("y", p.y)],
                None => Vec::new(),
            },
            ElementKind::Outline => match element.owners.first().and_then(|&b| self.center(b)) {
                Some(c) => vec![("cx", c.x), ("cy", c.y)],
                None => Vec::new(),
            },
            ElementKind::PrimaryBond | ElementKind::SecondaryBond => {
                let ends = (
                    element.owners.first().and_then(|&b| self.center(b)),
                    element.owners.get(1).and_then(|&b| self.center(b)),
                );
                match ends {
                    (Some(c1), Some(c2)) => padded_segment(
                        c1,
                        c2,
                        element.numeric_attribute("data-base-padding1"),
                        element.numeric_attribute("data-base-padding2"),
                    ),
                    _ => Vec::new(),
                }
            }
            ElementKind::NumberingLine => {
                let numbering = element.owners.first().and_then(|&n| self.elements.get(&n));
                let ends = numbering.and_then(|n| {
                    let base = n.owners.first().and_then(|&b| self.center(b))?;
                    Some((base, self.numbering_position(n)?))
                });
                match ends {
                    Some((base, label)) => padded_segment(
                        base,
                        label,
                        element.numeric_attribute("data-base-padding"),
                        element.numeric_attribute("data-text-padding"),
                    ),
                    None => Vec::new(),
                }
            }
        };

        for (name, value) in updates {
            self.set_attribute(id, name, &format_number(value))?;
        }
        Ok(())
    }

    /// Bring an element to the front (topmost).
    pub fn bring_to_front(&mut self, id: ElementId) {
        if !self.contains(id) {
            return;
        }
        self.z_order.retain(|&eid| eid != id);
        self.z_order.push(id);
        self.pending.push(MutationRecord::ChildList {
            added: vec![id],
            removed: vec![id],
        });
    }

    /// Send an element to the back (bottommost).
    pub fn send_to_back(&mut self, id: ElementId) {
        if !self.contains(id) {
            return;
        }
        self.z_order.retain(|&eid| eid != id);
        self.z_order.insert(0, id);
        self.pending.push(MutationRecord::ChildList {
            added: vec![id],
            removed: vec![id],
        });
    }

    /// Serialize the drawing to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a drawing from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl UndoLog for Drawing {
    /// Push current state to undo stack (call before making changes).
    fn push_checkpoint(&mut self) {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);

        // Clear redo stack when new changes are made
        self.redo_stack.clear();
        self.trim_history();
        log::info!("Undo checkpoint pushed ({} held)", self.undo_stack.len());
    }

    fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    fn peek(&self) -> Option<CheckpointToken> {
        self.undo_stack.last().map(|s| s.token)
    }
}

/// Segment from `a` to `b` shortened by `pad_a` and `pad_b` at either end,
/// as `x1, y1, x2, y2` attribute updates.
fn padded_segment(a: Point, b: Point, pad_a: f64, pad_b: f64) -> Vec<(&'static str, f64)> {
    let delta = b - a;
    let length = delta.hypot();
    let direction = if length > 0.0 { delta / length } else { Vec2::ZERO };
    let start = a + direction * pad_a;
    let end = b - direction * pad_b;
    vec![("x1", start.x), ("y1", start.y), ("x2", end.x), ("y2", end.y)]
}

/// Format a number the way it is written into attributes and shown in
/// numeric fields (`12`, not `12.0`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // avoids "-0"
        return "0".to_string();
    }
    format!("{}", value)
}
