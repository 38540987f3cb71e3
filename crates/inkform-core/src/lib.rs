//! Inkform Core Library
//!
//! Platform-agnostic core of the inkform property panel: live selections,
//! consensus over selected elements, drawing mutation watching, undo
//! coalescing and the bindings that tie a control to a selection.

pub mod accessors;
pub mod binding;
pub mod color;
pub mod config;
pub mod consensus;
pub mod drawing;
pub mod element;
pub mod error;
pub mod event;
pub mod mutation;
pub mod selection;
pub mod undo;

pub use accessors::{
    AttributeText, ColorAttribute, Displacement, DrawingName, FlagAttribute, TextContent,
};
pub use binding::{
    Accessor, Binding, BindingContext, BoundControl, Control, ControlValue, EditHook, EditOutcome,
};
pub use color::{NEUTRAL_COLOR, normalize_color};
pub use config::PanelConfig;
pub use consensus::{ConsensusError, consensus};
pub use drawing::Drawing;
pub use element::{DisplacementParam, Element, ElementId, ElementKind};
pub use error::{InkformError, Result};
pub use event::{EventChannel, Subscription};
pub use mutation::{Mount, MutationFilter, MutationHub, MutationRecord, MutationWatcher};
pub use selection::{LiveSelection, SelectionChange};
pub use undo::{CheckpointPolicy, CheckpointToken, UndoCoalescer, UndoLog};
