//! Inkform Application
//!
//! The editing panel built on inkform-core: an editing session, a section
//! for the drawing and one per element kind with its fields and tools, and
//! the panel that opens and closes them together.

mod fields;
mod panel;
mod sections;
mod session;
mod tools;

pub use fields::{Field, FieldBuilder, Layout, attribute_info_link, keep_centered, reposition};
pub use panel::EditPanel;
pub use sections::{DrawingSection, Section};
pub use session::Session;
pub use tools::{
    AddTools, RemoveTool, SelectedCounter, SelectionTools, ToolButton, ZTools, selected_text,
};
