//! The editing panel.

use crate::sections::{DrawingSection, Section};
use crate::session::Session;
use inkform_core::{ElementKind, Mount};

/// The "Edit" panel: a section for the drawing, then one per element kind,
/// all sharing one mount.
///
/// While closed, nothing in the panel follows the drawing or the
/// selections. Opening it attaches the mount and catches every section up.
#[derive(Debug)]
pub struct EditPanel {
    mount: Mount,
    drawing_section: DrawingSection,
    sections: Vec<Section>,
}

impl EditPanel {
    /// Build a closed panel over `session`.
    pub fn new(session: &Session) -> Self {
        let mount = Mount::detached();
        let sections = ElementKind::all()
            .iter()
            .map(|&kind| Section::new(session, kind, &mount))
            .collect();
        Self {
            drawing_section: DrawingSection::new(session, &mount),
            mount,
            sections,
        }
    }

    pub fn is_open(&self) -> bool {
        self.mount.is_mounted()
    }

    /// Show the panel and refresh everything it shows.
    pub fn open(&self) {
        if self.is_open() {
            return;
        }
        self.mount.set_mounted(true);
        self.refresh();
        log::info!("Edit panel opened");
    }

    pub fn close(&self) {
        if !self.is_open() {
            return;
        }
        self.mount.set_mounted(false);
        log::info!("Edit panel closed");
    }

    pub fn refresh(&self) {
        self.drawing_section.refresh();
        for section in &self.sections {
            section.refresh();
        }
    }

    pub fn drawing_section(&self) -> &DrawingSection {
        &self.drawing_section
    }

    pub fn drawing_section_mut(&mut self) -> &mut DrawingSection {
        &mut self.drawing_section
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, kind: ElementKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind() == kind)
    }

    pub fn section_mut(&mut self, kind: ElementKind) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.kind() == kind)
    }

    /// Detach every binding from the drawing and selections.
    pub fn dispose(&mut self) {
        self.close();
        self.drawing_section.dispose();
        for section in &mut self.sections {
            section.dispose();
        }
    }
}
