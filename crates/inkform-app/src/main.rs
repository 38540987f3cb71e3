//! Panel demo entry point (native).
//!
//! Builds a small drawing, opens the edit panel and drives a few edits
//! through it. Pass a JSON config path as the first argument to override
//! the defaults.

#[cfg(feature = "native")]
fn main() {
    use inkform_app::{EditPanel, Session};
    use inkform_core::{ControlValue, Drawing, Element, ElementKind, PanelConfig};
    use kurbo::{Point, Vec2};

    env_logger::init();
    log::info!("Starting inkform panel demo");

    let config = match std::env::args().nth(1) {
        Some(path) => match PanelConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        },
        None => PanelConfig::default(),
    };

    let mut drawing = Drawing::new();
    let bases: Vec<_> = "GGGAAACCC"
        .chars()
        .enumerate()
        .map(|(i, letter)| {
            drawing.add_element(
                Element::base(letter.to_string(), Point::new(i as f64 * 12.0, 0.0))
                    .with_attribute("fill", "#FF0000"),
            )
        })
        .collect();
    for pair in bases.windows(2) {
        drawing.add_element(Element::primary_bond(pair[0], pair[1]));
    }
    let numbering = drawing.add_element(Element::numbering(bases[0], 1, Vec2::new(-10.0, 10.0)));
    drawing.add_element(Element::numbering_line(numbering));

    let session = Session::new(drawing, config);
    let panel = EditPanel::new(&session);
    panel.open();
    session.select(bases.iter().copied());
    session.flush();

    let Some(bases_section) = panel.section(ElementKind::Base) else {
        return;
    };
    println!("{}", bases_section.counter().text());

    if let Some(fill) = bases_section.field("Fill") {
        println!("Fill: {:?}", fill.control().value());
        fill.control().focus();
        for step in ["#ee0000", "#dd0000", "#cc0000"] {
            let outcome = fill.control().input(ControlValue::Text(step.to_string()));
            println!("  drag to {}: {:?}", step, outcome);
        }
        fill.control().blur();
        session.flush();
    }
    println!(
        "Undo depth after drag: {}",
        session.drawing().borrow().undo_depth()
    );

    session.undo();
    if let Some(fill) = bases_section.field("Fill") {
        println!("Fill after undo: {:?}", fill.control().value());
    }

    if let Some(add) = panel
        .section(ElementKind::Numbering)
        .and_then(|s| s.add_tools())
    {
        println!("{}: {}", add.option_label(), add.only_add_missing());
        println!("Add: {}", add.button().tooltip);
        let added = add.add();
        println!("Added {} numberings", added.len());
        session.flush();
    }

    panel.close();
    log::info!("Done");
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
