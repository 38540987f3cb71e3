//! Drawing elements.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// The kinds of element a drawing contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// A nucleobase: a single text glyph with a center point.
    Base,
    /// A bond between two consecutive bases.
    PrimaryBond,
    /// A base-pairing bond between two bases.
    SecondaryBond,
    /// A circle drawn around a base.
    Outline,
    /// A sequence number attached to a base.
    Numbering,
    /// A line connecting a numbering to its base.
    NumberingLine,
}

impl ElementKind {
    /// Get all element kinds, in panel order.
    pub fn all() -> &'static [ElementKind] {
        &[
            ElementKind::Base,
            ElementKind::PrimaryBond,
            ElementKind::SecondaryBond,
            ElementKind::Outline,
            ElementKind::Numbering,
            ElementKind::NumberingLine,
        ]
    }

    /// Singular noun used in panel text.
    pub fn singular(&self) -> &'static str {
        match self {
            ElementKind::Base => "base",
            ElementKind::PrimaryBond => "primary bond",
            ElementKind::SecondaryBond => "secondary bond",
            ElementKind::Outline => "outline",
            ElementKind::Numbering => "numbering",
            ElementKind::NumberingLine => "numbering line",
        }
    }

    /// Plural noun used in panel text.
    pub fn plural(&self) -> &'static str {
        match self {
            ElementKind::Base => "bases",
            ElementKind::PrimaryBond => "primary bonds",
            ElementKind::SecondaryBond => "secondary bonds",
            ElementKind::Outline => "outlines",
            ElementKind::Numbering => "numberings",
            ElementKind::NumberingLine => "numbering lines",
        }
    }

    /// Section header title.
    pub fn title(&self) -> &'static str {
        match self {
            ElementKind::Base => "Bases",
            ElementKind::PrimaryBond => "Primary Bonds",
            ElementKind::SecondaryBond => "Secondary Bonds",
            ElementKind::Outline => "Outlines",
            ElementKind::Numbering => "Numberings",
            ElementKind::NumberingLine => "Numbering Lines",
        }
    }
}

/// One component of a numbering's displacement from its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplacementParam {
    X,
    Y,
    Magnitude,
    /// Angle in degrees, counter-clockwise from the positive x axis.
    Direction,
}

impl DisplacementParam {
    /// Get all displacement parameters, in panel order.
    pub fn all() -> &'static [DisplacementParam] {
        &[
            DisplacementParam::X,
            DisplacementParam::Y,
            DisplacementParam::Magnitude,
            DisplacementParam::Direction,
        ]
    }

    /// Field label.
    pub fn label(&self) -> &'static str {
        match self {
            DisplacementParam::X => "X",
            DisplacementParam::Y => "Y",
            DisplacementParam::Magnitude => "Magnitude",
            DisplacementParam::Direction => "Direction",
        }
    }

    /// Read this component of a displacement.
    ///
    /// Polar components are rounded to [`POLAR_READ_PRECISION`] decimal
    /// places so a value that was just written reads back unchanged.
    pub fn get(&self, displacement: Vec2) -> f64 {
        match self {
            DisplacementParam::X => displacement.x,
            DisplacementParam::Y => displacement.y,
            DisplacementParam::Magnitude => {
                round_to(displacement.length(), POLAR_READ_PRECISION)
            }
            DisplacementParam::Direction => {
                round_to(displacement.atan2().to_degrees(), POLAR_READ_PRECISION)
            }
        }
    }

    /// Return `displacement` with this component replaced.
    ///
    /// Setting the magnitude keeps the direction and vice versa. Both
    /// round the resulting x and y to [`POLAR_WRITE_PRECISION`] places.
    pub fn set(&self, displacement: Vec2, value: f64) -> Vec2 {
        let polar = match self {
            DisplacementParam::X => return Vec2::new(value, displacement.y),
            DisplacementParam::Y => return Vec2::new(displacement.x, value),
            DisplacementParam::Magnitude => Vec2::from_angle(displacement.atan2()) * value,
            DisplacementParam::Direction => {
                Vec2::from_angle(value.to_radians()) * displacement.length()
            }
        };
        Vec2::new(
            round_to(polar.x, POLAR_WRITE_PRECISION),
            round_to(polar.y, POLAR_WRITE_PRECISION),
        )
    }
}

/// Decimal places kept in x and y after a polar write.
pub const POLAR_WRITE_PRECISION: i32 = 9;

/// Decimal places shown for magnitude and direction. Coarser than
/// [`POLAR_WRITE_PRECISION`] so write rounding never shows up on read.
pub const POLAR_READ_PRECISION: i32 = 6;

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    let rounded = (value * scale).round() / scale;
    // avoid "-0"
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// A drawing element.
///
/// Elements are plain data owned by the [`Drawing`](crate::Drawing); the
/// panel refers to them by id and edits them through the drawing so every
/// change is recorded as a mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// What this element is.
    pub kind: ElementKind,
    /// Presentation attributes (kebab-case names).
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Text content (bases and numberings).
    #[serde(default)]
    pub text_content: String,
    /// Elements this one is attached to (bases for bonds and outlines,
    /// the base for a numbering, the numbering for a numbering line).
    #[serde(default)]
    pub owners: Vec<ElementId>,
    /// Center point (bases).
    #[serde(default)]
    pub center: Point,
    /// Offset from the owning base's center (numberings).
    #[serde(default)]
    pub displacement: Vec2,
}

impl Element {
    fn new(kind: ElementKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            attributes: BTreeMap::new(),
            text_content: String::new(),
            owners: Vec::new(),
            center: Point::ZERO,
            displacement: Vec2::ZERO,
        }
    }

    /// Create a base showing `letter` centered at `center`.
    pub fn base(letter: impl Into<String>, center: Point) -> Self {
        let mut base = Self::new(ElementKind::Base);
        base.text_content = letter.into();
        base.center = center;
        base
    }

    /// Create a primary bond between two bases.
    pub fn primary_bond(base1: ElementId, base2: ElementId) -> Self {
        let mut bond = Self::new(ElementKind::PrimaryBond);
        bond.owners = vec![base1, base2];
        bond
    }

    /// Create a secondary bond between two paired bases.
    pub fn secondary_bond(base1: ElementId, base2: ElementId) -> Self {
        let mut bond = Self::new(ElementKind::SecondaryBond);
        bond.owners = vec![base1, base2];
        bond
    }

    /// Create an outline around a base.
    pub fn outline(base: ElementId) -> Self {
        let mut outline = Self::new(ElementKind::Outline);
        outline.owners = vec![base];
        outline
    }

    /// Create a numbering for a base, displaced from its center.
    pub fn numbering(base: ElementId, number: i64, displacement: Vec2) -> Self {
        let mut numbering = Self::new(ElementKind::Numbering);
        numbering.owners = vec![base];
        numbering.text_content = number.to_string();
        numbering.displacement = displacement;
        numbering
    }

    /// Create a line connecting a numbering to its base.
    pub fn numbering_line(numbering: ElementId) -> Self {
        let mut line = Self::new(ElementKind::NumberingLine);
        line.owners = vec![numbering];
        line
    }

    /// Builder-style attribute assignment.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Get an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Parse a numeric attribute, treating missing or malformed values as zero.
    pub fn numeric_attribute(&self, name: &str) -> f64 {
        self.attribute(name)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(ElementKind::PrimaryBond.singular(), "primary bond");
        assert_eq!(ElementKind::NumberingLine.plural(), "numbering lines");
        assert_eq!(ElementKind::all().len(), 6);
    }

    #[test]
    fn test_displacement_components() {
        let d = Vec2::new(3.0, 4.0);
        assert_eq!(DisplacementParam::X.get(d), 3.0);
        assert_eq!(DisplacementParam::Y.get(d), 4.0);
        assert_eq!(DisplacementParam::Magnitude.get(d), 5.0);
    }

    #[test]
    fn test_setting_magnitude_keeps_direction() {
        let d = DisplacementParam::Magnitude.set(Vec2::new(3.0, 4.0), 10.0);
        assert!((d.x - 6.0).abs() < 1e-9);
        assert!((d.y - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_setting_direction_keeps_magnitude() {
        let d = DisplacementParam::Direction.set(Vec2::new(0.0, 5.0), 0.0);
        assert!((d.x - 5.0).abs() < 1e-9);
        assert!(d.y.abs() < 1e-9);
    }

    #[test]
    fn test_polar_writes_read_back_exactly() {
        for start in [Vec2::new(1.0, 1.0), Vec2::new(3.0, 4.0), Vec2::new(-2.0, 7.0)] {
            let d = DisplacementParam::Magnitude.set(start, 7.0);
            assert_eq!(DisplacementParam::Magnitude.get(d), 7.0);
        }

        let d = DisplacementParam::Magnitude.set(Vec2::new(3.0, 4.0), 7.0);
        assert_eq!(d, Vec2::new(4.2, 5.6));

        let d = DisplacementParam::Direction.set(Vec2::new(12.0, 0.0), 90.0);
        assert_eq!(d, Vec2::new(0.0, 12.0));
        assert_eq!(DisplacementParam::Direction.get(d), 90.0);
    }

    #[test]
    fn test_numeric_attribute_defaults_to_zero() {
        let base = Element::base("G", Point::ZERO)
            .with_attribute("data-base-padding", "4.5")
            .with_attribute("broken", "abc");
        assert_eq!(base.numeric_attribute("data-base-padding"), 4.5);
        assert_eq!(base.numeric_attribute("broken"), 0.0);
        assert_eq!(base.numeric_attribute("missing"), 0.0);
    }

    #[test]
    fn test_element_json_round_trip_keeps_owners() {
        let base = Element::base("A", Point::new(1.0, 2.0));
        let numbering = Element::numbering(base.id, 10, Vec2::new(0.0, -20.0));
        let json = serde_json::to_string(&numbering).unwrap();
        let restored: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, numbering);
    }
}
