//! # Bar Descriptions
//!
//! A [`BarDescription`] is one reinforcement entry attached to a
//! [`Member`](crate::members::Member). Its geometry comes from one of three
//! sources:
//!
//! - [`BarGeometry::Derived`] - classified from the label and measured from
//!   the owning member's geometry
//! - [`BarGeometry::Shape`] - a canonical catalog shape with explicit A-D
//!   dimensions
//! - [`BarGeometry::Segments`] - up to six segments entered by hand, plus a
//!   lap length
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "id": "0b9c1e0a-5a43-4c43-a1d9-6a1c1d2e3f40",
//!   "mark": "a",
//!   "label": "Main Bar (X-X) with extension",
//!   "direction": "X-X",
//!   "diameter": 10,
//!   "spacing_mm": 150.0,
//!   "geometry": { "kind": "Derived" }
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::measurement::Measurement;
use crate::errors::BbsError;
use crate::shapes::{ShapeCode, ShapeDimensions};

/// Standard bar diameters (mm)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Diameter {
    D6,
    D8,
    D10,
    D12,
    D16,
    D20,
    D25,
    D28,
    D32,
    D36,
    D40,
}

impl Diameter {
    pub const ALL: [Diameter; 11] = [
        Diameter::D6,
        Diameter::D8,
        Diameter::D10,
        Diameter::D12,
        Diameter::D16,
        Diameter::D20,
        Diameter::D25,
        Diameter::D28,
        Diameter::D32,
        Diameter::D36,
        Diameter::D40,
    ];

    /// Nominal diameter in mm
    pub fn mm(self) -> u32 {
        match self {
            Diameter::D6 => 6,
            Diameter::D8 => 8,
            Diameter::D10 => 10,
            Diameter::D12 => 12,
            Diameter::D16 => 16,
            Diameter::D20 => 20,
            Diameter::D25 => 25,
            Diameter::D28 => 28,
            Diameter::D32 => 32,
            Diameter::D36 => 36,
            Diameter::D40 => 40,
        }
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.mm())
    }
}

impl TryFrom<u32> for Diameter {
    type Error = BbsError;

    fn try_from(mm: u32) -> Result<Self, Self::Error> {
        Diameter::ALL
            .into_iter()
            .find(|d| d.mm() == mm)
            .ok_or_else(|| {
                BbsError::invalid_input(
                    "diameter",
                    mm.to_string(),
                    "Not a standard bar size (6, 8, 10, 12, 16, 20, 25, 28, 32, 36, 40)",
                )
            })
    }
}

impl From<Diameter> for u32 {
    fn from(d: Diameter) -> u32 {
        d.mm()
    }
}

impl fmt::Display for Diameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mm", self.mm())
    }
}

/// Principal direction of a bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    /// Along the primary (X-X) axis
    #[serde(rename = "X-X", alias = "Primary")]
    Primary,
    /// Along the perpendicular (Y-Y) axis
    #[serde(rename = "Y-Y", alias = "Perpendicular")]
    Perpendicular,
    /// Mesh in both directions; measured along the primary axis
    Both,
    /// No direction given
    #[default]
    #[serde(rename = "None")]
    Unspecified,
}

impl Direction {
    /// The other principal axis. `Both` and `Unspecified` measure along
    /// X-X, so their cross axis is Y-Y.
    pub fn cross(self) -> Direction {
        match self {
            Direction::Perpendicular => Direction::Primary,
            Direction::Primary | Direction::Both | Direction::Unspecified => Direction::Perpendicular,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Direction::Primary => "X-X",
            Direction::Perpendicular => "Y-Y",
            Direction::Both => "Both",
            Direction::Unspecified => "None",
        }
    }
}

/// Where a bar's measurement comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind")]
pub enum BarGeometry {
    /// Classified from the label and measured from member geometry
    #[default]
    Derived,
    /// Canonical catalog shape with explicit dimensions
    Shape {
        shape: ShapeCode,
        dimensions: ShapeDimensions,
    },
    /// Hand-entered segments plus lap length
    Segments {
        segments: Measurement,
        #[serde(default)]
        lap_mm: f64,
    },
}

/// Manual overrides that take precedence over derived values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BarOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bend_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_count: Option<u32>,
}

/// One reinforcement entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarDescription {
    pub id: Uuid,

    /// Bar mark within the member (e.g., "a", "b1")
    #[serde(default)]
    pub mark: String,

    /// Free-form or canonical bar-type label
    pub label: String,

    #[serde(default)]
    pub direction: Direction,

    pub diameter: Diameter,

    /// Centre-to-centre spacing in mm; 0 means a discrete `quantity`
    #[serde(default)]
    pub spacing_mm: f64,

    /// Discrete bar count when not spacing-driven
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    /// Bars at each spacing position (defaults to 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bars_per_member: Option<u32>,

    #[serde(default)]
    pub geometry: BarGeometry,

    #[serde(default)]
    pub overrides: BarOverrides,
}

impl BarDescription {
    /// Member-derived bar placed at a spacing
    pub fn spaced(label: impl Into<String>, direction: Direction, diameter: Diameter, spacing_mm: f64) -> Self {
        BarDescription {
            id: Uuid::new_v4(),
            mark: String::new(),
            label: label.into(),
            direction,
            diameter,
            spacing_mm,
            quantity: None,
            bars_per_member: None,
            geometry: BarGeometry::Derived,
            overrides: BarOverrides::default(),
        }
    }

    /// Member-derived bar with a discrete count
    pub fn counted(label: impl Into<String>, diameter: Diameter, quantity: u32) -> Self {
        BarDescription {
            quantity: Some(quantity),
            ..BarDescription::spaced(label, Direction::Unspecified, diameter, 0.0)
        }
    }

    /// Canonical-shape bar with a discrete count
    pub fn shaped(shape: ShapeCode, dimensions: ShapeDimensions, diameter: Diameter, quantity: u32) -> Self {
        BarDescription {
            geometry: BarGeometry::Shape { shape, dimensions },
            ..BarDescription::counted(shape.definition().name, diameter, quantity)
        }
    }

    pub fn with_mark(mut self, mark: impl Into<String>) -> Self {
        self.mark = mark.into();
        self
    }

    pub fn with_bend_override(mut self, bends: u32) -> Self {
        self.overrides.bend_count = Some(bends);
        self
    }

    pub fn with_bar_count_override(mut self, count: u32) -> Self {
        self.overrides.bar_count = Some(count);
        self
    }

    pub fn with_bars_per_member(mut self, count: u32) -> Self {
        self.bars_per_member = Some(count);
        self
    }

    /// Canonical shape, if this bar uses one
    pub fn shape(&self) -> Option<ShapeCode> {
        match &self.geometry {
            BarGeometry::Shape { shape, .. } => Some(*shape),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diameter_from_mm() {
        assert_eq!(Diameter::try_from(16).unwrap(), Diameter::D16);
        assert!(Diameter::try_from(14).is_err());
    }

    #[test]
    fn test_diameter_serializes_as_number() {
        let json = serde_json::to_string(&Diameter::D12).unwrap();
        assert_eq!(json, "12");
        let parsed: Diameter = serde_json::from_str("25").unwrap();
        assert_eq!(parsed, Diameter::D25);
        assert!(serde_json::from_str::<Diameter>("11").is_err());
    }

    #[test]
    fn test_direction_tokens() {
        assert_eq!(serde_json::to_string(&Direction::Perpendicular).unwrap(), "\"Y-Y\"");
        let d: Direction = serde_json::from_str("\"Primary\"").unwrap();
        assert_eq!(d, Direction::Primary);
        assert_eq!(Direction::Primary.cross(), Direction::Perpendicular);
        assert_eq!(Direction::Both.cross(), Direction::Perpendicular);
    }

    #[test]
    fn test_bar_json_defaults() {
        let json = r#"{
            "id": "0b9c1e0a-5a43-4c43-a1d9-6a1c1d2e3f40",
            "label": "Bottom Bar (X-X)",
            "diameter": 10,
            "spacing_mm": 150.0
        }"#;
        let bar: BarDescription = serde_json::from_str(json).unwrap();
        assert_eq!(bar.direction, Direction::Unspecified);
        assert_eq!(bar.geometry, BarGeometry::Derived);
        assert_eq!(bar.overrides, BarOverrides::default());
    }

    #[test]
    fn test_shaped_bar_uses_catalog_name() {
        let bar = BarDescription::shaped(ShapeCode::Straight, ShapeDimensions::a(3000.0), Diameter::D12, 10);
        assert_eq!(bar.label, "Straight");
        assert_eq!(bar.quantity, Some(10));
        assert_eq!(bar.shape(), Some(ShapeCode::Straight));
    }
}
