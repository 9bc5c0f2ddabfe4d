//! # Shape Catalog
//!
//! Static registry of the six canonical bar shapes. Each definition lists
//! the dimensions it needs, the bends it deducts (in order), how many hooks
//! it carries, and its closed-form length formula.
//!
//! ## Notation
//!
//! - `A`..`D` = shape dimensions (mm)
//! - `d` = bar diameter (mm)
//! - `m45`, `m90`, `m135` = bend deduction multipliers from the active profile
//! - `h` = hook length multiplier from the active profile
//!
//! | Shape    | Length                                     |
//! |----------|--------------------------------------------|
//! | Straight | `A`                                        |
//! | U-Shape  | `A + 2B − 2·m90·d`                         |
//! | Stirrup  | `2(A+B) + 2·h·d − 4·m90·d − 2·m135·d`      |
//! | Cranked  | `A + √(B²+C²) + C − 2·m45·d`               |
//! | L-Shape  | `A + B − m90·d`                            |
//! | Hooked   | `A + h·d − m90·d`                          |
//!
//! The 180° hook bend is deducted with the 90° multiplier.
//!
//! ## Example
//!
//! ```rust
//! use bbs_core::shapes::{ShapeCode, ShapeDimensions};
//! use bbs_core::profiles::ProfileParameters;
//!
//! let params = ProfileParameters::default();
//! let dims = ShapeDimensions::ab(2000.0, 300.0);
//! let length = ShapeCode::UShape.definition().length(&dims, &params, 16.0).unwrap();
//! assert_eq!(length, 2536.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{BbsError, BbsResult};
use crate::profiles::ProfileParameters;

/// Canonical bar shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShapeCode {
    Straight,
    UShape,
    Stirrup,
    Cranked,
    LShape,
    Hooked,
}

impl ShapeCode {
    pub const ALL: [ShapeCode; 6] = [
        ShapeCode::Straight,
        ShapeCode::UShape,
        ShapeCode::Stirrup,
        ShapeCode::Cranked,
        ShapeCode::LShape,
        ShapeCode::Hooked,
    ];

    /// Catalog entry for this shape
    pub fn definition(self) -> &'static ShapeDefinition {
        let index = match self {
            ShapeCode::Straight => 0,
            ShapeCode::UShape => 1,
            ShapeCode::Stirrup => 2,
            ShapeCode::Cranked => 3,
            ShapeCode::LShape => 4,
            ShapeCode::Hooked => 5,
        };
        &CATALOG[index]
    }
}

impl std::fmt::Display for ShapeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.definition().name)
    }
}

/// Named shape dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    A,
    B,
    C,
    D,
}

impl Dimension {
    pub fn letter(&self) -> &'static str {
        match self {
            Dimension::A => "A",
            Dimension::B => "B",
            Dimension::C => "C",
            Dimension::D => "D",
        }
    }
}

/// Bend angle classes with their own deduction multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BendAngle {
    Deg45,
    Deg90,
    Deg135,
    Deg180,
}

impl BendAngle {
    pub fn degrees(&self) -> u32 {
        match self {
            BendAngle::Deg45 => 45,
            BendAngle::Deg90 => 90,
            BendAngle::Deg135 => 135,
            BendAngle::Deg180 => 180,
        }
    }
}

/// Shape dimensions as entered. Unused dimensions stay `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeDimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<f64>,
}

impl ShapeDimensions {
    pub fn a(a: f64) -> Self {
        ShapeDimensions {
            a: Some(a),
            ..Default::default()
        }
    }

    pub fn ab(a: f64, b: f64) -> Self {
        ShapeDimensions {
            a: Some(a),
            b: Some(b),
            ..Default::default()
        }
    }

    pub fn abc(a: f64, b: f64, c: f64) -> Self {
        ShapeDimensions {
            a: Some(a),
            b: Some(b),
            c: Some(c),
            d: None,
        }
    }

    pub fn get(&self, dimension: Dimension) -> Option<f64> {
        match dimension {
            Dimension::A => self.a,
            Dimension::B => self.b,
            Dimension::C => self.c,
            Dimension::D => self.d,
        }
    }
}

/// Static definition of one canonical shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeDefinition {
    pub code: ShapeCode,
    pub name: &'static str,
    pub required_dimensions: &'static [Dimension],
    /// Bends deducted, in the order they are formed
    pub bend_angles: &'static [BendAngle],
    pub hook_count: u8,
    /// Human-readable closed form
    pub formula: &'static str,
}

/// The six canonical shapes, indexed by [`ShapeCode::definition`]
pub static CATALOG: [ShapeDefinition; 6] = [
    ShapeDefinition {
        code: ShapeCode::Straight,
        name: "Straight",
        required_dimensions: &[Dimension::A],
        bend_angles: &[],
        hook_count: 0,
        formula: "A",
    },
    ShapeDefinition {
        code: ShapeCode::UShape,
        name: "U-Shape",
        required_dimensions: &[Dimension::A, Dimension::B],
        bend_angles: &[BendAngle::Deg90, BendAngle::Deg90],
        hook_count: 0,
        formula: "A + 2B - 2·m90·d",
    },
    ShapeDefinition {
        code: ShapeCode::Stirrup,
        name: "Stirrup",
        required_dimensions: &[Dimension::A, Dimension::B],
        bend_angles: &[
            BendAngle::Deg90,
            BendAngle::Deg90,
            BendAngle::Deg90,
            BendAngle::Deg90,
            BendAngle::Deg135,
            BendAngle::Deg135,
        ],
        hook_count: 2,
        formula: "2(A + B) + 2·h·d - 4·m90·d - 2·m135·d",
    },
    ShapeDefinition {
        code: ShapeCode::Cranked,
        name: "Cranked",
        required_dimensions: &[Dimension::A, Dimension::B, Dimension::C],
        bend_angles: &[BendAngle::Deg45, BendAngle::Deg45],
        hook_count: 0,
        formula: "A + √(B² + C²) + C - 2·m45·d",
    },
    ShapeDefinition {
        code: ShapeCode::LShape,
        name: "L-Shape",
        required_dimensions: &[Dimension::A, Dimension::B],
        bend_angles: &[BendAngle::Deg90],
        hook_count: 0,
        formula: "A + B - m90·d",
    },
    ShapeDefinition {
        code: ShapeCode::Hooked,
        name: "Hooked",
        required_dimensions: &[Dimension::A],
        bend_angles: &[BendAngle::Deg180],
        hook_count: 1,
        formula: "A + h·d - m90·d",
    },
];

/// Required dimensions pulled out of a [`ShapeDimensions`], zero where the
/// shape does not use them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedDimensions {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl ShapeDefinition {
    /// Check that every required dimension is present, finite and
    /// positive. Missing dimensions are never defaulted.
    pub fn resolve(&self, dims: &ShapeDimensions) -> BbsResult<ResolvedDimensions> {
        let mut resolved = ResolvedDimensions::default();
        for &dimension in self.required_dimensions {
            let value = dims
                .get(dimension)
                .ok_or_else(|| BbsError::missing_dimension(self.name, dimension.letter()))?;
            if !value.is_finite() || value <= 0.0 {
                return Err(BbsError::invalid_input(
                    dimension.letter(),
                    value.to_string(),
                    format!("{} dimensions must be positive", self.name),
                ));
            }
            match dimension {
                Dimension::A => resolved.a = value,
                Dimension::B => resolved.b = value,
                Dimension::C => resolved.c = value,
                Dimension::D => resolved.d = value,
            }
        }
        Ok(resolved)
    }

    /// Hook length added per hook: `h·d`
    pub fn hook_length(params: &ProfileParameters, diameter: f64) -> f64 {
        params.hook_multiplier * diameter
    }

    /// Sum of dimensions and hook additions before any bend deduction
    pub fn measured_length(&self, dims: &ShapeDimensions, params: &ProfileParameters, diameter: f64) -> BbsResult<f64> {
        let r = self.resolve(dims)?;
        let geometric = match self.code {
            ShapeCode::Straight => r.a,
            ShapeCode::UShape => r.a + 2.0 * r.b,
            ShapeCode::Stirrup => 2.0 * (r.a + r.b),
            ShapeCode::Cranked => r.a + (r.b * r.b + r.c * r.c).sqrt() + r.c,
            ShapeCode::LShape => r.a + r.b,
            ShapeCode::Hooked => r.a,
        };
        let hooks = f64::from(self.hook_count) * Self::hook_length(params, diameter);
        Ok(geometric + hooks)
    }

    /// Total bend deduction: one multiplier·d per listed bend
    pub fn bend_deduction(&self, params: &ProfileParameters, diameter: f64) -> f64 {
        self.bend_angles
            .iter()
            .map(|&angle| params.bends.for_angle(angle) * diameter)
            .sum()
    }

    /// Closed-form cut length.
    pub fn length(&self, dims: &ShapeDimensions, params: &ProfileParameters, diameter: f64) -> BbsResult<f64> {
        let r = self.resolve(dims)?;
        let d = diameter;
        let h = params.hook_multiplier;
        let m = &params.bends;
        let length = match self.code {
            ShapeCode::Straight => r.a,
            ShapeCode::UShape => r.a + 2.0 * r.b - 2.0 * m.deg90 * d,
            ShapeCode::Stirrup => {
                2.0 * (r.a + r.b) + 2.0 * (h * d) - 4.0 * m.deg90 * d - 2.0 * m.deg135 * d
            }
            ShapeCode::Cranked => r.a + (r.b * r.b + r.c * r.c).sqrt() + r.c - 2.0 * m.deg45 * d,
            ShapeCode::LShape => r.a + r.b - m.deg90 * d,
            ShapeCode::Hooked => r.a + h * d - m.deg90 * d,
        };
        Ok(length)
    }
}
