//! # Calculation Breakdown
//!
//! Re-expresses a canonical shape's closed-form length as an ordered list
//! of steps so a reviewer can follow the arithmetic. The signed sum of the
//! step values (constant, add, sqrt positive; subtract negative) always
//! equals [`ShapeDefinition::length`](crate::shapes::ShapeDefinition::length)
//! within [`VERIFY_TOLERANCE_MM`].
//!
//! Only canonical-shape bars get a breakdown. Member-derived and
//! hand-entered bars return `None`.
//!
//! ## Example
//!
//! ```rust
//! use bbs_core::calculations::breakdown::{breakdown, verify};
//! use bbs_core::profiles::ProfileParameters;
//! use bbs_core::shapes::{ShapeCode, ShapeDimensions};
//!
//! let params = ProfileParameters::default();
//! let dims = ShapeDimensions::ab(2000.0, 300.0);
//!
//! let steps = breakdown(ShapeCode::UShape, &dims, &params, 16.0).unwrap();
//! assert_eq!(steps.steps.len(), 5);
//! assert_eq!(steps.total(), 2536.0);
//!
//! let check = verify(ShapeCode::UShape, &dims, &params, 16.0).unwrap();
//! assert!(check.matches);
//! ```

use serde::{Deserialize, Serialize};

use crate::bars::{BarDescription, BarGeometry};
use crate::errors::BbsResult;
use crate::profiles::ProfileParameters;
use crate::shapes::{ShapeCode, ShapeDefinition, ShapeDimensions};

/// Maximum |step sum − formula| accepted by [`verify`] (mm)
pub const VERIFY_TOLERANCE_MM: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOp {
    Constant,
    Add,
    Subtract,
    Sqrt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownStep {
    pub op: StepOp,
    pub description: String,
    /// Magnitude of the step (mm); the sign comes from `op`
    pub value: f64,
    pub is_bend_deduction: bool,
    pub is_hook_addition: bool,
}

impl BreakdownStep {
    fn new(op: StepOp, description: impl Into<String>, value: f64) -> Self {
        BreakdownStep {
            op,
            description: description.into(),
            value,
            is_bend_deduction: false,
            is_hook_addition: false,
        }
    }

    /// Value with the sign implied by the operation
    pub fn signed_value(&self) -> f64 {
        match self.op {
            StepOp::Subtract => -self.value,
            StepOp::Constant | StepOp::Add | StepOp::Sqrt => self.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub shape: ShapeCode,
    pub formula: String,
    pub steps: Vec<BreakdownStep>,
}

impl Breakdown {
    /// Signed sum of all steps
    pub fn total(&self) -> f64 {
        self.steps.iter().map(BreakdownStep::signed_value).sum()
    }

    pub fn bend_deduction_total(&self) -> f64 {
        self.steps.iter().filter(|s| s.is_bend_deduction).map(|s| s.value).sum()
    }

    pub fn hook_addition_total(&self) -> f64 {
        self.steps.iter().filter(|s| s.is_hook_addition).map(|s| s.value).sum()
    }
}

/// Breakdown checked against the closed-form formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub breakdown: Breakdown,
    pub step_sum: f64,
    pub formula_result: f64,
    pub difference: f64,
    pub matches: bool,
}

fn geometric_steps(def: &ShapeDefinition, dims: &ShapeDimensions) -> BbsResult<Vec<BreakdownStep>> {
    let r = def.resolve(dims)?;
    let steps = match def.code {
        ShapeCode::Straight | ShapeCode::Hooked => vec![BreakdownStep::new(StepOp::Constant, "Length A", r.a)],
        ShapeCode::UShape => vec![
            BreakdownStep::new(StepOp::Constant, "Length A", r.a),
            BreakdownStep::new(StepOp::Add, "First leg B", r.b),
            BreakdownStep::new(StepOp::Add, "Second leg B", r.b),
        ],
        ShapeCode::Stirrup => vec![
            BreakdownStep::new(StepOp::Constant, "Side A", r.a),
            BreakdownStep::new(StepOp::Add, "Side B", r.b),
            BreakdownStep::new(StepOp::Add, "Side A", r.a),
            BreakdownStep::new(StepOp::Add, "Side B", r.b),
        ],
        ShapeCode::Cranked => vec![
            BreakdownStep::new(StepOp::Constant, "Length A", r.a),
            BreakdownStep::new(StepOp::Sqrt, "Incline √(B² + C²)", (r.b * r.b + r.c * r.c).sqrt()),
            BreakdownStep::new(StepOp::Add, "Length C", r.c),
        ],
        ShapeCode::LShape => vec![
            BreakdownStep::new(StepOp::Constant, "Length A", r.a),
            BreakdownStep::new(StepOp::Add, "Leg B", r.b),
        ],
    };
    Ok(steps)
}

/// Build the step list for a canonical shape
pub fn breakdown(
    shape: ShapeCode,
    dims: &ShapeDimensions,
    params: &ProfileParameters,
    diameter: f64,
) -> BbsResult<Breakdown> {
    let def = shape.definition();
    let mut steps = geometric_steps(def, dims)?;

    let hook = ShapeDefinition::hook_length(params, diameter);
    for n in 1..=def.hook_count {
        steps.push(BreakdownStep {
            is_hook_addition: true,
            ..BreakdownStep::new(
                StepOp::Add,
                format!("Hook {} ({}·d = {}·{})", n, params.hook_multiplier, params.hook_multiplier, diameter),
                hook,
            )
        });
    }

    for &angle in def.bend_angles {
        let multiplier = params.bends.for_angle(angle);
        steps.push(BreakdownStep {
            is_bend_deduction: true,
            ..BreakdownStep::new(
                StepOp::Subtract,
                format!("{}° bend ({}·d = {}·{})", angle.degrees(), multiplier, multiplier, diameter),
                multiplier * diameter,
            )
        });
    }

    Ok(Breakdown {
        shape,
        formula: def.formula.to_string(),
        steps,
    })
}

/// Build the breakdown and compare its sum with the closed form
pub fn verify(
    shape: ShapeCode,
    dims: &ShapeDimensions,
    params: &ProfileParameters,
    diameter: f64,
) -> BbsResult<Verification> {
    let breakdown = breakdown(shape, dims, params, diameter)?;
    let formula_result = shape.definition().length(dims, params, diameter)?;
    let step_sum = breakdown.total();
    let difference = (step_sum - formula_result).abs();
    if difference > VERIFY_TOLERANCE_MM {
        tracing::warn!(%shape, step_sum, formula_result, "breakdown does not match formula");
    }
    Ok(Verification {
        breakdown,
        step_sum,
        formula_result,
        difference,
        matches: difference <= VERIFY_TOLERANCE_MM,
    })
}

/// Verification for a bar, or `None` when it is not a canonical shape
pub fn verify_bar(bar: &BarDescription, params: &ProfileParameters) -> BbsResult<Option<Verification>> {
    match &bar.geometry {
        BarGeometry::Shape { shape, dimensions } => {
            verify(*shape, dimensions, params, bar.diameter.as_f64()).map(Some)
        }
        BarGeometry::Derived | BarGeometry::Segments { .. } => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bars::{Diameter, Direction};

    #[test]
    fn test_stirrup_steps() {
        let dims = ShapeDimensions::ab(200.0, 300.0);
        let b = breakdown(ShapeCode::Stirrup, &dims, &ProfileParameters::default(), 10.0).unwrap();
        assert_eq!(b.steps.len(), 4 + 2 + 6);
        assert_eq!(b.hook_addition_total(), 180.0);
        // 4·2·10 + 2·3·10
        assert_eq!(b.bend_deduction_total(), 140.0);
        assert!((b.total() - 1040.0).abs() < 1e-9);
    }

    #[test]
    fn test_cranked_has_sqrt_step() {
        let dims = ShapeDimensions::abc(3000.0, 300.0, 400.0);
        let b = breakdown(ShapeCode::Cranked, &dims, &ProfileParameters::default(), 12.0).unwrap();
        let sqrt = b.steps.iter().find(|s| s.op == StepOp::Sqrt).unwrap();
        assert_eq!(sqrt.value, 500.0);
    }

    #[test]
    fn test_every_shape_verifies() {
        let dims = ShapeDimensions::abc(1500.0, 350.0, 220.0);
        for code in ShapeCode::ALL {
            let v = verify(code, &dims, &ProfileParameters::default(), 20.0).unwrap();
            assert!(v.matches, "{:?} differs by {}", code, v.difference);
        }
    }

    #[test]
    fn test_missing_dimension_propagates() {
        let err = breakdown(ShapeCode::Cranked, &ShapeDimensions::ab(1.0, 2.0), &ProfileParameters::default(), 12.0)
            .unwrap_err();
        assert_eq!(err.error_code(), "MISSING_DIMENSION");
    }

    #[test]
    fn test_derived_bars_have_no_breakdown() {
        let bar = BarDescription::spaced("Bottom Bar", Direction::Primary, Diameter::D10, 150.0);
        assert!(verify_bar(&bar, &ProfileParameters::default()).unwrap().is_none());

        let shaped = BarDescription::shaped(ShapeCode::LShape, ShapeDimensions::ab(900.0, 300.0), Diameter::D10, 4);
        let v = verify_bar(&shaped, &ProfileParameters::default()).unwrap().unwrap();
        assert_eq!(v.formula_result, 1180.0);
    }
}
