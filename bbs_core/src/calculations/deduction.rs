//! # Deduction & Cut Length
//!
//! Bend count, bend deduction, and the final cut length for member-derived
//! and hand-entered bars.
//!
//! ## Bend count
//!
//! Resolved in precedence order:
//!
//! 1. manual override on the bar
//! 2. lookup keyed by (pattern category, member type)
//! 3. inference: number of non-zero segments B-F, capped at 4
//!
//! | Category                      | Member  | Bends |
//! |-------------------------------|---------|-------|
//! | U with extension, top&bottom  | Slab    | 4     |
//! | Distribution                  | Slab    | 2     |
//! | Stirrup                       | Beam    | 6     |
//! | Side face                     | Beam    | 0     |
//! | Tie                           | Column  | 6     |
//! | Main                          | Column  | 0     |
//! | Dowel                         | Footing | 1     |
//!
//! ## Cut length
//!
//! `deduction = bends × 2 × d`, and for every category
//! `cut = max(0, total − deduction)`, where `total` is the doubled U sum
//! for U-shaped categories and the plain sum otherwise.
//!
//! The single exception is a Y-Y main bar with extension
//! ([`PatternCategory::SlabUExtension`] in [`Direction::Perpendicular`]):
//! `cut = roundUp5(A + 2B + 2C + 2D + E + deduction)`. The deduction is
//! added, segment F is left out, and the result is rounded up to the next
//! multiple of 5 mm. This matches fabricator reference schedules for that
//! bar type and applies to no other category.

use serde::{Deserialize, Serialize};

use super::measurement::Measurement;
use crate::bars::Direction;
use crate::classifier::PatternCategory;
use crate::members::MemberType;

/// Upper bound on inferred bend counts
pub const MAX_INFERRED_BENDS: u32 = 4;

// Absorbs float noise so 2535.0000000001 does not round up to 2540
const ROUNDING_EPSILON: f64 = 1e-6;

/// Where a bend count came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BendSource {
    Override,
    Table,
    Inferred,
    /// Canonical shape catalog
    Catalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BendCount {
    pub count: u32,
    pub source: BendSource,
}

/// How the deduction was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeductionRule {
    /// `cut = total − deduction`
    Subtract,
    /// `cut = roundUp5(total + deduction)`
    AddAndRoundUp,
}

/// Cut length result for one bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutLength {
    /// Segment total the deduction was applied to (mm)
    pub total_measurement_mm: f64,
    pub deduction_mm: f64,
    pub cut_length_mm: f64,
    pub rule: DeductionRule,
}

/// Tabulated bend count for common (category, member) pairs
pub fn tabulated_bend_count(category: PatternCategory, member_type: MemberType) -> Option<u32> {
    use PatternCategory::*;
    match (category, member_type) {
        (SlabUExtension | SlabTopBottom, MemberType::Slab) => Some(4),
        (SlabDistribution, MemberType::Slab) => Some(2),
        (BeamStirrup, MemberType::Beam) => Some(6),
        (BeamSideFace, MemberType::Beam) => Some(0),
        (ColumnTie, MemberType::Column) => Some(6),
        (ColumnMain, MemberType::Column) => Some(0),
        (FootingDowel, MemberType::Footing) => Some(1),
        _ => None,
    }
}

/// Bend count inferred from the non-zero segments B-F
pub fn inferred_bend_count(measurement: &Measurement) -> u32 {
    measurement.bent_segment_count().min(MAX_INFERRED_BENDS)
}

/// Resolve the bend count for a bar. `category` is `None` for hand-entered
/// segments, which skip the table.
pub fn resolve_bend_count(
    override_count: Option<u32>,
    category: Option<PatternCategory>,
    member_type: MemberType,
    measurement: &Measurement,
) -> BendCount {
    if let Some(count) = override_count {
        return BendCount {
            count,
            source: BendSource::Override,
        };
    }
    if let Some(count) = category.and_then(|c| tabulated_bend_count(c, member_type)) {
        return BendCount {
            count,
            source: BendSource::Table,
        };
    }
    BendCount {
        count: inferred_bend_count(measurement),
        source: BendSource::Inferred,
    }
}

/// `bends × 2 × d`
pub fn deduction_amount(bend_count: u32, diameter_mm: f64) -> f64 {
    f64::from(bend_count) * 2.0 * diameter_mm
}

/// Round up to the next multiple of 5 mm
pub fn round_up_to_5(value: f64) -> f64 {
    ((value - ROUNDING_EPSILON) / 5.0).ceil() * 5.0
}

/// True for the one category whose deduction is added and rounded
pub fn uses_additive_rule(category: Option<PatternCategory>, direction: Direction) -> bool {
    category == Some(PatternCategory::SlabUExtension) && direction == Direction::Perpendicular
}

/// Segment total before deduction for a category
pub fn segment_total(measurement: &Measurement, category: Option<PatternCategory>) -> f64 {
    match category {
        Some(c) if c.is_u_shaped() => measurement.u_total(),
        _ => measurement.plain_total(),
    }
}

/// Apply the deduction to a measurement.
pub fn cut_length(
    measurement: &Measurement,
    category: Option<PatternCategory>,
    direction: Direction,
    deduction_mm: f64,
) -> CutLength {
    if uses_additive_rule(category, direction) {
        let total = measurement.u_total_without_f();
        return CutLength {
            total_measurement_mm: total,
            deduction_mm,
            cut_length_mm: round_up_to_5(total + deduction_mm),
            rule: DeductionRule::AddAndRoundUp,
        };
    }

    let total = segment_total(measurement, category);
    // a fully clamped member can leave less steel than the bends consume
    CutLength {
        total_measurement_mm: total,
        deduction_mm,
        cut_length_mm: (total - deduction_mm).max(0.0),
        rule: DeductionRule::Subtract,
    }
}
