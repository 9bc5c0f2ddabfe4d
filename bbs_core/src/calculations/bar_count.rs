//! # Bar Count
//!
//! `total_members = ceil(span / spacing)`, where the span depends on what
//! the bar is:
//!
//! | Bar                      | Span                                       |
//! |--------------------------|--------------------------------------------|
//! | main / mesh / generic    | member span along the bar's own direction  |
//! | slab distribution        | sum of top extensions at the own-axis ends |
//! | column tie               | storey height (`depth`)                    |
//!
//! Spacing `0` means the bar is counted, not spaced: `total_members` is
//! the bar's `quantity`. Negative spacing, or zero spacing with no
//! quantity, is [`BbsError::InvalidSpacing`].
//!
//! `total_bars = total_members × bars_per_member` (default 1), unless a
//! manual bar-count override is present, which wins over both.

use serde::{Deserialize, Serialize};

use crate::bars::{BarDescription, Direction};
use crate::classifier::PatternCategory;
use crate::errors::{BbsError, BbsResult};
use crate::members::Member;

// Keeps 3000 / 250 from landing on 12.000000000000002 and rounding to 13
const CEIL_EPSILON: f64 = 1e-9;

/// Which member dimension a spaced bar is distributed across
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanBasis {
    OwnAxis,
    ExtensionSum,
    Height,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarCount {
    pub total_members: u32,
    pub bars_per_member: u32,
    pub total_bars: u32,
    /// True when `total_bars` came from a manual override
    pub overridden: bool,
}

pub fn span_basis(category: Option<PatternCategory>) -> SpanBasis {
    match category {
        Some(PatternCategory::SlabDistribution) => SpanBasis::ExtensionSum,
        Some(PatternCategory::ColumnTie) => SpanBasis::Height,
        _ => SpanBasis::OwnAxis,
    }
}

pub fn count_span(member: &Member, basis: SpanBasis, direction: Direction) -> f64 {
    match basis {
        SpanBasis::OwnAxis => member.span_along(direction),
        SpanBasis::ExtensionSum => member.top_extensions.end_sum(direction),
        SpanBasis::Height => member.depth,
    }
}

/// `ceil(span / spacing)` for a positive spacing
pub fn positions(span_mm: f64, spacing_mm: f64) -> BbsResult<u32> {
    if !spacing_mm.is_finite() || spacing_mm <= 0.0 {
        return Err(BbsError::invalid_spacing(spacing_mm, "Spacing must be a positive length"));
    }
    let count = (span_mm / spacing_mm - CEIL_EPSILON).ceil().max(0.0);
    Ok(count as u32)
}

/// Resolve member and bar totals for one bar.
pub fn resolve_bar_count(
    member: &Member,
    bar: &BarDescription,
    category: Option<PatternCategory>,
    direction: Direction,
) -> BbsResult<BarCount> {
    let spacing = bar.spacing_mm;
    if spacing.is_nan() || spacing < 0.0 {
        return Err(BbsError::invalid_spacing(spacing, "Spacing cannot be negative"));
    }

    let bars_per_member = bar.bars_per_member.unwrap_or(1);

    let total_members = if spacing > 0.0 {
        positions(count_span(member, span_basis(category), direction), spacing)?
    } else {
        match (bar.quantity, bar.overrides.bar_count) {
            (Some(quantity), _) if quantity > 0 => quantity,
            (_, Some(_)) => 0,
            _ => {
                return Err(BbsError::invalid_spacing(
                    spacing,
                    "Zero spacing requires a positive quantity",
                ))
            }
        }
    };

    let (total_bars, overridden) = match bar.overrides.bar_count {
        Some(count) => (count, true),
        None => (total_members.saturating_mul(bars_per_member), false),
    };

    Ok(BarCount {
        total_members,
        bars_per_member,
        total_bars,
        overridden,
    })
}
