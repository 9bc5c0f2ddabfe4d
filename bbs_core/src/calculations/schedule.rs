//! # Schedule
//!
//! Turns (member, bar description, profile parameters) into a
//! [`CalculatedBar`], and a set of members into a full [`Schedule`] with
//! its three summaries.
//!
//! Each bar is computed independently, so [`build_schedule`] maps them with
//! rayon. Output order always matches input order, and when several bars
//! are invalid the error reported is the first one in that order.
//!
//! ## Example
//!
//! ```rust
//! use bbs_core::bars::{BarDescription, Diameter};
//! use bbs_core::calculations::schedule::build_schedule;
//! use bbs_core::members::{Member, MemberType};
//! use bbs_core::profiles::ProfileParameters;
//! use bbs_core::shapes::{ShapeCode, ShapeDimensions};
//!
//! let beam = Member::new("B1", MemberType::Beam, 4000.0, 230.0, 450.0, 25.0)
//!     .with_bar(BarDescription::shaped(ShapeCode::Straight, ShapeDimensions::a(3000.0), Diameter::D12, 10));
//!
//! let schedule = build_schedule([&beam], &ProfileParameters::default()).unwrap();
//! assert_eq!(schedule.bars[0].cut_length_mm, 3000.0);
//! assert!((schedule.grand_total.total_length_m - 30.0).abs() < 1e-9);
//! ```

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::bar_count::resolve_bar_count;
use super::deduction::{
    cut_length, deduction_amount, resolve_bend_count, BendSource, CutLength, DeductionRule,
};
use super::measurement::{self, Measurement, Segment};
use super::weight::bar_weight;
use crate::aggregation::{self, GroupTotals, Totals};
use crate::bars::{BarDescription, BarGeometry, Diameter, Direction};
use crate::classifier::{classify, PatternCategory};
use crate::errors::{BbsError, BbsResult};
use crate::members::{Member, MemberType};
use crate::profiles::ProfileParameters;
use crate::shapes::{ShapeCode, ShapeDimensions};

/// What kind of shape a schedule line has, used for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum ShapeKey {
    Canonical(ShapeCode),
    Pattern(PatternCategory),
    /// Hand-entered segments
    Manual,
}

impl fmt::Display for ShapeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKey::Canonical(code) => write!(f, "{}", code),
            ShapeKey::Pattern(category) => write!(f, "{}", category),
            ShapeKey::Manual => write!(f, "Manual"),
        }
    }
}

/// One computed schedule line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedBar {
    pub bar_id: Uuid,
    pub member_id: Uuid,
    pub member_mark: String,
    pub member_type: MemberType,
    pub bar_mark: String,
    pub label: String,
    pub diameter: Diameter,
    /// Direction actually used for measuring and counting
    pub direction: Direction,
    pub shape: ShapeKey,
    pub measurement: Measurement,

    pub total_measurement_mm: f64,
    pub bend_count: u32,
    pub bend_source: BendSource,
    pub deduction_mm: f64,
    pub deduction_rule: DeductionRule,
    pub cut_length_mm: f64,

    pub total_members: u32,
    pub bars_per_member: u32,
    pub total_bars: u32,

    pub unit_weight_kg_m: f64,
    pub total_length_m: f64,
    pub total_weight_kg: f64,

    /// Label was not recognised and the bar was measured as a bare span
    pub low_confidence: bool,
}

/// Computed lines plus summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub bars: Vec<CalculatedBar>,
    pub by_diameter: Vec<GroupTotals<Diameter>>,
    pub by_shape: Vec<GroupTotals<ShapeKey>>,
    pub by_member_type: Vec<GroupTotals<MemberType>>,
    pub grand_total: Totals,
}

impl Schedule {
    pub fn from_bars(bars: Vec<CalculatedBar>) -> Self {
        Schedule {
            by_diameter: aggregation::by_diameter(&bars),
            by_shape: aggregation::by_shape(&bars),
            by_member_type: aggregation::by_member_type(&bars),
            grand_total: aggregation::grand_total(&bars),
            bars,
        }
    }

    pub fn low_confidence_count(&self) -> usize {
        self.bars.iter().filter(|b| b.low_confidence).count()
    }
}

struct Geometry {
    shape: ShapeKey,
    direction: Direction,
    category: Option<PatternCategory>,
    measurement: Measurement,
    bend_count: u32,
    bend_source: BendSource,
    cut: CutLength,
    low_confidence: bool,
}

fn shape_measurement(dims: &ShapeDimensions) -> Measurement {
    Measurement {
        a: dims.a.unwrap_or(0.0),
        b: dims.b,
        c: dims.c,
        d: dims.d,
        e: None,
        f: None,
    }
}

fn canonical_geometry(
    bar: &BarDescription,
    shape: ShapeCode,
    dims: &ShapeDimensions,
    params: &ProfileParameters,
) -> BbsResult<Geometry> {
    let def = shape.definition();
    let d = bar.diameter.as_f64();

    if let Some(bends) = bar.overrides.bend_count {
        tracing::warn!(
            bar = %bar.mark,
            %shape,
            bends,
            "bend override ignored for canonical shape"
        );
    }

    let total = def.measured_length(dims, params, d)?;
    let deduction = def.bend_deduction(params, d);
    let length = def.length(dims, params, d)?;
    if length < 0.0 {
        tracing::warn!(bar = %bar.mark, %shape, length, "bend deductions exceed shape length, cut clamped to zero");
    }

    Ok(Geometry {
        shape: ShapeKey::Canonical(shape),
        direction: bar.direction,
        category: None,
        measurement: shape_measurement(dims),
        bend_count: def.bend_angles.len() as u32,
        bend_source: BendSource::Catalog,
        cut: CutLength {
            total_measurement_mm: total,
            deduction_mm: deduction,
            cut_length_mm: length.max(0.0),
            rule: DeductionRule::Subtract,
        },
        low_confidence: false,
    })
}

fn derived_geometry(member: &Member, bar: &BarDescription, params: &ProfileParameters) -> Geometry {
    let classification = classify(&bar.label, member.member_type);
    let category = classification.category;

    // a direction written into the label only fills in a missing one
    let direction = match bar.direction {
        Direction::Unspecified => classification.label_direction.unwrap_or(Direction::Unspecified),
        explicit => explicit,
    };

    let m = measurement::resolve(member, category, direction, bar.diameter, params);
    let bends = resolve_bend_count(bar.overrides.bend_count, Some(category), member.member_type, &m);
    let deduction = deduction_amount(bends.count, bar.diameter.as_f64());
    let cut = cut_length(&m, Some(category), direction, deduction);

    Geometry {
        shape: ShapeKey::Pattern(category),
        direction,
        category: Some(category),
        measurement: m,
        bend_count: bends.count,
        bend_source: bends.source,
        cut,
        low_confidence: classification.low_confidence,
    }
}

fn manual_geometry(member: &Member, bar: &BarDescription, segments: &Measurement, lap_mm: f64) -> BbsResult<Geometry> {
    for segment in Segment::ALL {
        if let Some(value) = segments.get(segment) {
            if !value.is_finite() || value < 0.0 {
                return Err(BbsError::invalid_input(
                    format!("segments.{}", segment.letter().to_lowercase()),
                    value.to_string(),
                    "Segment lengths must be non-negative",
                ));
            }
        }
    }
    if !lap_mm.is_finite() || lap_mm < 0.0 {
        return Err(BbsError::invalid_input("lap_mm", lap_mm.to_string(), "Lap length must be non-negative"));
    }

    let bends = resolve_bend_count(bar.overrides.bend_count, None, member.member_type, segments);
    let deduction = deduction_amount(bends.count, bar.diameter.as_f64());
    let mut cut = cut_length(segments, None, bar.direction, deduction);
    cut.total_measurement_mm += lap_mm;
    cut.cut_length_mm = (cut.total_measurement_mm - deduction).max(0.0);

    Ok(Geometry {
        shape: ShapeKey::Manual,
        direction: bar.direction,
        category: None,
        measurement: *segments,
        bend_count: bends.count,
        bend_source: bends.source,
        cut,
        low_confidence: false,
    })
}

/// Compute one schedule line.
pub fn calculate_bar(member: &Member, bar: &BarDescription, params: &ProfileParameters) -> BbsResult<CalculatedBar> {
    let geometry = match &bar.geometry {
        BarGeometry::Shape { shape, dimensions } => canonical_geometry(bar, *shape, dimensions, params)?,
        BarGeometry::Derived => derived_geometry(member, bar, params),
        BarGeometry::Segments { segments, lap_mm } => manual_geometry(member, bar, segments, *lap_mm)?,
    };

    let count = resolve_bar_count(member, bar, geometry.category, geometry.direction)?;
    let weight = bar_weight(geometry.cut.cut_length_mm, count.total_bars, bar.diameter, params);

    tracing::debug!(
        member = %member.mark,
        bar = %bar.mark,
        shape = %geometry.shape,
        cut_length_mm = geometry.cut.cut_length_mm,
        total_bars = count.total_bars,
        "calculated bar"
    );

    Ok(CalculatedBar {
        bar_id: bar.id,
        member_id: member.id,
        member_mark: member.mark.clone(),
        member_type: member.member_type,
        bar_mark: bar.mark.clone(),
        label: bar.label.clone(),
        diameter: bar.diameter,
        direction: geometry.direction,
        shape: geometry.shape,
        measurement: geometry.measurement,
        total_measurement_mm: geometry.cut.total_measurement_mm,
        bend_count: geometry.bend_count,
        bend_source: geometry.bend_source,
        deduction_mm: geometry.cut.deduction_mm,
        deduction_rule: geometry.cut.rule,
        cut_length_mm: geometry.cut.cut_length_mm,
        total_members: count.total_members,
        bars_per_member: count.bars_per_member,
        total_bars: count.total_bars,
        unit_weight_kg_m: weight.unit_weight.value(),
        total_length_m: weight.total_length.value(),
        total_weight_kg: weight.total_weight.value(),
        low_confidence: geometry.low_confidence,
    })
}

/// Compute every bar of every member, in order, and summarize.
pub fn build_schedule<'a, I>(members: I, params: &ProfileParameters) -> BbsResult<Schedule>
where
    I: IntoIterator<Item = &'a Member>,
{
    let work: Vec<(&Member, &BarDescription)> = members
        .into_iter()
        .flat_map(|member| member.bars.iter().map(move |bar| (member, bar)))
        .collect();

    let results: Vec<BbsResult<CalculatedBar>> = work
        .par_iter()
        .map(|(member, bar)| calculate_bar(member, bar, params))
        .collect();
    let bars = results.into_iter().collect::<BbsResult<Vec<_>>>()?;

    let schedule = Schedule::from_bars(bars);
    tracing::info!(
        bars = schedule.bars.len(),
        total_weight_kg = schedule.grand_total.total_weight_kg,
        low_confidence = schedule.low_confidence_count(),
        "schedule built"
    );
    Ok(schedule)
}
