//! # Measurement Resolver
//!
//! Produces a [`Measurement`] (up to six named segments A-F) from a
//! pattern category, a direction, and the owning member's geometry.
//!
//! ## Slab patterns
//!
//! Bars in direction `X-X` run along `span_x` and end in the west/east edge
//! beams; `Y-Y` bars run along `span_y` and end in the south/north beams.
//! `rise = max(0, depth − 2·cover)` and `pen(w) = max(0, w − cover)`.
//!
//! | Category        | A          | B                 | C          | D     | E     | F          |
//! |-----------------|------------|-------------------|------------|-------|-------|------------|
//! | Full span       | own span   | pen(start)        | pen(end)   | rise  | rise  | -          |
//! | Distribution    | cross span | pen(c1) + pen(c2) | foot       | foot  | -     | -          |
//! | U / Top&Bottom  | own span   | mean pen          | k·rise     | rise  | rise  | ext sum    |
//! | Generic         | own span   | -                 | -          | -     | -     | -          |
//!
//! Distribution bars take their length from the *perpendicular* span: a
//! `Distribution Bar (X-X)` sits under the X-X top extensions and runs
//! along Y-Y. U-shaped totals double B, C and D (`A + 2B + 2C + 2D + E + F`);
//! `k = √2 − 1` is the extra length of a 45° crank per unit rise.
//!
//! ## Beam, column and footing patterns
//!
//! | Category       | Segments                                                   |
//! |----------------|------------------------------------------------------------|
//! | Beam top       | A clear length, B = C = Ld                                 |
//! | Beam bottom    | A clear length, B = C = Ld/3                               |
//! | Beam side face | A clear length                                             |
//! | Beam stirrup   | A = C inner breadth, B = D inner depth, E = F hook (h·d)   |
//! | Column main    | A storey height, B lap length                              |
//! | Column tie     | A = C inner side X, B = D inner side Y, E = F hook (h·d)   |
//! | Footing mesh   | A own span − 2·cover, B = C rise                           |
//! | Footing dowel  | A depth − cover, B lap length, C foot (12·d)               |
//!
//! Every cover or beam-width subtraction is clamped at zero; a beam
//! narrower than twice its cover is valid input and yields zero-length
//! segments rather than an error.

use serde::{Deserialize, Serialize};

use crate::bars::{Diameter, Direction};
use crate::classifier::PatternCategory;
use crate::members::Member;
use crate::profiles::ProfileParameters;
use crate::tables::{development_length, lap_length};

/// Extra length per unit rise of a 45° crank: `1/sin 45° − 1/tan 45°`
pub const CRANK_RISE_MULTIPLE: f64 = std::f64::consts::SQRT_2 - 1.0;

/// Fixed foot length at each end of a slab distribution bar (mm)
pub const DISTRIBUTION_FOOT_MM: f64 = 100.0;

/// Dowel foot length as a multiple of bar diameter
pub const DOWEL_FOOT_MULTIPLIER: f64 = 12.0;

/// Named measurement segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Segment {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Segment {
    pub const ALL: [Segment; 6] = [Segment::A, Segment::B, Segment::C, Segment::D, Segment::E, Segment::F];

    pub fn letter(&self) -> &'static str {
        match self {
            Segment::A => "A",
            Segment::B => "B",
            Segment::C => "C",
            Segment::D => "D",
            Segment::E => "E",
            Segment::F => "F",
        }
    }
}

/// Up to six named segments (mm). `A` is always present; a segment the
/// pattern does not use is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurement {
    pub a: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f: Option<f64>,
}

impl Measurement {
    /// Single-segment measurement
    pub fn span(a: f64) -> Self {
        Measurement {
            a,
            ..Default::default()
        }
    }

    /// Set a segment (builder)
    pub fn with(mut self, segment: Segment, value: f64) -> Self {
        match segment {
            Segment::A => self.a = value,
            Segment::B => self.b = Some(value),
            Segment::C => self.c = Some(value),
            Segment::D => self.d = Some(value),
            Segment::E => self.e = Some(value),
            Segment::F => self.f = Some(value),
        }
        self
    }

    pub fn get(&self, segment: Segment) -> Option<f64> {
        match segment {
            Segment::A => Some(self.a),
            Segment::B => self.b,
            Segment::C => self.c,
            Segment::D => self.d,
            Segment::E => self.e,
            Segment::F => self.f,
        }
    }

    /// Segment values in A-F order, unused segments as zero
    pub fn values(&self) -> [f64; 6] {
        Segment::ALL.map(|s| self.get(s).unwrap_or(0.0))
    }

    /// `A + B + C + D + E + F`
    pub fn plain_total(&self) -> f64 {
        self.values().iter().sum()
    }

    /// `A + 2B + 2C + 2D + E`
    pub fn u_total_without_f(&self) -> f64 {
        let [a, b, c, d, e, _] = self.values();
        a + 2.0 * b + 2.0 * c + 2.0 * d + e
    }

    /// `A + 2B + 2C + 2D + E + F`
    pub fn u_total(&self) -> f64 {
        self.u_total_without_f() + self.f.unwrap_or(0.0)
    }

    /// Number of B-F segments with a positive length
    pub fn bent_segment_count(&self) -> u32 {
        Segment::ALL[1..]
            .iter()
            .filter(|&&s| self.get(s).is_some_and(|v| v > 0.0))
            .count() as u32
    }
}

fn clamp(value: f64) -> f64 {
    value.max(0.0)
}

fn penetration(beam_width: f64, cover: f64) -> f64 {
    clamp(beam_width - cover)
}

fn closed_link(inner_x: f64, inner_y: f64, hook: f64) -> Measurement {
    Measurement::span(inner_x)
        .with(Segment::B, inner_y)
        .with(Segment::C, inner_x)
        .with(Segment::D, inner_y)
        .with(Segment::E, hook)
        .with(Segment::F, hook)
}

/// Resolve the segments for a member-derived bar.
///
/// A member without its own cover uses `params.cover_mm`.
pub fn resolve(
    member: &Member,
    category: PatternCategory,
    direction: Direction,
    diameter: Diameter,
    params: &ProfileParameters,
) -> Measurement {
    let cover = member.cover_or(params.cover_mm);
    let d = diameter.as_f64();
    let hook = params.hook_multiplier * d;
    let rise = member.clear_depth(cover);

    if rise == 0.0 && member.depth > 0.0 {
        tracing::debug!(member = %member.mark, depth = member.depth, cover, "depth within cover, rise clamped to zero");
    }

    match category {
        PatternCategory::SlabFullSpan => {
            let (start, end) = member.edge_beams.ends_for(direction);
            Measurement::span(member.span_along(direction))
                .with(Segment::B, penetration(start, cover))
                .with(Segment::C, penetration(end, cover))
                .with(Segment::D, rise)
                .with(Segment::E, rise)
        }
        PatternCategory::SlabDistribution => {
            let (first, second) = member.edge_beams.cross_ends_for(direction);
            Measurement::span(member.span_across(direction))
                .with(Segment::B, penetration(first, cover) + penetration(second, cover))
                .with(Segment::C, DISTRIBUTION_FOOT_MM)
                .with(Segment::D, DISTRIBUTION_FOOT_MM)
        }
        PatternCategory::SlabUExtension | PatternCategory::SlabTopBottom => {
            let (start, end) = member.edge_beams.ends_for(direction);
            let mean_penetration = (penetration(start, cover) + penetration(end, cover)) / 2.0;
            Measurement::span(member.span_along(direction))
                .with(Segment::B, mean_penetration)
                .with(Segment::C, CRANK_RISE_MULTIPLE * rise)
                .with(Segment::D, rise)
                .with(Segment::E, rise)
                .with(Segment::F, member.top_extensions.end_sum(direction))
        }
        PatternCategory::BeamTop => {
            let ld = development_length(diameter, member.concrete_grade);
            Measurement::span(clamp(member.span_x - 2.0 * cover))
                .with(Segment::B, ld)
                .with(Segment::C, ld)
        }
        PatternCategory::BeamBottom => {
            let anchorage = development_length(diameter, member.concrete_grade) / 3.0;
            Measurement::span(clamp(member.span_x - 2.0 * cover))
                .with(Segment::B, anchorage)
                .with(Segment::C, anchorage)
        }
        PatternCategory::BeamSideFace => Measurement::span(clamp(member.span_x - 2.0 * cover)),
        PatternCategory::BeamStirrup => closed_link(clamp(member.span_y - 2.0 * cover), rise, hook),
        PatternCategory::ColumnMain => {
            Measurement::span(member.depth).with(Segment::B, lap_length(diameter, member.concrete_grade))
        }
        PatternCategory::ColumnTie => closed_link(
            clamp(member.span_x - 2.0 * cover),
            clamp(member.span_y - 2.0 * cover),
            hook,
        ),
        PatternCategory::FootingMesh => Measurement::span(clamp(member.span_along(direction) - 2.0 * cover))
            .with(Segment::B, rise)
            .with(Segment::C, rise),
        PatternCategory::FootingDowel => Measurement::span(clamp(member.depth - cover))
            .with(Segment::B, lap_length(diameter, member.concrete_grade))
            .with(Segment::C, DOWEL_FOOT_MULTIPLIER * d),
        PatternCategory::Generic => Measurement::span(member.span_along(direction)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::members::{ConcreteGrade, EdgeValues, MemberType};

    fn slab() -> Member {
        Member::new("S1", MemberType::Slab, 3050.0, 4200.0, 150.0, 20.0)
            .with_edge_beams(EdgeValues {
                north: 300.0,
                south: 250.0,
                east: 230.0,
                west: 200.0,
            })
            .with_top_extensions(EdgeValues {
                north: 1050.0,
                south: 1000.0,
                east: 800.0,
                west: 750.0,
            })
    }

    fn params() -> ProfileParameters {
        ProfileParameters::default()
    }

    #[test]
    fn test_full_span_segments() {
        let m = resolve(&slab(), PatternCategory::SlabFullSpan, Direction::Primary, Diameter::D10, &params());
        assert_eq!(m.a, 3050.0);
        assert_eq!(m.b, Some(180.0));
        assert_eq!(m.c, Some(210.0));
        assert_eq!(m.d, Some(110.0));
        assert_eq!(m.e, Some(110.0));
        assert_eq!(m.f, None);
        assert_eq!(m.plain_total(), 3050.0 + 180.0 + 210.0 + 220.0);
    }

    #[test]
    fn test_missing_cover_uses_parameter_default() {
        let member = slab().with_profile_cover();
        let params = ProfileParameters {
            cover_mm: 30.0,
            ..ProfileParameters::default()
        };
        let m = resolve(&member, PatternCategory::SlabFullSpan, Direction::Primary, Diameter::D10, &params);
        assert_eq!(m.b, Some(170.0));
        assert_eq!(m.c, Some(200.0));
        assert_eq!(m.d, Some(90.0));
    }

    #[test]
    fn test_distribution_takes_perpendicular_span() {
        let x = resolve(&slab(), PatternCategory::SlabDistribution, Direction::Primary, Diameter::D8, &params());
        assert_eq!(x.a, 4200.0);
        // south 250 - 20, north 300 - 20
        assert_eq!(x.b, Some(510.0));
        assert_eq!(x.c, Some(DISTRIBUTION_FOOT_MM));

        let y = resolve(
            &slab(),
            PatternCategory::SlabDistribution,
            Direction::Perpendicular,
            Diameter::D8,
            &params(),
        );
        assert_eq!(y.a, 3050.0);
        // west 200 - 20, east 230 - 20
        assert_eq!(y.b, Some(390.0));
    }

    #[test]
    fn test_u_extension_segments() {
        let m = resolve(&slab(), PatternCategory::SlabUExtension, Direction::Perpendicular, Diameter::D10, &params());
        assert_eq!(m.a, 4200.0);
        assert_eq!(m.b, Some(255.0));
        assert!((m.c.unwrap() - CRANK_RISE_MULTIPLE * 110.0).abs() < 1e-9);
        assert_eq!(m.d, Some(110.0));
        assert_eq!(m.e, Some(110.0));
        assert_eq!(m.f, Some(2050.0));
    }

    #[test]
    fn test_top_bottom_matches_u_path() {
        let u = resolve(&slab(), PatternCategory::SlabUExtension, Direction::Primary, Diameter::D10, &params());
        let tb = resolve(&slab(), PatternCategory::SlabTopBottom, Direction::Primary, Diameter::D10, &params());
        assert_eq!(u, tb);
    }

    #[test]
    fn test_narrow_beams_clamp_to_zero() {
        let mut s = slab();
        s.edge_beams = EdgeValues::uniform(15.0);
        s.depth = 30.0;
        let m = resolve(&s, PatternCategory::SlabFullSpan, Direction::Primary, Diameter::D10, &params());
        assert_eq!(m.b, Some(0.0));
        assert_eq!(m.c, Some(0.0));
        assert_eq!(m.d, Some(0.0));
        assert_eq!(m.bent_segment_count(), 0);
    }

    #[test]
    fn test_generic_is_bare_span() {
        let m = resolve(&slab(), PatternCategory::Generic, Direction::Perpendicular, Diameter::D10, &params());
        assert_eq!(m, Measurement::span(4200.0));
    }

    #[test]
    fn test_beam_stirrup_perimeter() {
        let beam = Member::new("B1", MemberType::Beam, 4000.0, 230.0, 450.0, 25.0);
        let m = resolve(&beam, PatternCategory::BeamStirrup, Direction::Unspecified, Diameter::D8, &params());
        assert_eq!(m.a, 180.0);
        assert_eq!(m.b, Some(400.0));
        assert_eq!(m.e, Some(72.0));
        assert_eq!(m.plain_total(), 2.0 * (180.0 + 400.0) + 144.0);
    }

    #[test]
    fn test_beam_top_uses_development_length() {
        let beam = Member::new("B1", MemberType::Beam, 4000.0, 230.0, 450.0, 25.0).with_grade(ConcreteGrade::M20);
        let m = resolve(&beam, PatternCategory::BeamTop, Direction::Unspecified, Diameter::D16, &params());
        assert_eq!(m.a, 3950.0);
        assert_eq!(m.b, Some(760.0));
        assert_eq!(m.c, Some(760.0));
    }

    #[test]
    fn test_column_main_adds_lap_with_fallback() {
        let column = Member::new("C1", MemberType::Column, 300.0, 450.0, 3000.0, 40.0);
        let m = resolve(&column, PatternCategory::ColumnMain, Direction::Unspecified, Diameter::D28, &params());
        assert_eq!(m.a, 3000.0);
        assert_eq!(m.b, Some(1400.0));
    }

    #[test]
    fn test_footing_dowel() {
        let footing = Member::new("F1", MemberType::Footing, 1800.0, 1800.0, 450.0, 50.0);
        let m = resolve(&footing, PatternCategory::FootingDowel, Direction::Unspecified, Diameter::D16, &params());
        assert_eq!(m.a, 400.0);
        assert_eq!(m.b, Some(850.0));
        assert_eq!(m.c, Some(192.0));
    }

    #[test]
    fn test_u_totals() {
        let m = Measurement::span(1000.0)
            .with(Segment::B, 10.0)
            .with(Segment::C, 20.0)
            .with(Segment::D, 30.0)
            .with(Segment::E, 40.0)
            .with(Segment::F, 50.0);
        assert_eq!(m.u_total_without_f(), 1000.0 + 20.0 + 40.0 + 60.0 + 40.0);
        assert_eq!(m.u_total(), 1210.0);
        assert_eq!(m.plain_total(), 1150.0);
    }
}
