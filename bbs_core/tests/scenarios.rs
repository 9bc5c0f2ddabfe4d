//! End-to-end schedule scenarios with hand-checked numbers.

use bbs_core::bars::{BarDescription, Diameter, Direction};
use bbs_core::calculations::deduction::DeductionRule;
use bbs_core::calculations::measurement::CRANK_RISE_MULTIPLE;
use bbs_core::calculations::schedule::{calculate_bar, ShapeKey};
use bbs_core::classifier::PatternCategory;
use bbs_core::file_io::{project_from_json, project_to_json};
use bbs_core::members::{EdgeValues, Member, MemberType};
use bbs_core::profiles::ProfileParameters;
use bbs_core::project::Project;
use bbs_core::shapes::{ShapeCode, ShapeDimensions};

fn beam() -> Member {
    Member::new("B1", MemberType::Beam, 4000.0, 230.0, 450.0, 25.0)
}

fn slab() -> Member {
    Member::new("S1", MemberType::Slab, 3050.0, 4200.0, 150.0, 20.0)
        .with_edge_beams(EdgeValues {
            north: 300.0,
            south: 250.0,
            east: 230.0,
            west: 230.0,
        })
        .with_top_extensions(EdgeValues {
            north: 1050.0,
            south: 1000.0,
            east: 800.0,
            west: 800.0,
        })
}

#[test]
fn straight_bar_weight() {
    let bar = BarDescription::shaped(ShapeCode::Straight, ShapeDimensions::a(3000.0), Diameter::D12, 10);
    let calc = calculate_bar(&beam(), &bar, &ProfileParameters::default()).unwrap();

    assert_eq!(calc.cut_length_mm, 3000.0);
    assert!((calc.unit_weight_kg_m - 0.888).abs() < 0.001);
    assert!((calc.total_length_m * 1000.0 - 30_000.0).abs() < 1e-6);
    // 30 m at 144/162 kg/m
    assert!((calc.total_weight_kg - 26.667).abs() < 0.001);
}

#[test]
fn u_shape_cut_length() {
    let bar = BarDescription::shaped(ShapeCode::UShape, ShapeDimensions::ab(2000.0, 300.0), Diameter::D16, 1);
    let calc = calculate_bar(&beam(), &bar, &ProfileParameters::default()).unwrap();
    assert_eq!(calc.cut_length_mm, 2000.0 + 600.0 - 2.0 * (2.0 * 16.0));
}

#[test]
fn full_span_bottom_bar_count() {
    let bar = BarDescription::spaced("Bottom Bar (X-X)", Direction::Primary, Diameter::D10, 275.0);
    let calc = calculate_bar(&slab(), &bar, &ProfileParameters::default()).unwrap();
    assert_eq!(calc.shape, ShapeKey::Pattern(PatternCategory::SlabFullSpan));
    assert_eq!(calc.total_members, 12);
    assert_eq!(calc.total_bars, 12);
}

#[test]
fn distribution_bars_use_cross_axis() {
    let params = ProfileParameters::default();
    let x = calculate_bar(
        &slab(),
        &BarDescription::spaced("Distribution Bar (X-X)", Direction::Primary, Diameter::D8, 200.0),
        &params,
    )
    .unwrap();
    let y = calculate_bar(
        &slab(),
        &BarDescription::spaced("Distribution Bar (Y-Y)", Direction::Perpendicular, Diameter::D8, 200.0),
        &params,
    )
    .unwrap();

    // length from the other span
    assert_eq!(x.measurement.a, 4200.0);
    assert_eq!(y.measurement.a, 3050.0);
    // count from the top extensions on the bar's own edges
    assert_eq!(x.total_members, 8); // (800 + 800) / 200
    assert_eq!(y.total_members, 11); // (1000 + 1050) / 200 = 10.25
    assert_eq!(x.bend_count, 2);
}

#[test]
fn y_main_bar_with_extension_adds_and_rounds() {
    let bar = BarDescription::spaced("Main Bar (Y - Y) with extention", Direction::Unspecified, Diameter::D10, 150.0);
    let calc = calculate_bar(&slab(), &bar, &ProfileParameters::default()).unwrap();

    assert_eq!(calc.direction, Direction::Perpendicular);
    assert_eq!(calc.deduction_rule, DeductionRule::AddAndRoundUp);
    assert_eq!(calc.bend_count, 4);

    // A = 4200, B = (230 + 280) / 2, C = k·110, D = E = 110
    let total = 4200.0 + 2.0 * 255.0 + 2.0 * CRANK_RISE_MULTIPLE * 110.0 + 2.0 * 110.0 + 110.0;
    assert!((calc.total_measurement_mm - total).abs() < 1e-9);
    let expected = ((total + 80.0) / 5.0).ceil() * 5.0;
    assert_eq!(calc.cut_length_mm, expected);
}

#[test]
fn x_main_bar_with_extension_subtracts() {
    let bar = BarDescription::spaced("Main Bar (X-X) with extension", Direction::Primary, Diameter::D10, 150.0);
    let calc = calculate_bar(&slab(), &bar, &ProfileParameters::default()).unwrap();

    assert_eq!(calc.deduction_rule, DeductionRule::Subtract);
    let u_total = 3050.0 + 2.0 * 210.0 + 2.0 * CRANK_RISE_MULTIPLE * 110.0 + 2.0 * 110.0 + 110.0 + 1600.0;
    assert!((calc.cut_length_mm - (u_total - 80.0)).abs() < 1e-9);
}

#[test]
fn narrow_edge_beams_clamp_instead_of_failing() {
    let mut member = slab();
    member.edge_beams = EdgeValues::uniform(10.0);
    member.depth = 30.0;
    let bar = BarDescription::spaced("Bottom Bar (X-X)", Direction::Primary, Diameter::D10, 150.0);
    let calc = calculate_bar(&member, &bar, &ProfileParameters::default()).unwrap();
    assert_eq!(calc.measurement.b, Some(0.0));
    assert_eq!(calc.measurement.d, Some(0.0));
    assert_eq!(calc.cut_length_mm, 3050.0);
}

#[test]
fn project_schedule_survives_persistence() {
    let mut project = Project::new("Jane Engineer", "25-042", "ACME Corp");
    project.add_member(
        slab()
            .with_bar(BarDescription::spaced("Bottom Bar (X-X)", Direction::Primary, Diameter::D10, 150.0))
            .with_bar(BarDescription::spaced("Distribution Bar (Y-Y)", Direction::Perpendicular, Diameter::D8, 200.0))
            .with_bar(BarDescription::spaced("Chair", Direction::Primary, Diameter::D8, 1000.0)),
    );
    project.add_member(
        beam()
            .with_bar(BarDescription::shaped(ShapeCode::Stirrup, ShapeDimensions::ab(180.0, 400.0), Diameter::D8, 27))
            .with_bar(BarDescription::counted("Top Bar", Diameter::D16, 2))
            .with_bar(BarDescription::counted("Bottom Bar", Diameter::D16, 3)),
    );
    project.apply_profile("bs-8666").unwrap();

    let before = project.schedule().unwrap();
    let restored = project_from_json(&project_to_json(&project).unwrap()).unwrap();
    let after = restored.schedule().unwrap();

    assert_eq!(before.bars.len(), 6);
    assert_eq!(before.low_confidence_count(), 1);
    assert_eq!(before.grand_total, after.grand_total);
    assert_eq!(before.by_diameter, after.by_diameter);

    // beams sort before slabs
    assert_eq!(before.bars[0].member_type, MemberType::Beam);
    assert_eq!(before.by_member_type.len(), 2);
}
