//! Input validation shared by interactive entry and bulk import.
//!
//! Validation reports every problem it finds instead of stopping at the
//! first, so an import can show all bad cells in a row at once. Diameters
//! need no check here: [`Diameter`](crate::bars::Diameter) only
//! deserializes from the standard sizes.

use serde::{Deserialize, Serialize};

use crate::bars::{BarDescription, BarGeometry};
use crate::calculations::measurement::Segment;
use crate::errors::{BbsError, BbsResult};
use crate::members::Member;

/// One invalid field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub error: BbsError,
}

impl FieldIssue {
    fn new(field: impl Into<String>, error: BbsError) -> Self {
        FieldIssue {
            field: field.into(),
            error,
        }
    }

    fn invalid(field: &str, value: f64, reason: &str) -> Self {
        FieldIssue::new(field, BbsError::invalid_input(field, value.to_string(), reason))
    }
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Validate one bar description
pub fn validate_bar(bar: &BarDescription) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    if bar.label.trim().is_empty() {
        issues.push(FieldIssue::new("label", BbsError::missing_field("label")));
    }

    if !is_non_negative(bar.spacing_mm) {
        issues.push(FieldIssue::new(
            "spacing_mm",
            BbsError::invalid_spacing(bar.spacing_mm, "Spacing cannot be negative"),
        ));
    } else if bar.spacing_mm == 0.0 && bar.quantity.is_none() && bar.overrides.bar_count.is_none() {
        issues.push(FieldIssue::new("quantity", BbsError::missing_field("quantity")));
    }

    if bar.quantity == Some(0) {
        issues.push(FieldIssue::new(
            "quantity",
            BbsError::invalid_input("quantity", "0", "Quantity must be positive"),
        ));
    }
    if bar.bars_per_member == Some(0) {
        issues.push(FieldIssue::new(
            "bars_per_member",
            BbsError::invalid_input("bars_per_member", "0", "Bars per member must be positive"),
        ));
    }

    match &bar.geometry {
        BarGeometry::Derived => {}
        BarGeometry::Shape { shape, dimensions } => {
            let def = shape.definition();
            for &dimension in def.required_dimensions {
                let field = format!("dimensions.{}", dimension.letter().to_lowercase());
                match dimensions.get(dimension) {
                    None => issues.push(FieldIssue::new(
                        field,
                        BbsError::missing_dimension(def.name, dimension.letter()),
                    )),
                    Some(value) if !is_positive(value) => {
                        issues.push(FieldIssue::invalid(&field, value, "Shape dimensions must be positive"))
                    }
                    Some(_) => {}
                }
            }
        }
        BarGeometry::Segments { segments, lap_mm } => {
            if !is_positive(segments.a) {
                issues.push(FieldIssue::invalid("segments.a", segments.a, "Segment A must be positive"));
            }
            for segment in &Segment::ALL[1..] {
                if let Some(value) = segments.get(*segment) {
                    if !is_non_negative(value) {
                        let field = format!("segments.{}", segment.letter().to_lowercase());
                        issues.push(FieldIssue::invalid(&field, value, "Segments cannot be negative"));
                    }
                }
            }
            if !is_non_negative(*lap_mm) {
                issues.push(FieldIssue::invalid("lap_mm", *lap_mm, "Lap length cannot be negative"));
            }
        }
    }

    issues
}

/// Validate a member's geometry and all of its bars. Bar fields are
/// prefixed `bars[i].`.
pub fn validate_member(member: &Member) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    if member.mark.trim().is_empty() {
        issues.push(FieldIssue::new("mark", BbsError::missing_field("mark")));
    }
    for (field, value) in [
        ("span_x", member.span_x),
        ("span_y", member.span_y),
        ("depth", member.depth),
    ] {
        if !is_positive(value) {
            issues.push(FieldIssue::invalid(field, value, "Member dimensions must be positive"));
        }
    }
    if let Some(cover) = member.cover {
        if !is_non_negative(cover) {
            issues.push(FieldIssue::invalid("cover", cover, "Cover cannot be negative"));
        }
    }

    for (name, edges) in [("edge_beams", &member.edge_beams), ("top_extensions", &member.top_extensions)] {
        for (edge, value) in [
            ("north", edges.north),
            ("south", edges.south),
            ("east", edges.east),
            ("west", edges.west),
        ] {
            if !is_non_negative(value) {
                issues.push(FieldIssue::invalid(&format!("{}.{}", name, edge), value, "Cannot be negative"));
            }
        }
    }

    for (index, bar) in member.bars.iter().enumerate() {
        issues.extend(validate_bar(bar).into_iter().map(|issue| FieldIssue {
            field: format!("bars[{}].{}", index, issue.field),
            ..issue
        }));
    }

    issues
}

fn first_issue(issues: Vec<FieldIssue>) -> BbsResult<()> {
    match issues.into_iter().next() {
        Some(issue) => Err(issue.error),
        None => Ok(()),
    }
}

/// `Err` carrying the first issue, if any
pub fn ensure_valid_bar(bar: &BarDescription) -> BbsResult<()> {
    first_issue(validate_bar(bar))
}

/// `Err` carrying the member's first issue, if any. Bar issues keep the
/// bar's own error.
pub fn ensure_valid_member(member: &Member) -> BbsResult<()> {
    first_issue(validate_member(member))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bars::{Diameter, Direction};
    use crate::calculations::measurement::Measurement;
    use crate::members::MemberType;
    use crate::shapes::{ShapeCode, ShapeDimensions};

    #[test]
    fn test_valid_bars_pass() {
        let spaced = BarDescription::spaced("Bottom Bar", Direction::Primary, Diameter::D10, 150.0);
        assert!(validate_bar(&spaced).is_empty());
        let shaped = BarDescription::shaped(ShapeCode::UShape, ShapeDimensions::ab(2000.0, 300.0), Diameter::D16, 4);
        assert!(ensure_valid_bar(&shaped).is_ok());
    }

    #[test]
    fn test_reports_every_problem() {
        let mut bar = BarDescription::spaced("  ", Direction::Primary, Diameter::D10, -5.0);
        bar.bars_per_member = Some(0);
        let fields: Vec<_> = validate_bar(&bar).into_iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["label", "spacing_mm", "bars_per_member"]);
    }

    #[test]
    fn test_zero_spacing_needs_quantity() {
        let bar = BarDescription::spaced("Top Bar", Direction::Primary, Diameter::D10, 0.0);
        let issues = validate_bar(&bar);
        assert_eq!(issues[0].error, BbsError::missing_field("quantity"));

        let zero = BarDescription::counted("Top Bar", Diameter::D10, 0);
        assert_eq!(validate_bar(&zero)[0].field, "quantity");
    }

    #[test]
    fn test_missing_shape_dimension() {
        let bar = BarDescription::shaped(ShapeCode::Cranked, ShapeDimensions::ab(3000.0, 300.0), Diameter::D12, 2);
        let err = ensure_valid_bar(&bar).unwrap_err();
        assert_eq!(err, BbsError::missing_dimension("Cranked", "C"));
    }

    #[test]
    fn test_zero_shape_dimension() {
        let bar = BarDescription::shaped(ShapeCode::LShape, ShapeDimensions::ab(3000.0, 0.0), Diameter::D12, 2);
        assert_eq!(validate_bar(&bar)[0].field, "dimensions.b");
    }

    #[test]
    fn test_negative_segment() {
        let mut bar = BarDescription::counted("Starter", Diameter::D16, 4);
        bar.geometry = BarGeometry::Segments {
            segments: Measurement::span(1200.0).with(Segment::D, -10.0),
            lap_mm: -1.0,
        };
        let fields: Vec<_> = validate_bar(&bar).into_iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["segments.d", "lap_mm"]);
    }

    #[test]
    fn test_member_prefixes_bar_fields() {
        let member = Member::new("", MemberType::Beam, 4000.0, 0.0, 450.0, -1.0)
            .with_bar(BarDescription::spaced("Top", Direction::Primary, Diameter::D12, 150.0))
            .with_bar(BarDescription::spaced("", Direction::Primary, Diameter::D12, 150.0));
        let fields: Vec<_> = validate_member(&member).into_iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["mark", "span_y", "cover", "bars[1].label"]);
    }

    #[test]
    fn test_member_without_cover_is_valid() {
        let member = Member::new("S1", MemberType::Slab, 3050.0, 4200.0, 150.0, 20.0).with_profile_cover();
        assert!(validate_member(&member).is_empty());
    }

    #[test]
    fn test_ensure_valid_member_reports_first_issue() {
        let member = Member::new("S1", MemberType::Slab, -3050.0, 4200.0, 150.0, -20.0);
        let err = ensure_valid_member(&member).unwrap_err();
        assert_eq!(
            err,
            BbsError::invalid_input("span_x", "-3050", "Member dimensions must be positive")
        );
    }

    #[test]
    fn test_issue_display() {
        let bar = BarDescription::spaced("", Direction::Primary, Diameter::D12, 150.0);
        let issue = &validate_bar(&bar)[0];
        assert_eq!(issue.to_string(), "label: Missing required field: label");
    }
}
