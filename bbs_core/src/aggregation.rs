//! # Aggregation
//!
//! Groups calculated bars by diameter, by shape, and by member type. Every
//! grouping partitions the bar list, so each one's weights sum to the
//! grand total (up to floating-point rounding).
//!
//! ## Example
//!
//! ```rust
//! use bbs_core::aggregation::{by_diameter, grand_total, conserves};
//! # use bbs_core::bars::{BarDescription, Diameter};
//! # use bbs_core::calculations::schedule::calculate_bar;
//! # use bbs_core::members::{Member, MemberType};
//! # use bbs_core::profiles::ProfileParameters;
//! # use bbs_core::shapes::{ShapeCode, ShapeDimensions};
//! # let beam = Member::new("B1", MemberType::Beam, 4000.0, 230.0, 450.0, 25.0);
//! # let params = ProfileParameters::default();
//! # let bars: Vec<_> = [(Diameter::D12, 10), (Diameter::D16, 4), (Diameter::D12, 2)]
//! #     .into_iter()
//! #     .map(|(d, n)| {
//! #         let bar = BarDescription::shaped(ShapeCode::Straight, ShapeDimensions::a(3000.0), d, n);
//! #         calculate_bar(&beam, &bar, &params).unwrap()
//! #     })
//! #     .collect();
//! let groups = by_diameter(&bars);
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups[0].totals.total_bars, 12);
//! assert!(conserves(&groups, &grand_total(&bars), 0.001));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bars::Diameter;
use crate::calculations::schedule::{CalculatedBar, ShapeKey};
use crate::members::MemberType;

/// Summed quantities over a set of schedule lines
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    /// Number of schedule lines
    pub entries: usize,
    pub total_bars: u64,
    pub total_length_m: f64,
    pub total_weight_kg: f64,
}

impl Totals {
    fn add(&mut self, bar: &CalculatedBar) {
        self.entries += 1;
        self.total_bars += u64::from(bar.total_bars);
        self.total_length_m += bar.total_length_m;
        self.total_weight_kg += bar.total_weight_kg;
    }
}

/// Totals for one group key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotals<K> {
    pub key: K,
    #[serde(flatten)]
    pub totals: Totals,
}

/// Group bars by `key`, in ascending key order
pub fn group_by<K, F>(bars: &[CalculatedBar], key: F) -> Vec<GroupTotals<K>>
where
    K: Ord,
    F: Fn(&CalculatedBar) -> K,
{
    let mut groups: BTreeMap<K, Totals> = BTreeMap::new();
    for bar in bars {
        groups.entry(key(bar)).or_default().add(bar);
    }
    groups
        .into_iter()
        .map(|(key, totals)| GroupTotals { key, totals })
        .collect()
}

pub fn by_diameter(bars: &[CalculatedBar]) -> Vec<GroupTotals<Diameter>> {
    group_by(bars, |b| b.diameter)
}

pub fn by_shape(bars: &[CalculatedBar]) -> Vec<GroupTotals<ShapeKey>> {
    group_by(bars, |b| b.shape)
}

pub fn by_member_type(bars: &[CalculatedBar]) -> Vec<GroupTotals<MemberType>> {
    group_by(bars, |b| b.member_type)
}

pub fn grand_total(bars: &[CalculatedBar]) -> Totals {
    let mut totals = Totals::default();
    for bar in bars {
        totals.add(bar);
    }
    totals
}

/// True when the group weights sum to the grand total within `tolerance` kg
pub fn conserves<K>(groups: &[GroupTotals<K>], grand_total: &Totals, tolerance: f64) -> bool {
    let sum: f64 = groups.iter().map(|g| g.totals.total_weight_kg).sum();
    (sum - grand_total.total_weight_kg).abs() <= tolerance
}

/// Bars belonging to members of one type, in input order
pub fn filter_by_member_type(bars: &[CalculatedBar], member_type: MemberType) -> Vec<&CalculatedBar> {
    bars.iter().filter(|b| b.member_type == member_type).collect()
}

/// Bars split by member type. Types with no bars are absent.
pub fn partition_by_member_type(bars: &[CalculatedBar]) -> BTreeMap<MemberType, Vec<&CalculatedBar>> {
    let mut parts: BTreeMap<MemberType, Vec<&CalculatedBar>> = BTreeMap::new();
    for bar in bars {
        parts.entry(bar.member_type).or_default().push(bar);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bars::{BarDescription, Direction};
    use crate::calculations::schedule::build_schedule;
    use crate::members::{EdgeValues, Member};
    use crate::profiles::ProfileParameters;
    use crate::shapes::{ShapeCode, ShapeDimensions};

    fn sample() -> Vec<CalculatedBar> {
        let slab = Member::new("S1", MemberType::Slab, 3050.0, 4200.0, 150.0, 20.0)
            .with_edge_beams(EdgeValues::uniform(230.0))
            .with_top_extensions(EdgeValues::uniform(900.0))
            .with_bar(BarDescription::spaced("Bottom Bar (X-X)", Direction::Primary, Diameter::D10, 150.0))
            .with_bar(BarDescription::spaced("Distribution Bar (Y-Y)", Direction::Perpendicular, Diameter::D8, 200.0));
        let beam = Member::new("B1", MemberType::Beam, 4000.0, 230.0, 450.0, 25.0)
            .with_bar(BarDescription::shaped(ShapeCode::Stirrup, ShapeDimensions::ab(180.0, 400.0), Diameter::D8, 27))
            .with_bar(BarDescription::counted("Top Bar", Diameter::D16, 2));
        build_schedule([&slab, &beam], &ProfileParameters::default()).unwrap().bars
    }

    #[test]
    fn test_groupings_conserve_weight() {
        let bars = sample();
        let grand = grand_total(&bars);
        assert_eq!(grand.entries, 4);
        assert!(conserves(&by_diameter(&bars), &grand, 0.001));
        assert!(conserves(&by_shape(&bars), &grand, 0.001));
        assert!(conserves(&by_member_type(&bars), &grand, 0.001));
    }

    #[test]
    fn test_diameter_groups_merge() {
        let bars = sample();
        let groups = by_diameter(&bars);
        let keys: Vec<_> = groups.iter().map(|g| g.key).collect();
        assert_eq!(keys, vec![Diameter::D8, Diameter::D10, Diameter::D16]);
        assert_eq!(groups[0].totals.entries, 2);
    }

    #[test]
    fn test_partition_is_disjoint_and_exhaustive() {
        let bars = sample();
        let parts = partition_by_member_type(&bars);
        let total: usize = parts.values().map(Vec::len).sum();
        assert_eq!(total, bars.len());
        assert_eq!(filter_by_member_type(&bars, MemberType::Column).len(), 0);
        assert_eq!(filter_by_member_type(&bars, MemberType::Slab).len(), 2);
    }

    #[test]
    fn test_group_json_is_flat() {
        let bars = sample();
        let json = serde_json::to_value(&by_member_type(&bars)[0]).unwrap();
        assert_eq!(json["key"], "Beam");
        assert!(json.get("total_weight_kg").is_some());
    }
}
