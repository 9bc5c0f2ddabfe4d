//! Built-in code profiles.
//!
//! | Id         | Standard              | Cover | h  | m45 | m90 | m135 |
//! |------------|-----------------------|-------|----|-----|-----|------|
//! | `is-456`   | IS 456:2000 / SP 34   | 25    | 9  | 1   | 2   | 3    |
//! | `bs-8666`  | BS 8666:2020          | 30    | 8  | 1   | 2   | 4    |
//! | `custom`   | User-editable         | 25    | 9  | 1   | 2   | 3    |
//!
//! The registry itself is immutable. Lookups return `None` for unknown ids
//! and leave the fallback decision to the caller.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use super::{BendMultipliers, CodeProfile, MemberDefaults, MemberLimits, MemberSettings, ProfileParameters};
use crate::bars::Diameter;
use crate::errors::{BbsError, BbsResult};
use crate::members::MemberType;

/// Profile used when a project does not name one
pub const DEFAULT_PROFILE_ID: &str = "is-456";

static BUILT_IN_PROFILES: Lazy<Vec<CodeProfile>> = Lazy::new(|| vec![is_456(), bs_8666(), custom()]);

/// All built-in profiles in display order
pub fn all() -> &'static [CodeProfile] {
    &BUILT_IN_PROFILES
}

/// Look a profile up by id
pub fn lookup(id: &str) -> Option<&'static CodeProfile> {
    BUILT_IN_PROFILES.iter().find(|p| p.id == id)
}

/// Look a profile up by id, treating an unknown id as a configuration error
pub fn require(id: &str) -> BbsResult<&'static CodeProfile> {
    lookup(id).ok_or_else(|| BbsError::unknown_profile(id))
}

fn settings(
    cover_mm: f64,
    spacing_mm: f64,
    diameters: &[Diameter],
    min_cover_mm: f64,
    max_spacing_mm: f64,
) -> MemberSettings {
    MemberSettings {
        defaults: MemberDefaults {
            cover_mm,
            spacing_mm,
            diameters: diameters.to_vec(),
        },
        limits: MemberLimits {
            min_cover_mm,
            max_spacing_mm,
        },
    }
}

fn is_456() -> CodeProfile {
    use Diameter::*;
    let member_settings = BTreeMap::from([
        (MemberType::Beam, settings(25.0, 150.0, &[D8, D10, D12, D16, D20, D25], 25.0, 300.0)),
        (MemberType::Column, settings(40.0, 200.0, &[D8, D12, D16, D20, D25], 40.0, 300.0)),
        (MemberType::Slab, settings(20.0, 150.0, &[D8, D10, D12], 15.0, 300.0)),
        (MemberType::Footing, settings(50.0, 150.0, &[D10, D12, D16, D20], 50.0, 300.0)),
    ]);
    CodeProfile {
        id: "is-456".to_string(),
        name: "IS 456:2000 / SP 34".to_string(),
        editable: false,
        parameters: ProfileParameters {
            cover_mm: 25.0,
            hook_multiplier: 9.0,
            bends: BendMultipliers {
                deg45: 1.0,
                deg90: 2.0,
                deg135: 3.0,
            },
            unit_weights: None,
        },
        member_settings,
    }
}

fn bs_8666() -> CodeProfile {
    use Diameter::*;
    let member_settings = BTreeMap::from([
        (MemberType::Beam, settings(30.0, 175.0, &[D8, D10, D12, D16, D20, D25, D32], 25.0, 300.0)),
        (MemberType::Column, settings(40.0, 200.0, &[D10, D12, D16, D20, D25, D32], 35.0, 300.0)),
        (MemberType::Slab, settings(25.0, 200.0, &[D8, D10, D12, D16], 20.0, 350.0)),
        (MemberType::Footing, settings(75.0, 200.0, &[D12, D16, D20, D25], 50.0, 300.0)),
    ]);
    let unit_weights = BTreeMap::from([
        (6, 0.222),
        (8, 0.395),
        (10, 0.617),
        (12, 0.888),
        (16, 1.579),
        (20, 2.466),
        (25, 3.854),
        (32, 6.313),
        (40, 9.864),
    ]);
    CodeProfile {
        id: "bs-8666".to_string(),
        name: "BS 8666:2020".to_string(),
        editable: false,
        parameters: ProfileParameters {
            cover_mm: 30.0,
            hook_multiplier: 8.0,
            bends: BendMultipliers {
                deg45: 1.0,
                deg90: 2.0,
                deg135: 4.0,
            },
            unit_weights: Some(unit_weights),
        },
        member_settings,
    }
}

fn custom() -> CodeProfile {
    is_456().customize("custom", "Custom")
}
