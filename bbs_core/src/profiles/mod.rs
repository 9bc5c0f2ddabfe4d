//! # Code Profiles
//!
//! A code profile is a named parameter set corresponding to a design
//! standard: bend deduction multipliers, hook length multiplier, default
//! cover, and per-member-type defaults and limits.
//!
//! Profiles are pure reference data. Computation functions never look a
//! profile up themselves; callers pass the active [`ProfileParameters`]
//! explicitly.
//!
//! ## Modules
//!
//! - [`registry`] - built-in profiles and lookup by id
//! - [`validation`] - range checks returning itemized errors and warnings
//!
//! ## Example
//!
//! ```rust
//! use bbs_core::profiles::registry;
//!
//! let profile = registry::lookup("is-456").unwrap();
//! assert_eq!(profile.parameters.hook_multiplier, 9.0);
//! assert!(registry::lookup("no-such-code").is_none());
//! ```

pub mod registry;
pub mod validation;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bars::Diameter;
use crate::errors::{BbsError, BbsResult};
use crate::members::MemberType;
use crate::shapes::BendAngle;

pub use registry::{lookup, require, DEFAULT_PROFILE_ID};
pub use validation::{validate_parameters, validate_profile, ProfileIssue, ProfileValidation, Severity};

/// Bend deduction multipliers per angle class (deduction = multiplier × d)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BendMultipliers {
    pub deg45: f64,
    pub deg90: f64,
    pub deg135: f64,
}

impl BendMultipliers {
    /// Multiplier for a bend angle. 180° hook bends use the 90° multiplier.
    pub fn for_angle(&self, angle: BendAngle) -> f64 {
        match angle {
            BendAngle::Deg45 => self.deg45,
            BendAngle::Deg90 | BendAngle::Deg180 => self.deg90,
            BendAngle::Deg135 => self.deg135,
        }
    }
}

impl Default for BendMultipliers {
    fn default() -> Self {
        BendMultipliers {
            deg45: 1.0,
            deg90: 2.0,
            deg135: 3.0,
        }
    }
}

/// The scalar parameters every computation takes.
///
/// `unit_weights` optionally overrides the `d²/162` kg/m approximation,
/// keyed by nominal diameter in mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileParameters {
    /// Default clear cover (mm)
    pub cover_mm: f64,

    /// Hook length = hook_multiplier × d
    pub hook_multiplier: f64,

    pub bends: BendMultipliers,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_weights: Option<BTreeMap<u32, f64>>,
}

impl Default for ProfileParameters {
    fn default() -> Self {
        ProfileParameters {
            cover_mm: 25.0,
            hook_multiplier: 9.0,
            bends: BendMultipliers::default(),
            unit_weights: None,
        }
    }
}

/// Defaults offered when adding a bar to a member of a given type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDefaults {
    pub cover_mm: f64,
    pub spacing_mm: f64,
    pub diameters: Vec<Diameter>,
}

/// Advisory limits for a member type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberLimits {
    pub min_cover_mm: f64,
    pub max_spacing_mm: f64,
}

/// Defaults and limits for one member type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSettings {
    pub defaults: MemberDefaults,
    pub limits: MemberLimits,
}

/// A named code profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeProfile {
    pub id: String,
    pub name: String,
    /// Whether users may change the parameters in place
    pub editable: bool,
    pub parameters: ProfileParameters,
    pub member_settings: BTreeMap<MemberType, MemberSettings>,
}

impl CodeProfile {
    pub fn member_defaults(&self, member_type: MemberType) -> Option<&MemberDefaults> {
        self.member_settings.get(&member_type).map(|s| &s.defaults)
    }

    pub fn member_limits(&self, member_type: MemberType) -> Option<MemberLimits> {
        self.member_settings.get(&member_type).map(|s| s.limits)
    }

    /// Editable copy of this profile under a new id
    pub fn customize(&self, id: impl Into<String>, name: impl Into<String>) -> CodeProfile {
        CodeProfile {
            id: id.into(),
            name: name.into(),
            editable: true,
            ..self.clone()
        }
    }

    /// Replace the scalar parameters of an editable profile.
    ///
    /// The new parameters must pass validation; warnings are returned.
    pub fn set_parameters(&mut self, parameters: ProfileParameters) -> BbsResult<Vec<ProfileIssue>> {
        if !self.editable {
            return Err(BbsError::invalid_input(
                "profile",
                self.id.clone(),
                "Built-in profiles are read-only; customize() a copy first",
            ));
        }
        let warnings = validate_parameters(&parameters).into_result(&self.id)?;
        self.parameters = parameters;
        Ok(warnings)
    }
}
