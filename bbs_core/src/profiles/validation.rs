//! Profile parameter validation.
//!
//! Errors block a profile from being applied; warnings are reported but do
//! not block.
//!
//! | Field              | Error when            | Warning when                 |
//! |--------------------|-----------------------|------------------------------|
//! | cover              | outside 10..=100 mm   | below 20 mm                  |
//! | hook multiplier    | ≤ 0 or > 20           | outside 6..=12               |
//! | bend multipliers   | < 0 or > 10           | not m45 ≤ m90 ≤ m135         |
//! | unit weight table  | non-standard size, ≤0 |                              |
//! | member cover       | below member minimum  |                              |
//! | member spacing     | ≤ 0 or above maximum  |                              |

use serde::{Deserialize, Serialize};

use super::{CodeProfile, ProfileParameters};
use crate::bars::Diameter;
use crate::errors::{BbsError, BbsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// One itemized validation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileIssue {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl std::fmt::Display for ProfileIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of validating a profile or parameter set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileValidation {
    pub issues: Vec<ProfileIssue>,
}

impl ProfileValidation {
    fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ProfileIssue {
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
        });
    }

    fn warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ProfileIssue {
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
        });
    }

    pub fn errors(&self) -> impl Iterator<Item = &ProfileIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ProfileIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// No blocking errors
    pub fn is_usable(&self) -> bool {
        self.errors().next().is_none()
    }

    /// `Err(ProfileRejected)` if any error is present, otherwise the warnings
    pub fn into_result(self, profile_id: &str) -> BbsResult<Vec<ProfileIssue>> {
        if self.is_usable() {
            return Ok(self.issues);
        }
        Err(BbsError::ProfileRejected {
            profile_id: profile_id.to_string(),
            errors: self.errors().map(|e| e.to_string()).collect(),
        })
    }
}

/// Validate the scalar parameters of a profile
pub fn validate_parameters(params: &ProfileParameters) -> ProfileValidation {
    let mut report = ProfileValidation::default();

    if !(10.0..=100.0).contains(&params.cover_mm) {
        report.error("cover_mm", format!("{} mm is outside 10-100 mm", params.cover_mm));
    } else if params.cover_mm < 20.0 {
        report.warning("cover_mm", format!("{} mm is below the usual 20 mm minimum", params.cover_mm));
    }

    let h = params.hook_multiplier;
    if !(h > 0.0 && h <= 20.0) {
        report.error("hook_multiplier", format!("{} must be in (0, 20]", h));
    } else if !(6.0..=12.0).contains(&h) {
        report.warning("hook_multiplier", format!("{} is outside the common 6-12 range", h));
    }

    let bends = [
        ("bends.deg45", params.bends.deg45),
        ("bends.deg90", params.bends.deg90),
        ("bends.deg135", params.bends.deg135),
    ];
    let mut bends_ok = true;
    for (field, value) in bends {
        if !(0.0..=10.0).contains(&value) {
            report.error(field, format!("{} must be in [0, 10]", value));
            bends_ok = false;
        }
    }
    if bends_ok && !(params.bends.deg45 <= params.bends.deg90 && params.bends.deg90 <= params.bends.deg135) {
        report.warning("bends", "Expected m45 <= m90 <= m135");
    }

    if let Some(table) = &params.unit_weights {
        for (&mm, &kg_per_m) in table {
            if Diameter::try_from(mm).is_err() {
                report.error(format!("unit_weights.{}", mm), "Not a standard bar size");
            }
            if !(kg_per_m.is_finite() && kg_per_m > 0.0) {
                report.error(format!("unit_weights.{}", mm), format!("{} kg/m must be positive", kg_per_m));
            }
        }
    }

    report
}

/// Validate scalar parameters plus per-member-type defaults and limits
pub fn validate_profile(profile: &CodeProfile) -> ProfileValidation {
    let mut report = validate_parameters(&profile.parameters);

    for (member_type, settings) in &profile.member_settings {
        let prefix = member_type.display_name().to_lowercase();
        let limits = settings.limits;
        let defaults = &settings.defaults;

        if limits.min_cover_mm < 0.0 {
            report.error(format!("{}.min_cover_mm", prefix), "Minimum cover cannot be negative");
        }
        if defaults.cover_mm < limits.min_cover_mm {
            report.error(
                format!("{}.cover_mm", prefix),
                format!("{} mm is below the {} mm minimum", defaults.cover_mm, limits.min_cover_mm),
            );
        }
        if limits.max_spacing_mm <= 0.0 {
            report.error(format!("{}.max_spacing_mm", prefix), "Maximum spacing must be positive");
        }
        if defaults.spacing_mm <= 0.0 || defaults.spacing_mm > limits.max_spacing_mm {
            report.error(
                format!("{}.spacing_mm", prefix),
                format!("{} mm must be in (0, {}] mm", defaults.spacing_mm, limits.max_spacing_mm),
            );
        }
        if defaults.diameters.is_empty() {
            report.warning(format!("{}.diameters", prefix), "No common diameters listed");
        }
    }

    report
}
