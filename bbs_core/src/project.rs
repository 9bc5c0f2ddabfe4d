//! # Project Data Structures
//!
//! The `Project` struct is the root container for a bar bending schedule.
//! Projects serialize to `.bbs` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: ProjectSettings (applied code profile parameters)
//! └── members: HashMap<Uuid, Member> (each member owns its bars)
//! ```
//!
//! Removing a member removes its bars with it.
//!
//! ## Example
//!
//! ```rust
//! use bbs_core::project::Project;
//! use bbs_core::members::{Member, MemberType};
//!
//! let mut project = Project::new("Jane Engineer", "25-042", "ACME Corp");
//! let id = project.add_member(Member::new("S1", MemberType::Slab, 3050.0, 4200.0, 150.0, 20.0));
//!
//! project.apply_profile("bs-8666").unwrap();
//! assert_eq!(project.settings.parameters.cover_mm, 30.0);
//! assert!(project.get_member(&id).is_some());
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bars::BarDescription;
use crate::calculations::schedule::{build_schedule, Schedule};
use crate::errors::{BbsError, BbsResult};
use crate::members::{Member, MemberType};
use crate::profiles::{
    registry, validate_parameters, validate_profile, CodeProfile, MemberSettings, ProfileIssue,
    ProfileParameters, Severity, DEFAULT_PROFILE_ID,
};
use crate::validation::ensure_valid_member;

/// Current schema version for .bbs files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,

    /// Applied code profile
    pub settings: ProjectSettings,

    /// All members, keyed by their id
    pub members: HashMap<Uuid, Member>,
}

impl Project {
    /// Create a new empty project using the default profile.
    ///
    /// ```rust
    /// use bbs_core::project::Project;
    ///
    /// let project = Project::new("John Doe", "25-001", "Client Corp");
    /// assert_eq!(project.meta.engineer, "John Doe");
    /// assert_eq!(project.settings.source_profile, "is-456");
    /// ```
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: ProjectSettings::default(),
            members: HashMap::new(),
        }
    }

    /// Add a member, returning its id
    pub fn add_member(&mut self, member: Member) -> Uuid {
        let id = member.id;
        self.members.insert(id, member);
        self.touch();
        id
    }

    /// Remove a member and all of its bars
    pub fn remove_member(&mut self, id: &Uuid) -> Option<Member> {
        let member = self.members.remove(id);
        if member.is_some() {
            self.touch();
        }
        member
    }

    pub fn get_member(&self, id: &Uuid) -> Option<&Member> {
        self.members.get(id)
    }

    /// Mutable access to a member. Does not mark the project modified;
    /// call [`Project::touch`] after changing it, or use
    /// [`Project::edit_member`].
    pub fn get_member_mut(&mut self, id: &Uuid) -> Option<&mut Member> {
        self.members.get_mut(id)
    }

    /// Apply `edit` to a member and mark the project modified.
    /// Returns `None` without touching the project if the id is unknown.
    pub fn edit_member<R>(&mut self, id: &Uuid, edit: impl FnOnce(&mut Member) -> R) -> Option<R> {
        let result = edit(self.members.get_mut(id)?);
        self.touch();
        Some(result)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Members in schedule order: by type, then mark, then id
    pub fn members_sorted(&self) -> Vec<&Member> {
        let mut members: Vec<&Member> = self.members.values().collect();
        members.sort_by(|a, b| {
            a.member_type
                .cmp(&b.member_type)
                .then_with(|| a.mark.cmp(&b.mark))
                .then_with(|| a.id.cmp(&b.id))
        });
        members
    }

    /// Every (member, bar) pair in schedule order
    pub fn bars(&self) -> impl Iterator<Item = (&Member, &BarDescription)> {
        self.members_sorted()
            .into_iter()
            .flat_map(|member| member.bars.iter().map(move |bar| (member, bar)))
    }

    /// Apply a built-in profile by id
    pub fn apply_profile(&mut self, profile_id: &str) -> BbsResult<Vec<ProfileIssue>> {
        let profile = registry::require(profile_id)?;
        self.apply_code_profile(profile)
    }

    /// Apply any profile, built-in or customized
    pub fn apply_code_profile(&mut self, profile: &CodeProfile) -> BbsResult<Vec<ProfileIssue>> {
        let warnings = self.settings.apply(profile)?;
        self.touch();
        Ok(warnings)
    }

    /// Compute the schedule under the project's current settings.
    ///
    /// Every member is validated first; the first invalid field in schedule
    /// order is returned as the error. Members without their own cover take
    /// the settings' default for their type.
    pub fn schedule(&self) -> BbsResult<Schedule> {
        let members = self
            .members_sorted()
            .into_iter()
            .map(|member| {
                ensure_valid_member(member)?;
                Ok::<_, BbsError>(self.settings.with_resolved_cover(member))
            })
            .collect::<BbsResult<Vec<_>>>()?;
        build_schedule(members.iter().map(|m| &**m), &self.settings.parameters)
    }

    /// Advisory limit warnings for every bar, keyed by bar id
    pub fn limit_warnings(&self) -> Vec<(Uuid, ProfileIssue)> {
        self.bars()
            .flat_map(|(member, bar)| {
                self.settings
                    .check_bar_against_limits(member, bar)
                    .into_iter()
                    .map(move |issue| (bar.id, issue))
            })
            .collect()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Code profile values copied into the project.
///
/// Applying a profile overwrites everything here, so applying the same
/// profile twice leaves identical settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Id of the profile these values came from
    pub source_profile: String,

    /// Parameters were edited after the profile was applied
    #[serde(default)]
    pub detached: bool,

    pub parameters: ProfileParameters,

    #[serde(default)]
    pub member_settings: BTreeMap<MemberType, MemberSettings>,
}

impl ProjectSettings {
    pub fn from_profile(profile: &CodeProfile) -> Self {
        ProjectSettings {
            source_profile: profile.id.clone(),
            detached: false,
            parameters: profile.parameters.clone(),
            member_settings: profile.member_settings.clone(),
        }
    }

    /// Validate and copy a profile in. Blocking errors leave the settings
    /// untouched; warnings are returned.
    pub fn apply(&mut self, profile: &CodeProfile) -> BbsResult<Vec<ProfileIssue>> {
        let warnings = validate_profile(profile).into_result(&profile.id)?;
        *self = ProjectSettings::from_profile(profile);
        tracing::info!(profile = %profile.id, warnings = warnings.len(), "applied code profile");
        Ok(warnings)
    }

    /// Replace the scalar parameters directly, detaching from the source
    /// profile.
    pub fn set_parameters(&mut self, parameters: ProfileParameters) -> BbsResult<Vec<ProfileIssue>> {
        let warnings = validate_parameters(&parameters).into_result(&self.source_profile)?;
        self.parameters = parameters;
        self.detached = true;
        Ok(warnings)
    }

    /// Cover used for members of `member_type` that carry none: the member
    /// type's default, else the profile cover.
    pub fn default_cover(&self, member_type: MemberType) -> f64 {
        self.member_settings
            .get(&member_type)
            .map(|s| s.defaults.cover_mm)
            .unwrap_or(self.parameters.cover_mm)
    }

    /// The member's cover, or the default for its type
    pub fn cover_for(&self, member: &Member) -> f64 {
        member.cover_or(self.default_cover(member.member_type))
    }

    /// `member` with its cover filled in. Borrowed when it already has one.
    pub fn with_resolved_cover<'a>(&self, member: &'a Member) -> Cow<'a, Member> {
        match member.cover {
            Some(_) => Cow::Borrowed(member),
            None => {
                let mut resolved = member.clone();
                resolved.cover = Some(self.default_cover(member.member_type));
                Cow::Owned(resolved)
            }
        }
    }

    /// Advisory warnings for a bar against its member type's limits.
    /// Never blocks computation.
    pub fn check_bar_against_limits(&self, member: &Member, bar: &BarDescription) -> Vec<ProfileIssue> {
        let Some(limits) = self.member_settings.get(&member.member_type).map(|s| s.limits) else {
            return Vec::new();
        };

        let cover = self.cover_for(member);
        let mut warnings = Vec::new();
        if cover < limits.min_cover_mm {
            warnings.push(ProfileIssue {
                field: "cover".to_string(),
                message: format!(
                    "{} {}: {} mm cover is below the {} mm minimum",
                    member.member_type, member.mark, cover, limits.min_cover_mm
                ),
                severity: Severity::Warning,
            });
        }
        if bar.spacing_mm > limits.max_spacing_mm {
            warnings.push(ProfileIssue {
                field: "spacing_mm".to_string(),
                message: format!(
                    "{} {}: {} mm spacing exceeds the {} mm maximum",
                    member.mark, bar.label, bar.spacing_mm, limits.max_spacing_mm
                ),
                severity: Severity::Warning,
            });
        }
        warnings
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        match registry::lookup(DEFAULT_PROFILE_ID) {
            Some(profile) => ProjectSettings::from_profile(profile),
            None => ProjectSettings {
                source_profile: DEFAULT_PROFILE_ID.to_string(),
                detached: false,
                parameters: ProfileParameters::default(),
                member_settings: BTreeMap::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bars::{Diameter, Direction};

    fn slab() -> Member {
        Member::new("S1", MemberType::Slab, 3050.0, 4200.0, 150.0, 20.0)
            .with_bar(BarDescription::spaced("Bottom Bar (X-X)", Direction::Primary, Diameter::D10, 150.0))
    }

    #[test]
    fn test_project_creation() {
        let project = Project::new("John Doe", "25-001", "Acme Corp");
        assert_eq!(project.meta.engineer, "John Doe");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.settings.parameters, ProfileParameters::default());
        assert!(!project.settings.detached);
    }

    #[test]
    fn test_project_serialization() {
        let mut project = Project::new("Jane Engineer", "25-042", "Test Client");
        project.add_member(slab());
        let json = serde_json::to_string_pretty(&project).unwrap();
        assert!(json.contains("Jane Engineer"));
        assert!(json.contains("is-456"));

        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.member_count(), 1);
        assert_eq!(roundtrip.settings, project.settings);
    }

    #[test]
    fn test_remove_member_drops_its_bars() {
        let mut project = Project::default();
        let id = project.add_member(slab());
        assert_eq!(project.bars().count(), 1);
        let removed = project.remove_member(&id).unwrap();
        assert_eq!(removed.bars.len(), 1);
        assert_eq!(project.bars().count(), 0);
        assert!(project.remove_member(&id).is_none());
    }

    #[test]
    fn test_apply_profile_is_idempotent() {
        let mut project = Project::default();
        project.apply_profile("bs-8666").unwrap();
        let once = project.settings.clone();
        project.apply_profile("bs-8666").unwrap();
        assert_eq!(project.settings, once);
    }

    #[test]
    fn test_unknown_profile_leaves_settings() {
        let mut project = Project::default();
        let before = project.settings.clone();
        let err = project.apply_profile("aci-318").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_PROFILE");
        assert_eq!(project.settings, before);
    }

    #[test]
    fn test_rejected_profile_leaves_settings() {
        let mut profile = registry::require("custom").unwrap().clone();
        profile.parameters.hook_multiplier = -1.0;
        let mut project = Project::default();
        let before = project.settings.clone();
        let err = project.apply_code_profile(&profile).unwrap_err();
        assert_eq!(err.error_code(), "PROFILE_REJECTED");
        assert_eq!(project.settings, before);
    }

    #[test]
    fn test_set_parameters_detaches() {
        let mut settings = ProjectSettings::default();
        let params = ProfileParameters {
            cover_mm: 30.0,
            ..ProfileParameters::default()
        };
        settings.set_parameters(params).unwrap();
        assert!(settings.detached);
        assert_eq!(settings.source_profile, "is-456");
        assert_eq!(settings.parameters.cover_mm, 30.0);
    }

    #[test]
    fn test_limit_warnings_are_advisory() {
        let mut project = Project::default();
        let mut member = slab().with_bar(BarDescription::spaced("Top Bar", Direction::Primary, Diameter::D10, 450.0));
        member.cover = Some(10.0);
        project.add_member(member);

        let warnings = project.limit_warnings();
        // cover warning for both bars, spacing warning for the second
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().all(|(_, w)| w.severity == Severity::Warning));
        assert!(project.schedule().is_ok());
    }

    #[test]
    fn test_members_sorted_by_type_then_mark() {
        let mut project = Project::default();
        project.add_member(Member::new("S2", MemberType::Slab, 1.0, 1.0, 1.0, 0.0));
        project.add_member(Member::new("S1", MemberType::Slab, 1.0, 1.0, 1.0, 0.0));
        project.add_member(Member::new("B9", MemberType::Beam, 1.0, 1.0, 1.0, 0.0));
        let marks: Vec<_> = project.members_sorted().iter().map(|m| m.mark.as_str()).collect();
        assert_eq!(marks, vec!["B9", "S1", "S2"]);
    }

    #[test]
    fn test_profile_switch_changes_defaulted_cover() {
        let mut project = Project::default();
        project.add_member(
            slab()
                .with_profile_cover()
                .with_edge_beams(crate::members::EdgeValues::uniform(230.0)),
        );

        project.apply_profile("is-456").unwrap();
        let is = project.schedule().unwrap();
        project.apply_profile("bs-8666").unwrap();
        let bs = project.schedule().unwrap();

        // slab defaults: 20 mm under is-456, 25 mm under bs-8666
        assert_eq!(is.bars[0].measurement.b, Some(210.0));
        assert_eq!(bs.bars[0].measurement.b, Some(205.0));
        assert_ne!(is.bars[0].cut_length_mm, bs.bars[0].cut_length_mm);
    }

    #[test]
    fn test_explicit_cover_survives_profile_switch() {
        let mut project = Project::default();
        project.add_member(slab().with_edge_beams(crate::members::EdgeValues::uniform(230.0)));
        project.apply_profile("bs-8666").unwrap();
        let bar = &project.schedule().unwrap().bars[0];
        assert_eq!(bar.measurement.b, Some(210.0));
    }

    #[test]
    fn test_schedule_rejects_invalid_member() {
        let mut project = Project::default();
        let mut member = slab();
        member.span_x = -3050.0;
        member.cover = Some(-20.0);
        project.add_member(member);

        let restored = crate::file_io::project_from_json(&crate::file_io::project_to_json(&project).unwrap()).unwrap();
        let err = restored.schedule().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("span_x"));
    }

    #[test]
    fn test_get_member_mut_does_not_touch() {
        let mut project = Project::default();
        let id = project.add_member(slab());
        let before = project.meta.modified;
        assert!(project.get_member_mut(&id).is_some());
        assert_eq!(project.meta.modified, before);

        let bars = project.edit_member(&id, |m| m.bars.len()).unwrap();
        assert_eq!(bars, 1);
        assert!(project.meta.modified >= before);
        assert!(project.edit_member(&Uuid::new_v4(), |_| ()).is_none());
    }
}
