//! # File I/O Module
//!
//! Project persistence:
//! - **Atomic saves**: write to `<name>.tmp`, fsync, rename over the target
//! - **Version validation**: refuse files written by an incompatible schema
//!
//! ## File Format
//!
//! Projects are saved as `.bbs` files containing pretty-printed JSON.
//! Numeric fields round-trip exactly: `serde_json` writes the shortest
//! representation that parses back to the same `f64`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bbs_core::file_io::{save_project, load_project};
//! use bbs_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Engineer", "25-001", "Client");
//! let path = Path::new("myproject.bbs");
//!
//! save_project(&project, path)?;
//! let loaded = load_project(path)?;
//! assert_eq!(loaded.meta.job_id, "25-001");
//! # Ok::<(), bbs_core::errors::BbsError>(())
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::errors::{BbsError, BbsResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Serialize a project to pretty JSON
pub fn project_to_json(project: &Project) -> BbsResult<String> {
    serde_json::to_string_pretty(project).map_err(|e| BbsError::SerializationError {
        reason: e.to_string(),
    })
}

/// Parse a project from JSON and check its schema version
pub fn project_from_json(json: &str) -> BbsResult<Project> {
    let project: Project = serde_json::from_str(json).map_err(|e| BbsError::SerializationError {
        reason: e.to_string(),
    })?;
    validate_version(&project.meta.version)?;
    Ok(project)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Save a project atomically.
///
/// The JSON is written and synced to a sibling `.tmp` file which is then
/// renamed over `path`, so an interrupted save never leaves a truncated
/// project behind.
pub fn save_project(project: &Project, path: &Path) -> BbsResult<()> {
    let json = project_to_json(project)?;
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| BbsError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| BbsError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| BbsError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        BbsError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::debug!(path = %path.display(), bytes = json.len(), "saved project");
    Ok(())
}

/// Load a project from a file.
///
/// # Returns
///
/// * `Err(BbsError::VersionMismatch)` - file version is incompatible
/// * `Err(BbsError::SerializationError)` - invalid JSON
/// * `Err(BbsError::FileError)` - I/O error
pub fn load_project(path: &Path) -> BbsResult<Project> {
    let mut file =
        File::open(path).map_err(|e| BbsError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| BbsError::file_error("read", path.display().to_string(), e.to_string()))?;

    project_from_json(&contents).map_err(|e| match e {
        BbsError::SerializationError { reason } => BbsError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), reason),
        },
        other => other,
    })
}

/// Check that a file version is compatible with [`SCHEMA_VERSION`].
///
/// Major versions must match. While the schema is 0.x, a file with a newer
/// minor version is also rejected.
pub fn validate_version(file_version: &str) -> BbsResult<()> {
    let mismatch = || BbsError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let parse = |v: &str| -> Option<Vec<u32>> { v.split('.').map(|p| p.parse().ok()).collect() };

    let file_parts = parse(file_version).ok_or_else(mismatch)?;
    let current_parts = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;

    match (file_parts.as_slice(), current_parts.as_slice()) {
        ([file_major, rest @ ..], [current_major, current_rest @ ..]) => {
            if file_major != current_major {
                return Err(mismatch());
            }
            if *current_major == 0 {
                if let (Some(file_minor), Some(current_minor)) = (rest.first(), current_rest.first()) {
                    if file_minor > current_minor {
                        return Err(mismatch());
                    }
                }
            }
            Ok(())
        }
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bars::{BarDescription, Diameter, Direction};
    use crate::members::{Member, MemberType};
    use std::env::temp_dir;

    fn temp_project_path(name: &str) -> PathBuf {
        temp_dir().join(format!("bbs_test_{}_{}.bbs", std::process::id(), name))
    }

    #[test]
    fn test_tmp_path_keeps_extension() {
        assert_eq!(tmp_path_for(Path::new("/jobs/site.bbs")), Path::new("/jobs/site.bbs.tmp"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_project_path("roundtrip");

        let mut project = Project::new("Test Engineer", "TEST-001", "Test Client");
        let member = Member::new("S1", MemberType::Slab, 3050.1, 4200.0, 150.0, 20.0).with_bar(
            BarDescription::spaced("Bottom Bar (X-X)", Direction::Primary, Diameter::D10, 0.1 + 0.2),
        );
        let id = project.add_member(member);
        save_project(&project, &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.meta.engineer, "Test Engineer");
        let member = loaded.get_member(&id).unwrap();
        assert_eq!(member.span_x, 3050.1);
        assert_eq!(member.bars[0].spacing_mm, 0.1 + 0.2);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_project_path("atomic");
        let tmp_path = tmp_path_for(&path);

        save_project(&Project::new("Test", "TEST", "Client"), &path).unwrap();
        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let err = load_project(&temp_project_path("does_not_exist")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_bad_json_is_serialization_error() {
        let err = project_from_json("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_newer_file_rejected() {
        let mut project = Project::default();
        project.meta.version = "0.9.0".to_string();
        let json = project_to_json(&project).unwrap();
        let err = project_from_json(&json).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("zero").is_err());
        assert!(validate_version("").is_err());
    }
}
