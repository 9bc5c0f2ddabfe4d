//! # bbs_core - Bar Bending Schedule Engine
//!
//! `bbs_core` computes reinforcement bar bending schedules: for every bar
//! attached to a structural member it derives the cut length, bend
//! deduction, bar count, and weight, then summarizes the schedule by
//! diameter, by shape, and by member type. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: every calculation is a pure function of (member, bar,
//!   profile parameters); the active code profile is passed explicitly
//! - **JSON-First**: all types implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//! - **Degrade, don't crash**: unknown bar labels and degenerate geometry
//!   still produce a schedule line, flagged where confidence is low
//!
//! ## Quick Start
//!
//! ```rust
//! use bbs_core::bars::{BarDescription, Diameter, Direction};
//! use bbs_core::members::{EdgeValues, Member, MemberType};
//! use bbs_core::project::Project;
//!
//! let mut project = Project::new("Jane Engineer", "25-042", "ACME Corp");
//! let slab = Member::new("S1", MemberType::Slab, 3050.0, 4200.0, 150.0, 20.0)
//!     .with_edge_beams(EdgeValues::uniform(230.0))
//!     .with_bar(BarDescription::spaced("Bottom Bar (X-X)", Direction::Primary, Diameter::D10, 275.0));
//! project.add_member(slab);
//!
//! let schedule = project.schedule().unwrap();
//! assert_eq!(schedule.bars[0].total_members, 12);
//! assert_eq!(schedule.by_diameter.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`shapes`] - canonical shape catalog and closed-form lengths
//! - [`profiles`] - code profiles (bend/hook multipliers, cover, limits)
//! - [`classifier`] - free-form bar label to pattern category
//! - [`calculations`] - measurement, deduction, count, weight, breakdown
//! - [`aggregation`] - schedule summaries
//! - [`project`] - project container, members, applied settings
//! - [`validation`] - shared bar/member input validation
//! - [`file_io`] - atomic project saves

pub mod aggregation;
pub mod bars;
pub mod calculations;
pub mod classifier;
pub mod errors;
pub mod file_io;
pub mod members;
pub mod profiles;
pub mod project;
pub mod shapes;
pub mod tables;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use bars::{BarDescription, Diameter, Direction};
pub use calculations::{CalculatedBar, Schedule};
pub use errors::{BbsError, BbsResult};
pub use file_io::{load_project, save_project};
pub use members::{Member, MemberType};
pub use profiles::{CodeProfile, ProfileParameters};
pub use project::{Project, ProjectMetadata, ProjectSettings};
