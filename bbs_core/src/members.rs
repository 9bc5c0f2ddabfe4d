//! # Structural Members
//!
//! A [`Member`] is one structural element instance (beam, column, slab or
//! footing) together with the reinforcement bars attached to it. Its
//! geometry drives every member-derived bar measurement.
//!
//! ## Geometry conventions
//!
//! | Member  | `span_x`        | `span_y`        | `depth`          |
//! |---------|-----------------|-----------------|------------------|
//! | Slab    | clear span X-X  | clear span Y-Y  | thickness        |
//! | Footing | plan length     | plan width      | thickness        |
//! | Beam    | clear length    | breadth         | overall depth    |
//! | Column  | section side X  | section side Y  | storey height    |
//!
//! Bars running along X-X terminate at the `west`/`east` edges; bars
//! running along Y-Y terminate at the `south`/`north` edges.
//!
//! ## Example
//!
//! ```rust
//! use bbs_core::members::{Member, MemberType, EdgeValues};
//!
//! let slab = Member::new("S1", MemberType::Slab, 3050.0, 4200.0, 150.0, 20.0)
//!     .with_edge_beams(EdgeValues::uniform(230.0));
//!
//! assert_eq!(slab.edge_beams.east, 230.0);
//! assert!(slab.bars.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bars::{BarDescription, Direction};

/// Structural member category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemberType {
    Beam,
    Column,
    Slab,
    Footing,
}

impl MemberType {
    /// All member types for iteration
    pub const ALL: [MemberType; 4] = [
        MemberType::Beam,
        MemberType::Column,
        MemberType::Slab,
        MemberType::Footing,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            MemberType::Beam => "Beam",
            MemberType::Column => "Column",
            MemberType::Slab => "Slab",
            MemberType::Footing => "Footing",
        }
    }
}

impl std::fmt::Display for MemberType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Concrete grade, used to key development and lap length tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConcreteGrade {
    M20,
    #[default]
    M25,
    M30,
    M35,
}

impl ConcreteGrade {
    pub const ALL: [ConcreteGrade; 4] = [
        ConcreteGrade::M20,
        ConcreteGrade::M25,
        ConcreteGrade::M30,
        ConcreteGrade::M35,
    ];

    /// Characteristic cube strength in MPa
    pub fn fck_mpa(&self) -> f64 {
        match self {
            ConcreteGrade::M20 => 20.0,
            ConcreteGrade::M25 => 25.0,
            ConcreteGrade::M30 => 30.0,
            ConcreteGrade::M35 => 35.0,
        }
    }
}

/// One value per member edge (mm). Used for edge-beam widths and
/// top-bar extension lengths.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeValues {
    #[serde(default)]
    pub north: f64,
    #[serde(default)]
    pub south: f64,
    #[serde(default)]
    pub east: f64,
    #[serde(default)]
    pub west: f64,
}

impl EdgeValues {
    /// Same value on all four edges
    pub fn uniform(value: f64) -> Self {
        EdgeValues {
            north: value,
            south: value,
            east: value,
            west: value,
        }
    }

    /// The two edges a bar running in `direction` ends at.
    ///
    /// X-X bars (and bars with no usable direction) end at west/east;
    /// Y-Y bars end at south/north.
    pub fn ends_for(&self, direction: Direction) -> (f64, f64) {
        match direction {
            Direction::Perpendicular => (self.south, self.north),
            Direction::Primary | Direction::Both | Direction::Unspecified => (self.west, self.east),
        }
    }

    /// The two edges at the ends of the axis perpendicular to `direction`
    pub fn cross_ends_for(&self, direction: Direction) -> (f64, f64) {
        self.ends_for(direction.cross())
    }

    /// Sum of the two end values for `direction`
    pub fn end_sum(&self, direction: Direction) -> f64 {
        let (start, end) = self.ends_for(direction);
        start + end
    }
}

/// One structural element and its reinforcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Stable identifier
    pub id: Uuid,

    /// User mark for this member (e.g., "S1", "B-12", "C3")
    pub mark: String,

    pub member_type: MemberType,

    /// First principal dimension in mm (see module docs)
    pub span_x: f64,

    /// Second principal dimension in mm (see module docs)
    pub span_y: f64,

    /// Depth, thickness, or height in mm (see module docs)
    pub depth: f64,

    /// Clear concrete cover in mm. `None` takes the active profile's
    /// default for this member type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<f64>,

    #[serde(default)]
    pub concrete_grade: ConcreteGrade,

    /// Supporting beam widths at each edge (slabs)
    #[serde(default)]
    pub edge_beams: EdgeValues,

    /// Top-bar extension lengths at each edge (slabs)
    #[serde(default)]
    pub top_extensions: EdgeValues,

    /// Reinforcement attached to this member
    #[serde(default)]
    pub bars: Vec<BarDescription>,
}

impl Member {
    pub fn new(
        mark: impl Into<String>,
        member_type: MemberType,
        span_x: f64,
        span_y: f64,
        depth: f64,
        cover: f64,
    ) -> Self {
        Member {
            id: Uuid::new_v4(),
            mark: mark.into(),
            member_type,
            span_x,
            span_y,
            depth,
            cover: Some(cover),
            concrete_grade: ConcreteGrade::default(),
            edge_beams: EdgeValues::default(),
            top_extensions: EdgeValues::default(),
            bars: Vec::new(),
        }
    }

    pub fn with_edge_beams(mut self, edge_beams: EdgeValues) -> Self {
        self.edge_beams = edge_beams;
        self
    }

    pub fn with_top_extensions(mut self, top_extensions: EdgeValues) -> Self {
        self.top_extensions = top_extensions;
        self
    }

    /// Drop the explicit cover so the profile default applies
    pub fn with_profile_cover(mut self) -> Self {
        self.cover = None;
        self
    }

    /// The member's own cover, or `default` when it has none
    pub fn cover_or(&self, default: f64) -> f64 {
        self.cover.unwrap_or(default)
    }

    pub fn with_grade(mut self, grade: ConcreteGrade) -> Self {
        self.concrete_grade = grade;
        self
    }

    /// Builder form of [`Member::add_bar`]
    pub fn with_bar(mut self, bar: BarDescription) -> Self {
        self.bars.push(bar);
        self
    }

    /// Attach a bar, returning its id
    pub fn add_bar(&mut self, bar: BarDescription) -> Uuid {
        let id = bar.id;
        self.bars.push(bar);
        id
    }

    /// Remove a bar by id
    pub fn remove_bar(&mut self, id: &Uuid) -> Option<BarDescription> {
        let index = self.bars.iter().position(|b| &b.id == id)?;
        Some(self.bars.remove(index))
    }

    pub fn get_bar(&self, id: &Uuid) -> Option<&BarDescription> {
        self.bars.iter().find(|b| &b.id == id)
    }

    /// Span along the axis a bar in `direction` runs
    pub fn span_along(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Perpendicular => self.span_y,
            Direction::Primary | Direction::Both | Direction::Unspecified => self.span_x,
        }
    }

    /// Span along the axis perpendicular to `direction`
    pub fn span_across(&self, direction: Direction) -> f64 {
        self.span_along(direction.cross())
    }

    /// Vertical rise available inside the member: `max(0, depth - 2·cover)`
    pub fn clear_depth(&self, cover: f64) -> f64 {
        (self.depth - 2.0 * cover).max(0.0)
    }
}
