//! # Bar-Type Classifier
//!
//! Maps free-form bar-type labels onto a small closed set of
//! [`PatternCategory`] values. Downstream code branches only on the
//! category, never on label text.
//!
//! Normalization runs three pure string passes, in order:
//!
//! 1. direction markers: `X - X`, `( y -y )`, `XX` all become `x-x` / `y-y`
//! 2. misspellings and word-order variants are rewritten from a fixed table
//!    (`Distrubution` → `distribution`, `Bar Bottom` → `bottom bar`, ...)
//! 3. category predicates are tried in a fixed priority order for the
//!    owning member type
//!
//! For slabs the order is full-span > distribution > top & bottom >
//! U-with-extension. Anything no predicate accepts becomes
//! [`PatternCategory::Generic`]: measured as the bare span with no
//! segments, and flagged low confidence.
//!
//! ## Example
//!
//! ```rust
//! use bbs_core::classifier::{classify, PatternCategory};
//! use bbs_core::members::MemberType;
//! use bbs_core::bars::Direction;
//!
//! let c = classify("Distrubution  Bar ( Y - Y )", MemberType::Slab);
//! assert_eq!(c.category, PatternCategory::SlabDistribution);
//! assert_eq!(c.normalized_label, "distribution bar (y-y)");
//! assert_eq!(c.label_direction, Some(Direction::Perpendicular));
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::bars::Direction;
use crate::members::MemberType;

/// Canonical computation patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatternCategory {
    /// Slab bar running the full span between edge beams
    SlabFullSpan,
    /// Slab distribution bar under top extensions
    SlabDistribution,
    /// Slab bar combining top and bottom layers
    SlabTopBottom,
    /// Slab main bar, U-shaped with top extensions
    SlabUExtension,
    BeamTop,
    BeamBottom,
    BeamSideFace,
    BeamStirrup,
    ColumnMain,
    ColumnTie,
    FootingMesh,
    FootingDowel,
    /// Unrecognised label: bare span, no segments
    Generic,
}

impl PatternCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            PatternCategory::SlabFullSpan => "Slab Full Span",
            PatternCategory::SlabDistribution => "Slab Distribution",
            PatternCategory::SlabTopBottom => "Slab Top & Bottom",
            PatternCategory::SlabUExtension => "Slab U with Extension",
            PatternCategory::BeamTop => "Beam Top",
            PatternCategory::BeamBottom => "Beam Bottom",
            PatternCategory::BeamSideFace => "Beam Side Face",
            PatternCategory::BeamStirrup => "Beam Stirrup",
            PatternCategory::ColumnMain => "Column Main",
            PatternCategory::ColumnTie => "Column Tie",
            PatternCategory::FootingMesh => "Footing Mesh",
            PatternCategory::FootingDowel => "Footing Dowel",
            PatternCategory::Generic => "Generic",
        }
    }

    /// Categories whose segment total uses the doubled U formula
    pub fn is_u_shaped(&self) -> bool {
        matches!(self, PatternCategory::SlabUExtension | PatternCategory::SlabTopBottom)
    }
}

impl std::fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Outcome of classifying one label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: PatternCategory,
    pub normalized_label: String,
    /// Direction token found in the label, if any
    pub label_direction: Option<Direction>,
    /// True when the label fell through to [`PatternCategory::Generic`]
    pub low_confidence: bool,
}

static DIRECTION_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([xy])\s*-\s*([xy])\b").expect("direction pair pattern"));

static DOUBLED_AXIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(xx|yy)\b").expect("doubled axis pattern"));

static PAREN_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s+|\s+\)").expect("paren spacing pattern"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Known misspellings and phrasing variants, applied in order to a
/// lower-cased label.
static CORRECTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\bdist(?:ru|ri|r)?b?u?t?i?on\b", "distribution"),
        (r"\bdist\.", "distribution"),
        (r"\b(?:botom|bottam|buttom|bootom)\b", "bottom"),
        (r"\b(?:extention|extenstion|extnsion)\b", "extension"),
        (r"\b(?:stirups?|stirrups|strirrup|stirup)\b", "stirrup"),
        (r"\blongitudnal\b", "longitudinal"),
        (r"\bside-face\b", "side face"),
        (r"\b(?:full-span|fullspan)\b", "full span"),
        (r"\b(?:u-bar|ubar)\b", "u bar"),
        (r"\bties\b", "tie"),
        (r"\bbar bottom\b", "bottom bar"),
        (r"\bbar top\b", "top bar"),
        (r"\btop\s*(?:and|\+|/|&)\s*bottom\b", "top & bottom"),
        (r"\bbottom\s*(?:and|\+|/|&)\s*top\b", "top & bottom"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("correction pattern"), replacement))
    .collect()
});

/// Step (a): collapse malformed direction markers into `x-x` / `y-y`,
/// lower-case, and squeeze whitespace.
pub fn normalize_direction_markers(label: &str) -> String {
    let lowered = label.to_lowercase();
    let paired = DIRECTION_PAIR.replace_all(&lowered, "$1-$2");
    let doubled = DOUBLED_AXIS.replace_all(&paired, |caps: &regex::Captures| {
        let axis = &caps[1][..1];
        format!("{}-{}", axis, axis)
    });
    let parens = PAREN_SPACES.replace_all(&doubled, |caps: &regex::Captures| caps[0].trim().to_string());
    WHITESPACE.replace_all(parens.trim(), " ").into_owned()
}

/// Step (b): rewrite known misspellings and word-order variants
pub fn correct_spelling(label: &str) -> String {
    CORRECTIONS
        .iter()
        .fold(label.to_string(), |acc, (pattern, replacement)| {
            pattern.replace_all(&acc, *replacement).into_owned()
        })
}

/// Both normalization passes
pub fn normalize_label(label: &str) -> String {
    correct_spelling(&normalize_direction_markers(label))
}

/// Direction token in a normalized label
pub fn label_direction(normalized: &str) -> Option<Direction> {
    let has_x = normalized.contains("x-x");
    let has_y = normalized.contains("y-y");
    match (has_x, has_y) {
        (true, true) => Some(Direction::Both),
        (true, false) => Some(Direction::Primary),
        (false, true) => Some(Direction::Perpendicular),
        (false, false) => None,
    }
}

fn has_any(label: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| label.contains(n))
}

fn classify_slab(label: &str) -> Option<PatternCategory> {
    let full_span = has_any(label, &["full span", "straight"])
        || (label.contains("bottom bar") && !label.contains("top"));
    if full_span {
        return Some(PatternCategory::SlabFullSpan);
    }
    if label.contains("distribution") {
        return Some(PatternCategory::SlabDistribution);
    }
    if label.contains("top & bottom") {
        return Some(PatternCategory::SlabTopBottom);
    }
    if has_any(label, &["main", "extension", "u bar", "crank", "bent", "top bar", "bottom"]) {
        return Some(PatternCategory::SlabUExtension);
    }
    None
}

fn classify_beam(label: &str) -> Option<PatternCategory> {
    if has_any(label, &["stirrup", "ring", "link"]) {
        return Some(PatternCategory::BeamStirrup);
    }
    if has_any(label, &["side face", "side bar"]) {
        return Some(PatternCategory::BeamSideFace);
    }
    if has_any(label, &["top", "hanger"]) {
        return Some(PatternCategory::BeamTop);
    }
    if has_any(label, &["bottom", "main"]) {
        return Some(PatternCategory::BeamBottom);
    }
    None
}

fn classify_column(label: &str) -> Option<PatternCategory> {
    if has_any(label, &["tie", "ring", "stirrup", "link"]) {
        return Some(PatternCategory::ColumnTie);
    }
    if has_any(label, &["main", "vertical", "longitudinal"]) {
        return Some(PatternCategory::ColumnMain);
    }
    None
}

fn classify_footing(label: &str) -> Option<PatternCategory> {
    if has_any(label, &["dowel", "starter"]) {
        return Some(PatternCategory::FootingDowel);
    }
    if has_any(label, &["mesh", "mat", "bottom", "top", "main"]) {
        return Some(PatternCategory::FootingMesh);
    }
    None
}

/// Step (c): classify a raw label for a member type
pub fn classify(label: &str, member_type: MemberType) -> Classification {
    let normalized = normalize_label(label);
    let matched = match member_type {
        MemberType::Slab => classify_slab(&normalized),
        MemberType::Beam => classify_beam(&normalized),
        MemberType::Column => classify_column(&normalized),
        MemberType::Footing => classify_footing(&normalized),
    };

    let category = matched.unwrap_or(PatternCategory::Generic);
    if matched.is_none() {
        tracing::warn!(label, %member_type, "unrecognised bar label, using bare span");
    } else {
        tracing::debug!(label, normalized = %normalized, ?category, "classified bar label");
    }

    Classification {
        category,
        label_direction: label_direction(&normalized),
        normalized_label: normalized,
        low_confidence: matched.is_none(),
    }
}
