//! # Unit Types
//!
//! Lightweight newtype wrappers for the handful of units a bar bending
//! schedule deals in. Bar geometry is entered and computed in millimetres;
//! totals are reported in metres and kilograms.
//!
//! All wrappers serialize as bare numbers (`#[serde(transparent)]`) so
//! project files stay readable.
//!
//! ## Example
//!
//! ```rust
//! use bbs_core::units::{Millimeters, Meters, KgPerMeter};
//!
//! let cut = Millimeters(3000.0);
//! let length: Meters = (cut * 10.0).into();
//! assert_eq!(length.0, 30.0);
//!
//! let weight = KgPerMeter(0.888) * length;
//! assert!((weight.0 - 26.64).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Linear mass in kilograms per metre
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgPerMeter(pub f64);

impl Mul<Meters> for KgPerMeter {
    type Output = Kilograms;
    fn mul(self, rhs: Meters) -> Kilograms {
        Kilograms(self.0 * rhs.0)
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Millimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(Kilograms);
impl_arithmetic!(KgPerMeter);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_m() {
        let m: Meters = Millimeters(2536.0).into();
        assert!((m.0 - 2.536).abs() < 1e-12);
        let back: Millimeters = m.into();
        assert!((back.0 - 2536.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_mass_times_length() {
        let w = KgPerMeter(1.58) * Meters(10.0);
        assert!((w.0 - 15.8).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = Millimeters(300.0);
        let b = Millimeters(100.0);
        assert_eq!((a + b).0, 400.0);
        assert_eq!((a - b).0, 200.0);
        assert_eq!((a * 2.0).0, 600.0);
        assert_eq!((a / 2.0).0, 150.0);
    }

    #[test]
    fn test_serialization() {
        let mm = Millimeters(12.5);
        let json = serde_json::to_string(&mm).unwrap();
        assert_eq!(json, "12.5");
        let roundtrip: Millimeters = serde_json::from_str(&json).unwrap();
        assert_eq!(mm, roundtrip);
    }
}
