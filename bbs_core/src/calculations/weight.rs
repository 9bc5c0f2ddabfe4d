//! # Weight
//!
//! Unit weight is `d² / 162` kg/m (steel at ~7850 kg/m³) unless the active
//! profile carries its own per-diameter table, in which case tabulated sizes
//! use the table and any size it omits falls back to the formula.
//!
//! ```rust
//! use bbs_core::calculations::weight::standard_unit_weight;
//! use bbs_core::bars::Diameter;
//!
//! let w = standard_unit_weight(Diameter::D12);
//! assert!((w.value() - 0.888_89).abs() < 1e-4);
//! ```

use serde::{Deserialize, Serialize};

use crate::bars::Diameter;
use crate::profiles::ProfileParameters;
use crate::units::{KgPerMeter, Kilograms, Meters, Millimeters};

/// `d² / 162` gives kg/m for d in mm
pub const STEEL_WEIGHT_DIVISOR: f64 = 162.0;

/// Length and weight totals for one schedule line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarWeight {
    pub unit_weight: KgPerMeter,
    pub total_length: Meters,
    pub total_weight: Kilograms,
}

pub fn standard_unit_weight(diameter: Diameter) -> KgPerMeter {
    let d = diameter.as_f64();
    KgPerMeter(d * d / STEEL_WEIGHT_DIVISOR)
}

/// Unit weight under the given profile
pub fn unit_weight(diameter: Diameter, params: &ProfileParameters) -> KgPerMeter {
    params
        .unit_weights
        .as_ref()
        .and_then(|table| table.get(&diameter.mm()))
        .map(|&kg| KgPerMeter(kg))
        .unwrap_or_else(|| standard_unit_weight(diameter))
}

/// `(d² / 162) · (L / 1000)` for an arbitrary diameter and length in mm
pub fn weight(diameter_mm: f64, length_mm: f64) -> f64 {
    let length: Meters = Millimeters(length_mm).into();
    (KgPerMeter(diameter_mm * diameter_mm / STEEL_WEIGHT_DIVISOR) * length).value()
}

/// Totals for `total_bars` bars of one cut length
pub fn bar_weight(cut_length_mm: f64, total_bars: u32, diameter: Diameter, params: &ProfileParameters) -> BarWeight {
    let unit_weight = unit_weight(diameter, params);
    let total_length: Meters = (Millimeters(cut_length_mm) * f64::from(total_bars)).into();
    BarWeight {
        unit_weight,
        total_length,
        total_weight: unit_weight * total_length,
    }
}
