//! # Schedule Calculations
//!
//! Every calculation is a pure function of (member, bar description,
//! profile parameters). Nothing here reads global state or caches results,
//! so recomputing is always correct and bars can be processed in any order.
//!
//! Pipeline for one bar:
//!
//! 1. [`measurement`] - segments A-F from the member geometry (or the
//!    shape catalog / hand-entered segments)
//! 2. [`deduction`] - bend count, bend deduction, cut length
//! 3. [`bar_count`] - positions along the span and total bars
//! 4. [`weight`] - unit weight, total length, total weight
//!
//! [`schedule`] drives the pipeline and [`breakdown`] explains canonical
//! shape lengths step by step.

pub mod bar_count;
pub mod breakdown;
pub mod deduction;
pub mod measurement;
pub mod schedule;
pub mod weight;

pub use breakdown::{Breakdown, BreakdownStep, StepOp, Verification};
pub use measurement::{Measurement, Segment};
pub use schedule::{build_schedule, calculate_bar, CalculatedBar, Schedule, ShapeKey};
