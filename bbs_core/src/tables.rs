//! Development and lap length tables.
//!
//! Tension development lengths for Fe 415 deformed bars, rounded up to the
//! next 10 mm, keyed by diameter and concrete grade. Lap lengths are
//! 1.3 × development length, also rounded up to 10 mm. Diameters outside
//! the table fall back to `50 × d`.

use crate::bars::Diameter;
use crate::members::ConcreteGrade;

/// Multiple of `d` used for diameters the tables do not list
pub const UNTABULATED_MULTIPLIER: f64 = 50.0;

// (diameter mm, [M20, M25, M30, M35]) in mm
const DEVELOPMENT_LENGTHS: [(u32, [f64; 4]); 7] = [
    (8, [380.0, 330.0, 310.0, 270.0]),
    (10, [470.0, 410.0, 380.0, 330.0]),
    (12, [570.0, 490.0, 460.0, 400.0]),
    (16, [760.0, 650.0, 610.0, 530.0]),
    (20, [940.0, 810.0, 760.0, 660.0]),
    (25, [1180.0, 1010.0, 950.0, 820.0]),
    (32, [1510.0, 1290.0, 1210.0, 1050.0]),
];

const LAP_LENGTHS: [(u32, [f64; 4]); 7] = [
    (8, [500.0, 430.0, 410.0, 360.0]),
    (10, [620.0, 540.0, 500.0, 430.0]),
    (12, [750.0, 640.0, 600.0, 520.0]),
    (16, [990.0, 850.0, 800.0, 690.0]),
    (20, [1230.0, 1060.0, 990.0, 860.0]),
    (25, [1540.0, 1320.0, 1240.0, 1070.0]),
    (32, [1970.0, 1680.0, 1580.0, 1370.0]),
];

fn grade_column(grade: ConcreteGrade) -> usize {
    match grade {
        ConcreteGrade::M20 => 0,
        ConcreteGrade::M25 => 1,
        ConcreteGrade::M30 => 2,
        ConcreteGrade::M35 => 3,
    }
}

fn lookup(table: &[(u32, [f64; 4])], diameter: Diameter, grade: ConcreteGrade) -> f64 {
    table
        .iter()
        .find(|(mm, _)| *mm == diameter.mm())
        .map(|(_, row)| row[grade_column(grade)])
        .unwrap_or_else(|| UNTABULATED_MULTIPLIER * diameter.as_f64())
}

/// Tension development length Ld (mm)
pub fn development_length(diameter: Diameter, grade: ConcreteGrade) -> f64 {
    lookup(&DEVELOPMENT_LENGTHS, diameter, grade)
}

/// Tension lap splice length (mm)
pub fn lap_length(diameter: Diameter, grade: ConcreteGrade) -> f64 {
    lookup(&LAP_LENGTHS, diameter, grade)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabulated_values() {
        assert_eq!(development_length(Diameter::D12, ConcreteGrade::M20), 570.0);
        assert_eq!(lap_length(Diameter::D16, ConcreteGrade::M25), 850.0);
    }

    #[test]
    fn test_untabulated_fallback() {
        assert_eq!(development_length(Diameter::D28, ConcreteGrade::M25), 1400.0);
        assert_eq!(lap_length(Diameter::D6, ConcreteGrade::M30), 300.0);
        assert_eq!(development_length(Diameter::D40, ConcreteGrade::M20), 2000.0);
    }

    #[test]
    fn test_higher_grade_never_longer() {
        for d in Diameter::ALL {
            for pair in ConcreteGrade::ALL.windows(2) {
                assert!(development_length(d, pair[1]) <= development_length(d, pair[0]));
                assert!(lap_length(d, pair[1]) <= lap_length(d, pair[0]));
            }
        }
    }

    #[test]
    fn test_lap_exceeds_development() {
        for d in Diameter::ALL {
            for g in ConcreteGrade::ALL {
                assert!(lap_length(d, g) >= development_length(d, g));
            }
        }
    }
}
