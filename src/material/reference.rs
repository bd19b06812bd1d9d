//! Built-in allowable-stress reference dataset.
//!
//! Approximate ASME Section II-D (Division 1) values converted to MPa / °C
//! for a handful of common materials of construction. Hosts are expected to
//! supply their own dataset; this one backs the CLI and tests.

use super::{StressRow, StressTable};
use once_cell::sync::Lazy;

static REFERENCE_TABLE: Lazy<StressTable> = Lazy::new(|| StressTable::from_rows(reference_rows()));

const CURVES: &[(&str, &[(f64, f64)])] = &[
    (
        "SA-106-B",
        &[
            (-29.0, 118.0),
            (343.0, 118.0),
            (371.0, 108.0),
            (399.0, 90.0),
            (427.0, 74.0),
            (454.0, 60.0),
            (482.0, 41.0),
        ],
    ),
    (
        "SA-516-70",
        &[
            (-29.0, 138.0),
            (343.0, 138.0),
            (371.0, 125.0),
            (399.0, 102.0),
            (427.0, 83.0),
            (454.0, 65.0),
            (482.0, 46.0),
        ],
    ),
    (
        "SA-333-6",
        &[
            (-46.0, 118.0),
            (343.0, 118.0),
            (371.0, 108.0),
            (399.0, 90.0),
        ],
    ),
    (
        "SA-312-TP304",
        &[
            (38.0, 138.0),
            (93.0, 115.0),
            (149.0, 103.0),
            (204.0, 95.0),
            (260.0, 89.0),
            (316.0, 85.0),
            (343.0, 83.0),
            (371.0, 81.0),
            (427.0, 77.0),
        ],
    ),
    (
        "SA-312-TP316",
        &[
            (38.0, 138.0),
            (93.0, 119.0),
            (149.0, 108.0),
            (204.0, 99.0),
            (260.0, 92.0),
            (316.0, 87.0),
            (371.0, 83.0),
            (427.0, 81.0),
        ],
    ),
];

pub fn reference_rows() -> Vec<StressRow> {
    CURVES
        .iter()
        .flat_map(|(material, points)| {
            points
                .iter()
                .map(move |(t, s)| StressRow::new(*material, *t, *s))
        })
        .collect()
}

/// Shared instance of the reference dataset.
pub fn reference_table() -> &'static StressTable {
    &REFERENCE_TABLE
}
