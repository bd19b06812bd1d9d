//! Allowable-stress lookup against a tabulated material/temperature dataset.
//!
//! Rows are grouped per material and sorted by temperature. A lookup at a
//! tabulated temperature returns that row; between two rows it interpolates
//! linearly; outside the tabulated span it reports an invalid lookup. There is
//! no extrapolation.

pub mod basis;
pub mod reference;
pub mod thickness;

use crate::errors::{CalcError, LookupMissReason};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use basis::{resolve_design_basis, DesignBasis, ValueSource};
pub use reference::reference_table;
pub use thickness::{derive_min_thickness, thin_wall_min_thickness};

/// One row of the allowable-stress dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressRow {
    pub material_id: String,
    pub temperature_c: f64,
    pub stress_mpa: f64,
}

impl StressRow {
    pub fn new(material_id: impl Into<String>, temperature_c: f64, stress_mpa: f64) -> Self {
        Self {
            material_id: material_id.into(),
            temperature_c,
            stress_mpa,
        }
    }
}

/// Result of an allowable-stress lookup.
///
/// `allowable_stress_mpa` is 0.0 whenever `is_valid_lookup` is false; use
/// [`StressLookup::value`] to avoid reading it by accident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StressLookup {
    pub allowable_stress_mpa: f64,
    pub is_valid_lookup: bool,
    #[serde(skip)]
    miss: Option<LookupMissReason>,
}

impl StressLookup {
    fn hit(stress_mpa: f64) -> Self {
        Self {
            allowable_stress_mpa: stress_mpa,
            is_valid_lookup: true,
            miss: None,
        }
    }

    fn miss(reason: LookupMissReason) -> Self {
        Self {
            allowable_stress_mpa: 0.0,
            is_valid_lookup: false,
            miss: Some(reason),
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.is_valid_lookup.then_some(self.allowable_stress_mpa)
    }

    pub fn miss_reason(&self) -> Option<LookupMissReason> {
        self.miss
    }
}

/// Material/temperature to allowable-stress table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StressTable {
    curves: BTreeMap<String, Vec<(f64, f64)>>,
}

impl StressTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from raw rows. Rows with non-finite values are dropped;
    /// for a repeated (material, temperature) pair the later row wins.
    pub fn from_rows(rows: impl IntoIterator<Item = StressRow>) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.insert(row);
        }
        table
    }

    pub fn insert(&mut self, row: StressRow) {
        if !row.temperature_c.is_finite() || !row.stress_mpa.is_finite() {
            log::debug!(
                "Dropping non-finite stress row for {}: ({}, {})",
                row.material_id,
                row.temperature_c,
                row.stress_mpa
            );
            return;
        }

        let curve = self.curves.entry(row.material_id).or_default();
        match curve.binary_search_by(|(t, _)| t.total_cmp(&row.temperature_c)) {
            Ok(idx) => curve[idx].1 = row.stress_mpa,
            Err(idx) => curve.insert(idx, (row.temperature_c, row.stress_mpa)),
        }
    }

    pub fn materials(&self) -> impl Iterator<Item = &str> {
        self.curves.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Tabulated (min, max) temperature for a material.
    pub fn range(&self, material_id: &str) -> Option<(f64, f64)> {
        let curve = self.curves.get(material_id)?;
        Some((curve.first()?.0, curve.last()?.0))
    }

    pub fn lookup(&self, material_id: &str, temperature_c: f64) -> StressLookup {
        let Some(curve) = self.curves.get(material_id).filter(|c| !c.is_empty()) else {
            return StressLookup::miss(LookupMissReason::UnknownMaterial);
        };
        if !temperature_c.is_finite() {
            return StressLookup::miss(LookupMissReason::InvalidTemperature);
        }
        interpolate(curve, temperature_c)
    }

    /// Lookup that surfaces a miss as [`CalcError::LookupMiss`].
    pub fn lookup_checked(&self, material_id: &str, temperature_c: f64) -> Result<f64, CalcError> {
        let result = self.lookup(material_id, temperature_c);
        match (result.value(), result.miss_reason()) {
            (Some(stress), _) => Ok(stress),
            (None, reason) => Err(CalcError::LookupMiss {
                material: material_id.to_string(),
                temperature_c,
                reason: reason.unwrap_or(LookupMissReason::NoBracket),
            }),
        }
    }
}

/// Resolve the allowable stress for a material at a temperature.
pub fn lookup_allowable_stress(
    table: &StressTable,
    material_id: &str,
    temperature_c: f64,
) -> StressLookup {
    table.lookup(material_id, temperature_c)
}

/// Curve must be non-empty and sorted by temperature.
fn interpolate(curve: &[(f64, f64)], temperature_c: f64) -> StressLookup {
    let (min_c, max_c) = (curve[0].0, curve[curve.len() - 1].0);
    if temperature_c < min_c || temperature_c > max_c {
        return StressLookup::miss(LookupMissReason::OutOfRange { min_c, max_c });
    }

    if let Some((_, stress)) = curve.iter().find(|(t, _)| *t == temperature_c) {
        return StressLookup::hit(*stress);
    }

    curve
        .windows(2)
        .find(|w| w[0].0 < temperature_c && temperature_c < w[1].0)
        .map(|w| {
            let (t0, s0) = w[0];
            let (t1, s1) = w[1];
            let frac = (temperature_c - t0) / (t1 - t0);
            StressLookup::hit(s0 + frac * (s1 - s0))
        })
        .unwrap_or_else(|| StressLookup::miss(LookupMissReason::NoBracket))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_point_table() -> StressTable {
        StressTable::from_rows(vec![
            StressRow::new("M1", 20.0, 250.0),
            StressRow::new("M1", 100.0, 230.0),
        ])
    }

    #[test]
    fn test_interpolates_between_bracketing_rows() {
        let result = lookup_allowable_stress(&two_point_table(), "M1", 60.0);
        assert!(result.is_valid_lookup);
        assert!((result.allowable_stress_mpa - 240.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_row_is_returned_verbatim() {
        let result = two_point_table().lookup("M1", 100.0);
        assert_eq!(result.value(), Some(230.0));
    }

    #[test]
    fn test_no_extrapolation_outside_range() {
        let table = two_point_table();
        assert!(!table.lookup("M1", 19.9).is_valid_lookup);
        assert!(!table.lookup("M1", 100.1).is_valid_lookup);
        assert_eq!(
            table.lookup("M1", 150.0).miss_reason(),
            Some(LookupMissReason::OutOfRange {
                min_c: 20.0,
                max_c: 100.0
            })
        );
    }

    #[test]
    fn test_unknown_material_is_invalid() {
        let result = two_point_table().lookup("M2", 50.0);
        assert!(!result.is_valid_lookup);
        assert_eq!(result.allowable_stress_mpa, 0.0);
        assert_eq!(result.miss_reason(), Some(LookupMissReason::UnknownMaterial));
    }

    #[test]
    fn test_nan_temperature_is_invalid() {
        let result = two_point_table().lookup("M1", f64::NAN);
        assert_eq!(
            result.miss_reason(),
            Some(LookupMissReason::InvalidTemperature)
        );
    }

    #[test]
    fn test_single_row_only_matches_exactly() {
        let table = StressTable::from_rows(vec![StressRow::new("S", 40.0, 100.0)]);
        assert_eq!(table.lookup("S", 40.0).value(), Some(100.0));
        assert!(!table.lookup("S", 41.0).is_valid_lookup);
    }

    #[test]
    fn test_later_duplicate_row_wins_and_rows_are_sorted() {
        let table = StressTable::from_rows(vec![
            StressRow::new("M", 100.0, 200.0),
            StressRow::new("M", 20.0, 220.0),
            StressRow::new("M", 100.0, 210.0),
        ]);
        assert_eq!(table.range("M"), Some((20.0, 100.0)));
        assert_eq!(table.lookup("M", 100.0).value(), Some(210.0));
    }

    #[test]
    fn test_checked_lookup_maps_miss_to_error() {
        let err = two_point_table().lookup_checked("M1", 500.0).unwrap_err();
        assert!(matches!(err, CalcError::LookupMiss { .. }));
        assert!(!err.is_fatal());
    }
}
