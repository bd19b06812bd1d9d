//! Design values (allowable stress and minimum thickness) resolved for one
//! asset before the damage calculators run.
//!
//! Entered values win over calculated ones. A derived minimum thickness is
//! kept unrounded here; rounding is a display concern. A lookup miss or a geometry
//! failure is not fatal: the value is left unset and the failure is returned
//! as a warning for the caller to record.

use super::{thin_wall_min_thickness, StressTable};
use crate::core::AssetContext;
use crate::errors::CalcError;
use serde::{Deserialize, Serialize};

/// Where a design value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    Entered,
    Calculated,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignBasis {
    pub allowable_stress_mpa: Option<f64>,
    pub stress_source: ValueSource,
    pub min_thickness_mm: Option<f64>,
    pub thickness_source: ValueSource,
}

impl DesignBasis {
    /// Basis with an entered minimum thickness only. Handy for calculators
    /// used outside the orchestrator.
    pub fn with_min_thickness(min_thickness_mm: f64) -> Self {
        Self {
            allowable_stress_mpa: None,
            stress_source: ValueSource::Unavailable,
            min_thickness_mm: Some(min_thickness_mm),
            thickness_source: ValueSource::Entered,
        }
    }
}

/// Resolve the design basis. Returns the basis plus any non-fatal warnings
/// (`LookupMiss`, `InvalidGeometry`).
pub fn resolve_design_basis(ctx: &AssetContext, table: &StressTable) -> (DesignBasis, Vec<CalcError>) {
    let mut warnings = Vec::new();
    let design = &ctx.design;

    let (allowable_stress_mpa, stress_source) = match design.allowable_stress_mpa {
        Some(stress) => (Some(stress), ValueSource::Entered),
        None => match table.lookup_checked(&design.material_id, design.design_temperature_c) {
            Ok(stress) => (Some(stress), ValueSource::Calculated),
            Err(err) => {
                warnings.push(err);
                (None, ValueSource::Unavailable)
            }
        },
    };

    let (min_thickness_mm, thickness_source) = match (design.min_thickness_mm, allowable_stress_mpa) {
        (Some(tmin), _) => (Some(tmin), ValueSource::Entered),
        (None, Some(stress)) => match thin_wall_min_thickness(
            design.design_pressure_mpa,
            stress,
            design.weld_efficiency,
            design.internal_diameter_mm,
        ) {
            Ok(tmin) => (Some(tmin), ValueSource::Calculated),
            Err(err) => {
                warnings.push(err);
                (None, ValueSource::Unavailable)
            }
        },
        (None, None) => (None, ValueSource::Unavailable),
    };

    (
        DesignBasis {
            allowable_stress_mpa,
            stress_source,
            min_thickness_mm,
            thickness_source,
        },
        warnings,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::core::MechanismKind;
    use crate::damage::test_support::carbon_steel_pipe;
    use crate::material::reference_table;
    use crate::orchestrator::RecalculationOrchestrator;

    #[test]
    fn test_lookup_and_derivation_when_nothing_entered() {
        let (basis, warnings) = resolve_design_basis(&carbon_steel_pipe(), reference_table());
        assert!(warnings.is_empty());
        assert_eq!(basis.allowable_stress_mpa, Some(118.0));
        assert_eq!(basis.stress_source, ValueSource::Calculated);
        assert_eq!(basis.thickness_source, ValueSource::Calculated);
    }

    #[test]
    fn test_entered_stress_feeds_derived_thickness() {
        let mut ctx = carbon_steel_pipe();
        ctx.design.allowable_stress_mpa = Some(200.0);
        let (basis, warnings) = resolve_design_basis(&ctx, reference_table());

        assert!(warnings.is_empty());
        assert_eq!(basis.allowable_stress_mpa, Some(200.0));
        assert_eq!(basis.stress_source, ValueSource::Entered);
        // 2.0 * 154.1 / (2 * 200 - 2.0)
        let tmin = basis.min_thickness_mm.unwrap();
        assert!((tmin - 308.2 / 398.0).abs() < 1e-12);
        assert_eq!(basis.thickness_source, ValueSource::Calculated);
    }

    #[test]
    fn test_entered_thickness_overrides_derivation() {
        let mut ctx = carbon_steel_pipe();
        ctx.design.min_thickness_mm = Some(3.0);
        let (basis, warnings) = resolve_design_basis(&ctx, reference_table());

        assert!(warnings.is_empty());
        assert_eq!(basis.min_thickness_mm, Some(3.0));
        assert_eq!(basis.thickness_source, ValueSource::Entered);
        assert_eq!(basis.stress_source, ValueSource::Calculated);
    }

    #[test]
    fn test_entered_thickness_needs_no_stress() {
        let mut ctx = carbon_steel_pipe();
        ctx.design.material_id = "UNOBTAINIUM".into();
        ctx.design.min_thickness_mm = Some(2.5);
        let (basis, warnings) = resolve_design_basis(&ctx, reference_table());

        assert!(matches!(warnings.as_slice(), [CalcError::LookupMiss { .. }]));
        assert_eq!(basis.stress_source, ValueSource::Unavailable);
        assert_eq!(basis.min_thickness_mm, Some(2.5));
    }

    #[test]
    fn test_invalid_geometry_is_a_warning() {
        let mut ctx = carbon_steel_pipe();
        // 2 * 1.0 * 1.0 does not exceed 2.0 MPa
        ctx.design.allowable_stress_mpa = Some(1.0);
        let (basis, warnings) = resolve_design_basis(&ctx, reference_table());

        assert!(matches!(warnings.as_slice(), [CalcError::InvalidGeometry(_)]));
        assert_eq!(basis.min_thickness_mm, None);
        assert_eq!(basis.thickness_source, ValueSource::Unavailable);
        assert_eq!(basis.allowable_stress_mpa, Some(1.0));
    }

    #[test]
    fn test_invalid_geometry_does_not_stop_the_asset() {
        let mut ctx = carbon_steel_pipe();
        ctx.design.allowable_stress_mpa = Some(1.0);
        let result = RecalculationOrchestrator::with_reference_table(EngineConfig::default())
            .recalculate(&ctx)
            .unwrap();

        assert!(matches!(
            result.design_warnings.as_slice(),
            [CalcError::InvalidGeometry(_)]
        ));
        assert!(result.is_excluded(MechanismKind::Thinning));
        assert!(result.consequence.is_some());
    }
}
