//! Release hole sizes, generic failure frequencies and release rates.

use super::fluid::{FluidProperties, GAS_CONSTANT};
use crate::core::{AssetContext, ComponentType, FluidPhase};
use crate::errors::CalcError;
use serde::{Deserialize, Serialize};

pub const ATMOSPHERIC_PRESSURE_PA: f64 = 101_325.0;
pub const LIQUID_DISCHARGE_COEFFICIENT: f64 = 0.61;
pub const GAS_DISCHARGE_COEFFICIENT: f64 = 0.9;
/// Release duration used for spilled mass (seconds).
pub const RELEASE_DURATION_S: f64 = 180.0;
const MAX_RUPTURE_DIAMETER_MM: f64 = 406.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoleSize {
    Small,
    Medium,
    Large,
    Rupture,
}

impl HoleSize {
    pub const ALL: [HoleSize; 4] = [
        HoleSize::Small,
        HoleSize::Medium,
        HoleSize::Large,
        HoleSize::Rupture,
    ];

    /// Hole diameter (mm), never larger than the component bore.
    pub fn diameter_mm(&self, internal_diameter_mm: f64) -> f64 {
        let nominal = match self {
            HoleSize::Small => 6.35,
            HoleSize::Medium => 25.4,
            HoleSize::Large => 101.6,
            HoleSize::Rupture => MAX_RUPTURE_DIAMETER_MM,
        };
        nominal.min(internal_diameter_mm)
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Generic failure frequencies (per year) by hole size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenericFailureFrequency([f64; 4]);

impl GenericFailureFrequency {
    pub fn for_component(component: ComponentType) -> Self {
        match component {
            ComponentType::Pipe => Self([8.0e-6, 2.0e-5, 0.0, 2.6e-6]),
            ComponentType::Vessel => Self([8.0e-6, 2.0e-5, 2.0e-6, 6.0e-7]),
            ComponentType::Tank => Self([7.2e-4, 0.0, 0.0, 2.0e-6]),
        }
    }

    pub fn get(&self, hole: HoleSize) -> f64 {
        self.0[hole.index()]
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// gff-weighted average of a per-hole quantity.
    pub fn weighted<F>(&self, mut per_hole: F) -> f64
    where
        F: FnMut(HoleSize) -> f64,
    {
        let total = self.total();
        if total <= 0.0 {
            return 0.0;
        }
        HoleSize::ALL
            .iter()
            .map(|h| self.get(*h) * per_hole(*h))
            .sum::<f64>()
            / total
    }
}

/// Release rate for one hole size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoleRelease {
    pub hole: HoleSize,
    pub diameter_mm: f64,
    /// kg/s
    pub rate_kg_s: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseProfile {
    pub gas_release: bool,
    pub holes: Vec<HoleRelease>,
}

impl ReleaseProfile {
    pub fn rate(&self, hole: HoleSize) -> f64 {
        self.holes
            .iter()
            .find(|h| h.hole == hole)
            .map_or(0.0, |h| h.rate_kg_s)
    }
}

/// Release rates for every hole size. Two-phase service is treated as a
/// liquid release.
pub fn release_profile(ctx: &AssetContext, fluid: &FluidProperties) -> Result<ReleaseProfile, CalcError> {
    let design = &ctx.design;
    let diameter = design.internal_diameter_mm;
    if !diameter.is_finite() || diameter <= 0.0 {
        return Err(CalcError::consequence_input(
            "internal_diameter",
            format!("must be positive, got {}", diameter),
        ));
    }
    let pressure_gauge_pa = design.operating_pressure_mpa * 1.0e6;
    if !pressure_gauge_pa.is_finite() || pressure_gauge_pa < 0.0 {
        return Err(CalcError::consequence_input(
            "operating_pressure",
            format!("must be non-negative, got {}", design.operating_pressure_mpa),
        ));
    }
    let temperature_k = design.operating_temperature_c + 273.15;
    if !temperature_k.is_finite() || temperature_k <= 0.0 {
        return Err(CalcError::consequence_input(
            "operating_temperature",
            format!("is below absolute zero: {} °C", design.operating_temperature_c),
        ));
    }

    let gas_release = ctx.service.phase == FluidPhase::Gas;
    let inventory_limit = match ctx.service.inventory_mass_kg {
        Some(mass) if mass.is_finite() && mass >= 0.0 => Some(mass / RELEASE_DURATION_S),
        Some(mass) => {
            return Err(CalcError::consequence_input(
                "inventory_mass",
                format!("must be non-negative, got {}", mass),
            ))
        }
        None => None,
    };

    let holes = HoleSize::ALL
        .iter()
        .map(|hole| {
            let diameter_mm = hole.diameter_mm(diameter);
            let area_m2 = std::f64::consts::PI * (diameter_mm / 1000.0).powi(2) / 4.0;
            let raw = if gas_release {
                gas_rate(fluid, area_m2, pressure_gauge_pa + ATMOSPHERIC_PRESSURE_PA, temperature_k)
            } else {
                liquid_rate(fluid, area_m2, pressure_gauge_pa)
            };
            let rate_kg_s = inventory_limit.map_or(raw, |limit| raw.min(limit));
            HoleRelease {
                hole: *hole,
                diameter_mm,
                rate_kg_s,
            }
        })
        .collect();

    Ok(ReleaseProfile { gas_release, holes })
}

/// Bernoulli orifice flow.
pub fn liquid_rate(fluid: &FluidProperties, area_m2: f64, gauge_pressure_pa: f64) -> f64 {
    if gauge_pressure_pa <= 0.0 {
        return 0.0;
    }
    LIQUID_DISCHARGE_COEFFICIENT * area_m2 * (2.0 * fluid.liquid_density * gauge_pressure_pa).sqrt()
}

/// Ideal-gas orifice flow, choked above the transition pressure.
pub fn gas_rate(fluid: &FluidProperties, area_m2: f64, absolute_pressure_pa: f64, temperature_k: f64) -> f64 {
    if absolute_pressure_pa <= ATMOSPHERIC_PRESSURE_PA {
        return 0.0;
    }
    let k = fluid.specific_heat_ratio(temperature_k);
    let molar_mass = fluid.molecular_weight / 1000.0;
    let transition = ATMOSPHERIC_PRESSURE_PA * ((k + 1.0) / 2.0).powf(k / (k - 1.0));
    let density_term = molar_mass / (GAS_CONSTANT * temperature_k);

    let flow = if absolute_pressure_pa > transition {
        (k * density_term * (2.0 / (k + 1.0)).powf((k + 1.0) / (k - 1.0))).sqrt()
    } else {
        let ratio = ATMOSPHERIC_PRESSURE_PA / absolute_pressure_pa;
        (density_term
            * (2.0 * k / (k - 1.0))
            * ratio.powf(2.0 / k)
            * (1.0 - ratio.powf((k - 1.0) / k)))
            .sqrt()
    };
    GAS_DISCHARGE_COEFFICIENT * area_m2 * absolute_pressure_pa * flow
}
