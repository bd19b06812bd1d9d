//! Representative fluid properties for the consequence model.

use crate::core::RepresentativeFluid;

/// Universal gas constant, J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314;

/// Ideal-gas heat-capacity correlation. Coefficients give Cp in J/(mol·K)
/// with T in kelvin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeatCapacity {
    /// `A + B·T + C·T² + D·T³`
    Polynomial { a: f64, b: f64, c: f64, d: f64 },
    /// `A + B·((C/T)/sinh(C/T))² + D·((E/T)/cosh(E/T))²`
    Hyperbolic { a: f64, b: f64, c: f64, d: f64, e: f64 },
    /// `A + B·T + C·T² + D·T³ + E·T⁴`
    Quartic { a: f64, b: f64, c: f64, d: f64, e: f64 },
}

impl HeatCapacity {
    pub fn cp(&self, temperature_k: f64) -> f64 {
        let t = temperature_k;
        match *self {
            HeatCapacity::Polynomial { a, b, c, d } => a + b * t + c * t * t + d * t.powi(3),
            HeatCapacity::Hyperbolic { a, b, c, d, e } => {
                let x = c / t;
                let y = e / t;
                a + b * (x / x.sinh()).powi(2) + d * (y / y.cosh()).powi(2)
            }
            HeatCapacity::Quartic { a, b, c, d, e } => {
                a + b * t + c * t * t + d * t.powi(3) + e * t.powi(4)
            }
        }
    }
}

/// Continuous-release area correlation `area = a · rate^b` (m², rate kg/s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaCorrelation {
    pub a: f64,
    pub b: f64,
}

impl AreaCorrelation {
    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    pub fn area(&self, rate_kg_s: f64) -> f64 {
        if rate_kg_s <= 0.0 {
            0.0
        } else {
            self.a * rate_kg_s.powf(self.b)
        }
    }
}

/// Component-damage and personnel-injury correlations for one release phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlammableAreas {
    pub component_damage: AreaCorrelation,
    pub injury: AreaCorrelation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidProperties {
    pub molecular_weight: f64,
    /// kg/m³
    pub liquid_density: f64,
    pub heat_capacity: HeatCapacity,
    pub default_evaporation_fraction: f64,
    pub gas_areas: Option<FlammableAreas>,
    pub liquid_areas: Option<FlammableAreas>,
}

impl FluidProperties {
    /// Areas for the given release phase, falling back to the other phase's
    /// correlation when only one is tabulated.
    pub fn areas(&self, gas_release: bool) -> Option<FlammableAreas> {
        if gas_release {
            self.gas_areas.or(self.liquid_areas)
        } else {
            self.liquid_areas.or(self.gas_areas)
        }
    }

    /// Ratio of specific heats `k = Cp / (Cp - R)`.
    pub fn specific_heat_ratio(&self, temperature_k: f64) -> f64 {
        let cp = self.heat_capacity.cp(temperature_k);
        let denominator = cp - GAS_CONSTANT;
        if denominator <= 0.0 {
            // Monatomic limit
            5.0 / 3.0
        } else {
            cp / denominator
        }
    }
}

const fn flammable(cmd: (f64, f64), inj: (f64, f64)) -> Option<FlammableAreas> {
    Some(FlammableAreas {
        component_damage: AreaCorrelation::new(cmd.0, cmd.1),
        injury: AreaCorrelation::new(inj.0, inj.1),
    })
}

const WATER_CP: HeatCapacity = HeatCapacity::Quartic {
    a: 276.0,
    b: -2.09,
    c: 8.125e-3,
    d: -1.41e-5,
    e: 9.37e-9,
};

pub fn properties(fluid: RepresentativeFluid) -> FluidProperties {
    use HeatCapacity::Polynomial;
    use RepresentativeFluid::*;
    match fluid {
        C1C2 => FluidProperties {
            molecular_weight: 23.0,
            liquid_density: 250.512,
            heat_capacity: Polynomial { a: 12.3, b: 1.15e-1, c: -2.87e-5, d: -1.3e-9 },
            default_evaporation_fraction: 1.0,
            gas_areas: flammable((43.0, 0.98), (110.0, 0.96)),
            liquid_areas: None,
        },
        C3C4 => FluidProperties {
            molecular_weight: 51.0,
            liquid_density: 538.379,
            heat_capacity: Polynomial { a: 2.632, b: 0.3188, c: -1.347e-4, d: 1.466e-8 },
            default_evaporation_fraction: 1.0,
            gas_areas: flammable((49.48, 1.0), (125.2, 1.0)),
            liquid_areas: None,
        },
        C5 => FluidProperties {
            molecular_weight: 72.0,
            liquid_density: 625.199,
            heat_capacity: Polynomial { a: -3.626, b: 0.4873, c: -2.6e-4, d: 5.3e-8 },
            default_evaporation_fraction: 0.9,
            gas_areas: flammable((25.17, 0.99), (62.05, 1.0)),
            liquid_areas: flammable((536.0, 0.89), (1545.0, 0.89)),
        },
        C6C8 => FluidProperties {
            molecular_weight: 100.0,
            liquid_density: 684.018,
            heat_capacity: Polynomial { a: -5.146, b: 0.6762, c: -3.65e-4, d: 7.658e-8 },
            default_evaporation_fraction: 0.5,
            gas_areas: flammable((29.0, 0.98), (68.0, 0.96)),
            liquid_areas: flammable((182.0, 0.89), (516.0, 0.89)),
        },
        C9C12 => FluidProperties {
            molecular_weight: 149.0,
            liquid_density: 734.012,
            heat_capacity: Polynomial { a: -8.5, b: 1.01, c: -5.56e-4, d: 1.18e-7 },
            default_evaporation_fraction: 0.1,
            gas_areas: flammable((12.0, 0.98), (29.0, 0.96)),
            liquid_areas: flammable((130.0, 0.9), (373.0, 0.89)),
        },
        C13C16 => FluidProperties {
            molecular_weight: 205.0,
            liquid_density: 764.527,
            heat_capacity: Polynomial { a: -11.7, b: 1.39, c: -7.72e-4, d: 1.67e-7 },
            default_evaporation_fraction: 0.05,
            gas_areas: None,
            liquid_areas: flammable((64.0, 0.9), (183.0, 0.89)),
        },
        C17C25 => FluidProperties {
            molecular_weight: 280.0,
            liquid_density: 775.019,
            heat_capacity: Polynomial { a: -22.4, b: 1.94, c: -1.12e-3, d: -2.53e-7 },
            default_evaporation_fraction: 0.02,
            gas_areas: None,
            liquid_areas: flammable((20.0, 0.9), (57.7, 0.9)),
        },
        C25Plus => FluidProperties {
            molecular_weight: 422.0,
            liquid_density: 900.026,
            heat_capacity: Polynomial { a: -22.4, b: 1.94, c: -1.12e-3, d: -2.53e-7 },
            default_evaporation_fraction: 0.01,
            gas_areas: None,
            liquid_areas: flammable((11.0, 0.91), (33.6, 0.91)),
        },
        H2 => FluidProperties {
            molecular_weight: 2.0,
            liquid_density: 71.01,
            heat_capacity: Polynomial { a: 27.1, b: 9.27e-3, c: -1.38e-5, d: 7.65e-9 },
            default_evaporation_fraction: 1.0,
            gas_areas: flammable((64.5, 0.992), (420.0, 1.0)),
            liquid_areas: None,
        },
        H2S => FluidProperties {
            molecular_weight: 34.0,
            liquid_density: 993.029,
            heat_capacity: Polynomial { a: 31.9, b: 1.44e-3, c: 2.43e-5, d: -1.18e-8 },
            default_evaporation_fraction: 1.0,
            gas_areas: flammable((32.0, 1.0), (148.0, 1.0)),
            liquid_areas: None,
        },
        Water | Acid => FluidProperties {
            molecular_weight: 18.0,
            liquid_density: 997.947,
            heat_capacity: WATER_CP,
            default_evaporation_fraction: 0.0,
            gas_areas: None,
            liquid_areas: None,
        },
        Steam => FluidProperties {
            molecular_weight: 18.0,
            liquid_density: 997.947,
            heat_capacity: HeatCapacity::Hyperbolic {
                a: 33.4,
                b: 26.8,
                c: 2610.0,
                d: 8.9,
                e: 1169.0,
            },
            default_evaporation_fraction: 1.0,
            gas_areas: None,
            liquid_areas: None,
        },
    }
}
