//! The immutable per-request snapshot of an asset.
//!
//! `AssetContext` is assembled by an [`AssetSource`](crate::io::AssetSource)
//! (or deserialized from JSON) and then only read by the calculators.

use super::types::*;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

const DAYS_PER_YEAR: f64 = 365.25;

/// Asset identifier as used by the host application.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of everything a recalculation needs for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetContext {
    pub asset_id: AssetId,
    #[serde(default)]
    pub component: ComponentType,
    /// Date the assessment is made "as of". Ages are measured to this date.
    pub assessment_date: NaiveDate,
    pub design: DesignAttributes,
    #[serde(default)]
    pub protection: ProtectionAttributes,
    #[serde(default)]
    pub service: ServiceAttributes,
    pub inspection: InspectionHistory,
    /// Mechanisms configured (screened in) for this asset.
    #[serde(default)]
    pub mechanisms: BTreeSet<MechanismKind>,
    #[serde(default)]
    pub fatigue: FatigueAttributes,
    #[serde(default)]
    pub financial: FinancialAttributes,
    /// Asset-level override of the configured consequence policy.
    #[serde(default)]
    pub consequence_policy: Option<ConsequencePolicy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignAttributes {
    #[serde(default)]
    pub outer_diameter_mm: Option<f64>,
    pub internal_diameter_mm: f64,
    pub design_pressure_mpa: f64,
    #[serde(default)]
    pub operating_pressure_mpa: f64,
    pub design_temperature_c: f64,
    #[serde(default = "default_operating_temperature")]
    pub operating_temperature_c: f64,
    #[serde(default)]
    pub corrosion_allowance_mm: f64,
    #[serde(default = "default_weld_efficiency")]
    pub weld_efficiency: f64,
    /// Material of construction, the key into the allowable-stress table.
    pub material_id: String,
    #[serde(default)]
    pub material_family: MaterialFamily,
    #[serde(default)]
    pub pwht: bool,
    /// Entered allowable stress; takes precedence over the table lookup.
    #[serde(default)]
    pub allowable_stress_mpa: Option<f64>,
    /// Entered minimum thickness; takes precedence over derivation.
    #[serde(default)]
    pub min_thickness_mm: Option<f64>,
    #[serde(default)]
    pub in_service_date: Option<NaiveDate>,
    #[serde(default)]
    pub brinell_hardness: Option<f64>,
    #[serde(default)]
    pub steel_sulfur_wt_pct: Option<f64>,
}

fn default_operating_temperature() -> f64 {
    20.0
}

fn default_weld_efficiency() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProtectionAttributes {
    #[serde(default)]
    pub coating: CoatingQuality,
    #[serde(default)]
    pub coating_installed: Option<NaiveDate>,
    #[serde(default)]
    pub insulated: bool,
    #[serde(default)]
    pub insulation_type: Option<InsulationType>,
    #[serde(default)]
    pub insulation_complexity: Option<Rating>,
    #[serde(default)]
    pub insulation_condition: Option<Rating>,
    #[serde(default)]
    pub underground: bool,
    #[serde(default)]
    pub cathodic_protection: bool,
    /// Pipe support or saddle that traps moisture
    #[serde(default)]
    pub support_deficiency: bool,
    #[serde(default)]
    pub soil_water_interface: bool,
    #[serde(default)]
    pub detection: SystemRating,
    #[serde(default)]
    pub isolation: SystemRating,
    #[serde(default)]
    pub mitigation: MitigationSystem,
    #[serde(default)]
    pub lining: Option<LiningType>,
    #[serde(default)]
    pub lining_condition: Option<LiningCondition>,
    #[serde(default)]
    pub lining_installed: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ServiceAttributes {
    #[serde(default)]
    pub fluid: RepresentativeFluid,
    #[serde(default)]
    pub phase: FluidPhase,
    #[serde(default)]
    pub toxicity: ToxicityClass,
    #[serde(default)]
    pub toxic_mass_fraction: f64,
    #[serde(default)]
    pub thinning_variant: ThinningVariant,
    #[serde(default)]
    pub corrosivity: Option<Corrosivity>,
    #[serde(default)]
    pub estimated_corrosion_rate_mm_y: Option<f64>,
    #[serde(default)]
    pub injection_point: bool,
    #[serde(default)]
    pub dead_leg: bool,
    #[serde(default)]
    pub online_monitoring: OnlineMonitoring,
    #[serde(default)]
    pub external_environment: Option<ExternalEnvironment>,
    #[serde(default)]
    pub cracking: Option<CrackingChemistry>,
    /// Entered component-damage flammable consequence area (m²)
    #[serde(default)]
    pub ca_cmdflam: Option<f64>,
    /// Entered personnel-injury flammable consequence area (m²)
    #[serde(default)]
    pub ca_injflam: Option<f64>,
    /// Entered personnel-injury toxic consequence area (m²)
    #[serde(default)]
    pub ca_injtox: Option<f64>,
    #[serde(default)]
    pub inventory_mass_kg: Option<f64>,
    #[serde(default)]
    pub evaporation_fraction: Option<f64>,
}

/// Process chemistry for internal cracking. Which fields are required
/// depends on `variant`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackingChemistry {
    pub variant: CrackingVariant,
    #[serde(default)]
    pub ph: Option<f64>,
    #[serde(default)]
    pub h2s_ppm: Option<f64>,
    #[serde(default)]
    pub naoh_wt_pct: Option<f64>,
    #[serde(default)]
    pub amine: Option<AmineSolution>,
    #[serde(default)]
    pub carbonate_ppm: Option<f64>,
}

/// Representative fluid groups used by the consequence model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RepresentativeFluid {
    #[serde(rename = "C1-C2")]
    C1C2,
    #[serde(rename = "C3-C4")]
    C3C4,
    C5,
    #[default]
    #[serde(rename = "C6-C8")]
    C6C8,
    #[serde(rename = "C9-C12")]
    C9C12,
    #[serde(rename = "C13-C16")]
    C13C16,
    #[serde(rename = "C17-C25")]
    C17C25,
    #[serde(rename = "C25+")]
    C25Plus,
    H2,
    H2S,
    Water,
    Steam,
    Acid,
}

/// Inspection counts by effectiveness class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InspectionCounts {
    #[serde(default)]
    pub a: u32,
    #[serde(default)]
    pub b: u32,
    #[serde(default)]
    pub c: u32,
    #[serde(default)]
    pub d: u32,
}

impl InspectionCounts {
    pub fn count(&self, class: DataConfidence) -> u32 {
        match class {
            DataConfidence::A => self.a,
            DataConfidence::B => self.b,
            DataConfidence::C => self.c,
            DataConfidence::D => self.d,
        }
    }

    pub fn total(&self) -> u32 {
        self.a + self.b + self.c + self.d
    }

    /// Highest effectiveness class with at least one inspection, and its count.
    pub fn best(&self) -> Option<(DataConfidence, u32)> {
        DataConfidence::ALL
            .iter()
            .map(|class| (*class, self.count(*class)))
            .find(|(_, n)| *n > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionHistory {
    #[serde(default)]
    pub last_inspection_date: Option<NaiveDate>,
    /// Effectiveness class of the inspection data; the confidence weight
    /// every calculator receives.
    #[serde(default)]
    pub effectiveness: DataConfidence,
    pub nominal_thickness_mm: f64,
    #[serde(default)]
    pub current_thickness_mm: Option<f64>,
    /// Inspection counts for internal thinning (`nthin_a..d`).
    #[serde(default)]
    pub thinning: InspectionCounts,
    #[serde(default)]
    pub external: InspectionCounts,
    #[serde(default)]
    pub cui: InspectionCounts,
    #[serde(default)]
    pub cracking: InspectionCounts,
    #[serde(default)]
    pub external_cracking: InspectionCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FatigueAttributes {
    #[serde(default)]
    pub previous_failures: Option<PreviousFailures>,
    #[serde(default)]
    pub shaking: Option<Shaking>,
    #[serde(default)]
    pub shaking_duration: Option<ShakingDuration>,
    #[serde(default)]
    pub cyclic_load: Option<CyclicLoad>,
    #[serde(default)]
    pub corrective_action: Option<CorrectiveAction>,
    #[serde(default)]
    pub branch_count: Option<u32>,
    #[serde(default)]
    pub pipe_condition: Option<PipeCondition>,
    #[serde(default)]
    pub joint_type: Option<JointType>,
    #[serde(default)]
    pub branch_diameter: Option<BranchDiameter>,
}

/// Cost inputs for the production (financial) consequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAttributes {
    #[serde(default = "default_one")]
    pub outage_multiplier: f64,
    #[serde(default)]
    pub production_cost_per_day: f64,
    #[serde(default = "default_equipment_cost")]
    pub equipment_cost_per_m2: f64,
    /// Personnel per m²
    #[serde(default = "default_population_density")]
    pub population_density: f64,
    #[serde(default = "default_injury_cost")]
    pub injury_cost: f64,
    #[serde(default)]
    pub environmental_cost_per_m3: f64,
    #[serde(default = "default_one")]
    pub material_cost_factor: f64,
}

fn default_one() -> f64 {
    1.0
}

fn default_equipment_cost() -> f64 {
    1_000.0
}

fn default_population_density() -> f64 {
    0.0005
}

fn default_injury_cost() -> f64 {
    5_000_000.0
}

impl Default for FinancialAttributes {
    fn default() -> Self {
        Self {
            outage_multiplier: default_one(),
            production_cost_per_day: 0.0,
            equipment_cost_per_m2: default_equipment_cost(),
            population_density: default_population_density(),
            injury_cost: default_injury_cost(),
            environmental_cost_per_m3: 0.0,
            material_cost_factor: default_one(),
        }
    }
}

/// Whole years (fractional) between two dates, zero when `to` precedes `from`.
pub fn years_between(from: NaiveDate, to: NaiveDate) -> f64 {
    let days = (to - from).num_days();
    (days.max(0) as f64) / DAYS_PER_YEAR
}

impl AssetContext {
    /// Date damage accumulation restarted: the last inspection, else the
    /// in-service date.
    pub fn exposure_start(&self) -> Option<NaiveDate> {
        self.inspection
            .last_inspection_date
            .or(self.design.in_service_date)
    }

    /// Years since the last inspection (or since service start).
    pub fn age_since_inspection(&self) -> Option<f64> {
        self.exposure_start()
            .map(|start| years_between(start, self.assessment_date))
    }

    /// Thickness at the last reading: measured when available, else nominal.
    pub fn reading_thickness_mm(&self) -> f64 {
        self.inspection
            .current_thickness_mm
            .unwrap_or(self.inspection.nominal_thickness_mm)
    }

    pub fn is_configured(&self, mechanism: MechanismKind) -> bool {
        self.mechanisms.contains(&mechanism)
    }
}
