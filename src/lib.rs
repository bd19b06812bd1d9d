//! Risk-based inspection engine.
//!
//! Given an [`AssetContext`] snapshot the engine resolves the design basis
//! (allowable stress and minimum thickness), evaluates the damage factor of
//! every applicable mechanism, computes the consequence of failure and
//! places the asset on the 5×5 risk matrix. The calculation core performs
//! no I/O; assets, stress data and results flow through the traits in
//! [`io`].
//!
//! ```ignore
//! use rbi_engine::{EngineConfig, RecalculationOrchestrator};
//!
//! let engine = RecalculationOrchestrator::with_reference_table(EngineConfig::default());
//! let result = engine.recalculate(&asset)?;
//! println!("{:?}", result.risk_category());
//! ```

pub mod cli;
pub mod config;
pub mod consequence;
pub mod core;
pub mod damage;
pub mod errors;
pub mod io;
pub mod material;
pub mod observability;
pub mod orchestrator;
pub mod risk;

pub use crate::config::{EngineConfig, RiskMatrixConfig};
pub use crate::consequence::{ConsequenceResult, GoverningMethod};
pub use crate::core::{AssetContext, AssetId, ConsequencePolicy, MechanismKind};
pub use crate::damage::{calculator_for, DamageCalculator, DamageFactor};
pub use crate::errors::{CalcError, LookupMissReason};
pub use crate::io::{AssetSource, ResultSink, StressDataset};
pub use crate::material::{
    derive_min_thickness, lookup_allowable_stress, reference_table, StressLookup, StressRow,
    StressTable,
};
pub use crate::orchestrator::{
    RecalculationOrchestrator, RecalculationPolicy, RecalculationTrigger, RiskAssessmentResult,
};
pub use crate::risk::{RiskCategory, RiskLevel, RiskRating};
