//! Domain model: the asset snapshot and the closed classification sets the
//! calculators operate on.

pub mod asset;
pub mod types;

pub use asset::{
    years_between, AssetContext, AssetId, CrackingChemistry, DesignAttributes, FatigueAttributes,
    FinancialAttributes, InspectionCounts, InspectionHistory, ProtectionAttributes,
    RepresentativeFluid, ServiceAttributes,
};
pub use types::*;
