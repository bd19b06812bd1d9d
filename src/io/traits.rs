//! Collaborator interfaces consumed by the orchestrator.
//!
//! The calculation core never performs I/O. Loading assets, loading the
//! stress dataset and storing results go through these traits so the host
//! application can plug in its own storage.

use crate::core::{AssetContext, AssetId};
use crate::errors::CalcError;
use crate::material::StressTable;
use crate::orchestrator::RiskAssessmentResult;

/// Asset record retrieval keyed by asset identifier.
pub trait AssetSource: Send + Sync {
    fn load(&self, asset_id: &AssetId) -> Result<AssetContext, CalcError>;

    /// Every asset the source knows about, in a stable order.
    fn asset_ids(&self) -> Result<Vec<AssetId>, CalcError>;
}

/// Material/temperature to allowable-stress rows.
pub trait StressDataset {
    fn stress_table(&self) -> Result<StressTable, CalcError>;
}

/// Persistence for finished assessments.
///
/// Results are whole snapshots, so concurrent writes for the same asset may
/// simply let the last one win.
pub trait ResultSink: Send + Sync {
    fn persist(&self, result: &RiskAssessmentResult) -> Result<(), CalcError>;
}
