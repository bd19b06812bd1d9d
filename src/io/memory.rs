//! In-memory collaborators for tests and embedding.

use super::real::index_assets;
use super::traits::{AssetSource, ResultSink, StressDataset};
use crate::core::{AssetContext, AssetId};
use crate::errors::CalcError;
use crate::material::{reference_table, StressTable};
use crate::orchestrator::RiskAssessmentResult;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Default)]
pub struct InMemoryAssetSource {
    assets: BTreeMap<AssetId, AssetContext>,
}

impl InMemoryAssetSource {
    pub fn new(assets: impl IntoIterator<Item = AssetContext>) -> Self {
        Self {
            assets: index_assets(assets),
        }
    }

    pub fn insert(&mut self, asset: AssetContext) {
        self.assets.insert(asset.asset_id.clone(), asset);
    }
}

impl AssetSource for InMemoryAssetSource {
    fn load(&self, asset_id: &AssetId) -> Result<AssetContext, CalcError> {
        self.assets
            .get(asset_id)
            .cloned()
            .ok_or_else(|| CalcError::Source(format!("asset '{}' not found", asset_id)))
    }

    fn asset_ids(&self) -> Result<Vec<AssetId>, CalcError> {
        Ok(self.assets.keys().cloned().collect())
    }
}

/// The built-in reference stress dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceDataset;

impl StressDataset for ReferenceDataset {
    fn stress_table(&self) -> Result<StressTable, CalcError> {
        Ok(reference_table().clone())
    }
}

/// Keeps every persisted result, in arrival order.
#[derive(Debug, Default)]
pub struct InMemorySink {
    results: Mutex<Vec<RiskAssessmentResult>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> Result<Vec<RiskAssessmentResult>, CalcError> {
        self.results
            .lock()
            .map(|results| results.clone())
            .map_err(|_| CalcError::Sink("result store lock poisoned".into()))
    }

    /// Most recent result for an asset.
    pub fn latest(&self, asset_id: &AssetId) -> Result<Option<RiskAssessmentResult>, CalcError> {
        Ok(self
            .results()?
            .into_iter()
            .rev()
            .find(|r| &r.asset_id == asset_id))
    }
}

impl ResultSink for InMemorySink {
    fn persist(&self, result: &RiskAssessmentResult) -> Result<(), CalcError> {
        self.results
            .lock()
            .map_err(|_| CalcError::Sink("result store lock poisoned".into()))?
            .push(result.clone());
        Ok(())
    }
}
