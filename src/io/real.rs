//! JSON-file implementations of the collaborator traits.

use super::traits::{AssetSource, ResultSink, StressDataset};
use crate::core::{AssetContext, AssetId};
use crate::errors::CalcError;
use crate::material::{StressRow, StressTable};
use crate::orchestrator::RiskAssessmentResult;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use xxhash_rust::xxh64::xxh64;

fn read_to_string(path: &Path) -> Result<String, CalcError> {
    fs::read_to_string(path).map_err(|e| CalcError::from_io_error(&e, Some(path.to_path_buf())))
}

/// Accepts either a single asset object or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum AssetDocument {
    Many(Vec<AssetContext>),
    One(Box<AssetContext>),
}

/// Assets read from one JSON document.
#[derive(Debug, Clone)]
pub struct JsonAssetFile {
    path: PathBuf,
    assets: Vec<AssetContext>,
}

impl JsonAssetFile {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CalcError> {
        let path = path.into();
        let contents = read_to_string(&path)?;
        let assets = parse_assets(&contents)
            .map_err(|e| CalcError::Source(format!("{}: {}", path.display(), e)))?;
        log::debug!("Loaded {} assets from {}", assets.len(), path.display());
        Ok(Self { path, assets })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn assets(&self) -> &[AssetContext] {
        &self.assets
    }

    pub fn into_assets(self) -> Vec<AssetContext> {
        self.assets
    }
}

pub fn parse_assets(contents: &str) -> Result<Vec<AssetContext>, serde_json::Error> {
    Ok(match serde_json::from_str::<AssetDocument>(contents)? {
        AssetDocument::Many(assets) => assets,
        AssetDocument::One(asset) => vec![*asset],
    })
}

impl AssetSource for JsonAssetFile {
    fn load(&self, asset_id: &AssetId) -> Result<AssetContext, CalcError> {
        self.assets
            .iter()
            .find(|a| &a.asset_id == asset_id)
            .cloned()
            .ok_or_else(|| {
                CalcError::Source(format!(
                    "asset '{}' not found in {}",
                    asset_id,
                    self.path.display()
                ))
            })
    }

    fn asset_ids(&self) -> Result<Vec<AssetId>, CalcError> {
        Ok(self.assets.iter().map(|a| a.asset_id.clone()).collect())
    }
}

/// Stress rows from a JSON array of `{material_id, temperature_c, stress_mpa}`.
#[derive(Debug, Clone)]
pub struct JsonStressDataset {
    path: PathBuf,
}

impl JsonStressDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StressDataset for JsonStressDataset {
    fn stress_table(&self) -> Result<StressTable, CalcError> {
        let contents = read_to_string(&self.path)?;
        let rows: Vec<StressRow> = serde_json::from_str(&contents)
            .map_err(|e| CalcError::Source(format!("{}: {}", self.path.display(), e)))?;
        let table = StressTable::from_rows(rows);
        log::debug!(
            "Loaded stress table for {} materials from {}",
            table.materials().count(),
            self.path.display()
        );
        Ok(table)
    }
}

/// Writes each result to `<dir>/<asset>_<hash>_<timestamp>.json`.
///
/// The asset id is sanitized for the file system, so a short hash of the raw
/// id keeps ids like `P/100` and `P_100` apart. Files are written to a
/// temporary name in the same directory and renamed into place.
#[derive(Debug, Clone)]
pub struct JsonDirectorySink {
    dir: PathBuf,
}

impl JsonDirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CalcError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| CalcError::from_io_error(&e, Some(dir.clone())))?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, result: &RiskAssessmentResult) -> PathBuf {
        let stem: String = result
            .asset_id
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        let id_hash = xxh64(result.asset_id.as_str().as_bytes(), 0) as u32;
        self.dir.join(format!(
            "{}_{:08x}_{}.json",
            stem,
            id_hash,
            result.computed_at.format("%Y%m%dT%H%M%S%.3fZ")
        ))
    }
}

/// Unique sibling path for an in-progress write.
fn temp_path_for(target: &Path) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let name = target
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("result");
    target.with_file_name(format!(
        ".{}.tmp.{}.{}",
        name,
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ))
}

fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), CalcError> {
    let temp = temp_path_for(path);
    fs::write(&temp, contents).map_err(|e| CalcError::from_io_error(&e, Some(temp.clone())))?;
    fs::rename(&temp, path).map_err(|e| {
        // Best effort; the rename error is the one worth reporting
        let _ = fs::remove_file(&temp);
        CalcError::from_io_error(&e, Some(path.to_path_buf()))
    })
}

impl ResultSink for JsonDirectorySink {
    fn persist(&self, result: &RiskAssessmentResult) -> Result<(), CalcError> {
        let path = self.path_for(result);
        let json = serde_json::to_string_pretty(result)
            .map_err(|e| CalcError::Sink(format!("serialize {}: {}", result.asset_id, e)))?;
        write_atomically(&path, json.as_bytes())?;
        log::debug!("Persisted {} to {}", result.asset_id, path.display());
        Ok(())
    }
}

/// Index a set of assets by id. A later duplicate replaces an earlier one.
pub fn index_assets(assets: impl IntoIterator<Item = AssetContext>) -> BTreeMap<AssetId, AssetContext> {
    assets
        .into_iter()
        .map(|asset| (asset.asset_id.clone(), asset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::RecalculationOrchestrator;
    use crate::config::EngineConfig;
    use crate::damage::test_support::carbon_steel_pipe;
    use tempfile::TempDir;

    fn result_for(id: &str) -> RiskAssessmentResult {
        let mut ctx = carbon_steel_pipe();
        ctx.asset_id = AssetId::new(id);
        RecalculationOrchestrator::with_reference_table(EngineConfig::default())
            .recalculate(&ctx)
            .unwrap()
    }

    #[test]
    fn test_ids_that_sanitize_alike_get_distinct_files() {
        let dir = TempDir::new().unwrap();
        let sink = JsonDirectorySink::new(dir.path()).unwrap();
        let slash = result_for("P/100");
        let mut underscore = result_for("P_100");
        underscore.computed_at = slash.computed_at;

        assert_ne!(sink.path_for(&slash), sink.path_for(&underscore));
        sink.persist(&slash).unwrap();
        sink.persist(&underscore).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_persist_leaves_no_temporary_files() {
        let dir = TempDir::new().unwrap();
        let sink = JsonDirectorySink::new(dir.path()).unwrap();
        let result = result_for("P-100");
        sink.persist(&result).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("P-100_"));
        assert!(names[0].ends_with(".json"));
        let written = fs::read_to_string(sink.path_for(&result)).unwrap();
        assert!(written.contains("\"P-100\""));
    }

    #[test]
    fn test_path_is_stable_for_one_result() {
        let sink = JsonDirectorySink {
            dir: PathBuf::from("/results"),
        };
        let result = result_for("V-7");
        assert_eq!(sink.path_for(&result), sink.path_for(&result));
    }
}
