//! Collaborators at the edge of the engine: asset sources, stress datasets,
//! result sinks and report writers.

pub mod memory;
pub mod real;
pub mod traits;
pub mod writers;

pub use memory::{InMemoryAssetSource, InMemorySink, ReferenceDataset};
pub use real::{parse_assets, JsonAssetFile, JsonDirectorySink, JsonStressDataset};
pub use traits::{AssetSource, ResultSink, StressDataset};
pub use writers::{create_writer, AssessmentReport, AssetFailure, OutputFormat, OutputWriter};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::core::AssetId;
    use crate::damage::test_support::carbon_steel_pipe;
    use crate::errors::CalcError;
    use crate::orchestrator::RecalculationOrchestrator;
    use tempfile::TempDir;

    #[test]
    fn test_persist_round_trip_in_memory() {
        let source = InMemoryAssetSource::new(vec![carbon_steel_pipe()]);
        let sink = InMemorySink::new();
        let engine = RecalculationOrchestrator::with_reference_table(EngineConfig::default());

        let id = AssetId::new("P-100");
        let result = engine.recalculate_and_persist(&id, &source, &sink).unwrap();
        assert_eq!(sink.latest(&id).unwrap(), Some(result));
    }

    #[test]
    fn test_unknown_asset_is_a_source_error() {
        let source = InMemoryAssetSource::default();
        let sink = InMemorySink::new();
        let engine = RecalculationOrchestrator::with_reference_table(EngineConfig::default());
        let err = engine
            .recalculate_and_persist(&AssetId::new("nope"), &source, &sink)
            .unwrap_err();
        assert!(matches!(err, CalcError::Source(_)));
        assert!(sink.results().unwrap().is_empty());
    }

    #[test]
    fn test_json_files() {
        let dir = TempDir::new().unwrap();
        let assets_path = dir.path().join("assets.json");
        std::fs::write(
            &assets_path,
            serde_json::to_string(&carbon_steel_pipe()).unwrap(),
        )
        .unwrap();
        let source = JsonAssetFile::open(&assets_path).unwrap();
        assert_eq!(source.asset_ids().unwrap(), vec![AssetId::new("P-100")]);

        let rows_path = dir.path().join("rows.json");
        std::fs::write(
            &rows_path,
            r#"[{"material_id":"M1","temperature_c":20.0,"stress_mpa":250.0},
                {"material_id":"M1","temperature_c":100.0,"stress_mpa":230.0}]"#,
        )
        .unwrap();
        let table = JsonStressDataset::new(&rows_path).stress_table().unwrap();
        assert_eq!(table.lookup("M1", 60.0).value(), Some(240.0));

        let sink = JsonDirectorySink::new(dir.path().join("out")).unwrap();
        let engine = RecalculationOrchestrator::with_reference_table(EngineConfig::default());
        let result = engine
            .recalculate_and_persist(&AssetId::new("P-100"), &source, &sink)
            .unwrap();
        assert!(sink.path_for(&result).exists());
    }

    #[test]
    fn test_malformed_asset_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"asset_id\": 3}").unwrap();
        assert!(matches!(
            JsonAssetFile::open(&path).unwrap_err(),
            CalcError::Source(_)
        ));
    }
}
