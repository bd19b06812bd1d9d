//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use indoc::indoc;
use rbi_engine::core::AssetContext;
use rbi_engine::io::parse_assets;

/// A 6" carbon-steel line in C6-C8 liquid service, thinning only.
pub const CARBON_STEEL_PIPE: &str = indoc! {r#"
    {
        "asset_id": "P-100",
        "component": "pipe",
        "assessment_date": "2025-01-01",
        "design": {
            "outer_diameter_mm": 168.3,
            "internal_diameter_mm": 154.1,
            "design_pressure_mpa": 2.0,
            "operating_pressure_mpa": 1.5,
            "design_temperature_c": 150.0,
            "operating_temperature_c": 60.0,
            "corrosion_allowance_mm": 3.0,
            "material_id": "SA-106-B",
            "material_family": "carbon_steel",
            "in_service_date": "2010-01-01"
        },
        "service": {
            "corrosivity": "moderate",
            "external_environment": "temperate"
        },
        "inspection": {
            "last_inspection_date": "2020-01-01",
            "effectiveness": "C",
            "nominal_thickness_mm": 7.11,
            "current_thickness_mm": 6.5
        },
        "mechanisms": ["thinning"]
    }
"#};

pub fn carbon_steel_pipe() -> AssetContext {
    parse_assets(CARBON_STEEL_PIPE)
        .expect("fixture parses")
        .remove(0)
}

/// The fixture with a new id.
pub fn pipe_named(id: &str) -> AssetContext {
    let mut ctx = carbon_steel_pipe();
    ctx.asset_id = rbi_engine::AssetId::new(id);
    ctx
}

/// `count` assets as a JSON array.
pub fn asset_array_json(count: usize) -> String {
    let assets: Vec<AssetContext> = (0..count)
        .map(|i| pipe_named(&format!("P-{}", 100 + i)))
        .collect();
    serde_json::to_string_pretty(&assets).expect("assets serialize")
}
