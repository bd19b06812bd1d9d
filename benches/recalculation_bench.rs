//! Benchmarks for single-asset and batch recalculation, sequential versus
//! parallel.

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rbi_engine::config::{EngineConfig, ParallelConfig};
use rbi_engine::core::{
    AssetContext, AssetId, ComponentType, Corrosivity, DataConfidence, DesignAttributes,
    ExternalEnvironment, FatigueAttributes, FinancialAttributes, InspectionCounts,
    InspectionHistory, MaterialFamily, MechanismKind, ProtectionAttributes, ServiceAttributes,
};
use rbi_engine::RecalculationOrchestrator;
use std::hint::black_box;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// An insulated carbon-steel line with every mechanism screened in.
fn asset(index: usize) -> AssetContext {
    AssetContext {
        asset_id: AssetId::new(format!("P-{}", index)),
        component: ComponentType::Pipe,
        assessment_date: date(2025, 1, 1),
        design: DesignAttributes {
            outer_diameter_mm: Some(168.3),
            internal_diameter_mm: 154.1,
            design_pressure_mpa: 2.0,
            operating_pressure_mpa: 1.5,
            design_temperature_c: 150.0,
            operating_temperature_c: 80.0,
            corrosion_allowance_mm: 3.0,
            weld_efficiency: 1.0,
            material_id: "SA-106-B".into(),
            material_family: MaterialFamily::CarbonSteel,
            pwht: false,
            allowable_stress_mpa: None,
            min_thickness_mm: None,
            in_service_date: Some(date(2005, 1, 1)),
            brinell_hardness: None,
            steel_sulfur_wt_pct: None,
        },
        protection: ProtectionAttributes {
            insulated: true,
            ..ProtectionAttributes::default()
        },
        service: ServiceAttributes {
            corrosivity: Some(Corrosivity::High),
            external_environment: Some(ExternalEnvironment::Marine),
            ..ServiceAttributes::default()
        },
        inspection: InspectionHistory {
            last_inspection_date: Some(date(2019, 6, 1)),
            effectiveness: DataConfidence::B,
            nominal_thickness_mm: 7.11,
            current_thickness_mm: Some(6.0 - (index % 10) as f64 * 0.1),
            thinning: InspectionCounts {
                b: 1,
                ..InspectionCounts::default()
            },
            external: InspectionCounts::default(),
            cui: InspectionCounts::default(),
            cracking: InspectionCounts::default(),
            external_cracking: InspectionCounts::default(),
        },
        mechanisms: MechanismKind::ALL.into_iter().collect(),
        fatigue: FatigueAttributes::default(),
        financial: FinancialAttributes::default(),
        consequence_policy: None,
    }
}

fn engine(parallel: ParallelConfig) -> RecalculationOrchestrator {
    RecalculationOrchestrator::with_reference_table(EngineConfig {
        parallel,
        ..EngineConfig::default()
    })
}

fn bench_single_asset(c: &mut Criterion) {
    let ctx = asset(0);
    let mut group = c.benchmark_group("single_asset");
    for (name, parallel) in [
        ("sequential", ParallelConfig::sequential()),
        ("parallel", ParallelConfig::default()),
    ] {
        let engine = engine(parallel);
        group.bench_function(name, |b| b.iter(|| engine.recalculate(black_box(&ctx))));
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    for size in [10usize, 100, 1000] {
        let assets: Vec<_> = (0..size).map(asset).collect();
        group.throughput(Throughput::Elements(size as u64));

        let sequential = engine(ParallelConfig::sequential());
        group.bench_with_input(BenchmarkId::new("sequential", size), &assets, |b, assets| {
            b.iter(|| sequential.recalculate_all(black_box(assets)))
        });

        let parallel = engine(ParallelConfig::default());
        group.bench_with_input(BenchmarkId::new("parallel", size), &assets, |b, assets| {
            b.iter(|| parallel.recalculate_all(black_box(assets)))
        });

        group.bench_with_input(BenchmarkId::new("lazy", size), &assets, |b, assets| {
            b.iter(|| {
                sequential
                    .recalculate_batch(assets.iter().cloned())
                    .filter(|r| r.is_ok())
                    .count()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_asset, bench_batch);
criterion_main!(benches);
