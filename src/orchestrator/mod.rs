//! Single-asset recalculation and its batch forms.
//!
//! A recalculation resolves the design basis, runs every applicable damage
//! calculator, evaluates the consequence, and combines the two into a risk
//! rating. Mechanism and consequence failures are recorded in the result;
//! only a result with neither a PoF nor a consequence is an error.

pub mod applicability;
mod clock;
pub mod policy;
mod result;

pub use applicability::{applicability, applicable_mechanisms, Inapplicability};
pub use clock::{Clock, FixedClock, SystemClock};
pub use policy::{EditDebouncer, RecalculationPolicy, RecalculationRequest, RecalculationTrigger};
pub use result::{MechanismExclusion, MechanismSlots, RiskAssessmentResult};

use crate::config::EngineConfig;
use crate::consequence::{self, GenericFailureFrequency};
use crate::core::{AssetContext, AssetId, MechanismKind};
use crate::damage::{calculator_for, DamageFactor};
use crate::errors::CalcError;
use crate::io::{AssetSource, ResultSink};
use crate::material::{reference_table, resolve_design_basis, DesignBasis, StressTable};
use crate::observability::{self, CalculationPhase};
use crate::risk::{combine, probability_of_failure};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::sync::Arc;

type MechanismOutcome = (MechanismKind, Result<DamageFactor, CalcError>);

pub struct RecalculationOrchestrator {
    config: EngineConfig,
    stress_table: Arc<StressTable>,
    clock: Box<dyn Clock>,
}

impl RecalculationOrchestrator {
    pub fn new(config: EngineConfig, stress_table: Arc<StressTable>) -> Self {
        Self {
            config,
            stress_table,
            clock: Box::new(SystemClock),
        }
    }

    /// Orchestrator backed by the built-in reference stress dataset.
    pub fn with_reference_table(config: EngineConfig) -> Self {
        Self::new(config, Arc::new(reference_table().clone()))
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stress_table(&self) -> &StressTable {
        &self.stress_table
    }

    pub fn policy(&self) -> RecalculationPolicy {
        RecalculationPolicy::new(self.config.recalculation.trigger)
    }

    /// Recalculate one asset. Idempotent apart from `computed_at`.
    pub fn recalculate(&self, ctx: &AssetContext) -> Result<RiskAssessmentResult, CalcError> {
        let span = tracing::debug_span!("recalculate", asset = %ctx.asset_id);
        let _enter = span.enter();
        let _asset = observability::set_current_asset(ctx.asset_id.as_str());
        let computed_at = self.clock.now();

        let (design_basis, design_warnings) = {
            let _phase = observability::set_phase(CalculationPhase::DesignBasis);
            resolve_design_basis(ctx, &self.stress_table)
        };
        for warning in &design_warnings {
            tracing::warn!(asset = %ctx.asset_id, code = %warning.code(), "{}", warning);
        }

        let applicable = applicable_mechanisms(ctx);
        let outcomes = {
            let _phase = observability::set_phase(CalculationPhase::DamageFactors);
            self.run_mechanisms(ctx, &applicable, &design_basis, computed_at)
        };

        let mut damage_factors = MechanismSlots::default();
        let mut exclusions = Vec::new();
        for (mechanism, outcome) in outcomes {
            match outcome {
                Ok(factor) => {
                    tracing::debug!(%mechanism, value = factor.value, "damage factor computed");
                    damage_factors.insert(factor);
                }
                Err(error) => {
                    tracing::warn!(asset = %ctx.asset_id, %mechanism, "mechanism excluded: {}", error);
                    exclusions.push(MechanismExclusion { mechanism, error });
                }
            }
        }

        let consequence_policy = ctx
            .consequence_policy
            .unwrap_or(self.config.consequence.policy);
        let (consequence, consequence_error) = {
            let _phase = observability::set_phase(CalculationPhase::Consequence);
            match consequence::evaluate(ctx, consequence_policy, &self.config.risk_matrix) {
                Ok(result) => (Some(result), None),
                Err(error) => {
                    tracing::warn!(asset = %ctx.asset_id, "consequence not computed: {}", error);
                    (None, Some(error))
                }
            }
        };

        let _phase = observability::set_phase(CalculationPhase::RiskCombination);
        let pof = if !applicable.is_empty() && damage_factors.is_empty() {
            None
        } else {
            Some(probability_of_failure(
                &damage_factors.to_vec(),
                GenericFailureFrequency::for_component(ctx.component).total(),
                self.config.probability.management_systems_factor,
                &self.config.risk_matrix,
            ))
        };

        if pof.is_none() && consequence.is_none() {
            return Err(CalcError::AggregationImpossible {
                asset_id: ctx.asset_id.to_string(),
            });
        }

        let risk = match (&pof, &consequence) {
            (Some(pof), Some(consequence)) => Some(combine(pof, consequence)),
            _ => None,
        };
        if let Some(rating) = &risk {
            tracing::debug!(
                category = %rating.risk_category,
                level = rating.risk_level.label(),
                "risk combined"
            );
        }

        Ok(RiskAssessmentResult {
            asset_id: ctx.asset_id.clone(),
            computed_at,
            design_basis,
            design_warnings,
            damage_factors,
            exclusions,
            pof,
            consequence_policy,
            consequence,
            consequence_error,
            risk,
        })
    }

    /// Fan out over the applicable mechanisms. Outcomes keep the input order.
    fn run_mechanisms(
        &self,
        ctx: &AssetContext,
        applicable: &[MechanismKind],
        basis: &DesignBasis,
        computed_at: DateTime<Utc>,
    ) -> Vec<MechanismOutcome> {
        let run = |mechanism: &MechanismKind| -> MechanismOutcome {
            let _asset = observability::set_current_asset(ctx.asset_id.as_str());
            let _mechanism = observability::set_current_mechanism(*mechanism);
            let outcome = calculator_for(*mechanism)
                .calculate(ctx, ctx.inspection.effectiveness, basis)
                .map(|assessment| DamageFactor::from_assessment(*mechanism, assessment, computed_at));
            (*mechanism, outcome)
        };

        if self.config.parallel.enabled && applicable.len() > 1 {
            applicable.par_iter().map(run).collect()
        } else {
            applicable.iter().map(run).collect()
        }
    }

    /// Lazily recalculate a sequence of assets. Each item is independent; a
    /// failed asset does not stop the sequence.
    pub fn recalculate_batch<I>(&self, contexts: I) -> BatchRecalculation<'_, I::IntoIter>
    where
        I: IntoIterator<Item = AssetContext>,
    {
        BatchRecalculation {
            orchestrator: self,
            contexts: contexts.into_iter(),
        }
    }

    /// Recalculate many assets, in parallel when enabled. Results keep the
    /// input order.
    pub fn recalculate_all(
        &self,
        contexts: &[AssetContext],
    ) -> Vec<Result<RiskAssessmentResult, CalcError>> {
        observability::set_progress(0, contexts.len());
        let run = |ctx: &AssetContext| {
            let result = self.recalculate(ctx);
            observability::increment_processed();
            result
        };

        if self.config.parallel.enabled {
            contexts.par_iter().map(run).collect()
        } else {
            contexts.iter().map(run).collect()
        }
    }

    /// Load an asset, recalculate it and hand the result to the sink.
    /// Nothing is persisted when the recalculation fails.
    pub fn recalculate_and_persist(
        &self,
        asset_id: &AssetId,
        source: &dyn AssetSource,
        sink: &dyn ResultSink,
    ) -> Result<RiskAssessmentResult, CalcError> {
        let ctx = {
            let _phase = observability::set_phase(CalculationPhase::LoadingAssets);
            source.load(asset_id)?
        };
        let result = self.recalculate(&ctx)?;
        let _phase = observability::set_phase(CalculationPhase::Persisting);
        sink.persist(&result)?;
        Ok(result)
    }
}

/// Iterator returned by [`RecalculationOrchestrator::recalculate_batch`].
pub struct BatchRecalculation<'a, I> {
    orchestrator: &'a RecalculationOrchestrator,
    contexts: I,
}

impl<I> Iterator for BatchRecalculation<'_, I>
where
    I: Iterator<Item = AssetContext>,
{
    type Item = Result<RiskAssessmentResult, CalcError>;

    fn next(&mut self) -> Option<Self::Item> {
        let ctx = self.contexts.next()?;
        Some(self.orchestrator.recalculate(&ctx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.contexts.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParallelConfig;
    use crate::core::{
        CrackingChemistry, CrackingVariant, ExternalEnvironment, MaterialFamily, RepresentativeFluid,
    };
    use crate::damage::test_support::carbon_steel_pipe;
    use crate::risk::BASELINE_DAMAGE_FACTOR;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn orchestrator() -> RecalculationOrchestrator {
        RecalculationOrchestrator::with_reference_table(EngineConfig::default())
            .with_clock(FixedClock(fixed_time()))
    }

    #[test]
    fn test_thinning_only_asset_is_complete() {
        let result = orchestrator().recalculate(&carbon_steel_pipe()).unwrap();
        assert!(!result.is_partial());
        assert!(result.damage_factors.thinning.is_some());
        assert_eq!(result.damage_factors.len(), 1);
        assert!(result.risk.is_some());
        assert_eq!(result.computed_at, fixed_time());
        assert!(result.design_warnings.is_empty());
    }

    #[test]
    fn test_recalculate_is_idempotent() {
        let mut ctx = carbon_steel_pipe();
        ctx.mechanisms = MechanismKind::ALL.into_iter().collect();
        let engine = RecalculationOrchestrator::with_reference_table(EngineConfig::default());
        let first = engine.recalculate(&ctx).unwrap();
        let second = engine.recalculate(&ctx).unwrap();
        assert!(first.same_assessment(&second));
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let mut ctx = carbon_steel_pipe();
        ctx.mechanisms = MechanismKind::ALL.into_iter().collect();
        let parallel = orchestrator().recalculate(&ctx).unwrap();

        let config = EngineConfig {
            parallel: ParallelConfig::sequential(),
            ..EngineConfig::default()
        };
        let sequential = RecalculationOrchestrator::with_reference_table(config)
            .with_clock(FixedClock(fixed_time()))
            .recalculate(&ctx)
            .unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_missing_chemistry_excludes_mechanism() {
        let mut ctx = carbon_steel_pipe();
        ctx.mechanisms.insert(MechanismKind::InternalSccSohic);
        let result = orchestrator().recalculate(&ctx).unwrap();

        assert!(result.is_partial());
        assert!(result.is_excluded(MechanismKind::InternalSccSohic));
        assert!(result.damage_factors.internal_scc_sohic.is_none());
        assert!(result.pof.is_some());
    }

    #[test]
    fn test_no_applicable_mechanism_uses_baseline() {
        let mut ctx = carbon_steel_pipe();
        ctx.mechanisms.clear();
        let result = orchestrator().recalculate(&ctx).unwrap();
        let pof = result.pof.unwrap();
        assert_eq!(pof.damage_factor, BASELINE_DAMAGE_FACTOR);
        assert_eq!(pof.governing_mechanism, None);
    }

    #[test]
    fn test_all_mechanisms_failing_leaves_pof_absent() {
        let mut ctx = carbon_steel_pipe();
        ctx.mechanisms = [MechanismKind::InternalSccSohic].into_iter().collect();
        let result = orchestrator().recalculate(&ctx).unwrap();
        assert!(result.pof.is_none());
        assert!(result.risk.is_none());
        assert!(result.consequence.is_some());
    }

    #[test]
    fn test_nothing_computable_is_aggregation_impossible() {
        let mut ctx = carbon_steel_pipe();
        ctx.mechanisms = [MechanismKind::InternalSccSohic].into_iter().collect();
        ctx.design.internal_diameter_mm = 0.0;
        let err = orchestrator().recalculate(&ctx).unwrap_err();
        assert!(matches!(err, CalcError::AggregationImpossible { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_consequence_failure_keeps_pof() {
        let mut ctx = carbon_steel_pipe();
        ctx.service.toxic_mass_fraction = 2.0;
        let result = orchestrator().recalculate(&ctx).unwrap();
        assert!(result.pof.is_some());
        assert!(result.consequence.is_none());
        assert!(matches!(
            result.consequence_error,
            Some(CalcError::UndefinedConsequenceInput { .. })
        ));
        assert!(result.is_partial());
    }

    #[test]
    fn test_lookup_miss_is_a_design_warning() {
        let mut ctx = carbon_steel_pipe();
        ctx.design.material_id = "UNOBTAINIUM".into();
        let result = orchestrator().recalculate(&ctx).unwrap();
        assert!(matches!(
            result.design_warnings.as_slice(),
            [CalcError::LookupMiss { .. }]
        ));
        assert!(result.is_excluded(MechanismKind::Thinning));
    }

    #[test]
    fn test_entered_min_thickness_survives_lookup_miss() {
        let mut ctx = carbon_steel_pipe();
        ctx.design.material_id = "UNOBTAINIUM".into();
        ctx.design.min_thickness_mm = Some(2.0);
        let result = orchestrator().recalculate(&ctx).unwrap();
        assert!(result.damage_factors.thinning.is_some());
        assert_eq!(result.design_warnings.len(), 1);
    }

    #[test]
    fn test_low_pressure_design_keeps_thinning() {
        let mut ctx = carbon_steel_pipe();
        ctx.design.design_pressure_mpa = 0.001;
        ctx.design.internal_diameter_mm = 50.0;
        let result = orchestrator().recalculate(&ctx).unwrap();

        let tmin = result.design_basis.min_thickness_mm.unwrap();
        assert!(tmin > 0.0 && tmin < 0.0005);
        assert!(!result.is_excluded(MechanismKind::Thinning));
        assert!(result.damage_factors.thinning.is_some());
        assert!(result.exclusions.is_empty());
    }

    #[test]
    fn test_uninsulated_asset_never_gets_cui() {
        let mut ctx = carbon_steel_pipe();
        ctx.mechanisms = MechanismKind::ALL.into_iter().collect();
        let result = orchestrator().recalculate(&ctx).unwrap();
        assert!(result.damage_factors.cui.is_none());
        assert!(!result.is_excluded(MechanismKind::Cui));
    }

    #[test]
    fn test_worst_mechanism_governs() {
        let mut ctx = carbon_steel_pipe();
        ctx.design.material_family = MaterialFamily::AusteniticStainless;
        ctx.design.material_id = "SA-312-TP304".into();
        ctx.service.external_environment = Some(ExternalEnvironment::Marine);
        ctx.service.cracking = Some(CrackingChemistry {
            variant: CrackingVariant::SulfideStress,
            ph: Some(4.0),
            h2s_ppm: Some(2_000.0),
            naoh_wt_pct: None,
            amine: None,
            carbonate_ppm: None,
        });
        ctx.mechanisms = MechanismKind::ALL.into_iter().collect();
        let result = orchestrator().recalculate(&ctx).unwrap();

        let max = result
            .damage_factors
            .iter()
            .map(|f| f.value)
            .fold(0.0, f64::max);
        let pof = result.pof.unwrap();
        assert_eq!(pof.damage_factor, max);
        assert!(result.damage_factors.iter().all(|f| f.value >= 0.0));
    }

    #[test]
    fn test_asset_policy_overrides_config() {
        let mut ctx = carbon_steel_pipe();
        ctx.consequence_policy = Some(crate::core::ConsequencePolicy::FinancialOnly);
        let result = orchestrator().recalculate(&ctx).unwrap();
        assert_eq!(
            result.consequence.unwrap().governing_method,
            consequence::GoverningMethod::ProductionBased
        );
    }

    #[test]
    fn test_batch_is_lazy_and_continues_after_failure() {
        let good = carbon_steel_pipe();
        let mut bad = carbon_steel_pipe();
        bad.asset_id = AssetId::new("BAD");
        bad.mechanisms = [MechanismKind::InternalSccSohic].into_iter().collect();
        bad.design.internal_diameter_mm = -1.0;

        let engine = orchestrator();
        let mut batch = engine.recalculate_batch(vec![bad, good.clone(), good]);
        assert_eq!(batch.size_hint(), (3, Some(3)));
        assert!(batch.next().unwrap().is_err());
        assert!(batch.next().unwrap().is_ok());
        assert_eq!(batch.size_hint(), (1, Some(1)));
    }

    #[test]
    fn test_recalculate_all_preserves_order() {
        let contexts: Vec<_> = (0..8)
            .map(|i| {
                let mut ctx = carbon_steel_pipe();
                ctx.asset_id = AssetId::new(format!("P-{}", i));
                ctx.service.fluid = if i % 2 == 0 {
                    RepresentativeFluid::C6C8
                } else {
                    RepresentativeFluid::Water
                };
                ctx
            })
            .collect();
        let results = orchestrator().recalculate_all(&contexts);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.as_ref().unwrap().asset_id.as_str(), format!("P-{}", i));
        }
    }
}
