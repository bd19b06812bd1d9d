//! Mechanical (vibration-induced) fatigue of piping.
//!
//! The base factor is the worst of three indicators: failure history,
//! observed shaking and cyclic load source. Design and corrective-action
//! modifiers then scale it. Every classification is required; a missing one
//! is never read as the most favorable weight.

use super::{DamageEvidence, FatigueEvidence, MechanismAssessment};
use crate::core::{
    AssetContext, BranchDiameter, CorrectiveAction, CyclicLoad, DataConfidence, FatigueAttributes,
    JointType, MechanismKind, PipeCondition, PreviousFailures, Shaking, ShakingDuration,
};
use crate::errors::CalcError;

const MECHANISM: MechanismKind = MechanismKind::MechanicalFatigue;

fn required<T: Copy>(value: Option<T>, input: &str) -> Result<T, CalcError> {
    value.ok_or_else(|| CalcError::missing(MECHANISM, input))
}

fn previous_failures_factor(p: PreviousFailures) -> f64 {
    match p {
        PreviousFailures::None => 1.0,
        PreviousFailures::One => 50.0,
        PreviousFailures::Many => 500.0,
    }
}

fn shaking_factor(attrs: &FatigueAttributes) -> Result<f64, CalcError> {
    let base = match required(attrs.shaking, "shaking")? {
        Shaking::None | Shaking::Minor => return Ok(1.0),
        Shaking::Moderate => 20.0,
        Shaking::Severe => 500.0,
    };
    let duration = match required(attrs.shaking_duration, "shaking_duration")? {
        ShakingDuration::UnderTwoWeeks => 1.0,
        ShakingDuration::TwoToThirteenWeeks => 0.2,
        ShakingDuration::ThirteenToFiftyTwoWeeks => 0.02,
    };
    Ok(base * duration)
}

fn cyclic_load_factor(c: CyclicLoad) -> f64 {
    match c {
        CyclicLoad::ReciprocatingMachinery => 50.0,
        CyclicLoad::PrvChatter => 25.0,
        CyclicLoad::HighPressureDropValve => 10.0,
        CyclicLoad::None => 1.0,
    }
}

fn corrective_action_factor(c: CorrectiveAction) -> f64 {
    match c {
        CorrectiveAction::EngineeringModification => 0.002,
        CorrectiveAction::ExperienceBased => 0.2,
        CorrectiveAction::None => 2.0,
    }
}

fn branch_count_factor(branches: u32) -> f64 {
    match branches {
        0..=5 => 0.5,
        6..=10 => 1.0,
        _ => 2.0,
    }
}

fn pipe_condition_factor(c: PipeCondition) -> f64 {
    match c {
        PipeCondition::MissingOrDamagedSupports => 2.0,
        PipeCondition::Good => 1.0,
    }
}

fn joint_type_factor(j: JointType) -> f64 {
    match j {
        JointType::ThreadedOrSocketWelded => 2.0,
        JointType::SaddleIn => 3.0,
        JointType::PipingTee => 1.0,
        JointType::Weldolet => 0.2,
    }
}

fn branch_diameter_factor(b: BranchDiameter) -> f64 {
    match b {
        BranchDiameter::AllTwoNpsOrSmaller => 0.02,
        BranchDiameter::LargerThanTwoNps => 1.0,
    }
}

pub fn calculate(
    ctx: &AssetContext,
    confidence: DataConfidence,
) -> Result<MechanismAssessment, CalcError> {
    let attrs = &ctx.fatigue;

    let previous_failures =
        previous_failures_factor(required(attrs.previous_failures, "previous_failures")?);
    let shaking = shaking_factor(attrs)?;
    let cyclic_load = cyclic_load_factor(required(attrs.cyclic_load, "cyclic_load")?);
    let base_df = previous_failures.max(shaking).max(cyclic_load);

    let modifiers = corrective_action_factor(required(attrs.corrective_action, "corrective_action")?)
        * branch_count_factor(required(attrs.branch_count, "branch_count")?)
        * pipe_condition_factor(required(attrs.pipe_condition, "pipe_condition")?)
        * joint_type_factor(required(attrs.joint_type, "joint_type")?)
        * branch_diameter_factor(required(attrs.branch_diameter, "branch_diameter")?);

    let uncertainty = confidence.uncertainty_factor();
    Ok(MechanismAssessment::new(
        base_df * modifiers * uncertainty,
        DamageEvidence::Fatigue(FatigueEvidence {
            previous_failures,
            shaking,
            cyclic_load,
            base_df,
            modifiers,
            uncertainty_factor: uncertainty,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::test_support::carbon_steel_pipe;

    fn vibrating_pipe() -> AssetContext {
        let mut ctx = carbon_steel_pipe();
        ctx.fatigue = FatigueAttributes {
            previous_failures: Some(PreviousFailures::None),
            shaking: Some(Shaking::Moderate),
            shaking_duration: Some(ShakingDuration::UnderTwoWeeks),
            cyclic_load: Some(CyclicLoad::PrvChatter),
            corrective_action: Some(CorrectiveAction::None),
            branch_count: Some(8),
            pipe_condition: Some(PipeCondition::Good),
            joint_type: Some(JointType::PipingTee),
            branch_diameter: Some(BranchDiameter::LargerThanTwoNps),
        };
        ctx
    }

    #[test]
    fn test_worst_indicator_governs_base() {
        let result = calculate(&vibrating_pipe(), DataConfidence::A).unwrap();
        // max(1, 20, 25) * 2
        assert!((result.value - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_classification_is_not_defaulted() {
        let mut ctx = vibrating_pipe();
        ctx.fatigue.joint_type = None;
        let err = calculate(&ctx, DataConfidence::A).unwrap_err();
        assert!(err.to_string().contains("joint_type"));
    }

    #[test]
    fn test_shaking_duration_only_needed_when_shaking() {
        let mut ctx = vibrating_pipe();
        ctx.fatigue.shaking = Some(Shaking::Minor);
        ctx.fatigue.shaking_duration = None;
        assert!(calculate(&ctx, DataConfidence::A).is_ok());

        ctx.fatigue.shaking = Some(Shaking::Severe);
        assert!(calculate(&ctx, DataConfidence::A).is_err());
    }

    #[test]
    fn test_engineering_fix_reduces_factor() {
        let mut ctx = vibrating_pipe();
        let before = calculate(&ctx, DataConfidence::A).unwrap().value;
        ctx.fatigue.corrective_action = Some(CorrectiveAction::EngineeringModification);
        let after = calculate(&ctx, DataConfidence::A).unwrap().value;
        assert!(after < before);
    }

    #[test]
    fn test_worse_confidence_raises_factor() {
        let ctx = vibrating_pipe();
        let a = calculate(&ctx, DataConfidence::A).unwrap().value;
        let d = calculate(&ctx, DataConfidence::D).unwrap().value;
        assert!((d / a - 1.25).abs() < 1e-9);
    }
}
