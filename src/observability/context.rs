//! Thread-local context tracking for crash reports.
//!
//! Records which calculation phase, asset and mechanism the current thread
//! is working on. Thread-local storage keeps this correct under rayon, and
//! atomic counters track batch progress across threads.

use crate::core::MechanismKind;
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};

static ASSETS_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static ASSETS_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<CalculationContext> = const { RefCell::new(CalculationContext::new()) };
}

/// What the engine was doing when something went wrong.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculationContext {
    pub phase: Option<CalculationPhase>,
    pub current_asset: Option<String>,
    pub current_mechanism: Option<MechanismKind>,
}

impl CalculationContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_asset: None,
            current_mechanism: None,
        }
    }
}

/// Major stages of one recalculation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationPhase {
    LoadingAssets,
    DesignBasis,
    DamageFactors,
    Consequence,
    RiskCombination,
    Persisting,
    OutputGeneration,
}

impl std::fmt::Display for CalculationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadingAssets => write!(f, "loading_assets"),
            Self::DesignBasis => write!(f, "design_basis"),
            Self::DamageFactors => write!(f, "damage_factors"),
            Self::Consequence => write!(f, "consequence"),
            Self::RiskCombination => write!(f, "risk_combination"),
            Self::Persisting => write!(f, "persisting"),
            Self::OutputGeneration => write!(f, "output_generation"),
        }
    }
}

/// Restores the previous context on drop, so guards nest.
pub struct ContextGuard {
    previous: CalculationContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update_context(apply: impl FnOnce(&mut CalculationContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

#[must_use]
pub fn set_phase(phase: CalculationPhase) -> ContextGuard {
    update_context(|ctx| ctx.phase = Some(phase))
}

#[must_use]
pub fn set_current_asset(asset_id: impl Into<String>) -> ContextGuard {
    let asset_id = asset_id.into();
    update_context(|ctx| ctx.current_asset = Some(asset_id))
}

#[must_use]
pub fn set_current_mechanism(mechanism: MechanismKind) -> ContextGuard {
    update_context(|ctx| ctx.current_mechanism = Some(mechanism))
}

pub fn set_progress(processed: usize, total: usize) {
    ASSETS_PROCESSED.store(processed, Ordering::Relaxed);
    ASSETS_TOTAL.store(total, Ordering::Relaxed);
}

pub fn increment_processed() {
    ASSETS_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> CalculationContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// (processed, total) assets
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        ASSETS_PROCESSED.load(Ordering::Relaxed),
        ASSETS_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = CalculationContext::new();
    });
}
