//! Which damage mechanisms apply to an asset.
//!
//! A mechanism runs only when it is configured for the asset and the asset's
//! construction admits it. An inapplicable mechanism produces no factor and
//! no exclusion.

use crate::core::{AssetContext, ComponentType, MaterialFamily, MechanismKind};
use serde::Serialize;
use std::fmt;

/// Why a mechanism does not apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Inapplicability {
    NotConfigured,
    NotInsulated,
    Insulated,
    NotFerritic,
    NotAustenitic,
    CathodicallyProtected,
    NotPiping,
}

impl fmt::Display for Inapplicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotConfigured => "not configured for the asset",
            Self::NotInsulated => "component is not insulated",
            Self::Insulated => "component is insulated",
            Self::NotFerritic => "material is not ferritic",
            Self::NotAustenitic => "material is not austenitic stainless",
            Self::CathodicallyProtected => "buried with cathodic protection",
            Self::NotPiping => "component is not piping",
        };
        write!(f, "{}", text)
    }
}

pub fn applicability(ctx: &AssetContext, mechanism: MechanismKind) -> Result<(), Inapplicability> {
    if !ctx.is_configured(mechanism) {
        return Err(Inapplicability::NotConfigured);
    }
    let family = ctx.design.material_family;
    let protection = &ctx.protection;
    match mechanism {
        MechanismKind::Thinning | MechanismKind::InternalSccSohic => Ok(()),
        MechanismKind::ExternalCorrosion => {
            if !family.is_ferritic() {
                Err(Inapplicability::NotFerritic)
            } else if protection.insulated {
                Err(Inapplicability::Insulated)
            } else if protection.underground && protection.cathodic_protection {
                Err(Inapplicability::CathodicallyProtected)
            } else {
                Ok(())
            }
        }
        MechanismKind::Cui => {
            if !protection.insulated {
                Err(Inapplicability::NotInsulated)
            } else if !family.is_ferritic() {
                Err(Inapplicability::NotFerritic)
            } else {
                Ok(())
            }
        }
        MechanismKind::ExternalClScc => {
            if family == MaterialFamily::AusteniticStainless {
                Ok(())
            } else {
                Err(Inapplicability::NotAustenitic)
            }
        }
        MechanismKind::MechanicalFatigue => {
            if ctx.component == ComponentType::Pipe {
                Ok(())
            } else {
                Err(Inapplicability::NotPiping)
            }
        }
    }
}

/// Applicable mechanisms in fixed evaluation order.
pub fn applicable_mechanisms(ctx: &AssetContext) -> Vec<MechanismKind> {
    MechanismKind::ALL
        .into_iter()
        .filter(|mechanism| match applicability(ctx, *mechanism) {
            Ok(()) => true,
            Err(Inapplicability::NotConfigured) => false,
            Err(reason) => {
                tracing::debug!(asset = %ctx.asset_id, %mechanism, %reason, "mechanism not applicable");
                false
            }
        })
        .collect()
}
