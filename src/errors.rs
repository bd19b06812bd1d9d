//! Error taxonomy for the calculation engine.
//!
//! Every calculator returns a `Result<_, CalcError>`; expected domain
//! conditions (out-of-range inputs, missing lookups, undefined chemistry)
//! are values, never panics.
//!
//! # Error Codes
//!
//! - E100: allowable-stress lookup miss
//! - E110: invalid geometry for the thickness derivation
//! - E120: undefined damage-mechanism input
//! - E125: undefined consequence input
//! - E130: aggregation impossible
//! - E140: configuration
//! - E150: I/O
//! - E160: collaborator (asset source / result sink)
//!
//! Only `AggregationImpossible` and the shell-level variants are fatal to a
//! recalculation; the others are recovered locally and recorded in the
//! result.

use crate::core::MechanismKind;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Stable error code for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    pub const LOOKUP_MISS: ErrorCode = ErrorCode("E100");
    pub const INVALID_GEOMETRY: ErrorCode = ErrorCode("E110");
    pub const UNDEFINED_MECHANISM_INPUT: ErrorCode = ErrorCode("E120");
    pub const UNDEFINED_CONSEQUENCE_INPUT: ErrorCode = ErrorCode("E125");
    pub const AGGREGATION_IMPOSSIBLE: ErrorCode = ErrorCode("E130");
    pub const CONFIG: ErrorCode = ErrorCode("E140");
    pub const IO: ErrorCode = ErrorCode("E150");
    pub const COLLABORATOR: ErrorCode = ErrorCode("E160");

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why an allowable-stress lookup could not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMissReason {
    UnknownMaterial,
    OutOfRange { min_c: f64, max_c: f64 },
    NoBracket,
    InvalidTemperature,
}

impl fmt::Display for LookupMissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMaterial => write!(f, "material has no tabulated rows"),
            Self::OutOfRange { min_c, max_c } => {
                write!(f, "outside tabulated range {} to {} °C", min_c, max_c)
            }
            Self::NoBracket => write!(f, "fewer than two bracketing rows"),
            Self::InvalidTemperature => write!(f, "temperature is not a finite number"),
        }
    }
}

/// Errors raised by the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Material/temperature pair is not covered by the stress table.
    #[error("[{code}] no allowable stress for '{material}' at {temperature_c} °C: {reason}", code = ErrorCode::LOOKUP_MISS)]
    LookupMiss {
        material: String,
        temperature_c: f64,
        reason: LookupMissReason,
    },

    /// Non-physical input to the thickness derivation.
    #[error("[{code}] invalid geometry: {0}", code = ErrorCode::INVALID_GEOMETRY)]
    InvalidGeometry(String),

    /// A calculator's required input is missing or outside its domain.
    #[error("[{code}] {mechanism}: input '{input}' {detail}", code = ErrorCode::UNDEFINED_MECHANISM_INPUT)]
    UndefinedMechanismInput {
        mechanism: MechanismKind,
        input: String,
        detail: String,
    },

    /// A consequence input is missing or non-physical.
    #[error("[{code}] consequence: input '{input}' {detail}", code = ErrorCode::UNDEFINED_CONSEQUENCE_INPUT)]
    UndefinedConsequenceInput { input: String, detail: String },

    /// Neither a damage factor nor a consequence could be formed.
    #[error("[{code}] asset '{asset_id}': no damage factor and no consequence could be computed", code = ErrorCode::AGGREGATION_IMPOSSIBLE)]
    AggregationImpossible { asset_id: String },

    #[error("[{code}] configuration error: {message}", code = ErrorCode::CONFIG)]
    Config {
        message: String,
        field: Option<String>,
    },

    #[error("[{code}] I/O error: {message}", code = ErrorCode::IO)]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("[{code}] asset source: {0}", code = ErrorCode::COLLABORATOR)]
    Source(String),

    #[error("[{code}] result sink: {0}", code = ErrorCode::COLLABORATOR)]
    Sink(String),
}

impl CalcError {
    /// Missing input (`None`) for a mechanism.
    #[must_use]
    pub fn missing(mechanism: MechanismKind, input: impl Into<String>) -> Self {
        Self::UndefinedMechanismInput {
            mechanism,
            input: input.into(),
            detail: "is missing".to_string(),
        }
    }

    /// Input present but outside the mechanism's defined domain.
    #[must_use]
    pub fn out_of_domain(
        mechanism: MechanismKind,
        input: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::UndefinedMechanismInput {
            mechanism,
            input: input.into(),
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn consequence_input(input: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UndefinedConsequenceInput {
            input: input.into(),
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry(message.into())
    }

    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    #[must_use]
    pub fn config_with_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    #[must_use]
    pub fn from_io_error(err: &std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io {
            message: err.to_string(),
            path,
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::LookupMiss { .. } => ErrorCode::LOOKUP_MISS,
            Self::InvalidGeometry(_) => ErrorCode::INVALID_GEOMETRY,
            Self::UndefinedMechanismInput { .. } => ErrorCode::UNDEFINED_MECHANISM_INPUT,
            Self::UndefinedConsequenceInput { .. } => ErrorCode::UNDEFINED_CONSEQUENCE_INPUT,
            Self::AggregationImpossible { .. } => ErrorCode::AGGREGATION_IMPOSSIBLE,
            Self::Config { .. } => ErrorCode::CONFIG,
            Self::Io { .. } => ErrorCode::IO,
            Self::Source(_) | Self::Sink(_) => ErrorCode::COLLABORATOR,
        }
    }

    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::LookupMiss { .. } => "LookupMiss",
            Self::InvalidGeometry(_) => "InvalidGeometry",
            Self::UndefinedMechanismInput { .. } => "UndefinedMechanismInput",
            Self::UndefinedConsequenceInput { .. } => "UndefinedConsequenceInput",
            Self::AggregationImpossible { .. } => "AggregationImpossible",
            Self::Config { .. } => "Config",
            Self::Io { .. } => "I/O",
            Self::Source(_) => "Source",
            Self::Sink(_) => "Sink",
        }
    }

    /// Whether this error aborts the whole recalculation.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::LookupMiss { .. }
                | Self::InvalidGeometry(_)
                | Self::UndefinedMechanismInput { .. }
                | Self::UndefinedConsequenceInput { .. }
        )
    }

    /// Suggested process exit code for the CLI.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 3,
            _ => 1,
        }
    }
}

impl Serialize for CalcError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("CalcError", 4)?;
        state.serialize_field("code", &self.code().as_str())?;
        state.serialize_field("category", &self.category())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("fatal", &self.is_fatal())?;
        state.end()
    }
}
