//! Error and warning types shared across the core.

use thiserror::Error;

/// Errors reported by the core. All of these are validation-time failures:
/// once inputs pass validation, no computation path returns an error.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Demand and generation sequences differ in length or timestamps.
    #[error("series shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A timestamp is not on a 30-minute boundary, or spacing is wrong.
    #[error("timestamps not aligned to the half-hour grid: {0}")]
    UnalignedTimestamps(String),

    /// A demand or generation value is negative or non-finite.
    #[error("invalid series value at index {index}: {value}")]
    InvalidSeriesValue { index: usize, value: f64 },

    /// The demand series does not cover a full 17,520-interval year.
    #[error("expected a full {expected}-interval year, got {actual} intervals")]
    IncompleteYear { expected: usize, actual: usize },

    /// A system capacity is negative.
    #[error("invalid system config: {0}")]
    InvalidSystem(String),

    /// A tariff component is malformed (e.g. negative rate).
    #[error("invalid tariff component `{component}`: {reason}")]
    InvalidTariff { component: String, reason: String },

    /// The generation oracle was asked for a profile it does not know.
    #[error("unknown generation profile `{0}`")]
    UnknownProfile(String),

    /// Site latitude outside the supported band.
    #[error("site latitude {0}° outside supported band ±{1}°")]
    UnsupportedLatitude(f64, f64),

    /// Capital cost missing or negative; payback cannot be computed.
    #[error("invalid capital cost: {0}")]
    InvalidCapitalCost(String),

    /// Dispatch trace is empty; nothing to aggregate.
    #[error("empty dispatch trace")]
    EmptyTrace,
}

/// Soft conditions recorded in the report's `warnings` list. Results are
/// still produced when these occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Warning {
    /// The tariff yields a zero energy rate for every interval of the year.
    ZeroEnergyRates,
    /// The generation series is zero everywhere.
    ZeroGeneration,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroEnergyRates => write!(f, "tariff has no applicable energy rates"),
            Self::ZeroGeneration => write!(f, "generation is zero for every interval"),
        }
    }
}
