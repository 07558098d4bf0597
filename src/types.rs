use std::fmt;

use serde::Deserialize;

/// Assimilation scheme for the nature (soil) tile.
///
/// - `None`: no soil analysis.
/// - `Oi`: optimal interpolation of screen-level observations.
/// - `Ekf`: extended Kalman filter, which needs perturbed runs to estimate
///   the Jacobian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NatureScheme {
    None,
    Oi,
    Ekf,
}

impl Default for NatureScheme {
    fn default() -> Self {
        NatureScheme::None
    }
}

/// Assimilation scheme for the sea tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeaScheme {
    None,
    /// Sea surface temperature is read from an external file.
    Input,
}

impl Default for SeaScheme {
    fn default() -> Self {
        SeaScheme::None
    }
}

/// Assimilation scheme for the inland-water tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InlandWaterScheme {
    None,
    Input,
    Flake,
}

impl Default for InlandWaterScheme {
    fn default() -> Self {
        InlandWaterScheme::None
    }
}

/// Assimilation scheme for the town tile. Only `NONE` is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TownScheme {
    None,
}

impl Default for TownScheme {
    fn default() -> Self {
        TownScheme::None
    }
}

/// File format of the sea surface temperature input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SstFormat {
    Ascii,
    Netcdf,
}

/// Variable class an observation type is converted into.
///
/// Only the first three classes are analysed by optimal interpolation; soil
/// moisture observations are carried in the bitmask but never get their own
/// analysis branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ObsVariable {
    Temperature,
    Humidity,
    SnowDepth,
    SoilMoisture,
}

impl ObsVariable {
    /// Map an entry of the observation-type table to its variable class.
    ///
    /// Returns `None` when no converter exists for the type.
    pub fn from_obs_type(obs_type: &str) -> Option<Self> {
        match obs_type.trim().to_uppercase().as_str() {
            "T2M" => Some(ObsVariable::Temperature),
            "HU2M" | "RH2M" => Some(ObsVariable::Humidity),
            "SWE" | "SD" => Some(ObsVariable::SnowDepth),
            "WG1" | "WG2" => Some(ObsVariable::SoilMoisture),
            _ => None,
        }
    }

    /// Variable name used for family names and task arguments.
    pub fn var_name(self) -> &'static str {
        match self {
            ObsVariable::Temperature => "t2m",
            ObsVariable::Humidity => "rh2m",
            ObsVariable::SnowDepth => "sd",
            ObsVariable::SoilMoisture => "wg",
        }
    }
}

impl fmt::Display for ObsVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.var_name())
    }
}
