//! Core data types for separation queries

use crate::core::constants::{EARTH_RADIUS, WGS84_FLATTENING};
use crate::validation::data::{validate_altitude, validate_latitude, validate_longitude, validate_positive};
use crate::validation::error::{SeparationError, SeparationResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geodetic position of an aircraft, altitude in metres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl GeoPoint {
    /// Create a validated point
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> SeparationResult<Self> {
        validate_latitude(latitude)?;
        validate_longitude(longitude)?;
        validate_altitude(altitude)?;
        Ok(Self {
            latitude,
            longitude,
            altitude,
        })
    }
}

/// Aircraft callsign.
///
/// Surrounding whitespace is trimmed and the rest uppercased, so `" tst1001 "`
/// and `"TST1001"` name the same aircraft. A blank id is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AircraftId(String);

impl AircraftId {
    pub fn new(id: &str) -> SeparationResult<Self> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(SeparationError::invalid(
                "aircraft_id",
                format!("{:?}", id),
                "must be a non-empty string",
            ));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AircraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AircraftId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Earth ellipsoid used by the geodesic model.
///
/// The spherical models use `major_semiaxis` as their radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipsoidParameters {
    major_semiaxis: f64,
    flattening: f64,
}

impl EllipsoidParameters {
    pub fn new(major_semiaxis: f64, flattening: f64) -> SeparationResult<Self> {
        validate_positive(major_semiaxis, "major_semiaxis")?;
        validate_positive(flattening, "flattening")?;
        Ok(Self {
            major_semiaxis,
            flattening,
        })
    }

    pub fn wgs84() -> Self {
        Self {
            major_semiaxis: EARTH_RADIUS,
            flattening: WGS84_FLATTENING,
        }
    }

    pub fn major_semiaxis(&self) -> f64 {
        self.major_semiaxis
    }

    pub fn flattening(&self) -> f64 {
        self.flattening
    }

    /// Polar radius, `a (1 - f)`
    pub fn minor_semiaxis(&self) -> f64 {
        self.major_semiaxis * (1.0 - self.flattening)
    }

    /// Re-check values that may have come from a config file
    pub fn validate(&self) -> SeparationResult<()> {
        validate_positive(self.major_semiaxis, "major_semiaxis")?;
        validate_positive(self.flattening, "flattening")
    }
}

impl Default for EllipsoidParameters {
    fn default() -> Self {
        Self::wgs84()
    }
}
