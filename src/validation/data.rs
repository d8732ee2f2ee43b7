//! Input guards shared by every public operation.
//!
//! Each guard returns `SeparationError::InvalidArgument` naming the offending
//! parameter and value. NaN fails every range check.

use crate::core::AircraftId;
use crate::validation::error::{SeparationError, SeparationResult};

pub fn validate_latitude(lat: f64) -> SeparationResult<()> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        Err(SeparationError::invalid("latitude", lat, "must be within [-90, 90]"))
    }
}

pub fn validate_longitude(lon: f64) -> SeparationResult<()> {
    if (-180.0..180.0).contains(&lon) {
        Ok(())
    } else {
        Err(SeparationError::invalid("longitude", lon, "must be within [-180, 180)"))
    }
}

pub fn validate_heading(hdg: f64) -> SeparationResult<()> {
    if (0.0..360.0).contains(&hdg) {
        Ok(())
    } else {
        Err(SeparationError::invalid("heading", hdg, "must be within [0, 360)"))
    }
}

pub fn validate_speed(spd: f64) -> SeparationResult<()> {
    if spd >= 0.0 {
        Ok(())
    } else {
        Err(SeparationError::invalid("speed", spd, "must not be negative"))
    }
}

/// Altitudes below sea level are rejected as well.
pub fn validate_altitude(alt: f64) -> SeparationResult<()> {
    if alt >= 0.0 {
        Ok(())
    } else {
        Err(SeparationError::invalid("altitude", alt, "must not be negative"))
    }
}

/// Strictly positive check for radius, semiaxis and flattening
pub fn validate_positive(value: f64, parameter: &str) -> SeparationResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(SeparationError::invalid(parameter, value, "must be positive"))
    }
}

/// Non-empty string check, used for aircraft types
pub fn validate_non_empty(value: &str, parameter: &str) -> SeparationResult<()> {
    if value.trim().is_empty() {
        Err(SeparationError::invalid(parameter, format!("{:?}", value), "must be a non-empty string"))
    } else {
        Ok(())
    }
}

pub fn validate_aircraft_type(aircraft_type: &str) -> SeparationResult<()> {
    validate_non_empty(aircraft_type, "aircraft type")
}

/// Validate a single aircraft id with at least `min_length` characters.
///
/// The minimum comes from the simulator's id policy, see
/// [`Simulator::min_id_length`](crate::utils::config::Simulator::min_id_length).
pub fn validate_id(id: &str, min_length: usize) -> SeparationResult<AircraftId> {
    let aircraft_id = AircraftId::new(id)?;
    if aircraft_id.as_str().chars().count() < min_length {
        return Err(SeparationError::invalid(
            "aircraft_id",
            format!("{:?}", id),
            &format!("must have at least {} characters", min_length),
        ));
    }
    Ok(aircraft_id)
}

/// Validate a non-empty list of aircraft ids, preserving order and duplicates
pub fn validate_id_list<S: AsRef<str>>(ids: &[S], min_length: usize) -> SeparationResult<Vec<AircraftId>> {
    if ids.is_empty() {
        return Err(SeparationError::invalid("aircraft_id", "[]", "must be a non-empty list of ids"));
    }
    ids.iter().map(|id| validate_id(id.as_ref(), min_length)).collect()
}
