//! Physical constants and default earth model parameters

/// WGS-84 equatorial radius (major semiaxis) in metres
pub const EARTH_RADIUS: f64 = 6378137.0;

/// WGS-84 flattening
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257223563;

/// Feet to metres, the provider reports altitude in feet
pub const FEET_TO_METRES: f64 = 0.3048;
