//! Input validation and error types

pub mod data;
pub mod error;

pub use data::{
    validate_aircraft_type, validate_altitude, validate_heading, validate_id,
    validate_id_list, validate_latitude, validate_longitude, validate_non_empty,
    validate_positive, validate_speed,
};
pub use error::{SeparationError, SeparationResult};
