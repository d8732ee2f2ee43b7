//! Aircraft separation client
//!
//! Queries aircraft positions from a BlueBird air-traffic simulation service
//! and computes pairwise separations under four distance models: ellipsoidal
//! geodesic, spherical great circle, vertical and 3D euclidean.

pub mod core;
pub mod algorithms;
pub mod validation;
pub mod utils;
pub mod provider;
pub mod api;
pub mod logging;

// Re-export commonly used types
pub use crate::core::{AircraftId, EllipsoidParameters, GeoPoint, EARTH_RADIUS, FEET_TO_METRES, WGS84_FLATTENING};
pub use crate::algorithms::{
    euclidean_distance, geodesic_distance, get_distance, great_circle_distance, to_cartesian,
    vertical_distance, IdList, Measure, PositionTable, SeparationEngine, SeparationMatrix,
};
pub use crate::validation::{SeparationError, SeparationResult};
pub use crate::provider::{BlueBirdClient, CommError, CommResult, MockPositionProvider, PositionProvider, RawPosition};
pub use crate::utils::{ClientConfig, ConfigError, Simulator};
pub use crate::api::{MatrixFormatter, OutputFormat};
