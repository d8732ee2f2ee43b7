//! Distance models and the separation engine

pub mod geometry;
pub mod separation;

pub use geometry::{
    euclidean_distance, from_cartesian, geodesic_distance, geodesic_distance_on, great_circle_distance, to_cartesian,
    vertical_distance,
};
pub use separation::{get_distance, IdList, Measure, PositionTable, SeparationEngine, SeparationMatrix};
