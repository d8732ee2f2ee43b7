//! Position provider abstraction.
//!
//! The separation engine only needs one capability from the outside world:
//! a batched lookup of current aircraft positions. `BlueBirdClient` serves it
//! over HTTP, `MockPositionProvider` from memory.

pub mod bluebird;
pub mod error;
pub mod mock;

pub use bluebird::BlueBirdClient;
pub use error::{CommError, CommResult};
pub use mock::MockPositionProvider;

use crate::core::AircraftId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Position as reported by the provider. Altitude is in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_ft: f64,
}

impl RawPosition {
    pub fn new(latitude: f64, longitude: f64, altitude_ft: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_ft,
        }
    }
}

/// Batched lookup of current aircraft positions.
pub trait PositionProvider {
    /// Fetch positions for `ids` in a single request.
    ///
    /// Ids unknown to the provider are absent from the returned map; that is
    /// not an error. `Err` means the provider itself could not be queried.
    fn fetch_positions(&self, ids: &[AircraftId]) -> CommResult<HashMap<AircraftId, RawPosition>>;
}

impl<P: PositionProvider + ?Sized> PositionProvider for &P {
    fn fetch_positions(&self, ids: &[AircraftId]) -> CommResult<HashMap<AircraftId, RawPosition>> {
        (**self).fetch_positions(ids)
    }
}

impl<P: PositionProvider + ?Sized> PositionProvider for Box<P> {
    fn fetch_positions(&self, ids: &[AircraftId]) -> CommResult<HashMap<AircraftId, RawPosition>> {
        (**self).fetch_positions(ids)
    }
}
