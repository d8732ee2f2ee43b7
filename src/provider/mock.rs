//! In-memory position provider for testing and offline use

use crate::core::AircraftId;
use crate::provider::{CommError, CommResult, PositionProvider, RawPosition};
use std::cell::RefCell;
use std::collections::HashMap;

/// Deterministic provider backed by a map.
///
/// Every batch it is asked for is recorded so callers can check how many
/// requests were made and with which ids.
#[derive(Debug, Default)]
pub struct MockPositionProvider {
    positions: HashMap<AircraftId, RawPosition>,
    failure: Option<CommError>,
    requests: RefCell<Vec<Vec<AircraftId>>>,
}

impl MockPositionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`add_aircraft`](Self::add_aircraft)
    pub fn with_aircraft(mut self, id: &str, latitude: f64, longitude: f64, altitude_ft: f64) -> Self {
        self.add_aircraft(id, latitude, longitude, altitude_ft);
        self
    }

    /// Add or replace an aircraft. Ids are normalized like real callsigns;
    /// an empty id is ignored.
    pub fn add_aircraft(&mut self, id: &str, latitude: f64, longitude: f64, altitude_ft: f64) {
        if let Ok(id) = AircraftId::new(id) {
            self.positions
                .insert(id, RawPosition::new(latitude, longitude, altitude_ft));
        }
    }

    pub fn remove_aircraft(&mut self, id: &AircraftId) -> Option<RawPosition> {
        self.positions.remove(id)
    }

    /// Make every subsequent fetch fail with `error`
    pub fn fail_with(&mut self, error: CommError) {
        self.failure = Some(error);
    }

    /// Restore normal operation after [`fail_with`](Self::fail_with)
    pub fn recover(&mut self) {
        self.failure = None;
    }

    /// Id batches requested so far, in call order
    pub fn requests(&self) -> Vec<Vec<AircraftId>> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn aircraft_count(&self) -> usize {
        self.positions.len()
    }
}

impl PositionProvider for MockPositionProvider {
    fn fetch_positions(&self, ids: &[AircraftId]) -> CommResult<HashMap<AircraftId, RawPosition>> {
        self.requests.borrow_mut().push(ids.to_vec());

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.positions.get(id).map(|pos| (id.clone(), *pos)))
            .collect())
    }
}
