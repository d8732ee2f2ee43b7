//! Pairwise separation between two collections of aircraft.
//!
//! A query validates every input, asks the position provider once for the
//! union of requested ids, then fills one cell per (from, to) pair. Cells
//! touching an aircraft the provider does not know are `None`.

use crate::algorithms::geometry::{
    euclidean_distance, geodesic_distance, geodesic_distance_on, great_circle_distance, vertical_distance,
};
use crate::core::constants::FEET_TO_METRES;
use crate::core::{AircraftId, EllipsoidParameters, GeoPoint};
use crate::provider::PositionProvider;
use crate::utils::config::Simulator;
use crate::validation::data::{validate_id_list, validate_positive};
use crate::validation::error::{SeparationError, SeparationResult};
use geographiclib_rs::Geodesic;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Distance model used for a separation query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Ellipsoidal geodesic, lat/lon only
    Geodesic,
    /// Spherical great circle, lat/lon only
    GreatCircle,
    /// Altitude difference only
    Vertical,
    /// Straight line through the projected 3D points
    Euclidean,
}

impl Measure {
    pub const ALL: [Measure; 4] = [
        Measure::Geodesic,
        Measure::GreatCircle,
        Measure::Vertical,
        Measure::Euclidean,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Measure::Geodesic => "geodesic",
            Measure::GreatCircle => "great_circle",
            Measure::Vertical => "vertical",
            Measure::Euclidean => "euclidean",
        }
    }

    /// Whether the model reads the radius (or major semiaxis)
    pub fn uses_radius(&self) -> bool {
        !matches!(self, Measure::Vertical)
    }

    /// Whether the model reads the flattening
    pub fn uses_flattening(&self) -> bool {
        matches!(self, Measure::Geodesic)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Measure {
    type Err = SeparationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measure::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or_else(|| {
                SeparationError::invalid(
                    "measure",
                    s,
                    "must be one of geodesic, great_circle, vertical, euclidean",
                )
            })
    }
}

/// Distance in metres between two positions under `measure`.
///
/// `radius` is the sphere radius for the spherical models and the major
/// semiaxis for the geodesic one; `flattening` is only read by the geodesic model.
pub fn get_distance(
    from: &GeoPoint,
    to: &GeoPoint,
    measure: Measure,
    radius: f64,
    flattening: f64,
) -> SeparationResult<f64> {
    match measure {
        Measure::Geodesic => geodesic_distance(
            from.latitude,
            from.longitude,
            to.latitude,
            to.longitude,
            radius,
            flattening,
        ),
        Measure::GreatCircle => {
            great_circle_distance(from.latitude, from.longitude, to.latitude, to.longitude, radius)
        }
        Measure::Vertical => vertical_distance(from.altitude, to.altitude),
        Measure::Euclidean => euclidean_distance(
            from.latitude,
            from.longitude,
            from.altitude,
            to.latitude,
            to.longitude,
            to.altitude,
            radius,
        ),
    }
}

/// One or more aircraft ids as supplied by a caller.
///
/// A single id converts to a one-element list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdList(Vec<String>);

impl IdList {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for IdList {
    fn from(id: &str) -> Self {
        IdList(vec![id.to_string()])
    }
}

impl From<String> for IdList {
    fn from(id: String) -> Self {
        IdList(vec![id])
    }
}

impl From<&AircraftId> for IdList {
    fn from(id: &AircraftId) -> Self {
        IdList(vec![id.as_str().to_string()])
    }
}

impl From<Vec<String>> for IdList {
    fn from(ids: Vec<String>) -> Self {
        IdList(ids)
    }
}

impl From<Vec<&str>> for IdList {
    fn from(ids: Vec<&str>) -> Self {
        IdList(ids.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for IdList {
    fn from(ids: &[&str]) -> Self {
        IdList(ids.iter().map(|id| id.to_string()).collect())
    }
}

impl From<&[String]> for IdList {
    fn from(ids: &[String]) -> Self {
        IdList(ids.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for IdList {
    fn from(ids: [&str; N]) -> Self {
        IdList(ids.iter().map(|id| id.to_string()).collect())
    }
}

/// Positions of the union of requested aircraft, altitude in metres.
///
/// Every requested id has exactly one entry; `None` marks an aircraft the
/// provider does not know.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionTable {
    positions: HashMap<AircraftId, Option<GeoPoint>>,
}

impl PositionTable {
    /// Known position of `id`, `None` if unknown or never requested
    pub fn get(&self, id: &AircraftId) -> Option<&GeoPoint> {
        self.positions.get(id).and_then(Option::as_ref)
    }

    /// Whether `id` was part of the request
    pub fn contains(&self, id: &AircraftId) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn known_count(&self) -> usize {
        self.positions.values().filter(|pos| pos.is_some()).count()
    }

    /// Requested ids the provider did not report
    pub fn unknown_ids(&self) -> Vec<&AircraftId> {
        let mut unknown: Vec<&AircraftId> = self
            .positions
            .iter()
            .filter(|(_, pos)| pos.is_none())
            .map(|(id, _)| id)
            .collect();
        unknown.sort();
        unknown
    }

    /// Entries sorted by id
    pub fn entries(&self) -> Vec<(&AircraftId, Option<&GeoPoint>)> {
        let mut entries: Vec<_> = self
            .positions
            .iter()
            .map(|(id, pos)| (id, pos.as_ref()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Labeled matrix of distances in metres.
///
/// Rows follow the "from" ids and columns the "to" ids exactly as given,
/// duplicates included. `None` cells involve an unknown aircraft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeparationMatrix {
    measure: Measure,
    rows: Vec<AircraftId>,
    columns: Vec<AircraftId>,
    values: Vec<Vec<Option<f64>>>,
}

impl SeparationMatrix {
    pub fn measure(&self) -> Measure {
        self.measure
    }

    pub fn rows(&self) -> &[AircraftId] {
        &self.rows
    }

    pub fn columns(&self) -> &[AircraftId] {
        &self.columns
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Cell at `(row, column)`; `None` when out of bounds or missing
    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(column)).copied().flatten()
    }

    pub fn row_values(&self, row: usize) -> Option<&[Option<f64>]> {
        self.values.get(row).map(Vec::as_slice)
    }

    /// Cell for the first row labeled `from` and first column labeled `to`
    pub fn get(&self, from: &AircraftId, to: &AircraftId) -> Option<f64> {
        let row = self.rows.iter().position(|id| id == from)?;
        let column = self.columns.iter().position(|id| id == to)?;
        self.value(row, column)
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().flatten().filter(|v| v.is_none()).count()
    }
}

/// Computes separation matrices from a position provider.
///
/// Stateless between calls; every query makes exactly one provider request.
pub struct SeparationEngine<P: PositionProvider> {
    provider: P,
    min_id_length: usize,
}

impl<P: PositionProvider> SeparationEngine<P> {
    /// Engine accepting any non-empty id
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            min_id_length: 1,
        }
    }

    /// Apply the simulator's callsign policy to every id
    pub fn with_simulator(mut self, simulator: Simulator) -> Self {
        self.min_id_length = simulator.min_id_length();
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Positions for the union of `from_ids` and `to_ids`, altitude in metres
    pub fn get_position_table<S: AsRef<str>, T: AsRef<str>>(
        &self,
        from_ids: &[S],
        to_ids: &[T],
    ) -> SeparationResult<PositionTable> {
        let from = validate_id_list(from_ids, self.min_id_length)?;
        let to = validate_id_list(to_ids, self.min_id_length)?;
        self.fetch_table(&from, &to)
    }

    fn fetch_table(&self, from: &[AircraftId], to: &[AircraftId]) -> SeparationResult<PositionTable> {
        let mut seen = HashSet::new();
        let union: Vec<AircraftId> = from
            .iter()
            .chain(to.iter())
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect();

        debug!(aircraft = union.len(), "Fetching positions");
        let mut reported = self.provider.fetch_positions(&union)?;

        let positions: HashMap<AircraftId, Option<GeoPoint>> = union
            .into_iter()
            .map(|id| {
                let point = reported.remove(&id).map(|raw| GeoPoint {
                    latitude: raw.latitude,
                    longitude: raw.longitude,
                    altitude: raw.altitude_ft * FEET_TO_METRES,
                });
                (id, point)
            })
            .collect();

        let table = PositionTable { positions };
        let unknown = table.unknown_ids();
        if !unknown.is_empty() {
            warn!(unknown = ?unknown, "Aircraft not reported by position provider");
        }
        Ok(table)
    }

    /// Separation matrix between `from_ids` and `to_ids` under `measure`.
    ///
    /// Without `to_ids` the matrix is `from_ids` against itself. For the
    /// geodesic measure `radius` is the ellipsoid's major semiaxis.
    pub fn get_separation(
        &self,
        from_ids: impl Into<IdList>,
        to_ids: Option<IdList>,
        measure: Measure,
        radius: f64,
        flattening: f64,
    ) -> SeparationResult<SeparationMatrix> {
        let from_ids = from_ids.into();
        let to_ids = to_ids.unwrap_or_else(|| from_ids.clone());

        let rows = validate_id_list(from_ids.as_slice(), self.min_id_length)?;
        let columns = validate_id_list(to_ids.as_slice(), self.min_id_length)?;
        if measure.uses_radius() {
            validate_positive(radius, "radius")?;
        }
        if measure.uses_flattening() {
            validate_positive(flattening, "flattening")?;
        }

        let table = self.fetch_table(&rows, &columns)?;
        let geodesic = (measure == Measure::Geodesic).then(|| Geodesic::new(radius, flattening));
        let distance = |a: &GeoPoint, b: &GeoPoint| match &geodesic {
            Some(geodesic) => geodesic_distance_on(geodesic, a.latitude, a.longitude, b.latitude, b.longitude),
            None => get_distance(a, b, measure, radius, flattening),
        };

        let values = rows
            .iter()
            .map(|from| {
                columns
                    .iter()
                    .map(|to| match (table.get(from), table.get(to)) {
                        (Some(a), Some(b)) => distance(a, b).map(Some),
                        _ => Ok(None),
                    })
                    .collect::<SeparationResult<Vec<_>>>()
            })
            .collect::<SeparationResult<Vec<_>>>()?;

        debug!(
            measure = %measure,
            rows = rows.len(),
            columns = columns.len(),
            "Separation computed"
        );

        Ok(SeparationMatrix {
            measure,
            rows,
            columns,
            values,
        })
    }

    pub fn geodesic_separation(
        &self,
        from_ids: impl Into<IdList>,
        to_ids: Option<IdList>,
        major_semiaxis: f64,
        flattening: f64,
    ) -> SeparationResult<SeparationMatrix> {
        self.get_separation(from_ids, to_ids, Measure::Geodesic, major_semiaxis, flattening)
    }

    pub fn great_circle_separation(
        &self,
        from_ids: impl Into<IdList>,
        to_ids: Option<IdList>,
        radius: f64,
    ) -> SeparationResult<SeparationMatrix> {
        self.get_separation(from_ids, to_ids, Measure::GreatCircle, radius, EllipsoidParameters::wgs84().flattening())
    }

    pub fn vertical_separation(
        &self,
        from_ids: impl Into<IdList>,
        to_ids: Option<IdList>,
    ) -> SeparationResult<SeparationMatrix> {
        let wgs84 = EllipsoidParameters::wgs84();
        self.get_separation(from_ids, to_ids, Measure::Vertical, wgs84.major_semiaxis(), wgs84.flattening())
    }

    pub fn euclidean_separation(
        &self,
        from_ids: impl Into<IdList>,
        to_ids: Option<IdList>,
        radius: f64,
    ) -> SeparationResult<SeparationMatrix> {
        self.get_separation(from_ids, to_ids, Measure::Euclidean, radius, EllipsoidParameters::wgs84().flattening())
    }

    /// [`get_separation`](Self::get_separation) with radius and flattening
    /// taken from `ellipsoid`
    pub fn separation_on(
        &self,
        from_ids: impl Into<IdList>,
        to_ids: Option<IdList>,
        measure: Measure,
        ellipsoid: &EllipsoidParameters,
    ) -> SeparationResult<SeparationMatrix> {
        self.get_separation(from_ids, to_ids, measure, ellipsoid.major_semiaxis(), ellipsoid.flattening())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{EARTH_RADIUS, WGS84_FLATTENING};
    use crate::provider::{CommError, MockPositionProvider};
    use approx::assert_relative_eq;

    fn id(s: &str) -> AircraftId {
        AircraftId::new(s).unwrap()
    }

    fn provider() -> MockPositionProvider {
        MockPositionProvider::new()
            .with_aircraft("A1", 0.0, 0.0, 10000.0)
            .with_aircraft("A2", 0.0, 1.0, 20000.0)
            .with_aircraft("A3", 1.0, 0.0, 0.0)
    }

    #[test]
    fn test_measure_parsing() {
        assert_eq!("geodesic".parse::<Measure>().unwrap(), Measure::Geodesic);
        assert_eq!("great_circle".parse::<Measure>().unwrap(), Measure::GreatCircle);
        assert_eq!("vertical".parse::<Measure>().unwrap(), Measure::Vertical);
        assert_eq!("euclidean".parse::<Measure>().unwrap(), Measure::Euclidean);

        let err = "manhattan".parse::<Measure>().unwrap_err();
        assert_eq!(err.parameter(), Some("measure"));

        for measure in Measure::ALL {
            assert_eq!(measure.to_string().parse::<Measure>().unwrap(), measure);
        }
    }

    #[test]
    fn test_get_distance_dispatch() {
        let a = GeoPoint::new(0.0, 0.0, 100.0).unwrap();
        let b = GeoPoint::new(0.0, 1.0, 150.0).unwrap();

        let geodesic = get_distance(&a, &b, Measure::Geodesic, EARTH_RADIUS, WGS84_FLATTENING).unwrap();
        assert_relative_eq!(geodesic, 111_319.490_793, epsilon = 1e-3);

        let great_circle = get_distance(&a, &b, Measure::GreatCircle, EARTH_RADIUS, WGS84_FLATTENING).unwrap();
        assert_relative_eq!(great_circle, EARTH_RADIUS * 1f64.to_radians(), max_relative = 1e-12);

        assert_eq!(get_distance(&a, &b, Measure::Vertical, EARTH_RADIUS, WGS84_FLATTENING).unwrap(), 50.0);

        let euclidean = get_distance(&a, &b, Measure::Euclidean, EARTH_RADIUS, WGS84_FLATTENING).unwrap();
        assert_relative_eq!(euclidean, 111_320.270_75, epsilon = 1e-3);
    }

    #[test]
    fn test_position_table_is_union_with_feet_converted() {
        let engine = SeparationEngine::new(provider());
        let table = engine.get_position_table(&["A1", "A2", "A1"], &["a2", "GHOST"]).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.known_count(), 2);
        assert!(table.contains(&id("GHOST")));
        assert!(table.get(&id("GHOST")).is_none());
        assert_eq!(table.unknown_ids(), vec![&id("GHOST")]);
        assert_relative_eq!(table.get(&id("A1")).unwrap().altitude, 3048.0, epsilon = 1e-9);

        // one batched request containing each id once
        let requests = engine.provider().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0], vec![id("A1"), id("A2"), id("GHOST")]);
    }

    #[test]
    fn test_position_table_rejects_empty_lists() {
        let engine = SeparationEngine::new(provider());
        let empty: [&str; 0] = [];
        assert!(engine.get_position_table(&empty, &["A1"]).is_err());
        assert!(engine.get_position_table(&["A1"], &empty).is_err());
        assert_eq!(engine.provider().request_count(), 0);
    }

    #[test]
    fn test_vertical_self_separation_is_symmetric() {
        let engine = SeparationEngine::new(provider());
        let matrix = engine.vertical_separation(["A1", "A2"], None).unwrap();

        assert_eq!(matrix.shape(), (2, 2));
        assert_eq!(matrix.measure(), Measure::Vertical);
        assert_eq!(matrix.value(0, 0), Some(0.0));
        assert_eq!(matrix.value(1, 1), Some(0.0));
        assert_eq!(matrix.value(0, 1), matrix.value(1, 0));
        // 10000 ft apart
        assert_relative_eq!(matrix.value(0, 1).unwrap(), 3048.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_aircraft_yield_missing_cells() {
        let engine = SeparationEngine::new(provider());
        let matrix = engine
            .geodesic_separation(["A1", "GHOST"], Some(["GHOST", "A2"].into()), EARTH_RADIUS, WGS84_FLATTENING)
            .unwrap();

        assert_eq!(matrix.value(0, 0), None);
        assert_eq!(matrix.value(1, 0), None);
        assert_eq!(matrix.value(1, 1), None);
        assert!(matrix.value(0, 1).is_some());
        assert_eq!(matrix.missing_count(), 3);
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let engine = SeparationEngine::new(provider());
        let matrix = engine
            .great_circle_separation(vec!["A3", "A1", "A3"], Some(vec!["A2", "A2", "A1"].into()), EARTH_RADIUS)
            .unwrap();

        let rows: Vec<&str> = matrix.rows().iter().map(AircraftId::as_str).collect();
        let columns: Vec<&str> = matrix.columns().iter().map(AircraftId::as_str).collect();
        assert_eq!(rows, vec!["A3", "A1", "A3"]);
        assert_eq!(columns, vec!["A2", "A2", "A1"]);
        assert_eq!(matrix.row_values(0), matrix.row_values(2));
        assert_eq!(matrix.value(1, 2), Some(0.0));
        assert_eq!(engine.provider().request_count(), 1);
    }

    #[test]
    fn test_scalar_ids_are_coerced() {
        let engine = SeparationEngine::new(provider());
        let matrix = engine
            .euclidean_separation("A1", Some("A2".into()), EARTH_RADIUS)
            .unwrap();
        assert_eq!(matrix.shape(), (1, 1));
        assert!(matrix.get(&id("A1"), &id("A2")).unwrap() > 0.0);
    }

    #[test]
    fn test_invalid_input_fails_before_fetch() {
        let engine = SeparationEngine::new(provider());

        assert!(engine.great_circle_separation(["A1"], None, 0.0).unwrap_err().is_invalid_argument());
        assert!(engine
            .geodesic_separation(["A1"], None, EARTH_RADIUS, -0.1)
            .unwrap_err()
            .is_invalid_argument());
        assert!(engine.vertical_separation(["A1", ""], None).is_err());
        assert!(engine.vertical_separation(Vec::<String>::new(), None).is_err());

        assert_eq!(engine.provider().request_count(), 0);
    }

    #[test]
    fn test_parameters_checked_only_where_read() {
        let engine = SeparationEngine::new(provider());

        let vertical = engine
            .get_separation(["A1", "A2"], None, Measure::Vertical, -1.0, -1.0)
            .unwrap();
        assert_relative_eq!(vertical.value(0, 1).unwrap(), 3048.0, epsilon = 1e-9);

        assert!(engine
            .get_separation(["A1"], None, Measure::GreatCircle, EARTH_RADIUS, -1.0)
            .is_ok());
        assert!(engine
            .get_separation(["A1"], None, Measure::Euclidean, 0.0, WGS84_FLATTENING)
            .unwrap_err()
            .is_invalid_argument());
        assert!(engine
            .get_separation(["A1"], None, Measure::Geodesic, EARTH_RADIUS, 0.0)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_geodesic_matrix_matches_pairwise_distance() {
        let engine = SeparationEngine::new(provider());
        let matrix = engine
            .geodesic_separation(["A1", "A2", "A3"], None, EARTH_RADIUS, WGS84_FLATTENING)
            .unwrap();

        let points = [
            GeoPoint::new(0.0, 0.0, 0.0).unwrap(),
            GeoPoint::new(0.0, 1.0, 0.0).unwrap(),
            GeoPoint::new(1.0, 0.0, 0.0).unwrap(),
        ];
        for (r, from) in points.iter().enumerate() {
            for (c, to) in points.iter().enumerate() {
                let expected = get_distance(from, to, Measure::Geodesic, EARTH_RADIUS, WGS84_FLATTENING).unwrap();
                assert_eq!(matrix.value(r, c), Some(expected));
            }
        }
    }

    #[test]
    fn test_simulator_id_policy() {
        let engine = SeparationEngine::new(provider()).with_simulator(Simulator::BlueSky);
        assert!(engine.vertical_separation(["A1"], None).is_err());

        let engine = SeparationEngine::new(provider()).with_simulator(Simulator::MachColl);
        assert!(engine.vertical_separation(["A1"], None).is_ok());
    }

    #[test]
    fn test_provider_failure_aborts() {
        let mut provider = provider();
        provider.fail_with(CommError::HttpStatus {
            status: 503,
            url: "http://localhost:5001/api/v2/pos".to_string(),
        });
        let engine = SeparationEngine::new(provider);

        let err = engine.vertical_separation(["A1", "A2"], None).unwrap_err();
        assert!(matches!(err, SeparationError::Communication(CommError::HttpStatus { status: 503, .. })));
    }

    #[test]
    fn test_separation_on_ellipsoid() {
        let engine = SeparationEngine::new(provider());
        let sphere = EllipsoidParameters::new(1000.0, WGS84_FLATTENING).unwrap();
        let matrix = engine
            .separation_on(["A1"], Some(["A2"].into()), Measure::GreatCircle, &sphere)
            .unwrap();
        assert_relative_eq!(matrix.value(0, 0).unwrap(), 1000.0 * 1f64.to_radians(), max_relative = 1e-12);
    }

    #[test]
    fn test_identical_queries_are_idempotent() {
        let engine = SeparationEngine::new(provider());
        let first = engine.vertical_separation(["A1", "A2", "A3"], None).unwrap();
        let second = engine.vertical_separation(["A1", "A2", "A3"], None).unwrap();
        assert_eq!(first, second);
    }
}
