// solver.rs
// Wire types for the external route-solver's response. The solver itself is a
// black box reached elsewhere; this crate only consumes the result record it
// returns and never issues the request that produces it.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::ReplayError;
use crate::geo::VehiclePath;

/// One recorded solver state: iteration number, cost of the current best
/// candidate, the annealing temperature when the algorithm has one, and the
/// candidate visiting order as location indices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub iteration: u64,
    pub cost: f64,
    // No skip_serializing_if here: bincode cannot round-trip a field that is
    // sometimes absent, and sessions are saved in both JSON and bincode.
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub route: SmallVec<[u32; 16]>,
}

/// One stop of a vehicle's final route. Shapes vary across solver versions,
/// so everything is optional-with-default rather than strict.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationStop {
    pub name: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub demand: Option<f64>,
}

/// The complete solver response. The replay core reads `history`,
/// `vehicle_paths`, `vehicle_types` and `final_cost`; `vehicle_routes` feeds
/// the schedule summary only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverResult {
    pub history: Vec<HistorySnapshot>,
    pub vehicle_routes: Vec<Vec<LocationStop>>,
    /// Polyline geometry per vehicle, longitude-first on the wire.
    pub vehicle_paths: Vec<Vec<[f64; 2]>>,
    pub vehicle_types: Vec<String>,
    pub total_vehicles: u32,
    pub final_cost: f64,
}

impl SolverResult {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ReplayError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReplayError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ReplayError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// The path geometry converted to lat-first runtime form, one entry per
    /// vehicle, index-aligned with `vehicle_types`.
    pub fn paths(&self) -> Vec<VehiclePath> {
        self.vehicle_paths
            .iter()
            .map(|p| VehiclePath::from_lng_lat(p))
            .collect()
    }

    /// Per-vehicle stop listing with demand totals, the data behind a
    /// delivery schedule view.
    pub fn schedule(&self) -> Vec<VehicleSchedule> {
        self.vehicle_routes
            .iter()
            .enumerate()
            .map(|(i, stops)| VehicleSchedule {
                vehicle_type: self
                    .vehicle_types
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                total_demand: stops.iter().filter_map(|s| s.demand).sum(),
                stops: stops.clone(),
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleSchedule {
    pub vehicle_type: String,
    pub stops: Vec<LocationStop>,
    pub total_demand: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULT_JSON: &str = r#"{
        "history": [
            {"iteration": 0, "cost": 152.5, "temperature": 1000.0, "route": [0, 2, 1]},
            {"iteration": 10, "cost": 120.0, "temperature": 951.2, "route": [0, 1, 2]},
            {"iteration": 20, "cost": 118.4, "route": [0, 1, 2]}
        ],
        "vehicleRoutes": [
            [{"name": "Depot", "lat": -7.25, "lng": 112.75, "demand": 0},
             {"name": "Toko A", "lat": -7.26, "lng": 112.74, "demand": 12}]
        ],
        "vehiclePaths": [[[112.75, -7.25], [112.74, -7.26]]],
        "vehicleTypes": ["Motor"],
        "totalVehicles": 1,
        "finalCost": 118.4
    }"#;

    #[test]
    fn parses_camel_case_result() {
        let result = SolverResult::from_slice(RESULT_JSON.as_bytes()).unwrap();
        assert_eq!(result.history.len(), 3);
        assert_eq!(result.history[0].temperature, Some(1000.0));
        assert_eq!(
            result.history[2].temperature, None,
            "tabu search omits temperature"
        );
        assert_eq!(result.history[1].route.as_slice(), &[0, 1, 2]);
        assert_eq!(result.total_vehicles, 1);
        assert_eq!(result.final_cost, 118.4);
    }

    #[test]
    fn paths_are_swapped_to_lat_first() {
        let result = SolverResult::from_slice(RESULT_JSON.as_bytes()).unwrap();
        let paths = result.paths();
        assert_eq!(paths.len(), 1);
        let first = paths[0].point(0).unwrap();
        assert_eq!(first.lat, -7.25);
        assert_eq!(first.lng, 112.75);
    }

    #[test]
    fn schedule_totals_demand_per_vehicle() {
        let result = SolverResult::from_slice(RESULT_JSON.as_bytes()).unwrap();
        let schedule = result.schedule();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].vehicle_type, "Motor");
        assert_eq!(schedule[0].total_demand, 12.0);
        assert_eq!(schedule[0].stops.len(), 2);
    }

    #[test]
    fn missing_sections_default_instead_of_failing() {
        let result = SolverResult::from_slice(br#"{"finalCost": 10.0}"#).unwrap();
        assert!(result.history.is_empty());
        assert!(result.vehicle_paths.is_empty());
        assert_eq!(result.final_cost, 10.0);
    }
}
