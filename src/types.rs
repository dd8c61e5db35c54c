//! Domain data model for capacitated trip planning.
//!
//! These types mirror the routing-request wire shape: a source point, a list
//! of destination stops each carrying a payload, and the driver/vehicle
//! limits the plan must respect.

use serde::{Deserialize, Serialize};

/// A geographic coordinate. Value-only, no identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// GeoJSON coordinate order: [lon, lat].
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// A delivery stop: where to go, how much it loads the vehicle, and which
/// position it held in the request's destination list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stop {
    pub point: Point,
    pub demand: f64,
    pub original_index: usize,
}

/// Travel mode selector, mapped to a routing-provider profile identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Car,
    Truck,
    Motorcycle,
    Bike,
    RoadBike,
    Foot,
}

impl TravelMode {
    /// Parse a request's vehicle type. Unknown values fall back to `Car`.
    pub fn from_vehicle_type(vehicle_type: &str) -> Self {
        match vehicle_type.trim().to_ascii_lowercase().as_str() {
            "truck" | "hgv" => TravelMode::Truck,
            "motorcycle" => TravelMode::Motorcycle,
            "bike" => TravelMode::Bike,
            "roadbike" => TravelMode::RoadBike,
            "foot" => TravelMode::Foot,
            _ => TravelMode::Car,
        }
    }

    /// The OpenRouteService profile identifier for this mode.
    pub fn ors_profile(&self) -> &'static str {
        match self {
            TravelMode::Car | TravelMode::Motorcycle => "driving-car",
            TravelMode::Truck => "driving-hgv",
            TravelMode::Bike => "cycling-regular",
            TravelMode::RoadBike => "cycling-road",
            TravelMode::Foot => "foot-walking",
        }
    }
}

/// Vehicle limits a plan must respect: cargo capacity and the maximum
/// round-trip distance (meters) of any single trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleProfile {
    pub mode: TravelMode,
    pub capacity: f64,
    pub max_trip_distance: f64,
}

/// One vehicle loop in visiting order. Stop indices refer to the distance
/// matrix (1-based over the request's destinations; the origin is row 0 and
/// is implicit at both ends of the trip).
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub stops: Vec<usize>,
    pub load: f64,
    /// Sum of outbound leg distances, excluding the final return to origin.
    pub planned_distance: f64,
}

/// A destination as it arrives on the wire: coordinate plus payload demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub payload: f64,
}

impl Destination {
    pub fn point(&self) -> Point {
        Point::new(self.lat, self.lon)
    }
}

/// Driver and vehicle details accompanying a routing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverDetails {
    pub driver_name: String,
    pub vehicle_type: String,
    pub vehicle_capacity: f64,
    pub maximum_distance: f64,
}

impl DriverDetails {
    pub fn vehicle_profile(&self) -> VehicleProfile {
        VehicleProfile {
            mode: TravelMode::from_vehicle_type(&self.vehicle_type),
            capacity: self.vehicle_capacity,
            max_trip_distance: self.maximum_distance,
        }
    }
}

/// A routing request: origin, destination stops, and driver context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub source_point: Point,
    pub destination_points: Vec<Destination>,
    pub driver_details: DriverDetails,
}

impl RouteRequest {
    /// Destinations as planner stops, preserving input order.
    pub fn stops(&self) -> Vec<Stop> {
        self.destination_points
            .iter()
            .enumerate()
            .map(|(i, dest)| Stop {
                point: dest.point(),
                demand: dest.payload,
                original_index: i,
            })
            .collect()
    }
}
