//! Tour route and progress.
//!
//! The route is the fixed polyline drawn on the map; it is display data and
//! plays no part in arrival detection. [`TourProgress`] follows enter events
//! to answer "which stop are we at".

mod progress;

pub use progress::TourProgress;

use crate::geo::{distance_meters, initial_bearing_degrees, Coordinate};

/// The Amsterdam canal loop as `(longitude, latitude)` vertices.
const AMSTERDAM_CANAL_TOUR: [(f64, f64); 12] = [
    (4.887611835704689, 52.37964142905949),
    (4.883177010693288, 52.37489809419134),
    (4.882443981766414, 52.36664079139621),
    (4.882883799122766, 52.36608129770255),
    (4.884899628673111, 52.36686458688985),
    (4.884533114209091, 52.367312174475444),
    (4.884826325780779, 52.371317881447936),
    (4.885119537351244, 52.374495334746),
    (4.887941698723154, 52.377560689228176),
    (4.889847573934361, 52.37975329401476),
    (4.888491470418558, 52.38040210516846),
    (4.887575184259134, 52.37961905603416),
];

/// A polyline of waypoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    waypoints: Vec<Coordinate>,
}

impl Route {
    /// Create a route from waypoints in travel order.
    pub fn new(waypoints: Vec<Coordinate>) -> Self {
        Self { waypoints }
    }

    /// The classic Amsterdam canal tour loop.
    pub fn amsterdam_canal_tour() -> Self {
        Self::new(
            AMSTERDAM_CANAL_TOUR
                .iter()
                .map(|&(lon, lat)| Coordinate::new(lat, lon))
                .collect(),
        )
    }

    /// Waypoints in travel order.
    pub fn waypoints(&self) -> &[Coordinate] {
        &self.waypoints
    }

    /// Total length in meters.
    pub fn length_meters(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|w| distance_meters(&w[0], &w[1]))
            .sum()
    }

    /// Closest waypoint to a coordinate, as `(index, distance_meters)`.
    pub fn nearest_waypoint(&self, coord: &Coordinate) -> Option<(usize, f64)> {
        self.waypoints
            .iter()
            .enumerate()
            .map(|(i, wp)| (i, distance_meters(wp, coord)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Initial bearing of each leg in degrees.
    pub fn leg_bearings(&self) -> Vec<f64> {
        self.waypoints
            .windows(2)
            .map(|w| initial_bearing_degrees(&w[0], &w[1]))
            .collect()
    }

    /// Points spaced at most `step_meters` apart along the route.
    ///
    /// Includes every waypoint. Legs are interpolated linearly in degrees,
    /// which is accurate enough at city scale.
    pub fn densify(&self, step_meters: f64) -> Vec<Coordinate> {
        let Some(first) = self.waypoints.first() else {
            return Vec::new();
        };
        if !(step_meters.is_finite() && step_meters > 0.0) {
            return self.waypoints.clone();
        }

        let mut points = vec![*first];
        for leg in self.waypoints.windows(2) {
            let (a, b) = (leg[0], leg[1]);
            let steps = (distance_meters(&a, &b) / step_meters).ceil().max(1.0) as usize;
            for i in 1..=steps {
                let t = i as f64 / steps as f64;
                points.push(Coordinate::new(
                    a.latitude + (b.latitude - a.latitude) * t,
                    a.longitude + (b.longitude - a.longitude) * t,
                ));
            }
        }
        points
    }
}
