// SPDX-License-Identifier: MIT

//! Great-circle distance and nearest-city lookup.

use geo::Point;
use std::collections::BTreeMap;

/// Earth radius in kilometers for the haversine formula.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two (lat, lng) pairs in kilometers.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Name of the city closest to the given coordinates, or `None` when the
/// mapping is empty.
///
/// Only a strictly smaller distance replaces the current best, and the
/// map iterates in name order, so exact ties resolve alphabetically.
pub fn nearest_city(lat: f64, lng: f64, cities: &BTreeMap<String, Point<f64>>) -> Option<&str> {
    let mut closest: Option<(&str, f64)> = None;

    for (name, point) in cities {
        let distance = haversine_km(lat, lng, point.y(), point.x());
        match closest {
            Some((_, best)) if distance >= best => {}
            _ => closest = Some((name, distance)),
        }
    }

    closest.map(|(name, _)| name)
}
