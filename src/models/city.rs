// SPDX-License-Identifier: MIT

//! City coordinate records for map centering and nearest-city lookup.

use geo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// City pinned to the top of the city list.
pub const FEATURED_CITY: &str = "Spokane WA";

/// Latitude/longitude pair as stored in Firestore city documents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Untrusted city document; documents missing either field are skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCity {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub coordinates: Option<LatLng>,
}

/// In-memory directory of supported cities.
///
/// Coordinates live in a `BTreeMap` so iteration order is lexicographic,
/// which makes nearest-city tie-breaking deterministic (alphabetical).
#[derive(Debug, Clone, Default)]
pub struct CityDirectory {
    coordinates: BTreeMap<String, Point<f64>>,
    names: Vec<String>,
}

impl CityDirectory {
    /// Build the directory from raw documents, skipping incomplete ones.
    /// The display list sorts the featured city first, then alphabetical.
    pub fn from_docs(docs: Vec<RawCity>) -> Self {
        let mut coordinates = BTreeMap::new();

        for doc in docs {
            if let (Some(city), Some(coords)) = (doc.city, doc.coordinates) {
                coordinates.insert(city, Point::new(coords.lng, coords.lat));
            }
        }

        let mut names: Vec<String> = coordinates.keys().cloned().collect();
        names.sort_by(|a, b| {
            if a == FEATURED_CITY {
                std::cmp::Ordering::Less
            } else if b == FEATURED_CITY {
                std::cmp::Ordering::Greater
            } else {
                a.cmp(b)
            }
        });

        Self { coordinates, names }
    }

    /// City name → point (x = longitude, y = latitude).
    pub fn coordinates(&self) -> &BTreeMap<String, Point<f64>> {
        &self.coordinates
    }

    /// Display ordering: featured city first, then alphabetical.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, name: &str) -> Option<Point<f64>> {
        self.coordinates.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(city: &str, lat: f64, lng: f64) -> RawCity {
        RawCity {
            city: Some(city.to_string()),
            coordinates: Some(LatLng { lat, lng }),
        }
    }

    #[test]
    fn test_featured_city_sorts_first() {
        let directory = CityDirectory::from_docs(vec![
            doc("Boise ID", 43.6, -116.2),
            doc("Spokane WA", 47.66, -117.43),
            doc("Austin TX", 30.27, -97.74),
        ]);

        assert_eq!(
            directory.names(),
            &["Spokane WA", "Austin TX", "Boise ID"]
        );
    }

    #[test]
    fn test_incomplete_docs_are_skipped() {
        let directory = CityDirectory::from_docs(vec![
            RawCity {
                city: Some("No Coords".to_string()),
                coordinates: None,
            },
            RawCity {
                city: None,
                coordinates: Some(LatLng { lat: 1.0, lng: 2.0 }),
            },
            doc("Spokane WA", 47.66, -117.43),
        ]);

        assert_eq!(directory.names(), &["Spokane WA"]);
        assert!(directory.get("No Coords").is_none());
    }
}
