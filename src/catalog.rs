//! Compiled-in city catalog.
//!
//! Three cities carry bespoke 3D model data (bounding box, landmark and
//! building meshes). A location is matched first by bounding-box
//! containment, then by case-insensitive substring match against the
//! query text. Everything else renders with the generic city model.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.south && lat <= self.north && lng >= self.west && lng <= self.east
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Landmark {
    pub name: &'static str,
    pub kind: &'static str,
    pub x: f64,
    pub z: f64,
    pub height: f64,
    pub width: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Building {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub x: f64,
    pub z: f64,
    pub style: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CityModel {
    pub key: &'static str,
    pub name: &'static str,
    pub bounds: Bounds,
    pub landmarks: &'static [Landmark],
    pub buildings: &'static [Building],
}

pub const CITY_MODELS: [CityModel; 3] = [
    CityModel {
        key: "paris",
        name: "Paris",
        bounds: Bounds {
            north: 48.9022,
            south: 48.8156,
            east: 2.4699,
            west: 2.2241,
        },
        landmarks: &[Landmark {
            name: "Tour Eiffel",
            kind: "eiffel_tower",
            x: 0.0,
            z: 0.0,
            height: 324.0,
            width: 125.0,
            depth: 125.0,
        }],
        buildings: &[
            Building {
                width: 15.0,
                height: 35.0,
                depth: 20.0,
                x: -80.0,
                z: -60.0,
                style: "haussmann",
            },
            Building {
                width: 12.0,
                height: 30.0,
                depth: 18.0,
                x: -60.0,
                z: -40.0,
                style: "haussmann",
            },
            Building {
                width: 18.0,
                height: 25.0,
                depth: 15.0,
                x: -40.0,
                z: -80.0,
                style: "haussmann",
            },
        ],
    },
    CityModel {
        key: "new york",
        name: "New York",
        bounds: Bounds {
            north: 40.8176,
            south: 40.6829,
            east: -73.9442,
            west: -74.0479,
        },
        landmarks: &[Landmark {
            name: "Empire State Building",
            kind: "empire_state",
            x: 0.0,
            z: 0.0,
            height: 443.0,
            width: 129.0,
            depth: 61.0,
        }],
        buildings: &[
            Building {
                width: 40.0,
                height: 300.0,
                depth: 40.0,
                x: -60.0,
                z: -40.0,
                style: "skyscraper",
            },
            Building {
                width: 35.0,
                height: 250.0,
                depth: 35.0,
                x: -30.0,
                z: 30.0,
                style: "skyscraper",
            },
        ],
    },
    CityModel {
        key: "london",
        name: "London",
        bounds: Bounds {
            north: 51.6723,
            south: 51.3588,
            east: 0.1785,
            west: -0.3514,
        },
        landmarks: &[Landmark {
            name: "Big Ben",
            kind: "big_ben",
            x: 0.0,
            z: 0.0,
            height: 96.0,
            width: 12.0,
            depth: 12.0,
        }],
        buildings: &[
            Building {
                width: 20.0,
                height: 45.0,
                depth: 30.0,
                x: -70.0,
                z: -50.0,
                style: "victorian",
            },
            Building {
                width: 25.0,
                height: 50.0,
                depth: 20.0,
                x: -50.0,
                z: 60.0,
                style: "victorian",
            },
        ],
    },
];

pub fn find_by_point(lat: f64, lng: f64) -> Option<&'static CityModel> {
    CITY_MODELS.iter().find(|city| city.bounds.contains(lat, lng))
}

pub fn find_by_name(query: &str) -> Option<&'static CityModel> {
    let query = query.to_lowercase();
    CITY_MODELS
        .iter()
        .find(|city| query.contains(city.key) || query.contains(&city.name.to_lowercase()))
}

/// Bounding-box containment first, then name substring match.
pub fn detect(lat: f64, lng: f64, query: &str) -> Option<&'static CityModel> {
    find_by_point(lat, lng).or_else(|| find_by_name(query))
}
