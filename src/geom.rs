//! World and screen geometry primitives

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, used for all great-circle math
pub const EARTH_RADIUS_M: f64 = 6371000.0;

/// Geographic position in WGS84 degrees with an optional altitude in feet
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPosition {
    pub lat: f64,
    pub lon: f64,
    pub altitude: Option<f32>,
}

impl WorldPosition {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            altitude: None,
        }
    }

    pub fn with_altitude(lat: f64, lon: f64, altitude: f32) -> Self {
        Self {
            lat,
            lon,
            altitude: Some(altitude),
        }
    }

    /// Great-circle distance to another position in meters (haversine)
    pub fn distance_meters(&self, other: &WorldPosition) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lon = (other.lon - self.lon).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }

    /// Interpolate along the great circle towards `other`.
    ///
    /// `fraction` is in `[0, 1]` where 0 is `self` and 1 is `other`. Coincident
    /// positions return `self` unchanged so callers never divide by zero.
    /// Altitude is linearly interpolated when both ends carry one.
    pub fn interpolate(&self, other: &WorldPosition, fraction: f64) -> WorldPosition {
        let angular = self.distance_meters(other) / EARTH_RADIUS_M;
        if angular < 1e-12 {
            return *self;
        }

        let sin_angular = angular.sin();
        let a = ((1.0 - fraction) * angular).sin() / sin_angular;
        let b = (fraction * angular).sin() / sin_angular;

        let lat1 = self.lat.to_radians();
        let lon1 = self.lon.to_radians();
        let lat2 = other.lat.to_radians();
        let lon2 = other.lon.to_radians();

        let x = a * lat1.cos() * lon1.cos() + b * lat2.cos() * lon2.cos();
        let y = a * lat1.cos() * lon1.sin() + b * lat2.cos() * lon2.sin();
        let z = a * lat1.sin() + b * lat2.sin();

        let lat = z.atan2((x * x + y * y).sqrt()).to_degrees();
        let lon = y.atan2(x).to_degrees();

        let altitude = match (self.altitude, other.altitude) {
            (Some(from), Some(to)) => Some(from + (to - from) * fraction as f32),
            _ => None,
        };

        WorldPosition { lat, lon, altitude }
    }

    /// Convert to a `geo` point with x = longitude and y = latitude degrees
    pub fn to_point(&self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

/// Integer pixel coordinates on the map widget
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A straight pixel-space chord between two screen points
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenLine {
    pub p1: ScreenPoint,
    pub p2: ScreenPoint,
}

impl ScreenLine {
    pub fn new(p1: ScreenPoint, p2: ScreenPoint) -> Self {
        Self { p1, p2 }
    }
}

/// Sum of absolute coordinate differences, the cheap proximity filter used for
/// point features at small radii
pub fn manhattan_distance(x1: i32, y1: i32, x2: i32, y2: i32) -> i32 {
    (x1 - x2).abs() + (y1 - y2).abs()
}

/// Distance from a point to a finite segment, capped at the endpoints.
///
/// The perpendicular foot is clamped to the segment, so points beyond either
/// end measure against the nearest endpoint instead of the infinite line.
pub fn distance_to_line(x: i32, y: i32, line: &ScreenLine) -> f32 {
    let (px, py) = (x as f32, y as f32);
    let (x1, y1) = (line.p1.x as f32, line.p1.y as f32);
    let (x2, y2) = (line.p2.x as f32, line.p2.y as f32);

    let dx = x2 - x1;
    let dy = y2 - y1;
    let len_sq = dx * dx + dy * dy;

    if len_sq <= f32::EPSILON {
        // Degenerate segment collapses to its first endpoint
        return ((px - x1).powi(2) + (py - y1).powi(2)).sqrt();
    }

    let t = (((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0);
    let fx = x1 + t * dx;
    let fy = y1 + t * dy;
    ((px - fx).powi(2) + (py - fy).powi(2)).sqrt()
}
