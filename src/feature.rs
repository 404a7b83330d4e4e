//! Map feature model: tagged categories, display flags and query results

use crate::geom::{WorldPosition, manhattan_distance};
use crate::sources::Projector;
use geo::Rect;
use std::collections::HashSet;

/// Stable identifier assigned by the navigation data source
pub type FeatureId = i32;

bitflags::bitflags! {
    /// Feature categories currently enabled for display and picking
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ShownFeatures: u32 {
        const AIRPORT = 1 << 0;
        const VOR = 1 << 1;
        const NDB = 1 << 2;
        const WAYPOINT = 1 << 3;
        const AIRWAY_VICTOR = 1 << 4;
        const AIRWAY_JET = 1 << 5;
        const ROUTE = 1 << 6;

        const AIRWAYS = Self::AIRWAY_VICTOR.bits() | Self::AIRWAY_JET.bits();
        const POINT_FEATURES = Self::AIRPORT.bits()
            | Self::VOR.bits()
            | Self::NDB.bits()
            | Self::WAYPOINT.bits();
    }
}

/// Common accessors shared by all point-feature categories
pub trait MapFeature {
    fn id(&self) -> FeatureId;
    fn position(&self) -> WorldPosition;
}

/// Airport detail attributes, present only once the feature is fully hydrated
#[derive(Clone, Debug, PartialEq)]
pub struct AirportFacts {
    pub name: String,
    pub has_tower: bool,
    pub empty: bool,
    pub water_only: bool,
}

/// An airport. Identity fields are always present; `facts` may be missing for
/// results coming from sources that only know the ident and position (e.g. the
/// flight plan) until the completion pass fills them in.
#[derive(Clone, Debug, PartialEq)]
pub struct Airport {
    pub id: FeatureId,
    pub ident: String,
    pub position: WorldPosition,
    pub facts: Option<AirportFacts>,
}

impl Airport {
    pub fn is_complete(&self) -> bool {
        self.facts.is_some()
    }
}

impl MapFeature for Airport {
    fn id(&self) -> FeatureId {
        self.id
    }

    fn position(&self) -> WorldPosition {
        self.position
    }
}

/// VHF omnidirectional range station
#[derive(Clone, Debug, PartialEq)]
pub struct Vor {
    pub id: FeatureId,
    pub ident: String,
    pub position: WorldPosition,
    pub frequency_khz: u32,
}

impl MapFeature for Vor {
    fn id(&self) -> FeatureId {
        self.id
    }

    fn position(&self) -> WorldPosition {
        self.position
    }
}

/// Non-directional beacon
#[derive(Clone, Debug, PartialEq)]
pub struct Ndb {
    pub id: FeatureId,
    pub ident: String,
    pub position: WorldPosition,
    pub frequency_khz: u32,
}

impl MapFeature for Ndb {
    fn id(&self) -> FeatureId {
        self.id
    }

    fn position(&self) -> WorldPosition {
        self.position
    }
}

/// Named en-route fix
#[derive(Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub id: FeatureId,
    pub ident: String,
    pub position: WorldPosition,
}

impl MapFeature for Waypoint {
    fn id(&self) -> FeatureId {
        self.id
    }

    fn position(&self) -> WorldPosition {
        self.position
    }
}

/// Airway classification: low-altitude victor, high-altitude jet, or both
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AirwayKind {
    Victor,
    Jet,
    Both,
}

/// An airway segment between two fixes, with a precomputed lat/lon bounding
/// rectangle (x = longitude, y = latitude degrees) for viewport filtering
#[derive(Clone, Debug, PartialEq)]
pub struct Airway {
    pub id: FeatureId,
    pub name: String,
    pub kind: AirwayKind,
    pub from: WorldPosition,
    pub to: WorldPosition,
    pub bounding: Rect<f64>,
}

/// Aggregate result of a nearest-feature query, one ordered sequence per
/// category plus parallel id sets so merge steps never insert a duplicate.
/// Built per query and discarded by the caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapSearchResult {
    pub airports: Vec<Airport>,
    pub airport_ids: HashSet<FeatureId>,

    pub vors: Vec<Vor>,
    pub vor_ids: HashSet<FeatureId>,

    pub ndbs: Vec<Ndb>,
    pub ndb_ids: HashSet<FeatureId>,

    pub waypoints: Vec<Waypoint>,
    pub waypoint_ids: HashSet<FeatureId>,

    pub airways: Vec<Airway>,
    pub airway_ids: HashSet<FeatureId>,
}

impl MapSearchResult {
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
            && self.vors.is_empty()
            && self.ndbs.is_empty()
            && self.waypoints.is_empty()
            && self.airways.is_empty()
    }

    pub fn total(&self) -> usize {
        self.airports.len()
            + self.vors.len()
            + self.ndbs.len()
            + self.waypoints.len()
            + self.airways.len()
    }
}

/// Insert a feature into a category sequence keeping it ordered by screen
/// distance from the query point, nearest first. Features whose id is already
/// in the set are skipped.
pub(crate) fn insert_sorted_by_distance<T: MapFeature + Clone>(
    projector: &dyn Projector,
    list: &mut Vec<T>,
    ids: &mut HashSet<FeatureId>,
    x: i32,
    y: i32,
    feature: &T,
) {
    if !ids.insert(feature.id()) {
        return;
    }

    let screen_dist = |f: &T| {
        let (point, _) = projector.project(&f.position());
        manhattan_distance(point.x, point.y, x, y)
    };

    let dist = screen_dist(feature);
    let pos = list
        .iter()
        .position(|other| screen_dist(other) > dist)
        .unwrap_or(list.len());
    list.insert(pos, feature.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::ScreenPoint;

    /// Projects one pixel per hundredth of a degree, everything visible
    struct GridProjector;

    impl Projector for GridProjector {
        fn project(&self, pos: &WorldPosition) -> (ScreenPoint, bool) {
            (
                ScreenPoint::new((pos.lon * 100.0) as i32, (-pos.lat * 100.0) as i32),
                true,
            )
        }
    }

    fn waypoint(id: FeatureId, lat: f64, lon: f64) -> Waypoint {
        Waypoint {
            id,
            ident: format!("WP{id}"),
            position: WorldPosition::new(lat, lon),
        }
    }

    #[test]
    fn test_shown_features_composites() {
        assert!(ShownFeatures::AIRWAYS.contains(ShownFeatures::AIRWAY_JET));
        assert!(ShownFeatures::AIRWAYS.contains(ShownFeatures::AIRWAY_VICTOR));
        assert!(!ShownFeatures::AIRWAYS.contains(ShownFeatures::ROUTE));
        assert!(ShownFeatures::POINT_FEATURES.contains(ShownFeatures::NDB));
    }

    #[test]
    fn test_insert_sorted_orders_by_distance() {
        let projector = GridProjector;
        let mut list = Vec::new();
        let mut ids = HashSet::new();

        // Query point at origin; insert far, then near, then middle
        for wp in [
            waypoint(1, 0.0, 0.5),
            waypoint(2, 0.0, 0.01),
            waypoint(3, 0.0, 0.2),
        ] {
            insert_sorted_by_distance(&projector, &mut list, &mut ids, 0, 0, &wp);
        }

        let order: Vec<FeatureId> = list.iter().map(|w| w.id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn test_insert_sorted_skips_duplicates() {
        let projector = GridProjector;
        let mut list = Vec::new();
        let mut ids = HashSet::new();

        let wp = waypoint(7, 0.0, 0.1);
        insert_sorted_by_distance(&projector, &mut list, &mut ids, 0, 0, &wp);
        insert_sorted_by_distance(&projector, &mut list, &mut ids, 0, 0, &wp);

        assert_eq!(list.len(), 1);
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn test_airport_completeness() {
        let mut airport = Airport {
            id: 1,
            ident: "EDDF".to_string(),
            position: WorldPosition::new(50.0333, 8.5706),
            facts: None,
        };
        assert!(!airport.is_complete());

        airport.facts = Some(AirportFacts {
            name: "Frankfurt Main".to_string(),
            has_tower: true,
            empty: false,
            water_only: false,
        });
        assert!(airport.is_complete());
    }
}
