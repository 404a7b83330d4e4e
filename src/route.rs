//! Flight route legs and the route's own nearest-point search.
//!
//! The route is owned by a routing component outside this crate. The index
//! never keeps a copy or a reference: callers borrow the current route into
//! each rebuild or query call, and the contents may change between calls.

use crate::feature::{Airport, MapSearchResult, Ndb, Vor, Waypoint, insert_sorted_by_distance};
use crate::geom::{WorldPosition, manhattan_distance};
use crate::sources::Projector;

/// The feature a route leg ends at
#[derive(Clone, Debug, PartialEq)]
pub enum LegFeature {
    Airport(Airport),
    Vor(Vor),
    Ndb(Ndb),
    Waypoint(Waypoint),
}

/// One leg of the flight plan
#[derive(Clone, Debug, PartialEq)]
pub struct RouteLeg {
    pub feature: LegFeature,
}

impl RouteLeg {
    pub fn new(feature: LegFeature) -> Self {
        Self { feature }
    }

    pub fn position(&self) -> WorldPosition {
        match &self.feature {
            LegFeature::Airport(airport) => airport.position,
            LegFeature::Vor(vor) => vor.position,
            LegFeature::Ndb(ndb) => ndb.position,
            LegFeature::Waypoint(waypoint) => waypoint.position,
        }
    }

    pub fn is_airport(&self) -> bool {
        matches!(self.feature, LegFeature::Airport(_))
    }
}

/// Ordered leg sequence of the current flight plan
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlightRoute {
    legs: Vec<RouteLeg>,
}

impl FlightRoute {
    pub fn new(legs: Vec<RouteLeg>) -> Self {
        Self { legs }
    }

    pub fn legs(&self) -> &[RouteLeg] {
        &self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Merge copies of legs within `radius` pixels of the query point into
    /// `result`, sorted by distance within their category. Airports coming
    /// from the plan carry no detail facts; the query engine's completion
    /// pass hydrates them afterwards.
    pub fn nearest(
        &self,
        projector: &dyn Projector,
        x: i32,
        y: i32,
        radius: i32,
        result: &mut MapSearchResult,
    ) {
        for leg in &self.legs {
            let (point, visible) = projector.project(&leg.position());
            if !visible || manhattan_distance(point.x, point.y, x, y) > radius {
                continue;
            }

            match &leg.feature {
                LegFeature::Airport(airport) => insert_sorted_by_distance(
                    projector,
                    &mut result.airports,
                    &mut result.airport_ids,
                    x,
                    y,
                    airport,
                ),
                LegFeature::Vor(vor) => insert_sorted_by_distance(
                    projector,
                    &mut result.vors,
                    &mut result.vor_ids,
                    x,
                    y,
                    vor,
                ),
                LegFeature::Ndb(ndb) => insert_sorted_by_distance(
                    projector,
                    &mut result.ndbs,
                    &mut result.ndb_ids,
                    x,
                    y,
                    ndb,
                ),
                LegFeature::Waypoint(waypoint) => insert_sorted_by_distance(
                    projector,
                    &mut result.waypoints,
                    &mut result.waypoint_ids,
                    x,
                    y,
                    waypoint,
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::ScreenPoint;

    struct GridProjector;

    impl Projector for GridProjector {
        fn project(&self, pos: &WorldPosition) -> (ScreenPoint, bool) {
            (
                ScreenPoint::new(
                    (pos.lon * 100.0).round() as i32,
                    (-pos.lat * 100.0).round() as i32,
                ),
                true,
            )
        }
    }

    fn airport_leg(id: i32, lat: f64, lon: f64) -> RouteLeg {
        RouteLeg::new(LegFeature::Airport(Airport {
            id,
            ident: format!("AP{id}"),
            position: WorldPosition::new(lat, lon),
            facts: None,
        }))
    }

    fn waypoint_leg(id: i32, lat: f64, lon: f64) -> RouteLeg {
        RouteLeg::new(LegFeature::Waypoint(Waypoint {
            id,
            ident: format!("WP{id}"),
            position: WorldPosition::new(lat, lon),
        }))
    }

    #[test]
    fn test_nearest_respects_radius() {
        let route = FlightRoute::new(vec![
            airport_leg(1, 0.0, 0.0),
            waypoint_leg(2, 0.0, 0.05),
            airport_leg(3, 0.0, 5.0),
        ]);

        let mut result = MapSearchResult::default();
        route.nearest(&GridProjector, 0, 0, 10, &mut result);

        // Leg 1 is at the query point, leg 2 is 5 px away, leg 3 is 500 px away
        assert_eq!(result.airports.len(), 1);
        assert_eq!(result.airports[0].id, 1);
        assert_eq!(result.waypoints.len(), 1);
        assert_eq!(result.waypoints[0].id, 2);
    }

    #[test]
    fn test_nearest_does_not_duplicate() {
        // Out-and-back plan visits the same airport twice
        let route = FlightRoute::new(vec![
            airport_leg(1, 0.0, 0.0),
            waypoint_leg(2, 0.0, 0.05),
            airport_leg(1, 0.0, 0.0),
        ]);

        let mut result = MapSearchResult::default();
        route.nearest(&GridProjector, 0, 0, 20, &mut result);

        assert_eq!(result.airports.len(), 1);
    }

    #[test]
    fn test_route_airports_are_not_hydrated() {
        let route = FlightRoute::new(vec![airport_leg(1, 0.0, 0.0)]);

        let mut result = MapSearchResult::default();
        route.nearest(&GridProjector, 0, 0, 5, &mut result);

        assert!(!result.airports[0].is_complete());
    }
}
