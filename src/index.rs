//! Screen-space spatial index and nearest-feature query engine.
//!
//! `ScreenIndex` keeps per-category caches of tessellated screen geometry for
//! path features (airways and flight plan legs), the current highlight set,
//! and user-created range/distance markers. Caches are rebuilt wholesale on
//! every viewport change and queried synchronously on pointer events; nothing
//! here blocks, locks, or spawns work.

use crate::feature::{FeatureId, MapSearchResult, ShownFeatures, insert_sorted_by_distance};
use crate::geom::{ScreenLine, ScreenPoint, distance_to_line, manhattan_distance};
use crate::markers::{DistanceMarker, RangeMarker};
use crate::route::FlightRoute;
use crate::sources::{FeatureSource, Projector, ViewContext};
use crate::storage::{StorageBackend, StorageResult, load_json_backend, save_json_backend};
use crate::tessellate::GreatCircleTessellation;
use geo::{Intersects, Rect};
use serde::de::DeserializeOwned;

const RANGE_MARKERS_KEY: &str = "map/range_markers";
const DISTANCE_MARKERS_KEY: &str = "map/distance_markers";

/// Screen-space index over the currently visible map
#[derive(Debug, Default)]
pub struct ScreenIndex {
    /// Tessellated airway chords tagged with the owning airway id
    airway_lines: Vec<(FeatureId, ScreenLine)>,

    /// Tessellated flight plan chords tagged with the leg index the chord
    /// belongs to (the leg between positions `i` and `i + 1` carries tag `i`)
    route_lines: Vec<(usize, ScreenLine)>,

    /// Projected leg endpoints, terminal airports bucketed first so they take
    /// painting and picking priority over intermediate fixes
    route_points: Vec<(usize, ScreenPoint)>,

    highlights: MapSearchResult,
    range_markers: Vec<RangeMarker>,
    distance_markers: Vec<DistanceMarker>,
}

impl ScreenIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the airway screen line cache for the given lat/lon viewport
    /// box. The cache is cleared first; an invalid scale or no shown airway
    /// category leaves it empty rather than stale.
    pub fn update_airway_screen_lines(
        &mut self,
        view: &ViewContext<'_>,
        viewport: &Rect<f64>,
        source: &dyn FeatureSource,
    ) {
        profiling::scope!("index::update_airway_screen_lines");

        self.airway_lines.clear();

        let show_jet = view.shown.contains(ShownFeatures::AIRWAY_JET);
        let show_victor = view.shown.contains(ShownFeatures::AIRWAY_VICTOR);

        if view.scale.is_valid() && (show_jet || show_victor) {
            use crate::feature::AirwayKind;

            for airway in source.airways_in_box(viewport) {
                if (airway.kind == AirwayKind::Victor && !show_victor)
                    || (airway.kind == AirwayKind::Jet && !show_jet)
                {
                    continue;
                }

                if !airway.bounding.intersects(viewport) {
                    continue;
                }

                for line in GreatCircleTessellation::new(
                    airway.from,
                    airway.to,
                    view.scale,
                    view.projector,
                ) {
                    self.airway_lines.push((airway.id, line));
                }
            }
        }

        tracing::debug!(
            segments = self.airway_lines.len(),
            "rebuilt airway screen lines"
        );
    }

    /// Rebuild the flight plan screen geometry: tessellated leg chords plus
    /// the projected leg endpoint buckets. Cleared first; an invalid scale
    /// leaves both caches empty.
    pub fn update_route_screen_lines(&mut self, view: &ViewContext<'_>, route: &FlightRoute) {
        profiling::scope!("index::update_route_screen_lines");

        self.route_lines.clear();
        self.route_points.clear();

        if view.scale.is_valid() {
            let legs = route.legs();
            let mut airport_points = Vec::new();
            let mut other_points = Vec::new();
            let mut prev: Option<crate::geom::WorldPosition> = None;

            for (i, leg) in legs.iter().enumerate() {
                let pos = leg.position();
                let (point, _) = view.projector.project(&pos);

                if leg.is_airport() && (i == 0 || i == legs.len() - 1) {
                    airport_points.push((i, point));
                } else {
                    other_points.push((i, point));
                }

                if let Some(from) = prev {
                    for line in
                        GreatCircleTessellation::new(from, pos, view.scale, view.projector)
                    {
                        self.route_lines.push((i - 1, line));
                    }
                }
                prev = Some(pos);
            }

            self.route_points.extend(airport_points);
            self.route_points.extend(other_points);
        }

        tracing::debug!(
            segments = self.route_lines.len(),
            points = self.route_points.len(),
            "rebuilt route screen geometry"
        );
    }

    /// Nearest-feature query: everything within `radius` pixels of the query
    /// point, distance-filtered per category and de-duplicated across the
    /// merge steps (airways from the screen cache, then the flight plan, then
    /// highlights, then the backing source). Airports that arrive without
    /// detail facts are hydrated before returning.
    pub fn nearest_all(
        &self,
        view: &ViewContext<'_>,
        route: &FlightRoute,
        source: &dyn FeatureSource,
        x: i32,
        y: i32,
        radius: i32,
    ) -> MapSearchResult {
        profiling::scope!("index::nearest_all");

        let mut result = MapSearchResult::default();

        self.nearest_airways(view.shown, source, x, y, radius, &mut result);

        if view.shown.contains(ShownFeatures::ROUTE) {
            route.nearest(view.projector, x, y, radius, &mut result);
        }

        self.nearest_highlights(view.projector, x, y, radius, &mut result);

        source.nearest_features(
            view.projector,
            view.shown & (ShownFeatures::POINT_FEATURES | ShownFeatures::AIRWAYS),
            x,
            y,
            radius,
            &mut result,
        );

        // Results from the flight plan or a search may only carry identity;
        // fill in the detail facts by id before handing the result out
        for airport in &mut result.airports {
            if !airport.is_complete() {
                if let Some(full) = source.airport_by_id(airport.id) {
                    *airport = full;
                }
            }
        }

        result
    }

    fn nearest_airways(
        &self,
        shown: ShownFeatures,
        source: &dyn FeatureSource,
        x: i32,
        y: i32,
        radius: i32,
        result: &mut MapSearchResult,
    ) {
        if !shown.intersects(ShownFeatures::AIRWAYS) {
            return;
        }

        for (id, line) in &self.airway_lines {
            if distance_to_line(x, y, line) <= radius as f32 && result.airway_ids.insert(*id) {
                if let Some(airway) = source.airway_by_id(*id) {
                    result.airways.push(airway);
                }
            }
        }
    }

    fn nearest_highlights(
        &self,
        projector: &dyn Projector,
        x: i32,
        y: i32,
        radius: i32,
        result: &mut MapSearchResult,
    ) {
        let within = |pos: &crate::geom::WorldPosition| {
            let (point, visible) = projector.project(pos);
            visible && manhattan_distance(point.x, point.y, x, y) <= radius
        };

        for airport in &self.highlights.airports {
            if within(&airport.position) {
                insert_sorted_by_distance(
                    projector,
                    &mut result.airports,
                    &mut result.airport_ids,
                    x,
                    y,
                    airport,
                );
            }
        }

        for vor in &self.highlights.vors {
            if within(&vor.position) {
                insert_sorted_by_distance(
                    projector,
                    &mut result.vors,
                    &mut result.vor_ids,
                    x,
                    y,
                    vor,
                );
            }
        }

        for ndb in &self.highlights.ndbs {
            if within(&ndb.position) {
                insert_sorted_by_distance(
                    projector,
                    &mut result.ndbs,
                    &mut result.ndb_ids,
                    x,
                    y,
                    ndb,
                );
            }
        }

        for waypoint in &self.highlights.waypoints {
            if within(&waypoint.position) {
                insert_sorted_by_distance(
                    projector,
                    &mut result.waypoints,
                    &mut result.waypoint_ids,
                    x,
                    y,
                    waypoint,
                );
            }
        }
    }

    /// Index of the first stored distance marker whose endpoint lies strictly
    /// within `radius` pixels. First match wins so earlier markers keep their
    /// insertion-order priority.
    pub fn nearest_distance_marker_index(
        &self,
        projector: &dyn Projector,
        x: i32,
        y: i32,
        radius: i32,
    ) -> Option<usize> {
        self.distance_markers.iter().position(|marker| {
            let (point, visible) = projector.project(&marker.to);
            visible && manhattan_distance(point.x, point.y, x, y) < radius
        })
    }

    /// Index of the first stored range marker whose center lies strictly
    /// within `radius` pixels
    pub fn nearest_range_marker_index(
        &self,
        projector: &dyn Projector,
        x: i32,
        y: i32,
        radius: i32,
    ) -> Option<usize> {
        self.range_markers.iter().position(|marker| {
            let (point, visible) = projector.project(&marker.center);
            visible && manhattan_distance(point.x, point.y, x, y) < radius
        })
    }

    /// Leg index of the closest cached route point strictly within `radius`
    /// pixels. Terminal airports and intermediate legs are searched together;
    /// the overall minimum wins.
    pub fn nearest_route_point_index(
        &self,
        shown: ShownFeatures,
        x: i32,
        y: i32,
        radius: i32,
    ) -> Option<usize> {
        if !shown.contains(ShownFeatures::ROUTE) {
            return None;
        }

        let mut best: Option<usize> = None;
        let mut best_dist = i32::MAX;

        for (index, point) in &self.route_points {
            let dist = manhattan_distance(point.x, point.y, x, y);
            if dist < best_dist && dist < radius {
                best_dist = dist;
                best = Some(*index);
            }
        }
        best
    }

    /// Leg index of the cached route chord with the smallest capped
    /// point-to-segment distance strictly within `radius` pixels
    pub fn nearest_route_leg_index(
        &self,
        shown: ShownFeatures,
        x: i32,
        y: i32,
        radius: i32,
    ) -> Option<usize> {
        if !shown.contains(ShownFeatures::ROUTE) {
            return None;
        }
        Self::nearest_tagged_line(&self.route_lines, x, y, radius)
    }

    /// Airway id of the cached airway chord with the smallest capped
    /// point-to-segment distance strictly within `radius` pixels
    pub fn nearest_airway_id(
        &self,
        shown: ShownFeatures,
        x: i32,
        y: i32,
        radius: i32,
    ) -> Option<FeatureId> {
        if !shown.intersects(ShownFeatures::AIRWAYS) {
            return None;
        }
        Self::nearest_tagged_line(&self.airway_lines, x, y, radius)
    }

    fn nearest_tagged_line<T: Copy>(
        lines: &[(T, ScreenLine)],
        x: i32,
        y: i32,
        radius: i32,
    ) -> Option<T> {
        let mut best: Option<T> = None;
        let mut best_dist = f32::MAX;

        for (tag, line) in lines {
            let dist = distance_to_line(x, y, line);
            if dist < best_dist && dist < radius as f32 {
                best_dist = dist;
                best = Some(*tag);
            }
        }
        best
    }

    // --- Highlight and marker store ---

    pub fn highlights(&self) -> &MapSearchResult {
        &self.highlights
    }

    pub fn highlights_mut(&mut self) -> &mut MapSearchResult {
        &mut self.highlights
    }

    pub fn range_markers(&self) -> &[RangeMarker] {
        &self.range_markers
    }

    pub fn distance_markers(&self) -> &[DistanceMarker] {
        &self.distance_markers
    }

    pub fn add_range_marker(&mut self, marker: RangeMarker) {
        self.range_markers.push(marker);
    }

    pub fn add_distance_marker(&mut self, marker: DistanceMarker) {
        self.distance_markers.push(marker);
    }

    /// Remove a range marker by index. Indices are stable only until the next
    /// mutation of the store.
    pub fn remove_range_marker(&mut self, index: usize) -> Option<RangeMarker> {
        (index < self.range_markers.len()).then(|| self.range_markers.remove(index))
    }

    pub fn remove_distance_marker(&mut self, index: usize) -> Option<DistanceMarker> {
        (index < self.distance_markers.len()).then(|| self.distance_markers.remove(index))
    }

    // --- Cache accessors for the paint layer ---

    pub fn airway_lines(&self) -> &[(FeatureId, ScreenLine)] {
        &self.airway_lines
    }

    pub fn route_lines(&self) -> &[(usize, ScreenLine)] {
        &self.route_lines
    }

    pub fn route_points(&self) -> &[(usize, ScreenPoint)] {
        &self.route_points
    }

    // --- Persistence ---

    /// Serialize both marker lists into the backend, called at shutdown
    pub fn save_state(&self, backend: &dyn StorageBackend) -> StorageResult<()> {
        save_json_backend(backend, RANGE_MARKERS_KEY, &self.range_markers)?;
        save_json_backend(backend, DISTANCE_MARKERS_KEY, &self.distance_markers)
    }

    /// Restore both marker lists from the backend, called at startup.
    /// Missing or unreadable entries silently yield empty collections.
    pub fn restore_state(&mut self, backend: &dyn StorageBackend) {
        self.range_markers = Self::restore_list(backend, RANGE_MARKERS_KEY);
        self.distance_markers = Self::restore_list(backend, DISTANCE_MARKERS_KEY);
    }

    fn restore_list<T: DeserializeOwned>(backend: &dyn StorageBackend, key: &str) -> Vec<T> {
        match load_json_backend(backend, key) {
            Ok(Some(list)) => list,
            Ok(None) => Vec::new(),
            Err(error) => {
                tracing::warn!(key, %error, "discarding unreadable persisted markers");
                Vec::new()
            }
        }
    }
}
