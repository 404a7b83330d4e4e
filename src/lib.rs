//! Screen-Space Spatial Index for Flight Navigation Maps
//!
//! This library maps world-coordinate map features (airports, navaids,
//! airways, flight plan legs, user markers) into screen-pixel geometry for
//! rendering and hit-testing. Path features are adaptively tessellated along
//! their great circles into per-viewport screen line caches; pointer events
//! are answered with distance-ranked, de-duplicated nearest-feature queries
//! across all enabled categories.
//!
//! # Architecture
//!
//! - **[`ScreenIndex`]**: screen line caches, highlight/marker store, and the
//!   nearest-feature query engine
//! - **[`GreatCircleTessellation`]**: lazy great-circle to screen-chord iterator
//! - **[`MapSearchResult`]**: per-category ranked query result with id de-duplication
//! - **[`Projector`] / [`MapScale`] / [`FeatureSource`]**: collaborator traits
//!   owned by the rendering surface and the navigation database
//! - **[`StorageBackend`]**: key/value persistence for user markers
//!
//! All operations are synchronous and bounded: tessellation is capped per
//! path, queries are radius-bounded, and caches are rebuilt wholesale on
//! viewport changes. The crate has no rendering, windowing, or database code.

mod feature;
mod geom;
mod index;
mod markers;
mod route;
mod sources;
mod storage;
mod style;
mod tessellate;

// Public API exports
pub use feature::{
    Airport, AirportFacts, Airway, AirwayKind, FeatureId, MapFeature, MapSearchResult, Ndb,
    ShownFeatures, Vor, Waypoint,
};
pub use geom::{
    EARTH_RADIUS_M, ScreenLine, ScreenPoint, WorldPosition, distance_to_line, manhattan_distance,
};
pub use index::ScreenIndex;
pub use markers::{DistanceMarker, RangeMarker};
pub use route::{FlightRoute, LegFeature, RouteLeg};
pub use sources::{FeatureSource, MapScale, Projector, ViewContext};
pub use storage::{
    FileStorage, MemoryStorage, StorageBackend, StorageError, StorageResult, load_json_backend,
    save_json_backend,
};
pub use style::{MapStyle, Pen, Rgb};
pub use tessellate::GreatCircleTessellation;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        let _ = ScreenIndex::new();
        let _ = MapSearchResult::default();
        let _ = MapStyle::default();
    }
}
