//! Collaborator traits at the seams of the index.
//!
//! The index itself owns only screen-space caches and user annotations.
//! Projection, scale, and feature data all live in external collaborators
//! that are borrowed for the duration of a single rebuild or query call and
//! may change between calls.

use crate::feature::{Airport, Airway, FeatureId, MapSearchResult, ShownFeatures};
use crate::geom::{ScreenPoint, WorldPosition};
use geo::Rect;

/// Converts world positions to widget pixels for the current viewport.
///
/// The returned coordinates are meaningful even when `visible` is false:
/// off-viewport points still project to pixel positions outside the widget,
/// which is what makes edge clipping of partially visible chords work.
pub trait Projector {
    fn project(&self, pos: &WorldPosition) -> (ScreenPoint, bool);
}

/// Current map scale. Invalid while no viewport has been established
/// (e.g. during startup), in which case screen geometry cannot be built.
pub trait MapScale {
    fn is_valid(&self) -> bool;

    /// Approximate on-screen length in pixels of a ground distance in meters
    fn pixels_for_meters(&self, meters: f64) -> f32;
}

/// Backing navigation data source: range queries for display candidates and
/// by-id lookups for resolving and hydrating features.
pub trait FeatureSource {
    /// Airways whose bounding rectangle may intersect the given lat/lon
    /// viewport box (x = longitude, y = latitude degrees)
    fn airways_in_box(&self, viewport: &Rect<f64>) -> Vec<Airway>;

    fn airway_by_id(&self, id: FeatureId) -> Option<Airway>;

    /// Fully hydrated airport including detail facts
    fn airport_by_id(&self, id: FeatureId) -> Option<Airport>;

    /// Merge point features of the shown categories within `radius` pixels of
    /// the query point into `result`, skipping ids already collected there
    fn nearest_features(
        &self,
        projector: &dyn Projector,
        shown: ShownFeatures,
        x: i32,
        y: i32,
        radius: i32,
        result: &mut MapSearchResult,
    );
}

/// Everything the index needs to know about the current view, bundled so the
/// rebuild and query entry points stay readable
#[derive(Clone, Copy)]
pub struct ViewContext<'a> {
    pub projector: &'a dyn Projector,
    pub scale: &'a dyn MapScale,
    pub shown: ShownFeatures,
}

impl<'a> ViewContext<'a> {
    pub fn new(projector: &'a dyn Projector, scale: &'a dyn MapScale, shown: ShownFeatures) -> Self {
        Self {
            projector,
            scale,
            shown,
        }
    }
}
