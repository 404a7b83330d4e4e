//! User-created map annotations persisted across sessions

use crate::geom::WorldPosition;
use crate::style::Rgb;
use serde::{Deserialize, Serialize};

/// Concentric range rings around a fixed center
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeMarker {
    /// Label shown at the center, usually an ident or frequency
    pub text: String,
    /// Ring radii in nautical miles, drawn smallest first
    pub ranges_nm: Vec<f32>,
    pub center: WorldPosition,
    pub color: Rgb,
}

/// A measurement line between two positions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceMarker {
    pub text: String,
    pub color: Rgb,
    pub from: WorldPosition,
    pub to: WorldPosition,
    /// Magnetic variation at the origin, degrees east positive
    pub magvar: f32,
    pub has_magvar: bool,
    /// Measure along the rhumb line instead of the great circle
    pub rhumb_line: bool,
}
