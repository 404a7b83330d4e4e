//! Map style palette: color and pen lookup by feature category.
//!
//! Built once at startup and passed by reference to whatever renders the map.
//! Theming configuration sync is owned by the application shell, not here.

use crate::feature::{Airport, AirwayKind};
use serde::{Deserialize, Serialize};

/// Plain RGB color, independent of any rendering backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Line drawing attributes for path features
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub color: Rgb,
    pub width: f32,
}

impl Pen {
    pub const fn new(color: Rgb, width: f32) -> Self {
        Self { color, width }
    }
}

/// Immutable visual style for map features
#[derive(Clone, Debug, PartialEq)]
pub struct MapStyle {
    pub airport_towered: Rgb,
    pub airport_untowered: Rgb,
    pub airport_empty: Rgb,
    /// Draw airports without parking or facilities in the empty color
    pub mark_empty_airports: bool,

    pub vor_symbol: Rgb,
    pub ndb_symbol: Rgb,
    pub waypoint_symbol: Rgb,
    pub marker_symbol: Rgb,
    pub ils_symbol: Rgb,

    pub airway_victor_pen: Pen,
    pub airway_jet_pen: Pen,
    pub airway_both_pen: Pen,
    pub airway_text: Rgb,

    pub range_ring: Rgb,
    pub range_ring_text: Rgb,
    pub distance_line: Rgb,
    pub distance_line_rhumb: Rgb,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            airport_towered: Rgb::new(15, 70, 130),
            airport_untowered: Rgb::new(126, 58, 91),
            airport_empty: Rgb::new(110, 110, 110),
            mark_empty_airports: true,

            vor_symbol: Rgb::new(0, 0, 128),
            ndb_symbol: Rgb::new(128, 0, 0),
            waypoint_symbol: Rgb::new(200, 0, 200),
            marker_symbol: Rgb::new(128, 0, 128),
            ils_symbol: Rgb::new(0, 128, 0),

            airway_victor_pen: Pen::new(Rgb::new(150, 150, 150), 1.5),
            airway_jet_pen: Pen::new(Rgb::new(100, 100, 100), 1.5),
            airway_both_pen: Pen::new(Rgb::new(100, 100, 100), 1.5),
            airway_text: Rgb::new(80, 80, 80),

            range_ring: Rgb::new(255, 0, 0),
            range_ring_text: Rgb::new(0, 0, 0),
            distance_line: Rgb::new(0, 0, 0),
            distance_line_rhumb: Rgb::new(80, 80, 80),
        }
    }
}

impl MapStyle {
    /// Symbol color for an airport. Empty land airports are grayed out when
    /// enabled; otherwise towered and untowered airports get distinct colors.
    /// Airports not yet hydrated fall back to the untowered color.
    pub fn color_for_airport(&self, airport: &Airport) -> Rgb {
        match &airport.facts {
            Some(facts) if facts.empty && !facts.water_only && self.mark_empty_airports => {
                self.airport_empty
            }
            Some(facts) if facts.has_tower => self.airport_towered,
            _ => self.airport_untowered,
        }
    }

    pub fn pen_for_airway(&self, kind: AirwayKind) -> &Pen {
        match kind {
            AirwayKind::Victor => &self.airway_victor_pen,
            AirwayKind::Jet => &self.airway_jet_pen,
            AirwayKind::Both => &self.airway_both_pen,
        }
    }
}
