//! Adaptive tessellation of great-circle paths into screen-space chords

use crate::geom::{ScreenLine, WorldPosition};
use crate::sources::{MapScale, Projector};

/// Pixels of projected path length per tessellation step
const PIXELS_PER_SEGMENT: f32 = 20.0;

/// Lower bound keeps even degenerate or zoomed-out paths drawable
const MIN_SEGMENTS: f32 = 4.0;

/// Upper bound caps the cost of long paths at high zoom
const MAX_SEGMENTS: f32 = 72.0;

/// Lazy iterator subdividing the great circle between two positions into
/// straight pixel chords.
///
/// The step count adapts to the current scale: projected length divided by
/// [`PIXELS_PER_SEGMENT`], clamped to `4..=72`. Each step projects both
/// interpolated endpoints and yields the chord only if at least one of them
/// is visible, so chords straddling the viewport border survive for edge
/// clipping while fully offscreen ones are dropped. Finite, non-restartable.
pub struct GreatCircleTessellation<'a> {
    from: WorldPosition,
    to: WorldPosition,
    step: f64,
    steps: u32,
    current: u32,
    projector: &'a dyn Projector,
}

impl<'a> GreatCircleTessellation<'a> {
    pub fn new(
        from: WorldPosition,
        to: WorldPosition,
        scale: &dyn MapScale,
        projector: &'a dyn Projector,
    ) -> Self {
        let distance = from.distance_meters(&to);
        let steps = (scale.pixels_for_meters(distance) / PIXELS_PER_SEGMENT)
            .clamp(MIN_SEGMENTS, MAX_SEGMENTS) as u32;

        Self {
            from,
            to,
            step: 1.0 / f64::from(steps),
            steps,
            current: 0,
            projector,
        }
    }

    /// Number of interpolation steps this tessellation will take, counting
    /// chords that visibility filtering may still drop
    pub fn step_count(&self) -> u32 {
        self.steps
    }
}

impl Iterator for GreatCircleTessellation<'_> {
    type Item = ScreenLine;

    fn next(&mut self) -> Option<ScreenLine> {
        while self.current < self.steps {
            let cur = self.step * f64::from(self.current);
            self.current += 1;

            let (p1, visible1) = self.projector.project(&self.from.interpolate(&self.to, cur));
            let (p2, visible2) = self
                .projector
                .project(&self.from.interpolate(&self.to, cur + self.step));

            if visible1 || visible2 {
                return Some(ScreenLine::new(p1, p2));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some((self.steps - self.current) as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::ScreenPoint;

    /// Equirectangular pixel grid, one pixel per hundredth of a degree,
    /// visible inside a fixed widget rectangle
    struct TestProjector {
        width: i32,
        height: i32,
    }

    impl TestProjector {
        fn unbounded() -> Self {
            Self {
                width: i32::MAX,
                height: i32::MAX,
            }
        }
    }

    impl Projector for TestProjector {
        fn project(&self, pos: &WorldPosition) -> (ScreenPoint, bool) {
            let point = ScreenPoint::new(
                (pos.lon * 100.0).round() as i32,
                (-pos.lat * 100.0).round() as i32,
            );
            let visible = point.x.abs() < self.width && point.y.abs() < self.height;
            (point, visible)
        }
    }

    struct TestScale {
        valid: bool,
        pixels_per_meter: f32,
    }

    impl MapScale for TestScale {
        fn is_valid(&self) -> bool {
            self.valid
        }

        fn pixels_for_meters(&self, meters: f64) -> f32 {
            meters as f32 * self.pixels_per_meter
        }
    }

    #[test]
    fn test_step_count_bounds() {
        let projector = TestProjector::unbounded();
        let from = WorldPosition::new(0.0, 0.0);
        let to = WorldPosition::new(0.0, 10.0);

        // Zoomed far out: tiny pixel length floors at 4
        let coarse = TestScale {
            valid: true,
            pixels_per_meter: 1e-9,
        };
        assert_eq!(
            GreatCircleTessellation::new(from, to, &coarse, &projector).step_count(),
            4
        );

        // Zoomed far in: capped at 72
        let fine = TestScale {
            valid: true,
            pixels_per_meter: 10.0,
        };
        assert_eq!(
            GreatCircleTessellation::new(from, to, &fine, &projector).step_count(),
            72
        );

        // In between scales stay within the bounds
        let mid = TestScale {
            valid: true,
            pixels_per_meter: 0.0005,
        };
        let steps = GreatCircleTessellation::new(from, to, &mid, &projector).step_count();
        assert!((4..=72).contains(&steps), "got {steps}");
    }

    #[test]
    fn test_chords_interpolate_monotonically() {
        let projector = TestProjector::unbounded();
        let scale = TestScale {
            valid: true,
            pixels_per_meter: 0.001,
        };
        let from = WorldPosition::new(0.0, 0.0);
        let to = WorldPosition::new(0.0, 8.0);

        let chords: Vec<ScreenLine> =
            GreatCircleTessellation::new(from, to, &scale, &projector).collect();
        assert!(!chords.is_empty());

        // Eastward along the equator: x never decreases, chords are contiguous
        let mut prev_end: Option<ScreenPoint> = None;
        for chord in &chords {
            assert!(chord.p2.x >= chord.p1.x);
            if let Some(prev) = prev_end {
                assert_eq!(chord.p1, prev);
            }
            prev_end = Some(chord.p2);
        }

        assert_eq!(chords.first().unwrap().p1, ScreenPoint::new(0, 0));
        assert_eq!(chords.last().unwrap().p2, ScreenPoint::new(800, 0));
    }

    #[test]
    fn test_zero_distance_does_not_divide_by_zero() {
        let projector = TestProjector::unbounded();
        let scale = TestScale {
            valid: true,
            pixels_per_meter: 1.0,
        };
        let pos = WorldPosition::new(45.0, 7.0);

        let tess = GreatCircleTessellation::new(pos, pos, &scale, &projector);
        assert_eq!(tess.step_count(), 4);

        let chords: Vec<ScreenLine> = tess.collect();
        assert_eq!(chords.len(), 4);
        for chord in chords {
            assert_eq!(chord.p1, chord.p2);
        }
    }

    #[test]
    fn test_offscreen_chords_are_dropped() {
        // Widget only covers the first two degrees of the path
        let projector = TestProjector {
            width: 200,
            height: 100,
        };
        let scale = TestScale {
            valid: true,
            pixels_per_meter: 0.001,
        };
        let from = WorldPosition::new(0.0, 0.0);
        let to = WorldPosition::new(0.0, 8.0);

        let tess = GreatCircleTessellation::new(from, to, &scale, &projector);
        let total_steps = tess.step_count();
        let chords: Vec<ScreenLine> = tess.collect();

        assert!(!chords.is_empty());
        assert!((chords.len() as u32) < total_steps);
        // Every surviving chord has at least one endpoint inside the widget
        for chord in &chords {
            let inside = |p: &ScreenPoint| p.x >= 0 && p.x < 200 && p.y >= 0 && p.y < 100;
            assert!(inside(&chord.p1) || inside(&chord.p2));
        }
    }
}
