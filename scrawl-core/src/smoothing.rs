//! # Smoothing
//!
//! Two path-smoothing strategies with different cost profiles. Catmull-Rom
//! interpolation is used where fidelity matters (export, final rendering),
//! the midpoint quad-curve reduction where latency matters (live drawing).
//!
//! The Catmull-Rom strategy is named and carries a parameter bag so documents
//! can pin the algorithm they were authored with. Unknown names decode to the
//! default rather than failing, so a newer or corrupt smoothing entry never
//! blocks a load.

use crate::geom::Pos;
use crate::path::Path;

pub const DEFAULT_GRANULARITY: u32 = 8;

/// A named smoothing algorithm plus its parameters.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Strategy {
    /// Cubic Catmull-Rom interpolation, emitting `granularity` points per
    /// 4-point window.
    CatmullRom { granularity: u32 },
}
impl Default for Strategy {
    fn default() -> Self {
        Self::CatmullRom {
            granularity: DEFAULT_GRANULARITY,
        }
    }
}
impl Strategy {
    /// Stable name, used as the serialization discriminant.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CatmullRom { .. } => "catmull-rom",
        }
    }
    /// Interpolate a smooth path through `path`'s points. Paths of four or
    /// fewer points are returned unchanged; the windowed basis needs five.
    #[must_use = "returns a new path without modifying the input"]
    pub fn smooth(self, path: &Path) -> Path {
        match self {
            Self::CatmullRom { granularity } => catmull_rom(path, granularity),
        }
    }
}

fn catmull_rom(path: &Path, granularity: u32) -> Path {
    let mut points = path.points();
    if points.len() <= 4 {
        return path.clone();
    }
    // Duplicate the endpoints so every original point gets a full 4-point window.
    points.insert(0, points[0]);
    points.push(*points.last().unwrap());

    let mut smoothed = Path::new();
    smoothed.move_to(points[0]);
    for point in &points[..3] {
        smoothed.line_to(*point);
    }

    let step = 1.0 / granularity.max(1) as f32;
    for idx in 4..points.len() {
        let p0 = points[idx - 3];
        let p1 = points[idx - 2];
        let p2 = points[idx - 1];
        let p3 = points[idx];

        for sub in 0..granularity.max(1) {
            let t = sub as f32 * step;
            let tt = t * t;
            let ttt = tt * t;
            smoothed.line_to(Pos::new(
                basis(p0.x, p1.x, p2.x, p3.x, t, tt, ttt),
                basis(p0.y, p1.y, p2.y, p3.y, t, tt, ttt),
            ));
        }
        smoothed.line_to(p2);
    }
    smoothed.line_to(*points.last().unwrap());
    smoothed
}

/// The standard cubic Catmull-Rom basis, applied per axis.
fn basis(p0: f32, p1: f32, p2: f32, p3: f32, t: f32, tt: f32, ttt: f32) -> f32 {
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * tt
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * ttt)
}

/// One captured sample in pixel space: where the pointer is now and where it
/// was on the previous sample.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct RawPoint {
    pub location: Pos,
    pub previous: Pos,
}

/// Midpoint quad-curve reduction over captured samples.
///
/// Fewer than four samples (or `straight`) produces plain line segments.
/// Otherwise each consecutive pair contributes a quadratic curve to their
/// midpoint with the earlier sample as control, which stays continuously
/// differentiable at a fraction of the interpolation cost.
///
/// `None` when `samples` is empty.
#[must_use]
pub fn quad_curve_path(samples: &[RawPoint], straight: bool) -> Option<Path> {
    let first = samples.first()?;
    let mut path = Path::new();
    path.move_to(first.previous);

    if samples.len() < 4 || straight {
        for sample in samples {
            path.line_to(sample.location);
        }
    } else {
        for idx in 2..samples.len() {
            let control = samples[idx - 1].location;
            let to = samples[idx].location;
            path.quad_to(control, control.midpoint(to));
        }
    }
    Some(path)
}

#[cfg(test)]
mod test {
    use super::{quad_curve_path, RawPoint, Strategy, DEFAULT_GRANULARITY};
    use crate::geom::Pos;
    use crate::path::{Element, Path};

    fn polyline(points: &[(f32, f32)]) -> Path {
        let mut path = Path::new();
        let mut iter = points.iter();
        let first = iter.next().unwrap();
        path.move_to(Pos::new(first.0, first.1));
        for point in iter {
            path.line_to(Pos::new(point.0, point.1));
        }
        path
    }

    #[test]
    fn short_paths_pass_through() {
        let path = polyline(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0)]);
        let smoothed = Strategy::default().smooth(&path);
        assert_eq!(smoothed, path);
    }

    #[test]
    fn smoothing_interpolates_between_samples() {
        let path = polyline(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0), (4.0, 0.0)]);
        let smoothed = Strategy::default().smooth(&path);
        // 5 inputs, padded to 7, gives 3 windows of `granularity` points each
        // plus the lead-in and closing segments.
        let expected = 1 + 3 + 3 * (DEFAULT_GRANULARITY as usize + 1) + 1;
        assert_eq!(smoothed.elements().len(), expected);
        // Endpoints survive smoothing exactly.
        assert_eq!(smoothed.first_point(), path.first_point());
        assert_eq!(smoothed.last_point(), path.last_point());
    }

    #[test]
    fn window_endpoints_are_on_curve() {
        // At t = 0 the basis must return the window's second point.
        assert_eq!(super::basis(9.0, 3.0, 5.0, 7.0, 0.0, 0.0, 0.0), 3.0);
    }

    fn samples(points: &[(f32, f32)]) -> Vec<RawPoint> {
        points
            .windows(2)
            .map(|pair| RawPoint {
                previous: Pos::new(pair[0].0, pair[0].1),
                location: Pos::new(pair[1].0, pair[1].1),
            })
            .collect()
    }

    #[test]
    fn quad_path_of_nothing() {
        assert_eq!(quad_curve_path(&[], false), None);
    }

    #[test]
    fn few_samples_fall_back_to_segments() {
        let path = quad_curve_path(&samples(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]), false).unwrap();
        assert!(path
            .elements()
            .iter()
            .all(|e| !matches!(e, Element::QuadTo { .. })));
    }

    #[test]
    fn enough_samples_emit_curves() {
        let raw = samples(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0), (4.0, 0.0)]);
        let path = quad_curve_path(&raw, false).unwrap();
        assert!(path
            .elements()
            .iter()
            .any(|e| matches!(e, Element::QuadTo { .. })));
        // The `straight` override forces segments regardless of count.
        let straight = quad_curve_path(&raw, true).unwrap();
        assert!(straight
            .elements()
            .iter()
            .all(|e| !matches!(e, Element::QuadTo { .. })));
    }
}
