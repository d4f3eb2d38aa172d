//! # Drawings
//!
//! One continuous gesture: its committed samples, a transient predictive
//! tail, and a snapshot of the tool and color it was made with.

use smallvec::SmallVec;
use uuid::Uuid;

use crate::geom::{Rect, Size};
use crate::path::Path;
use crate::smoothing::{quad_curve_path, RawPoint, Strategy};
use crate::stroke::Point;
use crate::tool::Tool;
use crate::Color;

#[derive(Clone, PartialEq, Debug)]
pub struct Drawing {
    id: Uuid,
    points: Vec<Point>,
    /// Look-ahead samples for live feedback only. Pruned whenever committed
    /// samples arrive and at gesture end; never serialized.
    predictive: SmallVec<[Point; 4]>,
    tool: Tool,
    color: Color,
    /// Interpolation used for export-quality rendering of this stroke.
    smoothing: Strategy,
    is_smoothing_enabled: bool,
    /// Set by occlusion culling when a later eraser fully covers this
    /// drawing. Culled drawings are skipped at render and export time but
    /// stay in the model so undo can resurrect them.
    is_culled: bool,
}

impl Drawing {
    #[must_use]
    pub fn new(tool: Tool, color: Color, is_smoothing_enabled: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            predictive: SmallVec::new(),
            tool,
            color,
            smoothing: Strategy::default(),
            is_smoothing_enabled,
            is_culled: false,
        }
    }
    /// Reassemble a drawing from decoded document state.
    pub(crate) fn from_parts(
        id: Uuid,
        tool: Tool,
        color: Color,
        points: Vec<Point>,
        smoothing: Strategy,
        is_smoothing_enabled: bool,
        is_culled: bool,
    ) -> Self {
        Self {
            id,
            points,
            predictive: SmallVec::new(),
            tool,
            color,
            smoothing,
            is_smoothing_enabled,
            is_culled,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }
    #[must_use]
    pub fn tool(&self) -> &Tool {
        &self.tool
    }
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }
    #[must_use]
    pub fn smoothing(&self) -> Strategy {
        self.smoothing
    }
    #[must_use]
    pub fn is_smoothing_enabled(&self) -> bool {
        self.is_smoothing_enabled
    }
    #[must_use]
    pub fn is_culled(&self) -> bool {
        self.is_culled
    }
    pub(crate) fn set_culled(&mut self, culled: bool) {
        self.is_culled = culled;
    }
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
    #[must_use]
    pub fn predictive_points(&self) -> &[Point] {
        &self.predictive
    }
    /// Whether any committed samples exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a sample, routed by its predictive flag.
    pub fn add(&mut self, point: Point) {
        if point.is_predictive {
            self.predictive.push(point);
        } else {
            self.points.push(point);
        }
    }
    /// Discard the predictive tail. Called when real samples supersede the
    /// speculation and when the gesture ends.
    pub fn prune(&mut self) {
        self.predictive.clear();
    }

    /// Simplify the committed samples of a finished gesture.
    ///
    /// Destructive: the dropped samples are gone. Only call once the gesture
    /// is truly over.
    ///
    /// Eraser strokes collapse to their endpoints; the erase region is a
    /// rectangle, so interior samples carry nothing. Other tools keep the
    /// endpoints plus every sample at least [`super::MOVEMENT_THRESHOLD`]
    /// pixels (at `size`) from the previously kept one.
    pub fn cull_extraneous(&mut self, size: Size) {
        if self.points.len() < 3 {
            return;
        }
        if let Tool::Eraser(_) = self.tool {
            let first = self.points[0];
            let last = *self.points.last().unwrap();
            self.points = vec![first, last];
            return;
        }
        let mut kept = Vec::with_capacity(self.points.len());
        kept.push(self.points[0]);
        for point in &self.points[1..self.points.len() - 1] {
            if point.is_valid_movement(kept.last().unwrap(), size) {
                kept.push(*point);
            }
        }
        kept.push(*self.points.last().unwrap());
        self.points = kept;
    }

    fn raw_samples(&self, size: Size) -> Vec<RawPoint> {
        self.points
            .iter()
            .map(|point| RawPoint {
                location: point.location.pos(size),
                previous: point.previous.pos(size),
            })
            .collect()
    }

    /// The committed samples as a drawable path at `size`: quad-curve reduced
    /// when this tool and drawing smooth, straight segments otherwise.
    /// `None` when no samples are committed.
    #[must_use]
    pub fn create_path(&self, size: Size) -> Option<Path> {
        let straight = !(self.tool.is_smoothing_supported() && self.is_smoothing_enabled);
        quad_curve_path(&self.raw_samples(size), straight)
    }

    /// Export-quality path: the raw polyline interpolated through this
    /// drawing's smoothing strategy, when the tool and drawing allow it.
    #[must_use]
    pub fn smoothed_path(&self, size: Size) -> Option<Path> {
        let path = quad_curve_path(&self.raw_samples(size), true)?;
        if self.tool.is_smoothing_supported() && self.is_smoothing_enabled {
            Some(self.smoothing.smooth(&path))
        } else {
            Some(path)
        }
    }

    /// The rectangle an eraser gesture clears: spanned by the path's first
    /// and last point. `None` for paths of fewer than two points.
    #[must_use]
    pub fn erase_rect(&self, size: Size) -> Option<Rect> {
        let path = self.create_path(size)?;
        let points = path.points();
        if points.len() < 2 {
            return None;
        }
        Some(Rect::from_corners(points[0], *points.last().unwrap()))
    }

    /// Conservative screen bounds used by occlusion culling, grown by this
    /// drawing's stroke width.
    #[must_use]
    pub fn culling_bounds(&self, size: Size) -> Option<Rect> {
        self.create_path(size)?
            .bounding_box_for_culling(self.tool.calculate_line_width(size))
    }

    /// The previous-location of the newest committed sample, in pixels.
    /// Partial redraw starts its dirty rect here.
    #[must_use]
    pub fn last_previous_pos(&self, size: Size) -> Option<crate::geom::Pos> {
        Some(self.points.last()?.previous.pos(size))
    }
}

#[cfg(test)]
mod test {
    use super::Drawing;
    use crate::geom::Size;
    use crate::stroke::{Location, Point};
    use crate::tool::Tool;
    use crate::Color;

    const SIZE: Size = Size {
        width: 1000.0,
        height: 1000.0,
    };

    fn committed(x: f32, y: f32) -> Point {
        Point::new(Location::new(x, y), Location::new(x, y), 1.0, false)
    }

    fn stroke_of(tool: Tool, offsets: &[f32]) -> Drawing {
        let mut drawing = Drawing::new(tool, Color::default(), true);
        for &offset in offsets {
            drawing.add(committed(offset, offset));
        }
        drawing
    }

    #[test]
    fn predictive_points_are_segregated_and_pruned() {
        let mut drawing = Drawing::new(Tool::pen(), Color::default(), true);
        drawing.add(committed(0.1, 0.1));
        drawing.add(Point::new(
            Location::new(0.2, 0.2),
            Location::new(0.1, 0.1),
            1.0,
            true,
        ));
        assert_eq!(drawing.points().len(), 1);
        assert_eq!(drawing.predictive_points().len(), 1);
        drawing.prune();
        assert!(drawing.predictive_points().is_empty());
        assert_eq!(drawing.points().len(), 1);
    }

    #[test]
    fn eraser_collapses_to_endpoints() {
        let offsets: Vec<f32> = (0..50).map(|i| i as f32 / 100.0).collect();
        let mut drawing = stroke_of(Tool::eraser(), &offsets);
        drawing.cull_extraneous(SIZE);
        assert_eq!(drawing.points().len(), 2);
        assert_eq!(drawing.points()[0].location, Location::new(0.0, 0.0));
        assert_eq!(drawing.points()[1].location, Location::new(0.49, 0.49));
    }

    #[test]
    fn simplification_respects_the_pixel_threshold() {
        // 0.0005 of 1000 px is half a pixel, below the 2 px threshold.
        let offsets: Vec<f32> = (0..100).map(|i| i as f32 * 0.0005).collect();
        let mut drawing = stroke_of(Tool::pen(), &offsets);
        drawing.cull_extraneous(SIZE);
        let culled_once = drawing.points().to_vec();
        assert!(culled_once.len() < 100);

        // Running again must not drop anything further.
        drawing.cull_extraneous(SIZE);
        assert_eq!(drawing.points(), culled_once.as_slice());
    }

    #[test]
    fn short_strokes_are_untouched() {
        let mut drawing = stroke_of(Tool::pen(), &[0.0, 0.5]);
        drawing.cull_extraneous(SIZE);
        assert_eq!(drawing.points().len(), 2);
    }

    #[test]
    fn erase_rect_spans_endpoints() {
        let mut drawing = stroke_of(Tool::eraser(), &[0.1, 0.3, 0.2, 0.5]);
        drawing.cull_extraneous(SIZE);
        let rect = drawing.erase_rect(SIZE).unwrap();
        assert_eq!(rect.min_x(), 100.0);
        assert_eq!(rect.max_x(), 500.0);
        // A single sample has no area to erase.
        let lone = stroke_of(Tool::eraser(), &[0.1]);
        assert_eq!(lone.erase_rect(SIZE), None);
    }

    #[test]
    fn paths_smooth_only_when_allowed() {
        use crate::path::Element;
        let offsets = [0.0, 0.1, 0.2, 0.3, 0.4];
        let smooth = stroke_of(Tool::pen(), &offsets);
        assert!(smooth
            .create_path(SIZE)
            .unwrap()
            .elements()
            .iter()
            .any(|e| matches!(e, Element::QuadTo { .. })));

        let mut straight = Drawing::new(Tool::pen(), Color::default(), false);
        for &offset in &offsets {
            straight.add(committed(offset, offset));
        }
        assert!(straight
            .create_path(SIZE)
            .unwrap()
            .elements()
            .iter()
            .all(|e| !matches!(e, Element::QuadTo { .. })));

        let eraser = stroke_of(Tool::eraser(), &offsets);
        assert!(eraser
            .create_path(SIZE)
            .unwrap()
            .elements()
            .iter()
            .all(|e| !matches!(e, Element::QuadTo { .. })));
    }
}
