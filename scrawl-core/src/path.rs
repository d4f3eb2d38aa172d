//! # Paths
//!
//! A minimal path representation for stroked gestures. Only the verbs the
//! capture pipeline emits are supported: move, line, quadratic curve.

use crate::geom::{Pos, Rect};

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Element {
    MoveTo(Pos),
    LineTo(Pos),
    QuadTo { control: Pos, to: Pos },
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Path {
    elements: Vec<Element>,
}
impl Path {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    pub fn move_to(&mut self, to: Pos) {
        self.elements.push(Element::MoveTo(to));
    }
    pub fn line_to(&mut self, to: Pos) {
        self.elements.push(Element::LineTo(to));
    }
    pub fn quad_to(&mut self, control: Pos, to: Pos) {
        self.elements.push(Element::QuadTo { control, to });
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
    /// Every coordinate in element order. Curve control points are included,
    /// which makes the list usable for bounds and endpoint queries without
    /// flattening.
    #[must_use]
    pub fn points(&self) -> Vec<Pos> {
        let mut points = Vec::with_capacity(self.elements.len());
        for element in &self.elements {
            match *element {
                Element::MoveTo(p) | Element::LineTo(p) => points.push(p),
                Element::QuadTo { control, to } => {
                    points.push(control);
                    points.push(to);
                }
            }
        }
        points
    }
    #[must_use]
    pub fn first_point(&self) -> Option<Pos> {
        self.elements.first().map(|element| match *element {
            Element::MoveTo(p) | Element::LineTo(p) => p,
            Element::QuadTo { control, .. } => control,
        })
    }
    #[must_use]
    pub fn last_point(&self) -> Option<Pos> {
        self.elements.last().map(|element| match *element {
            Element::MoveTo(p) | Element::LineTo(p) | Element::QuadTo { to: p, .. } => p,
        })
    }
    /// Geometric bounds of the path's points. `None` for an empty path.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rect> {
        crate::geom::bounding_rect(&self.points(), 0.0)
    }
    /// Bounds grown to cover the *stroked* extent: `ceil(width / 2) + 2` on
    /// every side. The extra margin keeps containment tests from missing
    /// strokes whose ink reaches past their mathematical bounds.
    #[must_use]
    pub fn bounding_box_for_culling(&self, line_width: f32) -> Option<Rect> {
        let offset = (line_width / 2.0).ceil() + 2.0;
        Some(self.bounding_box()?.outset(offset))
    }
}

#[cfg(test)]
mod test {
    use super::Path;
    use crate::geom::{Pos, Rect};

    #[test]
    fn points_include_controls() {
        let mut path = Path::new();
        path.move_to(Pos::new(0.0, 0.0));
        path.line_to(Pos::new(1.0, 0.0));
        path.quad_to(Pos::new(2.0, 2.0), Pos::new(3.0, 0.0));
        assert_eq!(
            path.points(),
            vec![
                Pos::new(0.0, 0.0),
                Pos::new(1.0, 0.0),
                Pos::new(2.0, 2.0),
                Pos::new(3.0, 0.0),
            ]
        );
        assert_eq!(path.first_point(), Some(Pos::new(0.0, 0.0)));
        assert_eq!(path.last_point(), Some(Pos::new(3.0, 0.0)));
    }

    #[test]
    fn empty_path_has_no_bounds() {
        assert_eq!(Path::new().bounding_box(), None);
    }

    #[test]
    fn culling_bounds_margin() {
        let mut path = Path::new();
        path.move_to(Pos::new(10.0, 10.0));
        path.line_to(Pos::new(20.0, 20.0));
        // ceil(5/2) + 2 = 5 on every side.
        let rect = path.bounding_box_for_culling(5.0).unwrap();
        assert_eq!(rect, Rect::new(5.0, 5.0, 20.0, 20.0));
    }
}
