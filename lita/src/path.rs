//! Outline paths and the pen interface used to record them.

use alloc::vec::Vec;

use font_types::{BoundingBox, Point};

use crate::transform::Transform;

/// Interface for accepting a sequence of path commands.
pub trait Pen {
    /// Emit a command to begin a new subpath at (x, y).
    fn move_to(&mut self, x: f32, y: f32);

    /// Emit a line segment from the current point to (x, y).
    fn line_to(&mut self, x: f32, y: f32);

    /// Emit a quadratic bezier segment from the current point with a control
    /// point at (cx0, cy0) and ending at (x, y).
    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32);

    /// Emit a cubic bezier segment from the current point with control
    /// points at (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32);

    /// Emit a command to close the current subpath.
    fn close(&mut self);
}

/// Single element of a path.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum PathElement {
    /// Begin a new subpath at (x, y).
    MoveTo { x: f32, y: f32 },
    /// Draw a line from the current point to (x, y).
    LineTo { x: f32, y: f32 },
    /// Draw a quadratic bezier from the current point with a control point
    /// at (cx0, cy0) and ending at (x, y).
    QuadTo { cx0: f32, cy0: f32, x: f32, y: f32 },
    /// Draw a cubic bezier from the current point with control points at
    /// (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    CurveTo {
        cx0: f32,
        cy0: f32,
        cx1: f32,
        cy1: f32,
        x: f32,
        y: f32,
    },
    /// Close the current subpath.
    Close,
}

impl PathElement {
    /// On- and off-curve points of this element, in order.
    fn points(self) -> impl Iterator<Item = Point<f32>> {
        let points = match self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } => [Some(Point::new(x, y)), None, None],
            Self::QuadTo { cx0, cy0, x, y } => {
                [Some(Point::new(cx0, cy0)), Some(Point::new(x, y)), None]
            }
            Self::CurveTo {
                cx0,
                cy0,
                cx1,
                cy1,
                x,
                y,
            } => [
                Some(Point::new(cx0, cy0)),
                Some(Point::new(cx1, cy1)),
                Some(Point::new(x, y)),
            ],
            Self::Close => [None, None, None],
        };
        points.into_iter().flatten()
    }
}

/// Filled outline recorded as a sequence of path elements.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Path(Vec<PathElement>);

impl Path {
    /// Creates a new, empty path.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The recorded path elements in order.
    pub fn elements(&self) -> &[PathElement] {
        &self.0
    }

    /// Iterator over every on- and off-curve point of the path.
    pub fn points(&self) -> impl Iterator<Item = Point<f32>> + '_ {
        self.0.iter().flat_map(|element| element.points())
    }

    /// Control box of the path under `transform`: the bounding box of all
    /// transformed on- and off-curve points.
    ///
    /// Always contains the filled region but is not necessarily tight
    /// around curved segments. Returns `None` for a path without points.
    pub fn control_box(&self, transform: &Transform) -> Option<BoundingBox<f32>> {
        let mut points = self.points().map(|point| transform.transform_point(point));
        let first = points.next()?;
        let mut bounds = BoundingBox {
            x_min: first.x,
            y_min: first.y,
            x_max: first.x,
            y_max: first.y,
        };
        for point in points {
            bounds.x_min = bounds.x_min.min(point.x);
            bounds.y_min = bounds.y_min.min(point.y);
            bounds.x_max = bounds.x_max.max(point.x);
            bounds.y_max = bounds.y_max.max(point.y);
        }
        Some(bounds)
    }
}

impl From<Vec<PathElement>> for Path {
    fn from(elements: Vec<PathElement>) -> Self {
        Self(elements)
    }
}

impl Pen for Path {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.push(PathElement::MoveTo { x, y })
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.push(PathElement::LineTo { x, y })
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.0.push(PathElement::QuadTo { cx0, cy0, x, y })
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.0.push(PathElement::CurveTo {
            cx0,
            cy0,
            cx1,
            cy1,
            x,
            y,
        })
    }

    fn close(&mut self) {
        self.0.push(PathElement::Close)
    }
}
