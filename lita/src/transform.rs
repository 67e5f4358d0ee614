//! Affine transforms in the rendering sink's coordinate space.

use core::ops::{Mul, MulAssign};

use font_types::Point;

use crate::{error::PaintError, paint::Paint};

#[cfg(feature = "libm")]
#[allow(unused_imports)]
use core_maths::*;

/// Tolerance below which a computed skew factor collapses to exactly zero.
const NEARLY_ZERO: f32 = 1.0 / 4096.0;

/// A transformation matrix to be applied to the drawing surface.
///
/// Factors are specified in column order, meaning that for a vector
/// `(x, y)` the transformed position `x'` is calculated by
/// `x' = xx * x + xy * y + dx`, and the transformed position `y'` by
/// `y' = yx * x + yy * y + dy`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Transform {
    pub xx: f32,
    pub yx: f32,
    pub xy: f32,
    pub yy: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        xx: 1.0,
        yx: 0.0,
        xy: 0.0,
        yy: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    /// Applies the transform to a point.
    pub fn transform_point(&self, point: Point<f32>) -> Point<f32> {
        Point::new(
            self.xx * point.x + self.xy * point.y + self.dx,
            self.yx * point.x + self.yy * point.y + self.dy,
        )
    }

    /// Rotation by `degrees` around `center`, clockwise in the sink's
    /// y-down space.
    pub(crate) fn rotation_around(degrees: f32, center: Point<f32>) -> Self {
        let radians = degrees.to_radians();
        let (sin_v, cos_v) = (radians.sin(), radians.cos());
        Self {
            xx: cos_v,
            yx: sin_v,
            xy: -sin_v,
            yy: cos_v,
            dx: sin_v * center.y + (1.0 - cos_v) * center.x,
            dy: -sin_v * center.x + (1.0 - cos_v) * center.y,
        }
    }

    /// Mirror about the horizontal line through `center`.
    pub(crate) fn vertical_mirror(center: Point<f32>) -> Self {
        Self {
            yy: -1.0,
            dy: 2.0 * center.y,
            ..Self::IDENTITY
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl MulAssign for Transform {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul for Transform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        fn muladdmul(a: f32, b: f32, c: f32, d: f32) -> f32 {
            a * b + c * d
        }
        Self {
            xx: muladdmul(self.xx, rhs.xx, self.xy, rhs.yx),
            xy: muladdmul(self.xx, rhs.xy, self.xy, rhs.yy),
            dx: muladdmul(self.xx, rhs.dx, self.xy, rhs.dy) + self.dx,
            yx: muladdmul(self.yx, rhs.xx, self.yy, rhs.yx),
            yy: muladdmul(self.yx, rhs.xy, self.yy, rhs.yy),
            dy: muladdmul(self.yx, rhs.dx, self.yy, rhs.dy) + self.dy,
        }
    }
}

impl TryFrom<&Paint> for Transform {
    type Error = PaintError;

    /// Builds the sink-space transform for a transform-kind paint.
    ///
    /// The graph is y-up while the sink is y-down: transform centers and
    /// translations have their y term negated, rotation flips direction,
    /// and the matrix variant negates its off-diagonal and dy terms when
    /// converting from the graph's column major layout.
    fn try_from(paint: &Paint) -> Result<Self, Self::Error> {
        match paint {
            Paint::Transform {
                xx,
                yx,
                xy,
                yy,
                dx,
                dy,
                ..
            } => Ok(Transform {
                xx: *xx,
                yx: -*yx,
                xy: -*xy,
                yy: *yy,
                dx: *dx,
                dy: -*dy,
            }),
            Paint::Translate { dx, dy, .. } => Ok(Transform {
                dx: *dx,
                dy: -*dy,
                ..Default::default()
            }),
            Paint::Scale {
                scale_x,
                scale_y,
                around_center,
                ..
            } => {
                let center = flip_center(*around_center);
                Ok(Transform {
                    xx: *scale_x,
                    yy: *scale_y,
                    dx: center.x - scale_x * center.x,
                    dy: center.y - scale_y * center.y,
                    ..Default::default()
                })
            }
            Paint::Rotate {
                angle,
                around_center,
                ..
            } => {
                // Graph angles turn counter-clockwise, sink rotation is
                // clockwise.
                let degrees = -angle.to_f32() * 180.0;
                Ok(Transform::rotation_around(degrees, flip_center(*around_center)))
            }
            Paint::Skew {
                x_skew_angle,
                y_skew_angle,
                around_center,
                ..
            } => {
                // Both angles are negated: y for the y-down axis flip, x
                // to skew in the direction the format specifies.
                let x_tan = skew_factor(-x_skew_angle.to_f32() * 180.0);
                let y_tan = skew_factor(-y_skew_angle.to_f32() * 180.0);
                let center = flip_center(*around_center);
                Ok(Transform {
                    xy: x_tan,
                    yx: y_tan,
                    dx: -x_tan * center.y,
                    dy: -y_tan * center.x,
                    ..Default::default()
                })
            }
            _ => Err(PaintError::UnsupportedPaint),
        }
    }
}

/// Converts an optional y-up transform center into sink coordinates.
fn flip_center(center: Option<Point<f32>>) -> Point<f32> {
    let center = center.unwrap_or_default();
    Point::new(center.x, -center.y)
}

fn skew_factor(degrees: f32) -> f32 {
    let tan = degrees.to_radians().tan();
    if tan.abs() <= NEARLY_ZERO {
        0.0
    } else {
        tan
    }
}
