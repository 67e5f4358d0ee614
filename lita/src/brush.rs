//! Resolution of fill-kind paints into renderer-ready brushes.

use alloc::vec::Vec;
use core::cmp::Ordering;

use font_types::Point;

use crate::{
    paint::{ColorLine, Extend, Paint},
    transform::Transform,
};

#[cfg(feature = "libm")]
#[allow(unused_imports)]
use core_maths::*;

/// Reserved palette index selecting the caller-supplied foreground color.
pub const FOREGROUND_PALETTE_INDEX: u16 = 0xFFFF;

/// 32-bit RGBA color value.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Creates a new color with the given component values.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Offset and resolved color of a transition point in a gradient.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

/// Renderer-ready fill for a region of a color glyph.
///
/// All gradient geometry is in sink (y-down) coordinates.
#[derive(Clone, PartialEq, Debug)]
pub enum Brush {
    /// Fill with a single resolved color.
    Solid(Color),
    /// Gradient along the axis from `p0` to `p1`, with stop offsets
    /// normalized so that the renderer's tiling of the extend mode
    /// operates over the canonical `[0, 1]` range.
    LinearGradient {
        p0: Point<f32>,
        p1: Point<f32>,
        stops: Vec<GradientStop>,
        extend: Extend,
    },
    /// Two point conical gradient between the circles around `c0` and
    /// `c1`. Stop offsets are passed through as encoded.
    RadialGradient {
        c0: Point<f32>,
        r0: f32,
        c1: Point<f32>,
        r1: f32,
        stops: Vec<GradientStop>,
        extend: Extend,
    },
    /// Angular gradient around `center` covering `start_angle` to
    /// `end_angle` in clockwise degrees.
    ///
    /// The arc's orientation in the glyph is carried separately as a
    /// brush transform; see [`resolve_brush`].
    SweepGradient {
        center: Point<f32>,
        start_angle: f32,
        end_angle: f32,
        stops: Vec<GradientStop>,
        extend: Extend,
    },
}

/// Resolves a palette reference and combines the referenced color's alpha
/// with the 14-bit `alpha` already converted to a fraction.
///
/// The reserved index 0xFFFF selects the foreground color. Returns `None`
/// for any other index outside the palette.
pub(crate) fn resolve_color(
    palette_index: u16,
    alpha: f32,
    palette: &[Color],
    foreground: Color,
) -> Option<Color> {
    let color = if palette_index == FOREGROUND_PALETTE_INDEX {
        foreground
    } else {
        *palette.get(usize::from(palette_index))?
    };
    Some(Color {
        a: (f32::from(color.a) * alpha) as u8,
        ..color
    })
}

/// Resolves and sorts the stops of a color line.
///
/// The encoding does not guarantee stop order, so the stops are stable
/// sorted by offset before use. Returns `None` for an empty line or any
/// out of range palette index.
fn resolve_stops(
    color_line: &ColorLine,
    palette: &[Color],
    foreground: Color,
) -> Option<Vec<GradientStop>> {
    if color_line.stops.is_empty() {
        return None;
    }
    let mut stops = Vec::with_capacity(color_line.stops.len());
    for stop in &color_line.stops {
        stops.push(GradientStop {
            offset: stop.offset,
            color: resolve_color(stop.palette_index, stop.alpha.to_f32(), palette, foreground)?,
        });
    }
    stops.sort_by(|a, b| a.offset.partial_cmp(&b.offset).unwrap_or(Ordering::Equal));
    Some(stops)
}

/// Resolves a fill-kind paint into a brush and an optional brush-space
/// transform.
///
/// Returns `None` when nothing can be drawn: a palette index outside the
/// palette, a color line without stops, or an empty tiled stop range. A
/// gradient that degenerates (a single stop, or a linear gradient with no
/// usable axis) resolves to a solid brush instead of failing.
pub(crate) fn resolve_brush(
    paint: &Paint,
    palette: &[Color],
    foreground: Color,
) -> Option<(Brush, Option<Transform>)> {
    match paint {
        Paint::Solid {
            palette_index,
            alpha,
        } => {
            let color = resolve_color(*palette_index, alpha.to_f32(), palette, foreground)?;
            Some((Brush::Solid(color), None))
        }
        Paint::LinearGradient {
            p0,
            p1,
            p2,
            color_line,
        } => {
            let mut stops = resolve_stops(color_line, palette, foreground)?;
            if stops.len() == 1 {
                return Some((Brush::Solid(stops[0].color), None));
            }
            let mut p0 = flip_y(*p0);
            let p1 = flip_y(*p1);
            let p2 = flip_y(*p2);
            // Coincident or collinear points leave no gradient axis; fall
            // back to the first stop's color.
            if p1 == p0 || p2 == p0 || cross(p1 - p0, p2 - p0) == 0.0 {
                return Some((Brush::Solid(stops[0].color), None));
            }
            // The second point only sets the gradient's extent along its
            // rotated axis: the effective end point is the projection of
            // p0p1 onto the line through p0 perpendicular to p0p2.
            let perpendicular = {
                let v = p2 - p0;
                Point::new(v.y, -v.x)
            };
            let mut p3 = p0 + project(p1 - p0, perpendicular);

            if stops[0].offset == stops[stops.len() - 1].offset {
                if color_line.extend != Extend::Pad {
                    return None;
                }
                // All stops share one offset. With pad tiling everything
                // before that spot takes the first color and everything
                // after the last; a synthetic stop one unit out paints
                // the same gradient once offsets are normalized.
                let mut synthetic = stops[stops.len() - 1];
                synthetic.offset += 1.0;
                stops.push(synthetic);
            }

            // Move the axis end points to the stop extrema and rescale
            // the offsets so tiling happens over [0, 1].
            let first_offset = stops[0].offset;
            let last_offset = stops[stops.len() - 1].offset;
            if first_offset != 0.0 || last_offset != 1.0 {
                let axis = p3 - p0;
                p3 = p0 + axis * last_offset;
                p0 = p0 + axis * first_offset;
                let scale = 1.0 / (last_offset - first_offset);
                for stop in &mut stops {
                    stop.offset = (stop.offset - first_offset) * scale;
                }
            }
            Some((
                Brush::LinearGradient {
                    p0,
                    p1: p3,
                    stops,
                    extend: color_line.extend,
                },
                None,
            ))
        }
        Paint::RadialGradient {
            c0,
            r0,
            c1,
            r1,
            color_line,
        } => {
            let stops = resolve_stops(color_line, palette, foreground)?;
            if stops.len() == 1 {
                return Some((Brush::Solid(stops[0].color), None));
            }
            Some((
                Brush::RadialGradient {
                    c0: flip_y(*c0),
                    r0: *r0,
                    c1: flip_y(*c1),
                    r1: *r1,
                    stops,
                    extend: color_line.extend,
                },
                None,
            ))
        }
        Paint::SweepGradient {
            center,
            start_angle,
            end_angle,
            color_line,
        } => {
            let stops = resolve_stops(color_line, palette, foreground)?;
            if stops.len() == 1 {
                return Some((Brush::Solid(stops[0].color), None));
            }
            let center = flip_y(*center);
            let start = wrap_degrees(start_angle.to_f32() * 180.0);
            let end = wrap_degrees(end_angle.to_f32() * 180.0);
            // The arc runs counter-clockwise from the start angle,
            // wrapping through 360 when the end angle does not exceed it.
            let sector = if end > start {
                end - start
            } else {
                end + 360.0 - start
            };
            // Orient the arc: rotate to the start angle, then mirror to
            // turn the counter-clockwise angle direction into the sink's
            // clockwise one.
            let orientation = Transform::vertical_mirror(center)
                * Transform::rotation_around(start, center);
            Some((
                Brush::SweepGradient {
                    center,
                    start_angle: 0.0,
                    end_angle: sector,
                    stops,
                    extend: color_line.extend,
                },
                Some(orientation),
            ))
        }
        _ => None,
    }
}

fn flip_y(point: Point<f32>) -> Point<f32> {
    Point::new(point.x, -point.y)
}

fn dot(a: Point<f32>, b: Point<f32>) -> f32 {
    a.x * b.x + a.y * b.y
}

fn cross(a: Point<f32>, b: Point<f32>) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Projection of the vector `a` onto the vector `b`.
fn project(a: Point<f32>, b: Point<f32>) -> Point<f32> {
    let length = (b.x * b.x + b.y * b.y).sqrt();
    if length == 0.0 {
        return Point::default();
    }
    b / length * (dot(a, b) / length)
}

fn wrap_degrees(degrees: f32) -> f32 {
    let degrees = degrees % 360.0;
    if degrees < 0.0 {
        degrees + 360.0
    } else {
        degrees
    }
}
