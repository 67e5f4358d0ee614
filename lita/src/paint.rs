//! Paint graph data model and the capability traits that supply it.

use alloc::vec::Vec;
use core::ops::Range;

use font_types::{F2Dot14, GlyphId, Point};

use crate::path::Path;

/// Unique identifier of a node in a paint graph.
pub type PaintId = usize;

/// Reference to a node in an externally owned paint graph.
///
/// References are small values resolved on demand through a
/// [`PaintProvider`]; the evaluator never owns graph data. Two references
/// are equal iff they name the same node and carry the same root transform
/// flag, which matters for cycle detection: the synthetic root reference of
/// a glyph is a different graph position than a plain reference to the same
/// node.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct PaintRef {
    /// Identifier of the referenced node.
    pub id: PaintId,
    /// True if the source folds the font's root transform into the node.
    ///
    /// Only ever set on the reference returned by
    /// [`PaintProvider::root_paint`].
    pub insert_root_transform: bool,
}

impl PaintRef {
    /// Creates a plain reference to the node with the given identifier.
    pub const fn new(id: PaintId) -> Self {
        Self {
            id,
            insert_root_transform: false,
        }
    }
}

/// Selects whether the font's root transform is folded into a glyph's root
/// paint.
///
/// The root transform is applied once for the outermost glyph of a draw
/// call; color glyphs nested inside another glyph's graph are resolved
/// without it.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RootTransform {
    Include,
    Omit,
}

/// Behavior of a gradient outside of its defined stop range.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum Extend {
    /// Clamp to the outermost stop colors.
    #[default]
    Pad,
    /// Tile the stop range.
    Repeat,
    /// Tile the stop range, mirroring every other repetition.
    Reflect,
}

/// Mode for compositing the source subgraph of a composite node onto its
/// backdrop subgraph.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CompositeMode {
    // Porter-Duff modes.
    Clear,
    Src,
    Dest,
    SrcOver,
    DestOver,
    SrcIn,
    DestIn,
    SrcOut,
    DestOut,
    SrcAtop,
    DestAtop,
    Xor,
    Plus,
    // Separable color blend modes.
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Multiply,
    // Non-separable color blend modes.
    HslHue,
    HslSaturation,
    HslColor,
    HslLuminosity,
}

/// Color stop as encoded on a color line: an offset along the gradient
/// axis, a palette index and a 2.14 fixed point alpha.
///
/// The encoding does not guarantee any stop order; consumers sort before
/// use.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ColorStop {
    pub offset: f32,
    pub palette_index: u16,
    pub alpha: F2Dot14,
}

/// Color stops of a gradient together with its extend mode.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct ColorLine {
    pub extend: Extend,
    pub stops: Vec<ColorStop>,
}

/// Decoded paint graph node.
///
/// Nodes are produced on demand by a [`PaintProvider`] and carry their
/// payload with numeric values decoded, except where the evaluator owns
/// the conversion: alphas and angles keep their 2.14 fixed point wire
/// encoding (angles are fractions of a half turn). All geometry is in the
/// graph's y-up design space.
#[derive(Clone, PartialEq, Debug)]
pub enum Paint {
    /// Paint all layers in the given range of the shared layer list, in
    /// order, each independently.
    Layers { range: Range<usize> },
    /// Clip to the outline of `glyph_id` and apply the `paint` subgraph
    /// within it.
    Glyph { glyph_id: GlyphId, paint: PaintRef },
    /// Recurse into the root paint of another color glyph.
    ColorGlyph { glyph_id: GlyphId },
    /// Flat fill with a palette color.
    Solid { palette_index: u16, alpha: F2Dot14 },
    /// Gradient along the line `p0`-`p1`, rotated by the third point `p2`.
    LinearGradient {
        p0: Point<f32>,
        p1: Point<f32>,
        p2: Point<f32>,
        color_line: ColorLine,
    },
    /// Gradient between two circles.
    RadialGradient {
        c0: Point<f32>,
        r0: f32,
        c1: Point<f32>,
        r1: f32,
        color_line: ColorLine,
    },
    /// Gradient swept counter-clockwise around a center point between two
    /// angles.
    SweepGradient {
        center: Point<f32>,
        start_angle: F2Dot14,
        end_angle: F2Dot14,
        color_line: ColorLine,
    },
    /// Apply a general affine transformation to the child subgraph.
    ///
    /// The matrix is in the graph's column major, y-up layout.
    Transform {
        xx: f32,
        yx: f32,
        xy: f32,
        yy: f32,
        dx: f32,
        dy: f32,
        paint: PaintRef,
    },
    Translate {
        dx: f32,
        dy: f32,
        paint: PaintRef,
    },
    Scale {
        scale_x: f32,
        scale_y: f32,
        around_center: Option<Point<f32>>,
        paint: PaintRef,
    },
    Rotate {
        angle: F2Dot14,
        around_center: Option<Point<f32>>,
        paint: PaintRef,
    },
    Skew {
        x_skew_angle: F2Dot14,
        y_skew_angle: F2Dot14,
        around_center: Option<Point<f32>>,
        paint: PaintRef,
    },
    /// Composite the `source` subgraph onto the `backdrop` subgraph with
    /// the given mode, isolated from content below.
    Composite {
        source: PaintRef,
        mode: CompositeMode,
        backdrop: PaintRef,
    },
}

impl Paint {
    /// True for the node kinds that resolve to a fill.
    pub(crate) fn is_fill(&self) -> bool {
        matches!(
            self,
            Self::Solid { .. }
                | Self::LinearGradient { .. }
                | Self::RadialGradient { .. }
                | Self::SweepGradient { .. }
        )
    }
}

/// Source of decoded paint nodes for color glyph evaluation.
///
/// Implemented by whatever owns the font's decoded color data; the
/// evaluator only ever borrows it for the duration of a single draw or
/// bounds computation. Methods return `None` for malformed or missing
/// data; the evaluator turns that into a typed
/// [`PaintError`](crate::PaintError) where the failure is not recoverable.
pub trait PaintProvider {
    /// Resolves the node for the given reference.
    fn paint(&self, paint: PaintRef) -> Option<Paint>;

    /// Returns the entry at the given index of the shared layer list.
    fn layer(&self, index: usize) -> Option<PaintRef>;

    /// Returns the reference to the root node of a glyph's paint graph,
    /// or `None` if the glyph has no graph description.
    fn root_paint(&self, glyph_id: GlyphId, root_transform: RootTransform) -> Option<PaintRef>;

    /// Returns the precomputed clip region of a color glyph, in sink
    /// coordinates, if the font defines one.
    fn clip_region(&self, glyph_id: GlyphId) -> Option<Path> {
        let _ = glyph_id;
        None
    }

    /// Returns the layer range of a flat layered color glyph, or `None`
    /// if the glyph has no flat description.
    fn layered_glyph(&self, glyph_id: GlyphId) -> Option<Range<usize>> {
        let _ = glyph_id;
        None
    }

    /// Returns the outline glyph and palette index of an entry in the
    /// flat layer list.
    fn flat_layer(&self, index: usize) -> Option<(GlyphId, u16)> {
        let _ = index;
        None
    }

    /// Number of glyphs in the font's glyph id space.
    fn glyph_count(&self) -> u32 {
        0
    }
}

/// Provides filled outlines for the glyphs referenced by a paint graph.
///
/// Outline extraction wraps a shaping or scaling library and is expected
/// to deliver paths already converted to the sink's y-down coordinate
/// space.
pub trait OutlineProvider {
    /// Returns the outline path for the given glyph.
    fn outline(&self, glyph_id: GlyphId) -> Option<Path>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_equality_includes_root_transform_flag() {
        let plain = PaintRef::new(7);
        let root = PaintRef {
            id: 7,
            insert_root_transform: true,
        };
        assert_eq!(plain, PaintRef::new(7));
        assert_ne!(plain, root);
    }

    #[test]
    fn fill_kinds() {
        assert!(Paint::Solid {
            palette_index: 0,
            alpha: F2Dot14::from_f32(1.0)
        }
        .is_fill());
        assert!(!Paint::ColorGlyph {
            glyph_id: GlyphId::new(1)
        }
        .is_fill());
        assert!(!Paint::Layers { range: 0..0 }.is_fill());
    }
}
