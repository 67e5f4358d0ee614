//! Evaluation of the paint graphs that describe OpenType color glyphs.
//!
//! A color glyph is a small directed graph of fill, gradient, transform
//! and composite nodes layered over glyph outlines. This crate walks such
//! a graph — supplied on demand through a [`PaintProvider`] — and either
//! emits the drawing operations for the glyph to a [`ColorPainter`] sink
//! or computes the bounding box the glyph will occupy, without drawing.
//!
//! The graph comes from an untrusted file and is not guaranteed to be
//! acyclic: reference cycles and pathological nesting end the evaluation
//! with an error instead of recursing without bound. All geometry handed
//! to the sink is converted from the format's y-up design space into the
//! sink's y-down space.
//!
//! This crate does not parse font tables, rasterize outlines or composite
//! pixels; those concerns live with the providers and the sink.

#![forbid(unsafe_code)]
#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;

mod brush;
mod error;
mod paint;
mod painter;
mod path;
mod transform;
mod traversal;


use core::ops::Range;

pub use brush::{Brush, Color, GradientStop, FOREGROUND_PALETTE_INDEX};
pub use error::PaintError;
pub use paint::{
    ColorLine, ColorStop, CompositeMode, Extend, OutlineProvider, Paint, PaintId, PaintProvider,
    PaintRef, RootTransform,
};
pub use painter::ColorPainter;
pub use path::{Path, PathElement, Pen};
pub use transform::Transform;

pub use font_types::{BoundingBox, F2Dot14, GlyphId, Point};

use traversal::{
    flat_layer_bounds, paint_flat_layers, BoundsVisitor, RenderVisitor, VisitedSet, Walker,
};

/// Reference to the color description of a single glyph.
#[derive(Clone)]
pub struct ColorGlyph<'a> {
    graph: &'a dyn PaintProvider,
    outlines: &'a dyn OutlineProvider,
    glyph_id: GlyphId,
    kind: ColorGlyphKind,
}

#[derive(Clone)]
enum ColorGlyphKind {
    /// The glyph is described by a paint graph.
    PaintGraph,
    /// The glyph is a flat list of colored outline layers.
    FlatLayers(Range<usize>),
}

impl ColorGlyph<'_> {
    /// Returns the glyph identifier that was used to retrieve this glyph.
    pub fn glyph_id(&self) -> GlyphId {
        self.glyph_id
    }

    /// Evaluates the glyph's color description and emits the resulting
    /// drawing operations to `painter`.
    ///
    /// Color references are resolved against `palette`, with the reserved
    /// index 0xFFFF replaced by `foreground`. On an error the operations
    /// already emitted for healthy parts of the graph remain with the
    /// sink; callers treating the glyph as unrenderable should discard
    /// them and fall back to a non-color representation.
    pub fn paint(
        &self,
        palette: &[Color],
        foreground: Color,
        painter: &mut impl ColorPainter,
    ) -> Result<(), PaintError> {
        let walker = Walker {
            graph: self.graph,
            outlines: self.outlines,
        };
        match &self.kind {
            ColorGlyphKind::PaintGraph => {
                let mut visited = VisitedSet::default();
                let mut visitor = RenderVisitor {
                    painter,
                    palette,
                    foreground,
                };
                walker.walk_glyph(
                    self.glyph_id,
                    RootTransform::Include,
                    &mut visited,
                    &mut visitor,
                )
            }
            ColorGlyphKind::FlatLayers(range) => {
                paint_flat_layers(&walker, range.clone(), palette, foreground, painter)
            }
        }
    }

    /// Evaluates the glyph's color description and returns the bounding
    /// box of everything it would draw, in sink coordinates.
    ///
    /// The box is computed from outline geometry under the composed
    /// transforms and ignores clip regions and blend modes; a glyph that
    /// draws nothing yields the default empty box.
    pub fn bounding_box(&self) -> Result<BoundingBox<f32>, PaintError> {
        let walker = Walker {
            graph: self.graph,
            outlines: self.outlines,
        };
        let bounds = match &self.kind {
            ColorGlyphKind::PaintGraph => {
                let mut visited = VisitedSet::default();
                let mut visitor = BoundsVisitor::default();
                walker.walk_glyph(
                    self.glyph_id,
                    RootTransform::Include,
                    &mut visited,
                    &mut visitor,
                )?;
                visitor.bounds
            }
            ColorGlyphKind::FlatLayers(range) => flat_layer_bounds(&walker, range.clone())?,
        };
        Ok(bounds.unwrap_or_default())
    }
}

/// Collection of the color glyphs of a font.
#[derive(Copy, Clone)]
pub struct ColorGlyphCollection<'a> {
    graph: &'a dyn PaintProvider,
    outlines: &'a dyn OutlineProvider,
}

impl<'a> ColorGlyphCollection<'a> {
    /// Creates a new collection over the given graph and outline sources.
    pub fn new(graph: &'a dyn PaintProvider, outlines: &'a dyn OutlineProvider) -> Self {
        Self { graph, outlines }
    }

    /// Returns the color glyph for the given glyph identifier, or `None`
    /// if the glyph has no color description.
    ///
    /// A glyph carrying both descriptions is evaluated as a paint graph.
    pub fn get(&self, glyph_id: GlyphId) -> Option<ColorGlyph<'a>> {
        let kind = if self
            .graph
            .root_paint(glyph_id, RootTransform::Include)
            .is_some()
        {
            ColorGlyphKind::PaintGraph
        } else {
            ColorGlyphKind::FlatLayers(self.graph.layered_glyph(glyph_id)?)
        };
        Some(ColorGlyph {
            graph: self.graph,
            outlines: self.outlines,
            glyph_id,
            kind,
        })
    }

    /// Returns an iterator over all color glyphs in the collection.
    pub fn iter(&self) -> impl Iterator<Item = ColorGlyph<'a>> + 'a {
        let copy = *self;
        (0..self.graph.glyph_count()).filter_map(move |gid| copy.get(GlyphId::new(gid)))
    }
}
