//! Sink interface receiving a color glyph as a sequence of drawing
//! operations.

use crate::{brush::Brush, paint::CompositeMode, path::Path, transform::Transform};

/// Interface for receiving the sequence of drawing and compositing
/// commands that represent a flattened paint graph.
///
/// The sink works in a y-down coordinate space; all geometry handed to it
/// has already been converted from the graph's y-up design space.
///
/// Transform, clip and layer state is strictly scoped: every push receives
/// a matching pop, in reverse order, on every evaluation outcome including
/// failures. Sibling subgraphs therefore never observe each other's
/// accumulated state. A fill applies to the area selected by the clips and
/// transforms currently in effect.
pub trait ColorPainter {
    /// Concatenates `transform` onto the current transformation.
    fn push_transform(&mut self, transform: Transform);

    /// Restores the transformation that was in effect before the matching
    /// [`push_transform`](Self::push_transform).
    fn pop_transform(&mut self);

    /// Intersects the current clip with the filled region of `path`.
    fn push_clip(&mut self, path: &Path);

    /// Restores the clip that was in effect before the matching
    /// [`push_clip`](Self::push_clip).
    fn pop_clip(&mut self);

    /// Opens an offscreen layer. When the matching
    /// [`pop_layer`](Self::pop_layer) closes it, the layer's content is
    /// composited onto what is below using `mode`.
    fn push_layer(&mut self, mode: CompositeMode);

    /// Closes the most recently opened layer and composites it.
    fn pop_layer(&mut self);

    /// Fills the current clip area with `brush`.
    ///
    /// `brush_transform`, when present, positions the brush's geometry
    /// within the current coordinate space; it does not apply to
    /// subsequent operations.
    fn fill(&mut self, brush: &Brush, brush_transform: Option<Transform>);

    /// Fills the region of `path` with `brush` directly, without touching
    /// the clip state.
    fn fill_path(&mut self, path: &Path, brush: &Brush, brush_transform: Option<Transform>);
}
