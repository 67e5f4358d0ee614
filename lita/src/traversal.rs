//! Depth-first evaluation of paint graphs.

use alloc::vec::Vec;
use core::ops::{Deref, DerefMut, Range};

use font_types::{BoundingBox, GlyphId};

use crate::{
    brush::{resolve_brush, resolve_color, Brush, Color},
    error::PaintError,
    paint::{CompositeMode, OutlineProvider, Paint, PaintProvider, PaintRef, RootTransform},
    painter::ColorPainter,
    path::Path,
    transform::Transform,
};

#[cfg(any(test, feature = "std"))]
mod ref_set {
    pub(super) type RefSet = std::collections::HashSet<crate::paint::PaintRef>;
}

#[cfg(not(any(test, feature = "std")))]
mod ref_set {
    use crate::paint::PaintRef;

    /// A subset of the `HashSet` interface that pretends every insertion
    /// is new.
    ///
    /// Used in `no_std` builds where cycle detection degrades to the
    /// traversal depth check alone, which still bounds every walk.
    #[derive(Default)]
    pub(super) struct RefSet;

    impl RefSet {
        pub fn insert(&mut self, _value: PaintRef) -> bool {
            true
        }

        pub fn remove(&mut self, _value: &PaintRef) {}
    }
}

/// Depth at which traversal stops and reports an error.
///
/// Prevents stack overflows on deeply nested (but acyclic) graphs and
/// stands in for cycle detection in `no_std` builds. The limit matches
/// HarfBuzz's `HB_MAX_NESTING_LEVEL`.
const MAX_TRAVERSAL_DEPTH: usize = 64;

/// Set of paint references on the active traversal path.
///
/// This is a call-stack mirror, not an all-time visited marker: an entry
/// lives exactly as long as the recursive visit of its node. [`enter`]
/// returns a guard that removes the entry and releases the depth slot when
/// dropped, so release happens on every exit path, including failures.
///
/// [`enter`]: VisitedSet::enter
#[derive(Default)]
pub(crate) struct VisitedSet {
    active: ref_set::RefSet,
    depth: usize,
}

impl VisitedSet {
    /// Marks `paint` as being visited.
    ///
    /// Fails if the reference is already on the active path (a cycle in
    /// the graph) or if the nesting depth is exhausted.
    pub fn enter(&mut self, paint: PaintRef) -> Result<VisitGuard<'_>, PaintError> {
        if self.depth >= MAX_TRAVERSAL_DEPTH {
            return Err(PaintError::DepthLimitExceeded);
        }
        if !self.active.insert(paint) {
            return Err(PaintError::PaintCycleDetected);
        }
        self.depth += 1;
        Ok(VisitGuard { set: self, paint })
    }
}

/// Guard for one [`VisitedSet`] entry.
///
/// Derefs to the set so it can be handed down to recursive calls.
pub(crate) struct VisitGuard<'a> {
    set: &'a mut VisitedSet,
    paint: PaintRef,
}

impl Deref for VisitGuard<'_> {
    type Target = VisitedSet;

    fn deref(&self) -> &Self::Target {
        self.set
    }
}

impl DerefMut for VisitGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.set
    }
}

impl Drop for VisitGuard<'_> {
    fn drop(&mut self) {
        self.set.depth -= 1;
        self.set.active.remove(&self.paint);
    }
}

/// Per-node-kind actions of a traversal.
///
/// The shared walk in [`Walker`] owns node resolution, cycle detection and
/// child enumeration; rendering and bounds computation differ only in
/// their visitor. Push and pop calls arrive strictly balanced.
pub(crate) trait PaintVisitor {
    /// Called for a glyph outline leaf; `fill` names the subgraph painted
    /// within the outline.
    fn glyph(
        &mut self,
        walker: &Walker<'_>,
        visited: &mut VisitedSet,
        glyph_id: GlyphId,
        fill: PaintRef,
    ) -> Result<(), PaintError>;

    /// Called for a fill-kind node reached outside of a glyph leaf.
    fn fill(&mut self, paint: &Paint);

    fn push_transform(&mut self, transform: Transform);
    fn pop_transform(&mut self);
    fn push_clip(&mut self, path: &Path);
    fn pop_clip(&mut self);
    fn push_layer(&mut self, mode: CompositeMode);
    fn pop_layer(&mut self);
}

/// Shared depth-first walk over a paint graph.
pub(crate) struct Walker<'a> {
    pub graph: &'a dyn PaintProvider,
    pub outlines: &'a dyn OutlineProvider,
}

impl Walker<'_> {
    /// Resolves a glyph's root paint and walks its graph, applying the
    /// glyph's precomputed clip region if it has one.
    pub fn walk_glyph(
        &self,
        glyph_id: GlyphId,
        root_transform: RootTransform,
        visited: &mut VisitedSet,
        visitor: &mut impl PaintVisitor,
    ) -> Result<(), PaintError> {
        let root = self
            .graph
            .root_paint(glyph_id, root_transform)
            .ok_or(PaintError::GlyphNotFound(glyph_id))?;
        let clip = self.graph.clip_region(glyph_id);
        if let Some(path) = &clip {
            visitor.push_clip(path);
        }
        let result = self.walk(root, visited, visitor);
        if clip.is_some() {
            visitor.pop_clip();
        }
        result
    }

    /// Walks the subgraph rooted at `paint`.
    ///
    /// Failures abort the current subtree and propagate; anything already
    /// emitted for earlier siblings remains with the visitor.
    pub fn walk(
        &self,
        paint: PaintRef,
        visited: &mut VisitedSet,
        visitor: &mut impl PaintVisitor,
    ) -> Result<(), PaintError> {
        let mut visited = visited.enter(paint)?;
        let node = self
            .graph
            .paint(paint)
            .ok_or(PaintError::UnresolvedPaint(paint))?;
        match &node {
            Paint::Layers { range } => {
                for index in range.clone() {
                    let layer = self
                        .graph
                        .layer(index)
                        .ok_or(PaintError::UnresolvedLayer(index))?;
                    self.walk(layer, &mut visited, visitor)?;
                }
                Ok(())
            }
            Paint::Glyph { glyph_id, paint } => {
                visitor.glyph(self, &mut visited, *glyph_id, *paint)
            }
            Paint::ColorGlyph { glyph_id } => {
                self.walk_glyph(*glyph_id, RootTransform::Omit, &mut visited, visitor)
            }
            Paint::Solid { .. }
            | Paint::LinearGradient { .. }
            | Paint::RadialGradient { .. }
            | Paint::SweepGradient { .. } => {
                visitor.fill(&node);
                Ok(())
            }
            Paint::Transform { paint, .. }
            | Paint::Translate { paint, .. }
            | Paint::Scale { paint, .. }
            | Paint::Rotate { paint, .. }
            | Paint::Skew { paint, .. } => {
                let transform = Transform::try_from(&node)?;
                visitor.push_transform(transform);
                let result = self.walk(*paint, &mut visited, visitor);
                visitor.pop_transform();
                result
            }
            Paint::Composite {
                source,
                mode,
                backdrop,
            } => {
                // The backdrop renders into its own unblended layer so
                // that overlap inside it cannot take part in the blend
                // with content below the composite.
                visitor.push_layer(CompositeMode::SrcOver);
                let mut result = self.walk(*backdrop, &mut visited, visitor);
                if result.is_ok() {
                    visitor.push_layer(*mode);
                    result = self.walk(*source, &mut visited, visitor);
                    visitor.pop_layer();
                }
                visitor.pop_layer();
                result
            }
        }
    }
}

/// Visitor that forwards the walk to a [`ColorPainter`] sink.
pub(crate) struct RenderVisitor<'a, P: ColorPainter> {
    pub painter: &'a mut P,
    pub palette: &'a [Color],
    pub foreground: Color,
}

impl<P: ColorPainter> PaintVisitor for RenderVisitor<'_, P> {
    fn glyph(
        &mut self,
        walker: &Walker<'_>,
        visited: &mut VisitedSet,
        glyph_id: GlyphId,
        fill: PaintRef,
    ) -> Result<(), PaintError> {
        let path = walker
            .outlines
            .outline(glyph_id)
            .ok_or(PaintError::OutlineNotFound(glyph_id))?;
        // One-level lookahead: a glyph whose child is a plain fill is
        // drawn as a single filled path, which renders the same as the
        // clipped traversal below in fewer sink operations.
        if let Some(fill_paint) = walker.graph.paint(fill) {
            if fill_paint.is_fill() {
                if let Some((brush, brush_transform)) =
                    resolve_brush(&fill_paint, self.palette, self.foreground)
                {
                    self.painter.fill_path(&path, &brush, brush_transform);
                }
                return Ok(());
            }
        }
        self.painter.push_clip(&path);
        let result = walker.walk(fill, visited, self);
        self.painter.pop_clip();
        result
    }

    fn fill(&mut self, paint: &Paint) {
        // A fill that cannot be resolved (such as an out of range palette
        // index) drops only itself; the traversal carries on.
        if let Some((brush, brush_transform)) =
            resolve_brush(paint, self.palette, self.foreground)
        {
            self.painter.fill(&brush, brush_transform);
        }
    }

    fn push_transform(&mut self, transform: Transform) {
        self.painter.push_transform(transform);
    }

    fn pop_transform(&mut self) {
        self.painter.pop_transform();
    }

    fn push_clip(&mut self, path: &Path) {
        self.painter.push_clip(path);
    }

    fn pop_clip(&mut self) {
        self.painter.pop_clip();
    }

    fn push_layer(&mut self, mode: CompositeMode) {
        self.painter.push_layer(mode);
    }

    fn pop_layer(&mut self) {
        self.painter.pop_layer();
    }
}

/// Visitor that accumulates the bounding box of every outline leaf under
/// the running transform, without touching a sink.
#[derive(Default)]
pub(crate) struct BoundsVisitor {
    transform: Transform,
    saved: Vec<Transform>,
    pub bounds: Option<BoundingBox<f32>>,
}

impl PaintVisitor for BoundsVisitor {
    fn glyph(
        &mut self,
        walker: &Walker<'_>,
        _visited: &mut VisitedSet,
        glyph_id: GlyphId,
        _fill: PaintRef,
    ) -> Result<(), PaintError> {
        // The fill subgraph is clipped to the outline, so only the
        // outline itself contributes extent.
        let path = walker
            .outlines
            .outline(glyph_id)
            .ok_or(PaintError::OutlineNotFound(glyph_id))?;
        if let Some(glyph_bounds) = path.control_box(&self.transform) {
            self.bounds = Some(match self.bounds {
                Some(bounds) => union(bounds, glyph_bounds),
                None => glyph_bounds,
            });
        }
        Ok(())
    }

    fn fill(&mut self, _paint: &Paint) {
        // Fills have no intrinsic extent.
    }

    fn push_transform(&mut self, transform: Transform) {
        self.saved.push(self.transform);
        self.transform = self.transform * transform;
    }

    fn pop_transform(&mut self) {
        if let Some(previous) = self.saved.pop() {
            self.transform = previous;
        }
    }

    fn push_clip(&mut self, _path: &Path) {
        // Bounds are computed unclipped.
    }

    fn pop_clip(&mut self) {}

    fn push_layer(&mut self, _mode: CompositeMode) {
        // Both composite operands contribute to the union regardless of
        // the blend mode.
    }

    fn pop_layer(&mut self) {}
}

fn union(a: BoundingBox<f32>, b: BoundingBox<f32>) -> BoundingBox<f32> {
    BoundingBox {
        x_min: a.x_min.min(b.x_min),
        y_min: a.y_min.min(b.y_min),
        x_max: a.x_max.max(b.x_max),
        y_max: a.y_max.max(b.y_max),
    }
}

/// Paints a flat layered color glyph: each layer is an outline filled
/// with a palette color, bottom to top.
pub(crate) fn paint_flat_layers(
    walker: &Walker<'_>,
    range: Range<usize>,
    palette: &[Color],
    foreground: Color,
    painter: &mut impl ColorPainter,
) -> Result<(), PaintError> {
    for index in range {
        let (glyph_id, palette_index) = walker
            .graph
            .flat_layer(index)
            .ok_or(PaintError::UnresolvedLayer(index))?;
        // An out of range palette index drops the layer, not the glyph.
        let Some(color) = resolve_color(palette_index, 1.0, palette, foreground) else {
            continue;
        };
        let Some(path) = walker.outlines.outline(glyph_id) else {
            continue;
        };
        painter.fill_path(&path, &Brush::Solid(color), None);
    }
    Ok(())
}

/// Bounding box of a flat layered color glyph.
pub(crate) fn flat_layer_bounds(
    walker: &Walker<'_>,
    range: Range<usize>,
) -> Result<Option<BoundingBox<f32>>, PaintError> {
    let mut bounds = None;
    for index in range {
        let (glyph_id, _) = walker
            .graph
            .flat_layer(index)
            .ok_or(PaintError::UnresolvedLayer(index))?;
        let Some(path) = walker.outlines.outline(glyph_id) else {
            continue;
        };
        if let Some(layer_bounds) = path.control_box(&Transform::default()) {
            bounds = Some(match bounds {
                Some(bounds) => union(bounds, layer_bounds),
                None => layer_bounds,
            });
        }
    }
    Ok(bounds)
}
