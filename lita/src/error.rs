//! Error types for paint graph evaluation.

use core::fmt;

use font_types::GlyphId;

use crate::paint::PaintRef;

/// Errors that may occur when evaluating a color glyph's paint graph.
#[derive(Clone, Debug)]
pub enum PaintError {
    /// A node was reached again while it was still being evaluated.
    PaintCycleDetected,
    /// Traversal exceeded the maximum nesting depth.
    DepthLimitExceeded,
    /// The graph source could not produce a node for the given reference.
    UnresolvedPaint(PaintRef),
    /// The shared layer list has no entry at the given index.
    UnresolvedLayer(usize),
    /// A paint kind that cannot appear at this position in the graph.
    UnsupportedPaint,
    /// The requested glyph has no color description.
    GlyphNotFound(GlyphId),
    /// The outline source could not produce a path for the glyph.
    OutlineNotFound(GlyphId),
}

impl fmt::Display for PaintError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::PaintCycleDetected => write!(f, "A cycle was detected in the paint graph"),
            Self::DepthLimitExceeded => write!(f, "Paint graph nesting exceeds the depth limit"),
            Self::UnresolvedPaint(paint) => {
                write!(f, "No paint node for reference {}", paint.id)
            }
            Self::UnresolvedLayer(index) => write!(f, "No layer at index {index}"),
            Self::UnsupportedPaint => write!(f, "Unsupported paint node kind"),
            Self::GlyphNotFound(gid) => write!(f, "No color glyph found for glyph {gid}"),
            Self::OutlineNotFound(gid) => write!(f, "No outline found for glyph {gid}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PaintError {}
