//! Drawing surface interface.
//!
//! A renderer only needs to know how to clear itself and how to stroke one
//! segment; [`render`] drives it over a whole tree.

use crate::segment::{PalmTree, Segment};

pub trait Canvas {
    /// Removes everything drawn so far.
    fn clear(&mut self);

    /// Draws one segment with its own geometry, width, color tag and cap.
    fn stroke(&mut self, segment: &Segment);
}

/// Clears `canvas`, then strokes every segment of `tree` in generation order.
pub fn render(tree: &PalmTree, canvas: &mut impl Canvas) {
    canvas.clear();
    for segment in tree {
        canvas.stroke(segment);
    }
}
