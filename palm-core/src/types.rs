/// Identifier for a segment in a [`crate::segment::PalmTree`].
///
/// This is an index into `PalmTree::segments`, and is only meaningful within
/// the lifetime of a given `PalmTree` instance.
pub type SegmentId = usize;
