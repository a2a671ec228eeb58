use crate::types::SegmentId;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Trunk,
    Branch,
    /// Terminal frond; never has children.
    Leaf,
}

/// Color tag; the renderer decides the actual color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrokeColor {
    Wood,
    Foliage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineCap {
    Butt,
    Round,
}

/// One drawable line of the tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
    pub level: u32,
    pub kind: SegmentKind,
    pub width: f32,
    pub color: StrokeColor,
    pub cap: LineCap,
    pub parent: Option<SegmentId>,
}

impl Segment {
    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }

    /// Point at fraction `t` from `from` to `to`.
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.from.lerp(self.to, t)
    }

    /// Fraction along this segment closest to `p`, unclamped.
    ///
    /// Returns `0.0` for a zero-length segment.
    pub fn fraction_of(&self, p: Vec2) -> f32 {
        let d = self.to - self.from;
        let len2 = d.length_squared();
        if len2 == 0.0 {
            0.0
        } else {
            (p - self.from).dot(d) / len2
        }
    }
}

/// The ordered output of one generation run.
///
/// Segments are stored in generation order, so a parent always precedes its
/// children and iterating `segments` is a valid draw order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PalmTree {
    pub segments: Vec<Segment>,
}

impl PalmTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment and returns its id.
    pub(crate) fn push(&mut self, segment: Segment) -> SegmentId {
        let id = self.segments.len();
        self.segments.push(segment);
        id
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id)
    }

    /// Ids of the segments that sprouted from `parent`, in generation order.
    pub fn children_of(&self, parent: SegmentId) -> impl Iterator<Item = SegmentId> + '_ {
        self.segments
            .iter()
            .enumerate()
            .skip(parent + 1)
            .filter_map(move |(id, s)| (s.parent == Some(parent)).then_some(id))
    }
}

impl<'a> IntoIterator for &'a PalmTree {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
