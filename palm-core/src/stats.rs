use glam::Vec2;

use crate::segment::{PalmTree, SegmentKind};

/// Counts and extent of a generated tree.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TreeStats {
    pub trunks: usize,
    pub branches: usize,
    pub leaves: usize,
    pub max_level: Option<u32>,
    /// Axis-aligned `(min, max)` corners over all endpoints.
    pub bounds: Option<(Vec2, Vec2)>,
}

impl TreeStats {
    pub fn of(tree: &PalmTree) -> Self {
        let mut stats = Self::default();

        for s in tree {
            match s.kind {
                SegmentKind::Trunk => stats.trunks += 1,
                SegmentKind::Branch => stats.branches += 1,
                SegmentKind::Leaf => stats.leaves += 1,
            }
            stats.max_level = Some(stats.max_level.map_or(s.level, |l| l.max(s.level)));

            let seg_min = s.from.min(s.to);
            let seg_max = s.from.max(s.to);
            stats.bounds = Some(match stats.bounds {
                Some((min, max)) => (min.min(seg_min), max.max(seg_max)),
                None => (seg_min, seg_max),
            });
        }

        stats
    }

    pub fn total(&self) -> usize {
        self.trunks + self.branches + self.leaves
    }

    /// Size of [`TreeStats::bounds`], or zero for an empty tree.
    pub fn extent(&self) -> Vec2 {
        self.bounds.map_or(Vec2::ZERO, |(min, max)| max - min)
    }
}
