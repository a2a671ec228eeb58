//! Recursive branch generation.
//!
//! A run starts with one trunk at [`Params::origin`] pointing straight up
//! (−90° in a y-down coordinate system) and expands it recursively:
//! 1. A segment is emitted unless its level exceeds [`Params::max_depth`]
//!    or its length is below [`Params::min_segment_length`].
//! 2. One draw against [`Params::branch_probability`] decides whether it
//!    spawns children at all.
//! 3. Children are fanned evenly across `angle ± base_angle`, start at a
//!    random point on the upper part of their parent and are shorter by
//!    [`Params::length_reduction_factor`].
//! 4. From [`Params::leaf_level_threshold`] on, children are terminal
//!    leaves instead of further branches.

use glam::Vec2;

use crate::{
    params::Params,
    random::RandomSource,
    segment::{LineCap, PalmTree, Segment, SegmentKind, StrokeColor},
    types::SegmentId,
};

/// Direction of the trunk, in degrees. y grows downward, so this is "up".
pub const TRUNK_ANGLE: f32 = -90.0;

/// Generates a palm tree from `params`, consuming draws from `rng`.
///
/// The result lists segments in generation order (parents before children).
/// It is empty when the trunk itself fails the length floor, i.e. when
/// `trunk_length < min_segment_length`.
///
/// ### Parameters
/// - `params` - Normalized parameters; see [`Params::normalized`].
/// - `rng` - Source of uniform draws. Draws are taken in a fixed order
///   (probability gate, then branching point and jitter for each child), so
///   a replayed source reproduces the same tree.
pub fn generate(params: &Params, rng: &mut impl RandomSource) -> PalmTree {
    let mut builder = Builder {
        params,
        rng,
        tree: PalmTree::new(),
    };
    builder.expand(params.origin, TRUNK_ANGLE, params.trunk_length, 0, None);

    log::debug!(
        "generated palm tree: {} segments (max_depth={}, p={})",
        builder.tree.len(),
        params.max_depth,
        params.branch_probability
    );
    builder.tree
}

/// Maps a raw draw `t ∈ [0, 1)` to a branching point at or above `threshold`.
///
/// Draws already in `[threshold, 1)` are kept; lower ones are stretched into
/// that range as `threshold + (1 - threshold) * t`.
#[inline]
pub fn branching_point(t: f32, threshold: f32) -> f32 {
    if t < threshold {
        threshold + (1.0 - threshold) * t
    } else {
        t
    }
}

/// Number of children of a segment at `level`, or `None` on overflow.
#[inline]
pub fn fan_out(params: &Params, level: u32) -> Option<u32> {
    level
        .checked_mul(params.branch_density_increase)
        .and_then(|extra| extra.checked_add(params.branches_per_node))
}

/// Unit direction for an angle given in degrees.
#[inline]
fn direction(angle_deg: f32) -> Vec2 {
    Vec2::from_angle(angle_deg.to_radians())
}

struct Builder<'a, R> {
    params: &'a Params,
    rng: &'a mut R,
    tree: PalmTree,
}

impl<R: RandomSource> Builder<'_, R> {
    /// Emits the segment starting at `origin` and recurses into its children.
    ///
    /// Returns without emitting anything when the depth or length guard
    /// fails.
    fn expand(
        &mut self,
        origin: Vec2,
        angle: f32,
        length: f32,
        level: u32,
        parent: Option<SegmentId>,
    ) {
        let p = self.params;
        if level > p.max_depth || length < p.min_segment_length {
            return;
        }

        let woody = level < p.leaf_level_threshold;
        let segment = Segment {
            from: origin,
            to: origin + direction(angle) * length,
            level,
            kind: if level == 0 {
                SegmentKind::Trunk
            } else {
                SegmentKind::Branch
            },
            width: if woody {
                p.max_depth.saturating_sub(level).saturating_add(1) as f32
            } else {
                1.0
            },
            color: if woody {
                StrokeColor::Wood
            } else {
                StrokeColor::Foliage
            },
            cap: LineCap::Butt,
            parent,
        };
        let id = self.tree.push(segment);

        if self.rng.next_unit() > p.branch_probability {
            return;
        }

        // An overflowing fan-out spawns nothing.
        let Some(child_count) = fan_out(p, level) else {
            return;
        };
        let (first_angle, step) = if child_count > 1 {
            (
                angle - p.base_angle,
                2.0 * p.base_angle / (child_count - 1) as f32,
            )
        } else {
            (angle, 0.0)
        };
        let child_length = length * p.length_reduction_factor;

        for i in 0..child_count {
            let t = branching_point(self.rng.next_unit(), p.branching_point_threshold);
            let child_origin = segment.point_at(t);

            let jitter = (self.rng.next_unit() * 2.0 - 1.0) * p.angle_jitter;
            let child_angle = first_angle + i as f32 * step + jitter;

            if level >= p.leaf_level_threshold {
                self.leaf(child_origin, child_angle, child_length, level, id);
            } else {
                self.expand(child_origin, child_angle, child_length, level + 1, Some(id));
            }
        }
    }

    /// Emits a terminal leaf. Leaves keep their parent's level and are never
    /// expanded, whatever depth budget is left.
    fn leaf(&mut self, origin: Vec2, angle: f32, length: f32, level: u32, parent: SegmentId) {
        if length < self.params.min_segment_length {
            return;
        }

        self.tree.push(Segment {
            from: origin,
            to: origin + direction(angle) * length,
            level,
            kind: SegmentKind::Leaf,
            width: self.params.leaf_stroke_width,
            color: StrokeColor::Foliage,
            cap: LineCap::Round,
            parent: Some(parent),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ReplaySource, RngSource};
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < EPS
    }

    /// Parameters of the reference "dense canopy" tree.
    fn canopy_params() -> Params {
        Params {
            max_depth: 6,
            branch_probability: 1.0,
            branches_per_node: 3,
            branch_density_increase: 2,
            length_reduction_factor: 0.7,
            leaf_level_threshold: 2,
            ..Params::default()
        }
    }

    #[test]
    fn zero_depth_without_branching_is_a_single_trunk() {
        let params = Params {
            max_depth: 0,
            branch_probability: 0.0,
            trunk_length: 150.0,
            ..Params::default()
        };

        let tree = generate(&params, &mut RngSource::seeded(1));

        assert_eq!(tree.len(), 1);
        let trunk = &tree.segments[0];
        assert_eq!(trunk.kind, SegmentKind::Trunk);
        assert_eq!(trunk.level, 0);
        assert_eq!(trunk.parent, None);
        // Straight up from the origin in a y-down system.
        assert!(close(trunk.to, Vec2::new(0.0, -150.0)));
    }

    #[test]
    fn trunk_below_length_floor_yields_empty_tree() {
        let params = Params {
            trunk_length: 4.0,
            min_segment_length: 5.0,
            ..Params::default()
        };

        let mut rng = ReplaySource::new([0.5]);
        let tree = generate(&params, &mut rng);

        assert!(tree.is_empty());
        // The guard runs before any draw.
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn short_children_stop_recursion_after_the_trunk() {
        let params = Params {
            branch_probability: 1.0,
            length_reduction_factor: 0.1,
            trunk_length: 10.0,
            min_segment_length: 5.0,
            ..Params::default()
        };

        let tree = generate(&params, &mut RngSource::seeded(3));

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.segments[0].kind, SegmentKind::Trunk);
    }

    #[test]
    fn children_are_fanned_across_the_base_angle() {
        // Every draw is 0.5: the gate passes, branching points stay at the
        // midpoint and jitter is zero.
        let params = Params {
            max_depth: 1,
            branch_probability: 1.0,
            base_angle: 30.0,
            branches_per_node: 2,
            branch_density_increase: 1,
            trunk_length: 100.0,
            length_reduction_factor: 0.5,
            branching_point_threshold: 0.5,
            ..Params::default()
        };

        let tree = generate(&params, &mut ReplaySource::new([0.5]));

        assert_eq!(tree.len(), 3);
        let mid = Vec2::new(0.0, -50.0);
        let left = &tree.segments[1];
        let right = &tree.segments[2];

        assert!(close(left.from, mid));
        assert!(close(right.from, mid));
        assert!(close(left.to, mid + direction(-120.0) * 50.0));
        assert!(close(right.to, mid + direction(-60.0) * 50.0));
        assert_eq!(left.level, 1);
        assert_eq!(left.parent, Some(0));
        assert_eq!(left.kind, SegmentKind::Branch);
    }

    #[test]
    fn stroke_style_tapers_from_wood_to_foliage() {
        let tree = generate(&canopy_params(), &mut RngSource::seeded(9));

        for s in &tree {
            match (s.kind, s.level) {
                (SegmentKind::Leaf, _) => {
                    assert_eq!(s.width, 2.0);
                    assert_eq!(s.cap, LineCap::Round);
                    assert_eq!(s.color, StrokeColor::Foliage);
                }
                (_, level) if level < 2 => {
                    assert_eq!(s.width, (6 - level + 1) as f32);
                    assert_eq!(s.color, StrokeColor::Wood);
                }
                _ => {
                    assert_eq!(s.width, 1.0);
                    assert_eq!(s.color, StrokeColor::Foliage);
                }
            }
        }
    }

    #[test]
    fn leaf_threshold_zero_turns_trunk_children_into_leaves() {
        let params = Params {
            branch_probability: 1.0,
            leaf_level_threshold: 0,
            ..Params::default()
        };

        let tree = generate(&params, &mut ReplaySource::new([0.5]));

        // Trunk plus `branches_per_node` leaves, none of them expanded.
        assert_eq!(tree.len(), 1 + params.branches_per_node as usize);
        for leaf in &tree.segments[1..] {
            assert_eq!(leaf.kind, SegmentKind::Leaf);
            assert_eq!(leaf.level, 0);
            assert_eq!(leaf.parent, Some(0));
        }
    }

    #[test]
    fn leaves_below_length_floor_are_skipped() {
        let params = Params {
            branch_probability: 1.0,
            leaf_level_threshold: 0,
            trunk_length: 8.0,
            length_reduction_factor: 0.5,
            min_segment_length: 5.0,
            ..Params::default()
        };

        let tree = generate(&params, &mut ReplaySource::new([0.5]));

        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn dense_canopy_is_reproducible_and_leafy() {
        let params = canopy_params();

        let a = generate(&params, &mut RngSource::seeded(2024));
        let b = generate(&params, &mut RngSource::seeded(2024));
        assert_eq!(a, b);

        // With p = 1 and lengths well above the floor the shape is fixed:
        // 1 trunk, 3 branches, 3 * 5 crown branches, 15 * 7 leaves.
        let leaves = a.iter().filter(|s| s.kind == SegmentKind::Leaf).count();
        let branches = a.iter().filter(|s| s.kind == SegmentKind::Branch).count();
        assert_eq!(a.len(), 124);
        assert_eq!(leaves, 105);
        assert_eq!(branches, 18);
        assert!(leaves > branches);
    }

    #[test]
    fn fan_out_grows_with_level() {
        let params = canopy_params();
        let tree = generate(&params, &mut RngSource::seeded(5));

        let mut by_level = std::collections::BTreeMap::new();
        for (id, s) in tree.segments.iter().enumerate() {
            let n = tree.children_of(id).count();
            if n > 0 {
                let expected = params.branches_per_node + s.level * params.branch_density_increase;
                assert_eq!(n as u32, expected, "segment {id} at level {}", s.level);
                by_level.insert(s.level, n);
            }
        }

        let counts: Vec<_> = by_level.values().copied().collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]), "{counts:?}");
    }

    #[test]
    fn branching_point_is_remapped_above_threshold() {
        assert_eq!(branching_point(0.8, 0.5), 0.8);
        assert_eq!(branching_point(0.5, 0.5), 0.5);
        assert!((branching_point(0.2, 0.5) - 0.6).abs() < 1e-6);
        assert!((branching_point(0.0, 0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn rejected_gate_consumes_one_draw() {
        let params = Params {
            branch_probability: 0.3,
            ..Params::default()
        };

        let mut rng = ReplaySource::new([0.9]);
        let tree = generate(&params, &mut rng);

        assert_eq!(tree.len(), 1);
        assert_eq!(rng.draws(), 1);
    }

    /// Heading of a segment in degrees, as used by [`direction`].
    fn heading(s: &Segment) -> f32 {
        let d = s.to - s.from;
        d.y.atan2(d.x).to_degrees()
    }

    /// Two leaves straight off the trunk, fed draws that hit both ends of the
    /// jitter window: gate, then (t, jitter) for each child.
    fn jittered_leaves(angle_jitter: f32) -> PalmTree {
        let params = Params {
            branch_probability: 1.0,
            base_angle: 30.0,
            branches_per_node: 2,
            leaf_level_threshold: 0,
            angle_jitter,
            ..Params::default()
        };
        generate(&params, &mut ReplaySource::new([0.0, 0.5, 0.0, 0.5, 0.999]))
    }

    #[test]
    fn jitter_spans_the_configured_window() {
        for angle_jitter in [5.0, 12.0] {
            let tree = jittered_leaves(angle_jitter);
            assert_eq!(tree.len(), 3);

            // Nominal fan: -90 - 30 and -90 + 30.
            let low = heading(&tree.segments[1]);
            let high = heading(&tree.segments[2]);

            assert!((low - (-120.0 - angle_jitter)).abs() < 1e-2, "{low}");
            assert!((high - (-60.0 + 0.998 * angle_jitter)).abs() < 1e-2, "{high}");
            for (nominal, actual) in [(-120.0f32, low), (-60.0, high)] {
                assert!((actual - nominal).abs() <= angle_jitter + 1e-2);
            }
        }
    }

    #[test]
    fn zero_jitter_keeps_the_even_fan() {
        let tree = jittered_leaves(0.0);

        assert!((heading(&tree.segments[1]) + 120.0).abs() < 1e-2);
        assert!((heading(&tree.segments[2]) + 60.0).abs() < 1e-2);
    }

    #[test]
    fn huge_max_depth_keeps_a_visible_trunk() {
        let params = Params {
            max_depth: u32::MAX,
            branch_probability: 0.5,
            ..Params::default()
        };

        let tree = generate(&params, &mut ReplaySource::new([0.9]));

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.segments[0].width, u32::MAX as f32);
    }

    #[test]
    fn overflowing_fan_out_spawns_no_children() {
        let params = Params {
            branch_probability: 1.0,
            branch_density_increase: u32::MAX,
            ..Params::default()
        };
        assert_eq!(fan_out(&params, 0), Some(3));
        assert_eq!(fan_out(&params, 1), None);

        let tree = generate(&params, &mut ReplaySource::new([0.5]));

        // Trunk and its three branches; the branches stop at the overflow.
        assert_eq!(tree.len(), 4);
        for id in 1..4 {
            assert_eq!(tree.children_of(id).count(), 0);
        }
    }

    fn arb_params() -> impl Strategy<Value = Params> {
        (
            (0u32..=5, 0.0f32..=1.0, 0.0f32..=90.0, 2u32..=4, 1u32..=2),
            (1.0f32..=200.0, 0.1f32..=1.0, 0.1f32..=1.0, 0u32..=3),
        )
            .prop_map(
                |(
                    (max_depth, branch_probability, base_angle, branches_per_node, density),
                    (trunk_length, length_reduction_factor, threshold, leaf_level_threshold),
                )| Params {
                    max_depth,
                    branch_probability,
                    base_angle,
                    branches_per_node,
                    branch_density_increase: density,
                    trunk_length,
                    length_reduction_factor,
                    branching_point_threshold: threshold,
                    leaf_level_threshold,
                    ..Params::default()
                },
            )
    }

    proptest! {
        #[test]
        fn generation_is_deterministic(params in arb_params(), seed in any::<u64>()) {
            let a = generate(&params, &mut RngSource::seeded(seed));
            let b = generate(&params, &mut RngSource::seeded(seed));
            prop_assert_eq!(a, b);
        }

        #[test]
        fn segments_respect_depth_and_length_bounds(params in arb_params(), seed in any::<u64>()) {
            let tree = generate(&params, &mut RngSource::seeded(seed));

            if params.trunk_length < params.min_segment_length {
                prop_assert!(tree.is_empty());
            }
            for s in &tree {
                prop_assert!(s.level <= params.max_depth);
                prop_assert!(s.length() >= params.min_segment_length * (1.0 - 1e-4));
            }
        }

        #[test]
        fn leaves_are_terminal_and_children_start_high_enough(
            params in arb_params(),
            seed in any::<u64>(),
        ) {
            let tree = generate(&params, &mut RngSource::seeded(seed));

            for (id, s) in tree.segments.iter().enumerate() {
                let children = tree.children_of(id).count() as u32;
                if s.kind == SegmentKind::Leaf {
                    prop_assert_eq!(children, 0);
                }
                prop_assert!(
                    children <= params.branches_per_node + s.level * params.branch_density_increase
                );

                if let Some(parent) = s.parent {
                    prop_assert!(parent < id);
                    let fraction = tree.segments[parent].fraction_of(s.from);
                    prop_assert!(fraction >= params.branching_point_threshold - 1e-3);
                    prop_assert!(fraction <= 1.0 + 1e-3);
                }
            }
        }
    }
}
