use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Parameters of a single generation run.
///
/// A `Params` value is built once per regeneration request and only ever
/// borrowed immutably by [`crate::generator::generate`]. The generator relies
/// on the ranges documented on each field; use [`Params::normalized`] or
/// [`crate::input::ParamForm`] to get there from user input.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Recursion ceiling; segments deeper than this are never emitted.
    pub max_depth: u32,
    /// Chance in `[0, 1]` that a drawn segment spawns children at all.
    pub branch_probability: f32,
    /// Half-spread of the angular fan of children, in degrees.
    pub base_angle: f32,
    /// Fan-out at level 0, at least 2.
    pub branches_per_node: u32,
    /// Extra fan-out per level, at least 1.
    pub branch_density_increase: u32,
    pub trunk_length: f32,
    /// Length decay per level, in `[0.1, 1.0]`.
    pub length_reduction_factor: f32,
    /// Lowest fraction along a parent where a child may start, in `[0.1, 1.0]`.
    pub branching_point_threshold: f32,
    pub min_segment_length: f32,
    /// Level from which children are drawn as leaves.
    pub leaf_level_threshold: u32,
    /// Half-width of the uniform angular jitter window, in degrees.
    pub angle_jitter: f32,
    pub leaf_stroke_width: f32,
    /// Start of the trunk, y pointing down.
    pub origin: Vec2,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_depth: 6,
            branch_probability: 0.8,
            base_angle: 30.0,
            branches_per_node: 3,
            branch_density_increase: 2,
            trunk_length: 150.0,
            length_reduction_factor: 0.7,
            branching_point_threshold: 0.5,
            min_segment_length: 5.0,
            leaf_level_threshold: 2,
            angle_jitter: 5.0,
            leaf_stroke_width: 2.0,
            origin: Vec2::ZERO,
        }
    }
}

impl Params {
    pub const BRANCH_PROBABILITY_RANGE: (f32, f32) = (0.0, 1.0);
    pub const LENGTH_REDUCTION_RANGE: (f32, f32) = (0.1, 1.0);
    pub const BRANCHING_POINT_RANGE: (f32, f32) = (0.1, 1.0);
    pub const MIN_BRANCHES_PER_NODE: u32 = 2;
    pub const MIN_BRANCH_DENSITY_INCREASE: u32 = 1;

    /// Returns a copy with every field clamped into its documented range.
    ///
    /// Fields without a documented range are passed through untouched.
    pub fn normalized(self) -> Self {
        let (p_lo, p_hi) = Self::BRANCH_PROBABILITY_RANGE;
        let (l_lo, l_hi) = Self::LENGTH_REDUCTION_RANGE;
        let (b_lo, b_hi) = Self::BRANCHING_POINT_RANGE;

        Self {
            branch_probability: clamp_or(self.branch_probability, p_lo, p_hi),
            length_reduction_factor: clamp_or(self.length_reduction_factor, l_lo, l_hi),
            branching_point_threshold: clamp_or(self.branching_point_threshold, b_lo, b_hi),
            branches_per_node: self.branches_per_node.max(Self::MIN_BRANCHES_PER_NODE),
            branch_density_increase: self
                .branch_density_increase
                .max(Self::MIN_BRANCH_DENSITY_INCREASE),
            ..self
        }
    }

    /// Parses a TOML parameter file. Missing keys take their defaults and the
    /// result is normalized.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let params: Params = toml::from_str(src)?;
        Ok(params.normalized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let params = Self::from_toml_str(&src)?;
        log::info!("loaded parameters from {}", path.display());
        Ok(params)
    }
}

/// `f32::clamp` that maps NaN to the lower bound instead of keeping it.
pub(crate) fn clamp_or(value: f32, lo: f32, hi: f32) -> f32 {
    if value.is_nan() { lo } else { value.clamp(lo, hi) }
}
