//! Text-field input for generation parameters.
//!
//! [`ParamForm`] mirrors the editable fields of a parameter panel. Applying
//! it is lenient: both `.` and `,` work as decimal separator, values are
//! clamped into their valid ranges, and a field that does not parse leaves
//! its parameter at the last valid value.

use crate::{
    error::ParamError,
    params::{Params, clamp_or},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamForm {
    pub max_depth: String,
    pub branch_probability: String,
    pub base_angle: String,
    pub branches_per_node: String,
    pub trunk_length: String,
    pub length_reduction_factor: String,
    pub branch_density_increase: String,
    pub branching_point_threshold: String,
}

impl ParamForm {
    /// Fills every field with the current value of `params`.
    pub fn from_params(params: &Params) -> Self {
        Self {
            max_depth: params.max_depth.to_string(),
            branch_probability: params.branch_probability.to_string(),
            base_angle: params.base_angle.to_string(),
            branches_per_node: params.branches_per_node.to_string(),
            trunk_length: params.trunk_length.to_string(),
            length_reduction_factor: params.length_reduction_factor.to_string(),
            branch_density_increase: params.branch_density_increase.to_string(),
            branching_point_threshold: params.branching_point_threshold.to_string(),
        }
    }

    /// Writes every parsable field into `params`, clamped into range.
    ///
    /// Returns one error per field that could not be parsed; those
    /// parameters are left untouched.
    pub fn apply(&self, params: &mut Params) -> Vec<ParamError> {
        let mut errors = Vec::new();

        if let Some(v) = collect(parse_int("max_depth", &self.max_depth), &mut errors) {
            params.max_depth = v;
        }

        if let Some(v) = collect(
            parse_real("branch_probability", &self.branch_probability),
            &mut errors,
        ) {
            let (lo, hi) = Params::BRANCH_PROBABILITY_RANGE;
            params.branch_probability = clamp_or(v, lo, hi);
        }

        if let Some(v) = collect(parse_real("base_angle", &self.base_angle), &mut errors) {
            params.base_angle = v;
        }

        if let Some(v) = collect(
            parse_int("branches_per_node", &self.branches_per_node),
            &mut errors,
        ) {
            params.branches_per_node = v.max(Params::MIN_BRANCHES_PER_NODE);
        }

        if let Some(v) = collect(parse_real("trunk_length", &self.trunk_length), &mut errors) {
            params.trunk_length = v;
        }

        if let Some(v) = collect(
            parse_real("length_reduction_factor", &self.length_reduction_factor),
            &mut errors,
        ) {
            let (lo, hi) = Params::LENGTH_REDUCTION_RANGE;
            params.length_reduction_factor = clamp_or(v, lo, hi);
        }

        if let Some(v) = collect(
            parse_int("branch_density_increase", &self.branch_density_increase),
            &mut errors,
        ) {
            params.branch_density_increase = v.max(Params::MIN_BRANCH_DENSITY_INCREASE);
        }

        if let Some(v) = collect(
            parse_real("branching_point_threshold", &self.branching_point_threshold),
            &mut errors,
        ) {
            let (lo, hi) = Params::BRANCHING_POINT_RANGE;
            params.branching_point_threshold = clamp_or(v, lo, hi);
        }

        for err in &errors {
            log::warn!("{err}; keeping previous value");
        }
        errors
    }
}

fn collect<T>(result: Result<T, ParamError>, errors: &mut Vec<ParamError>) -> Option<T> {
    result.map_err(|e| errors.push(e)).ok()
}

/// Trims and swaps a `,` decimal separator for `.`.
fn canonical(input: &str) -> String {
    input.trim().replace(',', ".")
}

fn parse_int(field: &'static str, input: &str) -> Result<u32, ParamError> {
    canonical(input)
        .parse()
        .map_err(|_| ParamError::InvalidNumber {
            field,
            input: input.to_owned(),
        })
}

fn parse_real(field: &'static str, input: &str) -> Result<f32, ParamError> {
    canonical(input)
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParamError::InvalidNumber {
            field,
            input: input.to_owned(),
        })
}
