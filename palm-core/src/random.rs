use rand::{Rng, SeedableRng, rngs::StdRng};

/// A stateful stream of uniform values in `[0, 1)`.
///
/// Every call advances the stream. The generator takes its source by
/// `&mut`, so two runs with equal sources and equal parameters produce the
/// same tree.
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

/// [`RandomSource`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Seeded source; equal seeds replay equal streams.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    #[inline]
    fn next_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
///
/// Values are clamped into `[0, 1)` on construction and NaN becomes zero.
/// An empty list replays zeros.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    values: Vec<f32>,
    cursor: usize,
}

impl ReplaySource {
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        let values = values
            .into_iter()
            .map(|v| {
                if v.is_nan() {
                    0.0
                } else {
                    v.clamp(0.0, 1.0 - f32::EPSILON)
                }
            })
            .collect();
        Self { values, cursor: 0 }
    }

    /// Number of values handed out so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ReplaySource {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
