use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Draws consumed by the lifetime simulator.
pub trait RandomSource {
    fn draw_normal(&mut self, mean: f64, std: f64) -> f64;
    fn draw_uniform(&mut self, lo: f64, hi: f64) -> f64;
    /// Uniform on `[0, 1)`.
    fn draw_unit(&mut self) -> f64;
}

/// Which phase of a report a path belongs to.
///
/// The sweep and the projections draw from disjoint stream families, so a
/// projection for an age never replays the paths that scored that age.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stream {
    RuinSweep,
    Projection,
}

impl Stream {
    fn tag(self) -> u64 {
        match self {
            Stream::RuinSweep => 0x5357_4545_5000_0001,
            Stream::Projection => 0x5052_4F4A_0000_0002,
        }
    }
}

/// ChaCha8 stream dedicated to a single simulated path.
pub struct SeededSource {
    rng: ChaCha8Rng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Stream for sample `sample_id` of retirement age `age` within `stream`.
    pub fn for_sample(base_seed: u64, stream: Stream, age: i32, sample_id: u32) -> Self {
        Self::new(derive_seed(base_seed, stream, age, sample_id))
    }
}

impl RandomSource for SeededSource {
    fn draw_normal(&mut self, mean: f64, std: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        mean + std * z
    }

    fn draw_uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.draw_unit()
    }

    fn draw_unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

pub(crate) fn derive_seed(base_seed: u64, stream: Stream, age: i32, sample_id: u32) -> u64 {
    let family = splitmix64(base_seed ^ stream.tag());
    let mixed = family ^ ((age as u32 as u64) << 32) ^ sample_id as u64;
    splitmix64(mixed)
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
