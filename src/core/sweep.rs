use rayon::prelude::*;
use tracing::debug;

use super::engine::simulate_lifetime;
use super::error::FireError;
use super::random::{SeededSource, Stream};
use super::types::{Config, RuinRateRecord, SweepResult};

/// Ruin percentage below which a retirement age counts as safe.
pub const SAFE_RUIN_RATE: f64 = 5.0;

/// Ruin rate for every retirement age in `age_start..=age_end` and the
/// recommended age among them.
pub fn sweep(config: &Config, age_start: i32, age_end: i32) -> Result<SweepResult, FireError> {
    config.validate_sweep(age_start, age_end)?;
    sweep_validated(config, age_start, age_end)
}

/// [`sweep`] for inputs already accepted by [`Config::validate_sweep`].
pub(crate) fn sweep_validated(
    config: &Config,
    age_start: i32,
    age_end: i32,
) -> Result<SweepResult, FireError> {
    let ruin_rates = (age_start..=age_end)
        .into_par_iter()
        .map(|age| RuinRateRecord {
            age,
            rate: ruin_rate(config, age),
        })
        .collect::<Vec<_>>();

    for record in &ruin_rates {
        debug!(age = record.age, rate = record.rate, "ruin rate");
    }

    let recommended_age = select_recommended_age(&ruin_rates).ok_or_else(|| {
        FireError::Computation("no retirement ages were scanned".to_string())
    })?;

    Ok(SweepResult {
        ruin_rates,
        recommended_age,
    })
}

/// Percentage of paths retiring at `retirement_age` that run out of money.
/// `config.simulations` must be non-zero.
pub(crate) fn ruin_rate(config: &Config, retirement_age: i32) -> f64 {
    let ruined = (0..config.simulations)
        .into_par_iter()
        .filter(|&sample_id| {
            let mut rng =
                SeededSource::for_sample(config.seed, Stream::RuinSweep, retirement_age, sample_id);
            simulate_lifetime(config, retirement_age, &mut rng).ruined()
        })
        .count();
    100.0 * ruined as f64 / config.simulations as f64
}

/// First age whose rate is under [`SAFE_RUIN_RATE`]; otherwise the earliest
/// age with the lowest rate. `None` only for an empty slice.
pub fn select_recommended_age(records: &[RuinRateRecord]) -> Option<i32> {
    if let Some(safe) = records.iter().find(|r| r.rate < SAFE_RUIN_RATE) {
        return Some(safe.age);
    }

    let mut best: Option<&RuinRateRecord> = None;
    for record in records {
        match best {
            Some(b) if record.rate >= b.rate => {}
            _ => best = Some(record),
        }
    }
    best.map(|r| r.age)
}
