use rayon::prelude::*;

use super::engine::simulate_lifetime;
use super::error::FireError;
use super::random::{SeededSource, Stream};
use super::types::{AgeSnapshot, Config, ProjectionResult};

/// Percentile bands reported for every projected age.
const BANDS: [f64; 3] = [10.0, 50.0, 90.0];

/// Asset trajectories of `config.simulations` paths retiring at `retirement_age`.
///
/// Sample `i` always uses the projection stream derived from
/// `(seed, retirement_age, i)`, so the result does not depend on how rayon
/// schedules the work and never replays the sweep's paths.
pub(crate) fn sample_trajectories(config: &Config, retirement_age: i32) -> Vec<Vec<f64>> {
    (0..config.simulations)
        .into_par_iter()
        .map(|sample_id| {
            let mut rng = SeededSource::for_sample(
                config.seed,
                Stream::Projection,
                retirement_age,
                sample_id,
            );
            simulate_lifetime(config, retirement_age, &mut rng).assets
        })
        .collect()
}

/// p10/p50/p90 of assets at every age for a fixed retirement age.
pub fn project(config: &Config, retirement_age: i32) -> Result<ProjectionResult, FireError> {
    config.validate()?;
    project_validated(config, retirement_age)
}

/// [`project`] for a configuration the caller has already validated.
pub(crate) fn project_validated(
    config: &Config,
    retirement_age: i32,
) -> Result<ProjectionResult, FireError> {
    let paths = sample_trajectories(config, retirement_age);
    let columns = (0..config.horizon_len())
        .into_par_iter()
        .map(|t| {
            let mut column = paths.iter().map(|path| path[t]).collect::<Vec<_>>();
            bands(&mut column)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut p10 = Vec::with_capacity(columns.len());
    let mut p50 = Vec::with_capacity(columns.len());
    let mut p90 = Vec::with_capacity(columns.len());
    for [lo, mid, hi] in columns {
        p10.push(lo);
        p50.push(mid);
        p90.push(hi);
    }

    Ok(ProjectionResult {
        ages: config.age_ladder(),
        p10,
        p50,
        p90,
        retire_age: retirement_age,
    })
}

/// Asset distribution at selected ages, e.g. how large the pot is at 40, 45
/// and 50 for someone planning to stop work at 60.
pub fn asset_snapshots(
    config: &Config,
    retirement_age: i32,
    ages: &[u32],
) -> Result<Vec<AgeSnapshot>, FireError> {
    config.validate()?;
    for &age in ages {
        if age < config.current_age || age > config.life_expectancy {
            return Err(FireError::config(
                "snapshot_ages",
                format!(
                    "age {age} is outside {}..={}",
                    config.current_age, config.life_expectancy
                ),
            ));
        }
    }

    let paths = sample_trajectories(config, retirement_age);
    ages.iter()
        .map(|&age| {
            let idx = (age - config.current_age) as usize;
            let mut column = paths.iter().map(|path| path[idx]).collect::<Vec<_>>();
            let [p10, p50, p90] = bands(&mut column)?;
            Ok(AgeSnapshot { age, p10, p50, p90 })
        })
        .collect()
}

fn bands(values: &mut [f64]) -> Result<[f64; 3], FireError> {
    sort_samples(values);
    Ok([
        percentile_sorted(values, BANDS[0])?,
        percentile_sorted(values, BANDS[1])?,
        percentile_sorted(values, BANDS[2])?,
    ])
}

/// Linear interpolation between order statistics: rank `p / 100 * (n - 1)`.
///
/// Fails on an empty set and on any NaN or infinite sample.
pub fn percentile(values: &mut [f64], p: f64) -> Result<f64, FireError> {
    sort_samples(values);
    percentile_sorted(values, p)
}

fn sort_samples(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

fn percentile_sorted(values: &[f64], p: f64) -> Result<f64, FireError> {
    let (Some(&first), Some(&last)) = (values.first(), values.last()) else {
        return Err(FireError::Computation("percentile of an empty sample set".to_string()));
    };
    // Total order puts every NaN and infinity at one of the ends.
    if !first.is_finite() || !last.is_finite() {
        return Err(FireError::Computation(
            "sample set contains a non-finite asset value".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&p) {
        return Err(FireError::Computation(format!("percentile rank {p} is outside 0..=100")));
    }

    let n = values.len();
    if n == 1 {
        return Ok(first);
    }

    let rank = (p / 100.0) * (n as f64 - 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        Ok(values[lower])
    } else {
        let (lo, hi) = (values[lower], values[upper]);
        let w = rank - lower as f64;
        // Kept inside [lo, hi] so bands stay ordered under rounding.
        Ok((lo + (hi - lo) * w).max(lo).min(hi))
    }
}
