use serde::Serialize;

use super::error::FireError;

/// Household profile and market assumptions for one simulation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub current_age: u32,
    pub life_expectancy: u32,
    pub current_assets: f64,
    pub annual_income: f64,
    pub annual_expense: f64,
    pub simulations: u32,
    pub inflation_mean: f64,
    pub inflation_std: f64,
    pub return_min: f64,
    pub return_max: f64,
    pub career_crisis_age_start: u32,
    pub layoff_probability: f64,
    pub salary_cut_ratio: f64,
    pub early_growth_rate: f64,
    pub post_retirement_income: f64,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            current_age: 25,
            life_expectancy: 90,
            current_assets: 100.0,
            annual_income: 56.0,
            annual_expense: 12.0,
            simulations: 1_000,
            inflation_mean: 0.035,
            inflation_std: 0.008,
            return_min: -0.10,
            return_max: 0.15,
            career_crisis_age_start: 35,
            layoff_probability: 0.15,
            salary_cut_ratio: 0.70,
            early_growth_rate: 0.05,
            post_retirement_income: 0.0,
            seed: 42,
        }
    }
}

impl Config {
    /// Checks every field against its domain. Called before any path is simulated.
    pub fn validate(&self) -> Result<(), FireError> {
        if self.life_expectancy <= self.current_age {
            return Err(FireError::config("life_expectancy", "must be > current_age"));
        }
        if self.simulations == 0 {
            return Err(FireError::config("simulations", "must be > 0"));
        }

        for (field, value) in [
            ("current_assets", self.current_assets),
            ("annual_income", self.annual_income),
            ("annual_expense", self.annual_expense),
            ("inflation_mean", self.inflation_mean),
            ("inflation_std", self.inflation_std),
            ("return_min", self.return_min),
            ("return_max", self.return_max),
            ("layoff_probability", self.layoff_probability),
            ("salary_cut_ratio", self.salary_cut_ratio),
            ("early_growth_rate", self.early_growth_rate),
            ("post_retirement_income", self.post_retirement_income),
        ] {
            if !value.is_finite() {
                return Err(FireError::config(field, "must be a finite number"));
            }
        }

        for (field, value) in [
            ("annual_income", self.annual_income),
            ("annual_expense", self.annual_expense),
            ("inflation_std", self.inflation_std),
            ("post_retirement_income", self.post_retirement_income),
        ] {
            if value < 0.0 {
                return Err(FireError::config(field, "must be >= 0"));
            }
        }

        if self.return_min > self.return_max {
            return Err(FireError::config("return_min", "must be <= return_max"));
        }
        if !(0.0..=1.0).contains(&self.layoff_probability) {
            return Err(FireError::config("layoff_probability", "must be between 0 and 1"));
        }
        if self.salary_cut_ratio <= 0.0 || self.salary_cut_ratio > 1.0 {
            return Err(FireError::config("salary_cut_ratio", "must be in (0, 1]"));
        }

        Ok(())
    }

    /// Validates the configuration together with a retirement-age range to scan.
    pub fn validate_sweep(&self, age_start: i32, age_end: i32) -> Result<(), FireError> {
        self.validate()?;
        if age_end < age_start {
            return Err(FireError::config(
                "retire_age_end",
                format!("must be >= retire_age_start ({age_start})"),
            ));
        }
        Ok(())
    }

    /// Number of recorded points on a trajectory, including the starting year.
    pub fn horizon_len(&self) -> usize {
        (self.life_expectancy - self.current_age) as usize + 1
    }

    /// The fixed age ladder `current_age..=life_expectancy`.
    pub fn age_ladder(&self) -> Vec<u32> {
        (self.current_age..=self.life_expectancy).collect()
    }
}

/// One simulated lifetime.
///
/// `ruined_at` is the first index whose balance went negative; that entry and
/// every later one are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationPath {
    pub ages: Vec<u32>,
    pub assets: Vec<f64>,
    pub ruined_at: Option<usize>,
}

impl SimulationPath {
    pub fn ruined(&self) -> bool {
        self.ruined_at.is_some()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RuinRateRecord {
    pub age: i32,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub ruin_rates: Vec<RuinRateRecord>,
    pub recommended_age: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub ages: Vec<u32>,
    pub p10: Vec<f64>,
    pub p50: Vec<f64>,
    pub p90: Vec<f64>,
    pub retire_age: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projections {
    pub recommended: ProjectionResult,
    pub age_30: Option<ProjectionResult>,
    pub age_40: Option<ProjectionResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub ruin_rates: Vec<RuinRateRecord>,
    pub projections: Projections,
}

/// Asset distribution at a single age for a fixed retirement age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgeSnapshot {
    pub age: u32,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}
