use clap::Args;
use serde::Deserialize;

use crate::core::{Config, FireError};

pub const DEFAULT_RETIRE_AGE_START: i32 = 35;
pub const DEFAULT_RETIRE_AGE_END: i32 = 60;

/// Optional overrides on top of [`Config::default`].
///
/// Shared by the `simulate` command line and the `/api/simulate` payload, so
/// both surfaces fall back to the same defaults.
#[derive(Args, Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    #[arg(long)]
    pub current_age: Option<u32>,
    #[arg(long)]
    pub life_expectancy: Option<u32>,
    #[arg(long, allow_negative_numbers = true)]
    pub current_assets: Option<f64>,
    #[arg(long)]
    pub annual_income: Option<f64>,
    #[arg(long)]
    pub annual_expense: Option<f64>,
    #[arg(long)]
    pub simulations: Option<u32>,
    #[arg(long, allow_negative_numbers = true)]
    pub inflation_mean: Option<f64>,
    #[arg(long)]
    pub inflation_std: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub return_min: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub return_max: Option<f64>,
    #[arg(long)]
    pub career_crisis_age_start: Option<u32>,
    #[arg(long)]
    pub layoff_probability: Option<f64>,
    #[arg(long)]
    pub salary_cut_ratio: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub early_growth_rate: Option<f64>,
    #[arg(long)]
    pub post_retirement_income: Option<f64>,
    #[arg(long, help = "Base seed for every simulated path")]
    pub seed: Option<u64>,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "First retirement age to scan [default: 35]"
    )]
    pub retire_age_start: Option<i32>,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Last retirement age to scan [default: 60]"
    )]
    pub retire_age_end: Option<i32>,
}

/// A configuration plus the retirement ages to scan. Validated by
/// [`crate::core::run_report`] before any path is simulated.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub config: Config,
    pub retire_age_start: i32,
    pub retire_age_end: i32,
}

impl ConfigOverrides {
    pub fn into_request(self) -> SimulationRequest {
        let mut config = Config::default();

        if let Some(v) = self.current_age {
            config.current_age = v;
        }
        if let Some(v) = self.life_expectancy {
            config.life_expectancy = v;
        }
        if let Some(v) = self.current_assets {
            config.current_assets = v;
        }
        if let Some(v) = self.annual_income {
            config.annual_income = v;
        }
        if let Some(v) = self.annual_expense {
            config.annual_expense = v;
        }
        if let Some(v) = self.simulations {
            config.simulations = v;
        }
        if let Some(v) = self.inflation_mean {
            config.inflation_mean = v;
        }
        if let Some(v) = self.inflation_std {
            config.inflation_std = v;
        }
        if let Some(v) = self.return_min {
            config.return_min = v;
        }
        if let Some(v) = self.return_max {
            config.return_max = v;
        }
        if let Some(v) = self.career_crisis_age_start {
            config.career_crisis_age_start = v;
        }
        if let Some(v) = self.layoff_probability {
            config.layoff_probability = v;
        }
        if let Some(v) = self.salary_cut_ratio {
            config.salary_cut_ratio = v;
        }
        if let Some(v) = self.early_growth_rate {
            config.early_growth_rate = v;
        }
        if let Some(v) = self.post_retirement_income {
            config.post_retirement_income = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }

        SimulationRequest {
            config,
            retire_age_start: self.retire_age_start.unwrap_or(DEFAULT_RETIRE_AGE_START),
            retire_age_end: self.retire_age_end.unwrap_or(DEFAULT_RETIRE_AGE_END),
        }
    }
}

impl SimulationRequest {
    pub fn validate(&self) -> Result<(), FireError> {
        self.config.validate_sweep(self.retire_age_start, self.retire_age_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_from_json(json: &str) -> Result<SimulationRequest, String> {
        let overrides = serde_json::from_str::<ConfigOverrides>(json)
            .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
        let request = overrides.into_request();
        request.validate().map_err(|e| e.to_string())?;
        Ok(request)
    }

    #[test]
    fn empty_payload_uses_defaults() {
        let request = request_from_json("{}").expect("defaults are valid");
        assert_eq!(request.config, Config::default());
        assert_eq!(request.retire_age_start, 35);
        assert_eq!(request.retire_age_end, 60);
    }

    #[test]
    fn payload_overrides_named_fields() {
        let json = r#"{
          "current_age": 31,
          "life_expectancy": 95,
          "current_assets": 250,
          "annual_income": 80.5,
          "annual_expense": 20,
          "simulations": 1234,
          "inflation_mean": 0.03,
          "inflation_std": 0.01,
          "return_min": -0.2,
          "return_max": 0.2,
          "career_crisis_age_start": 40,
          "layoff_probability": 0.25,
          "salary_cut_ratio": 0.5,
          "early_growth_rate": 0.04,
          "post_retirement_income": 6,
          "seed": 7,
          "retire_age_start": 40,
          "retire_age_end": 55
        }"#;
        let request = request_from_json(json).expect("json should parse");
        let config = request.config;

        assert_eq!(config.current_age, 31);
        assert_eq!(config.life_expectancy, 95);
        assert_eq!(config.current_assets, 250.0);
        assert_eq!(config.annual_income, 80.5);
        assert_eq!(config.annual_expense, 20.0);
        assert_eq!(config.simulations, 1234);
        assert_eq!(config.inflation_mean, 0.03);
        assert_eq!(config.inflation_std, 0.01);
        assert_eq!(config.return_min, -0.2);
        assert_eq!(config.return_max, 0.2);
        assert_eq!(config.career_crisis_age_start, 40);
        assert_eq!(config.layoff_probability, 0.25);
        assert_eq!(config.salary_cut_ratio, 0.5);
        assert_eq!(config.early_growth_rate, 0.04);
        assert_eq!(config.post_retirement_income, 6.0);
        assert_eq!(config.seed, 7);
        assert_eq!(request.retire_age_start, 40);
        assert_eq!(request.retire_age_end, 55);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let request = request_from_json(r#"{"return_mean": 0.05}"#).expect("extra keys ignored");
        assert_eq!(request.config, Config::default());
    }

    #[test]
    fn rejects_reversed_retirement_range() {
        let err = request_from_json(r#"{"retire_age_start": 60, "retire_age_end": 35}"#)
            .expect_err("must reject reversed range");
        assert!(err.contains("retire_age_end"));
    }

    #[test]
    fn accepts_negative_retirement_ages() {
        let request = request_from_json(r#"{"retire_age_start": -3, "retire_age_end": 2}"#)
            .expect("negative ages mean already retired");
        assert_eq!(request.retire_age_start, -3);
        assert_eq!(request.retire_age_end, 2);
    }

    #[test]
    fn overrides_apply_without_validating() {
        let overrides = ConfigOverrides {
            simulations: Some(0),
            retire_age_start: Some(60),
            retire_age_end: Some(35),
            ..ConfigOverrides::default()
        };
        let request = overrides.into_request();
        assert_eq!(request.config.simulations, 0);
        assert_eq!(request.validate().map_err(|e| e.field()), Err(Some("simulations")));
    }

    #[test]
    fn rejects_life_expectancy_not_after_current_age() {
        let err = request_from_json(r#"{"current_age": 90, "life_expectancy": 90}"#)
            .expect_err("must reject empty horizon");
        assert!(err.contains("life_expectancy"));
    }

    #[test]
    fn rejects_zero_simulations() {
        let err = request_from_json(r#"{"simulations": 0}"#).expect_err("must reject zero");
        assert!(err.contains("simulations"));
    }

    #[test]
    fn rejects_probability_out_of_range() {
        let err = request_from_json(r#"{"layoff_probability": -0.1}"#)
            .expect_err("must reject negative probability");
        assert!(err.contains("layoff_probability"));
    }

    #[test]
    fn rejects_non_positive_salary_cut() {
        let err =
            request_from_json(r#"{"salary_cut_ratio": 0}"#).expect_err("must reject zero cut");
        assert!(err.contains("salary_cut_ratio"));
        let err =
            request_from_json(r#"{"salary_cut_ratio": 1.5}"#).expect_err("must reject raise");
        assert!(err.contains("salary_cut_ratio"));
    }

    #[test]
    fn rejects_inverted_return_bounds() {
        let err = request_from_json(r#"{"return_min": 0.2, "return_max": 0.1}"#)
            .expect_err("must reject inverted bounds");
        assert!(err.contains("return_min"));
    }

    #[test]
    fn rejects_negative_std() {
        let err =
            request_from_json(r#"{"inflation_std": -0.01}"#).expect_err("must reject negative");
        assert!(err.contains("inflation_std"));
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        let err = request_from_json(r#"{"current_age": "old"}"#).expect_err("must reject text");
        assert!(err.contains("Invalid API JSON payload"));
    }
}
