use std::time::Instant;

use tracing::info;

use super::error::FireError;
use super::projection::project_validated;
use super::sweep::sweep_validated;
use super::types::{Config, ProjectionResult, Projections, Report};

/// Fixed comparison retirement ages shown next to the recommended one.
const COMPARISON_AGE_30: i32 = 30;
const COMPARISON_AGE_40: i32 = 40;

/// Full report: ruin sweep plus projections for the recommended age and the
/// age-30 / age-40 comparisons (omitted when already older than that age).
///
/// The configuration and age range are validated once, up front.
pub fn run_report(config: &Config, age_start: i32, age_end: i32) -> Result<Report, FireError> {
    config.validate_sweep(age_start, age_end)?;
    let started = Instant::now();
    let swept = sweep_validated(config, age_start, age_end)?;

    let projections = Projections {
        recommended: project_validated(config, swept.recommended_age)?,
        age_30: comparison_projection(config, COMPARISON_AGE_30)?,
        age_40: comparison_projection(config, COMPARISON_AGE_40)?,
    };

    info!(
        age_start,
        age_end,
        simulations = config.simulations,
        recommended_age = swept.recommended_age,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "simulation report complete"
    );

    Ok(Report {
        ruin_rates: swept.ruin_rates,
        projections,
    })
}

fn comparison_projection(
    config: &Config,
    retirement_age: i32,
) -> Result<Option<ProjectionResult>, FireError> {
    if i64::from(retirement_age) < i64::from(config.current_age) {
        return Ok(None);
    }
    project_validated(config, retirement_age).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sweep::select_recommended_age;

    fn quick_config() -> Config {
        Config {
            simulations: 150,
            ..Config::default()
        }
    }

    #[test]
    fn report_contains_sweep_and_three_projections() {
        let config = quick_config();
        let report = run_report(&config, 35, 60).expect("valid input");

        assert_eq!(report.ruin_rates.len(), 26);
        let recommended = select_recommended_age(&report.ruin_rates).unwrap();
        assert_eq!(report.projections.recommended.retire_age, recommended);

        let age_30 = report.projections.age_30.as_ref().expect("25 <= 30");
        let age_40 = report.projections.age_40.as_ref().expect("25 <= 40");
        assert_eq!(age_30.retire_age, 30);
        assert_eq!(age_40.retire_age, 40);
        assert_eq!(age_30.ages, report.projections.recommended.ages);
    }

    #[test]
    fn comparison_projections_are_omitted_for_older_profiles() {
        let config = Config {
            current_age: 35,
            ..quick_config()
        };
        let report = run_report(&config, 40, 45).expect("valid input");
        assert!(report.projections.age_30.is_none());
        assert!(report.projections.age_40.is_some());

        let config = Config {
            current_age: 41,
            ..quick_config()
        };
        let report = run_report(&config, 45, 50).expect("valid input");
        assert!(report.projections.age_30.is_none());
        assert!(report.projections.age_40.is_none());
    }

    #[test]
    fn comparison_age_equal_to_current_age_is_kept() {
        let config = Config {
            current_age: 30,
            ..quick_config()
        };
        let report = run_report(&config, 35, 36).expect("valid input");
        assert!(report.projections.age_30.is_some());
    }

    #[test]
    fn invalid_config_produces_no_report() {
        let config = Config {
            life_expectancy: 25,
            ..quick_config()
        };
        let err = run_report(&config, 35, 60).expect_err("must fail fast");
        assert_eq!(err.field(), Some("life_expectancy"));
    }

    #[test]
    fn reversed_range_produces_no_report() {
        let err = run_report(&quick_config(), 60, 35).expect_err("reversed range must fail");
        assert_eq!(err.field(), Some("retire_age_end"));
    }

    #[test]
    fn overflowing_assets_fail_instead_of_serializing_as_null() {
        let config = Config {
            early_growth_rate: 1e300,
            simulations: 20,
            ..Config::default()
        };
        let err = run_report(&config, 35, 40).expect_err("infinite percentiles must fail");
        assert!(matches!(err, FireError::Computation(_)), "{err:?}");
    }

    #[test]
    fn report_serializes_to_wire_shape() {
        let config = Config {
            current_age: 35,
            life_expectancy: 40,
            simulations: 20,
            ..Config::default()
        };
        let report = run_report(&config, 36, 37).expect("valid input");
        let json = serde_json::to_value(&report).expect("report should serialize");

        let rates = json["ruin_rates"].as_array().expect("array");
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0]["age"], 36);
        assert!(rates[0]["rate"].is_number());

        let projections = &json["projections"];
        assert!(projections["age_30"].is_null());
        assert_eq!(projections["age_40"]["retire_age"], 40);
        let recommended = &projections["recommended"];
        assert_eq!(recommended["ages"].as_array().unwrap().len(), 6);
        for key in ["p10", "p50", "p90"] {
            assert_eq!(recommended[key].as_array().unwrap().len(), 6);
        }
    }
}
