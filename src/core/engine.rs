use super::random::RandomSource;
use super::types::{Config, SimulationPath};

const INFLATION_FLOOR: f64 = 0.0;
const INFLATION_CEILING: f64 = 0.10;
/// Raise applied to working years past the crisis start age when no cut hits.
const STEADY_RAISE: f64 = 0.02;

/// Career regime of one simulated worker.
///
/// A path starts `Stable`. Each working year from `career_crisis_age_start`
/// onward rolls for a layoff until one happens; after that the path stays in
/// `PostCrisis` and no further rolls are made.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CareerState {
    Stable,
    PostCrisis,
}

impl CareerState {
    /// Salary multiplier for one crisis-eligible working year and the state after it.
    pub fn advance<R: RandomSource + ?Sized>(
        self,
        layoff_probability: f64,
        salary_cut_ratio: f64,
        rng: &mut R,
    ) -> (f64, CareerState) {
        match self {
            CareerState::Stable => {
                if rng.draw_unit() < layoff_probability {
                    (salary_cut_ratio, CareerState::PostCrisis)
                } else {
                    (1.0 + STEADY_RAISE, CareerState::Stable)
                }
            }
            CareerState::PostCrisis => (1.0 + STEADY_RAISE, CareerState::PostCrisis),
        }
    }
}

#[derive(Clone, Copy)]
struct YearSample {
    inflation: f64,
    investment_return: f64,
}

fn sample_year<R: RandomSource + ?Sized>(config: &Config, rng: &mut R) -> YearSample {
    let inflation = rng
        .draw_normal(config.inflation_mean, config.inflation_std)
        .clamp(INFLATION_FLOOR, INFLATION_CEILING);
    let investment_return = rng.draw_uniform(config.return_min, config.return_max);
    YearSample {
        inflation,
        investment_return,
    }
}

#[derive(Debug)]
struct Household {
    salary: f64,
    expense: f64,
    passive_income: f64,
    career: CareerState,
}

impl Household {
    fn new(config: &Config) -> Self {
        Self {
            salary: config.annual_income,
            expense: config.annual_expense,
            passive_income: config.post_retirement_income,
            career: CareerState::Stable,
        }
    }

    /// Net cash for one year. Expense has already been inflated for the year.
    fn working_cashflow<R: RandomSource + ?Sized>(
        &mut self,
        config: &Config,
        age: u32,
        rng: &mut R,
    ) -> f64 {
        if age < config.career_crisis_age_start {
            self.salary *= 1.0 + config.early_growth_rate;
        } else {
            let (multiplier, next) = self.career.advance(
                config.layoff_probability,
                config.salary_cut_ratio,
                rng,
            );
            self.salary *= multiplier;
            self.career = next;
        }
        self.salary - self.expense
    }

    fn retired_cashflow(&mut self, inflation: f64) -> f64 {
        self.passive_income *= 1.0 + inflation;
        self.passive_income - self.expense
    }
}

/// Simulates one lifetime from `current_age` to `life_expectancy`.
///
/// Years with `age <= retirement_age` earn salary; later years live on
/// post-retirement income, so a `retirement_age` below `current_age` (negative
/// included) means already retired. The first year whose closing balance is
/// negative ruins the path: it and every later year are recorded as zero and no
/// more draws are taken from `rng`.
pub fn simulate_lifetime<R: RandomSource + ?Sized>(
    config: &Config,
    retirement_age: i32,
    rng: &mut R,
) -> SimulationPath {
    let ages = config.age_ladder();
    let mut assets = vec![0.0; ages.len()];
    assets[0] = config.current_assets;

    let mut household = Household::new(config);
    let mut ruined_at = None;

    for t in 1..ages.len() {
        let age = ages[t];
        let sampled = sample_year(config, rng);
        household.expense *= 1.0 + sampled.inflation;

        let cashflow = if i64::from(age) <= i64::from(retirement_age) {
            household.working_cashflow(config, age, rng)
        } else {
            household.retired_cashflow(sampled.inflation)
        };

        let balance = assets[t - 1] * (1.0 + sampled.investment_return) + cashflow;
        if balance < 0.0 {
            ruined_at = Some(t);
            break;
        }
        assets[t] = balance;
    }

    SimulationPath {
        ages,
        assets,
        ruined_at,
    }
}
