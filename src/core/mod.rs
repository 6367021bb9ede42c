mod engine;
mod error;
mod projection;
mod random;
mod report;
mod sweep;
mod types;

pub use engine::{CareerState, simulate_lifetime};
pub use error::FireError;
pub use projection::{asset_snapshots, percentile, project};
pub use random::{RandomSource, SeededSource, Stream};
pub use report::run_report;
pub use sweep::{SAFE_RUIN_RATE, select_recommended_age, sweep};
pub use types::{
    AgeSnapshot, Config, ProjectionResult, Projections, Report, RuinRateRecord, SimulationPath,
    SweepResult,
};
