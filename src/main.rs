use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fire_ruin::api::{ConfigOverrides, compute_report, render_text, run_http_server};
use fire_ruin::core::asset_snapshots;

#[derive(Parser, Debug)]
#[command(
    name = "fire-ruin",
    about = "Monte Carlo estimate of running out of money by retirement age"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON simulation API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Run one report and print it.
    Simulate {
        #[command(flatten)]
        overrides: ConfigOverrides,
        #[arg(long, help = "Print the report as JSON instead of a table")]
        json: bool,
        #[arg(
            long,
            default_value_t = 60,
            allow_negative_numbers = true,
            help = "Retirement age used for the asset snapshot table"
        )]
        snapshot_retire_age: i32,
        #[arg(long, value_delimiter = ',', default_values_t = [40, 45, 50])]
        snapshot_ages: Vec<u32>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Simulate {
            overrides,
            json,
            snapshot_retire_age,
            snapshot_ages,
        } => {
            if let Err(e) = simulate(overrides, json, snapshot_retire_age, &snapshot_ages) {
                eprintln!("Error: {e}");
                std::process::exit(2);
            }
        }
    }
}

fn simulate(
    overrides: ConfigOverrides,
    json: bool,
    snapshot_retire_age: i32,
    snapshot_ages: &[u32],
) -> Result<(), Box<dyn std::error::Error>> {
    let request = overrides.into_request();
    let report = compute_report(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    // Snapshot ages outside the age ladder are skipped.
    let ladder = request.config.current_age..=request.config.life_expectancy;
    let ages = snapshot_ages
        .iter()
        .copied()
        .filter(|age| ladder.contains(age))
        .collect::<Vec<_>>();
    let snapshots = asset_snapshots(&request.config, snapshot_retire_age, &ages)?;
    print!("{}", render_text(&report, snapshot_retire_age, &snapshots));
    Ok(())
}
