mod config;

use crate::config::Config;
use chrono::DateTime;
use clap::Parser;
use estimator::constants::SIM_INTERVAL_SECS;
use simulator::Generator;
use std::time::{Duration, Instant};
use storage::{TelemetryRepository, create_pool};
use telemetry::TelemetrySample;

/// Synthetic telemetry generator for the hybrid station
#[derive(Parser, Debug)]
#[command(version, about = "Hybrid station telemetry simulator", long_about = None)]
struct Args {
    /// RNG seed for a reproducible run (defaults to OS entropy)
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();
    let config = Config::load().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });

    println!("Starting hybrid station simulator");
    println!("  Database: {}", config.database.path);
    println!("  Interval: {}s", SIM_INTERVAL_SECS);

    let pool = match create_pool(&config.database.path).await {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("Failed to open database {}: {}", config.database.path, err);
            std::process::exit(1);
        }
    };
    let repository = TelemetryRepository::new(pool);

    let mut generator = Generator::new(args.seed);
    let start = Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_secs(SIM_INTERVAL_SECS));
    let mut sample_count: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let elapsed_hours = start.elapsed().as_secs_f64() / 3600.0;
                let timestamp = chrono::Utc::now().timestamp();
                let sample = generator.next_sample(timestamp, elapsed_hours);

                if let Err(err) = repository.save(&sample).await {
                    log::error!("failed to store sample: {}", err);
                    break;
                }
                sample_count += 1;
                print_status(sample_count, &sample);
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\nSimulator stopped");
                break;
            }
        }
    }

    println!("Database connection closed");
}

fn print_status(count: u64, sample: &TelemetrySample) {
    let when = DateTime::from_timestamp(sample.timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| sample.timestamp.to_string());

    println!(
        "[{}] Sample #{}: PV={:.1}V/{:.2}A, Wind={:.1}V/{:.2}A, Battery={:.2}V ({:.1}%), \
         WindSpeed={:.1}m/s, Lux={:.0}",
        when,
        count,
        sample.v_pv,
        sample.i_pv,
        sample.v_wind,
        sample.i_wind,
        sample.v_bat,
        sample.soc,
        sample.wind_speed,
        sample.lux
    );
}
