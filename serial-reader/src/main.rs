mod config;
mod detect;
mod reader;

use crate::config::Config;
use chrono::DateTime;
use clap::Parser;
use estimator::EstimatorState;
use estimator::constants::READER_DT_HOURS;
use protocol::BlockAccumulator;
use serialport::SerialPort;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use storage::{TelemetryRepository, create_pool};
use telemetry::TelemetrySample;
use tokio::sync::mpsc;

/// Reads telemetry blocks from the station's sensor board over serial and
/// appends derived samples to the station database.
#[derive(Parser, Debug)]
#[command(version, about = "Hybrid station serial reader", long_about = None)]
struct Args {
    /// Serial port path; scans for the board when omitted
    port: Option<String>,
}

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();
    let config = Config::load().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });

    println!("Starting hybrid station serial reader");

    let port_path = match args.port {
        Some(port) => {
            println!("Using specified port: {}", port);
            port
        }
        None => match detect::auto_detect(config.serial.baud_rate, config.serial.timeout()) {
            Some(port) => port,
            None => {
                eprintln!("Failed to detect the sensor board. Exiting.");
                std::process::exit(1);
            }
        },
    };

    let pool = match create_pool(&config.database.path).await {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("Failed to open database {}: {}", config.database.path, err);
            std::process::exit(1);
        }
    };
    let repository = TelemetryRepository::new(pool);

    println!(
        "Connecting to {} at {} baud...",
        port_path, config.serial.baud_rate
    );
    let port = match reader::open_port(&port_path, config.serial.baud_rate, config.serial.timeout())
    {
        Ok(port) => port,
        Err(err) => {
            eprintln!("Error: {}", err);
            eprintln!("Make sure:");
            eprintln!("  1. The board is connected via USB");
            eprintln!("  2. The port path is correct (ls /dev/ttyACM*)");
            eprintln!("  3. You have permission to access the port (dialout group)");
            std::process::exit(1);
        }
    };
    println!("Connected to {}", port_path);
    println!("Waiting for sensor data...");

    let stop = Arc::new(AtomicBool::new(false));
    let (tx, mut rx) = mpsc::channel::<TelemetrySample>(32);

    let device_stop = stop.clone();
    let device_handle = std::thread::spawn(move || run_device_loop(port, device_stop, tx));

    let mut sample_count: u64 = 0;
    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(sample) => {
                    if let Err(err) = repository.save(&sample).await {
                        log::error!("failed to store sample: {}", err);
                        stop.store(true, Ordering::Relaxed);
                        break;
                    }
                    sample_count += 1;
                    print_status(sample_count, &sample);
                }
                // The device loop ended on an I/O failure; it already
                // reported why.
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                println!("\nSerial reader stopped");
                stop.store(true, Ordering::Relaxed);
                break;
            }
        }
    }

    // Unblocks a device loop stuck on a full channel, then wait for it to
    // drop the port handle.
    drop(rx);
    if device_handle.join().is_err() {
        log::error!("device loop panicked");
    }
    println!("Serial port closed");
    println!("Database connection closed");
}

/// The sequential device loop: line → block → estimate → hand off.
/// Runs on its own thread because the serial reads block (bounded by the
/// configured timeout).
fn run_device_loop(
    port: Box<dyn SerialPort>,
    stop: Arc<AtomicBool>,
    tx: mpsc::Sender<TelemetrySample>,
) {
    let mut lines = reader::LineReader::new(port);
    let mut accumulator = BlockAccumulator::new();
    let mut state = EstimatorState::default();

    while !stop.load(Ordering::Relaxed) {
        match lines.next_line() {
            // Timed out with no data: a normal quiet link, poll again.
            Ok(None) => continue,
            Ok(Some(line)) => {
                let Some(raw) = accumulator.push_line(&line) else {
                    continue;
                };

                let derived = estimator::estimate(&raw, &state, READER_DT_HOURS);
                state.advance(&derived);

                let sample = TelemetrySample::from_parts(
                    chrono::Utc::now().timestamp(),
                    &raw,
                    derived.v_bat,
                    derived.soc,
                    derived.wind_speed,
                );
                if tx.blocking_send(sample).is_err() {
                    break;
                }
            }
            Err(err) => {
                log::error!("serial read failed: {}", err);
                break;
            }
        }
    }
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
