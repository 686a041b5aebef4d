use crate::reader::{LineReader, open_port};
use protocol::{Line, parse_line};
use serialport::SerialPortType;
use std::time::{Duration, Instant};

/// How long to listen on a candidate port before ruling it out.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);
/// Lines inspected per candidate before giving up on it.
const PROBE_MAX_LINES: usize = 20;

/// USB-serial ports the board could be sitting on.
pub fn find_candidate_ports() -> Vec<String> {
    let mut ports: Vec<String> = serialport::available_ports()
        .unwrap_or_default()
        .into_iter()
        .filter(|info| {
            info.port_name.starts_with("/dev/ttyACM")
                || info.port_name.starts_with("/dev/ttyUSB")
                || matches!(info.port_type, SerialPortType::UsbPort(_))
        })
        .map(|info| info.port_name)
        .collect();
    ports.sort();
    ports.dedup();
    ports
}

fn is_station_data(line: &str) -> bool {
    matches!(
        parse_line(line),
        Line::Solar { .. } | Line::Wind { .. } | Line::LuxFan { .. }
    )
}

/// Listens briefly on a port and reports whether it is emitting station
/// protocol lines. The port handle is released on return either way.
pub fn probe_port(path: &str, baud_rate: u32, timeout: Duration) -> bool {
    let Ok(port) = open_port(path, baud_rate, timeout) else {
        return false;
    };
    let mut lines = LineReader::new(port);

    let deadline = Instant::now() + PROBE_TIMEOUT;
    let mut checked = 0;
    while Instant::now() < deadline && checked < PROBE_MAX_LINES {
        match lines.next_line() {
            Ok(Some(line)) if !line.is_empty() => {
                if is_station_data(&line) {
                    return true;
                }
                checked += 1;
            }
            Ok(_) => {}
            Err(_) => return false,
        }
    }
    false
}

/// Scans candidate ports and returns the first one emitting station data.
pub fn auto_detect(baud_rate: u32, timeout: Duration) -> Option<String> {
    println!("Scanning for the sensor board...");

    let ports = find_candidate_ports();
    if ports.is_empty() {
        println!("No serial ports found. Is the board connected via USB?");
        return None;
    }

    println!("Found {} serial port(s): {}", ports.len(), ports.join(", "));
    for port in ports {
        println!("  Testing {}...", port);
        if probe_port(&port, baud_rate, timeout) {
            println!("  Sensor board detected on {}", port);
            return Some(port);
        }
        println!("  No station data on {}", port);
    }

    println!("No sensor board found on any port.");
    None
}
