//! TarangIO - mmWave radar stream decoder
//!
//! Replays a captured sensor byte stream (file or stdin), decodes each frame
//! and logs its detections in both sensor and shared coordinates.
//!
//! ```text
//! cat capture.bin | tarang-io --config tarangio.toml
//! ```

use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, UNIX_EPOCH};
use tarang_io::transport::{ReaderTransport, Transport};
use tarang_io::{AppConfig, Error, Frame, FrameReader, Result};

/// Parse config path from command line arguments.
///
/// Supports:
/// - `tarang-io <path>` (positional)
/// - `tarang-io --config <path>` (flag-based)
/// - `tarang-io -c <path>` (short flag)
///
/// Defaults to `/etc/tarangio.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    "/etc/tarangio.toml".to_string()
}

fn open_input(path: &str) -> Result<Box<dyn Transport>> {
    if path == "-" {
        log::info!("Reading sensor stream from stdin");
        Ok(Box::new(ReaderTransport::stdin()))
    } else {
        Ok(Box::new(ReaderTransport::open(path)?))
    }
}

fn log_frame(frame: &Frame) {
    let header = frame.header();
    if frame.is_empty() {
        log::debug!("Frame #{} - no objects detected", header.frame_number);
        return;
    }

    let ts = frame
        .received_at()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default();
    log::info!(
        "Frame #{} at {:.3} (sub-frame {}, platform {}) - {} objects:",
        header.frame_number,
        ts,
        header.sub_frame,
        header.platform_hex(),
        frame.len()
    );
    for (i, (local, global)) in frame.iter().enumerate() {
        log::info!(
            "  {:<3} x={:>7.3} y={:>7.3} z={:>7.3} v={:>7.3} r={:>7.3} az={:>6.1} el={:>6.1} snr={:>5} noise={:>5} -> ({:.3}, {:.3}, {:.3})",
            i,
            local.x,
            local.y,
            local.z,
            local.v,
            local.range,
            local.azimuth,
            local.elevation,
            local.snr,
            local.noise,
            global.position.x,
            global.position.y,
            global.position.z
        );
    }
}

fn main() -> Result<()> {
    let config_path = parse_config_path();
    let config = AppConfig::load(&config_path)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("TarangIO v{} starting...", env!("CARGO_PKG_VERSION"));
    log::info!("Using config: {}", config_path);
    log::info!(
        "Sensor {} at ({:.2}, {:.2}, {:.2}) m, yaw {:.1} pitch {:.1} roll {:.1} deg",
        config.sensor.id,
        config.sensor.x,
        config.sensor.y,
        config.sensor.z,
        config.sensor.yaw,
        config.sensor.pitch,
        config.sensor.roll
    );

    let mut transport = open_input(&config.input.path)?;
    let mut reader = FrameReader::new(&config.sensor, config.reader);
    let poll_interval = Duration::from_millis(config.input.poll_interval_ms);

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    while running.load(Ordering::Relaxed) {
        match reader.read_frame(transport.as_mut())? {
            Some(frame) => log_frame(&frame),
            None if transport.is_closed() => {
                for frame in reader.drain_frames() {
                    log_frame(&frame);
                }
                break;
            }
            None => thread::sleep(poll_interval),
        }
    }

    let stats = reader.stats();
    log::info!(
        "Processed {} frames ({} corrupt, {} bytes discarded, {} buffer trims, {} bytes left over)",
        stats.frames,
        stats.corrupt_frames,
        stats.bytes_discarded,
        stats.buffer_trims,
        reader.buffered()
    );

    Ok(())
}
