//! SHM monitor viewer: entry point.
//!
//! Attaches the emulator's System V shared-memory segment, writes a snapshot
//! of the 16-color framebuffer every Nth tick, and feeds key transitions read
//! from stdin back into the emulator's keyboard matrix bytes.
//!
//! # Usage
//!
//! ```text
//! monitor-viewer [OPTIONS]
//!
//! Options:
//!   --config <PATH>          Config file [default: platform config dir]
//!   --shm-key <KEY>          System V key, decimal or 0x-hex
//!   --create                 Create and zero the segment if absent
//!   --tick-ms <MS>           Loop tick length
//!   --redraw-divisor <N>     Redraw once every N ticks
//!   --snapshot <PATH>        PPM snapshot path
//!   --log-level <LEVEL>      error | warn | info | debug | trace
//!   --print-config           Print the effective config and exit
//! ```
//!
//! Key events are typed on stdin, one per line: `down KeyA`, `up KeyA`,
//! `tap Return`, or a hex X11 KeySym such as `down 0xff52`.
//!
//! # Environment variable overrides
//!
//! | Variable                   | Flag               |
//! |----------------------------|--------------------|
//! | `SHM_MONITOR_CONFIG`       | `--config`         |
//! | `SHM_MONITOR_KEY`          | `--shm-key`        |
//! | `SHM_MONITOR_SNAPSHOT`     | `--snapshot`       |
//! | `SHM_MONITOR_LOG_LEVEL`    | `--log-level`      |
//!
//! `RUST_LOG`, when set, takes precedence over every configured log level.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use monitor_core::{ColorTable, FrameDecoder, FrameLayout, KeyboardMatrixEncoder};
use monitor_viewer::application::frame_store::FrameStore;
use monitor_viewer::application::keyboard_bridge::KeyboardBridgeUseCase;
use monitor_viewer::application::refresh_frame::RefreshFrameUseCase;
use monitor_viewer::application::scheduler::{Cadence, RedrawScheduler};
use monitor_viewer::infrastructure::input::{spawn_stdin_reader, ChannelInputSource};
use monitor_viewer::infrastructure::render::PpmSnapshotSink;
use monitor_viewer::infrastructure::storage::config::{
    load_config, load_config_from, to_toml_string, AppConfig, ConfigError, SegmentConfig,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Viewer and keyboard bridge for an emulator publishing its screen over
/// System V shared memory.
///
/// Every flag overrides the matching config file setting.
#[derive(Debug, Parser)]
#[command(name = "monitor-viewer", version)]
struct Cli {
    /// Config file to load instead of the platform default.
    #[arg(long, env = "SHM_MONITOR_CONFIG")]
    config: Option<PathBuf>,

    /// System V key of the emulator's segment (decimal or `0x` hex).
    #[arg(long, env = "SHM_MONITOR_KEY", value_parser = parse_shm_key)]
    shm_key: Option<u32>,

    /// Create and zero the segment when the emulator has not created it.
    #[arg(long)]
    create: bool,

    /// Loop tick length in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Redraw once every this many ticks.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    redraw_divisor: Option<u32>,

    /// Where to write the PPM snapshot on each redraw.
    #[arg(long, env = "SHM_MONITOR_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Log level when `RUST_LOG` is not set.
    #[arg(long, env = "SHM_MONITOR_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// Loads the config file and applies the command-line overrides.
    fn resolve_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => match load_config() {
                Err(ConfigError::NoPlatformConfigDir) => AppConfig::default(),
                other => other.context("failed to load config")?,
            },
        };

        if let Some(key) = self.shm_key {
            config.segment.key = key;
        }
        if self.create {
            config.segment.create = true;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.scheduler.tick_ms = tick_ms;
        }
        if let Some(divisor) = self.redraw_divisor {
            config.scheduler.redraw_divisor = divisor;
        }
        if let Some(path) = &self.snapshot {
            config.render.snapshot_path = path.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.log_level = level.clone();
        }
        Ok(config)
    }
}

fn parse_shm_key(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid shared memory key {s:?}: {e}"))
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    if cli.print_config {
        print!("{}", to_toml_string(&config)?);
        return Ok(());
    }

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `RUST_LOG` wins; otherwise the configured level applies.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level)),
        )
        .init();

    if let Err(e) = run(config).await {
        error!("{e:#}");
        return Err(e);
    }
    Ok(())
}

/// Wires the use cases together and runs the loop until Ctrl+C or a fault.
async fn run(config: AppConfig) -> anyhow::Result<()> {
    let layout = config.layout()?;
    let store = open_segment(&config.segment, &layout)?;

    // ── Keyboard bridge ───────────────────────────────────────────────────────
    let encoder = KeyboardMatrixEncoder::new(config.keyboard_matrix()?);
    let mut keyboard = KeyboardBridgeUseCase::new(Arc::clone(&store), layout, encoder);
    if let Some(joystick) = config.joystick()? {
        info!(port = joystick.port().number(), "keypad drives joystick");
        keyboard = keyboard.with_joystick(joystick);
    }

    // ── Display ───────────────────────────────────────────────────────────────
    let mut refresh = RefreshFrameUseCase::new(
        Arc::clone(&store),
        FrameDecoder::new(layout, ColorTable::c64()),
    );
    let mut sink = PpmSnapshotSink::new(&config.render.snapshot_path);

    // ── Input ─────────────────────────────────────────────────────────────────
    let (tx, rx) = mpsc::unbounded_channel();
    spawn_stdin_reader(tx).context("failed to start stdin reader")?;
    let mut input = ChannelInputSource::new(rx);

    // ── Graceful shutdown ─────────────────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                error!("failed to listen for Ctrl+C signal: {e}");
                // Dropping the sender would stop the loop.
                shutdown_tx.closed().await;
            }
        }
    });

    let mut scheduler = RedrawScheduler::new(Cadence {
        tick: Duration::from_millis(config.scheduler.tick_ms),
        redraw_divisor: config.scheduler.redraw_divisor,
    })?;
    info!(
        key = format_args!("{:#010x}", config.segment.key),
        width = layout.width(),
        height = layout.height(),
        snapshot = %sink.path().display(),
        "viewer starting"
    );

    let summary = scheduler
        .run(&mut input, &mut keyboard, &mut refresh, &mut sink, shutdown_rx)
        .await
        .context("viewer stopped on error")?;

    keyboard
        .release_all()
        .context("failed to release held keys")?;
    info!(
        ticks = summary.ticks,
        events = summary.events,
        frames = summary.frames,
        "viewer stopped"
    );
    Ok(())
}

#[cfg(unix)]
fn open_segment(
    segment: &SegmentConfig,
    layout: &FrameLayout,
) -> anyhow::Result<Arc<dyn FrameStore>> {
    use monitor_viewer::infrastructure::shm::SharedMemorySegment;

    let shm = if segment.create {
        SharedMemorySegment::create(
            segment.key,
            layout.min_segment_len(),
            layout.full_segment_len(),
        )?
    } else {
        SharedMemorySegment::attach(segment.key, layout.min_segment_len())?
    };
    Ok(Arc::new(shm))
}

#[cfg(not(unix))]
fn open_segment(
    segment: &SegmentConfig,
    _layout: &FrameLayout,
) -> anyhow::Result<Arc<dyn FrameStore>> {
    anyhow::bail!(
        "attach: shared memory key {:#010x}: System V shared memory is not available on this platform",
        segment.key
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shm_key_accepts_hex_and_decimal() {
        assert_eq!(parse_shm_key("0x6303b5eb"), Ok(0x6303_b5eb));
        assert_eq!(parse_shm_key("0X10"), Ok(16));
        assert_eq!(parse_shm_key("42"), Ok(42));
        assert!(parse_shm_key("0xnope").is_err());
        assert!(parse_shm_key("-1").is_err());
    }

    #[test]
    fn test_cli_overrides_config_values() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("shm-monitor-cli-{}", uuid::Uuid::new_v4()));
        let cli = Cli::parse_from([
            "monitor-viewer",
            "--config",
            dir.join("absent.toml").to_str().unwrap(),
            "--shm-key",
            "0x1234",
            "--create",
            "--redraw-divisor",
            "3",
            "--snapshot",
            "out.ppm",
        ]);

        // Act
        let config = cli.resolve_config().unwrap();

        // Assert
        assert_eq!(config.segment.key, 0x1234);
        assert!(config.segment.create);
        assert_eq!(config.scheduler.redraw_divisor, 3);
        assert_eq!(config.scheduler.tick_ms, 50);
        assert_eq!(config.render.snapshot_path, PathBuf::from("out.ppm"));
    }

    #[test]
    fn test_zero_redraw_divisor_flag_is_rejected() {
        assert!(Cli::try_parse_from(["monitor-viewer", "--redraw-divisor", "0"]).is_err());
    }
}
