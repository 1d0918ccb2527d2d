#![deny(unsafe_code)]
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

mod color;
mod comparator;
mod config;
mod constants;
mod editor;
mod error;
mod icon;
mod notify;
mod reconciler;
#[cfg(unix)]
mod signals;
mod sys_colors;
mod ticker;
#[cfg(windows)]
mod tray;

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use tracing::{error, info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use color::SysColor;
use config::Config;
use editor::SystemEditor;
use error::StartupError;
use icon::TrayImage;
use notify::{DesktopNotifier, Notice, Notifier};
use reconciler::{Reconciler, TickOutcome};
use sys_colors::SystemColors;

#[derive(Parser)]
#[command(
    name = "wallpaper-watch",
    version,
    about = "Keeps the desktop background color at a configured value"
)]
struct Cli {
    /// Configuration file (default: ./config.json, then the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Image shown in the system tray (.ico or .png)
    #[arg(long, default_value = constants::icon::FILENAME)]
    icon: PathBuf,
    /// Work on an in-memory color table instead of the system colors
    #[arg(long)]
    simulate: bool,
    /// Run a single check-and-correct pass, then exit
    #[arg(long)]
    once: bool,
}

fn init_tracing() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Load the configuration and decode the desired color, both fatal on failure
fn load_desired(path: &Path) -> Result<(Config, SysColor), StartupError> {
    let config = Config::load(path)?;
    let desired = config.desired_color()?;
    Ok((config, desired))
}

/// Fatal startup steps; the user has been notified when this returns `Err`
fn startup(
    path: &Path,
    notifier: &impl Notifier,
) -> Result<(Config, SysColor), StartupError> {
    load_desired(path).inspect_err(|err| {
        error!(error = %err, "Startup failed");
        notifier.notify(err.notice());
    })
}

/// Non-fatal: the tray simply shows no image
fn load_tray_image(path: &Path, notifier: &impl Notifier) -> Option<TrayImage> {
    icon::load(path)
        .inspect_err(|err| {
            warn!(error = %err, "Continuing without tray icon");
            notifier.notify(Notice::IconLoadError);
        })
        .ok()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing() {
        eprintln!("Failed to initialize logging: {err}");
    }

    let notifier = DesktopNotifier;
    let config_path = config::resolve_path(cli.config.as_deref());
    let (config, desired) = match startup(&config_path, &notifier) {
        Ok(loaded) => loaded,
        Err(err) => return ExitCode::from(err.exit_status()),
    };
    info!(path = %config_path.display(), desired = %desired, "Configuration loaded");

    let colors = sys_colors::host_facility(cli.simulate);
    let reconciler = Reconciler::new(desired, colors, notifier)
        .with_policy(config.notify_policy)
        .with_editor(SystemEditor, config_path);

    if cli.once {
        return run_once(reconciler);
    }

    match run(&cli, &config, reconciler) {
        Ok(code) => code,
        Err(err) => {
            error!(error = ?err, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

fn run_once<C: SystemColors, N: Notifier>(mut reconciler: Reconciler<C, N>) -> ExitCode {
    match reconciler.tick() {
        TickOutcome::InSync | TickOutcome::Corrected => ExitCode::SUCCESS,
        TickOutcome::CorrectionFailed => ExitCode::FAILURE,
    }
}

fn run<C: SystemColors, N: Notifier>(
    cli: &Cli,
    config: &Config,
    mut reconciler: Reconciler<C, N>,
) -> Result<ExitCode> {
    let (events_tx, events_rx) = mpsc::channel();

    let image = load_tray_image(&cli.icon, reconciler.notifier());

    #[cfg(windows)]
    let tray = tray::spawn(image, events_tx.clone())?;
    #[cfg(not(windows))]
    {
        drop(image);
        info!("No tray on this platform, stop with Ctrl+C");
    }

    #[cfg(unix)]
    let _signals = signals::spawn(events_tx.clone())?;

    let _ticker = ticker::spawn(config.interval(), events_tx)?;

    let code = reconciler.run(&events_rx);

    // Remove the tray icon; the other helper threads die with the process
    #[cfg(windows)]
    tray.shutdown();

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::RecordingNotifier;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn png_bytes() -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, 1, 1);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[1, 2, 3, 4]).unwrap();
            writer.finish().unwrap();
        }
        out
    }

    #[test]
    fn test_startup_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = RecordingNotifier::default();

        let err = startup(&dir.path().join("config.json"), &notifier).unwrap_err();

        assert!(matches!(err, StartupError::ConfigLoad(_)));
        assert_eq!(err.exit_status(), 1);
        assert_eq!(notifier.notices(), vec![Notice::ConfigLoadError]);
    }

    #[test]
    fn test_startup_unparsable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "config.json", b"{ \"color\": ");
        let notifier = RecordingNotifier::default();

        let err = startup(&path, &notifier).unwrap_err();

        assert!(matches!(err, StartupError::ConfigLoad(_)));
        assert_eq!(err.exit_status(), 1);
        assert_eq!(notifier.notices(), vec![Notice::ConfigLoadError]);
    }

    #[test]
    fn test_startup_invalid_color() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "config.json", br##"{ "color": "#12345G" }"##);
        let notifier = RecordingNotifier::default();

        let err = startup(&path, &notifier).unwrap_err();

        assert!(matches!(err, StartupError::InvalidColorFormat(_)));
        assert_eq!(err.exit_status(), 1);
        assert_eq!(notifier.notices(), vec![Notice::InvalidColorFormat]);
    }

    #[test]
    fn test_startup_valid_config_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "config.json", br##"{ "color": "#1A2B3C" }"##);
        let notifier = RecordingNotifier::default();

        let (config, desired) = startup(&path, &notifier).unwrap();

        assert_eq!(desired, SysColor::from_rgb(0x1A, 0x2B, 0x3C));
        assert_eq!(config.interval_secs, constants::schedule::DEFAULT_INTERVAL_SECS);
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn test_missing_icon_notifies_once_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = RecordingNotifier::default();

        let image = load_tray_image(&dir.path().join("icon.ico"), &notifier);

        assert!(image.is_none());
        assert_eq!(notifier.notices(), vec![Notice::IconLoadError]);
    }

    #[test]
    fn test_undecodable_icon_notifies_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "icon.png", b"\x89PNG\r\n\x1a\nbroken");
        let notifier = RecordingNotifier::default();

        assert!(load_tray_image(&path, &notifier).is_none());
        assert_eq!(notifier.notices(), vec![Notice::IconLoadError]);
    }

    #[test]
    fn test_valid_icon_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "icon.png", &png_bytes());
        let notifier = RecordingNotifier::default();

        assert!(load_tray_image(&path, &notifier).is_some());
        assert!(notifier.notices().is_empty());
    }
}
