use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::info;

/// Opens the configuration file for the user
pub trait ConfigEditor {
    fn open(&self, path: &Path) -> Result<()>;
}

/// Launches the platform text editor without waiting for it to exit
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEditor;

impl ConfigEditor for SystemEditor {
    fn open(&self, path: &Path) -> Result<()> {
        let mut command = editor_command(path, |key| std::env::var_os(key));
        info!(command = ?command, "Opening configuration in editor");
        command
            .spawn()
            .with_context(|| format!("Failed to open {} in an editor", path.display()))?;
        Ok(())
    }
}

#[cfg(windows)]
fn editor_command(path: &Path, _env: impl Fn(&str) -> Option<std::ffi::OsString>) -> Command {
    // `start` detaches notepad from our process; the empty string is the window title
    let mut command = Command::new("cmd.exe");
    command.args(["/C", "start", "", "notepad.exe"]).arg(path);
    command
}

#[cfg(not(windows))]
fn editor_command(path: &Path, env: impl Fn(&str) -> Option<std::ffi::OsString>) -> Command {
    let program = env("VISUAL")
        .filter(|v| !v.is_empty())
        .or_else(|| env("EDITOR").filter(|v| !v.is_empty()))
        .unwrap_or_else(|| {
            let opener = if cfg!(target_os = "macos") { "open" } else { "xdg-open" };
            std::ffi::OsString::from(opener)
        });
    let mut command = Command::new(program);
    command.arg(path);
    command
}
