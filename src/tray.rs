//! System tray with "Edit configuration" and "Quit" entries (Windows)
//!
//! The tray lives on its own thread with its own Win32 message loop; menu
//! clicks are forwarded into the reconciler's event queue and nothing else.

#![allow(unsafe_code)]

use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use tray_icon::{
    menu::{Menu, MenuEvent, MenuItem},
    Icon, TrayIcon, TrayIconBuilder,
};
use windows_sys::Win32::System::Threading::GetCurrentThreadId;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, PeekMessageW, PostThreadMessageW, TranslateMessage, MSG,
    PM_NOREMOVE, WM_QUIT, WM_USER,
};

use crate::constants::{app, menu as labels};
use crate::icon::TrayImage;
use crate::reconciler::Event;

/// Running tray thread; [`TrayHandle::shutdown`] removes the icon
pub struct TrayHandle {
    thread_id: u32,
    thread: JoinHandle<()>,
}

impl TrayHandle {
    /// Stop the message loop and wait until the icon is gone
    pub fn shutdown(self) {
        let posted = unsafe { PostThreadMessageW(self.thread_id, WM_QUIT, 0, 0) };
        if posted == 0 {
            warn!(thread_id = self.thread_id, "Failed to stop tray message loop");
            return;
        }
        if self.thread.join().is_err() {
            error!("Tray thread panicked");
        }
    }
}

/// Create the tray on its own thread
///
/// Returns once the icon is visible, or with the build error. Without a tray
/// there would be no way to quit, so a failure here is fatal for the caller.
pub fn spawn(image: Option<TrayImage>, events: Sender<Event>) -> Result<TrayHandle> {
    let handle = spawn_message_thread(move || create_tray_icon(image, events))
        .context("Failed to start tray")?;
    info!("Tray icon created");
    Ok(handle)
}

/// Run `build` on a new thread that then pumps Win32 messages
///
/// The built value lives until the message loop ends and is dropped on that
/// same thread, which is where tray-icon requires its icon to be removed.
fn spawn_message_thread<T, F>(build: F) -> Result<TrayHandle>
where
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<u32>>(1);

    let thread = thread::Builder::new()
        .name("tray".to_string())
        .spawn(move || {
            let built = match build() {
                Ok(built) => built,
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                    return;
                }
            };
            ensure_message_queue();
            let _ = ready_tx.send(Ok(unsafe { GetCurrentThreadId() }));
            pump_messages();
            drop(built);
            debug!("Tray thread finished");
        })
        .context("Failed to spawn tray thread")?;

    let thread_id = ready_rx
        .recv()
        .context("Tray thread exited during startup")??;
    Ok(TrayHandle { thread_id, thread })
}

fn create_tray_icon(image: Option<TrayImage>, events: Sender<Event>) -> Result<TrayIcon> {
    let menu = Menu::new();
    let edit_item = MenuItem::new(labels::EDIT_CONFIG, true, None);
    let quit_item = MenuItem::new(labels::QUIT, true, None);
    menu.append(&edit_item)
        .context("Failed to append edit menu item")?;
    menu.append(&quit_item)
        .context("Failed to append quit menu item")?;

    let edit_id = edit_item.id().clone();
    let quit_id = quit_item.id().clone();
    MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
        let forwarded = if event.id == edit_id {
            Event::OpenConfig
        } else if event.id == quit_id {
            Event::Quit
        } else {
            return;
        };
        debug!(event = ?forwarded, "tray menu clicked");
        if events.send(forwarded).is_err() {
            warn!("event queue closed, dropping menu click");
        }
    }));

    let mut builder = TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_tooltip(app::NAME);

    let icon = match image {
        Some(TrayImage::Rgba { rgba, width, height }) => {
            Some(Icon::from_rgba(rgba, width, height))
        }
        Some(TrayImage::Ico(path)) => Some(Icon::from_path(&path, None)),
        None => None,
    };
    match icon {
        Some(Ok(icon)) => builder = builder.with_icon(icon),
        Some(Err(err)) => warn!(error = %err, "Icon rejected by tray, showing none"),
        None => {}
    }

    builder.build().context("Failed to build tray icon")
}

/// Thread messages are dropped until the thread owns a queue
fn ensure_message_queue() {
    unsafe {
        let mut msg: MSG = std::mem::zeroed();
        PeekMessageW(&mut msg, std::ptr::null_mut(), WM_USER, WM_USER, PM_NOREMOVE);
    }
}

/// Standard Win32 message loop; returns when the thread receives `WM_QUIT`
fn pump_messages() {
    unsafe {
        let mut msg: MSG = std::mem::zeroed();
        while GetMessageW(&mut msg, std::ptr::null_mut(), 0, 0) > 0 {
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}
