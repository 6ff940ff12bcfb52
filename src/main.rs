// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Inkpad - Main Entry Point
//!
//! A small tabbed note and code editor with autosave and a password lock.
//! Built with Rust and egui.

mod app;
mod cloud;
mod config;
mod editor;
mod error;
mod export;
mod files;
mod session;
mod storage;
mod theme;
mod ui;

use app::{AppStore, InkpadApp};
use config::{load_config, Settings};
use error::Error;
use log::{error, info, warn};
use session::Session;
use storage::{JsonFileStore, MemoryStore};

/// Application name constant.
const APP_NAME: &str = "Inkpad";

/// Store file used when no platform data directory is available.
const FALLBACK_STORE_FILE: &str = "inkpad-storage.json";

/// Open the persistent store and the session on top of it.
///
/// Falls back to an in-memory store if the stored lock state cannot be
/// read, so the editor still starts; the problem is returned for display.
fn open_session(settings: &Settings) -> Result<(Session<AppStore>, Option<Error>), Error> {
    let store = match JsonFileStore::open_default() {
        Ok(store) => store,
        Err(e) => {
            warn!("{}; using {} in the working directory", e, FALLBACK_STORE_FILE);
            JsonFileStore::open(FALLBACK_STORE_FILE)
        }
    };

    match Session::open(Box::new(store) as AppStore, settings.clone()) {
        Ok(session) => Ok((session, None)),
        Err(e) => {
            error!("Could not open stored session: {}", e);
            let problem = Error::Application(format!(
                "Stored data could not be read ({}). Changes in this window will not be saved.",
                e
            ));
            let session = Session::open(Box::new(MemoryStore::new()) as AppStore, settings.clone())?;
            Ok((session, Some(problem)))
        }
    }
}

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    let settings = load_config();
    let window_size = settings.window_size;
    info!(
        "Window configuration: {}x{}",
        window_size.width, window_size.height
    );

    let (session, startup_problem) = match open_session(&settings) {
        Ok(opened) => opened,
        Err(e) => {
            error!("Cannot start {}: {}", APP_NAME, e);
            std::process::exit(1);
        }
    };

    let viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([360.0, 280.0]);

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(InkpadApp::new(
                cc,
                session,
                settings,
                startup_problem,
            )))
        }),
    )
}
