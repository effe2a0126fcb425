// MediAdmin - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation (debug mode support)
// 3. Backend client construction and current-user lookup
// 4. Translation catalog loading
// 5. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can keep using
// `crate::app::...`, `crate::core::...` etc.
pub use mediadmin::app;

pub use mediadmin::core;
pub use mediadmin::platform;
pub use mediadmin::ui;
pub use mediadmin::util;

use crate::app::backend::Backend;
use crate::app::http::HttpBackend;
use crate::app::i18n::Catalog;
use crate::app::view::ViewDeps;
use crate::core::model::ResourceKind;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// MediAdmin - Native admin console for media events and series.
///
/// Lists, filters and manages the events and series served by an admin
/// REST backend, refreshing the visible table in the background.
#[derive(Parser, Debug)]
#[command(name = "MediAdmin", version, about)]
struct Cli {
    /// Path of the config file (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Backend base URL, overriding [backend] base_url.
    #[arg(short = 'u', long = "base-url")]
    base_url: Option<String>,

    /// Initial view: "events" or "series".
    #[arg(short = 'v', long = "view")]
    view: Option<ResourceKind>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Load configuration before logging so [logging] applies from the start.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (mut config, config_warnings) = match cli.config.as_deref() {
        Some(path) => platform::config::load_config_file(path),
        None => platform::config::load_config(&platform_paths.config_dir),
    };

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform_paths.config_file());
    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "MediAdmin starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    if let Some(url) = cli.base_url {
        config.base_url = url;
    }

    let backend = match HttpBackend::new(config.http_settings()) {
        Ok(b) => Arc::new(b),
        Err(e) => {
            tracing::error!(error = %e, "Failed to configure backend client");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // Without a user every privileged control stays hidden.
    let user = match backend.fetch_user() {
        Ok(user) => {
            tracing::info!(user = %user.username, roles = user.roles.len(), "Signed in");
            Some(user)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not load current user; continuing without permissions");
            None
        }
    };

    let catalog = match config.catalog_path.as_deref() {
        Some(path) => Catalog::load(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to bundled translations");
            Catalog::bundled()
        }),
        None => Catalog::bundled(),
    };

    let deps = ViewDeps {
        backend,
        user,
        permissions: config.permissions.clone(),
        refresh_interval: config.refresh_interval,
        page_size: config.page_size,
    };

    tracing::info!("Ready to launch GUI");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let initial_view = cli.view;
    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |_cc| {
            Ok(Box::new(gui::AdminApp::new(
                deps,
                catalog,
                initial_view,
                config_warnings,
            )))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch MediAdmin GUI: {e}");
        std::process::exit(1);
    }
}
