// Display capture and window placement are Win32-only; elsewhere only the
// platform-neutral logic and its tests are built.
#![cfg_attr(not(windows), allow(dead_code, unused_imports))]

mod config;
mod logging;
mod monitor;
mod overlay;
#[cfg(windows)]
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::config::Config;

fn main() -> Result<()> {
    let config = Config::parse();
    logging::init(config.debug);

    info!(
        event = "app.startup",
        mode = ?config.operating_mode(),
        version = env!("CARGO_PKG_VERSION")
    );
    run(config)
}

#[cfg(windows)]
fn run(config: Config) -> Result<()> {
    use anyhow::Context;
    use gpui::{AppContext, Application, WindowOptions};
    use tracing::{error, warn};

    use crate::monitor::{Win32Displays, initial_resolution, list_monitors};
    use crate::overlay::{PlacementController, spawn_main_window};
    use crate::ui::Controller;

    let mode = config.operating_mode();
    let preview_options = config.preview_options();

    // Discover connected monitors.
    let monitors = list_monitors(&Win32Displays::new(), &preview_options)
        .context("Failed to enumerate monitors")?;

    if config.list_monitors {
        println!("{}", serde_json::to_string_pretty(&monitors)?);
        return Ok(());
    }

    for (i, mon) in monitors.iter().enumerate() {
        info!(
            event = "app.monitor_listed",
            index = i,
            label = %mon.display_label,
            x = mon.origin_x,
            y = mon.origin_y
        );
    }

    let (width, height) =
        initial_resolution(&monitors).context("No monitors detected, nothing to overlay")?;

    let window =
        spawn_main_window(mode, width, height).context("Failed to create the main window")?;
    let mut placement = PlacementController::new(window, mode);

    let current = match placement.place_on_monitor(config.monitor, &monitors) {
        Ok(()) => Some(config.monitor),
        Err(e) => {
            warn!(event = "app.initial_placement_failed", code = e.error_code(), error = %e);
            None
        }
    };

    // Launch the monitor picker.
    Application::new().run(move |app: &mut gpui::App| {
        let opened = app.open_window(
            WindowOptions {
                titlebar: Some(gpui::TitlebarOptions {
                    title: Some("Glass Overlay".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            move |_, cx| {
                cx.new(move |_| Controller::new(monitors, placement, preview_options, current))
            },
        );

        if let Err(e) = opened {
            error!(event = "app.picker_open_failed", error = %e);
            app.quit();
        }
    });

    Ok(())
}

#[cfg(not(windows))]
fn run(_config: Config) -> Result<()> {
    anyhow::bail!("glass-overlay requires Windows: display capture and window placement use Win32")
}
