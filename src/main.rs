//! ytdlp-tui - A terminal control panel for yt-dlp and FFmpeg
//!
//! This is the main entry point. It uses the Component Architecture pattern
//! from ratatui: events become Actions, Actions update the App, the App draws.

mod action;
mod app;
mod component;
mod components;
mod config;
mod error;
mod logging;
mod model;
mod orchestrator;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::tui::Tui;
use anyhow::Result;
use crossterm::event::Event;
use std::time::Duration;

fn main() -> Result<()> {
    let config = Config::load().unwrap_or_default();
    if let Some(dir) = Config::config_dir() {
        logging::initialize(&dir, config.level_filter());
    }
    log::info!("ytdlp-tui {} starting", env!("CARGO_PKG_VERSION"));

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    // Create app state
    let mut app = App::new(config);
    app.init()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Stop listening to a job that may still be running
    app.orchestrator.shutdown();

    // Cleanup terminal
    tui.exit()?;

    // Handle any errors
    if let Err(err) = result {
        log::error!("fatal: {:?}", err);
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    log::info!("ytdlp-tui exiting");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                log::error!("draw error: {}", e);
            }
        })?;

        // Poll for events
        if let Some(event) = tui.next_event()? {
            // Convert event to action
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse)?,
                Event::Paste(text) => app.handle_paste(text)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Process the action
            if let Some(action) = action {
                log::trace!("action {}", action);
                // Action might produce a follow-up action
                let mut current_action = Some(action);
                while let Some(a) = current_action {
                    current_action = app.update(a)?;
                }
            }
        } else {
            // No event - send a tick for time-based updates
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
