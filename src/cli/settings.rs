use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::{platform::GenericAutostart, store::settings::SettingsStore};

use super::{report_platform_error, warn_user};

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    #[command(about = "Show the current settings")]
    Show,
    #[command(about = "Change settings; omitted options keep their value")]
    Set {
        #[arg(long, help = "Window opacity, between 0.1 and 1.0")]
        opacity: Option<f64>,
        #[arg(long, help = "Keep the widget above other windows")]
        always_on_top: Option<bool>,
        #[arg(long, help = "Launch the widget at login")]
        autostart: Option<bool>,
        #[arg(long, help = "Window width in pixels")]
        width: Option<u32>,
        #[arg(long, help = "Window height in pixels")]
        height: Option<u32>,
        #[arg(long, help = "Window left edge")]
        x: Option<i32>,
        #[arg(long, help = "Window top edge")]
        y: Option<i32>,
    },
}

pub async fn process_settings_command(dir: PathBuf, command: SettingsCommand) -> Result<()> {
    let mut settings = SettingsStore::open(&dir).await;

    match command {
        SettingsCommand::Show => {
            let current = settings.get();
            println!("opacity:       {}", current.opacity);
            println!("always on top: {}", current.always_on_top);
            println!("autostart:     {}", current.autostart);
            println!(
                "geometry:      {}x{} at ({}, {})",
                current.window_geometry.width,
                current.window_geometry.height,
                current.window_geometry.x,
                current.window_geometry.y,
            );
        }
        SettingsCommand::Set {
            opacity,
            always_on_top,
            autostart,
            width,
            height,
            x,
            y,
        } => {
            if let Some(opacity) = opacity {
                if let Err(e) = settings.set_opacity(opacity).await {
                    warn_user(e);
                }
            }
            if let Some(always_on_top) = always_on_top {
                settings.set_always_on_top(always_on_top).await;
            }
            if width.is_some() || height.is_some() || x.is_some() || y.is_some() {
                let mut geometry = settings.get().window_geometry;
                if let Some(width) = width {
                    geometry.width = width;
                }
                if let Some(height) = height {
                    geometry.height = height;
                }
                if let Some(x) = x {
                    geometry.x = x;
                }
                if let Some(y) = y {
                    geometry.y = y;
                }
                settings.set_geometry(geometry).await;
            }
            if let Some(enabled) = autostart {
                match GenericAutostart::new() {
                    Ok(registration) => {
                        if let Err(e) = settings.apply_autostart(&registration, enabled).await {
                            // The stored flag still matches the actual registration state.
                            report_platform_error(e);
                        }
                    }
                    Err(e) => report_platform_error(e),
                }
            }
        }
    }
    Ok(())
}
