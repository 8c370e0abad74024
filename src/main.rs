#![windows_subsystem = "windows"]

use anyhow::Result;
use gifter::{config::Config, gui};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    // GUI loads user settings and rebuilds the config from them
    let config = Config::default();
    gui::launch(config)?;

    Ok(())
}
