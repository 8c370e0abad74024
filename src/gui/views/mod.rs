//! View modules for the GUI
//!
//! Each submodule adds rendering methods to `GuiApp` for one screen:
//!
//! - `dashboard` - Network and wallet status, operation log, about section
//! - `gifts` - The sent gifts table, cancel confirmation and CSV export
//! - `settings` - Network, wallet, confirmation and refresh settings
//!
//! The methods are called from `App::update` in `app.rs`.

pub mod dashboard;
pub mod gifts;
pub mod settings;
