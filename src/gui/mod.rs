//! GUI module for the Gifter application
//!
//! This module provides the graphical user interface built with egui/eframe.
//!
//! ## Module Structure
//!
//! - `app` - Main GuiApp struct, state types, and the frame loop
//! - `async_job` - Generic async job polling for background tasks
//! - `theme` - Centralized theme and styling system (AppTheme)
//! - `helpers` - Latency levels, message truncation and CSV export
//! - `notifications` - Notification entries and result messages
//! - `views` - View rendering functions (dashboard, gifts, settings)
//!
//! ## Usage
//!
//! ```no_run
//! use gifter::config::Config;
//! use gifter::gui;
//!
//! let config = Config::default();
//! gui::launch(config).expect("Failed to launch GUI");
//! ```

mod app;
pub mod async_job;
pub mod helpers;
pub mod notifications;
pub mod theme;
pub mod views;

pub use app::{launch, GuiApp, GuiSection};

pub use async_job::AsyncJob;
pub use notifications::NotificationEntry;
pub use theme::{configure_style, AppTheme};
