//! Configuration management
//!
//! Handles loading connection profiles and user settings.

pub mod connections;
pub mod settings;

pub use connections::{ConnectionConfig, SslMode, find_connection, save_connection};
pub use settings::{Settings, load_settings};
