pub mod config;
pub mod manager;

pub use config::{PollySettings, Settings};
pub use manager::SettingsManager;
