pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod snapshot;

pub use agentdeck_core as core;
pub use agentdeck_core::filter;
pub use agentdeck_core::model;
pub use agentdeck_core::parser;
pub use agentdeck_core::presets;
pub use agentdeck_core::views;

pub use config::AppConfig;
