pub use agentdeck_cli::cli;
pub use agentdeck_cli::commands;
pub use agentdeck_cli::config;
pub use agentdeck_cli::logging;
pub use agentdeck_cli::snapshot;
pub use agentdeck_cli::AppConfig;

pub use agentdeck_core as core;
pub use agentdeck_core::filter;
pub use agentdeck_core::model;
pub use agentdeck_core::parser;
pub use agentdeck_core::presets;
pub use agentdeck_core::views;
