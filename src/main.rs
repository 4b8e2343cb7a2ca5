use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = agentdeck::cli::Cli::parse();
    agentdeck::logging::init_tracing(cli.log_filter.clone())?;

    let config = agentdeck::config::from_cli(&cli)?;
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    agentdeck::commands::execute(&config, cli.command, &mut handle)
}
