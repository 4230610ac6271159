use anyhow::Result;
use clap::Parser;
use repaste::{
    chat::{ChatMessage, ConsoleChatHost},
    cli::{Cli, Commands, ConfigAction, mask_token, read_logs},
    command::{Collaborators, CommandHandler, Outcome},
    config::AppConfig,
    console::{console, init_console},
};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().unwrap_or_default();

    // CLI flags take precedence over the configured verbosity
    let effective_verbosity = cli.get_effective_verbosity(config.get_verbosity());
    init_console(effective_verbosity);

    match cli.command {
        Commands::Run {
            logs,
            channel,
            from,
            command,
        } => {
            handle_run(logs, channel, from, command.join(" "), &config).await?;
        }
        Commands::Config { action } => {
            handle_config(action)?;
        }
    }

    Ok(())
}

async fn handle_run(
    logs: Option<PathBuf>,
    channel: String,
    from: String,
    command: String,
    config: &AppConfig,
) -> Result<()> {
    let logs = match logs {
        Some(path) => read_logs(&path)?,
        None => Vec::new(),
    };
    console().debug(&format!("Loaded {} chat log entries", logs.len()));

    let handler = CommandHandler::new(config, Collaborators::production(config)?);
    let host = ConsoleChatHost::new(from);
    let msg = ChatMessage::command(command)
        .with_logs(logs)
        .in_channel(channel);

    let outcome = handler.handle(&msg, &host).await;
    console().debug(&format!("Outcome: {:?}", outcome));

    if outcome == Outcome::Ignored {
        console().warning("Not a repaste or unpaste command.");
    }

    Ok(())
}

fn handle_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = AppConfig::load()?;
            if let Some(ref token) = config.github_token {
                console().plain(&format!("github_token = \"{}\"", mask_token(token)));
            }
            if let Some(ref verbosity) = config.verbosity {
                console().plain(&format!("verbosity = \"{}\"", verbosity));
            }
            console().plain(&format!("log_window = {}", config.log_window));
            console().plain(&format!("maintainer = \"{}\"", config.maintainer));
            console().plain(&format!("jsx_channels = {:?}", config.jsx_channels));
            console().plain(&format!("gist_api_base = \"{}\"", config.gist_api_base));
            if let Some(ref shortener_url) = config.shortener_url {
                console().plain(&format!("shortener_url = \"{}\"", shortener_url));
            }
            console().plain(&format!("prettier_path = \"{}\"", config.prettier_path));
        }
        ConfigAction::Set { key, value } => {
            let path = AppConfig::config_path()?;
            let mut config = AppConfig::load_from(&path)?;

            match config.update_setting(&key, value) {
                Ok(()) => {
                    config.save_to(&path)?;
                    console().success("Configuration updated successfully");
                }
                Err(e) => console().error(&e.to_string()),
            }
        }
    }
    Ok(())
}
