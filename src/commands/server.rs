//! `clubnet server` handlers

use colored::Colorize;

use crate::cli::ServerCommand;
use crate::commands::AppContext;
use crate::error::Result;

/// Dispatch a server subcommand.
pub fn handle_server(ctx: &AppContext, command: ServerCommand) -> Result<()> {
    match command {
        ServerCommand::Show => {
            show_server(ctx);
            Ok(())
        }
        ServerCommand::Set { url } => {
            ctx.server.set_server_url(&url)?;
            println!("{} Using server {}", "✓".green(), url.trim().cyan());
            Ok(())
        }
        ServerCommand::Reset => {
            ctx.server.reset_server()?;
            println!(
                "{} Using default server {}",
                "✓".green(),
                ctx.server.default_url().cyan()
            );
            Ok(())
        }
    }
}

fn show_server(ctx: &AppContext) {
    let config = ctx.server.config();
    let state = if config.is_configured {
        "configured".green()
    } else {
        "default".yellow()
    };
    println!("Server: {} ({})", config.server_url.cyan(), state);
}
