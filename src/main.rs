//! Clubnet - university clubs from the terminal
//!
#![doc = "Clubnet - university clubs from the terminal"]
#![doc = "Main entry point for the clubnet command-line client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clubnet::cli::{Cli, Commands};
use clubnet::commands::{self, auth::SignupArgs, AppContext};
use clubnet::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    let route = commands::route_for(&cli.command);
    let ctx = AppContext::build(config, route).await?;

    match cli.command {
        Commands::Server { command } => commands::server::handle_server(&ctx, command),
        Commands::Login {
            email,
            password,
            api_url,
        } => {
            tracing::info!("Signing in {}", email);
            commands::auth::login(&ctx, email, password, api_url).await
        }
        Commands::Signup {
            username,
            email,
            password,
            plan,
            role,
            api_url,
        } => {
            let args = SignupArgs {
                username,
                email,
                password,
                plan,
                role,
                api_url,
            };
            commands::auth::signup(&ctx, args).await
        }
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::ResendVerification { email, api_url } => {
            commands::auth::resend_verification(&ctx, &email, api_url.as_deref()).await
        }
        Commands::Clubs { command } => commands::browse::handle_clubs(&ctx, command).await,
        Commands::Universities { command } => {
            commands::browse::handle_universities(&ctx, command).await
        }
        Commands::Events { command } => commands::browse::handle_events(&ctx, command).await,
        Commands::Request { method, path, data } => {
            commands::request::run_request(&ctx, &method, &path, data.as_deref()).await
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "clubnet=debug" } else { "clubnet=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
