use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod admin;
mod app;
mod auth;
mod categories;
mod config;
mod dashboard;
mod dates;
mod db;
mod error;
mod extract;
mod logs;
mod money;
mod state;
mod store;
mod transactions;
mod users;

#[cfg(test)]
mod test_utils;

use crate::config::AppConfig;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "fintrack", about = "Personal finance tracker API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Grant the admin role to an existing user.
    AssignAdmin {
        #[arg(long)]
        email: String,
    },
}

fn init_tracing(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fintrack=debug,axum=info,tower_http=info"));
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
        || config.is_production();

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::from_env()?;
    init_tracing(&config);

    let state = AppState::init(config.clone()).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => app::serve(app::build_app(state), &config).await,
        Command::AssignAdmin { email } => {
            let user = admin::assign_admin(state.store.as_ref(), &email).await?;
            println!("{} ({}) is now an admin", user.email, user.id);
            Ok(())
        }
    }
}
