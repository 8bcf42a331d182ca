use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod util;

use commands::enact::EnactArgs;
use commands::rectifier::RectifierCommands;

#[derive(Parser)]
#[command(name = "catch", version, about = "Catch CLI: build and enact rectifiers")]
struct Cli {
    /// Relay API base URL
    #[arg(long, env = "CATCH_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check relay API health
    Health {
        /// Skip pretty-printing
        #[arg(long)]
        raw: bool,
    },
    /// Rectifier helpers
    Rectifier {
        #[command(subcommand)]
        command: RectifierCommands,
    },
    /// Send the request a rectifier describes and print the decoded reply
    Enact(EnactArgs),
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Quiet unless CATCH_LOG asks for more; logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("CATCH_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Health { raw } => commands::health::run(&cli.api_url, raw).await,
        Commands::Rectifier { command } => commands::rectifier::run(command),
        Commands::Enact(args) => commands::enact::run(args).await,
    };

    std::process::exit(code);
}
