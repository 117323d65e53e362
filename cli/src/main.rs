mod client;
mod seed;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client::ApiClient;

#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Pantry CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ping the server and print its welcome message
    Ping {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
    /// Seed the server with sample categories, recipes and reviews
    Seed {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        /// Delete all existing reviews, recipes and categories first
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ping { server } => {
            ping(&server).await?;
        }
        Commands::Seed { server, clear } => {
            seed::seed(&ApiClient::new(&server), clear).await?;
        }
    }

    Ok(())
}

async fn ping(server: &str) -> Result<()> {
    let client = ApiClient::new(server);
    let response: client::Welcome = client.get("/").await?;

    println!("{}", response.message);

    Ok(())
}
