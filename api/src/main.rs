use clap::{Parser, Subcommand};

mod cmd;

#[derive(Debug, Parser)]
#[clap(name = "academy", about = "Sports academy administration server")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the API server
    Serve(academy_api::config::Config),
    /// Administrative tasks
    Admin(cmd::admin::AdminArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(config) => cmd::server::run(config).await?,
        Commands::Admin(args) => cmd::admin::admin_commands(args)?,
    }

    Ok(())
}
