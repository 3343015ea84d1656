use clap::{Parser, Subcommand};
use ipstack::*;
use tracing::{debug, Level};

mod commands;

use commands::check::CheckArgs;
use commands::config::ConfigArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.ipstack/ipstack.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output format: table, markdown, json, json-pretty, json-line, psv
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up geolocation information for one or more IP addresses
    Check(CheckArgs),
    /// Show the effective configuration
    Config(ConfigArgs),
}

fn main() {
    // variables from a .env file act like regular environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            // filter spans/events with level DEBUG or higher.
            .with_max_level(Level::DEBUG)
            .init();
    }

    let config = match IpstackConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: unable to load configuration: {e}");
            std::process::exit(1);
        }
    };
    debug!("loaded configuration:\n{}", config.summary());

    let ok = match cli.command {
        Commands::Check(args) => commands::check::run(config, args, cli.format),
        Commands::Config(args) => commands::config::run(&config, args, cli.format),
    };

    if !ok {
        std::process::exit(1);
    }
}
