mod commands;

use apiary::config;
use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

use commands::Command;

#[derive(Parser, Debug)]
#[command(name = "apiary")]
#[command(about = "Storefront client: browse the catalog and manage the cart, online or offline")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/apiary/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Never contact the remote API; serve everything from bundled data
  #[arg(long)]
  offline: bool,

  /// Enable debug logging
  #[arg(short, long)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _log_guard = apiary::logging::init(args.verbose);

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // --offline wins over the config file and environment
  let config = if args.offline {
    config::Config {
      api: config::ApiConfig {
        use_api: false,
        ..config.api
      },
      ..config
    }
  } else {
    config
  };

  commands::run(args.command, &config).await
}
