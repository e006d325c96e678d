use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use contact_purge::{PurgeConfig, PurgeOptions, config, observability};

/// Delete every contact of every alias in a SimpleLogin account.
///
/// The API key is read from SIMPLELOGIN_API_KEY (the environment or ./.env)
/// unless the config file sets one.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to an optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List aliases and contacts without deleting anything
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), contact_purge::Error> {
    // Before config loading so `${VAR}` placeholders can come from .env
    let dotenv = config::load_dotenv()?;
    let mut config = PurgeConfig::load(args.config.as_deref())?;

    let logging = &mut config.observability.logging;
    logging.level = logging.level.raised_by(args.verbose);
    observability::init_tracing(logging)?;

    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }

    let options = PurgeOptions {
        dry_run: args.dry_run,
    };
    let report = contact_purge::purge(&config, options).await?;

    println!("{report}");
    Ok(())
}
