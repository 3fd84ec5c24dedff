use anyhow::Context;
use clap::{Parser, Subcommand};
use knife_drift::{
    commands, load_config, CommandError, FindSide, HttpRemote, LocalRepo, Report,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Compare a local chef-repo against a Chef server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root of the local chef-repo
    #[arg(long, env = "KNIFE_DRIFT_REPO", default_value = ".")]
    repo: PathBuf,

    /// Configuration file (default: <repo>/knife-drift.json when present)
    #[arg(long, env = "KNIFE_DRIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Server URL, overriding the configuration file
    #[arg(long, env = "KNIFE_DRIFT_SERVER_URL")]
    server_url: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare cookbook names
    Cookbooks,

    /// Compare the files of a cookbook
    Cookbook {
        /// Cookbook name
        name: Option<String>,

        /// Compare all cookbooks (list provided by local repo), rather than just a single cookbook
        #[arg(short, long)]
        all: bool,
    },

    /// Compare data bag names
    Databags,

    /// Compare the item names of a data bag
    DatabagItems {
        /// Data bag name
        bag: Option<String>,
    },

    /// Compare the item names and contents of a data bag
    Databag {
        /// Data bag name
        bag: Option<String>,
    },

    /// Compare role names and contents
    Roles,

    /// List cookbook file paths containing some text
    Find {
        /// Side to search
        #[arg(value_enum)]
        side: FindSide,

        /// Text to look for in file paths
        text: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> anyhow::Result<Report> {
    let mut config = load_config(&args.repo, args.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    if let Some(url) = &args.server_url {
        config = config.with_server_url(url)?;
    }
    debug!(?config, "Configuration loaded");

    let repo = LocalRepo::new(&config);
    let remote = HttpRemote::new(&config).context("Failed to create server client")?;

    let report = match &args.command {
        Command::Cookbooks => commands::diff_cookbooks(&repo, &remote).await?,
        Command::Cookbook { name, all } => {
            commands::diff_cookbook(&repo, &remote, name.as_deref(), *all).await?
        }
        Command::Databags => commands::diff_databags(&repo, &remote).await?,
        Command::DatabagItems { bag } => {
            commands::diff_databag_items(&repo, &remote, bag.as_deref()).await?
        }
        Command::Databag { bag } => commands::diff_databag(&repo, &remote, bag.as_deref()).await?,
        Command::Roles => commands::diff_roles(&repo, &remote).await?,
        Command::Find { side, text } => {
            commands::find_files(&repo, &remote, *side, text.as_deref()).await?
        }
    };

    Ok(report)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            if let Some(CommandError::MissingArgument(_)) = e.downcast_ref::<CommandError>() {
                eprintln!("ERROR: {e}");
                eprintln!("Run with --help for usage.");
            } else {
                eprintln!("ERROR: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
