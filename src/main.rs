use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use covidence_conflicts::cli::ConfigArgs;
use covidence_conflicts::models::ReportConfig;
use covidence_conflicts::Result;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "covconflicts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Covidence conflict export → annotator reports", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the exported page and build every report
    Run {
        #[command(flatten)]
        config: ConfigArgs,

        /// Reuse the existing intermediate JSON instead of scanning the HTML
        #[arg(long)]
        skip_extract: bool,
    },

    /// Recover study payloads from the HTML into the intermediate JSON
    Extract {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Build spreadsheets from the intermediate JSON
    Aggregate {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Write a default covconflicts.toml
    Init {
        /// Config file to create
        #[arg(short, long, default_value = ReportConfig::FILE_NAME)]
        config: PathBuf,

        /// Overwrite without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            config,
            skip_extract,
        } => {
            let config = config.load()?;
            covidence_conflicts::cli::run::run(&config, skip_extract)?;
        }

        Commands::Extract { config } => {
            let config = config.load()?;
            covidence_conflicts::cli::extract::run(&config)?;
        }

        Commands::Aggregate { config } => {
            let config = config.load()?;
            covidence_conflicts::cli::aggregate::run(&config)?;
        }

        Commands::Init { config, force } => {
            covidence_conflicts::cli::init::run(&config, force)?;
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "covconflicts", &mut io::stdout());
        }
    }

    Ok(())
}
