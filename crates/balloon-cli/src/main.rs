mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "balloon",
    version,
    about = "Dimension extraction and ballooning tool for engineering drawings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log detector and placement decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a ballooned inspection report from a drawing geometry file
    Report {
        /// Path to drawing geometry JSON file
        input_file: PathBuf,

        /// Custom JSON config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Embedded config profile: default, strict
        #[arg(short, long, value_name = "NAME")]
        profile: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the report to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// List detected dimensions without placing balloons
    Dims {
        /// Path to drawing geometry JSON file
        input_file: PathBuf,

        /// Only list this page index
        #[arg(short, long, value_name = "N")]
        page: Option<usize>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Manage and inspect config profiles
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// List embedded config profiles
    List,
    /// Print a profile as JSON
    Show {
        /// Profile name (e.g., "default")
        name: String,
    },
    /// Validate a custom config file
    Validate {
        /// Path to JSON config file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Report {
            input_file,
            config,
            profile,
            output,
            out,
        } => commands::report::run(input_file, config, profile, &output, out),
        Commands::Dims {
            input_file,
            page,
            output,
        } => commands::dims::run(input_file, page, &output),
        Commands::Config { action } => match action {
            ConfigAction::List => commands::config::list(),
            ConfigAction::Show { name } => commands::config::show(&name),
            ConfigAction::Validate { file } => commands::config::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    // RUST_LOG wins; --verbose turns on engine debug output.
    let fallback = if verbose { "balloon_core=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}
