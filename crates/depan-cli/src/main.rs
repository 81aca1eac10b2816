#![forbid(unsafe_code)]

mod cmd;
mod config;
mod document;
mod output;

use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "depan: dependency hierarchy and collapse explorer",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Config file to use instead of `.depan/config.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "List hierarchy roots",
        long_about = "Build the configured hierarchy over a graph and list its roots.",
        after_help = "EXAMPLES:\n    # Roots of the containment hierarchy\n    depan roots graph.json\n\n    # Emit machine-readable output\n    depan roots graph.json --json"
    )]
    Roots(cmd::roots::RootsArgs),

    #[command(
        about = "Print the hierarchy",
        long_about = "Print the configured hierarchy as an indented forest.",
        after_help = "EXAMPLES:\n    # Whole forest\n    depan tree graph.json\n\n    # Roots and their direct children only\n    depan tree graph.json --depth 1"
    )]
    Tree(cmd::tree::TreeArgs),

    #[command(
        about = "Collapse nodes and show the exposed graph",
        long_about = "Collapse the whole hierarchy bottom-up, or apply explicit groups, then print the collapse groups and the exposed graph.",
        after_help = "EXAMPLES:\n    # Collapse every interior node of the hierarchy\n    depan collapse graph.json\n\n    # Hide B and C behind A\n    depan collapse graph.json --group A=B,C"
    )]
    Collapse(cmd::collapse::CollapseArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DEPAN_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "depan=debug,info"
        } else {
            "depan=info,warn"
        })
    });

    let format = env::var("DEPAN_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let config = config::load_config(&project_root, cli.config.as_deref())?;
    let format_env = env::var("DEPAN_FORMAT").ok();
    let output = config::resolve_output(cli.json, format_env.as_deref(), &config.output.format);

    match cli.command {
        Commands::Roots(ref args) => cmd::roots::run_roots(args, &config, output),
        Commands::Tree(ref args) => cmd::tree::run_tree(args, &config, output),
        Commands::Collapse(ref args) => cmd::collapse::run_collapse(args, &config, output),
    }
}
