mod commands;
mod input;
mod opts;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::build::BuildArgs;
use commands::graft::GraftArgs;
use commands::merge::MergeArgs;
use commands::walk::WalkArgs;
use opts::GlobalOpts;

#[derive(Parser, Debug)]
#[command(name = "pathtree", version, about = "Path-addressed object tree schema tools")]
struct Cli {
    #[command(flatten)]
    opts: GlobalOpts,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge schema fragments into one tree definition
    Merge(MergeArgs),

    /// Resolve a path against a schema
    Walk(WalkArgs),

    /// Build the model a path addresses from a JSON payload
    Build(BuildArgs),

    /// Build a model and graft it into a JSON tree document
    Graft(GraftArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.opts.verbose);
    let opts = &cli.opts;

    match cli.command {
        Command::Merge(args) => commands::merge::cmd_merge(opts, &args),
        Command::Walk(args) => commands::walk::cmd_walk(opts, &args),
        Command::Build(args) => commands::build::cmd_build(opts, &args),
        Command::Graft(args) => commands::graft::cmd_graft(opts, &args),
    }
}

/// Logs go to stderr; stdout carries only command output.
fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();
}
