use clap::{Parser, Subcommand};
use std::process;
use tracing::{error, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Threshold sweep over probability maps into colored label files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build maps and label files at every threshold
    Sweep(cmd::sweep::SweepArgs),
    /// Show the thresholds and color source without running anything
    Plan(cmd::plan::PlanArgs),
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .init();

    let result = match cli.command {
        Commands::Sweep(args) => cmd::sweep::run(args),
        Commands::Plan(args) => cmd::plan::run(args),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
