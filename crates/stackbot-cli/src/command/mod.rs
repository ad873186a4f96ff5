use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, prelude::*};

use self::{auto_play::AutoPlayArg, plan::PlanArg, train::TrainArg};

mod auto_play;
mod plan;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Answer JSON plan requests with beam search
    Plan(#[clap(flatten)] PlanArg),
    /// Evolve evaluator weights by self-play
    Train(#[clap(flatten)] TrainArg),
    /// Play a game with one of the built-in policies
    AutoPlay(#[clap(flatten)] AutoPlayArg),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(LevelFilter::from_level(level))
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    match args.mode {
        Mode::Plan(arg) => plan::run(&arg)?,
        Mode::Train(arg) => train::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
    }
    Ok(())
}
