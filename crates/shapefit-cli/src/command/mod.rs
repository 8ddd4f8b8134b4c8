use clap::{Parser, Subcommand};

use self::{decompose::DecomposeArg, evaluate::EvaluateArg, train::TrainArg};

mod decompose;
mod evaluate;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train shape-feature weights on labeled positions
    Train(#[clap(flatten)] TrainArg),
    /// Score labeled positions with a trained model
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Print the shape features of a single position
    Decompose(#[clap(flatten)] DecomposeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Decompose(arg) => decompose::run(&arg)?,
    }
    Ok(())
}
