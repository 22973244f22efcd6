mod cli;
mod paths;
mod run;
mod settings;
mod trace;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Trace(trace_args)) => run::run_trace(cli.run, trace_args),
        Some(Command::Config) => run::run_config(cli.run),
        Some(Command::Run) | None => run::run(cli.run),
    }
}
