//! randopt：随机化优化算法［命令行版］
//!
//! 具体用法见 `randopt --help`。

use clap::Parser;
use randopt::experiments::{inspect, optimize};
use randopt::{Command, CommandLine, CommandLineArgs, Error};

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();
    let args = CommandLineArgs::parse();
    let config = args.load_config()?;
    match args.command {
        Command::Inspect => inspect(&config)?,
        Command::Optimize => {
            let cli = CommandLine::new(args.output.clone())?;
            let outcomes = optimize(&config, &cli)?;
            cli.write_report(&outcomes)?;
        }
    }
    Ok(())
}
