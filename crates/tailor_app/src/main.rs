mod cli;
mod config;
mod effects;
mod flow;
mod logging;
mod render;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::initialize(cli.log);
    flow::run(cli)
}
