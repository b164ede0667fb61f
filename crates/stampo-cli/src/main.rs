mod cli;
mod commands;

use clap::Parser;
use cli::Cli;

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if cli.list {
        return commands::list::run(&cli.search_paths);
    }
    commands::new::run(cli)
}
