mod app;
mod cli;
mod config;
mod consts;
mod error;
mod eval;
mod knowledge;
mod model;
mod output;
mod responder;
mod session;
mod utils;

use clap::Parser;

use cli::Cli;
use config::Config;

fn main() {
    let cli = Cli::parse();

    let config = if cli.debug {
        Config::load()
    } else {
        Config::load_quiet()
    };
    let cli = cli.with_config(&config);

    if let Err(e) = app::run(&cli, &config) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
