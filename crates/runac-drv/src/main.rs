use clap::Parser as _;

use runac_drv::cli::Cli;
use runac_drv::{compile, init_tracing};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    init_tracing(cli.verbose, &cli.color);

    if let Err(err) = compile(&cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
