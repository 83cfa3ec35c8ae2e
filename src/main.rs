use std::process;

use anyhow::Result;
use clap::Parser;

use fpt::cli::{self, Cli};

fn main() -> Result<()> {
    let args = Cli::parse();

    stderrlog::new()
        .module("fpt")
        .quiet(args.quiet)
        .verbosity(args.verbose as usize + 1)
        .init()?;

    let exit_code = cli::run(args);
    process::exit(exit_code);
}
