// src/bin/cli.rs
use clap::Parser;
use vahan_dash::cli::{self, Args};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = vahan_dash::log::init() {
        eprintln!("Warning: log file unavailable: {e}");
    }

    let args = Args::parse();
    if !cli::run(args)? {
        std::process::exit(1);
    }
    Ok(())
}
