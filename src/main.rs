use clap::Parser;
use orbtest::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
