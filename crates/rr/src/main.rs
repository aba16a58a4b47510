//! RR CLI - Railroad diagram generator.
//!
//! Renders every changed `*.bnf` grammar of a source directory into an
//! embeddable `<name>.html` diagram fragment in a destination directory.

mod build;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use build::BuildArgs;
use output::Output;

/// RR - Railroad diagram generator.
#[derive(Parser)]
#[command(name = "rr", version, about)]
struct Cli {
    #[command(flatten)]
    build: BuildArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.build.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.build.execute() {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
