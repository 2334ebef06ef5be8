use anyhow::Result;
use clap::Parser;
use netbank::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    netbank::observability::init(cli.verbose);
    cli.run()
}
