use clap::Parser;

mod cli;
mod commands;
mod note;
mod settings;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    commands::run_command(cli)
}
