use anyhow::Result;
use api_client::ApiClient;
use args::Args;
use clap::Parser;
use config::{BatchConfig, FileConfig};
use output::Rendered;
use runner::Runner;
use std::{io, process::ExitCode};

mod api_client;
mod args;
mod config;
mod invitation;
mod output;
mod retry;
mod runner;

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let file = args.config.as_deref().map(FileConfig::load).transpose()?;
    let config = BatchConfig::resolve(&args, file)?;
    let client = ApiClient::new(&args)?;

    log::debug!("Creating invitations on {}", client.base_url());
    let summary = Runner::new(client, io::stderr(), args.quiet).run(&config);

    Rendered::new(&summary, args.verbose)?.write(args.output.as_deref(), args.quiet)?;

    Ok(ExitCode::from(summary.exit_status()))
}
