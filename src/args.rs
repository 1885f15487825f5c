use anyhow::Result;
use clap::Parser;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const EXPIRY_CHOICES: [u32; 3] = [1, 7, 30];
pub const DEFAULT_BASE_URL: &str = "http://localhost:5690";

/// Batch invitation creation for Wizarr.
///
/// Prints only the invitation URLs by default, one per line. Use --verbose to
/// get the full JSON summary instead.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// API key, or a path to a file containing it
    #[arg(short, long, required = true, env = "WIZARR_API_KEY")]
    pub api_key: String,

    /// Wizarr instance; defaults to a local install on its standard port
    #[arg(
        short,
        long,
        default_value = DEFAULT_BASE_URL,
        env = "WIZARR_BASE_URL"
    )]
    pub base_url: String,

    /// Number of invitations to create (required if --config is not used)
    #[arg(short, long)]
    pub count: Option<u32>,

    /// JSON configuration file, command-line values take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, num_args = 1.., value_delimiter = ',')]
    pub server_ids: Option<Vec<i64>>,

    /// Days until the invitation expires (1, 7 or 30)
    #[arg(long, value_parser = parse_expiry)]
    pub expires_in_days: Option<u32>,

    /// User access duration in days, or "unlimited"
    #[arg(long)]
    pub duration: Option<String>,

    /// Disable unlimited user access
    #[arg(long)]
    pub no_unlimited: bool,

    /// Library IDs to grant access to
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub library_ids: Option<Vec<i64>>,

    #[arg(long)]
    pub allow_downloads: bool,

    #[arg(long)]
    pub allow_live_tv: bool,

    #[arg(long)]
    pub allow_mobile_uploads: bool,

    /// Stop the batch at the first failed invitation
    #[arg(long)]
    pub stop_on_error: bool,

    /// Write results to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output the full JSON summary instead of just invitation URLs
    #[arg(short, long)]
    pub verbose: bool,

    /// Per-request timeout in seconds
    #[arg(
        long,
        default_value_t = 30,
        env = "WIZARR_TIMEOUT",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Retries for rate-limited or failing server responses
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,
}

impl Args {
    pub fn parse_secret(input: &str) -> Result<String> {
        if Path::new(input).exists() {
            Ok(fs::read_to_string(input)?.trim().to_string())
        } else {
            Ok(input.to_string())
        }
    }
}

fn parse_expiry(input: &str) -> Result<u32, String> {
    let days: u32 = input
        .parse()
        .map_err(|_| format!("`{input}` is not a number of days"))?;

    if EXPIRY_CHOICES.contains(&days) {
        Ok(days)
    } else {
        Err(format!("must be one of {:?}", EXPIRY_CHOICES))
    }
}
