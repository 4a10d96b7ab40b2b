use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "churn")]
#[command(about = "Reports new and modified objects in S3 buckets")]
#[command(version)]
pub struct Cli {
    /// More log output (repeat for debug, trace)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log errors only
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Read settings from this file instead of the per-user config
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List buckets and report keys changed since the previous run
    Compare(CompareArgs),

    /// Alert when objects have not been modified recently
    Check(CheckArgs),
}

#[derive(Parser)]
pub struct CompareArgs {
    /// Buckets to watch
    #[arg(value_name = "BUCKET", required = true)]
    pub buckets: Vec<String>,

    /// Only consider keys under this prefix
    #[arg(short = 'p', long, default_value = "")]
    pub prefix: String,

    /// Directory holding listing snapshots
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Listing pages to fetch per bucket at most (0 = no cap)
    #[arg(short = 'm', long, value_name = "N")]
    pub max_iterations: Option<u32>,

    /// AWS region of the buckets
    #[arg(short = 'r', long)]
    pub region: Option<String>,

    /// S3-compatible endpoint such as LocalStack or MinIO
    #[arg(long, value_name = "URL")]
    pub endpoint_url: Option<String>,

    /// Output as JSON instead of plain lines
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Objects to check, as s3://bucket/key or bucket/key
    #[arg(value_name = "OBJECT", required = true)]
    pub objects: Vec<String>,

    /// Age above which the check warns, e.g. 30m, 2h
    #[arg(short = 'w', long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub warn: Option<Duration>,

    /// Age above which the check goes critical, e.g. 1d
    #[arg(short = 'c', long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub critical: Option<Duration>,

    /// AWS region of the buckets
    #[arg(short = 'r', long)]
    pub region: Option<String>,

    /// S3-compatible endpoint such as LocalStack or MinIO
    #[arg(long, value_name = "URL")]
    pub endpoint_url: Option<String>,
}
