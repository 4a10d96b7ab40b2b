use clap::Parser;
use serde::Serialize;
use std::process;

use churn::cache::SnapshotCache;
use churn::check::{self, CheckOutcome};
use churn::cli::{Cli, Command};
use churn::config::{self, Settings};
use churn::logging;
use churn::monitor::Monitor;
use churn::store::s3::S3Store;

#[derive(Serialize)]
struct BucketReport<'a> {
    bucket: &'a str,
    prefix: &'a str,
    changed: Vec<String>,
}

fn connect(settings: &Settings) -> S3Store {
    match S3Store::connect(settings.region.as_deref(), settings.endpoint_url.as_deref()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error connecting to storage: {e}");
            process::exit(1);
        }
    }
}

fn print_report(report: &BucketReport) {
    let target = if report.prefix.is_empty() {
        report.bucket.to_string()
    } else {
        format!("{}/{}", report.bucket, report.prefix)
    };

    if report.changed.is_empty() {
        println!("{target}: no changes");
    } else {
        println!("{target}: {} changed", report.changed.len());
        for key in &report.changed {
            println!("{key}");
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let file = match config::load_file(cli.config.as_deref()) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error reading config: {e}");
            process::exit(1);
        }
    };

    match cli.command {
        Command::Compare(args) => {
            let settings = match Settings::for_compare(&args, &file) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Error in settings: {e}");
                    process::exit(1);
                }
            };

            let store = connect(&settings);
            let cache = match SnapshotCache::new(&settings.cache_dir) {
                Ok(cache) => cache,
                Err(e) => {
                    eprintln!(
                        "Error opening cache directory {}: {e}",
                        settings.cache_dir.display()
                    );
                    process::exit(1);
                }
            };
            let monitor = Monitor::new(&store, cache);

            // plain lines go out per bucket; json needs the whole array first
            let mut reports = Vec::new();
            for bucket in &args.buckets {
                match monitor.compare(bucket, &args.prefix, settings.max_iterations) {
                    Ok(changed) => {
                        let report = BucketReport {
                            bucket,
                            prefix: &args.prefix,
                            changed,
                        };
                        if args.json {
                            reports.push(report);
                        } else {
                            print_report(&report);
                        }
                    }
                    Err(e) => {
                        eprintln!("Error comparing {bucket}: {e}");
                        process::exit(1);
                    }
                }
            }

            if args.json {
                match serde_json::to_string_pretty(&reports) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Error rendering JSON: {e}");
                        process::exit(1);
                    }
                }
            }
        }
        Command::Check(args) => {
            let settings = match Settings::for_check(&args, &file) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Error in settings: {e}");
                    process::exit(1);
                }
            };

            let store = connect(&settings);
            let now = chrono::Utc::now();

            let outcomes: Vec<CheckOutcome> = args
                .objects
                .iter()
                .map(|target| {
                    check::check_object(&store, target, now, settings.warn, settings.critical)
                })
                .collect();

            for outcome in &outcomes {
                println!(
                    "{}: {} {}",
                    outcome.status.label(),
                    outcome.target,
                    outcome.detail
                );
            }

            process::exit(check::worst(&outcomes).exit_code());
        }
    }
}
