//! Logging setup over the `log` facade with an `env_logger` backend.
//!
//! `RUST_LOG` wins when set; otherwise the CLI flags pick the level.
//! The default is warn so that scheduled runs stay silent unless
//! something needs attention.

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Initialize logging once, before anything logs.
pub fn init(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(level_for(verbose, quiet));
    }

    builder.format(|buf, record| {
        let level_style = buf.default_level_style(record.level());
        writeln!(
            buf,
            "{} {level_style}{:<5}{level_style:#} {}",
            buf.timestamp_seconds(),
            record.level(),
            record.args()
        )
    });

    builder.init();
}

fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
