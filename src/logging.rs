//! Stderr logger with run-relative timestamps.

use std::io::Write;
use std::time::Instant;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Install the global logger. Verbose selects Info, otherwise Warn; the
/// `RUST_LOG` environment variable still overrides the filter. Lines carry
/// the seconds elapsed since this call: `[  12.345] INFO message`.
pub fn init_logger(verbose: bool) {
    let started = Instant::now();
    let level = match verbose {
        true => LevelFilter::Info,
        false => LevelFilter::Warn,
    };

    let mut builder = Builder::from_env(Env::default());
    builder.filter_level(level).target(Target::Stderr);
    builder.format(move |out, record| {
        let stamp = started.elapsed().as_secs_f64();
        writeln!(out, "[{:8.3}] {} {}", stamp, record.level(), record.args())
    });
    builder.init();
}
